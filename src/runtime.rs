use std::cell::Cell;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, RecvError, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Default cadence of the timer clock
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Bounds a configured cadence is clamped into
pub const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);
pub const MAX_TICK_INTERVAL: Duration = Duration::from_secs(60);

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum TimerEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait TimerEventSource {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<TimerEvent, RecvTimeoutError>;

    /// Block until an event arrives; used while no tick is scheduled.
    fn recv(&self) -> Result<TimerEvent, RecvError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<TimerEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                // Windows reports releases too; only presses are commands
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                    if tx.send(TimerEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(TimerEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::error!("terminal event stream closed: {}", e);
                    break;
                }
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<TimerEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn recv(&self) -> Result<TimerEvent, RecvError> {
        self.rx.recv()
    }
}

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<TimerEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<TimerEvent>) -> Self {
        Self { rx }
    }
}

impl TimerEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<TimerEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }

    fn recv(&self) -> Result<TimerEvent, RecvError> {
        self.rx.recv()
    }
}

/// Start/stop hooks for the periodic trigger that drives the timer
pub trait TickTrigger {
    /// Schedule ticks; calling it while already armed keeps the current cadence.
    fn arm(&mut self);
    /// Stop scheduling ticks altogether.
    fn disarm(&mut self);
}

/// Deadline-based tick trigger shared between the timer and the [`Runner`].
///
/// Clones share the same deadline. Single threaded, like the event loop.
#[derive(Clone, Debug)]
pub struct TickSchedule {
    interval: Duration,
    due: Rc<Cell<Option<Instant>>>,
}

impl TickSchedule {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval: interval.clamp(MIN_TICK_INTERVAL, MAX_TICK_INTERVAL),
            due: Rc::new(Cell::new(None)),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn due(&self) -> Option<Instant> {
        self.due.get()
    }

    pub fn is_armed(&self) -> bool {
        self.due.get().is_some()
    }

    /// Move the deadline one interval on from the tick that just fired, so
    /// key presses between ticks do not stretch the second.
    fn advance(&self, fired: Instant) {
        if self.is_armed() {
            let next = fired + self.interval;
            let now = Instant::now();
            // fell far behind (suspend, debugger): resync instead of bursting
            let next = if next + self.interval < now {
                now + self.interval
            } else {
                next
            };
            self.due.set(Some(next));
        }
    }
}

impl Default for TickSchedule {
    fn default() -> Self {
        Self::new(TICK_INTERVAL)
    }
}

impl TickTrigger for TickSchedule {
    fn arm(&mut self) {
        if self.due.get().is_none() {
            self.due.set(Some(Instant::now() + self.interval));
        }
    }

    fn disarm(&mut self) {
        self.due.set(None);
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: TimerEventSource> {
    event_source: E,
    schedule: TickSchedule,
}

impl<E: TimerEventSource> Runner<E> {
    pub fn new(event_source: E, schedule: TickSchedule) -> Self {
        Self {
            event_source,
            schedule,
        }
    }

    pub fn schedule(&self) -> &TickSchedule {
        &self.schedule
    }

    /// Blocks until the next event or the next due tick. While the schedule
    /// is disarmed only input can wake the loop. Returns None once the event
    /// source is gone and no tick is pending.
    pub fn step(&self) -> Option<TimerEvent> {
        let Some(due) = self.schedule.due() else {
            return self.event_source.recv().ok();
        };

        let wait = due.saturating_duration_since(Instant::now());
        match self.event_source.recv_timeout(wait) {
            Ok(ev) => Some(ev),
            Err(RecvTimeoutError::Timeout) => {
                self.schedule.advance(due);
                Some(TimerEvent::Tick)
            }
            Err(RecvTimeoutError::Disconnected) => {
                std::thread::sleep(wait);
                self.schedule.advance(due);
                Some(TimerEvent::Tick)
            }
        }
    }
}
