use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use gymclock::app::{App, AppState};
use gymclock::cues::{Cue, Phase, RecordingSink};
use gymclock::engine::TimerStatus;
use gymclock::preset::Preset;
use gymclock::runtime::{Runner, TestEventSource, TickSchedule, TimerEvent};

fn key(c: KeyCode) -> TimerEvent {
    TimerEvent::Key(KeyEvent::new(c, KeyModifiers::NONE))
}

// Headless integration using the runtime + App without a TTY.
// A fast tick schedule stands in for the 1 Hz clock.
#[test]
fn headless_custom_session_runs_to_completion() {
    let sink = RecordingSink::new();
    let schedule = TickSchedule::new(Duration::from_millis(2));
    let mut app = App::new(
        Preset::custom(2, 3, 1),
        Box::new(sink.clone()),
        schedule.clone(),
    );

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(TestEventSource::new(rx), schedule);

    // select custom, start
    tx.send(key(KeyCode::Char('6'))).unwrap();
    tx.send(key(KeyCode::Char(' '))).unwrap();

    let mut ticks = 0;
    for _ in 0..200u32 {
        let Some(event) = runner.step() else {
            break;
        };
        if matches!(event, TimerEvent::Tick) {
            ticks += 1;
        }
        app.handle(event);
        if app.state() == AppState::Finished {
            break;
        }
    }

    assert_eq!(app.state(), AppState::Finished);
    assert_eq!(ticks, 3 + 1 + 3);
    assert!(!runner.schedule().is_armed(), "finished timer must stop ticking");
    assert_eq!(
        sink.take(),
        vec![
            Cue::PhaseStart(Phase::Work),
            Cue::WarningBeep,
            Cue::WarningBeep,
            Cue::PhaseStart(Phase::Rest),
            Cue::PhaseStart(Phase::Work),
            Cue::WarningBeep,
            Cue::WarningBeep,
            Cue::SessionComplete,
        ]
    );
}

#[test]
fn headless_pause_stops_ticks() {
    let schedule = TickSchedule::new(Duration::from_millis(2));
    let mut app = App::new(
        Preset::custom(1, 60, 0),
        Box::new(RecordingSink::new()),
        schedule.clone(),
    );
    app.select(5);
    app.toggle();

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(TestEventSource::new(rx), schedule);

    for _ in 0..5u32 {
        if let Some(event) = runner.step() {
            app.handle(event);
        }
    }
    assert_eq!(app.timer.session().time_remaining_secs, 55);

    tx.send(key(KeyCode::Char(' '))).unwrap();
    if let Some(event) = runner.step() {
        app.handle(event);
    }
    assert_eq!(app.timer.status(), TimerStatus::Paused);
    assert!(!runner.schedule().is_armed());

    // nothing queued and nothing scheduled: the runner reports the source is gone
    drop(tx);
    assert!(runner.step().is_none());
    assert_eq!(app.timer.session().time_remaining_secs, 55);
}

#[test]
fn headless_skip_and_reset_flow() {
    let schedule = TickSchedule::new(Duration::from_secs(1));
    let mut app = App::new(
        Preset::custom(3, 180, 60),
        Box::new(RecordingSink::new()),
        schedule.clone(),
    );
    app.select_by_id("boxing");
    app.handle(key(KeyCode::Char(' ')));
    app.handle(key(KeyCode::Right));

    let s = *app.timer.session();
    assert!(s.is_rest_phase);
    assert_eq!(s.current_round, 2);
    assert_eq!(s.time_remaining_secs, 60);

    app.handle(key(KeyCode::Char('R')));
    assert_eq!(app.state(), AppState::PresetSelect);
    assert_eq!(app.timer.session().time_remaining_secs, 180);
    assert!(!schedule.is_armed());
}
