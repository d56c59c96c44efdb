use std::io::Write;

/// Which half of a round cycle a phase-start cue announces
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Work,
    Rest,
}

/// Abstract signal from the engine that an audio effect should fire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    WarningBeep,
    PhaseStart(Phase),
    SessionComplete,
}

/// The sounds the gym display knows how to make
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Sound {
    Beep,
    Bell,
    Gong,
    Fight,
}

/// Sine tone fallback used when no sample is available
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub frequency_hz: f32,
    pub duration_ms: u32,
    pub gain: f32,
}

impl Cue {
    pub fn sound(&self) -> Sound {
        match self {
            Cue::WarningBeep => Sound::Beep,
            Cue::PhaseStart(Phase::Work) => Sound::Bell,
            Cue::PhaseStart(Phase::Rest) => Sound::Gong,
            Cue::SessionComplete => Sound::Fight,
        }
    }
}

impl Sound {
    pub fn tone(&self) -> Tone {
        let (frequency_hz, duration_ms, gain) = match self {
            Sound::Beep => (800.0, 80, 0.2),
            Sound::Bell => (600.0, 400, 0.4),
            Sound::Gong => (180.0, 1500, 0.5),
            Sound::Fight => (120.0, 2000, 0.6),
        };
        Tone {
            frequency_hz,
            duration_ms,
            gain,
        }
    }

    /// How many terminal bells approximate this sound
    pub fn bell_count(&self) -> usize {
        match self {
            Sound::Beep | Sound::Bell => 1,
            Sound::Gong => 2,
            Sound::Fight => 3,
        }
    }
}

/// Receives cues from the timer and turns them into something audible
pub trait CueSink {
    fn play(&mut self, cue: Cue);
}

/// Rings the terminal bell; good enough for a laptop next to the mats
pub struct TerminalBell<W: Write> {
    out: W,
}

impl<W: Write> TerminalBell<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl TerminalBell<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> CueSink for TerminalBell<W> {
    fn play(&mut self, cue: Cue) {
        let sound = cue.sound();
        tracing::debug!(?cue, %sound, "cue");
        let bells = "\x07".repeat(sound.bell_count());
        if let Err(e) = self
            .out
            .write_all(bells.as_bytes())
            .and_then(|_| self.out.flush())
        {
            tracing::warn!("failed to ring terminal bell: {}", e);
        }
    }
}

/// Swallows every cue (`--mute`)
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentSink;

impl CueSink for SilentSink {
    fn play(&mut self, cue: Cue) {
        tracing::trace!(?cue, "muted cue");
    }
}

/// Keeps every cue it receives; used by tests and the headless runner
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub cues: std::rc::Rc<std::cell::RefCell<Vec<Cue>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Cue> {
        std::mem::take(&mut *self.cues.borrow_mut())
    }
}

impl CueSink for RecordingSink {
    fn play(&mut self, cue: Cue) {
        self.cues.borrow_mut().push(cue);
    }
}
