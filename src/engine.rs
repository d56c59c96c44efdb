//! Round/rest countdown state machine.
//!
//! The transition functions are pure: they take the current session and the
//! preset and return the next session plus the cues it produced. The
//! [`IntervalTimer`] wrapper owns a session, forwards cues to a [`CueSink`] and
//! arms or disarms the 1 Hz [`TickTrigger`] whenever the status changes.

use crate::cues::{Cue, CueSink, Phase};
use crate::error::Result;
use crate::preset::Preset;
use crate::runtime::TickTrigger;

/// Remaining work seconds at which a warning beep sounds
pub const WARNING_SECS: [u32; 6] = [10, 5, 4, 3, 2, 1];

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum TimerStatus {
    Idle,
    Running,
    Paused,
    Finished,
}

/// Mutable run state of one training session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerSession {
    pub status: TimerStatus,
    pub current_round: u32,
    pub time_remaining_secs: u32,
    pub is_rest_phase: bool,
}

impl TimerSession {
    /// Idle session; shows the full round time when a preset is selected
    pub fn idle(preset: Option<&Preset>) -> Self {
        Self {
            status: TimerStatus::Idle,
            current_round: 1,
            time_remaining_secs: preset.map(|p| p.round_duration_secs).unwrap_or(0),
            is_rest_phase: false,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.is_rest_phase {
            Phase::Rest
        } else {
            Phase::Work
        }
    }

    /// Ticks are only meaningful while running
    pub fn is_running(&self) -> bool {
        self.status == TimerStatus::Running
    }

    /// Running or paused
    pub fn is_active(&self) -> bool {
        matches!(self.status, TimerStatus::Running | TimerStatus::Paused)
    }
}

impl Default for TimerSession {
    fn default() -> Self {
        Self::idle(None)
    }
}

/// Result of applying a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub session: TimerSession,
    pub cues: Vec<Cue>,
}

impl Step {
    fn unchanged(session: &TimerSession) -> Self {
        Self {
            session: *session,
            cues: Vec::new(),
        }
    }

    fn with_cue(session: TimerSession, cue: Cue) -> Self {
        Self {
            session,
            cues: vec![cue],
        }
    }

    fn quiet(session: TimerSession) -> Self {
        Self {
            session,
            cues: Vec::new(),
        }
    }
}

/// Begin round 1. Only an idle session starts; the preset is validated first
/// so a bad preset never causes a transition.
pub fn start(session: &TimerSession, preset: &Preset) -> Result<Step> {
    preset.validate()?;

    if session.status != TimerStatus::Idle {
        return Ok(Step::unchanged(session));
    }

    Ok(Step::with_cue(
        TimerSession {
            status: TimerStatus::Running,
            current_round: 1,
            time_remaining_secs: preset.round_duration_secs,
            is_rest_phase: false,
        },
        Cue::PhaseStart(Phase::Work),
    ))
}

pub fn pause(session: &TimerSession) -> Step {
    match session.status {
        TimerStatus::Running => Step::quiet(TimerSession {
            status: TimerStatus::Paused,
            ..*session
        }),
        _ => Step::unchanged(session),
    }
}

pub fn resume(session: &TimerSession) -> Step {
    match session.status {
        TimerStatus::Paused => Step::quiet(TimerSession {
            status: TimerStatus::Running,
            ..*session
        }),
        _ => Step::unchanged(session),
    }
}

/// One second passes. Decrement and boundary check happen in the same step.
pub fn tick(session: &TimerSession, preset: &Preset) -> Step {
    if session.status != TimerStatus::Running {
        return Step::unchanged(session);
    }

    if session.time_remaining_secs <= 1 {
        return end_phase(session, preset);
    }

    let next = TimerSession {
        time_remaining_secs: session.time_remaining_secs - 1,
        ..*session
    };

    if !next.is_rest_phase && WARNING_SECS.contains(&next.time_remaining_secs) {
        Step::with_cue(next, Cue::WarningBeep)
    } else {
        Step::quiet(next)
    }
}

/// Operator forced phase advance; never beeps
pub fn skip(session: &TimerSession, preset: &Preset) -> Step {
    if !session.is_active() {
        return Step::unchanged(session);
    }
    end_phase(session, preset)
}

pub fn reset(session: &TimerSession, preset: Option<&Preset>) -> Step {
    match session.status {
        TimerStatus::Idle => Step::unchanged(session),
        _ => Step::quiet(TimerSession::idle(preset)),
    }
}

/// Shared end-of-phase transition. The round counter moves once per cycle:
/// on rest entry, or at the work boundary when there is no rest.
fn end_phase(session: &TimerSession, preset: &Preset) -> Step {
    if session.is_rest_phase {
        return Step::with_cue(
            TimerSession {
                status: TimerStatus::Running,
                time_remaining_secs: preset.round_duration_secs,
                is_rest_phase: false,
                ..*session
            },
            Cue::PhaseStart(Phase::Work),
        );
    }

    if session.current_round >= preset.rounds {
        return Step::with_cue(
            TimerSession {
                status: TimerStatus::Finished,
                time_remaining_secs: 0,
                is_rest_phase: false,
                ..*session
            },
            Cue::SessionComplete,
        );
    }

    if preset.has_rest() {
        Step::with_cue(
            TimerSession {
                status: TimerStatus::Running,
                current_round: session.current_round + 1,
                time_remaining_secs: preset.rest_duration_secs,
                is_rest_phase: true,
            },
            Cue::PhaseStart(Phase::Rest),
        )
    } else {
        Step::with_cue(
            TimerSession {
                status: TimerStatus::Running,
                current_round: session.current_round + 1,
                time_remaining_secs: preset.round_duration_secs,
                is_rest_phase: false,
            },
            Cue::PhaseStart(Phase::Work),
        )
    }
}

/// Stateful host-facing timer: one per active training session
pub struct IntervalTimer {
    preset: Option<Preset>,
    session: TimerSession,
    sink: Box<dyn CueSink>,
    trigger: Box<dyn TickTrigger>,
}

impl std::fmt::Debug for IntervalTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntervalTimer")
            .field("preset", &self.preset)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl IntervalTimer {
    pub fn new(sink: Box<dyn CueSink>, trigger: Box<dyn TickTrigger>) -> Self {
        Self {
            preset: None,
            session: TimerSession::default(),
            sink,
            trigger,
        }
    }

    pub fn session(&self) -> &TimerSession {
        &self.session
    }

    pub fn preset(&self) -> Option<&Preset> {
        self.preset.as_ref()
    }

    pub fn status(&self) -> TimerStatus {
        self.session.status
    }

    /// Choose the preset for the next session. Ignored unless idle, since a
    /// running session's preset is fixed.
    pub fn select_preset(&mut self, preset: Preset) -> bool {
        if self.session.status != TimerStatus::Idle {
            return false;
        }
        tracing::debug!(preset = %preset.id, "preset selected");
        self.session = TimerSession::idle(Some(&preset));
        self.preset = Some(preset);
        true
    }

    pub fn clear_selection(&mut self) -> bool {
        if self.session.status != TimerStatus::Idle {
            return false;
        }
        self.preset = None;
        self.session = TimerSession::idle(None);
        true
    }

    /// Start the selected preset; without a selection this does nothing
    pub fn start(&mut self) -> Result<()> {
        let Some(preset) = self.preset.as_ref() else {
            return Ok(());
        };
        let step = start(&self.session, preset).inspect_err(|e| {
            tracing::warn!("refusing to start {}: {}", preset.id, e);
        })?;
        if step.session.is_running() && !self.session.is_running() {
            tracing::info!(
                preset = %preset.id,
                rounds = preset.rounds,
                round_secs = preset.round_duration_secs,
                rest_secs = preset.rest_duration_secs,
                "session started"
            );
        }
        self.apply(step);
        Ok(())
    }

    /// Select and start in one go. Returns `Ok(false)` without touching the
    /// session when one is already active, since its preset is fixed.
    pub fn start_with(&mut self, preset: Preset) -> Result<bool> {
        preset.validate()?;
        if !self.select_preset(preset) {
            tracing::debug!(status = %self.session.status, "start ignored, session active");
            return Ok(false);
        }
        self.start()?;
        Ok(true)
    }

    pub fn pause(&mut self) {
        let step = pause(&self.session);
        self.apply(step);
    }

    pub fn resume(&mut self) {
        let step = resume(&self.session);
        self.apply(step);
    }

    /// Space bar behaviour: start when idle, otherwise flip running/paused
    pub fn toggle(&mut self) -> Result<()> {
        match self.session.status {
            TimerStatus::Idle => self.start(),
            TimerStatus::Running => {
                self.pause();
                Ok(())
            }
            TimerStatus::Paused => {
                self.resume();
                Ok(())
            }
            TimerStatus::Finished => Ok(()),
        }
    }

    pub fn tick(&mut self) {
        let Some(preset) = self.preset.as_ref() else {
            return;
        };
        let step = tick(&self.session, preset);
        self.apply(step);
    }

    pub fn skip(&mut self) {
        let Some(preset) = self.preset.as_ref() else {
            return;
        };
        let step = skip(&self.session, preset);
        self.apply(step);
    }

    pub fn reset(&mut self) {
        let step = reset(&self.session, self.preset.as_ref());
        if step.session != self.session {
            tracing::info!(from = %self.session.status, "session reset");
        }
        self.apply(step);
    }

    fn apply(&mut self, step: Step) {
        let Step { session, cues } = step;
        if session != self.session {
            tracing::debug!(
                status = %session.status,
                round = session.current_round,
                remaining = session.time_remaining_secs,
                rest = session.is_rest_phase,
                "transition"
            );
        }
        if session.status == TimerStatus::Finished && self.session.status != TimerStatus::Finished
        {
            tracing::info!(rounds = session.current_round, "session complete");
        }
        self.session = session;

        for cue in cues {
            self.sink.play(cue);
        }

        if self.session.is_running() {
            self.trigger.arm();
        } else {
            self.trigger.disarm();
        }
    }
}
