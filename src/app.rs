use chrono::{DateTime, Local};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::cues::CueSink;
use crate::engine::{IntervalTimer, TimerStatus};
use crate::preset::{catalog, CustomField, Preset};
use crate::runtime::{TickSchedule, TimerEvent};

/// Presets per row on the selection screen
pub const GRID_COLUMNS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    PresetSelect,
    Timer,
    Finished,
}

#[derive(Debug)]
pub struct App {
    pub timer: IntervalTimer,
    pub presets: Vec<Preset>,
    pub cursor: usize,
    pub custom_field: CustomField,
    pub started_at: Option<DateTime<Local>>,
    pub finished_at: Option<DateTime<Local>>,
    pub last_error: Option<String>,
    pub should_quit: bool,
}

impl App {
    /// `custom` replaces the catalog's default custom preset
    pub fn new(custom: Preset, sink: Box<dyn CueSink>, schedule: TickSchedule) -> Self {
        let mut presets = catalog();
        if let Some(last) = presets.last_mut() {
            *last = custom;
        }

        Self {
            timer: IntervalTimer::new(sink, Box::new(schedule)),
            presets,
            cursor: 0,
            custom_field: CustomField::Rounds,
            started_at: None,
            finished_at: None,
            last_error: None,
            should_quit: false,
        }
    }

    pub fn state(&self) -> AppState {
        match self.timer.status() {
            TimerStatus::Idle => AppState::PresetSelect,
            TimerStatus::Running | TimerStatus::Paused => AppState::Timer,
            TimerStatus::Finished => AppState::Finished,
        }
    }

    pub fn custom_preset(&self) -> &Preset {
        &self.presets[self.presets.len() - 1]
    }

    pub fn selected_index(&self) -> Option<usize> {
        let selected = self.timer.preset()?;
        self.presets.iter().position(|p| p.id == selected.id)
    }

    /// Highlight and select a preset by catalog id (CLI / config default)
    pub fn select_by_id(&mut self, id: &str) -> bool {
        match self.presets.iter().position(|p| p.id.eq_ignore_ascii_case(id)) {
            Some(idx) => {
                self.cursor = idx;
                self.select(idx)
            }
            None => false,
        }
    }

    pub fn select(&mut self, idx: usize) -> bool {
        match self.presets.get(idx) {
            Some(preset) => {
                self.cursor = idx;
                self.timer.select_preset(preset.clone())
            }
            None => false,
        }
    }

    pub fn handle(&mut self, event: TimerEvent) {
        match event {
            TimerEvent::Tick => self.on_tick(),
            TimerEvent::Key(key) => self.on_key(key),
            TimerEvent::Resize => {}
        }
    }

    pub fn on_tick(&mut self) {
        self.timer.tick();
        self.note_finish();
    }

    /// Start when idle, otherwise pause/resume
    pub fn toggle(&mut self) {
        let was_idle = self.timer.status() == TimerStatus::Idle;
        if was_idle && self.timer.preset().is_none() {
            self.select(self.cursor);
        }
        match self.timer.toggle() {
            Ok(()) => {
                self.last_error = None;
                if was_idle && self.timer.status() == TimerStatus::Running {
                    self.started_at = Some(Local::now());
                    self.finished_at = None;
                }
            }
            Err(e) => self.last_error = Some(e.to_string()),
        }
    }

    pub fn skip(&mut self) {
        self.timer.skip();
        self.note_finish();
    }

    pub fn reset(&mut self) {
        self.timer.reset();
        self.started_at = None;
        self.finished_at = None;
    }

    fn note_finish(&mut self) {
        if self.timer.status() == TimerStatus::Finished && self.finished_at.is_none() {
            self.finished_at = Some(Local::now());
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        let status = self.timer.status();
        match key.code {
            KeyCode::Char(' ') => self.toggle(),
            KeyCode::Char('r') | KeyCode::Char('R') => self.reset(),
            KeyCode::Esc => {
                if status != TimerStatus::Idle {
                    self.reset();
                } else if self.timer.preset().is_some() {
                    self.timer.clear_selection();
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::Right if status != TimerStatus::Idle => self.skip(),
            KeyCode::Char('q') if status == TimerStatus::Idle => self.should_quit = true,
            _ if status == TimerStatus::Idle => self.on_select_key(key),
            _ => {}
        }
    }

    fn on_select_key(&mut self, key: KeyEvent) {
        let last = self.presets.len() - 1;
        match key.code {
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(last),
            KeyCode::Up => self.cursor = self.cursor.saturating_sub(GRID_COLUMNS),
            KeyCode::Down => self.cursor = (self.cursor + GRID_COLUMNS).min(last),
            KeyCode::Enter => {
                self.select(self.cursor);
            }
            KeyCode::Char(c @ '1'..='9') => {
                let idx = c as usize - '1' as usize;
                self.select(idx);
            }
            KeyCode::Tab => {
                self.custom_field = match self.custom_field {
                    CustomField::Rounds => CustomField::RoundDuration,
                    CustomField::RoundDuration => CustomField::RestDuration,
                    CustomField::RestDuration => CustomField::Rounds,
                };
            }
            KeyCode::Char('+') | KeyCode::Char('=') => self.adjust_custom(true),
            KeyCode::Char('-') | KeyCode::Char('_') => self.adjust_custom(false),
            _ => {}
        }
    }

    /// Only the custom preset is adjustable, and only while it is selected
    pub fn adjust_custom(&mut self, up: bool) {
        let custom_selected = self.timer.preset().map(|p| p.is_custom()).unwrap_or(false);
        if !custom_selected || self.timer.status() != TimerStatus::Idle {
            return;
        }
        let idx = self.presets.len() - 1;
        self.presets[idx].adjust(self.custom_field, up);
        let updated = self.presets[idx].clone();
        self.timer.select_preset(updated);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cues::{Cue, Phase, RecordingSink};
    use crate::preset::MAX_CUSTOM_ROUND_SECS;
    use std::time::Duration;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn test_app() -> (App, RecordingSink, TickSchedule) {
        let sink = RecordingSink::new();
        let schedule = TickSchedule::new(Duration::from_secs(1));
        let app = App::new(
            Preset::custom(2, 20, 10),
            Box::new(sink.clone()),
            schedule.clone(),
        );
        (app, sink, schedule)
    }

    #[test]
    fn starts_on_preset_select_screen() {
        let (app, _, schedule) = test_app();
        assert_eq!(app.state(), AppState::PresetSelect);
        assert!(app.timer.preset().is_none());
        assert!(!schedule.is_armed());
        assert_eq!(app.custom_preset().rounds, 2);
    }

    #[test]
    fn space_selects_cursor_preset_and_starts() {
        let (mut app, sink, schedule) = test_app();
        app.on_key(key(KeyCode::Right));
        app.on_key(key(KeyCode::Char(' ')));
        assert_eq!(app.state(), AppState::Timer);
        assert_eq!(app.timer.preset().map(|p| p.id.as_str()), Some("boxing"));
        assert!(app.started_at.is_some());
        assert!(schedule.is_armed());
        assert_eq!(sink.take(), vec![Cue::PhaseStart(Phase::Work)]);
    }

    #[test]
    fn space_pauses_and_resumes() {
        let (mut app, _, schedule) = test_app();
        app.select_by_id("mma");
        app.on_key(key(KeyCode::Char(' ')));
        app.on_key(key(KeyCode::Char(' ')));
        assert_eq!(app.timer.status(), TimerStatus::Paused);
        assert!(!schedule.is_armed());
        app.on_key(key(KeyCode::Char(' ')));
        assert_eq!(app.timer.status(), TimerStatus::Running);
    }

    #[test]
    fn right_arrow_skips_while_active() {
        let (mut app, _, _) = test_app();
        app.select_by_id("mma");
        app.toggle();
        app.on_key(key(KeyCode::Right));
        let s = app.timer.session();
        assert!(s.is_rest_phase);
        assert_eq!(s.current_round, 2);
        assert_eq!(s.time_remaining_secs, 60);
    }

    #[test]
    fn escape_resets_then_clears_then_quits() {
        let (mut app, _, _) = test_app();
        app.select_by_id("bjj");
        app.toggle();
        app.on_key(key(KeyCode::Esc));
        assert_eq!(app.state(), AppState::PresetSelect);
        assert!(app.timer.preset().is_some());
        assert!(!app.should_quit);

        app.on_key(key(KeyCode::Esc));
        assert!(app.timer.preset().is_none());
        assert!(!app.should_quit);

        app.on_key(key(KeyCode::Esc));
        assert!(app.should_quit);
    }

    #[test]
    fn r_resets_finished_session() {
        let (mut app, _, _) = test_app();
        app.select(5);
        app.toggle();
        app.skip();
        app.skip();
        app.skip();
        assert_eq!(app.state(), AppState::Finished);
        assert!(app.finished_at.is_some());

        app.on_key(key(KeyCode::Char('r')));
        assert_eq!(app.state(), AppState::PresetSelect);
        assert_eq!(app.timer.session().time_remaining_secs, 20);
        assert!(app.finished_at.is_none());
    }

    #[test]
    fn ticks_drive_the_clock() {
        let (mut app, _, _) = test_app();
        app.select(5);
        app.toggle();
        for _ in 0..5 {
            app.handle(TimerEvent::Tick);
        }
        assert_eq!(app.timer.session().time_remaining_secs, 15);
    }

    #[test]
    fn number_keys_select_presets() {
        let (mut app, _, _) = test_app();
        app.on_key(key(KeyCode::Char('4')));
        assert_eq!(app.selected_index(), Some(3));
        assert_eq!(app.cursor, 3);
        app.on_key(key(KeyCode::Char('9')));
        assert_eq!(app.selected_index(), Some(3));
    }

    #[test]
    fn grid_navigation_is_clamped() {
        let (mut app, _, _) = test_app();
        app.on_key(key(KeyCode::Up));
        assert_eq!(app.cursor, 0);
        app.on_key(key(KeyCode::Down));
        assert_eq!(app.cursor, 3);
        app.on_key(key(KeyCode::Down));
        assert_eq!(app.cursor, 5);
        app.on_key(key(KeyCode::Left));
        assert_eq!(app.cursor, 4);
    }

    #[test]
    fn custom_preset_adjusts_only_when_selected() {
        let (mut app, _, _) = test_app();
        app.on_key(key(KeyCode::Char('+')));
        assert_eq!(app.custom_preset().rounds, 2);

        app.select(5);
        app.on_key(key(KeyCode::Char('+')));
        assert_eq!(app.custom_preset().rounds, 3);
        app.on_key(key(KeyCode::Tab));
        app.on_key(key(KeyCode::Char('+')));
        assert_eq!(app.custom_preset().round_duration_secs, 50);
        assert_eq!(app.timer.session().time_remaining_secs, 50);
        app.on_key(key(KeyCode::Tab));
        app.on_key(key(KeyCode::Char('-')));
        assert_eq!(app.custom_preset().rest_duration_secs, 0);
        assert_eq!(app.timer.preset().map(|p| p.rest_duration_secs), Some(0));
    }

    #[test]
    fn oversized_custom_round_steps_back_into_range() {
        let sink = RecordingSink::new();
        let mut app = App::new(
            Preset::custom(3, u32::MAX, 60),
            Box::new(sink),
            TickSchedule::new(Duration::from_secs(1)),
        );
        app.on_key(key(KeyCode::Char('6')));
        app.on_key(key(KeyCode::Tab));
        app.on_key(key(KeyCode::Char('+')));
        assert_eq!(app.custom_preset().round_duration_secs, MAX_CUSTOM_ROUND_SECS);
    }

    #[test]
    fn ctrl_c_quits_from_anywhere() {
        let (mut app, _, _) = test_app();
        app.select(0);
        app.toggle();
        app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }

    #[test]
    fn q_only_quits_when_idle() {
        let (mut app, _, _) = test_app();
        app.select(0);
        app.toggle();
        app.on_key(key(KeyCode::Char('q')));
        assert!(!app.should_quit);
        app.reset();
        app.on_key(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }
}
