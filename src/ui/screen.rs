use ratatui::{buffer::Buffer, layout::Rect};

use crate::app::{App, AppState};

use super::{render_finished, render_preset_select, render_timer};

/// A UI Screen boundary: responsible for rendering one application state
pub trait Screen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

/// Preset grid plus the custom adjustment panel
pub struct PresetSelectScreen;

impl Screen for PresetSelectScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        render_preset_select(app, area, buf);
    }
}

/// Countdown while running or paused
pub struct TimerScreen;

impl Screen for TimerScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        render_timer(app, area, buf);
    }
}

pub struct FinishedScreen;

impl Screen for FinishedScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        render_finished(app, area, buf);
    }
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: AppState) -> Box<dyn Screen> {
    match state {
        AppState::PresetSelect => Box::new(PresetSelectScreen),
        AppState::Timer => Box::new(TimerScreen),
        AppState::Finished => Box::new(FinishedScreen),
    }
}
