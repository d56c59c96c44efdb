pub mod digits;
pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
};

use crate::{
    app::{App, GRID_COLUMNS},
    engine::TimerStatus,
    preset::{format_clock, format_duration, Accent, CustomField, Preset},
};

use digits::{big_text, big_text_width, GLYPH_HEIGHT};
use screen::{current_screen, Screen};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

const REST_COLOR: Color = Color::Rgb(0x10, 0xB9, 0x81);
const LOW_TIME_COLOR: Color = Color::Rgb(0xEF, 0x44, 0x44);
const LOW_TIME_SECS: u32 = 10;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        current_screen(self.state()).render(self, area, buf);
    }
}

fn accent_color(accent: Accent) -> Color {
    Color::Rgb(accent.0, accent.1, accent.2)
}

fn hints(text: &str) -> Paragraph<'_> {
    Paragraph::new(text)
        .style(
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )
        .alignment(Alignment::Center)
}

pub fn render_preset_select(app: &App, area: Rect, buf: &mut Buffer) {
    let custom_selected = app.timer.preset().map(Preset::is_custom).unwrap_or(false);
    let rows = app.presets.len().div_ceil(GRID_COLUMNS) as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(3),                                     // title
            Constraint::Length(rows * 6),                              // grid
            Constraint::Length(if custom_selected { 5 } else { 0 }),  // custom panel
            Constraint::Min(0),
            Constraint::Length(1), // error
            Constraint::Length(1), // hints
        ])
        .split(area);

    Paragraph::new(vec![
        Line::from(Span::styled(
            "GYM TIMER",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "choose a discipline",
            Style::default().fg(Color::Yellow),
        )),
    ])
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(6); rows as usize])
        .split(chunks[1]);

    let selected = app.selected_index();
    for (row, row_area) in row_areas.iter().enumerate() {
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, GRID_COLUMNS as u32); GRID_COLUMNS])
            .split(*row_area);

        for (col, cell) in cells.iter().enumerate() {
            let idx = row * GRID_COLUMNS + col;
            if let Some(preset) = app.presets.get(idx) {
                render_preset_card(
                    preset,
                    idx,
                    idx == app.cursor,
                    selected == Some(idx),
                    *cell,
                    buf,
                );
            }
        }
    }

    if custom_selected {
        render_custom_panel(app, chunks[2], buf);
    }

    if let Some(err) = &app.last_error {
        Paragraph::new(err.as_str())
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center)
            .render(chunks[4], buf);
    }

    let footer = if selected.is_some() {
        "(space) start | (←→↑↓) move | (enter) select | (esc) clear | (q) quit"
    } else {
        "(space) start | (←→↑↓) move | (enter)/(1-6) select | (q)uit"
    };
    hints(footer).render(chunks[5], buf);
}

fn render_preset_card(
    preset: &Preset,
    idx: usize,
    has_cursor: bool,
    is_selected: bool,
    area: Rect,
    buf: &mut Buffer,
) {
    let accent = accent_color(preset.accent);
    let mut border_style = Style::default().fg(if has_cursor { accent } else { Color::DarkGray });
    if is_selected {
        border_style = border_style.add_modifier(Modifier::BOLD);
    }

    let marker = if is_selected { " ●" } else { "" };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(if is_selected {
            BorderType::Thick
        } else {
            BorderType::Rounded
        })
        .border_style(border_style)
        .title(Line::from(vec![
            Span::styled(
                format!(" {} {} ", idx + 1, preset.name),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled(marker, Style::default().fg(accent)),
        ]));

    let label = Style::default().fg(Color::DarkGray);
    let value = Style::default().add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::from(vec![
            Span::styled("Rounds  ", label),
            Span::styled(preset.rounds.to_string(), value),
        ]),
        Line::from(vec![
            Span::styled("Round   ", label),
            Span::styled(format_duration(preset.round_duration_secs), value),
        ]),
        Line::from(vec![
            Span::styled("Rest    ", label),
            Span::styled(format_duration(preset.rest_duration_secs), value),
        ]),
        Line::from(Span::styled(
            preset.short_name.as_str(),
            Style::default().fg(accent),
        )),
    ];

    Paragraph::new(lines).block(block).render(area, buf);
}

fn render_custom_panel(app: &App, area: Rect, buf: &mut Buffer) {
    let custom = app.custom_preset();
    let fields = [
        (CustomField::Rounds, "ROUNDS", custom.rounds.to_string()),
        (
            CustomField::RoundDuration,
            "ROUND TIME",
            format_clock(custom.round_duration_secs),
        ),
        (
            CustomField::RestDuration,
            "REST TIME",
            format_clock(custom.rest_duration_secs),
        ),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" custom: (tab) field | (+/-) adjust ");
    let inner = block.inner(area);
    block.render(area, buf);

    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3); 3])
        .split(inner);

    for ((field, label, value), col) in fields.into_iter().zip(cols.iter()) {
        let focused = field == app.custom_field;
        let value_style = if focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };
        Paragraph::new(vec![
            Line::from(Span::styled(label, Style::default().fg(Color::DarkGray))),
            Line::from(Span::styled(
                if focused {
                    format!("- {} +", value)
                } else {
                    value
                },
                value_style,
            )),
        ])
        .alignment(Alignment::Center)
        .render(*col, buf);
    }
}

pub fn render_timer(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(preset) = app.timer.preset() else {
        return;
    };
    let session = app.timer.session();
    let is_rest = session.is_rest_phase;
    let low_time = !is_rest && session.time_remaining_secs <= LOW_TIME_SECS;

    let display_color = if is_rest {
        REST_COLOR
    } else if low_time {
        LOW_TIME_COLOR
    } else {
        accent_color(preset.accent)
    };

    let clock = format_clock(session.time_remaining_secs);
    let big = big_text(&clock);
    let use_big = (big_text_width(&big) as u16) <= area.width.saturating_sub(HORIZONTAL_MARGIN * 2)
        && area.height >= (GLYPH_HEIGHT as u16 + 10);
    let clock_height = if use_big { GLYPH_HEIGHT as u16 } else { 1 };

    let content_height = 3 + 1 + clock_height + 2;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Length(area.height.saturating_sub(content_height + 1) / 2),
            Constraint::Length(3),            // phase + round
            Constraint::Length(1),            // spacer
            Constraint::Length(clock_height), // clock
            Constraint::Length(2),            // status
            Constraint::Min(0),
            Constraint::Length(1), // hints
        ])
        .split(area);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    Paragraph::new(vec![
        Line::from(Span::styled(
            if is_rest { "R E S T" } else { "R O U N D" },
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(vec![
            Span::styled(
                session.current_round.to_string(),
                bold.fg(display_color),
            ),
            Span::styled(" / ", Style::default().fg(Color::DarkGray)),
            Span::styled(preset.rounds.to_string(), Style::default().fg(Color::Gray)),
        ]),
    ])
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    let clock_lines: Vec<Line> = if use_big {
        big.into_iter().map(Line::from).collect()
    } else {
        vec![Line::from(clock)]
    };
    Paragraph::new(clock_lines)
        .style(bold.fg(display_color))
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

    let status = match (app.timer.status(), is_rest) {
        (TimerStatus::Paused, _) => Span::styled("PAUSED", Style::default().fg(Color::Gray)),
        (_, true) => Span::styled("Recover", Style::default().fg(REST_COLOR)),
        (_, false) => Span::styled(
            preset.name.as_str(),
            Style::default().fg(accent_color(preset.accent)),
        ),
    };
    Paragraph::new(Line::from(status))
        .alignment(Alignment::Center)
        .render(chunks[4], buf);

    hints("(space) play/pause | (→) skip | (r) reset | (esc) stop").render(chunks[6], buf);
}

pub fn render_finished(app: &App, area: Rect, buf: &mut Buffer) {
    let Some(preset) = app.timer.preset() else {
        return;
    };
    let accent = accent_color(preset.accent);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .constraints([
            Constraint::Percentage(35),
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    Paragraph::new(Span::styled(
        "F I G H T !",
        Style::default().fg(accent).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    let mut summary = vec![Line::from(format!(
        "{} rounds of {} completed",
        preset.rounds,
        format_duration(preset.round_duration_secs)
    ))];
    if let (Some(start), Some(end)) = (app.started_at, app.finished_at) {
        summary.push(Line::from(Span::styled(
            format!("{} – {}", start.format("%H:%M"), end.format("%H:%M")),
            Style::default().fg(Color::DarkGray),
        )));
    }
    Paragraph::new(summary)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(chunks[2], buf);

    hints("(r) new session | (esc) back").render(chunks[4], buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cues::SilentSink;
    use crate::runtime::TickSchedule;
    use std::time::Duration;

    fn test_app() -> App {
        App::new(
            Preset::custom(3, 180, 60),
            Box::new(SilentSink),
            TickSchedule::new(Duration::from_secs(1)),
        )
    }

    fn rendered(app: &App, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn preset_screen_lists_catalog() {
        let app = test_app();
        let out = rendered(&app, 120, 30);
        assert!(out.contains("GYM TIMER"));
        assert!(out.contains("Boxing"));
        assert!(out.contains("Muay Thai"));
        assert!(out.contains("5 min"));
    }

    #[test]
    fn custom_panel_shows_when_custom_selected() {
        let mut app = test_app();
        assert!(!rendered(&app, 120, 30).contains("ROUND TIME"));
        app.select(5);
        let out = rendered(&app, 120, 30);
        assert!(out.contains("ROUND TIME"));
        assert!(out.contains("3:00"));
    }

    #[test]
    fn timer_screen_shows_round_and_big_clock() {
        let mut app = test_app();
        app.select_by_id("mma");
        app.toggle();
        let out = rendered(&app, 100, 30);
        assert!(out.contains("R O U N D"));
        assert!(out.contains("1 / 3"));
        assert!(out.contains('█'));
    }

    #[test]
    fn timer_screen_falls_back_to_plain_clock_when_small() {
        let mut app = test_app();
        app.select_by_id("mma");
        app.toggle();
        let out = rendered(&app, 30, 12);
        assert!(out.contains("5:00"));
        assert!(!out.contains('█'));
    }

    #[test]
    fn paused_and_rest_labels() {
        let mut app = test_app();
        app.select_by_id("mma");
        app.toggle();
        app.toggle();
        assert!(rendered(&app, 100, 30).contains("PAUSED"));

        app.skip();
        let out = rendered(&app, 100, 30);
        assert!(out.contains("R E S T"));
        assert!(out.contains("Recover"));
        assert!(out.contains("2 / 3"));
    }

    #[test]
    fn finished_screen_summary() {
        let mut app = test_app();
        app.select_by_id("mma");
        app.toggle();
        for _ in 0..5 {
            app.skip();
        }
        let out = rendered(&app, 100, 30);
        assert!(out.contains("F I G H T !"));
        assert!(out.contains("3 rounds of 5 min completed"));
    }
}
