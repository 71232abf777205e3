//! UI rendering helpers for the terminal user interface.
//!
//! The controller fills a `Screen`; `draw` lays out the configured panels
//! top to bottom and renders each one from it with `ratatui`.

mod screen;

pub use screen::*;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Padding, Paragraph, Wrap},
};

use crate::config::{ControlsSettings, Panel, UiSettings};

/// Format seconds as `M:SS`. Minutes are not rolled over into hours.
///
/// Anything that is not a finite, non-negative number renders as `0:00`.
pub fn format_time(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "0:00".to_string();
    }
    let total = seconds.floor() as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Render the controls help text, incorporating scrub seconds.
fn controls_text(scrub_seconds: u64) -> String {
    [
        "[j/k] up/down".to_string(),
        "[gg/G] top/bottom".to_string(),
        "[enter] play selected".to_string(),
        "[h/l] prev/next".to_string(),
        format!("[H/L] scrub -/+{}s", scrub_seconds),
        "[0-9] seek".to_string(),
        "[q] quit".to_string(),
    ]
    .join(" | ")
}

fn padded(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .padding(Padding {
            left: 1,
            right: 0,
            top: 0,
            bottom: 0,
        })
}

/// Rows each panel occupies; the track list takes whatever is left.
fn panel_constraint(panel: Panel) -> Constraint {
    match panel {
        Panel::Tracks => Constraint::Min(1),
        Panel::NowPlaying => Constraint::Length(4),
        Panel::Controls => Constraint::Length(4),
        _ => Constraint::Length(3),
    }
}

/// Render the entire UI into the provided `frame`.
pub fn draw(frame: &mut Frame, screen: &Screen, ui: &UiSettings, controls: &ControlsSettings) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(ui.panels.iter().map(|p| panel_constraint(*p)))
        .split(frame.area());

    for (panel, area) in ui.panels.iter().zip(chunks.iter()) {
        match panel {
            Panel::Header => draw_header(frame, *area, &ui.header_text, screen),
            Panel::NowPlaying => draw_now_playing(frame, *area, screen),
            Panel::Progress => draw_progress(frame, *area, screen),
            Panel::Tracks => draw_tracks(frame, *area, screen),
            Panel::Volume => draw_volume(frame, *area, screen),
            Panel::Controls => draw_controls(frame, *area, screen, controls),
            Panel::Modes => draw_modes(frame, *area, screen),
        }
    }
}

fn draw_header(frame: &mut Frame, area: Rect, text: &str, screen: &Screen) {
    let header = Paragraph::new(text).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" cadenza ")
            .title_alignment(Alignment::Center)
            .title_bottom(Line::from(format!(" {} ", screen.status.label())).right_aligned()),
    );
    frame.render_widget(header, area);
}

fn draw_now_playing(frame: &mut Frame, area: Rect, screen: &Screen) {
    let lines = match &screen.now_playing {
        Some(now) => vec![
            Line::from(now.headline.as_str().bold()),
            Line::from(now.detail.as_str().dim()),
        ],
        None => vec![Line::from("Nothing playing".dim())],
    };
    let par = Paragraph::new(lines)
        .block(padded(" now playing "))
        .wrap(Wrap { trim: true });
    frame.render_widget(par, area);
}

fn draw_progress(frame: &mut Frame, area: Rect, screen: &Screen) {
    let ratio = (screen.progress / 100.0).clamp(0.0, 1.0);
    let ratio = if ratio.is_finite() { ratio } else { 0.0 };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" progress "))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(ratio)
        .label(format!("{} / {}", screen.elapsed, screen.duration));
    frame.render_widget(gauge, area);
}

fn draw_tracks(frame: &mut Frame, area: Rect, screen: &Screen) {
    // Center the cursor when possible by creating a visible window.
    // Only build ListItems for the visible window.
    let total = screen.rows.len();
    let list_height = area.height.saturating_sub(2) as usize;
    let sel_pos = screen.cursor.min(total.saturating_sub(1));
    let (start, end, selected_pos_in_visible) = if total <= list_height || list_height == 0 {
        (0, total, sel_pos)
    } else {
        let half = list_height / 2;
        let mut start = sel_pos.saturating_sub(half);
        if start + list_height > total {
            start = total - list_height;
        }
        (start, start + list_height, sel_pos - start)
    };

    let playing = screen.now_playing.as_ref().map(|n| n.index);
    let visible_items: Vec<ListItem> = screen.rows[start..end]
        .iter()
        .map(|row| {
            let marker = if playing == Some(row.index) { "♪ " } else { "  " };
            let mut spans = vec![Span::raw(marker), Span::raw(row.headline.as_str()).bold()];
            if !row.detail.is_empty() {
                spans.push(Span::raw("  "));
                spans.push(row.detail.as_str().dim());
            }
            if let Some(length) = &row.length {
                spans.push(Span::raw(format!("  [{length}]")));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(visible_items)
        .block(Block::default().borders(Borders::ALL).title(" tracks "))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");
    let mut state = ListState::default();
    if total > 0 {
        state.select(Some(selected_pos_in_visible));
    }
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_volume(frame: &mut Frame, area: Rect, screen: &Screen) {
    let level = screen.volume.clamp(0.0, 1.0);
    let level = if level.is_finite() { level } else { 0.0 };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" volume [-/+] "))
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(level)
        .label(format!("{:.0}%", level * 100.0));
    frame.render_widget(gauge, area);
}

fn draw_controls(frame: &mut Frame, area: Rect, screen: &Screen, controls: &ControlsSettings) {
    let transport = Line::from(vec![
        Span::raw("⏮ [h]   "),
        Span::raw(screen.play_icon.glyph()).bold(),
        Span::raw(" [space]   ⏭ [l]"),
    ]);
    let help = Span::styled(
        controls_text(controls.scrub_seconds),
        Style::default().add_modifier(Modifier::DIM),
    );
    let par = Paragraph::new(vec![transport, Line::from(help)])
        .block(padded(" controls "))
        .wrap(Wrap { trim: true });
    frame.render_widget(par, area);
}

fn toggle_span(label: &'static str, active: bool) -> Span<'static> {
    if active {
        Span::styled(label, Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD))
    } else {
        Span::styled(label, Style::default().add_modifier(Modifier::DIM))
    }
}

fn draw_modes(frame: &mut Frame, area: Rect, screen: &Screen) {
    let line = Line::from(vec![
        toggle_span(" [s] shuffle ", screen.shuffle_active),
        Span::raw("  "),
        toggle_span(" [r] repeat ", screen.repeat_active),
    ]);
    frame.render_widget(Paragraph::new(line).block(padded(" modes ")), area);
}

#[cfg(test)]
mod tests;
