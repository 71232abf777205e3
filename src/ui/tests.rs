use ratatui::{Terminal, backend::TestBackend};

use super::*;
use crate::config::{ControlsSettings, Panel, UiSettings};

#[test]
fn format_time_pads_seconds() {
    assert_eq!(format_time(125.0), "2:05");
    assert_eq!(format_time(59.0), "0:59");
    assert_eq!(format_time(0.0), "0:00");
    assert_eq!(format_time(61.9), "1:01");
}

#[test]
fn format_time_keeps_counting_minutes_past_an_hour() {
    assert_eq!(format_time(3605.0), "60:05");
}

#[test]
fn format_time_rejects_nonsense() {
    assert_eq!(format_time(f64::NAN), "0:00");
    assert_eq!(format_time(f64::INFINITY), "0:00");
    assert_eq!(format_time(-3.0), "0:00");
}

fn rows(n: usize) -> Vec<TrackRow> {
    (0..n)
        .map(|index| TrackRow {
            index,
            headline: format!("Song {index}"),
            detail: String::new(),
            length: None,
        })
        .collect()
}

#[test]
fn cursor_wraps_both_ways() {
    let mut screen = Screen {
        rows: rows(3),
        ..Screen::default()
    };

    screen.cursor_up();
    assert_eq!(screen.cursor, 2);
    screen.cursor_down();
    assert_eq!(screen.cursor, 0);
    screen.cursor_bottom();
    assert_eq!(screen.selected_row().map(|r| r.index), Some(2));
    screen.cursor_top();
    assert_eq!(screen.cursor, 0);
}

#[test]
fn cursor_on_empty_list_stays_put() {
    let mut screen = Screen::default();
    screen.cursor_down();
    screen.cursor_up();
    screen.cursor_bottom();
    assert_eq!(screen.cursor, 0);
    assert!(screen.selected_row().is_none());
}

#[test]
fn focus_track_moves_cursor_to_bound_row() {
    let mut screen = Screen {
        rows: rows(4),
        ..Screen::default()
    };
    screen.focus_track(3);
    assert_eq!(screen.cursor, 3);
    screen.focus_track(9);
    assert_eq!(screen.cursor, 3);
}

fn render(screen: &Screen, ui: &UiSettings) -> String {
    let mut terminal = Terminal::new(TestBackend::new(120, 40)).unwrap();
    terminal
        .draw(|f| draw(f, screen, ui, &ControlsSettings::default()))
        .unwrap();
    terminal
        .backend()
        .buffer()
        .content()
        .iter()
        .map(|cell| cell.symbol())
        .collect()
}

#[test]
fn draw_renders_configured_panels() {
    let screen = Screen {
        rows: rows(2),
        now_playing: Some(NowPlaying {
            index: 1,
            headline: "Song 1".into(),
            detail: "Someone - Somewhere".into(),
        }),
        elapsed: "1:02".into(),
        duration: "3:30".into(),
        ..Screen::default()
    };

    let out = render(&screen, &UiSettings::default());

    assert!(out.contains("~ cadenza ~"));
    assert!(out.contains("Song 0"));
    assert!(out.contains("Someone - Somewhere"));
    assert!(out.contains("1:02 / 3:30"));
    assert!(out.contains("scrub -/+5s"));
    assert!(out.contains("shuffle"));
}

#[test]
fn draw_skips_panels_not_configured() {
    let ui = UiSettings {
        panels: vec![Panel::NowPlaying, Panel::Tracks],
        ..UiSettings::default()
    };

    let out = render(&Screen::default(), &ui);

    assert!(out.contains("Nothing playing"));
    assert!(!out.contains("volume"));
    assert!(!out.contains("progress"));
    assert!(!out.contains("shuffle"));
}
