use std::fs;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::event_loop::{EventLoopState, KeyAction, map_key};
use super::settings::load_settings;
use crate::app::Gesture;
use crate::cli::Args;
use crate::config::Settings;

fn press(settings: &Settings, state: &mut EventLoopState, c: char) -> KeyAction {
    map_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE), settings, state)
}

#[test]
fn double_g_jumps_to_top() {
    let settings = Settings::default();
    let mut state = EventLoopState::default();

    assert_eq!(press(&settings, &mut state, 'g'), KeyAction::Nothing);
    assert!(state.pending_gg);
    assert_eq!(press(&settings, &mut state, 'g'), KeyAction::CursorTop);
    assert!(!state.pending_gg);
}

#[test]
fn other_keys_cancel_pending_g() {
    let settings = Settings::default();
    let mut state = EventLoopState::default();

    press(&settings, &mut state, 'g');
    assert_eq!(press(&settings, &mut state, 'j'), KeyAction::CursorDown);
    assert_eq!(press(&settings, &mut state, 'g'), KeyAction::Nothing);
}

#[test]
fn keys_map_to_gestures() {
    let mut settings = Settings::default();
    settings.controls.scrub_seconds = 10;
    settings.audio.volume_step = 0.1;
    let mut state = EventLoopState::default();

    assert_eq!(
        press(&settings, &mut state, ' '),
        KeyAction::Gesture(Gesture::TogglePlayPause)
    );
    assert_eq!(press(&settings, &mut state, 'l'), KeyAction::Gesture(Gesture::Next));
    assert_eq!(press(&settings, &mut state, 'h'), KeyAction::Gesture(Gesture::Previous));
    assert_eq!(
        press(&settings, &mut state, 'H'),
        KeyAction::Gesture(Gesture::ScrubBy(-10.0))
    );
    assert_eq!(
        press(&settings, &mut state, '-'),
        KeyAction::Gesture(Gesture::VolumeBy(-0.1))
    );
    assert_eq!(
        press(&settings, &mut state, '5'),
        KeyAction::Gesture(Gesture::SeekTo(50.0))
    );
    assert_eq!(press(&settings, &mut state, 'q'), KeyAction::Quit);
    assert_eq!(press(&settings, &mut state, 'x'), KeyAction::Nothing);
}

#[test]
fn command_line_server_wins_over_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[server]\nbase_url = \"http://from-file:5000\"\n").unwrap();

    let args = Args {
        server_url: Some("http://from-cli:8080".into()),
        config: Some(path),
        ..Args::default()
    };
    let (settings, problem) = load_settings(&args);

    assert!(problem.is_none(), "{problem:?}");
    assert_eq!(settings.server.base_url, "http://from-cli:8080");
}

#[test]
fn invalid_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[audio]\nvolume = 4.0\n").unwrap();

    let args = Args {
        server_url: Some("http://from-cli:8080".into()),
        config: Some(path),
        ..Args::default()
    };
    let (settings, problem) = load_settings(&args);

    assert!(problem.unwrap().contains("audio.volume"));
    assert_eq!(settings.audio.volume, 1.0);
    assert_eq!(settings.server.base_url, "http://from-cli:8080");
}
