use std::sync::mpsc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::app::{Controller, Gesture};
use crate::audio::MediaElement;
use crate::config;
use crate::ui;

use super::loader::ListingResult;

/// State tracked by the runtime event loop across iterations.
#[derive(Debug, Default)]
pub struct EventLoopState {
    /// Internal two-key prefix state used for `gg` handling.
    pub pending_gg: bool,
}

/// What a key press asks for.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum KeyAction {
    Quit,
    CursorDown,
    CursorUp,
    CursorTop,
    CursorBottom,
    Gesture(Gesture),
    Nothing,
}

/// Translate a key press into an action, tracking the `gg` prefix.
pub fn map_key(key: KeyEvent, settings: &config::Settings, state: &mut EventLoopState) -> KeyAction {
    if key.code == KeyCode::Char('g') {
        if state.pending_gg {
            state.pending_gg = false;
            return KeyAction::CursorTop;
        }
        state.pending_gg = true;
        return KeyAction::Nothing;
    }
    state.pending_gg = false;

    let scrub = settings.controls.scrub_seconds as f64;
    let step = settings.audio.volume_step;

    match key.code {
        KeyCode::Char('q') => KeyAction::Quit,
        KeyCode::Char('j') | KeyCode::Down => KeyAction::CursorDown,
        KeyCode::Char('k') | KeyCode::Up => KeyAction::CursorUp,
        KeyCode::Char('G') => KeyAction::CursorBottom,
        KeyCode::Enter => KeyAction::Gesture(Gesture::PlaySelected),
        KeyCode::Char('p') | KeyCode::Char(' ') => KeyAction::Gesture(Gesture::TogglePlayPause),
        KeyCode::Char('l') => KeyAction::Gesture(Gesture::Next),
        KeyCode::Char('h') => KeyAction::Gesture(Gesture::Previous),
        KeyCode::Char('s') => KeyAction::Gesture(Gesture::ToggleShuffle),
        KeyCode::Char('r') => KeyAction::Gesture(Gesture::ToggleRepeat),
        KeyCode::Char('L') | KeyCode::Right => KeyAction::Gesture(Gesture::ScrubBy(scrub)),
        KeyCode::Char('H') | KeyCode::Left => KeyAction::Gesture(Gesture::ScrubBy(-scrub)),
        KeyCode::Char('+') | KeyCode::Char('=') => KeyAction::Gesture(Gesture::VolumeBy(step)),
        KeyCode::Char('-') => KeyAction::Gesture(Gesture::VolumeBy(-step)),
        KeyCode::Char(c) if c.is_ascii_digit() => {
            let tenth = c.to_digit(10).unwrap_or(0) as f64;
            KeyAction::Gesture(Gesture::SeekTo(tenth * 10.0))
        }
        _ => KeyAction::Nothing,
    }
}

/// Apply `action` to the controller. Returns true when shutdown is requested.
pub fn apply_action<M: MediaElement>(action: KeyAction, controller: &mut Controller<M>) -> bool {
    match action {
        KeyAction::Quit => return true,
        KeyAction::CursorDown => controller.screen_mut().cursor_down(),
        KeyAction::CursorUp => controller.screen_mut().cursor_up(),
        KeyAction::CursorTop => controller.screen_mut().cursor_top(),
        KeyAction::CursorBottom => controller.screen_mut().cursor_bottom(),
        KeyAction::Gesture(g) => {
            controller.handle(g);
        }
        KeyAction::Nothing => {}
    }
    false
}

/// Main terminal event loop: applies the listing once it arrives, reacts to
/// media events, draws, and handles input. Returns `Ok(())` when shutdown is
/// requested.
pub fn run<M: MediaElement>(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    settings: &config::Settings,
    controller: &mut Controller<M>,
    listing: &mpsc::Receiver<ListingResult>,
    state: &mut EventLoopState,
) -> anyhow::Result<()> {
    loop {
        if let Ok(result) = listing.try_recv() {
            controller.apply_listing(result);
        }

        controller.pump_media_events();

        terminal.draw(|f| ui::draw(f, controller.screen(), &settings.ui, &settings.controls))?;

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let action = map_key(key, settings, state);
                if apply_action(action, controller) {
                    let last = controller.state().current_track().map(|t| t.title.as_str());
                    tracing::info!(?last, "quit requested");
                    break;
                }
            }
        }
    }

    Ok(())
}
