//! The content of every mount point, as plain data.
//!
//! The controller writes into a `Screen`; `ui::draw` maps it to widgets.

use crate::app::PlaybackStatus;

/// Icon shown on the play/pause affordance.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum PlayIcon {
    /// Pressing it would start playback.
    #[default]
    Play,
    /// Pressing it would pause playback.
    Pause,
}

impl PlayIcon {
    pub fn glyph(self) -> &'static str {
        match self {
            PlayIcon::Play => "▶",
            PlayIcon::Pause => "⏸",
        }
    }
}

/// One rendered entry of the track list, bound to the track it plays.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackRow {
    pub index: usize,
    pub headline: String,
    pub detail: String,
    /// Formatted length when the listing carries one.
    pub length: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NowPlaying {
    /// Track the display refers to.
    pub index: usize,
    pub headline: String,
    pub detail: String,
}

#[derive(Debug, Clone)]
pub struct Screen {
    pub rows: Vec<TrackRow>,
    /// Position of the highlighted row.
    pub cursor: usize,
    pub now_playing: Option<NowPlaying>,
    pub play_icon: PlayIcon,
    pub shuffle_active: bool,
    pub repeat_active: bool,
    /// Seek bar position in `[0, 100]`.
    pub progress: f64,
    pub elapsed: String,
    pub duration: String,
    pub volume: f64,
    pub status: PlaybackStatus,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            cursor: 0,
            now_playing: None,
            play_icon: PlayIcon::Play,
            shuffle_active: false,
            repeat_active: false,
            progress: 0.0,
            elapsed: "0:00".to_string(),
            duration: "0:00".to_string(),
            volume: 1.0,
            status: PlaybackStatus::Idle,
        }
    }
}

impl Screen {
    pub fn selected_row(&self) -> Option<&TrackRow> {
        self.rows.get(self.cursor)
    }

    /// Move the cursor onto the row bound to track `index`, if rendered.
    pub fn focus_track(&mut self, index: usize) {
        if let Some(pos) = self.rows.iter().position(|r| r.index == index) {
            self.cursor = pos;
        }
    }

    /// Move the cursor down, wrapping to the first row.
    pub fn cursor_down(&mut self) {
        if !self.rows.is_empty() {
            self.cursor = (self.cursor + 1) % self.rows.len();
        }
    }

    /// Move the cursor up, wrapping to the last row.
    pub fn cursor_up(&mut self) {
        if !self.rows.is_empty() {
            self.cursor = (self.cursor + self.rows.len() - 1) % self.rows.len();
        }
    }

    pub fn cursor_top(&mut self) {
        self.cursor = 0;
    }

    pub fn cursor_bottom(&mut self) {
        self.cursor = self.rows.len().saturating_sub(1);
    }
}
