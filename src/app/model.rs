//! Application model types: `PlayerState` and `PlaybackStatus`.
//!
//! `PlayerState` holds the fetched tracks, the current position in them and
//! the playback flags. It knows nothing about audio or rendering.

use rand::Rng;

use crate::library::Track;

/// Where playback stands, as observed through the media element.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum PlaybackStatus {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A source was assigned and playback requested; waiting for the outcome.
    Loading,
    Playing,
    Paused,
    /// The source played to its end.
    Ended,
    /// The last play request was rejected.
    Errored,
}

/// Inputs of the `PlaybackStatus` state machine.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// New source assigned and play requested.
    Load,
    /// A play request resolved.
    Started,
    Pause,
    /// Media reached its end.
    Finish,
    /// A play request was rejected.
    Fail,
}

impl PlaybackStatus {
    /// Next status after `t`.
    pub fn apply(self, t: Transition) -> Self {
        use PlaybackStatus::*;

        match (self, t) {
            (_, Transition::Load) => Loading,
            (_, Transition::Started) => Playing,
            (_, Transition::Fail) => Errored,
            (Idle, Transition::Pause) => Idle,
            (_, Transition::Pause) => Paused,
            (Playing, Transition::Finish) => Ended,
            (s, Transition::Finish) => s,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PlaybackStatus::Idle => "Idle",
            PlaybackStatus::Loading => "Loading",
            PlaybackStatus::Playing => "Playing",
            PlaybackStatus::Paused => "Paused",
            PlaybackStatus::Ended => "Ended",
            PlaybackStatus::Errored => "Error",
        }
    }
}

/// Playback state for the session.
#[derive(Debug, Clone)]
pub struct PlayerState {
    pub tracks: Vec<Track>,
    /// Index into `tracks`; always in range while `tracks` is non-empty.
    pub current_index: usize,
    /// Mirror of the media element's state, informational only.
    pub is_playing: bool,
    pub shuffle: bool,
    pub repeat: bool,
    pub status: PlaybackStatus,
    /// Last level handed to the media element.
    pub volume: f64,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            tracks: Vec::new(),
            current_index: 0,
            is_playing: false,
            shuffle: false,
            repeat: false,
            status: PlaybackStatus::Idle,
            volume: 1.0,
        }
    }
}

impl PlayerState {
    /// Replace the whole listing and rewind to its first entry.
    pub fn replace_tracks(&mut self, tracks: Vec<Track>) {
        self.tracks = tracks;
        self.current_index = 0;
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.tracks.get(self.current_index)
    }

    /// Index `Next` moves to: random when shuffling (the current track may
    /// come up again), otherwise the following one, wrapping at the end.
    /// `None` when there is nothing to play.
    pub fn next_index<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<usize> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }
        if self.shuffle {
            Some(rng.random_range(0..len))
        } else {
            Some((self.current_index + 1) % len)
        }
    }

    /// Index `Previous` moves to. Shuffle does not apply here.
    pub fn previous_index(&self) -> Option<usize> {
        let len = self.tracks.len();
        if len == 0 {
            return None;
        }
        Some((self.current_index + len - 1) % len)
    }

    pub fn toggle_shuffle(&mut self) {
        self.shuffle = !self.shuffle;
    }

    pub fn toggle_repeat(&mut self) {
        self.repeat = !self.repeat;
    }

    /// Feed `t` to the status machine and refresh `is_playing`.
    pub fn apply(&mut self, t: Transition) {
        self.status = self.status.apply(t);
        self.is_playing = self.status == PlaybackStatus::Playing;
    }
}
