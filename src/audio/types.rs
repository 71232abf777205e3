//! Audio-related small types and handles.
//!
//! This module defines the media element contract the controller drives,
//! the events it reacts to, and the command/handle types used between the
//! element facade and the audio thread.

use std::sync::{Arc, Mutex};

use thiserror::Error;

/// Token identifying one `play()` request, echoed back in its outcome event.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PlayRequest(pub u64);

/// Why a play request was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlaybackError {
    #[error("no source assigned")]
    NoSource,
    #[error("stream request failed: {0}")]
    Request(String),
    #[error("stream answered with status {0}")]
    Status(u16),
    #[error("could not decode stream: {0}")]
    Decode(String),
    #[error("audio output unavailable: {0}")]
    Output(String),
    #[error("audio thread is gone")]
    Disconnected,
    #[error("play request aborted by a later pause")]
    Aborted,
}

/// Notifications from the media element, in the order it emits them.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// A `play()` request resolved and audio is running.
    PlayStarted(PlayRequest),
    /// A `play()` request was rejected.
    PlayFailed(PlayRequest, PlaybackError),
    /// The duration of the current source became known.
    LoadedMetadata,
    /// Playback position advanced.
    TimeUpdate,
    /// The current source played to its end.
    Ended,
}

/// The playback primitive the controller drives: a source URL, a paused flag,
/// a position, an optional duration, a volume, and an event timeline.
///
/// `play()` only requests playback; the outcome arrives later as
/// `PlayStarted` or `PlayFailed` carrying the returned token.
pub trait MediaElement {
    /// Replace the source. Events the previous source had queued are dropped.
    fn set_src(&mut self, url: &str);
    fn play(&mut self) -> PlayRequest;
    fn pause(&mut self);
    fn paused(&self) -> bool;
    /// Current position in seconds.
    fn current_time(&self) -> f64;
    fn set_current_time(&mut self, secs: f64);
    /// Duration in seconds, `None` while unknown.
    fn duration(&self) -> Option<f64>;
    fn set_volume(&mut self, level: f64);
    /// Next pending event, if any.
    fn poll_event(&mut self) -> Option<MediaEvent>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum AudioCmd {
    /// Replace the source; stops whatever is playing. Events raised for it
    /// carry `generation`.
    Load { url: String, generation: u64 },
    /// Start or resume playback of the current source.
    Play(PlayRequest),
    /// Pause playback.
    Pause,
    /// Jump to the given position (seconds).
    Seek(f64),
    /// Set the output volume.
    SetVolume(f64),
    /// Stop and exit the audio thread.
    Quit,
}

/// An event stamped with the source generation it was raised for.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceEvent {
    pub generation: u64,
    pub event: MediaEvent,
}

/// Element state shared between the facade and the audio thread.
#[derive(Debug, Clone)]
pub struct MediaInfo {
    pub paused: bool,
    pub current_time: f64,
    pub duration: Option<f64>,
}

impl Default for MediaInfo {
    fn default() -> Self {
        Self {
            paused: true,
            current_time: 0.0,
            duration: None,
        }
    }
}

pub type MediaHandle = Arc<Mutex<MediaInfo>>;
