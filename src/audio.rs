//! Audio playback: the `MediaElement` contract and its rodio-backed
//! implementation, which streams sources from the song server on a
//! dedicated thread.

mod backlog;
mod player;
mod sink;
mod thread;
mod types;

pub use player::StreamPlayer;
pub use types::{MediaElement, MediaEvent, PlayRequest, PlaybackError};
