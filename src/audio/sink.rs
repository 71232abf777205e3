//! Utilities for turning a stream URL into a playable `rodio` sink.
//!
//! Sources are downloaded in full, kept in memory, and decoded from there so
//! that seeking can rebuild the sink at any position.

use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use rodio::{Decoder, OutputStream, Sink, Source};

use super::types::PlaybackError;

/// Encoded audio for the current source.
pub(super) type StreamBytes = Arc<[u8]>;

/// Download the full resource behind `url`.
pub(super) fn fetch_stream(
    client: &reqwest::blocking::Client,
    url: &str,
) -> Result<StreamBytes, PlaybackError> {
    let response = client
        .get(url)
        .send()
        .map_err(|e| PlaybackError::Request(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(PlaybackError::Status(status.as_u16()));
    }

    let body = response
        .bytes()
        .map_err(|e| PlaybackError::Request(e.to_string()))?;
    Ok(Arc::from(body.as_ref()))
}

fn decode(bytes: &StreamBytes) -> Result<Decoder<Cursor<StreamBytes>>, PlaybackError> {
    Decoder::new(Cursor::new(bytes.clone())).map_err(|e| PlaybackError::Decode(e.to_string()))
}

/// Work out the length of `bytes`.
///
/// Uses the container's own duration when it has one, otherwise decodes the
/// whole stream and counts samples.
pub(super) fn probe_duration(bytes: &StreamBytes) -> Result<Option<Duration>, PlaybackError> {
    let decoder = decode(bytes)?;
    if let Some(d) = decoder.total_duration() {
        return Ok(Some(d));
    }

    let channels = decoder.channels() as f64;
    let rate = decoder.sample_rate() as f64;
    if channels == 0.0 || rate == 0.0 {
        return Ok(None);
    }
    let samples = decoder.count() as f64;
    Ok(Some(Duration::from_secs_f64(samples / (channels * rate))))
}

/// Create a paused `Sink` for `bytes` that starts playback at `start_at`.
pub(super) fn create_sink_at(
    stream: &OutputStream,
    bytes: &StreamBytes,
    start_at: Duration,
    volume: f32,
) -> Result<Sink, PlaybackError> {
    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    let source = decode(bytes)?.skip_duration(start_at);

    let sink = Sink::connect_new(stream.mixer());
    sink.set_volume(volume);
    sink.append(source);
    sink.pause();
    Ok(sink)
}
