//! The player controller.
//!
//! Owns the `PlayerState`, drives a `MediaElement`, and writes everything the
//! user sees into a `Screen`. Every entry point is infallible: failures are
//! logged and the view is left as it was.

use std::collections::HashMap;
use std::fmt;

use rand::SeedableRng;
use rand::rngs::StdRng;
use thiserror::Error;

use crate::audio::{MediaElement, MediaEvent, PlayRequest, PlaybackError};
use crate::config::Panel;
use crate::library::{Endpoints, FetchError, RowFormat, Track};
use crate::ui::{NowPlaying, PlayIcon, Screen, TrackRow, format_time};

use super::model::{PlayerState, Transition};

/// A place the controller must be able to read from or write to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MountPoint {
    AudioOutput,
    TrackList,
    NowPlaying,
}

impl fmt::Display for MountPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MountPoint::AudioOutput => "audio output",
            MountPoint::TrackList => "tracks panel",
            MountPoint::NowPlaying => "now-playing panel",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InitError {
    #[error("required mount point `{0}` not found")]
    MissingMount(MountPoint),
}

/// A user action, independent of the key or button that produced it.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Gesture {
    /// Activate the play affordance of a rendered row (by row position).
    PlayRow(usize),
    /// Activate the row under the cursor.
    PlaySelected,
    TogglePlayPause,
    Next,
    Previous,
    ToggleShuffle,
    ToggleRepeat,
    /// Drag the seek bar to a position in `[0, 100]`.
    SeekTo(f64),
    /// Move the playback position by some seconds.
    ScrubBy(f64),
    /// Nudge the volume control.
    VolumeBy(f64),
}

impl Gesture {
    /// Panel hosting the affordance for this gesture.
    pub fn panel(self) -> Panel {
        match self {
            Gesture::PlayRow(_) | Gesture::PlaySelected => Panel::Tracks,
            Gesture::TogglePlayPause | Gesture::Next | Gesture::Previous => Panel::Controls,
            Gesture::ToggleShuffle | Gesture::ToggleRepeat => Panel::Modes,
            Gesture::SeekTo(_) | Gesture::ScrubBy(_) => Panel::Progress,
            Gesture::VolumeBy(_) => Panel::Volume,
        }
    }
}

pub struct Controller<M: MediaElement> {
    media: M,
    state: PlayerState,
    screen: Screen,
    panels: Vec<Panel>,
    endpoints: Endpoints,
    format: RowFormat,
    /// Play requests still waiting for an outcome, by the track they were for.
    pending: HashMap<PlayRequest, usize>,
    rng: StdRng,
}

impl<M: MediaElement> Controller<M> {
    /// Wire a controller to its mount points.
    ///
    /// `media` is `None` when no audio output could be opened. Fails without
    /// touching anything if the audio output, the tracks panel or the
    /// now-playing panel is missing.
    pub fn init(media: Option<M>, panels: &[Panel], endpoints: Endpoints) -> Result<Self, InitError> {
        let media = media.ok_or(InitError::MissingMount(MountPoint::AudioOutput))?;
        for (panel, mount) in [
            (Panel::Tracks, MountPoint::TrackList),
            (Panel::NowPlaying, MountPoint::NowPlaying),
        ] {
            if !panels.contains(&panel) {
                return Err(InitError::MissingMount(mount));
            }
        }

        Ok(Self {
            media,
            state: PlayerState::default(),
            screen: Screen::default(),
            panels: panels.to_vec(),
            endpoints,
            format: RowFormat::default(),
            pending: HashMap::new(),
            rng: StdRng::from_os_rng(),
        })
    }

    pub fn with_row_format(mut self, format: RowFormat) -> Self {
        self.format = format;
        self
    }

    /// Start with the given shuffle/repeat flags.
    pub fn with_modes(mut self, shuffle: bool, repeat: bool) -> Self {
        self.state.shuffle = shuffle;
        self.state.repeat = repeat;
        self.screen.shuffle_active = shuffle;
        self.screen.repeat_active = repeat;
        self
    }

    /// Start at `level` and hand it to the media element.
    pub fn with_volume(mut self, level: f64) -> Self {
        self.set_volume(level);
        self
    }

    /// Use a fixed random source for shuffle.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    pub fn screen_mut(&mut self) -> &mut Screen {
        &mut self.screen
    }

    #[cfg(test)]
    pub fn media(&self) -> &M {
        &self.media
    }

    pub fn media_mut(&mut self) -> &mut M {
        &mut self.media
    }

    pub fn has_panel(&self, panel: Panel) -> bool {
        self.panels.contains(&panel)
    }

    /// Fetch the listing from `service` and apply it, blocking until it answers.
    ///
    /// The terminal runtime fetches off-thread and calls `apply_listing`.
    #[cfg(test)]
    pub fn load_tracks(&mut self, service: &dyn crate::library::SongService) {
        let result = service.list_songs();
        self.apply_listing(result);
    }

    /// Apply the outcome of a listing request.
    ///
    /// On success the track list is replaced and re-rendered; now-playing
    /// follows its track into the new list by title, or is cleared. On
    /// failure the error is logged and the view stays as it was.
    pub fn apply_listing(&mut self, result: Result<Vec<Track>, FetchError>) {
        match result {
            Ok(tracks) => {
                tracing::info!(count = tracks.len(), "track list replaced");
                let playing = self
                    .screen
                    .now_playing
                    .take()
                    .and_then(|now| self.state.tracks.get(now.index))
                    .map(|track| track.title.clone());

                self.state.replace_tracks(tracks);
                self.pending.clear();
                self.render_rows();

                let found = playing
                    .and_then(|title| self.state.tracks.iter().position(|t| t.title == title));
                if let Some(index) = found {
                    self.state.current_index = index;
                    self.show_now_playing(index);
                }
            }
            Err(e) => tracing::error!(error = %e, "error fetching songs"),
        }
    }

    fn show_now_playing(&mut self, index: usize) {
        if let Some(track) = self.state.tracks.get(index) {
            self.screen.now_playing = Some(NowPlaying {
                index,
                headline: self.format.headline(track),
                detail: self.format.detail(track),
            });
        }
    }

    fn render_rows(&mut self) {
        self.screen.rows = self
            .state
            .tracks
            .iter()
            .enumerate()
            .map(|(index, track)| TrackRow {
                index,
                headline: self.format.headline(track),
                detail: self.format.detail(track),
                length: track.duration.map(format_time),
            })
            .collect();
        self.screen.cursor = 0;
    }

    /// Start playing track `index`.
    ///
    /// The view only changes once the media element reports the request
    /// started; `current_index` moves immediately and is never rolled back.
    pub fn play(&mut self, index: usize) {
        let Some(track) = self.state.tracks.get(index) else {
            tracing::warn!(index, len = self.state.tracks.len(), "play index out of range");
            return;
        };

        let url = self.endpoints.stream(&track.title);
        tracing::debug!(index, %url, "play");

        self.state.current_index = index;
        // Outcomes for the previous source are dropped along with it.
        self.pending.clear();
        self.media.set_src(&url);
        let request = self.media.play();
        self.pending.insert(request, index);
        self.state.apply(Transition::Load);
        self.sync_status();
    }

    pub fn toggle_play_pause(&mut self) {
        if self.media.paused() {
            // Resume: the outcome is only reflected through the status.
            let _ = self.media.play();
            self.screen.play_icon = PlayIcon::Pause;
            self.state.is_playing = true;
        } else {
            self.media.pause();
            self.screen.play_icon = PlayIcon::Play;
            self.state.apply(Transition::Pause);
        }
        self.sync_status();
    }

    pub fn next(&mut self) {
        if let Some(i) = self.state.next_index(&mut self.rng) {
            self.state.current_index = i;
            self.play(i);
        }
    }

    pub fn previous(&mut self) {
        if let Some(i) = self.state.previous_index() {
            self.state.current_index = i;
            self.play(i);
        }
    }

    pub fn toggle_shuffle(&mut self) {
        self.state.toggle_shuffle();
        self.screen.shuffle_active = self.state.shuffle;
    }

    pub fn toggle_repeat(&mut self) {
        self.state.toggle_repeat();
        self.screen.repeat_active = self.state.repeat;
    }

    /// Jump to `fraction` percent of the track. No-op while the duration is unknown.
    pub fn seek_to(&mut self, fraction: f64) {
        match known_duration(self.media.duration()) {
            Some(d) => self.media.set_current_time(d * fraction / 100.0),
            None => tracing::debug!(fraction, "seek ignored, duration unknown"),
        }
    }

    /// Hand `level` to the media element as-is.
    pub fn set_volume(&mut self, level: f64) {
        self.media.set_volume(level);
        self.state.volume = level;
        self.screen.volume = level;
    }

    /// React to one event from the media element.
    pub fn on_media_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::PlayStarted(request) => {
                let index = self.pending.remove(&request);
                if self.media.paused() {
                    // Paused again before the start was reported.
                    tracing::debug!(?index, "play started after pause, ignoring");
                } else {
                    self.state.apply(Transition::Started);
                    if let Some(index) = index {
                        self.show_now_playing(index);
                        self.screen.focus_track(index);
                        self.screen.play_icon = PlayIcon::Pause;
                    }
                }
            }
            MediaEvent::PlayFailed(request, PlaybackError::Aborted) => {
                let index = self.pending.remove(&request);
                tracing::debug!(?index, "play request aborted");
            }
            MediaEvent::PlayFailed(request, error) => {
                let index = self.pending.remove(&request);
                tracing::error!(?index, error = %error, "error playing song");
                self.state.apply(Transition::Fail);
            }
            MediaEvent::TimeUpdate => {
                let current = self.media.current_time();
                self.screen.progress = match known_duration(self.media.duration()) {
                    Some(d) => current / d * 100.0,
                    None => 0.0,
                };
                self.screen.elapsed = format_time(current);
            }
            MediaEvent::LoadedMetadata => {
                self.screen.duration = format_time(self.media.duration().unwrap_or(0.0));
            }
            MediaEvent::Ended => {
                self.state.apply(Transition::Finish);
                if self.state.repeat {
                    self.play(self.state.current_index);
                } else {
                    self.next();
                }
            }
        }
        self.sync_status();
    }

    /// Drain and handle every event the media element has queued.
    pub fn pump_media_events(&mut self) -> usize {
        let mut handled = 0;
        while let Some(event) = self.media.poll_event() {
            self.on_media_event(event);
            handled += 1;
        }
        handled
    }

    /// Dispatch a user gesture. Returns false when its affordance is not
    /// mounted, in which case nothing happens.
    pub fn handle(&mut self, gesture: Gesture) -> bool {
        if !self.has_panel(gesture.panel()) {
            tracing::debug!(?gesture, "no affordance mounted for gesture");
            return false;
        }

        match gesture {
            Gesture::PlayRow(pos) => {
                if let Some(index) = self.screen.rows.get(pos).map(|r| r.index) {
                    self.play(index);
                }
            }
            Gesture::PlaySelected => {
                if let Some(index) = self.screen.selected_row().map(|r| r.index) {
                    self.play(index);
                }
            }
            Gesture::TogglePlayPause => self.toggle_play_pause(),
            Gesture::Next => self.next(),
            Gesture::Previous => self.previous(),
            Gesture::ToggleShuffle => self.toggle_shuffle(),
            Gesture::ToggleRepeat => self.toggle_repeat(),
            Gesture::SeekTo(fraction) => self.seek_to(fraction),
            Gesture::ScrubBy(secs) => {
                if let Some(d) = known_duration(self.media.duration()) {
                    let target = (self.media.current_time() + secs).clamp(0.0, d);
                    self.seek_to(target / d * 100.0);
                }
            }
            Gesture::VolumeBy(delta) => {
                // The control itself is bounded to [0, 1].
                let level = (self.state.volume + delta).clamp(0.0, 1.0);
                self.set_volume(level);
            }
        }
        true
    }

    fn sync_status(&mut self) {
        self.screen.status = self.state.status;
    }
}

/// A duration usable for arithmetic: known, finite and positive.
fn known_duration(d: Option<f64>) -> Option<f64> {
    d.filter(|d| d.is_finite() && *d > 0.0)
}
