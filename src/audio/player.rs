use std::collections::VecDeque;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::config::{AudioSettings, ServerSettings};

use super::thread::{StreamOptions, spawn_audio_thread};
use super::types::{
    AudioCmd, MediaElement, MediaEvent, MediaHandle, MediaInfo, PlayRequest, PlaybackError,
    SourceEvent,
};

/// How long `shutdown` waits for the audio thread before leaving it behind.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

/// Media element backed by a rodio output on a dedicated audio thread.
///
/// Sources are HTTP URLs; the audio thread downloads and decodes them.
pub struct StreamPlayer {
    tx: Sender<AudioCmd>,
    events: Receiver<SourceEvent>,
    // Events raised on this side, e.g. a play request the thread never saw.
    local_events: VecDeque<MediaEvent>,
    info: MediaHandle,
    next_request: u64,
    // Bumped by every `set_src`; thread events from older sources are dropped.
    generation: u64,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl StreamPlayer {
    /// Open the default audio output and start the audio thread.
    pub fn open(audio: &AudioSettings, server: &ServerSettings) -> Result<Self, PlaybackError> {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (event_tx, events) = mpsc::channel::<SourceEvent>();
        let info: MediaHandle = Arc::new(Mutex::new(MediaInfo::default()));

        let options = StreamOptions {
            tick: Duration::from_millis(audio.tick_ms.max(1)),
            connect_timeout: Duration::from_secs(server.timeout_secs),
            stream_timeout: Duration::from_secs(server.stream_timeout_secs),
            volume: audio.volume,
        };
        let join = spawn_audio_thread(rx, event_tx, info.clone(), options)?;

        Ok(Self::with_channels(tx, events, info, Some(join)))
    }

    fn with_channels(
        tx: Sender<AudioCmd>,
        events: Receiver<SourceEvent>,
        info: MediaHandle,
        join: Option<JoinHandle<()>>,
    ) -> Self {
        Self {
            tx,
            events,
            local_events: VecDeque::new(),
            info,
            next_request: 0,
            generation: 0,
            join: Mutex::new(join),
        }
    }

    /// A player wired to bare channels instead of an audio thread.
    #[cfg(test)]
    pub(super) fn detached() -> (Self, Receiver<AudioCmd>, Sender<SourceEvent>) {
        let (tx, rx) = mpsc::channel();
        let (event_tx, events) = mpsc::channel();
        let info: MediaHandle = Arc::new(Mutex::new(MediaInfo::default()));
        (Self::with_channels(tx, events, info, None), rx, event_tx)
    }

    fn send(&self, cmd: AudioCmd) -> Result<(), mpsc::SendError<AudioCmd>> {
        self.tx.send(cmd)
    }

    fn with_info<T>(&self, f: impl FnOnce(&mut MediaInfo) -> T) -> Option<T> {
        self.info.lock().ok().map(|mut info| f(&mut info))
    }

    /// Stop playback and wait for the audio thread to exit.
    ///
    /// A thread stuck in a download gets `SHUTDOWN_GRACE` to notice the quit;
    /// after that it is left to die with the process.
    pub fn shutdown(&self) {
        let _ = self.send(AudioCmd::Quit);

        let Some(h) = self.join.lock().ok().and_then(|mut j| j.take()) else {
            return;
        };
        let deadline = Instant::now() + SHUTDOWN_GRACE;
        while !h.is_finished() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(10));
        }
        if h.is_finished() {
            let _ = h.join();
        } else {
            tracing::warn!("audio thread still busy, not waiting for it");
        }
    }
}

impl MediaElement for StreamPlayer {
    fn set_src(&mut self, url: &str) {
        self.generation += 1;
        self.local_events.clear();
        while self.events.try_recv().is_ok() {}

        self.with_info(|info| {
            info.paused = true;
            info.current_time = 0.0;
            info.duration = None;
        });
        let cmd = AudioCmd::Load {
            url: url.to_string(),
            generation: self.generation,
        };
        if self.send(cmd).is_err() {
            tracing::warn!("audio thread gone, dropping source change");
        }
    }

    fn play(&mut self) -> PlayRequest {
        self.next_request += 1;
        let request = PlayRequest(self.next_request);

        // Like the HTML element, `paused` flips as soon as play is requested.
        self.with_info(|info| info.paused = false);
        if self.send(AudioCmd::Play(request)).is_err() {
            self.with_info(|info| info.paused = true);
            self.local_events
                .push_back(MediaEvent::PlayFailed(request, PlaybackError::Disconnected));
        }
        request
    }

    fn pause(&mut self) {
        self.with_info(|info| info.paused = true);
        let _ = self.send(AudioCmd::Pause);
    }

    fn paused(&self) -> bool {
        self.with_info(|info| info.paused).unwrap_or(true)
    }

    fn current_time(&self) -> f64 {
        self.with_info(|info| info.current_time).unwrap_or(0.0)
    }

    fn set_current_time(&mut self, secs: f64) {
        self.with_info(|info| info.current_time = secs);
        let _ = self.send(AudioCmd::Seek(secs));
    }

    fn duration(&self) -> Option<f64> {
        self.with_info(|info| info.duration).flatten()
    }

    fn set_volume(&mut self, level: f64) {
        let _ = self.send(AudioCmd::SetVolume(level));
    }

    fn poll_event(&mut self) -> Option<MediaEvent> {
        if let Some(event) = self.local_events.pop_front() {
            return Some(event);
        }
        // The thread may still report on a source it has not yet replaced.
        while let Ok(stamped) = self.events.try_recv() {
            if stamped.generation == self.generation {
                return Some(stamped.event);
            }
        }
        None
    }
}

impl Drop for StreamPlayer {
    fn drop(&mut self) {
        self.shutdown();
    }
}
