use std::mem;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use rodio::{OutputStream, OutputStreamBuilder, Sink};

use super::backlog::{Step, coalesce};
use super::sink::{StreamBytes, create_sink_at, fetch_stream, probe_duration};
use super::types::{AudioCmd, MediaEvent, MediaHandle, PlayRequest, PlaybackError, SourceEvent};

pub(super) struct StreamOptions {
    /// Cadence of progress updates while playing.
    pub tick: Duration,
    pub connect_timeout: Duration,
    /// Upper bound on downloading one stream, body included.
    pub stream_timeout: Duration,
    pub volume: f64,
}

/// Spawn the audio thread and wait until it has opened the output device.
pub(super) fn spawn_audio_thread(
    rx: Receiver<AudioCmd>,
    events: Sender<SourceEvent>,
    info: MediaHandle,
    options: StreamOptions,
) -> Result<JoinHandle<()>, PlaybackError> {
    let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<(), PlaybackError>>(1);

    let handle = thread::Builder::new()
        .name("cadenza-audio".into())
        .spawn(move || {
            let mut stream = match OutputStreamBuilder::open_default_stream() {
                Ok(s) => s,
                Err(e) => {
                    let _ = ready_tx.send(Err(PlaybackError::Output(e.to_string())));
                    return;
                }
            };
            // rodio logs to stderr when OutputStream is dropped. That's useful in debugging,
            // but noisy for a TUI app.
            stream.log_on_drop(false);

            let client = match reqwest::blocking::Client::builder()
                .connect_timeout(options.connect_timeout)
                .timeout(options.stream_timeout)
                .build()
            {
                Ok(c) => c,
                Err(e) => {
                    let _ = ready_tx.send(Err(PlaybackError::Request(e.to_string())));
                    return;
                }
            };

            let _ = ready_tx.send(Ok(()));
            tracing::debug!("audio output ready");

            let mut state = AudioThread {
                stream,
                client,
                events,
                info,
                generation: 0,
                src: None,
                bytes: None,
                duration: None,
                sink: None,
                paused: true,
                started_at: None,
                accumulated: Duration::ZERO,
                volume: options.volume as f32,
            };
            state.run(rx, options.tick);
        })
        .map_err(|e| PlaybackError::Output(e.to_string()))?;

    match ready_rx.recv() {
        Ok(Ok(())) => Ok(handle),
        Ok(Err(e)) => {
            let _ = handle.join();
            Err(e)
        }
        Err(_) => Err(PlaybackError::Disconnected),
    }
}

struct AudioThread {
    stream: OutputStream,
    client: reqwest::blocking::Client,
    events: Sender<SourceEvent>,
    info: MediaHandle,

    generation: u64,
    src: Option<String>,
    bytes: Option<StreamBytes>,
    duration: Option<Duration>,
    sink: Option<Sink>,
    paused: bool,

    // Track start time and accumulated elapsed when paused.
    started_at: Option<Instant>,
    accumulated: Duration,
    volume: f32,
}

impl AudioThread {
    fn run(&mut self, rx: Receiver<AudioCmd>, tick: Duration) {
        let mut backlog: Vec<AudioCmd> = Vec::new();
        loop {
            if backlog.is_empty() {
                match rx.recv_timeout(tick) {
                    Ok(cmd) => backlog.push(cmd),
                    Err(RecvTimeoutError::Timeout) => {
                        self.tick();
                        continue;
                    }
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            backlog.extend(rx.try_iter());

            let mut steps = coalesce(mem::take(&mut backlog)).into_iter();
            while let Some(step) = steps.next() {
                match step {
                    Step::Abort(request) => self.abort(request),
                    Step::Run(AudioCmd::Quit) => {
                        self.quit();
                        return;
                    }
                    Step::Run(AudioCmd::Play(request)) => {
                        if let Err(e) = self.ensure_loaded() {
                            self.reject(request, e);
                            continue;
                        }
                        // Replan with whatever arrived during the download; the
                        // bytes are cached so the play itself is cheap next round.
                        let arrived: Vec<AudioCmd> = rx.try_iter().collect();
                        if !arrived.is_empty() {
                            backlog.push(AudioCmd::Play(request));
                            for rest in steps.by_ref() {
                                match rest {
                                    Step::Abort(r) => self.abort(r),
                                    Step::Run(cmd) => backlog.push(cmd),
                                }
                            }
                            backlog.extend(arrived);
                            break;
                        }
                        match self.play() {
                            Ok(()) => self.emit(MediaEvent::PlayStarted(request)),
                            Err(e) => self.reject(request, e),
                        }
                    }
                    Step::Run(cmd) => self.apply(cmd),
                }
            }
        }
    }

    fn apply(&mut self, cmd: AudioCmd) {
        match cmd {
            AudioCmd::Load { url, generation } => self.load(url, generation),
            AudioCmd::Pause => self.pause(),
            AudioCmd::Seek(secs) => self.seek(secs),
            AudioCmd::SetVolume(level) => {
                self.volume = level as f32;
                if let Some(s) = self.sink.as_ref() {
                    s.set_volume(self.volume);
                }
            }
            AudioCmd::Play(_) | AudioCmd::Quit => {}
        }
    }

    fn quit(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        if let Ok(mut info) = self.info.lock() {
            info.paused = true;
        }
    }

    fn emit(&self, event: MediaEvent) {
        let _ = self.events.send(SourceEvent {
            generation: self.generation,
            event,
        });
    }

    fn elapsed(&self) -> Duration {
        self.accumulated + self.started_at.map_or(Duration::ZERO, |st| st.elapsed())
    }

    fn load(&mut self, url: String, generation: u64) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        self.generation = generation;
        self.src = Some(url);
        self.bytes = None;
        self.duration = None;
        self.paused = true;
        self.started_at = None;
        self.accumulated = Duration::ZERO;
        if let Ok(mut info) = self.info.lock() {
            info.current_time = 0.0;
            info.duration = None;
        }
    }

    fn ensure_loaded(&mut self) -> Result<StreamBytes, PlaybackError> {
        if let Some(bytes) = &self.bytes {
            return Ok(bytes.clone());
        }
        let Some(url) = self.src.as_deref() else {
            return Err(PlaybackError::NoSource);
        };

        tracing::debug!(%url, "fetching stream");
        let bytes = fetch_stream(&self.client, url)?;
        self.duration = probe_duration(&bytes)?;
        self.bytes = Some(bytes.clone());

        if let Ok(mut info) = self.info.lock() {
            info.duration = self.duration.map(|d| d.as_secs_f64());
        }
        self.emit(MediaEvent::LoadedMetadata);
        Ok(bytes)
    }

    fn play(&mut self) -> Result<(), PlaybackError> {
        let bytes = self.ensure_loaded()?;

        let finished = self.sink.as_ref().is_none_or(|s| s.empty());
        if finished {
            // Either nothing was built yet or the previous run reached the end.
            if self.sink.is_some() {
                self.accumulated = Duration::ZERO;
            }
            let sink = create_sink_at(&self.stream, &bytes, self.accumulated, self.volume)?;
            self.sink = Some(sink);
        }

        if let Some(s) = self.sink.as_ref() {
            s.play();
        }
        if self.paused {
            self.started_at = Some(Instant::now());
        }
        self.paused = false;
        Ok(())
    }

    fn reject(&mut self, request: PlayRequest, error: PlaybackError) {
        self.paused = true;
        self.started_at = None;
        if let Ok(mut info) = self.info.lock() {
            info.paused = true;
        }
        self.emit(MediaEvent::PlayFailed(request, error));
    }

    /// Answer a request that was overtaken before it ran. Playback state is
    /// left to whatever command overtook it.
    fn abort(&self, request: PlayRequest) {
        tracing::debug!(request = request.0, "play request aborted");
        self.emit(MediaEvent::PlayFailed(request, PlaybackError::Aborted));
    }

    fn pause(&mut self) {
        if !self.paused {
            if let Some(s) = self.sink.as_ref() {
                s.pause();
            }
            if let Some(st) = self.started_at.take() {
                self.accumulated += st.elapsed();
            }
            self.paused = true;
        }
        if let Ok(mut info) = self.info.lock() {
            info.paused = true;
        }
    }

    fn seek(&mut self, secs: f64) {
        let Some(bytes) = self.bytes.clone() else {
            return;
        };
        if !secs.is_finite() {
            return;
        }

        let mut target = Duration::from_secs_f64(secs.max(0.0));
        if let Some(d) = self.duration {
            target = target.min(d);
        }

        // Scrubbing: rebuild the current sink and skip into the stream.
        if let Some(s) = self.sink.take() {
            s.stop();
        }
        match create_sink_at(&self.stream, &bytes, target, self.volume) {
            Ok(sink) => {
                if !self.paused {
                    sink.play();
                    self.started_at = Some(Instant::now());
                } else {
                    self.started_at = None;
                }
                self.sink = Some(sink);
            }
            Err(e) => tracing::warn!(error = %e, "seek failed"),
        }

        self.accumulated = target;
        if let Ok(mut info) = self.info.lock() {
            info.current_time = target.as_secs_f64();
        }
        self.emit(MediaEvent::TimeUpdate);
    }

    fn tick(&mut self) {
        if self.paused {
            return;
        }
        let Some(sink) = self.sink.as_ref() else {
            return;
        };

        if sink.empty() {
            let end = self.duration.unwrap_or_else(|| self.elapsed());
            self.paused = true;
            self.started_at = None;
            self.accumulated = end;
            if let Ok(mut info) = self.info.lock() {
                info.paused = true;
                info.current_time = end.as_secs_f64();
            }
            self.emit(MediaEvent::TimeUpdate);
            self.emit(MediaEvent::Ended);
            return;
        }

        let elapsed = self.elapsed();
        if let Ok(mut info) = self.info.lock() {
            info.current_time = elapsed.as_secs_f64();
        }
        self.emit(MediaEvent::TimeUpdate);
    }
}
