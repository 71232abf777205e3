use std::fs;
use std::path::Path;

use anyhow::{Context, anyhow};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::app::{Controller, InitError};
use crate::audio::StreamPlayer;
use crate::config::Settings;
use crate::library::{Endpoints, RowFormat};

/// Environment variable holding a tracing filter directive.
const LOG_ENV: &str = "CADENZA_LOG";

/// Install the global subscriber, writing to the configured log file.
///
/// The terminal belongs to the UI, so nothing is logged to stdout/stderr.
/// The returned guard flushes pending lines when dropped.
pub fn init_logging(settings: &Settings) -> anyhow::Result<Option<WorkerGuard>> {
    let Some(path) = settings.log_file() else {
        return Ok(None);
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    fs::create_dir_all(dir)
        .with_context(|| format!("creating log directory {}", dir.display()))?;
    let file_name = path
        .file_name()
        .with_context(|| format!("log path {} has no file name", path.display()))?;

    let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(&settings.logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("installing log subscriber: {e}"))?;

    Ok(Some(guard))
}

/// Open the audio output and wire the controller to it.
pub fn build_controller(settings: &Settings) -> Result<Controller<StreamPlayer>, InitError> {
    let media = StreamPlayer::open(&settings.audio, &settings.server)
        .map_err(|e| tracing::error!(error = %e, "could not open audio output"))
        .ok();

    let controller = Controller::init(media, &settings.ui.panels, Endpoints::from_settings(&settings.server))?
        .with_row_format(RowFormat::from_settings(&settings.ui))
        .with_modes(settings.playback.shuffle, settings.playback.repeat)
        .with_volume(settings.audio.volume);

    Ok(controller)
}
