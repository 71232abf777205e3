use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Top-level application settings loaded from `config.toml`.
///
/// File format: TOML
/// Default path (Linux/XDG): `$XDG_CONFIG_HOME/cadenza/config.toml` or `~/.config/cadenza/config.toml`
///
/// Precedence (highest wins):
/// 1) Command-line flags (server URL, log file)
/// 2) Environment variables (prefix `CADENZA__`, `__` as nested separator)
/// 3) Config file (if present)
/// 4) Struct defaults
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub audio: AudioSettings,
    pub controls: ControlsSettings,
    pub playback: PlaybackSettings,
    pub ui: UiSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Base URL of the song server; `/songs` and `/stream/{title}` hang off it.
    pub base_url: String,
    /// Timeout for the listing request and for connecting to streams (seconds).
    pub timeout_secs: u64,
    /// Upper bound on downloading one stream, body included (seconds).
    pub stream_timeout_secs: u64,
    /// Percent-encode titles when building stream URLs.
    pub encode_titles: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: 10,
            stream_timeout_secs: 120,
            encode_titles: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AudioSettings {
    /// Initial volume in `[0, 1]`.
    pub volume: f64,
    /// Volume change per `+` / `-` press.
    pub volume_step: f64,
    /// How often the player reports playback progress (milliseconds).
    pub tick_ms: u64,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            volume: 1.0,
            volume_step: 0.05,
            tick_ms: 250,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ControlsSettings {
    /// Number of seconds to scrub when pressing `H` / `L`.
    pub scrub_seconds: u64,
}

impl Default for ControlsSettings {
    fn default() -> Self {
        Self { scrub_seconds: 5 }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PlaybackSettings {
    /// Whether shuffle starts enabled.
    pub shuffle: bool,
    /// Whether repeat-one starts enabled.
    pub repeat: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UiSettings {
    /// The text rendered inside the top header box.
    pub header_text: String,

    /// Panels to lay out, top to bottom. `tracks` and `now-playing` are required.
    pub panels: Vec<Panel>,

    /// Fields making up a track's headline (list row, now-playing title).
    pub headline_fields: Vec<TrackDisplayField>,

    /// Fields making up the line under the headline.
    ///
    /// Example: ["artist", "album"] -> "Artist - Album"
    pub detail_fields: Vec<TrackDisplayField>,

    /// Separator used to join the fields above.
    pub field_separator: String,
}

impl Default for UiSettings {
    fn default() -> Self {
        Self {
            header_text: " ~ cadenza ~ ".to_string(),
            panels: Panel::ALL.to_vec(),
            headline_fields: vec![TrackDisplayField::Title],
            detail_fields: vec![TrackDisplayField::Artist, TrackDisplayField::Album],
            field_separator: " - ".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive, e.g. `info` or `cadenza=debug`.
    /// `CADENZA_LOG` takes precedence when set.
    pub level: String,
    /// Log file; defaults to `$XDG_STATE_HOME/cadenza/cadenza.log`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrackDisplayField {
    Title,
    Artist,
    Album,
}

/// A named region of the screen.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Panel {
    Header,
    #[serde(alias = "now_playing", alias = "nowplaying")]
    NowPlaying,
    /// Seek bar with elapsed and total time.
    #[serde(alias = "seek", alias = "seek-bar")]
    Progress,
    #[serde(alias = "songs", alias = "song-list")]
    Tracks,
    Volume,
    /// Play/pause, previous and next.
    #[serde(alias = "transport")]
    Controls,
    /// Shuffle and repeat toggles.
    Modes,
}

impl Panel {
    pub const ALL: [Panel; 7] = [
        Panel::Header,
        Panel::NowPlaying,
        Panel::Progress,
        Panel::Tracks,
        Panel::Volume,
        Panel::Controls,
        Panel::Modes,
    ];
}
