use super::load::{default_config_path, default_log_path, resolve_config_path};
use super::schema::*;
use std::sync::{Mutex, OnceLock};

static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}

struct EnvGuard {
    key: &'static str,
    old: Option<std::ffi::OsString>,
}

impl EnvGuard {
    fn set(key: &'static str, val: &str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::set_var(key, val);
        }
        Self { key, old }
    }

    fn remove(key: &'static str) -> Self {
        let old = std::env::var_os(key);
        unsafe {
            std::env::remove_var(key);
        }
        Self { key, old }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match self.old.take() {
            Some(v) => unsafe {
                std::env::set_var(self.key, v);
            },
            None => unsafe {
                std::env::remove_var(self.key);
            },
        }
    }
}

#[test]
fn resolve_config_path_prefers_cadenza_config_path() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("CADENZA_CONFIG_PATH", "/tmp/cadenza-test-config.toml");
    assert_eq!(
        resolve_config_path().unwrap(),
        std::path::PathBuf::from("/tmp/cadenza-test-config.toml")
    );
}

#[test]
fn default_config_path_prefers_xdg_config_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_CONFIG_HOME", "/tmp/xdg-config-home");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-should-not-win");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/xdg-config-home")
            .join("cadenza")
            .join("config.toml")
    );
}

#[test]
fn default_config_path_falls_back_to_home_dot_config() {
    let _lock = env_lock();
    let _g1 = EnvGuard::remove("XDG_CONFIG_HOME");
    let _g2 = EnvGuard::set("HOME", "/tmp/home-dir");

    let p = default_config_path().unwrap();
    assert_eq!(
        p,
        std::path::PathBuf::from("/tmp/home-dir")
            .join(".config")
            .join("cadenza")
            .join("config.toml")
    );
}

#[test]
fn default_log_path_uses_xdg_state_home() {
    let _lock = env_lock();
    let _g1 = EnvGuard::set("XDG_STATE_HOME", "/tmp/xdg-state");

    assert_eq!(
        default_log_path().unwrap(),
        std::path::PathBuf::from("/tmp/xdg-state")
            .join("cadenza")
            .join("cadenza.log")
    );
}

#[test]
fn explicit_log_file_wins_over_default() {
    let mut s = Settings::default();
    s.logging.file = Some("/var/log/cadenza.log".into());
    assert_eq!(
        s.log_file().unwrap(),
        std::path::PathBuf::from("/var/log/cadenza.log")
    );
}

#[test]
fn settings_load_from_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[server]
base_url = "http://music.lan:8080"
timeout_secs = 3
stream_timeout_secs = 30
encode_titles = true

[audio]
volume = 0.5
volume_step = 0.1
tick_ms = 100

[controls]
scrub_seconds = 9

[playback]
shuffle = true
repeat = true

[ui]
header_text = "hello"
panels = ["now_playing", "seek", "songs"]
headline_fields = ["artist", "title"]
detail_fields = ["album"]
field_separator = " • "

[logging]
level = "cadenza=debug"
file = "/tmp/cadenza-test.log"
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::remove("CADENZA__SERVER__BASE_URL");

    let s = Settings::load_from(Some(cfg_path)).unwrap();
    assert_eq!(s.server.base_url, "http://music.lan:8080");
    assert_eq!(s.server.timeout_secs, 3);
    assert_eq!(s.server.stream_timeout_secs, 30);
    assert!(s.server.encode_titles);
    assert_eq!(s.audio.volume, 0.5);
    assert_eq!(s.audio.volume_step, 0.1);
    assert_eq!(s.audio.tick_ms, 100);
    assert_eq!(s.controls.scrub_seconds, 9);
    assert!(s.playback.shuffle);
    assert!(s.playback.repeat);
    assert_eq!(s.ui.header_text, "hello");
    assert_eq!(
        s.ui.panels,
        vec![Panel::NowPlaying, Panel::Progress, Panel::Tracks]
    );
    assert_eq!(
        s.ui.headline_fields,
        vec![TrackDisplayField::Artist, TrackDisplayField::Title]
    );
    assert_eq!(s.ui.detail_fields, vec![TrackDisplayField::Album]);
    assert_eq!(s.ui.field_separator, " • ");
    assert_eq!(s.logging.level, "cadenza=debug");
    assert_eq!(
        s.logging.file,
        Some(std::path::PathBuf::from("/tmp/cadenza-test.log"))
    );
    assert!(s.validate().is_ok());
}

#[test]
fn settings_env_overrides_config_file() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let cfg_path = dir.path().join("config.toml");
    std::fs::write(
        &cfg_path,
        r#"
[controls]
scrub_seconds = 5
"#,
    )
    .unwrap();

    let _g1 = EnvGuard::set("CADENZA__CONTROLS__SCRUB_SECONDS", "30");

    let s = Settings::load_from(Some(cfg_path)).unwrap();
    assert_eq!(s.controls.scrub_seconds, 30);
}

#[test]
fn missing_config_file_yields_defaults() {
    let _lock = env_lock();

    let dir = tempfile::tempdir().unwrap();
    let s = Settings::load_from(Some(dir.path().join("absent.toml"))).unwrap();
    assert_eq!(s.server.base_url, "http://localhost:5000");
    assert_eq!(s.ui.panels, Panel::ALL.to_vec());
    assert!(!s.playback.shuffle);
    assert!(!s.playback.repeat);
}

#[test]
fn validate_rejects_out_of_range_audio_values() {
    let mut s = Settings::default();
    s.audio.volume = 1.5;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.audio.volume_step = 0.0;
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.audio.tick_ms = 0;
    assert!(s.validate().is_err());
}

#[test]
fn validate_rejects_bad_base_urls_and_duplicate_panels() {
    let mut s = Settings::default();
    s.server.base_url = "not a url".into();
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.server.base_url = "ftp://host/".into();
    assert!(s.validate().is_err());

    let mut s = Settings::default();
    s.ui.panels = vec![Panel::Tracks, Panel::Tracks];
    assert!(s.validate().is_err());
}

#[test]
fn stream_downloads_are_bounded_by_default() {
    let s = Settings::default();
    assert_eq!(s.server.stream_timeout_secs, 120);

    let mut s = Settings::default();
    s.server.stream_timeout_secs = 0;
    assert!(s.validate().is_err());
}

#[test]
fn default_settings_render_as_toml() {
    let text = toml::to_string_pretty(&Settings::default()).unwrap();
    assert!(text.contains("base_url = \"http://localhost:5000\""));
    assert!(text.contains("now-playing"));

    let parsed: Settings = toml::from_str(&text).unwrap();
    assert_eq!(parsed.ui.panels, Panel::ALL.to_vec());
}
