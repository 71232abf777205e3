use crate::cli::Args;
use crate::config::{self, Settings};

/// Load settings, then layer `args` on top and validate the result.
///
/// Config is optional: any failure falls back to defaults (still honoring
/// `args`) and the reason is returned so it can be logged once logging is up.
pub fn load_settings(args: &Args) -> (Settings, Option<String>) {
    let path = args.config.clone().or_else(config::resolve_config_path);

    let (mut settings, mut problem) = match Settings::load_from(path) {
        Ok(s) => (s, None),
        Err(e) => (
            Settings::default(),
            Some(format!("failed to load config, using defaults: {e}")),
        ),
    };

    args.apply_to(&mut settings);
    if let Err(msg) = settings.validate() {
        settings = Settings::default();
        args.apply_to(&mut settings);
        if settings.validate().is_err() {
            settings = Settings::default();
        }
        problem = Some(format!("invalid config, using defaults: {msg}"));
    }

    (settings, problem)
}
