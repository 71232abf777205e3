use std::path::PathBuf;

use clap::Parser;

use crate::config::Settings;

/// cadenza - play the songs a server lists, from your terminal
#[derive(Parser, Debug, Default)]
#[command(name = "cadenza", version, about)]
pub struct Args {
    /// Base URL of the song server (overrides `server.base_url`)
    pub server_url: Option<String>,

    /// Config file to read instead of the XDG default
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Args {
    /// Layer command-line overrides on top of loaded settings.
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(url) = &self.server_url {
            settings.server.base_url = url.clone();
        }
        if let Some(path) = &self.log_file {
            settings.logging.file = Some(path.clone());
        }
    }
}
