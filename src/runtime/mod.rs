use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::{Terminal, backend::CrosstermBackend};

use crate::cli::Args;

mod event_loop;
mod loader;
mod settings;
mod startup;

#[cfg(test)]
mod tests;

pub fn run() -> anyhow::Result<()> {
    let args = Args::parse();
    let (settings, settings_problem) = settings::load_settings(&args);

    if args.print_config {
        print!("{}", toml::to_string_pretty(&settings)?);
        if let Some(msg) = settings_problem {
            eprintln!("cadenza: {msg}");
        }
        return Ok(());
    }

    let _log_guard = startup::init_logging(&settings)?;
    if let Some(msg) = settings_problem {
        tracing::warn!("{msg}");
    }
    tracing::info!(server = %settings.server.base_url, "starting");

    let mut controller = startup::build_controller(&settings).inspect_err(|e| {
        tracing::error!(error = %e, "cannot start player");
    })?;

    let listing = loader::spawn_listing_fetch(settings.server.clone());

    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut state = event_loop::EventLoopState::default();
    let run_result = event_loop::run(&mut terminal, &settings, &mut controller, &listing, &mut state);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    controller.media_mut().shutdown();
    run_result
}
