// clipz - clipboard history in the terminal
//
// Watches the system clipboard and keeps a scrollable history of everything
// copied, plus a separate saved list that survives restarts.
//
// Architecture:
// - App: the clip-history state machine (lists, view, key dispatch, watcher)
// - Transform: editor / pipe / tempfile programs that rewrite a clip
// - Storage: JSON files for the saved list and optional history
// - TUI (ratatui): single-threaded loop driving the App and drawing it

mod app;
mod cli;
mod clip;
mod clipboard;
mod config;
mod logging;
mod storage;
mod transform;
mod tui;

use anyhow::Result;
use app::App;
use clap::Parser;
use cli::Cli;
use clipboard::SystemClipboard;
use config::Config;
use std::time::Duration;

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli::handle_command(&cli)? {
        return Ok(());
    }

    let config = Config::load(&cli.overrides());

    // Ensure config template exists (helps users discover options)
    config.ensure_config_exists();

    // The guard must be kept alive for the duration of the program to ensure logs flush
    let _file_guard = logging::init_tracing(&config.logging);

    tracing::info!(
        "clipz {} starting (config dir {})",
        config::VERSION,
        config.config_dir.display()
    );

    let mut app = App::from_config(&config, Box::new(SystemClipboard::new()));
    let result = tui::run(&mut app, Duration::from_millis(config.poll_interval_ms));

    app.shutdown();
    result
}
