//! SpeakWrite CLI entry point

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use speakwrite::application::SettingsService;
use speakwrite::cli::{
    app::{run_oneshot, EXIT_ERROR},
    args::{Cli, Commands, DaemonOptions, OneshotOptions},
    config_cmd::handle_config_command,
    daemon_app::run_daemon,
    daemon_cmd::handle_daemon_command,
    presenter::Presenter,
};
use speakwrite::infrastructure::{logging, paths, TomlSettingsStore};

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let presenter = Presenter::new();

    // Subcommands that talk to storage or a running daemon directly
    match cli.command {
        Some(Commands::Config { action }) => {
            let store = TomlSettingsStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        Some(Commands::Daemon { action }) => {
            if let Err(e) = handle_daemon_command(action, &presenter).await {
                presenter.error(&e);
                return ExitCode::from(EXIT_ERROR);
            }
            return ExitCode::SUCCESS;
        }
        None => {}
    }

    // Load settings once; first run creates the file with defaults
    let store = Arc::new(TomlSettingsStore::new());
    let settings = match SettingsService::load(store).await {
        Ok(service) => Arc::new(service),
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let snapshot = settings.snapshot();
    logging::init(&paths::logs_dir(), &snapshot.log_level());
    tracing::info!("starting speakwrite");

    if cli.daemon {
        run_daemon(settings, DaemonOptions { notify: cli.notify }).await
    } else {
        let options = OneshotOptions {
            duration_secs: cli.duration.unwrap_or_else(|| snapshot.chunk_duration_secs()),
            mode: cli.mode.map(Into::into),
            inject: cli.inject,
            notify: cli.notify,
        };
        run_oneshot(settings, options).await
    }
}
