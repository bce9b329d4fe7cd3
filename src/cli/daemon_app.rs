//! Daemon app runner
//!
//! Wires the pipeline, the global hotkey, and the IPC control surface into
//! one event loop. Pipeline progress is presented on the console and, when
//! enabled, as desktop notifications.

use std::process::ExitCode;
use std::sync::Arc;

use toml::Value;

use crate::application::ports::{NotificationIcon, Notifier};
use crate::application::{PipelineEvent, SettingsService};
use crate::domain::hotkey::HotkeyChord;
use crate::domain::pipeline::PipelineStatus;
use crate::infrastructure::{create_notifier, RdevHotkeyListener};

use super::app::{build_pipeline, EXIT_ERROR, EXIT_SUCCESS};
use super::args::DaemonOptions;
use super::ipc::create_ipc_server;
use super::pid_file::{PidFile, PidFileError};
use super::presenter::Presenter;
use super::signals::{DaemonSignal, DaemonSignalHandler};

/// Run daemon mode
pub async fn run_daemon(settings: Arc<SettingsService>, options: DaemonOptions) -> ExitCode {
    let presenter = Presenter::new();

    // Single instance
    let pid_file = PidFile::new();
    if let Err(e) = pid_file.acquire() {
        match e {
            PidFileError::AlreadyRunning(pid) => {
                presenter.error(&format!("Another daemon is already running (PID: {})", pid));
            }
            _ => presenter.error(&e.to_string()),
        }
        return ExitCode::from(EXIT_ERROR);
    }

    let notifier = create_notifier(options.notify);
    let (pipeline, mut events) = build_pipeline(Arc::clone(&settings));

    // Command channel: OS signals, IPC server, and hotkey all feed it
    let (mut signals, signal_tx) = match DaemonSignalHandler::new().await {
        Ok(s) => s,
        Err(e) => {
            presenter.error(&format!("Failed to setup signal handler: {}", e));
            return ExitCode::from(EXIT_ERROR);
        }
    };

    // Global hotkey
    let chord = match settings.hotkey().parse::<HotkeyChord>() {
        Ok(chord) => chord,
        Err(e) => {
            presenter.warn(&format!("{}; falling back to {}", e, HotkeyChord::default()));
            HotkeyChord::default()
        }
    };
    let hotkey_tx = signal_tx.clone();
    let listener = RdevHotkeyListener::new(
        chord,
        Box::new(move || {
            let _ = hotkey_tx.try_send(DaemonSignal::Toggle);
        }),
    );
    listener.register();

    // IPC control surface
    let mut server = create_ipc_server();
    if let Err(e) = server.bind() {
        presenter.error(&format!("Failed to bind control endpoint: {}", e));
        let _ = pid_file.release();
        return ExitCode::from(EXIT_ERROR);
    }
    let endpoint = server.path();

    let server_tx = signal_tx.clone();
    let snapshot_pipeline = pipeline.clone();
    tokio::spawn(async move {
        let _ = server
            .run(server_tx, Box::new(move || snapshot_pipeline.snapshot()))
            .await;
    });

    presenter.daemon_status("ready");
    presenter.info(&format!(
        "PID: {} | Hotkey: {} | Control: {} | Ctrl-C: exit",
        std::process::id(),
        listener.chord(),
        endpoint
    ));
    tracing::info!(hotkey = %listener.chord(), endpoint = %endpoint, "daemon started");

    // Main loop: commands in, pipeline progress out
    loop {
        tokio::select! {
            signal = signals.recv() => match signal {
                Some(DaemonSignal::Toggle) => pipeline.toggle().await,
                Some(DaemonSignal::Cancel) => pipeline.cancel().await,
                Some(DaemonSignal::Inject) => pipeline.inject(),
                Some(DaemonSignal::Rebind(combo)) => {
                    rebind_hotkey(&combo, &listener, &settings, &presenter).await;
                }
                Some(DaemonSignal::Shutdown) | None => break,
            },
            event = events.recv() => match event {
                Some(event) => present_event(event, &presenter, notifier.as_ref()).await,
                None => break,
            },
        }
    }

    listener.unregister();
    let _ = pid_file.release();
    presenter.daemon_status("stopped");
    tracing::info!("daemon stopped");

    ExitCode::from(EXIT_SUCCESS)
}

/// Swap the global hotkey and persist the new combination
async fn rebind_hotkey(
    combo: &str,
    listener: &RdevHotkeyListener,
    settings: &SettingsService,
    presenter: &Presenter,
) {
    match combo.parse::<HotkeyChord>() {
        Ok(chord) => {
            listener.rebind(chord);
            settings
                .set("hotkey", Value::String(chord.to_string()))
                .await;
            presenter.success(&format!("Hotkey rebound to {}", chord));
        }
        Err(e) => {
            presenter.error(&e.to_string());
            tracing::warn!(combo, error = %e, "rejected hotkey rebind");
        }
    }
}

/// Reflect one pipeline event to the console and the notifier
async fn present_event(event: PipelineEvent, presenter: &Presenter, notifier: &dyn Notifier) {
    match event {
        PipelineEvent::Status(status) => {
            presenter.daemon_status(status.as_str());
            let notification = match status {
                PipelineStatus::Recording => Some(("Recording...", NotificationIcon::Recording)),
                PipelineStatus::Transcribing => {
                    Some(("Transcribing...", NotificationIcon::Processing))
                }
                _ => None,
            };
            if let Some((message, icon)) = notification {
                let _ = notifier.notify("SpeakWrite", message, icon).await;
            }
        }
        PipelineEvent::TranscriptReady { text, .. } => {
            presenter.labeled("Transcript:", &text);
        }
        PipelineEvent::FormattedReady { text, degraded, .. } => {
            presenter.labeled("Formatted:", &text);
            match degraded {
                Some(message) => {
                    presenter.warn(&message);
                    let _ = notifier
                        .notify("SpeakWrite", &message, NotificationIcon::Warning)
                        .await;
                }
                None => {
                    let _ = notifier
                        .notify(
                            "SpeakWrite",
                            "Dictation ready - run 'speakwrite daemon inject' to type it",
                            NotificationIcon::Success,
                        )
                        .await;
                }
            }
        }
        PipelineEvent::InjectionFinished { chars } => {
            presenter.success(&format!("Typed {} characters", chars));
        }
        PipelineEvent::StageFailed { stage, message } => {
            let line = format!("{} failed: {}", stage, message);
            presenter.error(&line);
            let _ = notifier
                .notify("SpeakWrite", &line, NotificationIcon::Error)
                .await;
        }
    }
}
