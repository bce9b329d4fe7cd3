//! Signal handling for the daemon loop
//!
//! OS shutdown signals and IPC/hotkey commands all arrive on one channel
//! that the daemon loop drains.

use tokio::sync::mpsc;

/// Commands the daemon loop reacts to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaemonSignal {
    /// Toggle recording
    Toggle,
    /// Cancel recording
    Cancel,
    /// Type the formatted text into the focused window
    Inject,
    /// Rebind the global hotkey to the given combination string
    Rebind(String),
    /// Shutdown daemon (SIGINT/SIGTERM)
    Shutdown,
}

/// Daemon signal handler.
///
/// Handles OS shutdown signals and provides a sender other sources
/// (IPC server, hotkey listener) use to feed commands into the loop.
pub struct DaemonSignalHandler {
    receiver: mpsc::Receiver<DaemonSignal>,
}

impl DaemonSignalHandler {
    /// Create the handler and start listening for shutdown signals.
    /// Returns the handler and a sender for other command sources.
    pub async fn new() -> Result<(Self, mpsc::Sender<DaemonSignal>), std::io::Error> {
        let (tx, rx) = mpsc::channel(16);

        let tx_int = tx.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("received interrupt, shutting down");
                let _ = tx_int.send(DaemonSignal::Shutdown).await;
            }
        });

        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let tx_term = tx.clone();
            let mut sigterm = signal(SignalKind::terminate())?;
            tokio::spawn(async move {
                sigterm.recv().await;
                tracing::info!("received SIGTERM, shutting down");
                let _ = tx_term.send(DaemonSignal::Shutdown).await;
            });
        }

        Ok((Self { receiver: rx }, tx))
    }

    /// Wait for the next signal
    pub async fn recv(&mut self) -> Option<DaemonSignal> {
        self.receiver.recv().await
    }
}
