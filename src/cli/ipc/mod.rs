//! IPC (Inter-Process Communication) module for daemon control
//!
//! Provides platform-specific implementations:
//! - Unix (Linux/macOS): Unix Domain Sockets
//! - Windows: Named Pipes

#[cfg(windows)]
mod named_pipe;
#[cfg(unix)]
mod unix_socket;

#[cfg(windows)]
pub use named_pipe::{NamedPipeClient, NamedPipeServer, PipePath};
#[cfg(unix)]
pub use unix_socket::{SocketPath, UnixSocketClient, UnixSocketServer};

use std::io;
use tokio::sync::mpsc;

use super::signals::DaemonSignal;
use crate::domain::pipeline::SessionSnapshot;

/// Snapshot function type for IPC servers
pub type SnapshotFn = Box<dyn Fn() -> SessionSnapshot + Send + Sync>;

/// Trait for IPC servers that listen for daemon commands
#[async_trait::async_trait]
pub trait IpcServer: Send + Sync {
    /// Bind to the IPC endpoint
    fn bind(&mut self) -> io::Result<()>;

    /// Get the path/name of the IPC endpoint
    fn path(&self) -> String;

    /// Accept and handle connections.
    ///
    /// Runs in a loop; each command is sent to the provided channel, and
    /// `snapshot_fn` answers status queries.
    async fn run(&self, tx: mpsc::Sender<DaemonSignal>, snapshot_fn: SnapshotFn)
        -> io::Result<()>;

    /// Cleanup IPC resources
    fn cleanup(&self);
}

/// Trait for IPC clients that send commands to the daemon
#[async_trait::async_trait]
pub trait IpcClient: Send + Sync {
    /// Check if daemon appears to be running (endpoint exists)
    fn is_daemon_running(&self) -> bool;

    /// Send a command and receive response
    async fn send_command(&self, cmd: &str) -> io::Result<String>;
}

/// Build the wire response for one command line.
/// Commands that mutate daemon state go to the channel; queries answer
/// from the snapshot.
pub(crate) async fn respond(
    cmd: &str,
    tx: &mpsc::Sender<DaemonSignal>,
    snapshot: SessionSnapshot,
) -> String {
    match cmd {
        "toggle" => {
            let _ = tx.send(DaemonSignal::Toggle).await;
            "ok\n".to_string()
        }
        "cancel" => {
            let _ = tx.send(DaemonSignal::Cancel).await;
            "ok\n".to_string()
        }
        "inject" => {
            let _ = tx.send(DaemonSignal::Inject).await;
            "ok\n".to_string()
        }
        "status" => format!("{}\n", snapshot.status),
        "show" => {
            let body = serde_json::json!({
                "status": snapshot.status.as_str(),
                "transcript": snapshot.transcript,
                "formatted": snapshot.formatted,
                "error": snapshot.last_error,
            });
            format!("{}\n", body)
        }
        other => {
            if let Some(combo) = other.strip_prefix("rebind ") {
                let combo = combo.trim();
                if combo.is_empty() {
                    "error: missing hotkey combination\n".to_string()
                } else {
                    let _ = tx.send(DaemonSignal::Rebind(combo.to_string())).await;
                    "ok\n".to_string()
                }
            } else {
                "error: unknown command\n".to_string()
            }
        }
    }
}

/// Create the appropriate IPC server for the current platform
#[cfg(unix)]
pub fn create_ipc_server() -> Box<dyn IpcServer> {
    Box::new(UnixSocketServer::new(SocketPath::new()))
}

#[cfg(windows)]
pub fn create_ipc_server() -> Box<dyn IpcServer> {
    Box::new(NamedPipeServer::new(PipePath::new()))
}

/// Create the appropriate IPC client for the current platform
#[cfg(unix)]
pub fn create_ipc_client() -> Box<dyn IpcClient> {
    Box::new(UnixSocketClient::new(SocketPath::new()))
}

#[cfg(windows)]
pub fn create_ipc_client() -> Box<dyn IpcClient> {
    Box::new(NamedPipeClient::new(PipePath::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::pipeline::PipelineStatus;

    fn snapshot() -> SessionSnapshot {
        SessionSnapshot {
            status: PipelineStatus::Ready,
            transcript: "raw".into(),
            formatted: "clean".into(),
            last_error: None,
        }
    }

    #[tokio::test]
    async fn toggle_is_forwarded() {
        let (tx, mut rx) = mpsc::channel(4);
        let response = respond("toggle", &tx, snapshot()).await;
        assert_eq!(response, "ok\n");
        assert_eq!(rx.recv().await, Some(DaemonSignal::Toggle));
    }

    #[tokio::test]
    async fn status_answers_from_snapshot() {
        let (tx, mut rx) = mpsc::channel(4);
        let response = respond("status", &tx, snapshot()).await;
        assert_eq!(response, "ready\n");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn show_carries_both_texts() {
        let (tx, _rx) = mpsc::channel(4);
        let response = respond("show", &tx, snapshot()).await;
        let parsed: serde_json::Value = serde_json::from_str(response.trim()).unwrap();
        assert_eq!(parsed["status"], "ready");
        assert_eq!(parsed["transcript"], "raw");
        assert_eq!(parsed["formatted"], "clean");
    }

    #[tokio::test]
    async fn rebind_carries_the_combo() {
        let (tx, mut rx) = mpsc::channel(4);
        let response = respond("rebind ctrl+shift+r", &tx, snapshot()).await;
        assert_eq!(response, "ok\n");
        assert_eq!(
            rx.recv().await,
            Some(DaemonSignal::Rebind("ctrl+shift+r".into()))
        );
    }

    #[tokio::test]
    async fn rebind_without_combo_is_an_error() {
        let (tx, mut rx) = mpsc::channel(4);
        let response = respond("rebind ", &tx, snapshot()).await;
        assert!(response.starts_with("error:"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn unknown_command_is_an_error() {
        let (tx, _rx) = mpsc::channel(4);
        let response = respond("explode", &tx, snapshot()).await;
        assert!(response.starts_with("error:"));
    }
}
