//! Daemon command handler - sends commands to a running daemon via IPC

use super::args::DaemonAction;
use super::ipc::create_ipc_client;
use super::presenter::Presenter;

/// Handle daemon subcommand
pub async fn handle_daemon_command(
    action: DaemonAction,
    presenter: &Presenter,
) -> Result<(), String> {
    let client = create_ipc_client();

    if !client.is_daemon_running() {
        return Err("No daemon running. Start with: speakwrite --daemon".to_string());
    }

    let cmd = match &action {
        DaemonAction::Toggle => "toggle".to_string(),
        DaemonAction::Cancel => "cancel".to_string(),
        DaemonAction::Inject => "inject".to_string(),
        DaemonAction::Status => "status".to_string(),
        DaemonAction::Show => "show".to_string(),
        DaemonAction::Rebind { combo } => format!("rebind {}", combo),
    };

    let response = client
        .send_command(&cmd)
        .await
        .map_err(|e| format!("Failed to communicate with daemon: {}", e))?;

    let response = response.trim();

    if let Some(stripped) = response.strip_prefix("error:") {
        return Err(stripped.trim().to_string());
    }

    match action {
        DaemonAction::Status => {
            presenter.info(&format!("Daemon status: {}", response));
        }
        DaemonAction::Show => match serde_json::from_str::<serde_json::Value>(response) {
            Ok(body) => {
                presenter.info(&format!(
                    "Daemon status: {}",
                    body["status"].as_str().unwrap_or("unknown")
                ));
                presenter.labeled("Transcript:", body["transcript"].as_str().unwrap_or(""));
                presenter.labeled("Formatted:", body["formatted"].as_str().unwrap_or(""));
                if let Some(error) = body["error"].as_str() {
                    presenter.warn(error);
                }
            }
            Err(_) => presenter.info(response),
        },
        _ => {
            presenter.info(&format!("Command sent: {}", cmd));
        }
    }

    Ok(())
}
