//! CLI argument definitions using Clap

use clap::{Parser, Subcommand, ValueEnum};

use crate::domain::format::FormatMode;

/// SpeakWrite - push-to-talk dictation with AI cleanup
#[derive(Parser, Debug)]
#[command(name = "speakwrite")]
#[command(version)]
#[command(about = "Dictate anywhere: record, transcribe locally, clean up with Gemini, type into the focused window")]
#[command(long_about = None)]
pub struct Cli {
    /// Record for a fixed number of seconds instead of toggling
    /// (defaults to the chunk_duration setting)
    #[arg(short = 'd', long, value_name = "SECONDS", conflicts_with = "daemon")]
    pub duration: Option<u64>,

    /// Format mode for the cleanup prompt
    #[arg(short = 'm', long, value_name = "MODE")]
    pub mode: Option<ModeArg>,

    /// Type the formatted text into the focused window when done
    #[arg(short = 'k', long, conflicts_with = "daemon")]
    pub inject: bool,

    /// Show desktop notifications
    #[arg(short = 'n', long)]
    pub notify: bool,

    /// Run as daemon (control via: speakwrite daemon toggle/inject/status)
    #[arg(long)]
    pub daemon: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Send commands to a running daemon
    Daemon {
        #[command(subcommand)]
        action: DaemonAction,
    },
}

/// Daemon control actions
#[derive(Subcommand, Debug, Clone)]
pub enum DaemonAction {
    /// Toggle recording (start if ready, stop if recording)
    Toggle,
    /// Cancel the current recording without transcribing
    Cancel,
    /// Type the formatted text into the focused window
    Inject,
    /// Show the daemon's pipeline status
    Status,
    /// Show status, transcript, and formatted text
    Show,
    /// Rebind the global hotkey, e.g. ctrl+shift+r
    Rebind {
        /// New key combination
        combo: String,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create the settings file with defaults
    Init,
    /// Set a settings value
    Set {
        /// Settings key
        key: String,
        /// Settings value
        value: String,
    },
    /// Get a settings value
    Get {
        /// Settings key
        key: String,
    },
    /// List all settings values
    List,
    /// Show the settings file path
    Path,
}

/// Format mode argument for clap ValueEnum
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModeArg {
    General,
    Email,
    Bullets,
}

impl From<ModeArg> for FormatMode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::General => FormatMode::General,
            ModeArg::Email => FormatMode::Email,
            ModeArg::Bullets => FormatMode::Bullets,
        }
    }
}

impl From<FormatMode> for ModeArg {
    fn from(mode: FormatMode) -> Self {
        match mode {
            FormatMode::General => ModeArg::General,
            FormatMode::Email => ModeArg::Email,
            FormatMode::Bullets => ModeArg::Bullets,
        }
    }
}

/// Parsed oneshot options
#[derive(Debug, Clone)]
pub struct OneshotOptions {
    /// Recording length in seconds
    pub duration_secs: u64,
    /// Format mode override for this run
    pub mode: Option<FormatMode>,
    /// Type the result into the focused window
    pub inject: bool,
    /// Show desktop notifications
    pub notify: bool,
}

/// Parsed daemon options
#[derive(Debug, Clone)]
pub struct DaemonOptions {
    /// Show desktop notifications
    pub notify: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_parses_defaults() {
        let cli = Cli::parse_from(["speakwrite"]);
        assert!(cli.duration.is_none());
        assert!(cli.mode.is_none());
        assert!(!cli.inject);
        assert!(!cli.notify);
        assert!(!cli.daemon);
    }

    #[test]
    fn cli_parses_duration() {
        let cli = Cli::parse_from(["speakwrite", "-d", "8"]);
        assert_eq!(cli.duration, Some(8));
    }

    #[test]
    fn cli_parses_mode() {
        let cli = Cli::parse_from(["speakwrite", "-m", "bullets"]);
        assert_eq!(cli.mode, Some(ModeArg::Bullets));
    }

    #[test]
    fn cli_parses_flags() {
        let cli = Cli::parse_from(["speakwrite", "-k", "-n"]);
        assert!(cli.inject);
        assert!(cli.notify);
    }

    #[test]
    fn cli_parses_daemon() {
        let cli = Cli::parse_from(["speakwrite", "--daemon"]);
        assert!(cli.daemon);
    }

    #[test]
    fn duration_conflicts_with_daemon() {
        assert!(Cli::try_parse_from(["speakwrite", "--daemon", "-d", "5"]).is_err());
    }

    #[test]
    fn cli_parses_config_init() {
        let cli = Cli::parse_from(["speakwrite", "config", "init"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Config {
                action: ConfigAction::Init
            })
        ));
    }

    #[test]
    fn cli_parses_config_set() {
        let cli = Cli::parse_from(["speakwrite", "config", "set", "format_mode", "email"]);
        if let Some(Commands::Config {
            action: ConfigAction::Set { key, value },
        }) = cli.command
        {
            assert_eq!(key, "format_mode");
            assert_eq!(value, "email");
        } else {
            panic!("Expected Config Set command");
        }
    }

    #[test]
    fn cli_parses_daemon_rebind() {
        let cli = Cli::parse_from(["speakwrite", "daemon", "rebind", "ctrl+shift+r"]);
        if let Some(Commands::Daemon {
            action: DaemonAction::Rebind { combo },
        }) = cli.command
        {
            assert_eq!(combo, "ctrl+shift+r");
        } else {
            panic!("Expected Daemon Rebind command");
        }
    }

    #[test]
    fn mode_arg_converts_to_format_mode() {
        assert_eq!(FormatMode::from(ModeArg::General), FormatMode::General);
        assert_eq!(FormatMode::from(ModeArg::Bullets), FormatMode::Bullets);
        assert_eq!(ModeArg::from(FormatMode::Email), ModeArg::Email);
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }
}
