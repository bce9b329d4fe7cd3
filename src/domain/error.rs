//! Domain error types

use thiserror::Error;

/// Error when an invalid format mode is provided
#[derive(Debug, Clone, Error)]
#[error("Invalid format mode: \"{input}\". Valid modes are: general, email, bullets")]
pub struct InvalidFormatModeError {
    pub input: String,
}

/// Error when a hotkey combination string cannot be parsed
#[derive(Debug, Clone, Error)]
#[error("Invalid hotkey combination: \"{input}\". Expected zero or more modifiers plus one key, e.g. ctrl+alt+d")]
pub struct InvalidChordError {
    pub input: String,
}

/// Error when settings persistence fails
#[derive(Debug, Clone, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    ReadError(String),

    #[error("Failed to parse settings file: {0}")]
    ParseError(String),

    #[error("Failed to write settings file: {0}")]
    WriteError(String),

    #[error("Unknown settings key: \"{key}\". Recognized keys: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Settings file already exists at: {0}")]
    AlreadyExists(String),
}
