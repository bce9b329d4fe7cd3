//! Well-known filesystem locations
//!
//! Config lives in the XDG config dir; recordings, models, and logs live
//! under the local data dir.

use std::path::PathBuf;

const APP_DIR: &str = "speakwrite";

/// Path of the settings file
pub fn config_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join(APP_DIR)
        .join("config.toml")
}

fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("~/.local/share"))
        .join(APP_DIR)
}

/// Directory that completed recordings are written to
pub fn recordings_dir() -> PathBuf {
    data_dir().join("recordings")
}

/// Directory that whisper model files are resolved from
pub fn models_dir() -> PathBuf {
    data_dir().join("models")
}

/// Directory that daily log files are written to
pub fn logs_dir() -> PathBuf {
    data_dir().join("logs")
}
