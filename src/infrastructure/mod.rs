//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces, integrating
//! with external systems: the microphone, whisper.cpp, the Gemini API,
//! the OS input stack, and the filesystem.

pub mod audio;
pub mod config;
pub mod cue;
pub mod format;
pub mod hotkey;
pub mod inject;
pub mod logging;
pub mod notification;
pub mod paths;
pub mod stt;

// Re-export adapters
pub use audio::CpalRecorder;
pub use config::TomlSettingsStore;
pub use cue::{NoOpCue, RodioCue};
pub use format::{GeminiFormatter, API_KEY_ENV};
pub use hotkey::RdevHotkeyListener;
pub use inject::{EnigoInjector, NoOpInjector};
pub use notification::{create_notifier, NoOpNotifier, NotifyRustNotifier};
pub use stt::{WhisperConfig, WhisperSpeechToText};
