//! Local speech-to-text adapters

mod whisper;

pub use whisper::{WhisperConfig, WhisperSpeechToText};
