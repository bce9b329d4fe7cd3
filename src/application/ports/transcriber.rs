//! Speech-to-text port interface

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Transcription errors
#[derive(Debug, Clone, Error)]
pub enum TranscribeError {
    #[error("Audio file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to load speech model: {0}")]
    ModelLoad(String),

    #[error("Failed to read audio file: {0}")]
    AudioRead(String),

    #[error("Inference failed: {0}")]
    Inference(String),
}

/// Port for local speech-to-text
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribe an audio file to text.
    ///
    /// Blocks (asynchronously) until the model is loaded if the startup
    /// load is still in flight. A missing file fails immediately without
    /// touching the model. The returned text is whitespace-trimmed.
    async fn transcribe(&self, audio: &Path) -> Result<String, TranscribeError>;
}
