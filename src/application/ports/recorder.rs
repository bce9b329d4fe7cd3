//! Audio capture port interface

use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

/// Capture errors
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("Failed to start capture: {0}")]
    StartFailed(String),

    #[error("No audio input device available")]
    NoAudioDevice,

    #[error("Audio stream failed: {0}")]
    StreamFailed(String),

    #[error("Failed to write recording: {0}")]
    WriteFailed(String),
}

/// One flushed capture session
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedClip {
    /// Path of the written audio file
    pub path: PathBuf,
    /// Recorded length in milliseconds
    pub duration_ms: u64,
}

/// Port for microphone capture.
///
/// One session at a time: `start` while capturing and `stop` while idle are
/// both no-ops rather than errors.
#[async_trait]
pub trait Recorder: Send + Sync {
    /// Begin a capture session. No-op if one is already active.
    async fn start(&self) -> Result<(), CaptureError>;

    /// End the active session and flush it to a file.
    ///
    /// Returns `Ok(None)` when no session was active or when no audio was
    /// delivered between start and stop - a normal "nothing to transcribe"
    /// outcome, not an error.
    async fn stop(&self) -> Result<Option<RecordedClip>, CaptureError>;

    /// Discard the active session without flushing a file
    async fn cancel(&self) -> Result<(), CaptureError>;

    /// Check if a session is active
    fn is_capturing(&self) -> bool;
}
