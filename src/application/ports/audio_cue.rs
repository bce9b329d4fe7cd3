//! Audio cue port for recording feedback
//!
//! Short tones confirm that capture actually started or stopped, since the
//! hotkey works from any application and the daemon window may not be
//! visible.

use async_trait::async_trait;
use thiserror::Error;

/// Types of audio cues that can be played
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CueKind {
    /// Higher tone when capture starts
    CaptureStart,
    /// Lower tone when capture stops
    CaptureStop,
    /// Double tap when a recording is abandoned
    CaptureCancel,
}

/// Errors that can occur during cue playback
#[derive(Debug, Clone, Error)]
pub enum AudioCueError {
    #[error("Playback failed: {0}")]
    PlaybackFailed(String),

    #[error("Audio output device not available: {0}")]
    DeviceNotAvailable(String),
}

/// Port trait for audio cue playback
#[async_trait]
pub trait AudioCue: Send + Sync {
    /// Play an audio cue
    async fn play(&self, kind: CueKind) -> Result<(), AudioCueError>;
}
