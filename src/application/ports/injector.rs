//! Keystroke injection port interface

use async_trait::async_trait;
use thiserror::Error;

/// Injection errors
#[derive(Debug, Clone, Error)]
pub enum InjectError {
    #[error("Empty text provided")]
    EmptyText,

    #[error("Failed to type text: {0}")]
    TypeFailed(String),
}

/// Port for typing text into the currently focused window.
///
/// Implementations wait a short grace period before typing so the user can
/// focus the intended target; partially typed text is never rolled back.
#[async_trait]
pub trait TextInjector: Send + Sync {
    /// Synthesize keystrokes for every character of `text`, in order
    async fn inject(&self, text: &str) -> Result<(), InjectError>;
}
