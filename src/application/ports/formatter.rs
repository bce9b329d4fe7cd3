//! Text formatting port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::format::FormatMode;

/// Formatting errors
#[derive(Debug, Clone, Error)]
pub enum FormatError {
    #[error("Empty text provided")]
    EmptyInput,

    #[error("No API key configured. Set GEMINI_API_KEY to enable formatting.")]
    MissingCredential,

    #[error("API key was rejected")]
    CredentialRejected,

    #[error("Rate limit exceeded. Please try again later.")]
    RateLimited,

    #[error("Empty response from formatting service")]
    EmptyResponse,

    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    #[error("API error: {0}")]
    ApiError(String),
}

impl FormatError {
    /// The best-effort text to display when this error fails open:
    /// an empty input stays empty, every other failure preserves the
    /// user's words.
    pub fn fallback_text<'a>(&self, transcript: &'a str) -> &'a str {
        match self {
            Self::EmptyInput => "",
            _ => transcript,
        }
    }
}

/// Port for remote transcript cleanup.
///
/// At most one network call per invocation; empty input and a missing
/// credential fail before any request is made.
#[async_trait]
pub trait TextFormatter: Send + Sync {
    /// Reformat a transcript using the prompt template selected by `mode`
    async fn format(&self, transcript: &str, mode: FormatMode) -> Result<String, FormatError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_preserves_words_except_for_empty_input() {
        assert_eq!(FormatError::EmptyInput.fallback_text("ignored"), "");
        assert_eq!(
            FormatError::MissingCredential.fallback_text("my words"),
            "my words"
        );
        assert_eq!(
            FormatError::RequestFailed("boom".into()).fallback_text("my words"),
            "my words"
        );
    }
}
