//! Gemini API formatter adapter
//!
//! Sends the mode-selected prompt with the transcript interpolated in and
//! returns the trimmed response. Empty input and a missing credential are
//! rejected before any request; exactly one request is made otherwise.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::application::ports::{FormatError, TextFormatter};
use crate::domain::format::{FormatMode, Prompt};

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Gemini API base URL
const API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

// Request types for the Gemini API

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

// Response types for the Gemini API

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

/// Gemini API formatter
pub struct GeminiFormatter {
    api_key: Option<String>,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiFormatter {
    /// Create a formatter. `api_key` is `None` when no credential is
    /// configured; formatting then fails open without a network call.
    pub fn new(api_key: Option<String>, model: impl Into<String>) -> Self {
        Self {
            api_key,
            model: model.into(),
            base_url: API_BASE_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Create a formatter reading the credential from the environment
    pub fn from_env(model: impl Into<String>) -> Self {
        let api_key = std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty());
        if api_key.is_none() {
            tracing::warn!(
                "{} not set; transcripts will be shown unformatted",
                API_KEY_ENV
            );
        }
        Self::new(api_key, model)
    }

    /// Override the API base URL (tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn api_url(&self, api_key: &str) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            self.base_url, self.model, api_key
        )
    }

    fn build_request(prompt: Prompt) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: prompt.into_content(),
                }],
            }],
        }
    }

    fn extract_text(response: &GenerateContentResponse) -> Option<String> {
        let parts: Vec<&str> = response
            .candidates
            .as_ref()?
            .first()?
            .content
            .as_ref()?
            .parts
            .as_ref()?
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();

        if parts.is_empty() {
            None
        } else {
            Some(parts.join(""))
        }
    }
}

#[async_trait]
impl TextFormatter for GeminiFormatter {
    async fn format(&self, transcript: &str, mode: FormatMode) -> Result<String, FormatError> {
        if transcript.is_empty() {
            return Err(FormatError::EmptyInput);
        }

        let Some(api_key) = self.api_key.as_deref() else {
            return Err(FormatError::MissingCredential);
        };

        let url = self.api_url(api_key);
        let body = Self::build_request(Prompt::render(mode, transcript));

        tracing::info!(mode = %mode, model = %self.model, "requesting formatting");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| FormatError::RequestFailed(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(FormatError::CredentialRejected);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(FormatError::RateLimited);
        }

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(FormatError::ApiError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| FormatError::ParseError(e.to_string()))?;

        if let Some(error) = response.error {
            return Err(FormatError::ApiError(error.message));
        }

        let text = Self::extract_text(&response).ok_or(FormatError::EmptyResponse)?;

        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(FormatError::EmptyResponse);
        }

        Ok(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_contains_model_and_key() {
        let formatter = GeminiFormatter::new(Some("test-api-key".into()), "gemini-2.0-flash-lite");
        let url = formatter.api_url("test-api-key");

        assert!(url.contains("gemini-2.0-flash-lite"));
        assert!(url.contains("test-api-key"));
        assert!(url.contains("generateContent"));
    }

    #[test]
    fn build_request_carries_rendered_prompt() {
        let request =
            GeminiFormatter::build_request(Prompt::render(FormatMode::Bullets, "buy milk"));

        assert_eq!(request.contents.len(), 1);
        assert_eq!(request.contents[0].role, "user");
        assert!(request.contents[0].parts[0].text.contains("buy milk"));
        assert!(request.contents[0].parts[0].text.contains("bullet point list"));
    }

    #[test]
    fn extract_text_from_response() {
        let response = GenerateContentResponse {
            candidates: Some(vec![Candidate {
                content: Some(CandidateContent {
                    parts: Some(vec![ResponsePart {
                        text: Some("Hello world".to_string()),
                    }]),
                }),
            }]),
            error: None,
        };

        assert_eq!(
            GeminiFormatter::extract_text(&response),
            Some("Hello world".to_string())
        );
    }

    #[test]
    fn extract_text_empty_response() {
        let response = GenerateContentResponse {
            candidates: None,
            error: None,
        };

        assert!(GeminiFormatter::extract_text(&response).is_none());
    }

    #[tokio::test]
    async fn empty_transcript_fails_before_any_request() {
        let formatter = GeminiFormatter::new(Some("key".into()), "model")
            .with_base_url("http://127.0.0.1:1"); // would fail loudly if contacted

        let err = formatter.format("", FormatMode::General).await.unwrap_err();
        assert!(matches!(err, FormatError::EmptyInput));
    }

    #[tokio::test]
    async fn missing_credential_fails_before_any_request() {
        let formatter =
            GeminiFormatter::new(None, "model").with_base_url("http://127.0.0.1:1");

        let err = formatter
            .format("some words", FormatMode::General)
            .await
            .unwrap_err();
        assert!(matches!(err, FormatError::MissingCredential));
    }
}
