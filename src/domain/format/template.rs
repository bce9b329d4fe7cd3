//! Prompt templates for remote text cleanup

use super::mode::FormatMode;

/// Placeholder substituted with the transcript when a template is rendered
const TRANSCRIPT_SLOT: &str = "{transcript}";

const GENERAL_TEMPLATE: &str = "\
You are a helpful assistant. Clean up the following raw transcribed text:
- Add proper punctuation
- Capitalize sentences
- Remove filler words if any
- Preserve the original intent and tone

Text: \"{transcript}\"";

const EMAIL_TEMPLATE: &str = "\
Act as a professional assistant. Turn the following spoken notes into a formal email:
- Add a greeting, structure, and sign-off
- Fix grammar and add bullet points where they help
- Maintain a polite tone

Notes: \"{transcript}\"";

const BULLETS_TEMPLATE: &str = "\
Convert this transcribed text into a clean, readable bullet point list.
Use sentence casing and clarity.

Text: \"{transcript}\"";

/// A fully rendered prompt, ready to send to the remote generation service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    content: String,
}

impl Prompt {
    /// Render the template selected by `mode` with the transcript
    /// substituted in
    pub fn render(mode: FormatMode, transcript: &str) -> Self {
        let template = match mode {
            FormatMode::General => GENERAL_TEMPLATE,
            FormatMode::Email => EMAIL_TEMPLATE,
            FormatMode::Bullets => BULLETS_TEMPLATE,
        };
        Self {
            content: template.replace(TRANSCRIPT_SLOT, transcript),
        }
    }

    /// Get the prompt content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consume and return the content
    pub fn into_content(self) -> String {
        self.content
    }
}
