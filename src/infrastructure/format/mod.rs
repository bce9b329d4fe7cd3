//! Remote text formatting adapters

mod gemini;

pub use gemini::{GeminiFormatter, API_KEY_ENV};
