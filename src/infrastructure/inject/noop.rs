//! No-op injector for headless environments and tests

use async_trait::async_trait;

use crate::application::ports::{InjectError, TextInjector};

/// Injector that types nothing, mirroring the real adapter's empty-text
/// contract
pub struct NoOpInjector;

impl NoOpInjector {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpInjector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TextInjector for NoOpInjector {
    async fn inject(&self, text: &str) -> Result<(), InjectError> {
        if text.is_empty() {
            return Err(InjectError::EmptyText);
        }
        tracing::debug!(chars = text.chars().count(), "no-op injector discarded text");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_empty_text() {
        assert!(NoOpInjector::new().inject("").await.is_err());
    }

    #[tokio::test]
    async fn accepts_non_empty_text() {
        assert!(NoOpInjector::new().inject("hello").await.is_ok());
    }
}
