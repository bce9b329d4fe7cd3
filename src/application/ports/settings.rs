//! Settings storage port interface

use async_trait::async_trait;
use std::path::PathBuf;

use crate::domain::config::Settings;
use crate::domain::error::SettingsError;

/// Port for settings persistence
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Load the settings document from storage.
    /// Returns an empty document when the file does not exist.
    async fn load(&self) -> Result<Settings, SettingsError>;

    /// Save the full settings document to storage
    async fn save(&self, settings: &Settings) -> Result<(), SettingsError>;

    /// Get the settings file path
    fn path(&self) -> PathBuf;

    /// Check if the settings file exists
    fn exists(&self) -> bool;

    /// Initialize the settings file with defaults.
    /// Fails if the file already exists.
    async fn init(&self) -> Result<(), SettingsError>;

    /// Load the default-merged document, creating or refreshing the file
    /// on disk so every recognized key is present with at least its
    /// default value.
    async fn load_or_init(&self) -> Result<Settings, SettingsError> {
        if !self.exists() {
            let defaults = Settings::defaults();
            self.save(&defaults).await?;
            return Ok(defaults);
        }
        let merged = Settings::defaults().merge(self.load().await?);
        self.save(&merged).await?;
        Ok(merged)
    }
}
