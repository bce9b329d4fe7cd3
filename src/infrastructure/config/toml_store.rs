//! TOML settings store adapter

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use crate::application::ports::SettingsStore;
use crate::domain::config::Settings;
use crate::domain::error::SettingsError;
use crate::infrastructure::paths;

/// XDG-compliant TOML settings store
pub struct TomlSettingsStore {
    path: PathBuf,
}

impl TomlSettingsStore {
    /// Create a store at the default XDG path
    pub fn new() -> Self {
        Self {
            path: paths::config_file(),
        }
    }

    /// Create with custom path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parse_toml(content: &str) -> Result<Settings, SettingsError> {
        toml::from_str(content).map_err(|e| SettingsError::ParseError(e.to_string()))
    }

    fn to_toml(settings: &Settings) -> Result<String, SettingsError> {
        toml::to_string_pretty(settings).map_err(|e| SettingsError::WriteError(e.to_string()))
    }
}

impl Default for TomlSettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettingsStore for TomlSettingsStore {
    async fn load(&self) -> Result<Settings, SettingsError> {
        if !self.exists() {
            return Ok(Settings::empty());
        }

        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| SettingsError::ReadError(e.to_string()))?;

        Self::parse_toml(&content)
    }

    async fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| SettingsError::WriteError(e.to_string()))?;
        }

        let content = Self::to_toml(settings)?;

        fs::write(&self.path, content)
            .await
            .map_err(|e| SettingsError::WriteError(e.to_string()))?;

        Ok(())
    }

    fn path(&self) -> PathBuf {
        self.path.clone()
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }

    async fn init(&self) -> Result<(), SettingsError> {
        if self.exists() {
            return Err(SettingsError::AlreadyExists(
                self.path.to_string_lossy().to_string(),
            ));
        }

        self.save(&Settings::defaults()).await
    }
}
