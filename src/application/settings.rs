//! Settings service
//!
//! Owns the in-memory settings document and writes every mutation back to
//! the store. Persistence failures are logged and swallowed: the in-memory
//! value still takes effect for the rest of the process lifetime.

use std::sync::{Arc, RwLock};

use toml::Value;

use crate::domain::config::Settings;
use crate::domain::error::SettingsError;
use crate::domain::format::FormatMode;

use super::ports::SettingsStore;

/// Shared settings with write-through persistence
pub struct SettingsService {
    settings: RwLock<Settings>,
    store: Option<Arc<dyn SettingsStore>>,
}

impl SettingsService {
    /// Load settings through the store, creating the file with defaults on
    /// first run and writing back the default-merged document otherwise.
    pub async fn load(store: Arc<dyn SettingsStore>) -> Result<Self, SettingsError> {
        let settings = store.load_or_init().await?;
        Ok(Self {
            settings: RwLock::new(settings),
            store: Some(store),
        })
    }

    /// Create a service with no backing store. Mutations stay in memory.
    pub fn detached(settings: Settings) -> Self {
        Self {
            settings: RwLock::new(settings),
            store: None,
        }
    }

    /// Copy of the full current document
    pub fn snapshot(&self) -> Settings {
        self.settings.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Current value for a key, or its built-in default
    pub fn get(&self, key: &str) -> Option<Value> {
        self.settings
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(key)
    }

    /// Currently selected format mode
    pub fn format_mode(&self) -> FormatMode {
        self.settings
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .format_mode()
    }

    /// Currently configured hotkey combination string
    pub fn hotkey(&self) -> String {
        self.settings
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .hotkey()
    }

    /// Update a key and persist the full document before returning.
    /// A failed write leaves the in-memory value in effect.
    pub async fn set(&self, key: impl Into<String>, value: Value) {
        let key = key.into();
        let snapshot = {
            let mut settings = self.settings.write().unwrap_or_else(|e| e.into_inner());
            settings.set(key.clone(), value);
            settings.clone()
        };

        if let Some(store) = &self.store {
            if let Err(e) = store.save(&snapshot).await {
                tracing::warn!(key = %key, error = %e, "failed to persist settings; keeping in-memory value");
            }
        }
    }
}
