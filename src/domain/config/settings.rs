//! Settings document value object
//!
//! A flat key/value mapping persisted as TOML. Recognized keys carry typed
//! accessors with built-in defaults; unrecognized keys are accepted and
//! round-tripped untouched so a user's file is never clobbered.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use toml::Value;

use crate::domain::format::FormatMode;

/// Recognized settings keys, in the order they are listed to the user
pub const SETTING_KEYS: &[&str] = &[
    "hotkey",
    "chunk_duration",
    "sample_rate",
    "whisper_model",
    "use_fp16",
    "gemini_model",
    "format_mode",
    "theme",
    "log_level",
];

/// Built-in default for a recognized key
pub fn default_for(key: &str) -> Option<Value> {
    match key {
        "hotkey" => Some(Value::String("ctrl+alt+d".into())),
        "chunk_duration" => Some(Value::Integer(5)),
        "sample_rate" => Some(Value::Integer(16_000)),
        "whisper_model" => Some(Value::String("small".into())),
        "use_fp16" => Some(Value::Boolean(false)),
        "gemini_model" => Some(Value::String("gemini-2.0-flash-lite".into())),
        "format_mode" => Some(Value::String("general".into())),
        "theme" => Some(Value::String("light".into())),
        "log_level" => Some(Value::String("info".into())),
        _ => None,
    }
}

/// Flat settings document.
/// Values are stored untyped; typed accessors fall back to the built-in
/// default whenever a key is missing or holds a value of the wrong type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    values: BTreeMap<String, Value>,
}

impl Settings {
    /// Create an empty document (all keys resolve to defaults)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a document holding every recognized key at its default value
    pub fn defaults() -> Self {
        let mut values = BTreeMap::new();
        for key in SETTING_KEYS {
            if let Some(default) = default_for(key) {
                values.insert((*key).to_string(), default);
            }
        }
        Self { values }
    }

    /// Merge this document with another, where `other` takes precedence
    /// key by key. Keys present only in `self` survive.
    pub fn merge(mut self, other: Self) -> Self {
        for (key, value) in other.values {
            self.values.insert(key, value);
        }
        self
    }

    /// Get the stored value for a key, or its built-in default if absent
    pub fn get(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned().or_else(|| default_for(key))
    }

    /// Set a key to a value. Any key/value pair is accepted.
    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    /// Whether the document itself holds a value for the key
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Iterate over the stored entries
    pub fn entries(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn str_or_default(&self, key: &str) -> String {
        match self.values.get(key) {
            Some(Value::String(s)) => s.clone(),
            _ => match default_for(key) {
                Some(Value::String(s)) => s,
                _ => String::new(),
            },
        }
    }

    fn int_or_default(&self, key: &str) -> i64 {
        match self.values.get(key) {
            Some(Value::Integer(n)) => *n,
            _ => match default_for(key) {
                Some(Value::Integer(n)) => n,
                _ => 0,
            },
        }
    }

    fn bool_or_default(&self, key: &str) -> bool {
        match self.values.get(key) {
            Some(Value::Boolean(b)) => *b,
            _ => matches!(default_for(key), Some(Value::Boolean(true))),
        }
    }

    /// Hotkey combination string, e.g. `ctrl+alt+d`
    pub fn hotkey(&self) -> String {
        self.str_or_default("hotkey")
    }

    /// Fixed recording duration for oneshot mode, in seconds
    pub fn chunk_duration_secs(&self) -> u64 {
        self.int_or_default("chunk_duration").max(1) as u64
    }

    /// Target capture sample rate in Hz
    pub fn sample_rate(&self) -> u32 {
        self.int_or_default("sample_rate").max(1) as u32
    }

    /// Whisper model identifier (`small`, `base.en`, ...)
    pub fn whisper_model(&self) -> String {
        self.str_or_default("whisper_model")
    }

    /// Half-precision inference flag
    pub fn use_fp16(&self) -> bool {
        self.bool_or_default("use_fp16")
    }

    /// Remote generation model identifier
    pub fn gemini_model(&self) -> String {
        self.str_or_default("gemini_model")
    }

    /// Active format mode; unparseable values fall back to the default mode
    pub fn format_mode(&self) -> FormatMode {
        self.str_or_default("format_mode").parse().unwrap_or_default()
    }

    /// UI theme name
    pub fn theme(&self) -> String {
        self.str_or_default("theme")
    }

    /// Log filter directive for the tracing subscriber
    pub fn log_level(&self) -> String {
        self.str_or_default("log_level")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_recognized_key() {
        let settings = Settings::defaults();
        for key in SETTING_KEYS {
            assert!(settings.contains(key), "missing default for {}", key);
        }
    }

    #[test]
    fn defaults_have_expected_values() {
        let settings = Settings::defaults();
        assert_eq!(settings.hotkey(), "ctrl+alt+d");
        assert_eq!(settings.chunk_duration_secs(), 5);
        assert_eq!(settings.sample_rate(), 16_000);
        assert_eq!(settings.whisper_model(), "small");
        assert!(!settings.use_fp16());
        assert_eq!(settings.gemini_model(), "gemini-2.0-flash-lite");
        assert_eq!(settings.format_mode(), FormatMode::General);
        assert_eq!(settings.theme(), "light");
        assert_eq!(settings.log_level(), "info");
    }

    #[test]
    fn empty_document_resolves_defaults() {
        let settings = Settings::empty();
        assert!(!settings.contains("hotkey"));
        assert_eq!(settings.hotkey(), "ctrl+alt+d");
        assert_eq!(
            settings.get("format_mode"),
            Some(Value::String("general".into()))
        );
    }

    #[test]
    fn set_then_get_round_trips_any_pair() {
        let mut settings = Settings::empty();
        settings.set("hotkey", Value::String("ctrl+shift+r".into()));
        settings.set("custom_key", Value::Integer(42));

        assert_eq!(
            settings.get("hotkey"),
            Some(Value::String("ctrl+shift+r".into()))
        );
        assert_eq!(settings.get("custom_key"), Some(Value::Integer(42)));
    }

    #[test]
    fn get_unknown_unset_key_is_none() {
        let settings = Settings::empty();
        assert_eq!(settings.get("no_such_key"), None);
    }

    #[test]
    fn merge_other_takes_precedence() {
        let mut loaded = Settings::empty();
        loaded.set("format_mode", Value::String("bullets".into()));
        loaded.set("extra", Value::String("kept".into()));

        let merged = Settings::defaults().merge(loaded);

        assert_eq!(merged.format_mode(), FormatMode::Bullets);
        // Defaults survive for keys the loaded document lacks
        assert_eq!(merged.hotkey(), "ctrl+alt+d");
        assert!(merged.contains("hotkey"));
        // Unrecognized keys are not clobbered
        assert_eq!(merged.get("extra"), Some(Value::String("kept".into())));
    }

    #[test]
    fn wrong_typed_value_falls_back_to_default() {
        let mut settings = Settings::empty();
        settings.set("sample_rate", Value::String("not a number".into()));
        settings.set("use_fp16", Value::Integer(1));

        assert_eq!(settings.sample_rate(), 16_000);
        assert!(!settings.use_fp16());
    }

    #[test]
    fn unparseable_format_mode_falls_back() {
        let mut settings = Settings::empty();
        settings.set("format_mode", Value::String("haiku".into()));
        assert_eq!(settings.format_mode(), FormatMode::General);
    }

    #[test]
    fn toml_round_trip_is_flat() {
        let settings = Settings::defaults();
        let text = toml::to_string(&settings).unwrap();
        assert!(text.contains("hotkey = \"ctrl+alt+d\""));
        assert!(text.contains("format_mode = \"general\""));

        let parsed: Settings = toml::from_str(&text).unwrap();
        assert_eq!(parsed, settings);
    }
}
