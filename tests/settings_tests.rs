//! Settings store integration tests
//!
//! Exercises first-run initialization, default merging, write-back, and
//! set/get round-trips against real files.

use std::sync::Arc;

use toml::Value;

use speakwrite::application::ports::SettingsStore;
use speakwrite::application::SettingsService;
use speakwrite::domain::config::{Settings, SETTING_KEYS};
use speakwrite::infrastructure::TomlSettingsStore;

fn store_in(dir: &tempfile::TempDir) -> TomlSettingsStore {
    TomlSettingsStore::with_path(dir.path().join("config.toml"))
}

#[tokio::test]
async fn first_run_creates_file_with_all_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);
    assert!(!store.exists());

    let settings = store.load_or_init().await.unwrap();

    assert!(store.exists());
    assert_eq!(settings.hotkey(), "ctrl+alt+d");

    let on_disk = std::fs::read_to_string(store.path()).unwrap();
    assert!(on_disk.contains("hotkey = \"ctrl+alt+d\""));
    assert!(on_disk.contains("format_mode = \"general\""));
    for key in SETTING_KEYS {
        assert!(on_disk.contains(key), "default file missing key {}", key);
    }
}

#[tokio::test]
async fn partial_file_is_merged_with_defaults_and_written_back() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    std::fs::write(store.path(), "format_mode = \"bullets\"\n").unwrap();

    let settings = store.load_or_init().await.unwrap();

    // The user's value wins, missing keys resolve to defaults
    assert_eq!(settings.format_mode().to_string(), "bullets");
    assert_eq!(settings.hotkey(), "ctrl+alt+d");

    // The merged document is written back so new default keys appear
    let on_disk = std::fs::read_to_string(store.path()).unwrap();
    assert!(on_disk.contains("format_mode = \"bullets\""));
    assert!(on_disk.contains("hotkey = \"ctrl+alt+d\""));
}

#[tokio::test]
async fn unrecognized_keys_survive_the_merge() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    std::fs::write(store.path(), "my_custom_key = \"kept\"\n").unwrap();

    let settings = store.load_or_init().await.unwrap();
    assert_eq!(
        settings.get("my_custom_key"),
        Some(Value::String("kept".into()))
    );

    let on_disk = std::fs::read_to_string(store.path()).unwrap();
    assert!(on_disk.contains("my_custom_key = \"kept\""));
}

#[tokio::test]
async fn set_then_get_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    let mut settings = store.load_or_init().await.unwrap();
    settings.set("hotkey", Value::String("ctrl+shift+r".into()));
    settings.set("arbitrary", Value::Integer(7));
    store.save(&settings).await.unwrap();

    let reloaded = store.load().await.unwrap();
    assert_eq!(reloaded.hotkey(), "ctrl+shift+r");
    assert_eq!(reloaded.get("arbitrary"), Some(Value::Integer(7)));
}

#[tokio::test]
async fn init_fails_when_file_exists() {
    let dir = tempfile::tempdir().unwrap();
    let store = store_in(&dir);

    store.init().await.unwrap();
    assert!(store.init().await.is_err());
}

#[tokio::test]
async fn service_persists_every_mutation() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(store_in(&dir));
    let service = SettingsService::load(Arc::clone(&store) as Arc<dyn SettingsStore>)
        .await
        .unwrap();

    service
        .set("format_mode", Value::String("email".into()))
        .await;

    // A fresh read from disk sees the change
    let reloaded = store.load().await.unwrap();
    assert_eq!(
        reloaded.get("format_mode"),
        Some(Value::String("email".into()))
    );
}

#[tokio::test]
async fn missing_keys_resolve_to_defaults_in_memory() {
    let settings = Settings::empty();
    assert_eq!(settings.sample_rate(), 16_000);
    assert_eq!(settings.whisper_model(), "small");
    assert_eq!(settings.chunk_duration_secs(), 5);
}
