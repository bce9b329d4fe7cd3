//! CLI integration tests
//!
//! Each test runs the binary against an isolated XDG environment so no
//! real user configuration or daemon is touched.

use assert_cmd::Command;
use predicates::prelude::*;

fn speakwrite(env_dir: &tempfile::TempDir) -> Command {
    let mut cmd = Command::cargo_bin("speakwrite").unwrap();
    cmd.env("HOME", env_dir.path())
        .env("XDG_CONFIG_HOME", env_dir.path().join("config"))
        .env("XDG_DATA_HOME", env_dir.path().join("data"))
        .env("XDG_RUNTIME_DIR", env_dir.path().join("runtime"));
    cmd
}

#[test]
fn help_mentions_daemon_mode() {
    let dir = tempfile::tempdir().unwrap();
    speakwrite(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--daemon"));
}

#[test]
fn config_init_creates_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    speakwrite(&dir)
        .args(["config", "init"])
        .assert()
        .success()
        .stderr(predicate::str::contains("config.toml"));

    let config = dir.path().join("config/speakwrite/config.toml");
    assert!(config.exists());
    let content = std::fs::read_to_string(config).unwrap();
    assert!(content.contains("hotkey = \"ctrl+alt+d\""));
    assert!(content.contains("format_mode = \"general\""));
}

#[test]
fn config_init_twice_fails() {
    let dir = tempfile::tempdir().unwrap();
    speakwrite(&dir).args(["config", "init"]).assert().success();
    speakwrite(&dir)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn config_get_returns_default_without_file() {
    let dir = tempfile::tempdir().unwrap();
    speakwrite(&dir)
        .args(["config", "get", "hotkey"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ctrl+alt+d"));
}

#[test]
fn config_get_unknown_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    speakwrite(&dir)
        .args(["config", "get", "no_such_key"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown settings key"));
}

#[test]
fn config_set_then_get_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    speakwrite(&dir)
        .args(["config", "set", "format_mode", "bullets"])
        .assert()
        .success();

    speakwrite(&dir)
        .args(["config", "get", "format_mode"])
        .assert()
        .success()
        .stdout(predicate::str::contains("bullets"));
}

#[test]
fn config_set_unrecognized_key_warns_but_succeeds() {
    let dir = tempfile::tempdir().unwrap();
    speakwrite(&dir)
        .args(["config", "set", "mystery", "42"])
        .assert()
        .success()
        .stderr(predicate::str::contains("not a recognized key"));

    speakwrite(&dir)
        .args(["config", "get", "mystery"])
        .assert()
        .success()
        .stdout(predicate::str::contains("42"));
}

#[test]
fn config_list_shows_defaults() {
    let dir = tempfile::tempdir().unwrap();
    speakwrite(&dir)
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("hotkey"))
        .stdout(predicate::str::contains("whisper_model"));
}

#[test]
fn config_path_points_into_xdg_dir() {
    let dir = tempfile::tempdir().unwrap();
    speakwrite(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("speakwrite"));
}

#[test]
fn daemon_command_without_daemon_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("runtime")).unwrap();
    speakwrite(&dir)
        .args(["daemon", "status"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No daemon running"));
}
