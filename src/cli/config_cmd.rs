//! Config command handler

use toml::Value;

use crate::application::ports::SettingsStore;
use crate::domain::config::{Settings, SETTING_KEYS};
use crate::domain::error::SettingsError;

use super::args::ConfigAction;
use super::presenter::Presenter;

/// Handle config subcommand
pub async fn handle_config_command<S: SettingsStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), SettingsError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: SettingsStore>(
    store: &S,
    presenter: &Presenter,
) -> Result<(), SettingsError> {
    store.init().await?;
    presenter.success(&format!(
        "Settings file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: SettingsStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), SettingsError> {
    // Any key/value is accepted; unrecognized keys just get a heads-up
    if !SETTING_KEYS.contains(&key) {
        presenter.warn(&format!(
            "\"{}\" is not a recognized key (recognized: {})",
            key,
            SETTING_KEYS.join(", ")
        ));
    }

    let mut settings = store.load().await?;
    settings.set(key, parse_cli_value(value));
    store.save(&settings).await?;

    presenter.success(&format!("{} = {}", key, value));
    Ok(())
}

async fn handle_get<S: SettingsStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), SettingsError> {
    let settings = store.load().await?;

    match settings.get(key) {
        Some(value) => {
            presenter.output(&display_value(&value));
            Ok(())
        }
        None => Err(SettingsError::UnknownKey {
            key: key.to_string(),
            valid: SETTING_KEYS.join(", "),
        }),
    }
}

async fn handle_list<S: SettingsStore>(
    store: &S,
    presenter: &Presenter,
) -> Result<(), SettingsError> {
    let settings = Settings::defaults().merge(store.load().await?);

    for (key, value) in settings.entries() {
        presenter.key_value(key, &display_value(value));
    }
    Ok(())
}

fn handle_path<S: SettingsStore>(store: &S, presenter: &Presenter) -> Result<(), SettingsError> {
    presenter.output(&store.path().display().to_string());
    Ok(())
}

/// Interpret a command-line value string as the closest TOML value
fn parse_cli_value(value: &str) -> Value {
    match value {
        "true" => return Value::Boolean(true),
        "false" => return Value::Boolean(false),
        _ => {}
    }
    if let Ok(n) = value.parse::<i64>() {
        return Value::Integer(n);
    }
    if let Ok(f) = value.parse::<f64>() {
        return Value::Float(f);
    }
    Value::String(value.to_string())
}

/// Render a TOML value the way a user typed it
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_cli_value_booleans() {
        assert_eq!(parse_cli_value("true"), Value::Boolean(true));
        assert_eq!(parse_cli_value("false"), Value::Boolean(false));
    }

    #[test]
    fn parse_cli_value_numbers() {
        assert_eq!(parse_cli_value("16000"), Value::Integer(16000));
        assert_eq!(parse_cli_value("1.5"), Value::Float(1.5));
    }

    #[test]
    fn parse_cli_value_strings() {
        assert_eq!(
            parse_cli_value("ctrl+alt+d"),
            Value::String("ctrl+alt+d".into())
        );
        // "True" is not a TOML boolean
        assert_eq!(parse_cli_value("True"), Value::String("True".into()));
    }

    #[test]
    fn display_value_strings_are_unquoted() {
        assert_eq!(display_value(&Value::String("general".into())), "general");
        assert_eq!(display_value(&Value::Integer(5)), "5");
        assert_eq!(display_value(&Value::Boolean(false)), "false");
    }
}
