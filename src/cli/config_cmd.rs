//! Config command handler

use std::net::SocketAddr;

use crate::application::ports::ConfigStore;
use crate::domain::config::AppConfig;
use crate::domain::error::ConfigError;
use crate::domain::minutes::LanguageHint;
use crate::domain::timing::Duration;

use super::args::{is_valid_config_key, ConfigAction, VALID_CONFIG_KEYS};
use super::presenter::Presenter;

const NOT_SET: &str = "(not set)";

/// Handle config subcommand
pub async fn handle_config_command<S: ConfigStore>(
    action: ConfigAction,
    store: &S,
    presenter: &Presenter,
) -> Result<(), ConfigError> {
    match action {
        ConfigAction::Init => handle_init(store, presenter).await,
        ConfigAction::Set { key, value } => handle_set(store, presenter, &key, &value).await,
        ConfigAction::Get { key } => handle_get(store, presenter, &key).await,
        ConfigAction::List => handle_list(store, presenter).await,
        ConfigAction::Path => handle_path(store, presenter),
    }
}

async fn handle_init<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    store.init().await?;
    presenter.success(&format!(
        "Config file created at: {}",
        store.path().display()
    ));
    Ok(())
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    ensure_known_key(key)?;
    validate_config_value(key, value)?;

    let mut config = store.load().await?;
    write_key(&mut config, key, value)?;
    store.save(&config).await?;

    let shown = if key == "api_key" {
        mask_api_key(value)
    } else {
        value.to_string()
    };
    presenter.success(&format!("{} = {}", key, shown));

    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    ensure_known_key(key)?;

    let config = store.load().await?;
    match read_key(&config, key) {
        Some(v) => presenter.output(&v),
        None => presenter.output(NOT_SET),
    }

    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;

    for key in VALID_CONFIG_KEYS {
        let value = read_key(&config, key).unwrap_or_else(|| NOT_SET.to_string());
        presenter.key_value(key, &value);
    }

    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn ensure_known_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        })
    }
}

/// Display value for a key; the API key is masked
fn read_key(config: &AppConfig, key: &str) -> Option<String> {
    match key {
        "api_key" => config.api_key.as_deref().map(mask_api_key),
        "api_base_url" => config.api_base_url.clone(),
        "transcription_model" => config.transcription_model.clone(),
        "completion_model" => config.completion_model.clone(),
        "language" => config.language.clone(),
        "bind" => config.bind.clone(),
        "scratch_dir" => config.scratch_dir.clone(),
        "transcription_timeout" => config.transcription_timeout.clone(),
        "completion_timeout" => config.completion_timeout.clone(),
        "max_upload_mb" => config.max_upload_mb.map(|mb| mb.to_string()),
        _ => None,
    }
}

fn write_key(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    let value = value.to_string();
    match key {
        "api_key" => config.api_key = Some(value),
        "api_base_url" => config.api_base_url = Some(value),
        "transcription_model" => config.transcription_model = Some(value),
        "completion_model" => config.completion_model = Some(value),
        "language" => config.language = Some(value),
        "bind" => config.bind = Some(value),
        "scratch_dir" => config.scratch_dir = Some(value),
        "transcription_timeout" => config.transcription_timeout = Some(value),
        "completion_timeout" => config.completion_timeout = Some(value),
        "max_upload_mb" => config.max_upload_mb = Some(parse_megabytes(key, &value)?),
        _ => return ensure_known_key(key),
    }
    Ok(())
}

/// Validate a config value based on key type
pub fn validate_config_value(key: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::ValidationError {
        key: key.to_string(),
        message,
    };

    match key {
        "transcription_timeout" | "completion_timeout" => {
            value
                .parse::<Duration>()
                .map_err(|e| invalid(e.to_string()))?;
        }
        "language" => {
            value
                .parse::<LanguageHint>()
                .map_err(|e| invalid(e.to_string()))?;
        }
        "bind" => {
            value
                .parse::<SocketAddr>()
                .map_err(|_| invalid(format!("Expected <ip>:<port>, got '{}'", value)))?;
        }
        "api_base_url" => {
            if !(value.starts_with("http://") || value.starts_with("https://")) {
                return Err(invalid("URL must start with http:// or https://".to_string()));
            }
        }
        "max_upload_mb" => {
            parse_megabytes(key, value)?;
        }
        "api_key" | "transcription_model" | "completion_model" | "scratch_dir" => {
            if value.trim().is_empty() {
                return Err(invalid("Value must not be empty".to_string()));
            }
        }
        _ => {}
    }
    Ok(())
}

fn parse_megabytes(key: &str, value: &str) -> Result<u64, ConfigError> {
    match value.parse::<u64>() {
        Ok(mb) if mb > 0 => Ok(mb),
        _ => Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: "Value must be a positive whole number of megabytes".to_string(),
        }),
    }
}

/// Mask API key for display (show first 4 and last 4 chars)
fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}
