//! Config command handler

use crate::application::ports::ConfigStore;
use crate::domain::config::{
    AppConfig, RecordingConfig, CLOCK_INTERVAL_RANGE_MS, VALID_LOG_LEVELS,
};
use crate::domain::error::ConfigError;
use crate::domain::recording::{CHANNEL_RANGE, SAMPLE_RATE_RANGE};

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

fn check_key(key: &str) -> Result<(), ConfigError> {
    if is_valid_config_key(key) {
        Ok(())
    } else {
        Err(ConfigError::ValidationError {
            key: key.to_string(),
            message: format!("Unknown key. Valid keys: {}", VALID_CONFIG_KEYS.join(", ")),
        })
    }
}

async fn handle_set<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
    value: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;
    let mut config = store.load().await?;
    apply_value(&mut config, key, value)?;
    store.save(&config).await?;
    presenter.success(&format!("{} = {}", key, value));
    Ok(())
}

async fn handle_get<S: ConfigStore>(
    store: &S,
    presenter: &Presenter,
    key: &str,
) -> Result<(), ConfigError> {
    check_key(key)?;
    let config = store.load().await?;
    match read_value(&config, key) {
        Some(v) => presenter.output(&v),
        None => presenter.output(NOT_SET),
    }
    Ok(())
}

async fn handle_list<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    let config = store.load().await?;
    for key in VALID_CONFIG_KEYS {
        let value = read_value(&config, key);
        presenter.key_value(key, value.as_deref().unwrap_or(NOT_SET));
    }
    Ok(())
}

fn handle_path<S: ConfigStore>(store: &S, presenter: &Presenter) -> Result<(), ConfigError> {
    presenter.output(&store.path().to_string_lossy());
    Ok(())
}

fn read_value(config: &AppConfig, key: &str) -> Option<String> {
    let recording = config.recording.as_ref();
    match key {
        "storage_dir" => config.storage_dir.clone(),
        "recording.sample_rate" => recording.and_then(|r| r.sample_rate).map(|v| v.to_string()),
        "recording.channels" => recording.and_then(|r| r.channels).map(|v| v.to_string()),
        "clock_interval_ms" => config.clock_interval_ms.map(|v| v.to_string()),
        "log_level" => config.log_level.clone(),
        _ => None,
    }
}

/// Validate `value` for `key` and store it in `config`
fn apply_value(config: &mut AppConfig, key: &str, value: &str) -> Result<(), ConfigError> {
    let invalid = |message: String| ConfigError::ValidationError {
        key: key.to_string(),
        message,
    };

    match key {
        "storage_dir" => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                return Err(invalid("Value must not be empty".to_string()));
            }
            config.storage_dir = Some(trimmed.to_string());
        }
        "recording.sample_rate" => {
            let rate = parse_in_range(value, &SAMPLE_RATE_RANGE).map_err(invalid)?;
            config
                .recording
                .get_or_insert_with(RecordingConfig::default)
                .sample_rate = Some(rate);
        }
        "recording.channels" => {
            let channels = parse_in_range(value, &CHANNEL_RANGE).map_err(invalid)?;
            config
                .recording
                .get_or_insert_with(RecordingConfig::default)
                .channels = Some(channels);
        }
        "clock_interval_ms" => {
            config.clock_interval_ms =
                Some(parse_in_range(value, &CLOCK_INTERVAL_RANGE_MS).map_err(invalid)?);
        }
        "log_level" => {
            let level = value.trim().to_lowercase();
            if !VALID_LOG_LEVELS.contains(&level.as_str()) {
                return Err(invalid(format!(
                    "Invalid value '{}'. Valid options: {}",
                    value,
                    VALID_LOG_LEVELS.join(", ")
                )));
            }
            config.log_level = Some(level);
        }
        _ => return Err(invalid("Unknown key".to_string())),
    }
    Ok(())
}

/// Parse an integer and check it against an inclusive range
fn parse_in_range<T>(value: &str, range: &std::ops::RangeInclusive<T>) -> Result<T, String>
where
    T: std::str::FromStr + PartialOrd + std::fmt::Display,
{
    let parsed: T = value
        .trim()
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if !range.contains(&parsed) {
        return Err(format!(
            "Value must be between {} and {}",
            range.start(),
            range.end()
        ));
    }
    Ok(parsed)
}
