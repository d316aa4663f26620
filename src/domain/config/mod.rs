//! Application configuration

mod app_config;

pub use app_config::{
    AppConfig, RecordingConfig, CLOCK_INTERVAL_RANGE_MS, DEFAULT_CLOCK_INTERVAL_MS,
    DEFAULT_LOG_LEVEL, VALID_LOG_LEVELS,
};
