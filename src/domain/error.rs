//! Domain error types

use thiserror::Error;

/// Error when a recording file name is rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FileNameError {
    #[error("File name cannot be empty")]
    Empty,

    #[error("File name \"{0}\" must not contain path separators")]
    ContainsSeparator(String),

    #[error("File name \"{0}\" is reserved")]
    Reserved(String),
}

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),

    #[error("Failed to parse config file: {0}")]
    ParseError(String),

    #[error("Failed to write config file: {0}")]
    WriteError(String),

    #[error("Invalid config value for '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Config file already exists at: {0}")]
    AlreadyExists(String),
}
