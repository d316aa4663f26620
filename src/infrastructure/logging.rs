//! Logging setup
//!
//! Installs a global tracing subscriber writing to a daily log file, so log
//! lines never interleave with the interactive console.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Registry};

use super::config::APP_DIR_NAME;

const LOG_FILE_PREFIX: &str = "meeting-recorder.log";

/// Errors that may occur while initializing logging
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("No suitable data directory available for logs")]
    NoDataDir,

    #[error("Failed to prepare log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid log level '{level}': {message}")]
    InvalidLevel { level: String, message: String },

    #[error("Failed to install global tracing subscriber: {0}")]
    SetGlobal(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// `<data_local_dir>/meeting-recorder/logs`
pub fn log_directory() -> Result<PathBuf, LoggingError> {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR_NAME).join("logs"))
        .ok_or(LoggingError::NoDataDir)
}

fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(format!("{}={}", env!("CARGO_CRATE_NAME"), level)).map_err(|e| {
        LoggingError::InvalidLevel {
            level: level.to_string(),
            message: e.to_string(),
        }
    })
}

/// Start logging at `level` (trace, debug, info, warn, error).
///
/// Keep the returned guard alive until exit; dropping it flushes the file.
pub fn init(level: &str) -> Result<WorkerGuard, LoggingError> {
    let dir = log_directory()?;
    fs::create_dir_all(&dir).map_err(|source| LoggingError::CreateDir {
        path: dir.clone(),
        source,
    })?;

    let (writer, guard) = tracing_appender::non_blocking(rolling::daily(&dir, LOG_FILE_PREFIX));
    let file_layer = fmt::layer().with_ansi(false).with_writer(writer);

    let subscriber = Registry::default().with(build_filter(level)?).with(file_layer);
    tracing::subscriber::set_global_default(subscriber)?;

    tracing::info!("Logging initialized in {}", dir.display());
    Ok(guard)
}
