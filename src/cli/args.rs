//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Meeting Recorder - record meetings from the microphone
#[derive(Parser, Debug)]
#[command(name = "meeting-recorder")]
#[command(version)]
#[command(about = "Record meetings from the microphone and manage the recordings")]
#[command(long_about = None)]
pub struct Cli {
    /// Directory holding the recordings (overrides the config file)
    #[arg(long, value_name = "DIR")]
    pub storage_dir: Option<PathBuf>,

    /// Config subcommand
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Keys accepted by `config get` and `config set`
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "storage_dir",
    "recording.sample_rate",
    "recording.channels",
    "clock_interval_ms",
    "log_level",
];

pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
