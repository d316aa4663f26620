//! CLI layer - Command-line interface
//!
//! Contains argument parsing, the interactive console, output formatting
//! and signal handling.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod console;
pub mod presenter;
pub mod signals;

// Re-export commonly used types
pub use app::{run_console, EXIT_ERROR, EXIT_SUCCESS};
pub use args::{Cli, Commands, ConfigAction};
pub use console::ConsoleCommand;
pub use presenter::Presenter;
