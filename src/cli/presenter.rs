//! CLI presenter for output formatting

use std::io::{self, Write};
use std::time::Duration as StdDuration;

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::application::SessionSnapshot;
use crate::domain::recording::{RecordingEntry, RecordingId};
use crate::domain::session::SessionState;

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
    last: Option<SessionSnapshot>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self {
            spinner: None,
            last: None,
        }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(StdDuration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Update spinner message
    pub fn update_spinner(&self, message: &str) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(message.to_string());
        }
    }

    /// Stop spinner without status
    pub fn stop_spinner(&mut self) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_and_clear();
        }
    }

    pub fn is_spinner_active(&self) -> bool {
        self.spinner.is_some()
    }

    /// Print a line to stderr without tearing the spinner
    fn print_err(&self, line: String) {
        match self.spinner {
            Some(ref spinner) => spinner.suspend(|| eprintln!("{}", line)),
            None => eprintln!("{}", line),
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        self.print_err(format!("{} {}", "ℹ".cyan(), message));
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        self.print_err(format!("{} {}", "✓".green(), message));
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        self.print_err(format!("{} {}", "⚠".yellow(), message));
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        self.print_err(format!("{} {}", "✗".red(), message));
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        match self.spinner {
            Some(ref spinner) => spinner.suspend(|| println!("{}", text)),
            None => println!("{}", text),
        }
    }

    /// Console prompt
    pub fn prompt(&self) {
        if self.spinner.is_none() {
            print!("{} ", ">".cyan());
            let _ = io::stdout().flush();
        }
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }

    /// Print the numbered recordings table
    pub fn recordings(&self, recordings: &[RecordingEntry], now_playing: Option<RecordingId>) {
        if recordings.is_empty() {
            self.info("No recordings yet");
            return;
        }
        for (index, entry) in recordings.iter().enumerate() {
            let line = format_entry_line(index + 1, entry);
            if Some(entry.id()) == now_playing {
                self.output(&format!("{} {}", "▶".green(), line.bold()));
            } else {
                self.output(&format!("  {}", line));
            }
        }
    }

    /// Print the console command reference
    pub fn help(&self) {
        for (command, description) in HELP_LINES {
            self.output(&format!("  {:<20} {}", command.cyan(), description));
        }
    }

    /// React to a new session snapshot: keep the status spinner in sync and
    /// report state changes that happened outside a command
    pub fn render(&mut self, snapshot: &SessionSnapshot) {
        let previous = self.last.take();

        if let Some(ref prev) = previous {
            if let Some(id) = prev.playback.now_playing {
                if snapshot.playback.now_playing.is_none() {
                    match prev.recording(id) {
                        Some(entry) => self.info(&format!("Playback ended: {}", entry.filename())),
                        None => self.info("Playback ended"),
                    }
                }
            }
        }

        match status_line(snapshot) {
            Some(status) if self.spinner.is_some() => self.update_spinner(&status),
            Some(status) => self.start_spinner(&status),
            None if self.spinner.is_some() => {
                self.stop_spinner();
                self.prompt();
            }
            None => {}
        }

        self.last = Some(snapshot.clone());
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

const HELP_LINES: &[(&str, &str)] = &[
    ("start", "Start a new recording"),
    ("pause", "Pause the recording"),
    ("resume", "Resume a paused recording"),
    ("stop", "Stop and save the recording"),
    ("list", "Show the recordings"),
    ("refresh", "Rescan the storage directory"),
    ("play <n>", "Play recording n"),
    ("play-pause", "Pause playback"),
    ("play-resume", "Resume playback"),
    ("play-stop", "Stop playback"),
    ("delete <n>", "Delete recording n"),
    ("rename <n> <name>", "Rename recording n"),
    ("reveal <n>", "Show recording n in the file browser"),
    ("help", "Show this help"),
    ("quit", "Stop any recording and exit"),
];

/// One row of the recordings table
pub fn format_entry_line(number: usize, entry: &RecordingEntry) -> String {
    format!(
        "{:>3}. {}  {}  {}  {}",
        number,
        entry.filename(),
        entry.formatted_duration(),
        entry.formatted_size(),
        entry.formatted_date()
    )
}

/// Live status shown in the spinner, `None` when there is nothing to show
pub fn status_line(snapshot: &SessionSnapshot) -> Option<String> {
    let file = snapshot.current_file.as_deref().unwrap_or("");
    match snapshot.state {
        SessionState::Recording => Some(format!("REC {}  {}", snapshot.elapsed, file)),
        SessionState::Paused => Some(format!("PAUSED {}  {}", snapshot.elapsed, file)),
        SessionState::Stopping => Some(format!("Saving {}", file)),
        SessionState::Idle => {
            let entry = snapshot.now_playing()?;
            let playback = &snapshot.playback;
            let marker = if playback.paused { "⏸" } else { "▶" };
            Some(format!(
                "{} {}  {} / {}",
                marker,
                entry.filename(),
                playback.position,
                playback.length
            ))
        }
    }
}
