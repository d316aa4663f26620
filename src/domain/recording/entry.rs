//! Recording catalog entry

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local, Utc};
use uuid::Uuid;

use super::{Duration, RecordingFileName};

/// In-memory identity of a recording.
///
/// Assigned when the entry is discovered or created. It is not written to
/// disk; a rescan keeps the ids of files the catalog already knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordingId(Uuid);

impl RecordingId {
    /// Generate a new random id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RecordingId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One stored recording: a cached view of the file's metadata.
///
/// Only [`RecordingEntry::rename_to`] changes an entry after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingEntry {
    id: RecordingId,
    filename: RecordingFileName,
    location: PathBuf,
    duration: Duration,
    size_bytes: u64,
    created_at: DateTime<Utc>,
}

impl RecordingEntry {
    /// Build an entry for a file inside `directory`
    pub fn new(
        directory: &Path,
        filename: RecordingFileName,
        duration: Duration,
        size_bytes: u64,
        created_at: DateTime<Utc>,
    ) -> Self {
        let location = directory.join(filename.as_str());
        Self {
            id: RecordingId::new(),
            filename,
            location,
            duration,
            size_bytes,
            created_at,
        }
    }

    pub fn id(&self) -> RecordingId {
        self.id
    }

    pub fn filename(&self) -> &str {
        self.filename.as_str()
    }

    pub fn file_name(&self) -> &RecordingFileName {
        &self.filename
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Same entry under an existing identity
    pub fn with_id(mut self, id: RecordingId) -> Self {
        self.id = id;
        self
    }

    /// Point the entry at its renamed file; the id is kept
    pub fn rename_to(&mut self, filename: RecordingFileName) {
        self.location = self
            .location
            .parent()
            .map(|dir| dir.join(filename.as_str()))
            .unwrap_or_else(|| PathBuf::from(filename.as_str()));
        self.filename = filename;
    }

    /// Duration as `MM:SS`
    pub fn formatted_duration(&self) -> String {
        self.duration.as_minutes_label()
    }

    /// Size in binary units (bytes, KB, MB)
    pub fn formatted_size(&self) -> String {
        format_byte_count(self.size_bytes)
    }

    /// Creation time in local time, e.g. `Oct 17, 2026 at 2:03 PM`
    pub fn formatted_date(&self) -> String {
        self.created_at
            .with_timezone(&Local)
            .format("%b %-d, %Y at %-I:%M %p")
            .to_string()
    }
}

/// Human-readable byte count using 1024-based units
pub fn format_byte_count(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;

    let value = bytes as f64;
    if value < KB {
        format!("{} bytes", bytes)
    } else if value < MB {
        format!("{:.0} KB", value / KB)
    } else {
        format!("{:.1} MB", value / MB)
    }
}
