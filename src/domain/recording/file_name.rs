//! Recording file names
//!
//! New captures are named `Meeting_<timestamp>.wav`, where the timestamp is
//! ISO 8601 basic format in UTC (`20261017T140322Z`). The basic format keeps
//! the name free of `:` so it is valid on every platform's filesystem.

use std::fmt;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::domain::error::FileNameError;

/// Extension of every recording the catalog recognizes
pub const AUDIO_EXTENSION: &str = "wav";

/// Prefix for generated recording names
pub const FILE_NAME_PREFIX: &str = "Meeting_";

/// Upper bound on uniqueness suffixes tried for one timestamp
pub const MAX_NAME_ATTEMPTS: u32 = 999;

/// Validated file name of a recording, always ending in the audio extension
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordingFileName(String);

impl RecordingFileName {
    /// Generated name for a capture started at `at`.
    ///
    /// `attempt` 1 is the plain name; later attempts add `_<attempt>` so two
    /// sessions inside the same second still get distinct files.
    pub fn timestamped(at: DateTime<Utc>, attempt: u32) -> Self {
        let stamp = at.format("%Y%m%dT%H%M%SZ");
        if attempt <= 1 {
            Self(format!("{FILE_NAME_PREFIX}{stamp}.{AUDIO_EXTENSION}"))
        } else {
            Self(format!(
                "{FILE_NAME_PREFIX}{stamp}_{attempt}.{AUDIO_EXTENSION}"
            ))
        }
    }

    /// Normalize a user-entered name: trim it, reject unusable names and
    /// append the audio extension when it is missing.
    pub fn from_user_input(input: &str) -> Result<Self, FileNameError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(FileNameError::Empty);
        }
        if trimmed.contains(['/', '\\']) {
            return Err(FileNameError::ContainsSeparator(trimmed.to_string()));
        }
        if trimmed == "." || trimmed == ".." {
            return Err(FileNameError::Reserved(trimmed.to_string()));
        }

        if has_audio_extension(trimmed) {
            Ok(Self(trimmed.to_string()))
        } else {
            Ok(Self(format!("{trimmed}.{AUDIO_EXTENSION}")))
        }
    }

    /// Accept the name of a file found on disk, if it is a recording
    pub fn from_existing(name: &str) -> Option<Self> {
        if name.is_empty() || !has_audio_extension(name) {
            return None;
        }
        Some(Self(name.to_string()))
    }

    /// Borrow the name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordingFileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<Path> for RecordingFileName {
    fn as_ref(&self) -> &Path {
        Path::new(&self.0)
    }
}

/// Case-insensitive check for the recognized audio extension
pub fn has_audio_extension(name: impl AsRef<Path>) -> bool {
    name.as_ref()
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(AUDIO_EXTENSION))
}
