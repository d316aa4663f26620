//! Application configuration value object

use std::path::PathBuf;
use std::time::Duration as StdDuration;

use serde::{Deserialize, Serialize};

use crate::domain::recording::{
    CaptureFormat, CHANNEL_RANGE, DEFAULT_CHANNELS, DEFAULT_SAMPLE_RATE, SAMPLE_RATE_RANGE,
};

/// Default refresh cadence of the live recording clock and playback poll
pub const DEFAULT_CLOCK_INTERVAL_MS: u64 = 100;

/// Accepted refresh cadence range
pub const CLOCK_INTERVAL_RANGE_MS: std::ops::RangeInclusive<u64> = 10..=1000;

/// Default log filter level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Accepted log levels
pub const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Capture settings section (`[recording]`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingConfig {
    pub sample_rate: Option<u32>,
    pub channels: Option<u16>,
}

/// Application configuration.
/// All fields are optional to support partial configs and merging.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding the recordings; the platform documents folder when unset
    pub storage_dir: Option<String>,
    pub clock_interval_ms: Option<u64>,
    pub log_level: Option<String>,
    pub recording: Option<RecordingConfig>,
}

impl AppConfig {
    /// Create config with default values
    pub fn defaults() -> Self {
        Self {
            storage_dir: None,
            clock_interval_ms: Some(DEFAULT_CLOCK_INTERVAL_MS),
            log_level: Some(DEFAULT_LOG_LEVEL.to_string()),
            recording: Some(RecordingConfig {
                sample_rate: Some(DEFAULT_SAMPLE_RATE),
                channels: Some(DEFAULT_CHANNELS),
            }),
        }
    }

    /// Create an empty config (all None)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge this config with another, where other takes precedence.
    /// Only non-None values from other will override this.
    pub fn merge(self, other: Self) -> Self {
        Self {
            storage_dir: other.storage_dir.or(self.storage_dir),
            clock_interval_ms: other.clock_interval_ms.or(self.clock_interval_ms),
            log_level: other.log_level.or(self.log_level),
            recording: Self::merge_recording_config(self.recording, other.recording),
        }
    }

    /// Merge recording config sections
    fn merge_recording_config(
        base: Option<RecordingConfig>,
        other: Option<RecordingConfig>,
    ) -> Option<RecordingConfig> {
        match (base, other) {
            (None, None) => None,
            (Some(b), None) => Some(b),
            (None, Some(o)) => Some(o),
            (Some(b), Some(o)) => Some(RecordingConfig {
                sample_rate: o.sample_rate.or(b.sample_rate),
                channels: o.channels.or(b.channels),
            }),
        }
    }

    /// Configured storage directory, if any
    pub fn storage_dir(&self) -> Option<PathBuf> {
        self.storage_dir
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
    }

    /// Sample rate, or default if not set/out of range
    pub fn sample_rate_or_default(&self) -> u32 {
        self.recording
            .as_ref()
            .and_then(|r| r.sample_rate)
            .filter(|rate| SAMPLE_RATE_RANGE.contains(rate))
            .unwrap_or(DEFAULT_SAMPLE_RATE)
    }

    /// Channel count, or default if not set/out of range
    pub fn channels_or_default(&self) -> u16 {
        self.recording
            .as_ref()
            .and_then(|r| r.channels)
            .filter(|ch| CHANNEL_RANGE.contains(ch))
            .unwrap_or(DEFAULT_CHANNELS)
    }

    /// Capture format built from the recording section
    pub fn capture_format(&self) -> CaptureFormat {
        CaptureFormat::new(self.sample_rate_or_default(), self.channels_or_default())
    }

    /// Clock cadence, or default if not set/out of range
    pub fn clock_interval_or_default(&self) -> StdDuration {
        let ms = self
            .clock_interval_ms
            .filter(|ms| CLOCK_INTERVAL_RANGE_MS.contains(ms))
            .unwrap_or(DEFAULT_CLOCK_INTERVAL_MS);
        StdDuration::from_millis(ms)
    }

    /// Log level, or "info" if not set/invalid
    pub fn log_level_or_default(&self) -> &str {
        self.log_level
            .as_deref()
            .filter(|level| VALID_LOG_LEVELS.contains(level))
            .unwrap_or(DEFAULT_LOG_LEVEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_expected_values() {
        let config = AppConfig::defaults();
        assert!(config.storage_dir.is_none());
        assert_eq!(config.clock_interval_ms, Some(100));
        assert_eq!(config.log_level, Some("info".to_string()));
        let recording = config.recording.as_ref().unwrap();
        assert_eq!(recording.sample_rate, Some(44_100));
        assert_eq!(recording.channels, Some(2));
    }

    #[test]
    fn empty_has_all_none() {
        let config = AppConfig::empty();
        assert!(config.storage_dir.is_none());
        assert!(config.clock_interval_ms.is_none());
        assert!(config.log_level.is_none());
        assert!(config.recording.is_none());
    }

    #[test]
    fn merge_other_takes_precedence() {
        let base = AppConfig {
            storage_dir: Some("/base".to_string()),
            log_level: Some("info".to_string()),
            clock_interval_ms: Some(100),
            ..Default::default()
        };

        let other = AppConfig {
            storage_dir: Some("/other".to_string()),
            log_level: None, // Should not override
            clock_interval_ms: Some(250),
            ..Default::default()
        };

        let merged = base.merge(other);

        assert_eq!(merged.storage_dir, Some("/other".to_string()));
        assert_eq!(merged.log_level, Some("info".to_string())); // Kept from base
        assert_eq!(merged.clock_interval_ms, Some(250));
    }

    #[test]
    fn merge_recording_section_field_by_field() {
        let base = AppConfig::defaults();
        let other = AppConfig {
            recording: Some(RecordingConfig {
                sample_rate: Some(16_000),
                channels: None,
            }),
            ..Default::default()
        };

        let merged = base.merge(other);
        assert_eq!(merged.sample_rate_or_default(), 16_000);
        assert_eq!(merged.channels_or_default(), 2);
    }

    #[test]
    fn storage_dir_ignores_blank() {
        let config = AppConfig {
            storage_dir: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(config.storage_dir().is_none());

        let config = AppConfig {
            storage_dir: Some("/data/meetings".to_string()),
            ..Default::default()
        };
        assert_eq!(config.storage_dir(), Some(PathBuf::from("/data/meetings")));
    }

    #[test]
    fn out_of_range_values_fall_back() {
        let config = AppConfig {
            clock_interval_ms: Some(5),
            log_level: Some("loud".to_string()),
            recording: Some(RecordingConfig {
                sample_rate: Some(1),
                channels: Some(8),
            }),
            ..Default::default()
        };
        assert_eq!(config.clock_interval_or_default().as_millis(), 100);
        assert_eq!(config.log_level_or_default(), "info");
        assert_eq!(config.sample_rate_or_default(), 44_100);
        assert_eq!(config.channels_or_default(), 2);
    }

    #[test]
    fn capture_format_uses_recording_section() {
        let config = AppConfig {
            recording: Some(RecordingConfig {
                sample_rate: Some(48_000),
                channels: Some(1),
            }),
            ..Default::default()
        };
        assert_eq!(config.capture_format(), CaptureFormat::new(48_000, 1));
    }

    #[test]
    fn toml_round_trip() {
        let config = AppConfig::defaults();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
