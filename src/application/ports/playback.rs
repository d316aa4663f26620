//! Playback device port

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recording::Duration;

/// Playback device errors
#[derive(Debug, Clone, Error)]
pub enum PlaybackError {
    #[error("Failed to open audio file: {0}")]
    OpenFailed(String),

    #[error("Playback failed: {0}")]
    PlaybackFailed(String),

    #[error("Audio output device not available: {0}")]
    DeviceNotAvailable(String),
}

/// Port for the speaker: plays one file at a time.
#[async_trait]
pub trait PlaybackDevice: Send + Sync {
    /// Start playing `source`, replacing anything already loaded
    async fn play(&self, source: &Path) -> Result<(), PlaybackError>;

    fn pause(&self);

    fn resume(&self);

    /// Stop and unload the current source
    fn stop(&self);

    /// A source is loaded and has not finished (paused counts as active)
    fn is_active(&self) -> bool;

    fn is_paused(&self) -> bool;

    /// Position within the current source
    fn position(&self) -> Duration;

    /// Length of the current source, zero when unknown
    fn length(&self) -> Duration;
}
