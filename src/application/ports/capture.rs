//! Capture device port

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::recording::{CaptureFormat, Duration};

/// Capture device errors
#[derive(Debug, Clone, Error)]
pub enum CaptureError {
    #[error("Failed to start capture: {0}")]
    StartFailed(String),

    #[error("Failed to stop capture: {0}")]
    StopFailed(String),

    #[error("Capture failed: {0}")]
    CaptureFailed(String),

    #[error("No capture in progress")]
    NotActive,

    #[error("No audio input device available")]
    NoInputDevice,
}

/// Port for the microphone: writes one capture session to one file.
#[async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Begin writing audio to `destination` in the given format.
    /// The parent directory must already exist.
    async fn start(&self, destination: &Path, format: &CaptureFormat) -> Result<(), CaptureError>;

    /// Stop appending audio without closing the file.
    async fn pause(&self) -> Result<(), CaptureError>;

    /// Continue appending audio after a pause.
    async fn resume(&self) -> Result<(), CaptureError>;

    /// Finalize the file.
    ///
    /// # Returns
    /// The length of audio actually written
    async fn stop(&self) -> Result<Duration, CaptureError>;

    /// Check if a capture session is open (paused sessions count)
    fn is_active(&self) -> bool;
}
