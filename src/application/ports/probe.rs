//! Media duration probe port

use std::path::Path;

use async_trait::async_trait;

use crate::domain::recording::Duration;

/// Port for reading the length of an audio file without playing it
#[async_trait]
pub trait MediaProbe: Send + Sync {
    /// Length of the audio in `path`, or `None` if it cannot be determined
    async fn duration(&self, path: &Path) -> Option<Duration>;
}
