//! Duration probe for WAV files

use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use crate::application::ports::MediaProbe;
use crate::domain::recording::Duration;

/// Reads the duration from the WAV header with hound
#[derive(Debug, Clone, Default)]
pub struct WavDurationProbe;

impl WavDurationProbe {
    pub fn new() -> Self {
        Self
    }

    fn probe(path: &Path) -> Option<Duration> {
        match hound::WavReader::open(path) {
            Ok(reader) => {
                let rate = reader.spec().sample_rate;
                Some(Duration::from_frames(reader.duration() as u64, rate))
            }
            Err(e) => {
                debug!("Cannot read WAV header of {}: {}", path.display(), e);
                None
            }
        }
    }
}

#[async_trait]
impl MediaProbe for WavDurationProbe {
    async fn duration(&self, path: &Path) -> Option<Duration> {
        let path = path.to_path_buf();
        tokio::task::spawn_blocking(move || Self::probe(&path))
            .await
            .ok()
            .flatten()
    }
}
