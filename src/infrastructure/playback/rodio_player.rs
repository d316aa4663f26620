//! Rodio-based playback adapter
//!
//! `rodio::OutputStream` is not `Send`; it lives on a dedicated thread for
//! the lifetime of the player while the sink is driven through the
//! stream handle.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::mpsc;
use std::sync::{Mutex as StdMutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tracing::debug;

use crate::application::ports::{PlaybackDevice, PlaybackError};
use crate::domain::recording::Duration;

fn lock<T>(mutex: &StdMutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle to the output stream thread; dropping it closes the stream
struct Output {
    handle: OutputStreamHandle,
    _keep_alive: mpsc::Sender<()>,
}

impl Output {
    fn open() -> Result<Self, PlaybackError> {
        let (handle_tx, handle_rx) = mpsc::channel();
        let (keep_alive, closed) = mpsc::channel::<()>();

        std::thread::Builder::new()
            .name("audio-output".to_string())
            .spawn(move || match OutputStream::try_default() {
                Ok((stream, handle)) => {
                    let _ = handle_tx.send(Ok(handle));
                    // Blocks until the sender side is dropped
                    let _ = closed.recv();
                    drop(stream);
                }
                Err(e) => {
                    let _ = handle_tx.send(Err(PlaybackError::DeviceNotAvailable(e.to_string())));
                }
            })
            .map_err(|e| PlaybackError::DeviceNotAvailable(e.to_string()))?;

        let handle = handle_rx.recv().map_err(|_| {
            PlaybackError::DeviceNotAvailable("Output thread exited".to_string())
        })??;

        Ok(Self {
            handle,
            _keep_alive: keep_alive,
        })
    }
}

struct Active {
    sink: Sink,
    length: Duration,
}

/// Playback device using the default output device
pub struct RodioPlaybackDevice {
    output: StdMutex<Option<Output>>,
    active: StdMutex<Option<Active>>,
}

impl RodioPlaybackDevice {
    pub fn new() -> Self {
        Self {
            output: StdMutex::new(None),
            active: StdMutex::new(None),
        }
    }

    /// Stream handle, opening the output device on first use
    fn stream_handle(&self) -> Result<OutputStreamHandle, PlaybackError> {
        let mut output = lock(&self.output);
        if let Some(output) = output.as_ref() {
            return Ok(output.handle.clone());
        }
        let opened = Output::open()?;
        let handle = opened.handle.clone();
        *output = Some(opened);
        Ok(handle)
    }
}

impl Default for RodioPlaybackDevice {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode `source` and queue it on a new sink
fn open_sink(handle: &OutputStreamHandle, source: &Path) -> Result<Active, PlaybackError> {
    let file = File::open(source)
        .map_err(|e| PlaybackError::OpenFailed(format!("{}: {}", source.display(), e)))?;
    let decoder = Decoder::new(BufReader::new(file))
        .map_err(|e| PlaybackError::OpenFailed(format!("{}: {}", source.display(), e)))?;
    let length = decoder
        .total_duration()
        .map(Duration::from)
        .unwrap_or(Duration::ZERO);

    let sink = Sink::try_new(handle).map_err(|e| PlaybackError::PlaybackFailed(e.to_string()))?;
    sink.append(decoder);
    Ok(Active { sink, length })
}

#[async_trait]
impl PlaybackDevice for RodioPlaybackDevice {
    async fn play(&self, source: &Path) -> Result<(), PlaybackError> {
        self.stop();

        let handle = self.stream_handle()?;
        let source = source.to_path_buf();
        let active = tokio::task::spawn_blocking(move || open_sink(&handle, &source))
            .await
            .map_err(|e| PlaybackError::PlaybackFailed(format!("Task join error: {}", e)))??;

        debug!("Playback length {}", active.length);
        *lock(&self.active) = Some(active);
        Ok(())
    }

    fn pause(&self) {
        if let Some(active) = lock(&self.active).as_ref() {
            active.sink.pause();
        }
    }

    fn resume(&self) {
        if let Some(active) = lock(&self.active).as_ref() {
            active.sink.play();
        }
    }

    fn stop(&self) {
        if let Some(active) = lock(&self.active).take() {
            active.sink.stop();
        }
    }

    fn is_active(&self) -> bool {
        lock(&self.active)
            .as_ref()
            .is_some_and(|active| !active.sink.empty())
    }

    fn is_paused(&self) -> bool {
        lock(&self.active)
            .as_ref()
            .is_some_and(|active| active.sink.is_paused())
    }

    fn position(&self) -> Duration {
        lock(&self.active)
            .as_ref()
            .map(|active| Duration::from(active.sink.get_pos()))
            .unwrap_or(Duration::ZERO)
    }

    fn length(&self) -> Duration {
        lock(&self.active)
            .as_ref()
            .map(|active| active.length)
            .unwrap_or(Duration::ZERO)
    }
}
