//! Recording session use case
//!
//! [`SessionManager`] owns the capture lifecycle, the catalog of stored
//! recordings and the playback coordinator. It is driven by a single owner
//! (`&mut self` commands) and publishes every change as a
//! [`SessionSnapshot`] on a watch channel.

mod library;

use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration as StdDuration, Instant};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::config::AppConfig;
use crate::domain::error::FileNameError;
use crate::domain::recording::{
    CaptureFormat, Catalog, Duration, ElapsedClock, RecordingEntry, RecordingFileName,
    RecordingId, MAX_NAME_ATTEMPTS,
};
use crate::domain::session::{
    InvalidStateTransition, SessionAction, SessionLifecycle, SessionState,
};

use super::playback::PlaybackCoordinator;
use super::ports::{
    CaptureDevice, CaptureError, FileStore, FileStoreError, MediaProbe, PermissionGate,
    PermissionStatus, PlaybackDevice, PlaybackError,
};
use super::snapshot::{snapshot_channel, SessionSnapshot, SnapshotSender};
use super::ticker::Ticker;

/// Errors from the session use case
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Microphone access denied")]
    PermissionDenied,

    #[error("Could not start recording: {0}")]
    DeviceStartFailed(CaptureError),

    #[error("Could not finish recording: {0}")]
    DeviceStopFailed(CaptureError),

    #[error("Recording device error: {0}")]
    Capture(CaptureError),

    #[error("File error: {0}")]
    FileSystem(#[from] FileStoreError),

    #[error("{0}")]
    InvalidState(#[from] InvalidStateTransition),

    #[error("Unknown recording: {0}")]
    UnknownRecording(RecordingId),

    #[error("Invalid file name: {0}")]
    InvalidFileName(#[from] FileNameError),

    #[error("Playback failed: {0}")]
    Playback(#[from] PlaybackError),

    #[error("Nothing is playing")]
    NotPlaying,

    #[error("Recording in progress: {0}")]
    RecordingInProgress(String),
}

/// Runtime settings of a session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Directory holding the recordings
    pub storage_dir: PathBuf,
    pub format: CaptureFormat,
    /// Refresh cadence of the live clock and the playback poll
    pub clock_interval: StdDuration,
}

impl SessionConfig {
    /// Build from the app config; `fallback_dir` is used when no storage
    /// directory is configured
    pub fn from_app_config(config: &AppConfig, fallback_dir: PathBuf) -> Self {
        Self {
            storage_dir: config.storage_dir().unwrap_or(fallback_dir),
            format: config.capture_format(),
            clock_interval: config.clock_interval_or_default(),
        }
    }
}

type WallClock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// The capture in progress
struct ActiveCapture {
    filename: RecordingFileName,
    destination: PathBuf,
    started_at: DateTime<Utc>,
    clock: ElapsedClock,
    ticker: Option<Ticker>,
}

/// Recording session manager
pub struct SessionManager<C, F, M, G, P>
where
    C: CaptureDevice,
    F: FileStore + 'static,
    M: MediaProbe + 'static,
    G: PermissionGate,
    P: PlaybackDevice + 'static,
{
    capture: C,
    store: Arc<F>,
    probe: Arc<M>,
    permission: G,
    playback: PlaybackCoordinator<P>,
    config: SessionConfig,
    lifecycle: SessionLifecycle,
    active: Option<ActiveCapture>,
    catalog: Catalog,
    snapshot: SnapshotSender,
    wall_clock: WallClock,
}

impl<C, F, M, G, P> SessionManager<C, F, M, G, P>
where
    C: CaptureDevice,
    F: FileStore + 'static,
    M: MediaProbe + 'static,
    G: PermissionGate,
    P: PlaybackDevice + 'static,
{
    /// Create a new session manager in the idle state with an empty catalog
    pub fn new(
        capture: C,
        store: F,
        probe: M,
        permission: G,
        player: P,
        config: SessionConfig,
    ) -> Self {
        let snapshot = snapshot_channel();
        let playback =
            PlaybackCoordinator::new(player, Arc::clone(&snapshot), config.clock_interval);
        Self {
            capture,
            store: Arc::new(store),
            probe: Arc::new(probe),
            permission,
            playback,
            config,
            lifecycle: SessionLifecycle::new(),
            active: None,
            catalog: Catalog::new(),
            snapshot,
            wall_clock: Box::new(Utc::now),
        }
    }

    /// Replace the wall clock used for file names
    pub fn with_wall_clock<W>(mut self, clock: W) -> Self
    where
        W: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.wall_clock = Box::new(clock);
        self
    }

    /// Receiver notified on every snapshot change
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot.subscribe()
    }

    /// Current snapshot
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.borrow().clone()
    }

    pub fn state(&self) -> SessionState {
        self.lifecycle.state()
    }

    pub fn storage_dir(&self) -> &Path {
        &self.config.storage_dir
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Start a new capture session
    pub async fn start(&mut self) -> Result<RecordingFileName, SessionError> {
        let result = self.try_start().await;
        self.settle(result)
    }

    /// Pause the capture in progress
    pub async fn pause(&mut self) -> Result<(), SessionError> {
        let result = self.try_pause().await;
        self.settle(result)
    }

    /// Resume a paused capture
    pub async fn resume(&mut self) -> Result<(), SessionError> {
        let result = self.try_resume().await;
        self.settle(result)
    }

    /// Finish the capture and add the new file to the catalog
    pub async fn stop(&mut self) -> Result<RecordingEntry, SessionError> {
        let result = self.try_stop().await;
        self.settle(result)
    }

    /// Save an active capture and stop playback
    pub async fn shutdown(&mut self) {
        if self.lifecycle.state().is_capturing() {
            match self.stop().await {
                Ok(entry) => info!("Saved {} on shutdown", entry.filename()),
                Err(err) => warn!("Failed to save recording on shutdown: {}", err),
            }
        }
        self.playback.stop();
    }

    async fn try_start(&mut self) -> Result<RecordingFileName, SessionError> {
        self.lifecycle.target(SessionAction::Start)?;
        self.ensure_permission().await?;

        self.store.create_dir_all(&self.config.storage_dir).await?;
        let (filename, destination) = self.next_file_name().await?;

        self.capture
            .start(&destination, &self.config.format)
            .await
            .map_err(SessionError::DeviceStartFailed)?;
        self.lifecycle.apply(SessionAction::Start)?;

        let clock = ElapsedClock::started_at(Instant::now());
        let ticker = self.spawn_clock(clock);
        self.active = Some(ActiveCapture {
            filename: filename.clone(),
            destination,
            started_at: (self.wall_clock)(),
            clock,
            ticker: Some(ticker),
        });

        let current_file = filename.to_string();
        self.publish(|s| {
            s.state = SessionState::Recording;
            s.current_file = Some(current_file);
            s.elapsed = Duration::ZERO;
        });

        info!("Recording started: {} ({})", filename, self.config.format);
        Ok(filename)
    }

    async fn try_pause(&mut self) -> Result<(), SessionError> {
        self.lifecycle.target(SessionAction::Pause)?;
        self.capture.pause().await.map_err(SessionError::Capture)?;
        self.lifecycle.apply(SessionAction::Pause)?;

        let frozen = match self.active.as_mut() {
            Some(active) => {
                active.ticker = None;
                active.clock.freeze(Instant::now())
            }
            None => Duration::ZERO,
        };
        self.publish(|s| {
            s.state = SessionState::Paused;
            s.elapsed = frozen;
        });

        info!("Recording paused at {}", frozen);
        Ok(())
    }

    async fn try_resume(&mut self) -> Result<(), SessionError> {
        self.lifecycle.target(SessionAction::Resume)?;
        self.capture.resume().await.map_err(SessionError::Capture)?;
        self.lifecycle.apply(SessionAction::Resume)?;

        if let Some(mut active) = self.active.take() {
            active.clock.resume(Instant::now());
            active.ticker = Some(self.spawn_clock(active.clock));
            self.active = Some(active);
        }
        self.publish(|s| s.state = SessionState::Recording);

        info!("Recording resumed");
        Ok(())
    }

    async fn try_stop(&mut self) -> Result<RecordingEntry, SessionError> {
        self.lifecycle.target(SessionAction::Stop)?;
        let Some(active) = self.active.take() else {
            return Err(InvalidStateTransition {
                current_state: self.lifecycle.state(),
                action: SessionAction::Stop,
            }
            .into());
        };
        self.lifecycle.apply(SessionAction::Stop)?;

        let ActiveCapture {
            filename,
            destination,
            started_at,
            mut clock,
            ticker,
        } = active;
        drop(ticker);
        let frozen = clock.freeze(Instant::now());
        self.publish(|s| {
            s.state = SessionState::Stopping;
            s.elapsed = frozen;
        });

        let stopped = self.capture.stop().await;

        self.lifecycle.apply(SessionAction::FinishStop)?;
        self.publish(|s| {
            s.state = SessionState::Idle;
            s.current_file = None;
            s.elapsed = Duration::ZERO;
        });

        let duration = stopped.map_err(SessionError::DeviceStopFailed)?;

        let (size_bytes, created_at) = match self.store.metadata(&destination).await {
            Ok(metadata) => (metadata.size_bytes, metadata.created_at),
            Err(err) => {
                warn!("Could not read size of {}: {}", destination.display(), err);
                (0, started_at)
            }
        };

        let entry = RecordingEntry::new(
            &self.config.storage_dir,
            filename,
            duration,
            size_bytes,
            created_at,
        );
        let id = self.catalog.insert(entry);
        self.publish_catalog();
        let entry = self
            .catalog
            .get(id)
            .cloned()
            .ok_or(SessionError::UnknownRecording(id))?;

        info!(
            "Recording saved: {} ({}, {})",
            entry.filename(),
            entry.formatted_duration(),
            entry.formatted_size()
        );
        Ok(entry)
    }

    async fn ensure_permission(&self) -> Result<(), SessionError> {
        match self.permission.check().await {
            PermissionStatus::Granted => Ok(()),
            PermissionStatus::Denied => Err(SessionError::PermissionDenied),
            PermissionStatus::Undetermined => {
                info!("Requesting microphone access");
                if self.permission.request().await == PermissionStatus::Denied {
                    return Err(SessionError::PermissionDenied);
                }
                match self.permission.check().await {
                    PermissionStatus::Granted => Ok(()),
                    status => {
                        warn!("Microphone access still {} after request", status);
                        Err(SessionError::PermissionDenied)
                    }
                }
            }
        }
    }

    /// First free `Meeting_<timestamp>[_n].wav` in the storage directory
    async fn next_file_name(&self) -> Result<(RecordingFileName, PathBuf), SessionError> {
        let now = (self.wall_clock)();
        let mut last = None;
        for attempt in 1..=MAX_NAME_ATTEMPTS {
            let filename = RecordingFileName::timestamped(now, attempt);
            let destination = self.config.storage_dir.join(filename.as_str());
            if !self.store.exists(&destination).await {
                return Ok((filename, destination));
            }
            debug!("{} exists, trying next suffix", filename);
            last = Some(destination);
        }
        let taken = last.unwrap_or_else(|| self.config.storage_dir.clone());
        Err(FileStoreError::AlreadyExists(taken).into())
    }

    fn spawn_clock(&self, clock: ElapsedClock) -> Ticker {
        let snapshot = Arc::clone(&self.snapshot);
        Ticker::spawn(self.config.clock_interval, move || {
            let elapsed = clock.elapsed(Instant::now());
            snapshot.send_if_modified(|s| {
                if s.state != SessionState::Recording || s.elapsed == elapsed {
                    return false;
                }
                s.elapsed = elapsed;
                true
            });
            ControlFlow::Continue(())
        })
    }

    fn publish(&self, update: impl FnOnce(&mut SessionSnapshot)) {
        self.snapshot.send_modify(update);
    }

    fn publish_catalog(&self) {
        let recordings = self.catalog.entries().to_vec();
        self.publish(|s| s.recordings = recordings);
    }

    /// Mirror the outcome of a command into `error_message`
    fn settle<T>(&self, result: Result<T, SessionError>) -> Result<T, SessionError> {
        match &result {
            Ok(_) => {
                self.snapshot
                    .send_if_modified(|s| s.error_message.take().is_some());
            }
            Err(err) => {
                warn!("{}", err);
                let message = err.to_string();
                self.publish(|s| s.error_message = Some(message));
            }
        }
        result
    }
}
