//! Observable session state
//!
//! The presentation layer subscribes to a `watch` channel and re-renders on
//! every new [`SessionSnapshot`].

use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::recording::{Duration, RecordingEntry, RecordingId};
use crate::domain::session::SessionState;

/// Playback part of the snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackSnapshot {
    /// Recording currently loaded in the playback device, for highlighting
    pub now_playing: Option<RecordingId>,
    pub paused: bool,
    pub position: Duration,
    pub length: Duration,
}

/// Immutable view of everything the presentation layer renders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub state: SessionState,
    /// File name of the capture in progress
    pub current_file: Option<String>,
    /// Presentation clock; frozen while paused, zero when idle
    pub elapsed: Duration,
    /// Catalog, newest first
    pub recordings: Vec<RecordingEntry>,
    /// A directory scan is running
    pub loading: bool,
    pub playback: PlaybackSnapshot,
    /// Message of the last failed command, cleared by the next successful one
    pub error_message: Option<String>,
}

impl SessionSnapshot {
    pub fn is_recording(&self) -> bool {
        self.state == SessionState::Recording
    }

    pub fn is_paused(&self) -> bool {
        self.state == SessionState::Paused
    }

    /// Look up a recording by id
    pub fn recording(&self, id: RecordingId) -> Option<&RecordingEntry> {
        self.recordings.iter().find(|e| e.id() == id)
    }

    /// Entry currently playing, if it is still in the catalog
    pub fn now_playing(&self) -> Option<&RecordingEntry> {
        self.playback.now_playing.and_then(|id| self.recording(id))
    }
}

/// Shared publishing end of the snapshot channel
pub type SnapshotSender = Arc<watch::Sender<SessionSnapshot>>;

/// Create the channel with a default snapshot
pub fn snapshot_channel() -> SnapshotSender {
    let (tx, _rx) = watch::channel(SessionSnapshot::default());
    Arc::new(tx)
}
