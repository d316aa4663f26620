//! Playback coordination
//!
//! Keeps at most one recording playing and mirrors the device's progress
//! into the session snapshot.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use tracing::{debug, info};

use crate::domain::recording::{Duration, RecordingEntry, RecordingId};

use super::ports::{PlaybackDevice, PlaybackError};
use super::snapshot::{PlaybackSnapshot, SessionSnapshot, SnapshotSender};
use super::ticker::Ticker;

/// Drives a [`PlaybackDevice`] on behalf of the session manager
pub struct PlaybackCoordinator<P: PlaybackDevice + 'static> {
    device: Arc<P>,
    snapshot: SnapshotSender,
    poll_interval: StdDuration,
    poll: Option<Ticker>,
}

impl<P: PlaybackDevice + 'static> PlaybackCoordinator<P> {
    pub fn new(device: P, snapshot: SnapshotSender, poll_interval: StdDuration) -> Self {
        Self {
            device: Arc::new(device),
            snapshot,
            poll_interval,
            poll: None,
        }
    }

    /// Recording currently loaded, if any
    pub fn now_playing(&self) -> Option<RecordingId> {
        self.snapshot.borrow().playback.now_playing
    }

    /// Start playing `entry`, stopping whatever was playing before
    pub async fn play(&mut self, entry: &RecordingEntry) -> Result<(), PlaybackError> {
        self.halt();

        self.device.play(entry.location()).await?;

        let id = entry.id();
        let length = match self.device.length() {
            length if length.is_zero() => entry.duration(),
            length => length,
        };
        self.snapshot.send_modify(|s| {
            s.playback = PlaybackSnapshot {
                now_playing: Some(id),
                paused: false,
                position: Duration::ZERO,
                length,
            };
        });
        self.start_poll(id);

        info!("Playing {}", entry.filename());
        Ok(())
    }

    /// Pause the current playback. Returns false when nothing is playing.
    pub fn pause(&mut self) -> bool {
        if self.now_playing().is_none() {
            return false;
        }
        self.device.pause();
        let position = self.device.position();
        self.snapshot.send_modify(|s| {
            s.playback.paused = true;
            s.playback.position = position;
        });
        true
    }

    /// Resume a paused playback. Returns false when nothing is playing.
    pub fn resume(&mut self) -> bool {
        if self.now_playing().is_none() {
            return false;
        }
        self.device.resume();
        self.snapshot.send_modify(|s| s.playback.paused = false);
        true
    }

    /// Stop playback. Returns false when nothing was playing.
    pub fn stop(&mut self) -> bool {
        let was_playing = self.now_playing().is_some() || self.device.is_active();
        self.halt();
        if was_playing {
            info!("Playback stopped");
        }
        was_playing
    }

    /// Completion notification for `id`.
    ///
    /// Clears the marker only while it still points at `id`, so a late or
    /// repeated notification never clears a newer playback.
    pub fn finish(&mut self, id: RecordingId) -> bool {
        let cleared = clear_marker(&self.snapshot, id);
        if cleared {
            self.poll = None;
        }
        cleared
    }

    fn halt(&mut self) {
        self.poll = None;
        self.device.stop();
        self.snapshot.send_if_modified(|s| {
            if s.playback == PlaybackSnapshot::default() {
                return false;
            }
            s.playback = PlaybackSnapshot::default();
            true
        });
    }

    fn start_poll(&mut self, id: RecordingId) {
        let device = Arc::clone(&self.device);
        let snapshot = Arc::clone(&self.snapshot);

        self.poll = Some(Ticker::spawn(self.poll_interval, move || {
            if !device.is_active() {
                if clear_marker(&snapshot, id) {
                    debug!("Playback of {} reached the end", id);
                }
                return ControlFlow::Break(());
            }

            let position = device.position();
            let paused = device.is_paused();
            let mut current = true;
            snapshot.send_if_modified(|s| {
                if s.playback.now_playing != Some(id) {
                    current = false;
                    return false;
                }
                let changed = s.playback.position != position || s.playback.paused != paused;
                s.playback.position = position;
                s.playback.paused = paused;
                changed
            });

            if current {
                ControlFlow::Continue(())
            } else {
                ControlFlow::Break(())
            }
        }));
    }
}

fn clear_marker(snapshot: &SnapshotSender, id: RecordingId) -> bool {
    snapshot.send_if_modified(|s: &mut SessionSnapshot| {
        if s.playback.now_playing != Some(id) {
            return false;
        }
        s.playback = PlaybackSnapshot::default();
        true
    })
}
