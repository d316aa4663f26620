//! Catalog and playback commands of the session manager

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::recording::{
    sort_newest_first, Duration, RecordingEntry, RecordingFileName, RecordingId,
};

use super::{SessionError, SessionManager};
use crate::application::ports::{
    CaptureDevice, FileOp, FileStore, FileStoreError, MediaProbe, PermissionGate, PlaybackDevice,
};

impl<C, F, M, G, P> SessionManager<C, F, M, G, P>
where
    C: CaptureDevice,
    F: FileStore + 'static,
    M: MediaProbe + 'static,
    G: PermissionGate,
    P: PlaybackDevice + 'static,
{
    /// Rescan the storage directory and replace the catalog
    pub async fn enumerate(&mut self) -> Result<Vec<RecordingEntry>, SessionError> {
        let result = self.try_enumerate().await;
        self.settle(result)
    }

    /// Delete a recording's file and drop it from the catalog
    pub async fn delete(&mut self, id: RecordingId) -> Result<(), SessionError> {
        let result = self.try_delete(id).await;
        self.settle(result)
    }

    /// Rename a recording's file. `.wav` is appended when missing.
    pub async fn rename(
        &mut self,
        id: RecordingId,
        new_name: &str,
    ) -> Result<RecordingEntry, SessionError> {
        let result = self.try_rename(id, new_name).await;
        self.settle(result)
    }

    /// Show a recording in the platform file browser
    pub async fn reveal(&mut self, id: RecordingId) -> Result<(), SessionError> {
        let result = match self.lookup(id) {
            Ok(entry) => {
                let location = entry.location().to_path_buf();
                self.store.reveal(&location).await.map_err(SessionError::from)
            }
            Err(err) => Err(err),
        };
        self.settle(result)
    }

    /// Catalog entry by id
    pub fn entry(&self, id: RecordingId) -> Option<&RecordingEntry> {
        self.catalog.get(id)
    }

    /// Catalog, newest first
    pub fn recordings(&self) -> &[RecordingEntry] {
        self.catalog.entries()
    }

    /// Play a recording, replacing any current playback
    pub async fn play(&mut self, id: RecordingId) -> Result<(), SessionError> {
        let result = match self.lookup(id).cloned() {
            Ok(entry) => self.playback.play(&entry).await.map_err(SessionError::from),
            Err(err) => Err(err),
        };
        self.settle(result)
    }

    pub fn pause_playback(&mut self) -> Result<(), SessionError> {
        let result = if self.playback.pause() {
            Ok(())
        } else {
            Err(SessionError::NotPlaying)
        };
        self.settle(result)
    }

    pub fn resume_playback(&mut self) -> Result<(), SessionError> {
        let result = if self.playback.resume() {
            Ok(())
        } else {
            Err(SessionError::NotPlaying)
        };
        self.settle(result)
    }

    pub fn stop_playback(&mut self) -> Result<(), SessionError> {
        let result = if self.playback.stop() {
            Ok(())
        } else {
            Err(SessionError::NotPlaying)
        };
        self.settle(result)
    }

    /// Completion notification from the playback device
    pub fn playback_finished(&mut self, id: RecordingId) -> bool {
        self.playback.finish(id)
    }

    async fn try_enumerate(&mut self) -> Result<Vec<RecordingEntry>, SessionError> {
        self.publish(|s| s.loading = true);

        let store = Arc::clone(&self.store);
        let probe = Arc::clone(&self.probe);
        let dir = self.config.storage_dir.clone();
        let in_progress = self.in_progress().map(Path::to_path_buf);
        let scan = tokio::spawn(async move {
            scan_directory(
                store.as_ref(),
                probe.as_ref(),
                &dir,
                in_progress.as_deref(),
            )
            .await
        });

        let scanned = match scan.await {
            Ok(result) => result,
            Err(err) => Err(FileStoreError::Io {
                op: FileOp::List,
                path: self.config.storage_dir.clone(),
                message: format!("scan task failed: {}", err),
            }),
        };

        let entries = match scanned {
            Ok(entries) => entries,
            Err(err) => {
                self.publish(|s| s.loading = false);
                return Err(err.into());
            }
        };

        self.catalog.replace(entries);
        let recordings = self.catalog.entries().to_vec();
        let listed = recordings.clone();
        self.publish(|s| {
            s.recordings = recordings;
            s.loading = false;
        });

        info!(
            "Found {} recording(s) in {}",
            listed.len(),
            self.config.storage_dir.display()
        );
        Ok(listed)
    }

    async fn try_delete(&mut self, id: RecordingId) -> Result<(), SessionError> {
        let location = self.lookup(id)?.location().to_path_buf();
        self.ensure_not_in_progress(&location)?;

        if self.playback.now_playing() == Some(id) {
            self.playback.stop();
        }

        self.store.remove(&location).await?;
        self.catalog.remove(id);
        self.publish_catalog();

        info!("Deleted {}", location.display());
        Ok(())
    }

    async fn try_rename(
        &mut self,
        id: RecordingId,
        new_name: &str,
    ) -> Result<RecordingEntry, SessionError> {
        let entry = self.lookup(id)?;
        let filename = RecordingFileName::from_user_input(new_name)?;
        if filename.as_str() == entry.filename() {
            return Ok(entry.clone());
        }

        let from = entry.location().to_path_buf();
        let to = from.with_file_name(filename.as_str());
        self.ensure_not_in_progress(&from)?;
        self.ensure_not_in_progress(&to)?;
        self.store.rename(&from, &to).await?;

        self.catalog.rename(id, filename);
        self.publish_catalog();

        let renamed = self.lookup(id)?.clone();
        info!("Renamed {} to {}", from.display(), renamed.filename());
        Ok(renamed)
    }

    fn lookup(&self, id: RecordingId) -> Result<&RecordingEntry, SessionError> {
        self.catalog
            .get(id)
            .ok_or(SessionError::UnknownRecording(id))
    }

    /// Destination of the capture session, if one is open
    fn in_progress(&self) -> Option<&Path> {
        self.active
            .as_ref()
            .map(|active| active.destination.as_path())
    }

    fn ensure_not_in_progress(&self, path: &Path) -> Result<(), SessionError> {
        if self.in_progress() == Some(path) {
            return Err(SessionError::RecordingInProgress(path.display().to_string()));
        }
        Ok(())
    }
}

/// List the recordings in `dir`, newest first.
///
/// A missing directory is an empty catalog. Files whose metadata cannot be
/// read are listed with size 0 and the current time. `in_progress` is the
/// file still being captured; it is left out until the capture stops.
pub(crate) async fn scan_directory<F, M>(
    store: &F,
    probe: &M,
    dir: &Path,
    in_progress: Option<&Path>,
) -> Result<Vec<RecordingEntry>, FileStoreError>
where
    F: FileStore + ?Sized,
    M: MediaProbe + ?Sized,
{
    let paths = match store.list(dir).await {
        Ok(paths) => paths,
        Err(FileStoreError::NotFound(_)) => {
            debug!("{} does not exist yet", dir.display());
            return Ok(Vec::new());
        }
        Err(err) => return Err(err),
    };

    let mut entries = Vec::with_capacity(paths.len());
    for path in paths {
        if Some(path.as_path()) == in_progress {
            debug!("Skipping {} while it is being recorded", path.display());
            continue;
        }
        let Some(filename) = path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(RecordingFileName::from_existing)
        else {
            continue;
        };

        let (size_bytes, created_at) = match store.metadata(&path).await {
            Ok(metadata) => (metadata.size_bytes, metadata.created_at),
            Err(err) => {
                warn!("Could not read metadata of {}: {}", path.display(), err);
                (0, chrono::Utc::now())
            }
        };

        let duration = match probe.duration(&path).await {
            Some(duration) => duration,
            None => {
                debug!("No duration for {}", path.display());
                Duration::ZERO
            }
        };

        entries.push(RecordingEntry::new(
            dir,
            filename,
            duration,
            size_bytes,
            created_at,
        ));
    }

    sort_newest_first(&mut entries);
    Ok(entries)
}
