//! In-memory adapters shared by the use-case tests

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::domain::recording::{CaptureFormat, Duration};

use super::ports::{
    CaptureDevice, CaptureError, FileMetadata, FileOp, FileStore, FileStoreError, MediaProbe,
    PermissionGate, PermissionStatus, PlaybackDevice, PlaybackError,
};

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 17, 14, 3, 9).unwrap()
}

// --- file store ---

#[derive(Default)]
struct Disk {
    dirs: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, FileMetadata>,
    failing: Vec<FileOp>,
    revealed: Vec<PathBuf>,
}

#[derive(Clone, Default)]
pub struct MemoryFileStore {
    disk: Arc<Mutex<Disk>>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_dir(&self, dir: &Path) {
        self.disk.lock().unwrap().dirs.insert(dir.to_path_buf());
    }

    pub fn add_file(&self, path: &Path, size_bytes: u64, created_at: DateTime<Utc>) {
        let mut disk = self.disk.lock().unwrap();
        if let Some(parent) = path.parent() {
            disk.dirs.insert(parent.to_path_buf());
        }
        disk.files.insert(
            path.to_path_buf(),
            FileMetadata {
                size_bytes,
                created_at,
            },
        );
    }

    pub fn has_file(&self, path: &Path) -> bool {
        self.disk.lock().unwrap().files.contains_key(path)
    }

    pub fn file_names(&self) -> Vec<String> {
        self.disk
            .lock()
            .unwrap()
            .files
            .keys()
            .filter_map(|p| p.file_name()?.to_str().map(str::to_string))
            .collect()
    }

    pub fn fail(&self, op: FileOp) {
        self.disk.lock().unwrap().failing.push(op);
    }

    pub fn revealed(&self) -> Vec<PathBuf> {
        self.disk.lock().unwrap().revealed.clone()
    }

    fn check(&self, op: FileOp, path: &Path) -> Result<(), FileStoreError> {
        if self.disk.lock().unwrap().failing.contains(&op) {
            return Err(FileStoreError::Io {
                op,
                path: path.to_path_buf(),
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn create_dir_all(&self, dir: &Path) -> Result<(), FileStoreError> {
        self.check(FileOp::CreateDir, dir)?;
        self.add_dir(dir);
        Ok(())
    }

    async fn list(&self, dir: &Path) -> Result<Vec<PathBuf>, FileStoreError> {
        self.check(FileOp::List, dir)?;
        let disk = self.disk.lock().unwrap();
        if !disk.dirs.contains(dir) {
            return Err(FileStoreError::NotFound(dir.to_path_buf()));
        }
        Ok(disk
            .files
            .keys()
            .filter(|p| p.parent() == Some(dir))
            .cloned()
            .collect())
    }

    async fn metadata(&self, path: &Path) -> Result<FileMetadata, FileStoreError> {
        self.check(FileOp::Metadata, path)?;
        self.disk
            .lock()
            .unwrap()
            .files
            .get(path)
            .copied()
            .ok_or_else(|| FileStoreError::NotFound(path.to_path_buf()))
    }

    async fn exists(&self, path: &Path) -> bool {
        let disk = self.disk.lock().unwrap();
        disk.files.contains_key(path) || disk.dirs.contains(path)
    }

    async fn remove(&self, path: &Path) -> Result<(), FileStoreError> {
        self.check(FileOp::Remove, path)?;
        self.disk
            .lock()
            .unwrap()
            .files
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| FileStoreError::NotFound(path.to_path_buf()))
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<(), FileStoreError> {
        self.check(FileOp::Rename, from)?;
        let mut disk = self.disk.lock().unwrap();
        if disk.files.contains_key(to) {
            return Err(FileStoreError::AlreadyExists(to.to_path_buf()));
        }
        let metadata = disk
            .files
            .remove(from)
            .ok_or_else(|| FileStoreError::NotFound(from.to_path_buf()))?;
        disk.files.insert(to.to_path_buf(), metadata);
        Ok(())
    }

    async fn reveal(&self, path: &Path) -> Result<(), FileStoreError> {
        self.check(FileOp::Reveal, path)?;
        self.disk.lock().unwrap().revealed.push(path.to_path_buf());
        Ok(())
    }
}

// --- capture ---

#[derive(Default)]
struct CaptureState {
    active: AtomicBool,
    paused: AtomicBool,
    fail_start: AtomicBool,
    fail_stop: AtomicBool,
    fail_pause: AtomicBool,
    destination: Mutex<Option<PathBuf>>,
    starts: AtomicUsize,
}

/// Capture device that "writes" into a [`MemoryFileStore`]
#[derive(Clone)]
pub struct MockCapture {
    state: Arc<CaptureState>,
    disk: MemoryFileStore,
    recorded: Duration,
}

impl MockCapture {
    pub fn new(disk: MemoryFileStore) -> Self {
        Self {
            state: Arc::default(),
            disk,
            recorded: Duration::from_secs(42),
        }
    }

    pub fn fail_start(&self) {
        self.state.fail_start.store(true, Ordering::SeqCst);
    }

    pub fn fail_stop(&self) {
        self.state.fail_stop.store(true, Ordering::SeqCst);
    }

    pub fn fail_pause(&self) {
        self.state.fail_pause.store(true, Ordering::SeqCst);
    }

    pub fn starts(&self) -> usize {
        self.state.starts.load(Ordering::SeqCst)
    }

    pub fn is_paused(&self) -> bool {
        self.state.paused.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CaptureDevice for MockCapture {
    async fn start(&self, destination: &Path, _format: &CaptureFormat) -> Result<(), CaptureError> {
        if self.state.fail_start.load(Ordering::SeqCst) {
            return Err(CaptureError::StartFailed("device busy".to_string()));
        }
        self.state.starts.fetch_add(1, Ordering::SeqCst);
        self.disk.add_file(destination, 44, fixed_time());
        *self.state.destination.lock().unwrap() = Some(destination.to_path_buf());
        self.state.active.store(true, Ordering::SeqCst);
        self.state.paused.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn pause(&self) -> Result<(), CaptureError> {
        if self.state.fail_pause.load(Ordering::SeqCst) {
            return Err(CaptureError::CaptureFailed("pause rejected".to_string()));
        }
        self.state.paused.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn resume(&self) -> Result<(), CaptureError> {
        self.state.paused.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) -> Result<Duration, CaptureError> {
        self.state.active.store(false, Ordering::SeqCst);
        let destination = self.state.destination.lock().unwrap().take();
        if self.state.fail_stop.load(Ordering::SeqCst) {
            return Err(CaptureError::StopFailed("encoder error".to_string()));
        }
        if let Some(path) = destination {
            self.disk.add_file(&path, 8192, fixed_time());
        }
        Ok(self.recorded)
    }

    fn is_active(&self) -> bool {
        self.state.active.load(Ordering::SeqCst)
    }
}

// --- probe ---

pub struct MockProbe {
    duration: Option<Duration>,
}

impl MockProbe {
    pub fn returning(duration: Option<Duration>) -> Self {
        Self { duration }
    }
}

#[async_trait]
impl MediaProbe for MockProbe {
    async fn duration(&self, _path: &Path) -> Option<Duration> {
        self.duration
    }
}

// --- permission ---

#[derive(Clone)]
pub struct MockPermission {
    checks: Arc<Mutex<VecDeque<PermissionStatus>>>,
    request_result: PermissionStatus,
    requests: Arc<AtomicUsize>,
}

impl MockPermission {
    pub fn granted() -> Self {
        Self::new(&[PermissionStatus::Granted], PermissionStatus::Granted)
    }

    /// `checks` are answered in order; the last one repeats
    pub fn new(checks: &[PermissionStatus], request_result: PermissionStatus) -> Self {
        Self {
            checks: Arc::new(Mutex::new(checks.iter().copied().collect())),
            request_result,
            requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PermissionGate for MockPermission {
    async fn check(&self) -> PermissionStatus {
        let mut checks = self.checks.lock().unwrap();
        if checks.len() > 1 {
            checks.pop_front().unwrap()
        } else {
            checks.front().copied().unwrap_or(PermissionStatus::Denied)
        }
    }

    async fn request(&self) -> PermissionStatus {
        self.requests.fetch_add(1, Ordering::SeqCst);
        self.request_result
    }
}

// --- playback ---

#[derive(Default)]
struct PlayerState {
    source: Mutex<Option<PathBuf>>,
    active: AtomicBool,
    paused: AtomicBool,
    position: Mutex<Duration>,
    plays: AtomicUsize,
    fail_next: AtomicBool,
}

#[derive(Clone, Default)]
pub struct MockPlayer {
    state: Arc<PlayerState>,
}

impl MockPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn source(&self) -> Option<PathBuf> {
        self.state.source.lock().unwrap().clone()
    }

    pub fn play_count(&self) -> usize {
        self.state.plays.load(Ordering::SeqCst)
    }

    pub fn fail_next_play(&self) {
        self.state.fail_next.store(true, Ordering::SeqCst);
    }

    pub fn set_position(&self, position: Duration) {
        *self.state.position.lock().unwrap() = position;
    }

    /// Simulate the source running out
    pub fn finish_playback(&self) {
        self.state.active.store(false, Ordering::SeqCst);
    }
}

#[async_trait]
impl PlaybackDevice for MockPlayer {
    async fn play(&self, source: &Path) -> Result<(), PlaybackError> {
        if self.state.fail_next.swap(false, Ordering::SeqCst) {
            return Err(PlaybackError::OpenFailed("unsupported format".to_string()));
        }
        self.state.plays.fetch_add(1, Ordering::SeqCst);
        *self.state.source.lock().unwrap() = Some(source.to_path_buf());
        *self.state.position.lock().unwrap() = Duration::ZERO;
        self.state.active.store(true, Ordering::SeqCst);
        self.state.paused.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn pause(&self) {
        self.state.paused.store(true, Ordering::SeqCst);
    }

    fn resume(&self) {
        self.state.paused.store(false, Ordering::SeqCst);
    }

    fn stop(&self) {
        self.state.active.store(false, Ordering::SeqCst);
        self.state.paused.store(false, Ordering::SeqCst);
        *self.state.source.lock().unwrap() = None;
    }

    fn is_active(&self) -> bool {
        self.state.active.load(Ordering::SeqCst)
    }

    fn is_paused(&self) -> bool {
        self.state.paused.load(Ordering::SeqCst)
    }

    fn position(&self) -> Duration {
        *self.state.position.lock().unwrap()
    }

    fn length(&self) -> Duration {
        Duration::ZERO
    }
}
