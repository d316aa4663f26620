//! File store port

use std::fmt;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Filesystem operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOp {
    CreateDir,
    List,
    Metadata,
    Remove,
    Rename,
    Reveal,
}

impl FileOp {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreateDir => "create directory",
            Self::List => "list directory",
            Self::Metadata => "read metadata of",
            Self::Remove => "delete",
            Self::Rename => "rename",
            Self::Reveal => "reveal",
        }
    }
}

impl fmt::Display for FileOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// File store errors
#[derive(Debug, Clone, Error)]
pub enum FileStoreError {
    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Failed to {op} {}: {message}", path.display())]
    Io {
        op: FileOp,
        path: PathBuf,
        message: String,
    },
}

impl FileStoreError {
    /// Classify an io error for `path`
    pub fn from_io(op: FileOp, path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::AlreadyExists => Self::AlreadyExists(path.to_path_buf()),
            _ => Self::Io {
                op,
                path: path.to_path_buf(),
                message: err.to_string(),
            },
        }
    }
}

/// Size and timestamps of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileMetadata {
    pub size_bytes: u64,
    pub created_at: DateTime<Utc>,
}

/// Port for the directory holding the recordings
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Create `dir` and any missing parents
    async fn create_dir_all(&self, dir: &Path) -> Result<(), FileStoreError>;

    /// Regular files directly inside `dir`.
    /// A missing directory is `FileStoreError::NotFound`.
    async fn list(&self, dir: &Path) -> Result<Vec<PathBuf>, FileStoreError>;

    async fn metadata(&self, path: &Path) -> Result<FileMetadata, FileStoreError>;

    async fn exists(&self, path: &Path) -> bool;

    async fn remove(&self, path: &Path) -> Result<(), FileStoreError>;

    /// Move `from` to `to`; never overwrites an existing `to`
    async fn rename(&self, from: &Path, to: &Path) -> Result<(), FileStoreError>;

    /// Show the file in the platform file browser
    async fn reveal(&self, path: &Path) -> Result<(), FileStoreError>;
}
