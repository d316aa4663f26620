//! Local filesystem store for recordings

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::fs;
use tracing::debug;

use crate::application::ports::{FileMetadata, FileOp, FileStore, FileStoreError};

/// Directory name under the documents folder
pub const STORAGE_DIR_NAME: &str = "Meetings";

/// `<documents>/Meetings`, falling back to `~/Documents/Meetings`
pub fn default_storage_dir() -> PathBuf {
    dirs::document_dir()
        .or_else(|| dirs::home_dir().map(|home| home.join("Documents")))
        .unwrap_or_else(|| PathBuf::from("Documents"))
        .join(STORAGE_DIR_NAME)
}

/// [`FileStore`] over `tokio::fs`
#[derive(Debug, Clone, Default)]
pub struct LocalFileStore;

impl LocalFileStore {
    pub fn new() -> Self {
        Self
    }
}

/// Creation time, then modification time, then now
fn created_at(metadata: &std::fs::Metadata) -> DateTime<Utc> {
    metadata
        .created()
        .or_else(|_| metadata.modified())
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| DateTime::<Utc>::from(SystemTime::now()))
}

#[async_trait]
impl FileStore for LocalFileStore {
    async fn create_dir_all(&self, dir: &Path) -> Result<(), FileStoreError> {
        fs::create_dir_all(dir)
            .await
            .map_err(|e| FileStoreError::from_io(FileOp::CreateDir, dir, e))
    }

    async fn list(&self, dir: &Path) -> Result<Vec<PathBuf>, FileStoreError> {
        let mut reader = fs::read_dir(dir)
            .await
            .map_err(|e| FileStoreError::from_io(FileOp::List, dir, e))?;

        let mut files = Vec::new();
        while let Some(entry) = reader
            .next_entry()
            .await
            .map_err(|e| FileStoreError::from_io(FileOp::List, dir, e))?
        {
            match entry.file_type().await {
                Ok(file_type) if file_type.is_file() => files.push(entry.path()),
                Ok(_) => {}
                Err(e) => debug!("Skipping {}: {}", entry.path().display(), e),
            }
        }
        Ok(files)
    }

    async fn metadata(&self, path: &Path) -> Result<FileMetadata, FileStoreError> {
        let metadata = fs::metadata(path)
            .await
            .map_err(|e| FileStoreError::from_io(FileOp::Metadata, path, e))?;
        Ok(FileMetadata {
            size_bytes: metadata.len(),
            created_at: created_at(&metadata),
        })
    }

    async fn exists(&self, path: &Path) -> bool {
        fs::try_exists(path).await.unwrap_or(false)
    }

    async fn remove(&self, path: &Path) -> Result<(), FileStoreError> {
        fs::remove_file(path)
            .await
            .map_err(|e| FileStoreError::from_io(FileOp::Remove, path, e))
    }

    async fn rename(&self, from: &Path, to: &Path) -> Result<(), FileStoreError> {
        if self.exists(to).await {
            return Err(FileStoreError::AlreadyExists(to.to_path_buf()));
        }
        fs::rename(from, to)
            .await
            .map_err(|e| FileStoreError::from_io(FileOp::Rename, from, e))
    }

    async fn reveal(&self, path: &Path) -> Result<(), FileStoreError> {
        let target = path.parent().unwrap_or(path).to_path_buf();
        tokio::task::spawn_blocking(move || {
            open::that(&target).map_err(|e| FileStoreError::from_io(FileOp::Reveal, &target, e))
        })
        .await
        .map_err(|e| FileStoreError::Io {
            op: FileOp::Reveal,
            path: path.to_path_buf(),
            message: format!("Task join error: {}", e),
        })?
    }
}
