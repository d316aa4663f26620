//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod capture;
pub mod config;
pub mod file_store;
pub mod permission;
pub mod playback;
pub mod probe;

// Re-export common types
pub use capture::{CaptureDevice, CaptureError};
pub use config::ConfigStore;
pub use file_store::{FileMetadata, FileOp, FileStore, FileStoreError};
pub use permission::{PermissionGate, PermissionStatus};
pub use playback::{PlaybackDevice, PlaybackError};
pub use probe::MediaProbe;
