//! Infrastructure layer - adapter implementations
//!
//! Concrete implementations of the port interfaces on top of cpal, rodio,
//! hound and the local filesystem.

pub mod capture;
pub mod config;
pub mod logging;
pub mod permission;
pub mod playback;
pub mod storage;

// Re-export adapters
pub use capture::CpalCaptureDevice;
pub use config::XdgConfigStore;
pub use permission::InputDevicePermission;
pub use playback::RodioPlaybackDevice;
pub use storage::{default_storage_dir, LocalFileStore, WavDurationProbe};
