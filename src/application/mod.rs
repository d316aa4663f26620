//! Application layer - use cases and port interfaces
//!
//! The session manager drives the capture and playback devices through the
//! port traits and publishes its state as snapshots.

pub mod playback;
pub mod ports;
pub mod session;
pub mod snapshot;
pub mod ticker;

#[cfg(test)]
pub(crate) mod testing;

pub use playback::PlaybackCoordinator;
pub use session::{SessionConfig, SessionError, SessionManager};
pub use snapshot::{PlaybackSnapshot, SessionSnapshot};
pub use ticker::Ticker;
