//! Capture session lifecycle

mod state;

pub use state::{InvalidStateTransition, SessionAction, SessionLifecycle, SessionState};
