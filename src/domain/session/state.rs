//! Capture session state machine

use std::fmt;
use thiserror::Error;

/// Capture session states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Recording,
    Paused,
    /// Transient: the capture device is finalizing the file
    Stopping,
}

impl SessionState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Recording => "recording",
            Self::Paused => "paused",
            Self::Stopping => "stopping",
        }
    }

    /// Whether a capture session is open (recording or paused)
    pub const fn is_capturing(&self) -> bool {
        matches!(self, Self::Recording | Self::Paused)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionAction {
    Start,
    Pause,
    Resume,
    Stop,
    FinishStop,
}

impl SessionAction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start recording",
            Self::Pause => "pause recording",
            Self::Resume => "resume recording",
            Self::Stop => "stop recording",
            Self::FinishStop => "finish stopping",
        }
    }
}

impl fmt::Display for SessionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error when an invalid state transition is attempted
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid state transition: cannot {action} while {current_state}")]
pub struct InvalidStateTransition {
    pub current_state: SessionState,
    pub action: SessionAction,
}

/// Capture session lifecycle.
///
/// State machine:
///   IDLE -> RECORDING (start)
///   RECORDING -> PAUSED (pause)
///   PAUSED -> RECORDING (resume)
///   RECORDING | PAUSED -> STOPPING (stop)
///   STOPPING -> IDLE (finish stop)
///
/// [`SessionLifecycle::target`] validates an action without applying it, so
/// callers can check the precondition before touching a device and only
/// commit the transition once the device call succeeded.
#[derive(Debug, Default)]
pub struct SessionLifecycle {
    state: SessionState,
}

impl SessionLifecycle {
    /// Create a new lifecycle in idle state
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
        }
    }

    /// Get the current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == SessionState::Idle
    }

    pub fn is_recording(&self) -> bool {
        self.state == SessionState::Recording
    }

    pub fn is_paused(&self) -> bool {
        self.state == SessionState::Paused
    }

    /// State the action would lead to, or why it is not allowed
    pub fn target(&self, action: SessionAction) -> Result<SessionState, InvalidStateTransition> {
        use SessionAction as A;
        use SessionState as S;

        let next = match (self.state, action) {
            (S::Idle, A::Start) => S::Recording,
            (S::Recording, A::Pause) => S::Paused,
            (S::Paused, A::Resume) => S::Recording,
            (S::Recording | S::Paused, A::Stop) => S::Stopping,
            (S::Stopping, A::FinishStop) => S::Idle,
            (current_state, action) => {
                return Err(InvalidStateTransition {
                    current_state,
                    action,
                })
            }
        };
        Ok(next)
    }

    /// Validate and apply an action
    pub fn apply(&mut self, action: SessionAction) -> Result<SessionState, InvalidStateTransition> {
        let next = self.target(action)?;
        self.state = next;
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_lifecycle_is_idle() {
        let lifecycle = SessionLifecycle::new();
        assert!(lifecycle.is_idle());
        assert!(!lifecycle.is_recording());
        assert!(!lifecycle.is_paused());
    }

    #[test]
    fn start_from_idle() {
        let mut lifecycle = SessionLifecycle::new();
        assert_eq!(
            lifecycle.apply(SessionAction::Start),
            Ok(SessionState::Recording)
        );
        assert!(lifecycle.is_recording());
    }

    #[test]
    fn start_while_recording_fails() {
        let mut lifecycle = SessionLifecycle::new();
        lifecycle.apply(SessionAction::Start).unwrap();

        let err = lifecycle.apply(SessionAction::Start).unwrap_err();
        assert_eq!(err.current_state, SessionState::Recording);
        assert_eq!(err.action, SessionAction::Start);
    }

    #[test]
    fn pause_and_resume() {
        let mut lifecycle = SessionLifecycle::new();
        lifecycle.apply(SessionAction::Start).unwrap();
        lifecycle.apply(SessionAction::Pause).unwrap();
        assert!(lifecycle.is_paused());

        lifecycle.apply(SessionAction::Resume).unwrap();
        assert!(lifecycle.is_recording());
    }

    #[test]
    fn pause_while_idle_fails() {
        let mut lifecycle = SessionLifecycle::new();
        let err = lifecycle.apply(SessionAction::Pause).unwrap_err();
        assert_eq!(err.current_state, SessionState::Idle);
        assert!(lifecycle.is_idle());
    }

    #[test]
    fn resume_while_recording_fails() {
        let mut lifecycle = SessionLifecycle::new();
        lifecycle.apply(SessionAction::Start).unwrap();
        assert!(lifecycle.apply(SessionAction::Resume).is_err());
    }

    #[test]
    fn stop_from_recording_and_paused() {
        let mut lifecycle = SessionLifecycle::new();
        lifecycle.apply(SessionAction::Start).unwrap();
        assert_eq!(
            lifecycle.apply(SessionAction::Stop),
            Ok(SessionState::Stopping)
        );
        lifecycle.apply(SessionAction::FinishStop).unwrap();

        lifecycle.apply(SessionAction::Start).unwrap();
        lifecycle.apply(SessionAction::Pause).unwrap();
        assert_eq!(
            lifecycle.apply(SessionAction::Stop),
            Ok(SessionState::Stopping)
        );
    }

    #[test]
    fn stop_while_idle_fails() {
        let mut lifecycle = SessionLifecycle::new();
        let err = lifecycle.apply(SessionAction::Stop).unwrap_err();
        assert_eq!(err.current_state, SessionState::Idle);
    }

    #[test]
    fn target_does_not_mutate() {
        let lifecycle = SessionLifecycle::new();
        assert_eq!(
            lifecycle.target(SessionAction::Start),
            Ok(SessionState::Recording)
        );
        assert!(lifecycle.is_idle());
    }

    #[test]
    fn full_cycle() {
        let mut lifecycle = SessionLifecycle::new();
        for action in [
            SessionAction::Start,
            SessionAction::Pause,
            SessionAction::Resume,
            SessionAction::Stop,
            SessionAction::FinishStop,
        ] {
            lifecycle.apply(action).unwrap();
        }
        assert!(lifecycle.is_idle());

        // Can start another cycle
        lifecycle.apply(SessionAction::Start).unwrap();
        assert!(lifecycle.is_recording());
    }

    #[test]
    fn state_display() {
        assert_eq!(SessionState::Idle.to_string(), "idle");
        assert_eq!(SessionState::Recording.to_string(), "recording");
        assert_eq!(SessionState::Paused.to_string(), "paused");
        assert_eq!(SessionState::Stopping.to_string(), "stopping");
    }

    #[test]
    fn error_display() {
        let err = InvalidStateTransition {
            current_state: SessionState::Idle,
            action: SessionAction::Pause,
        };
        let msg = err.to_string();
        assert!(msg.contains("pause recording"));
        assert!(msg.contains("idle"));
    }
}
