//! Microphone permission port

use std::fmt;

use async_trait::async_trait;

/// Result of a capture-permission query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PermissionStatus {
    Granted,
    Denied,
    /// The user has not been asked yet
    Undetermined,
}

impl PermissionStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Granted => "granted",
            Self::Denied => "denied",
            Self::Undetermined => "undetermined",
        }
    }
}

impl fmt::Display for PermissionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Port for checking and requesting microphone access
#[async_trait]
pub trait PermissionGate: Send + Sync {
    /// Current permission without prompting
    async fn check(&self) -> PermissionStatus;

    /// Prompt the user and wait for the answer.
    /// Returns `Granted` or `Denied`; callers treat anything else as denied.
    async fn request(&self) -> PermissionStatus;
}
