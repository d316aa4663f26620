//! Microphone permission via the default input device
//!
//! Desktop hosts reached through cpal have no permission prompt of their
//! own. Access counts as granted when the default input device exists and
//! reports a configuration; nothing is opened or recorded.

use async_trait::async_trait;
use cpal::traits::{DeviceTrait, HostTrait};
use tracing::debug;

use crate::application::ports::{PermissionGate, PermissionStatus};

#[derive(Debug, Clone, Default)]
pub struct InputDevicePermission;

impl InputDevicePermission {
    pub fn new() -> Self {
        Self
    }

    fn query() -> PermissionStatus {
        let Some(device) = cpal::default_host().default_input_device() else {
            debug!("No default input device");
            return PermissionStatus::Denied;
        };
        match device.default_input_config() {
            Ok(_) => PermissionStatus::Granted,
            Err(e) => {
                debug!("Input device unavailable: {}", e);
                PermissionStatus::Denied
            }
        }
    }

    async fn query_blocking() -> PermissionStatus {
        tokio::task::spawn_blocking(Self::query)
            .await
            .unwrap_or(PermissionStatus::Denied)
    }
}

#[async_trait]
impl PermissionGate for InputDevicePermission {
    async fn check(&self) -> PermissionStatus {
        Self::query_blocking().await
    }

    /// There is no prompt to show, so a request is another query
    async fn request(&self) -> PermissionStatus {
        Self::query_blocking().await
    }
}
