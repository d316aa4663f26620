//! Capture permission adapters

mod input_device;

pub use input_device::InputDevicePermission;
