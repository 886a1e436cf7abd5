//! Device/build identification source.

use cabin_core::prelude::*;

/// Read-only view of the device build.
pub trait DeviceInfo {
    /// User-visible build identifier (the "build number" row).
    fn build_display(&self) -> String;

    /// Whether this build ships the system-update flow. Fails when the
    /// update manager is unavailable; callers degrade rather than surface
    /// the failure.
    fn supports_system_update(&self) -> Result<bool>;
}

/// Static device info used by the simulation and by tests.
#[derive(Debug, Clone)]
pub struct FakeDeviceInfo {
    pub build: String,
    pub system_update: bool,
}

impl Default for FakeDeviceInfo {
    fn default() -> Self {
        Self {
            build: "CABIN.2024.06-userdebug".to_string(),
            system_update: true,
        }
    }
}

impl FakeDeviceInfo {
    pub fn without_system_update() -> Self {
        Self {
            system_update: false,
            ..Self::default()
        }
    }
}

impl DeviceInfo for FakeDeviceInfo {
    fn build_display(&self) -> String {
        self.build.clone()
    }

    fn supports_system_update(&self) -> Result<bool> {
        Ok(self.system_update)
    }
}
