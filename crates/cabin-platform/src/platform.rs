//! Bundled platform handle.

use std::rc::Rc;

use crate::clock::{FakeSystemClock, SystemClock};
use crate::device::{DeviceInfo, FakeDeviceInfo};
use crate::users::{FakeUserStore, UserStore};
use crate::wifi::{FakeWifiRadio, WifiRadio};

/// Handle over the vehicle's state sources, shared read-only across all
/// controllers of the active screen. Cheap to clone.
#[derive(Clone)]
pub struct Platform {
    pub users: Rc<dyn UserStore>,
    pub wifi: Rc<dyn WifiRadio>,
    pub clock: Rc<dyn SystemClock>,
    pub device: Rc<dyn DeviceInfo>,
}

/// The in-memory vehicle backing the binary's simulation.
///
/// Keeps concretely-typed handles to every fake so the simulation driver
/// (and tests) can mutate state behind the [`Platform`] trait objects.
#[derive(Clone)]
pub struct SimulatedVehicle {
    pub users: Rc<FakeUserStore>,
    pub wifi: Rc<FakeWifiRadio>,
    pub clock: Rc<FakeSystemClock>,
    pub device: Rc<FakeDeviceInfo>,
}

impl Default for SimulatedVehicle {
    fn default() -> Self {
        Self {
            users: Rc::new(FakeUserStore::default()),
            wifi: Rc::new(FakeWifiRadio::default()),
            clock: Rc::new(FakeSystemClock::default()),
            device: Rc::new(FakeDeviceInfo::default()),
        }
    }
}

impl SimulatedVehicle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vehicle without wifi hardware.
    pub fn without_wifi() -> Self {
        Self {
            wifi: Rc::new(FakeWifiRadio::absent()),
            ..Self::default()
        }
    }

    /// The service handle the shell and controllers consume.
    pub fn platform(&self) -> Platform {
        Platform {
            users: self.users.clone(),
            wifi: self.wifi.clone(),
            clock: self.clock.clone(),
            device: self.device.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_platform_shares_fake_state() {
        let vehicle = SimulatedVehicle::new();
        let platform = vehicle.platform();

        vehicle.wifi.set_enabled(false).unwrap();
        assert!(!platform.wifi.is_enabled());
    }

    #[test]
    fn test_without_wifi() {
        let vehicle = SimulatedVehicle::without_wifi();
        assert!(!vehicle.platform().wifi.is_present());
    }
}
