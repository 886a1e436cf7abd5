//! Wifi radio state source.

use std::cell::RefCell;

use cabin_core::prelude::*;

/// Details of the currently connected network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkInfo {
    pub ssid: String,
    pub ip_address: String,
    pub subnet_mask: String,
}

/// Read-mostly view of the wifi radio.
pub trait WifiRadio {
    /// Whether the vehicle has wifi hardware at all.
    fn is_present(&self) -> bool;

    fn is_enabled(&self) -> bool;

    fn set_enabled(&self, enabled: bool) -> Result<()>;

    /// The connected network, if the radio is enabled and associated.
    fn connected_network(&self) -> Option<NetworkInfo>;

    /// Drop the current association, keeping the radio state.
    fn disconnect(&self);
}

/// In-memory wifi radio used by the simulation and by tests.
#[derive(Debug)]
pub struct FakeWifiRadio {
    present: bool,
    inner: RefCell<FakeWifiInner>,
}

#[derive(Debug)]
struct FakeWifiInner {
    enabled: bool,
    network: Option<NetworkInfo>,
}

impl Default for FakeWifiRadio {
    fn default() -> Self {
        Self::connected("CarNet", "192.168.1.34")
    }
}

impl FakeWifiRadio {
    /// Radio present, enabled, and associated with `ssid`.
    pub fn connected(ssid: &str, ip: &str) -> Self {
        Self {
            present: true,
            inner: RefCell::new(FakeWifiInner {
                enabled: true,
                network: Some(NetworkInfo {
                    ssid: ssid.to_string(),
                    ip_address: ip.to_string(),
                    subnet_mask: "255.255.255.0".to_string(),
                }),
            }),
        }
    }

    /// Radio present and enabled but not associated.
    pub fn disconnected() -> Self {
        Self {
            present: true,
            inner: RefCell::new(FakeWifiInner {
                enabled: true,
                network: None,
            }),
        }
    }

    /// No wifi hardware on this build.
    pub fn absent() -> Self {
        Self {
            present: false,
            inner: RefCell::new(FakeWifiInner {
                enabled: false,
                network: None,
            }),
        }
    }

    /// Associate with a network (simulation hook).
    pub fn join(&self, ssid: &str, ip: &str) {
        let mut inner = self.inner.borrow_mut();
        inner.network = Some(NetworkInfo {
            ssid: ssid.to_string(),
            ip_address: ip.to_string(),
            subnet_mask: "255.255.255.0".to_string(),
        });
    }
}

impl WifiRadio for FakeWifiRadio {
    fn is_present(&self) -> bool {
        self.present
    }

    fn is_enabled(&self) -> bool {
        self.present && self.inner.borrow().enabled
    }

    fn set_enabled(&self, enabled: bool) -> Result<()> {
        if !self.present {
            return Err(Error::platform("no wifi hardware"));
        }
        let mut inner = self.inner.borrow_mut();
        inner.enabled = enabled;
        if !enabled {
            inner.network = None;
        }
        info!(enabled, "wifi radio state changed");
        Ok(())
    }

    fn connected_network(&self) -> Option<NetworkInfo> {
        let inner = self.inner.borrow();
        if inner.enabled {
            inner.network.clone()
        } else {
            None
        }
    }

    fn disconnect(&self) {
        self.inner.borrow_mut().network = None;
    }
}
