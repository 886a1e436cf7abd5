//! # cabin-platform - Vehicle Platform Services
//!
//! Service boundary between the settings framework and the vehicle. Each
//! external state source is a narrow trait consumed read-only by the
//! controllers; the bundled in-memory implementations simulate the vehicle
//! for the binary and for tests.
//!
//! ## Public API
//!
//! ### Services
//! - [`UserStore`] - user/account roles, user list, removal
//! - [`WifiRadio`] - radio presence, enabled state, connected network
//! - [`SystemClock`] - auto-time flag, formatted date/time
//! - [`DeviceInfo`] - build identification, system-update support
//! - [`Platform`] - `Rc`-bundled handle over the four services
//! - [`SimulatedVehicle`] - in-memory backing used by the binary and tests
//!
//! ### Listener plumbing (`subscription`)
//! - [`ListenerHub`] - registry of active broadcast subscriptions
//! - [`ListenerHandle`] - scoped acquisition, released explicitly or on drop
//!
//! ### Persistence (`store`)
//! - [`SettingsStore`] - toml-backed persisted settings values

pub mod clock;
pub mod device;
pub mod platform;
pub mod store;
pub mod subscription;
pub mod users;
pub mod wifi;

pub use clock::{FakeSystemClock, SystemClock};
pub use device::{DeviceInfo, FakeDeviceInfo};
pub use platform::{Platform, SimulatedVehicle};
pub use store::{PersistedSettings, SettingsStore};
pub use subscription::{ListenerHandle, ListenerHub};
pub use users::{FakeUserStore, UserId, UserInfo, UserStore};
pub use wifi::{FakeWifiRadio, NetworkInfo, WifiRadio};
