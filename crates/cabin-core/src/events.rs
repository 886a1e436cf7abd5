//! External state-change broadcasts.
//!
//! Platform services announce changes as payload-free events; interested
//! controllers subscribe to a topic while started and re-query their
//! source when an event arrives.

use serde::{Deserialize, Serialize};

/// Subscription vocabulary for platform broadcasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTopic {
    /// System time or time-configuration changed.
    TimeChanged,
    /// Wifi radio or connection state changed.
    WifiStateChanged,
    /// The set of users on the device changed.
    UsersChanged,
}

/// One external state-change notification.
///
/// Events carry no payload: receivers hold a read-only handle to the
/// originating service and re-query it on delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformEvent {
    TimeChanged,
    WifiStateChanged,
    UsersChanged,
}

impl PlatformEvent {
    /// The topic a subscriber must hold to receive this event.
    pub fn topic(&self) -> EventTopic {
        match self {
            PlatformEvent::TimeChanged => EventTopic::TimeChanged,
            PlatformEvent::WifiStateChanged => EventTopic::WifiStateChanged,
            PlatformEvent::UsersChanged => EventTopic::UsersChanged,
        }
    }
}
