//! Availability model for settings features.

use serde::{Deserialize, Serialize};

/// Computed visibility/enablement state of one controller's feature.
///
/// Exactly one value holds at any time. The status is recomputed on every
/// lifecycle-relevant event (start, restriction change, explicit refresh)
/// and is never cached across them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AvailabilityStatus {
    /// Feature is shown and interactive.
    Available,

    /// Feature is not currently applicable and its element is hidden
    /// (e.g. no network connected, only one user on the device).
    ConditionallyUnavailable,

    /// Feature is visible but inert for the current user
    /// (e.g. admin-only actions shown to a non-admin).
    DisabledForUser,

    /// Feature is absent on this hardware/build and its element is hidden.
    UnsupportedOnDevice,
}

impl AvailabilityStatus {
    /// Whether the bound element is displayed at all.
    ///
    /// Displayed controllers receive the `update_state` pass; the others
    /// are skipped and their element, if present, is hidden.
    pub fn is_displayed(self) -> bool {
        matches!(
            self,
            AvailabilityStatus::Available | AvailabilityStatus::DisabledForUser
        )
    }

    /// Whether the bound element accepts interaction.
    pub fn is_interactive(self) -> bool {
        self == AvailabilityStatus::Available
    }
}

impl std::fmt::Display for AvailabilityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AvailabilityStatus::Available => "available",
            AvailabilityStatus::ConditionallyUnavailable => "conditionally unavailable",
            AvailabilityStatus::DisabledForUser => "disabled for user",
            AvailabilityStatus::UnsupportedOnDevice => "unsupported on device",
        };
        write!(f, "{label}")
    }
}
