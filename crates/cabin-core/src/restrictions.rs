//! UX-restriction snapshot passed explicitly into every controller call.

use serde::{Deserialize, Serialize};

/// Driving-state restriction tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RestrictionTier {
    /// Vehicle parked or restrictions lifted; everything may be shown.
    #[default]
    Baseline,

    /// Vehicle in motion; only distraction-optimized flows may run.
    Elevated,
}

impl std::fmt::Display for RestrictionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RestrictionTier::Baseline => write!(f, "baseline"),
            RestrictionTier::Elevated => write!(f, "elevated"),
        }
    }
}

/// Snapshot of the vehicle's current UX restrictions.
///
/// Owned process-wide by the top-level shell; each active screen and
/// controller holds a read-only copy, replaced wholesale (never mutated
/// in place) on each change notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UxRestrictions {
    /// Current restriction tier.
    pub tier: RestrictionTier,

    /// When set, only distraction-optimized flows are permitted while the
    /// tier is elevated; setup/configuration flows are blocked.
    pub requires_opt: bool,

    /// Monotonically non-decreasing emission time, used by the host to
    /// detect stale updates. Never consulted for refresh deduplication.
    pub timestamp_ms: u64,
}

impl Default for UxRestrictions {
    /// Minimum restriction, matching the value the shell holds before the
    /// first broadcast arrives.
    fn default() -> Self {
        Self {
            tier: RestrictionTier::Baseline,
            requires_opt: true,
            timestamp_ms: 0,
        }
    }
}

impl UxRestrictions {
    pub fn baseline(timestamp_ms: u64) -> Self {
        Self {
            tier: RestrictionTier::Baseline,
            requires_opt: true,
            timestamp_ms,
        }
    }

    pub fn elevated(timestamp_ms: u64) -> Self {
        Self {
            tier: RestrictionTier::Elevated,
            requires_opt: true,
            timestamp_ms,
        }
    }

    /// Whether the vehicle is currently under elevated restriction.
    pub fn is_restricted(&self) -> bool {
        self.tier == RestrictionTier::Elevated
    }

    /// Whether setup/configuration flows are permitted right now.
    pub fn setup_allowed(&self) -> bool {
        !(self.is_restricted() && self.requires_opt)
    }

    /// Semantic equality used for change deduplication: tier and opt flag
    /// only. Two snapshots that differ solely in timestamp carry the same
    /// policy and must not trigger a second refresh pass.
    pub fn same_policy(&self, other: &UxRestrictions) -> bool {
        self.tier == other.tier && self.requires_opt == other.requires_opt
    }

    /// Staleness check for the host: an update whose timestamp is older
    /// than the current snapshot's is out of order and must be dropped.
    pub fn is_stale_update(&self, incoming: &UxRestrictions) -> bool {
        incoming.timestamp_ms < self.timestamp_ms
    }
}
