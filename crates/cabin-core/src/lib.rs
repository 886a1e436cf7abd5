//! # cabin-core - Core Domain Types
//!
//! Foundation crate for Cabin Settings. Provides the availability model,
//! the UX-restriction snapshot type, the external change-broadcast
//! vocabulary, error handling, and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on
//! external crates (serde, chrono, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Availability (`availability`)
//! - [`AvailabilityStatus`] - Computed visibility/enablement state of a
//!   settings feature
//!
//! ### Restrictions (`restrictions`)
//! - [`UxRestrictions`] - Snapshot of the vehicle's current UX-restriction
//!   state, passed explicitly into every controller call
//! - [`RestrictionTier`] - Baseline (parked) vs. elevated (driving)
//!
//! ### Events (`events`)
//! - [`PlatformEvent`] - External state-change broadcasts (time, wifi, users)
//! - [`EventTopic`] - Subscription vocabulary for those broadcasts
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//! - [`ResultExt`] - Extension trait for adding error context
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use cabin_core::prelude::*;
//! ```

pub mod availability;
pub mod error;
pub mod events;
pub mod logging;
pub mod restrictions;

/// Prelude for common imports used throughout all Cabin Settings crates
pub mod prelude {
    pub use super::error::{Error, Result, ResultExt};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use availability::AvailabilityStatus;
pub use error::{Error, Result, ResultExt};
pub use events::{EventTopic, PlatformEvent};
pub use restrictions::{RestrictionTier, UxRestrictions};
