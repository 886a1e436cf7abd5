//! System clock and time-configuration source.

use std::cell::RefCell;

use cabin_core::prelude::*;
use chrono::{Duration, NaiveDate, NaiveDateTime};

/// Read-mostly view of the system clock configuration.
pub trait SystemClock {
    /// Whether the time is set automatically from the network.
    fn auto_time_enabled(&self) -> bool;

    fn set_auto_time(&self, enabled: bool) -> Result<()>;

    /// Current date formatted for display.
    fn current_date(&self) -> String;

    /// Current wall-clock time formatted for display.
    fn current_time(&self) -> String;
}

/// In-memory clock used by the simulation and by tests.
///
/// Holds a fixed point in time that the simulation advances explicitly,
/// keeping formatted output deterministic.
#[derive(Debug)]
pub struct FakeSystemClock {
    inner: RefCell<FakeClockInner>,
}

#[derive(Debug)]
struct FakeClockInner {
    now: NaiveDateTime,
    auto_time: bool,
}

impl Default for FakeSystemClock {
    fn default() -> Self {
        let now = NaiveDate::from_ymd_opt(2024, 6, 1)
            .and_then(|d| d.and_hms_opt(10, 30, 0))
            .unwrap_or_default();
        Self {
            inner: RefCell::new(FakeClockInner {
                now,
                auto_time: true,
            }),
        }
    }
}

impl FakeSystemClock {
    pub fn at(now: NaiveDateTime) -> Self {
        Self {
            inner: RefCell::new(FakeClockInner {
                now,
                auto_time: true,
            }),
        }
    }

    /// Advance the simulated clock (simulation hook).
    pub fn advance_minutes(&self, minutes: i64) {
        let mut inner = self.inner.borrow_mut();
        inner.now += Duration::minutes(minutes);
    }
}

impl SystemClock for FakeSystemClock {
    fn auto_time_enabled(&self) -> bool {
        self.inner.borrow().auto_time
    }

    fn set_auto_time(&self, enabled: bool) -> Result<()> {
        self.inner.borrow_mut().auto_time = enabled;
        info!(enabled, "auto time changed");
        Ok(())
    }

    fn current_date(&self) -> String {
        self.inner.borrow().now.format("%Y-%m-%d").to_string()
    }

    fn current_time(&self) -> String {
        self.inner.borrow().now.format("%H:%M").to_string()
    }
}
