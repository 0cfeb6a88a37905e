//! Injectable wall-clock abstraction.
//!
//! Two pieces of the request pipeline depend on "now": the auto-generated
//! uniqueness token and the card-expiry future-date check. Both read time
//! through the [`Clock`] trait instead of calling into the system clock
//! directly, so tests can pin the instant with [`FixedClock`] and assert
//! exact output. Production code uses [`SystemClock`].

use chrono::{DateTime, Datelike, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Milliseconds since 1970-01-01T00:00:00Z.
    fn now_millis(&self) -> u64;
}

/// The real wall clock, backed by `chrono`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> u64 {
        Utc::now().timestamp_millis() as u64
    }
}

/// A clock frozen at a fixed instant, for tests and deterministic replay.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u64);

impl Clock for FixedClock {
    fn now_millis(&self) -> u64 {
        self.0
    }
}

/// Splits an epoch-milliseconds instant into the (month, two-digit year)
/// pair used by the expiry check.
///
/// Month is 1-12. Year is the calendar year modulo 100, matching the
/// two-digit expiry years embossed on cards.
pub fn month_and_two_digit_year(millis: u64) -> (u32, u32) {
    let instant = DateTime::<Utc>::from_timestamp_millis(millis as i64).unwrap_or_default();
    (instant.month(), instant.year().rem_euclid(100) as u32)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
