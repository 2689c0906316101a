//! Protocol days and wall-clock timestamps.
//!
//! The staking contract counts time in whole days since its launch epoch.
//! Day indices are what every stake field stores; timestamps exist only to
//! turn a day back into a calendar instant for display.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// A protocol day index, counted from the contract's launch epoch.
pub type Day = u32;

/// Seconds in one protocol day.
pub const SECONDS_PER_DAY: u64 = 86_400;

/// A Unix timestamp in seconds since epoch (UTC).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The epoch (time zero).
    pub const EPOCH: Self = Self(0);

    pub fn new(secs: u64) -> Self {
        Self(secs)
    }

    /// Get the current system time as a `Timestamp`.
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        Self(secs)
    }

    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// The start of protocol day `day` for a contract launched at `self`.
    pub fn add_days(&self, day: Day) -> Self {
        Self(self.0.saturating_add(u64::from(day) * SECONDS_PER_DAY))
    }

    /// Whole protocol days elapsed between launch epoch `self` and `now`.
    ///
    /// Saturates to 0 before launch and to `Day::MAX` far in the future.
    pub fn days_until(&self, now: Timestamp) -> Day {
        let days = now.0.saturating_sub(self.0) / SECONDS_PER_DAY;
        Day::try_from(days).unwrap_or(Day::MAX)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_days_counts_whole_days() {
        let launch = Timestamp::new(1_575_331_200);
        assert_eq!(launch.add_days(0), launch);
        assert_eq!(launch.add_days(2).as_secs(), 1_575_331_200 + 2 * 86_400);
    }

    #[test]
    fn days_until_truncates_partial_days() {
        let launch = Timestamp::new(1_000);
        assert_eq!(launch.days_until(Timestamp::new(1_000)), 0);
        assert_eq!(launch.days_until(Timestamp::new(1_000 + 86_399)), 0);
        assert_eq!(launch.days_until(Timestamp::new(1_000 + 86_400)), 1);
        assert_eq!(launch.days_until(Timestamp::new(0)), 0);
    }
}
