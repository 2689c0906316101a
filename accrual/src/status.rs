//! Stake lifecycle classification.

use crate::error::AccrualError;
use hexwatch_types::{Day, StakeRecord};
use serde::{Deserialize, Serialize};

/// Where a stake is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StakeStatus {
    /// Term still running, or any state the other rules do not claim.
    Active,
    /// Ended before its term completed.
    EmergencyEnd,
    /// Ended after its term, inside the grace window.
    GoodAccounting,
    /// Term complete, not yet ended, still inside the grace window.
    GracePeriod,
    /// Term complete, not ended, grace window expired: the contract charges a
    /// late penalty for every further day.
    Bleeding,
}

impl StakeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::EmergencyEnd => "emergency-end",
            Self::GoodAccounting => "good-accounting",
            Self::GracePeriod => "grace-period",
            Self::Bleeding => "bleeding",
        }
    }

    /// Only active stakes count towards active share and principal totals.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Classify a stake. The first matching rule wins:
///
/// 1. unlocked before its served day → `EmergencyEnd`
/// 2. unlocked in `[served, served + grace)` → `GoodAccounting`
/// 3. not unlocked, current day in `[served, served + grace)` → `GracePeriod`
/// 4. not unlocked, current day past `served + grace` → `Bleeding`
/// 5. otherwise → `Active`
///
/// A zero-day stake is rejected: it has no term to classify against.
pub fn classify(stake: &StakeRecord, current_day: Day, grace_period_days: Day) -> Result<StakeStatus, AccrualError> {
    classify_days(
        stake.locked_day,
        stake.staked_days,
        stake.unlocked_day,
        current_day,
        grace_period_days,
    )
}

/// [`classify`] over bare day values.
pub fn classify_days(
    locked_day: Day,
    staked_days: Day,
    unlocked_day: Day,
    current_day: Day,
    grace_period_days: Day,
) -> Result<StakeStatus, AccrualError> {
    if staked_days == 0 {
        return Err(AccrualError::Configuration(format!(
            "stake locked on day {locked_day} has zero staked days"
        )));
    }
    // Widened so `served + grace` cannot wrap.
    let served = u64::from(locked_day) + u64::from(staked_days);
    let grace_end = served + u64::from(grace_period_days);
    let unlocked = u64::from(unlocked_day);
    let current = u64::from(current_day);

    let status = if unlocked > 0 && unlocked < served {
        StakeStatus::EmergencyEnd
    } else if unlocked > 0 && (served..grace_end).contains(&unlocked) {
        StakeStatus::GoodAccounting
    } else if unlocked == 0 && (served..grace_end).contains(&current) {
        StakeStatus::GracePeriod
    } else if unlocked == 0 && current > grace_end {
        StakeStatus::Bleeding
    } else {
        StakeStatus::Active
    };
    Ok(status)
}

/// Fraction of the term elapsed, clamped to `[0, 1]`.
pub fn percent_complete(locked_day: Day, staked_days: Day, current_day: Day) -> Result<f64, AccrualError> {
    if staked_days == 0 {
        return Err(AccrualError::Configuration(format!(
            "stake locked on day {locked_day} has zero staked days"
        )));
    }
    let elapsed = f64::from(current_day) - f64::from(locked_day);
    Ok((elapsed / f64::from(staked_days)).clamp(0.0, 1.0))
}

/// Days of payout an early end forfeits: half the term rounded up, with a floor.
pub fn penalty_days(staked_days: Day, early_penalty_min_days: Day) -> Day {
    let half = staked_days / 2 + staked_days % 2;
    half.max(early_penalty_min_days)
}
