//! Pro-rata payout accrual.
//!
//! Each day the contract splits that day's payout across every outstanding
//! share. A stake's cut of day `d` is `stake_shares × payout_d / shares_d`,
//! multiplied first and truncated on division, the same order the contract
//! uses, so the figure here never exceeds what the chain would pay.

use crate::daily_data::{DailyData, DailyDataSeries};
use crate::error::AccrualError;
use crate::global_info::GlobalInfo;
use hexwatch_types::{Day, Hearts, ProtocolConstants, Shares, U256};
use serde::{Deserialize, Serialize};

/// Result of summing payouts over a day range.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    /// Regular daily payouts.
    pub payout: Hearts,
    /// Big Pay Day bonus, only when the bonus day falls inside the range.
    pub big_pay_day: Option<Hearts>,
    /// Days in range that were outside the decoded series and contributed zero.
    pub missing_days: u32,
}

/// The unclaimed-satoshi pool distributed once, on Big Pay Day.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BigPayDayPool {
    pub day: Day,
    pub unclaimed_satoshis_total: U256,
    pub claimed_satoshis_total: U256,
    pub claimed_btc_addr_count: U256,
    pub hearts_per_satoshi: u64,
    pub claimable_btc_addr_count: u64,
    pub claimable_satoshis_total: u64,
}

impl BigPayDayPool {
    pub fn new(global: &GlobalInfo, constants: &ProtocolConstants) -> Self {
        Self {
            day: constants.big_pay_day,
            unclaimed_satoshis_total: global.unclaimed_satoshis_total,
            claimed_satoshis_total: global.claimed_satoshis_total,
            claimed_btc_addr_count: global.claimed_btc_addr_count,
            hearts_per_satoshi: constants.hearts_per_satoshi,
            claimable_btc_addr_count: constants.claimable_btc_addr_count,
            claimable_satoshis_total: constants.claimable_satoshis_total,
        }
    }

    /// Whether `[begin, end)` spans the bonus day.
    pub fn in_range(&self, begin: Day, end: Day) -> bool {
        begin <= self.day && end > self.day
    }

    /// This stake's bonus, or `None` when the bonus day's data is missing or
    /// carries no shares.
    pub fn slice_for(&self, stake_shares: Shares, daily: &DailyDataSeries) -> Result<Option<Hearts>, AccrualError> {
        let Some(bonus_day) = daily.get(self.day) else {
            return Ok(None);
        };
        if bonus_day.shares.is_zero() {
            return Ok(None);
        }
        let slice = self
            .unclaimed_satoshis_total
            .checked_mul(U256::from(self.hearts_per_satoshi))
            .and_then(|v| v.checked_mul(stake_shares.raw()))
            .ok_or(AccrualError::ArithmeticOverflow)?
            / bonus_day.shares.raw();
        let slice = Hearts::new(slice);
        let bonus = self.adoption_bonus(slice)?;
        slice
            .checked_add(bonus)
            .map(Some)
            .ok_or(AccrualError::ArithmeticOverflow)
    }

    /// Viral and critical-mass bonuses paid on top of a Big Pay Day slice.
    pub fn adoption_bonus(&self, payout: Hearts) -> Result<Hearts, AccrualError> {
        let viral = scale(payout.raw(), self.claimed_btc_addr_count, self.claimable_btc_addr_count)?;
        let crit = scale(payout.raw(), self.claimed_satoshis_total, self.claimable_satoshis_total)?;
        viral
            .checked_add(crit)
            .map(Hearts::new)
            .ok_or(AccrualError::ArithmeticOverflow)
    }
}

/// `value × numerator / denominator`, zero for a zero denominator.
fn scale(value: U256, numerator: U256, denominator: u64) -> Result<U256, AccrualError> {
    if denominator == 0 {
        return Ok(U256::zero());
    }
    let product = value
        .checked_mul(numerator)
        .ok_or(AccrualError::ArithmeticOverflow)?;
    Ok(product / U256::from(denominator))
}

/// One stake's pro-rata share of one day's payout. Zero on a day with no shares.
pub fn day_share(stake_shares: Shares, day: &DailyData) -> Result<Hearts, AccrualError> {
    if day.shares.is_zero() {
        return Ok(Hearts::ZERO);
    }
    let product = stake_shares
        .raw()
        .checked_mul(day.payout.raw())
        .ok_or(AccrualError::ArithmeticOverflow)?;
    Ok(Hearts::new(product / day.shares.raw()))
}

/// Sum a stake's payouts over `[begin, end)`.
///
/// Days outside the decoded series contribute zero and are counted in
/// [`Payout::missing_days`]. An empty or inverted range sums to zero.
pub fn compute_interest(
    stake_shares: Shares,
    daily: &DailyDataSeries,
    begin: Day,
    end: Day,
    pool: Option<&BigPayDayPool>,
) -> Result<Payout, AccrualError> {
    let mut payout = Hearts::ZERO;
    let mut missing_days = 0u32;
    for day in begin..end {
        match daily.get(day) {
            Some(data) => {
                payout = payout
                    .checked_add(day_share(stake_shares, data)?)
                    .ok_or(AccrualError::ArithmeticOverflow)?;
            }
            None => missing_days += 1,
        }
    }
    let big_pay_day = match pool {
        Some(pool) if pool.in_range(begin, end) => pool.slice_for(stake_shares, daily)?,
        _ => None,
    };
    Ok(Payout {
        payout,
        big_pay_day,
        missing_days,
    })
}

/// Trailing windows reported alongside total interest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterestWindow {
    Daily,
    Weekly,
    Monthly,
}

impl InterestWindow {
    pub const ALL: [InterestWindow; 3] = [Self::Daily, Self::Weekly, Self::Monthly];

    pub fn days(&self) -> Day {
        match self {
            Self::Daily => 1,
            Self::Weekly => 7,
            Self::Monthly => 30,
        }
    }

    /// Start of the window ending at `end`, clamped to the stake's first day.
    pub fn start(&self, accrual_begin: Day, end: Day) -> Day {
        end.saturating_sub(self.days()).max(accrual_begin)
    }
}

/// Interest over a trailing window, with the window's actual length.
///
/// A young stake's weekly window may span fewer than seven days; rate
/// figures must divide by `days`, not by the nominal window size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowedInterest {
    pub hearts: Hearts,
    pub days: Day,
}

impl WindowedInterest {
    /// Average hearts per day over the window; zero for an empty window.
    pub fn per_day(&self) -> Hearts {
        if self.days == 0 {
            return Hearts::ZERO;
        }
        Hearts::new(self.hearts.raw() / U256::from(self.days))
    }
}

/// The day range a stake has accrued over so far: `[locked, min(served, current))`.
///
/// `None` when the stake has not started yet.
pub fn accrual_range(locked_day: Day, staked_days: Day, current_day: Day) -> Option<(Day, Day)> {
    if locked_day > current_day {
        return None;
    }
    let served = locked_day.saturating_add(staked_days);
    Some((locked_day, served.min(current_day)))
}
