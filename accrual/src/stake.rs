//! A stake with its derived, display-ready fields.

use crate::error::AccrualError;
use crate::ordering::StakeKey;
use crate::payout::WindowedInterest;
use crate::status::StakeStatus;
use hexwatch_types::{Chain, Day, Hearts, Shares, Timestamp, U256};
use serde::{Deserialize, Serialize};

/// Days per year used to annualise returns.
const DAYS_PER_YEAR: f64 = 365.0;

/// A stake as the contract stores it plus everything derived from the
/// current day and daily data.
///
/// The first block of fields never changes once the stake exists
/// (`unlocked_day` only via a fresh fetch). The rest are recomputed from
/// scratch every time the current day or the daily data moves.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stake {
    pub chain: Chain,
    pub stake_id: U256,
    pub staked_hearts: Hearts,
    pub stake_shares: Shares,
    pub locked_day: Day,
    pub staked_days: Day,
    pub unlocked_day: Day,
    pub is_auto_stake: bool,

    pub penalty_days: Day,
    /// Always `locked_day + staked_days`.
    pub served_days: Day,
    pub percent_complete: f64,
    pub status: StakeStatus,
    pub start_date: Timestamp,
    pub end_date: Timestamp,

    pub interest_hearts: Hearts,
    pub interest_daily: WindowedInterest,
    pub interest_weekly: WindowedInterest,
    pub interest_monthly: WindowedInterest,
    pub big_pay_day_hearts: Option<Hearts>,
    /// Exclusive end day interest was last summed to; `None` until daily
    /// data has been applied.
    pub accrued_through: Option<Day>,
}

impl Stake {
    pub fn key(&self) -> StakeKey {
        StakeKey::new(self.chain, self.stake_id)
    }

    /// Principal plus everything accrued on top of it.
    pub fn balance_hearts(&self) -> Result<Hearts, AccrualError> {
        self.staked_hearts
            .checked_add(self.interest_hearts)
            .and_then(|v| v.checked_add(self.big_pay_day_hearts.unwrap_or_default()))
            .ok_or(AccrualError::ArithmeticOverflow)
    }

    /// Return on principal so far.
    pub fn roi(&self) -> f64 {
        let bonus = self.big_pay_day_hearts.unwrap_or_default();
        self.interest_hearts.ratio(self.staked_hearts) + bonus.ratio(self.staked_hearts)
    }

    /// [`Stake::roi`] annualised over the days actually served by `current_day`.
    pub fn apy(&self, current_day: Day) -> f64 {
        let elapsed = current_day.min(self.served_days).saturating_sub(self.locked_day);
        if elapsed == 0 {
            return 0.0;
        }
        self.roi() * DAYS_PER_YEAR / f64::from(elapsed)
    }

    /// Take interest figures from an older copy of the same stake.
    pub(crate) fn carry_accrual_from(&mut self, older: &Stake) {
        self.interest_hearts = older.interest_hearts;
        self.interest_daily = older.interest_daily;
        self.interest_weekly = older.interest_weekly;
        self.interest_monthly = older.interest_monthly;
        self.big_pay_day_hearts = older.big_pay_day_hearts;
        self.accrued_through = older.accrued_through;
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn stake(id: u64, locked_day: Day, staked_days: Day) -> Stake {
        Stake {
            chain: Chain::Ethereum,
            stake_id: U256::from(id),
            staked_hearts: Hearts::from_u64(1_000),
            stake_shares: Shares::from_u64(10),
            locked_day,
            staked_days,
            unlocked_day: 0,
            is_auto_stake: false,
            penalty_days: 90,
            served_days: locked_day + staked_days,
            percent_complete: 0.0,
            status: StakeStatus::Active,
            start_date: Timestamp::EPOCH,
            end_date: Timestamp::EPOCH,
            interest_hearts: Hearts::ZERO,
            interest_daily: WindowedInterest::default(),
            interest_weekly: WindowedInterest::default(),
            interest_monthly: WindowedInterest::default(),
            big_pay_day_hearts: None,
            accrued_through: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::stake;
    use super::*;

    #[test]
    fn balance_adds_interest_and_bonus() {
        let mut s = stake(1, 0, 100);
        s.interest_hearts = Hearts::from_u64(50);
        assert_eq!(s.balance_hearts().unwrap(), Hearts::from_u64(1_050));
        s.big_pay_day_hearts = Some(Hearts::from_u64(25));
        assert_eq!(s.balance_hearts().unwrap(), Hearts::from_u64(1_075));
    }

    #[test]
    fn balance_overflow_is_an_error() {
        let mut s = stake(1, 0, 100);
        s.staked_hearts = Hearts::new(U256::MAX);
        s.interest_hearts = Hearts::from_u64(1);
        assert_eq!(s.balance_hearts(), Err(AccrualError::ArithmeticOverflow));
        assert!(s.roi().is_finite());
    }

    #[test]
    fn roi_and_apy() {
        let mut s = stake(1, 0, 730);
        s.interest_hearts = Hearts::from_u64(100);
        assert!((s.roi() - 0.1).abs() < 1e-12);
        // 10% over 365 served days is 10% a year.
        assert!((s.apy(365) - 0.1).abs() < 1e-12);
        // Days past the term do not dilute the rate.
        assert!((s.apy(5_000) - 0.05).abs() < 1e-12);
        assert_eq!(s.apy(0), 0.0);
    }

    #[test]
    fn carry_accrual_copies_interest_only() {
        let mut older = stake(1, 0, 100);
        older.interest_hearts = Hearts::from_u64(9);
        older.accrued_through = Some(40);
        older.unlocked_day = 0;
        let mut newer = stake(1, 0, 100);
        newer.unlocked_day = 60;
        newer.carry_accrual_from(&older);
        assert_eq!(newer.interest_hearts, Hearts::from_u64(9));
        assert_eq!(newer.accrued_through, Some(40));
        assert_eq!(newer.unlocked_day, 60);
    }
}
