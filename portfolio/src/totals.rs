//! Stake aggregation and group rollups.

use hexwatch_accrual::{AccrualError, Stake};
use hexwatch_types::{AccountKey, Hearts, Shares};
use serde::{Deserialize, Serialize};

/// Summed figures for a set of stakes.
///
/// `stake_shares` and `staked_hearts` cover every stake passed in; the
/// `active_` pair covers only stakes whose status is active.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub stake_count: u64,
    pub stake_shares: Shares,
    pub staked_hearts: Hearts,
    pub active_stake_shares: Shares,
    pub active_staked_hearts: Hearts,
    pub interest_hearts: Hearts,
    pub interest_daily_hearts: Hearts,
    pub interest_weekly_hearts: Hearts,
    pub interest_monthly_hearts: Hearts,
    pub big_pay_day_hearts: Hearts,
    pub liquid_hearts: Hearts,
}

impl Totals {
    /// Liquid balance plus principal plus everything accrued.
    pub fn balance_hearts(&self) -> Result<Hearts, AccrualError> {
        self.liquid_hearts
            .checked_add(self.staked_hearts)
            .and_then(|v| v.checked_add(self.interest_hearts))
            .and_then(|v| v.checked_add(self.big_pay_day_hearts))
            .ok_or(AccrualError::ArithmeticOverflow)
    }

    /// Field-wise sum of two totals.
    pub fn checked_merge(&self, other: &Totals) -> Result<Totals, AccrualError> {
        Ok(Totals {
            stake_count: self
                .stake_count
                .checked_add(other.stake_count)
                .ok_or(AccrualError::ArithmeticOverflow)?,
            stake_shares: add_shares(self.stake_shares, other.stake_shares)?,
            staked_hearts: add_hearts(self.staked_hearts, other.staked_hearts)?,
            active_stake_shares: add_shares(self.active_stake_shares, other.active_stake_shares)?,
            active_staked_hearts: add_hearts(self.active_staked_hearts, other.active_staked_hearts)?,
            interest_hearts: add_hearts(self.interest_hearts, other.interest_hearts)?,
            interest_daily_hearts: add_hearts(self.interest_daily_hearts, other.interest_daily_hearts)?,
            interest_weekly_hearts: add_hearts(self.interest_weekly_hearts, other.interest_weekly_hearts)?,
            interest_monthly_hearts: add_hearts(self.interest_monthly_hearts, other.interest_monthly_hearts)?,
            big_pay_day_hearts: add_hearts(self.big_pay_day_hearts, other.big_pay_day_hearts)?,
            liquid_hearts: add_hearts(self.liquid_hearts, other.liquid_hearts)?,
        })
    }

    fn add_stake(&mut self, stake: &Stake) -> Result<(), AccrualError> {
        self.stake_count += 1;
        self.stake_shares = add_shares(self.stake_shares, stake.stake_shares)?;
        self.staked_hearts = add_hearts(self.staked_hearts, stake.staked_hearts)?;
        if stake.status.is_active() {
            self.active_stake_shares = add_shares(self.active_stake_shares, stake.stake_shares)?;
            self.active_staked_hearts = add_hearts(self.active_staked_hearts, stake.staked_hearts)?;
        }
        self.interest_hearts = add_hearts(self.interest_hearts, stake.interest_hearts)?;
        self.interest_daily_hearts = add_hearts(self.interest_daily_hearts, stake.interest_daily.hearts)?;
        self.interest_weekly_hearts = add_hearts(self.interest_weekly_hearts, stake.interest_weekly.hearts)?;
        self.interest_monthly_hearts =
            add_hearts(self.interest_monthly_hearts, stake.interest_monthly.hearts)?;
        if let Some(bonus) = stake.big_pay_day_hearts {
            self.big_pay_day_hearts = add_hearts(self.big_pay_day_hearts, bonus)?;
        }
        Ok(())
    }
}

fn add_hearts(a: Hearts, b: Hearts) -> Result<Hearts, AccrualError> {
    a.checked_add(b).ok_or(AccrualError::ArithmeticOverflow)
}

fn add_shares(a: Shares, b: Shares) -> Result<Shares, AccrualError> {
    a.checked_add(b).ok_or(AccrualError::ArithmeticOverflow)
}

/// Fold stakes into totals. Order-independent; an absent bonus counts as zero.
pub fn aggregate<'a, I>(stakes: I) -> Result<Totals, AccrualError>
where
    I: IntoIterator<Item = &'a Stake>,
{
    let mut totals = Totals::default();
    for stake in stakes {
        totals.add_stake(stake)?;
    }
    Ok(totals)
}

/// Per-account totals rolled up into one group (the favorites).
///
/// Entries are keyed by account; updates replace in place, so partial
/// refreshes arriving in any order converge on the same rollup.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupTotals {
    entries: Vec<(AccountKey, Totals)>,
}

impl GroupTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entry for `key`, or append one. Returns whether it replaced.
    pub fn upsert(&mut self, key: AccountKey, totals: Totals) -> bool {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => {
                entry.1 = totals;
                true
            }
            None => {
                self.entries.push((key, totals));
                false
            }
        }
    }

    pub fn remove(&mut self, key: &AccountKey) -> Option<Totals> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn get(&self, key: &AccountKey) -> Option<&Totals> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, t)| t)
    }

    pub fn contains(&self, key: &AccountKey) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &AccountKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum over every member.
    pub fn total(&self) -> Result<Totals, AccrualError> {
        self.entries
            .iter()
            .try_fold(Totals::default(), |acc, (_, t)| acc.checked_merge(t))
    }
}
