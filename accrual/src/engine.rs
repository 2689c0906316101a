//! Core accrual engine.

use crate::daily_data::DailyDataSeries;
use crate::error::AccrualError;
use crate::global_info::GlobalInfo;
use crate::ordering::{merge_stakes, sort_stakes};
use crate::payout::{accrual_range, compute_interest, BigPayDayPool, InterestWindow, WindowedInterest};
use crate::stake::Stake;
use crate::status::{classify, penalty_days, percent_complete};
use hexwatch_types::{Chain, Day, ProtocolConstants, StakeRecord};
use tracing::{debug, trace};

/// The accrual engine for one chain.
///
/// Holds only configuration; every method is a pure function of its
/// arguments and returns new values instead of mutating shared state, so the
/// same engine can be used from any number of threads.
#[derive(Clone, Debug)]
pub struct AccrualEngine {
    chain: Chain,
    constants: ProtocolConstants,
}

impl AccrualEngine {
    pub fn new(chain: Chain, constants: ProtocolConstants) -> Self {
        Self { chain, constants }
    }

    /// An engine with the contract's own constants for `chain`.
    pub fn for_chain(chain: Chain) -> Self {
        Self::new(chain, ProtocolConstants::for_chain(chain))
    }

    pub fn chain(&self) -> Chain {
        self.chain
    }

    pub fn constants(&self) -> &ProtocolConstants {
        &self.constants
    }

    /// Derive status, progress and dates for one record. Interest starts at
    /// zero until [`AccrualEngine::accrue`] runs.
    pub fn derive_stake(&self, record: &StakeRecord, current_day: Day) -> Result<Stake, AccrualError> {
        let status = classify(record, current_day, self.constants.grace_period_days)?;
        let percent_complete = percent_complete(record.locked_day, record.staked_days, current_day)?;
        let served_days = record
            .locked_day
            .checked_add(record.staked_days)
            .ok_or_else(|| {
                AccrualError::Configuration(format!(
                    "stake {} ends past the last representable day",
                    record.stake_id
                ))
            })?;
        Ok(Stake {
            chain: self.chain,
            stake_id: record.stake_id,
            staked_hearts: record.staked_hearts,
            stake_shares: record.stake_shares,
            locked_day: record.locked_day,
            staked_days: record.staked_days,
            unlocked_day: record.unlocked_day,
            is_auto_stake: record.is_auto_stake,
            penalty_days: penalty_days(record.staked_days, self.constants.early_penalty_min_days),
            served_days,
            percent_complete,
            status,
            start_date: self.constants.day_start(record.locked_day),
            end_date: self.constants.day_start(served_days),
            interest_hearts: Default::default(),
            interest_daily: WindowedInterest::default(),
            interest_weekly: WindowedInterest::default(),
            interest_monthly: WindowedInterest::default(),
            big_pay_day_hearts: None,
            accrued_through: None,
        })
    }

    /// Derive a fetched stake list: one stake per id, in canonical order.
    pub fn derive_stakes(&self, records: &[StakeRecord], current_day: Day) -> Result<Vec<Stake>, AccrualError> {
        let derived = records
            .iter()
            .map(|r| self.derive_stake(r, current_day))
            .collect::<Result<Vec<_>, _>>()?;
        let stakes = merge_stakes(Vec::new(), derived);
        debug!(
            chain = %self.chain,
            records = records.len(),
            stakes = stakes.len(),
            current_day,
            "derived stakes"
        );
        Ok(stakes)
    }

    /// Re-derive an already-derived stake for a new current day, keeping its interest.
    pub fn rederive(&self, stake: &Stake, current_day: Day) -> Result<Stake, AccrualError> {
        let record = StakeRecord {
            stake_id: stake.stake_id,
            staked_hearts: stake.staked_hearts,
            stake_shares: stake.stake_shares,
            locked_day: stake.locked_day,
            staked_days: stake.staked_days,
            unlocked_day: stake.unlocked_day,
            is_auto_stake: stake.is_auto_stake,
        };
        let mut fresh = self.derive_stake(&record, current_day)?;
        fresh.carry_accrual_from(stake);
        Ok(fresh)
    }

    /// Sum a stake's interest over its served range and the trailing windows.
    ///
    /// Interest runs over `[locked, min(served, current))`; each window ends
    /// at the same day and starts no earlier than `locked`. A stake that has
    /// not started yet accrues nothing.
    pub fn accrue(
        &self,
        stake: &Stake,
        daily: &DailyDataSeries,
        global: Option<&GlobalInfo>,
        current_day: Day,
    ) -> Result<Stake, AccrualError> {
        let mut accrued = stake.clone();
        let Some((begin, end)) = accrual_range(stake.locked_day, stake.staked_days, current_day) else {
            trace!(stake_id = %stake.stake_id, current_day, "stake not started, nothing to accrue");
            return Ok(accrued);
        };
        let pool = global.map(|g| BigPayDayPool::new(g, &self.constants));

        let total = compute_interest(stake.stake_shares, daily, begin, end, pool.as_ref())?;
        if total.missing_days > 0 {
            debug!(
                stake_id = %stake.stake_id,
                missing_days = total.missing_days,
                begin,
                end,
                series_begin = daily.begin(),
                series_end = daily.end(),
                "daily data does not cover the stake's range"
            );
        }
        accrued.interest_hearts = total.payout;
        accrued.big_pay_day_hearts = total.big_pay_day;

        for window in InterestWindow::ALL {
            let start = window.start(begin, end);
            let payout = compute_interest(stake.stake_shares, daily, start, end, None)?;
            let windowed = WindowedInterest {
                hearts: payout.payout,
                days: end - start,
            };
            match window {
                InterestWindow::Daily => accrued.interest_daily = windowed,
                InterestWindow::Weekly => accrued.interest_weekly = windowed,
                InterestWindow::Monthly => accrued.interest_monthly = windowed,
            }
        }
        accrued.accrued_through = Some(end);
        Ok(accrued)
    }

    /// [`AccrualEngine::accrue`] every stake, preserving canonical order.
    pub fn accrue_all(
        &self,
        stakes: &[Stake],
        daily: &DailyDataSeries,
        global: Option<&GlobalInfo>,
        current_day: Day,
    ) -> Result<Vec<Stake>, AccrualError> {
        let mut accrued = stakes
            .iter()
            .map(|s| self.accrue(s, daily, global, current_day))
            .collect::<Result<Vec<_>, _>>()?;
        sort_stakes(&mut accrued);
        debug!(chain = %self.chain, stakes = accrued.len(), current_day, "accrued stakes");
        Ok(accrued)
    }
}
