//! Refresh pipeline: pull raw values from a [`ChainSource`] into the store.

use crate::error::PortfolioError;
use crate::store::PortfolioStore;
use hexwatch_accrual::{decode_daily_data, GlobalInfo};
use hexwatch_types::{AccountKey, Chain, ChainSource, Day};
use serde::Serialize;
use tracing::{info, warn};

/// Outcome of one [`refresh_chain`] pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    pub chain: Chain,
    pub current_day: Day,
    pub refreshed: Vec<AccountKey>,
    pub failed: Vec<AccountKey>,
    /// Chain-wide fetches (global info, daily data) that failed.
    pub chain_errors: Vec<String>,
}

impl RefreshReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.chain_errors.is_empty()
    }
}

/// Refresh everything the store tracks on `chain`.
///
/// Only a failure to learn the current day aborts the pass. Every other
/// failure is recorded (on the account, or in the report for chain-wide
/// data) and the previous values stay in the store.
pub fn refresh_chain(
    store: &mut PortfolioStore,
    source: &dyn ChainSource,
    chain: Chain,
) -> Result<RefreshReport, PortfolioError> {
    let current_day = source.current_day(chain)?;
    store.set_current_day(chain, current_day)?;
    let mut report = RefreshReport {
        chain,
        current_day,
        refreshed: Vec::new(),
        failed: Vec::new(),
        chain_errors: Vec::new(),
    };

    let global = source
        .global_info(chain)
        .map_err(PortfolioError::from)
        .and_then(|words| Ok(GlobalInfo::from_words(&words)?))
        .and_then(|global| store.set_global_info(chain, global));
    if let Err(e) = global {
        warn!(%chain, error = %e, "global info fetch failed");
        report.chain_errors.push(format!("global info: {e}"));
    }

    let known = store.chain(chain);
    let begin = known
        .filter(|s| !s.daily_data.is_empty())
        .map_or(0, |s| s.daily_data.end());
    // The contract only stores days that have been closed out.
    let end = known
        .and_then(|s| s.global_info.as_ref())
        .map_or(current_day, |g| current_day.min(g.daily_data_count));
    if begin < end {
        let daily = source
            .daily_data_range(chain, begin, end)
            .map_err(PortfolioError::from)
            .and_then(|words| Ok(decode_daily_data(&words, begin, end)?))
            .and_then(|series| store.apply_daily_data(chain, series));
        if let Err(e) = daily {
            warn!(%chain, begin, end, error = %e, "daily data fetch failed");
            report.chain_errors.push(format!("daily data {begin}..{end}: {e}"));
        }
    }

    for key in store.account_keys(chain) {
        store.mark_loading(&key)?;
        match refresh_account(store, source, &key) {
            Ok(()) => report.refreshed.push(key),
            Err(e) => {
                store.record_failure(&key, &e)?;
                report.failed.push(key);
            }
        }
    }

    info!(
        %chain,
        current_day,
        refreshed = report.refreshed.len(),
        failed = report.failed.len(),
        chain_errors = report.chain_errors.len(),
        "refresh finished"
    );
    Ok(report)
}

fn refresh_account(
    store: &mut PortfolioStore,
    source: &dyn ChainSource,
    key: &AccountKey,
) -> Result<(), PortfolioError> {
    let records = source.stakes(&key.address, key.chain)?;
    let balance = source.balance(&key.address, key.chain)?;
    store.apply_stake_list(key, &records)?;
    store.apply_balance(key, balance)
}
