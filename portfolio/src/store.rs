//! The single-writer portfolio store.

use crate::account::{Account, AccountData};
use crate::error::PortfolioError;
use crate::totals::{aggregate, GroupTotals, Totals};
use hexwatch_accrual::{merge_stakes, AccrualEngine, AccrualError, DailyDataSeries, GlobalInfo, Stake, StakeKey};
use hexwatch_types::{AccountKey, Chain, Day, Hearts, ProtocolConstants, StakeRecord};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{debug, info, warn};

/// What the store knows about one chain.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChainState {
    pub current_day: Option<Day>,
    pub global_info: Option<GlobalInfo>,
    pub daily_data: DailyDataSeries,
}

/// Accounts, per-chain state and the favorites rollup.
///
/// All mutation goes through `&mut self` methods keyed by [`AccountKey`].
/// Every update derives the new values first and only then writes them, so
/// a failing update leaves the store exactly as it was.
#[derive(Clone, Debug, Default)]
pub struct PortfolioStore {
    pub(crate) accounts: BTreeMap<AccountKey, AccountData>,
    pub(crate) chains: BTreeMap<Chain, ChainState>,
    pub(crate) engines: BTreeMap<Chain, AccrualEngine>,
    pub(crate) favorites: GroupTotals,
}

impl PortfolioStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `constants` for every later derivation on `chain`.
    pub fn set_constants(&mut self, chain: Chain, constants: ProtocolConstants) {
        self.engines.insert(chain, AccrualEngine::new(chain, constants));
    }

    pub fn engine(&self, chain: Chain) -> AccrualEngine {
        self.engines
            .get(&chain)
            .cloned()
            .unwrap_or_else(|| AccrualEngine::for_chain(chain))
    }

    // ── Accounts ────────────────────────────────────────────────────────

    /// Start tracking `account`. Re-registering updates its name and
    /// favorite flag and keeps the derived data. Returns true if new.
    pub fn register_account(&mut self, account: Account) -> bool {
        let key = account.key();
        let added = match self.accounts.get_mut(&key) {
            Some(data) => {
                data.account = account;
                false
            }
            None => {
                info!(account = %key, "registered account");
                self.accounts.insert(key.clone(), AccountData::new(account));
                true
            }
        };
        self.sync_favorite(&key);
        added
    }

    pub fn remove_account(&mut self, key: &AccountKey) -> Result<AccountData, PortfolioError> {
        let data = self
            .accounts
            .remove(key)
            .ok_or_else(|| PortfolioError::AccountNotFound(key.clone()))?;
        self.favorites.remove(key);
        info!(account = %key, "removed account");
        Ok(data)
    }

    pub fn account(&self, key: &AccountKey) -> Result<&AccountData, PortfolioError> {
        self.accounts
            .get(key)
            .ok_or_else(|| PortfolioError::AccountNotFound(key.clone()))
    }

    fn account_mut(&mut self, key: &AccountKey) -> Result<&mut AccountData, PortfolioError> {
        self.accounts
            .get_mut(key)
            .ok_or_else(|| PortfolioError::AccountNotFound(key.clone()))
    }

    /// Every account, ordered by key.
    pub fn accounts(&self) -> impl Iterator<Item = &AccountData> {
        self.accounts.values()
    }

    pub fn account_keys(&self, chain: Chain) -> Vec<AccountKey> {
        self.accounts.keys().filter(|k| k.chain == chain).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn set_favorite(&mut self, key: &AccountKey, favorite: bool) -> Result<(), PortfolioError> {
        self.account_mut(key)?.account.is_favorite = favorite;
        self.sync_favorite(key);
        Ok(())
    }

    pub fn favorites(&self) -> &GroupTotals {
        &self.favorites
    }

    pub fn favorites_total(&self) -> Result<Totals, PortfolioError> {
        Ok(self.favorites.total()?)
    }

    fn sync_favorite(&mut self, key: &AccountKey) {
        match self.accounts.get(key) {
            Some(data) if data.account.is_favorite => {
                self.favorites.upsert(key.clone(), data.total.clone());
            }
            _ => {
                self.favorites.remove(key);
            }
        }
    }

    // ── Chain state ─────────────────────────────────────────────────────

    pub fn chain(&self, chain: Chain) -> Option<&ChainState> {
        self.chains.get(&chain)
    }

    pub fn current_day(&self, chain: Chain) -> Option<Day> {
        self.chains.get(&chain).and_then(|s| s.current_day)
    }

    /// Move `chain` to a new current day, re-deriving every account on it.
    /// Returns the accounts that changed; the same day again is a no-op.
    pub fn set_current_day(&mut self, chain: Chain, day: Day) -> Result<Vec<AccountKey>, PortfolioError> {
        if self.current_day(chain) == Some(day) {
            return Ok(Vec::new());
        }
        let mut state = self.chains.get(&chain).cloned().unwrap_or_default();
        state.current_day = Some(day);
        let updates = self.recompute_chain(chain, &state, true)?;
        self.chains.insert(chain, state);
        info!(%chain, current_day = day, accounts = updates.len(), "current day advanced");
        Ok(self.commit(updates, day))
    }

    pub fn set_global_info(&mut self, chain: Chain, global: GlobalInfo) -> Result<Vec<AccountKey>, PortfolioError> {
        let mut state = self.chains.get(&chain).cloned().unwrap_or_default();
        state.global_info = Some(global);
        let updates = self.recompute_chain(chain, &state, false)?;
        let day = state.current_day;
        self.chains.insert(chain, state);
        debug!(%chain, accounts = updates.len(), "applied global info");
        Ok(match day {
            Some(day) => self.commit(updates, day),
            None => Vec::new(),
        })
    }

    /// Merge newly fetched daily data into the chain's series and re-accrue.
    ///
    /// A range covering the known one replaces it. A range overlapping or
    /// touching it contributes the days on either side; known days win
    /// where both have data. A range leaving a gap is rejected.
    pub fn apply_daily_data(&mut self, chain: Chain, series: DailyDataSeries) -> Result<Vec<AccountKey>, PortfolioError> {
        let mut state = self.chains.get(&chain).cloned().unwrap_or_default();
        let known = &state.daily_data;
        if known.is_empty() || (series.begin() <= known.begin() && series.end() >= known.end()) {
            state.daily_data = series;
        } else if series.begin() > known.end() || series.end() < known.begin() {
            return Err(AccrualError::Configuration(format!(
                "daily data range {}..{} leaves a gap next to {}..{}",
                series.begin(),
                series.end(),
                known.begin(),
                known.end()
            ))
            .into());
        } else {
            let (begin, end) = (known.begin(), known.end());
            let head = series.iter().filter(|(day, _)| *day < begin).map(|(_, data)| *data).collect();
            let tail = series.iter().filter(|(day, _)| *day >= end).map(|(_, data)| *data).collect();
            let mut merged = DailyDataSeries::new(series.begin().min(begin), head);
            merged.append(known.clone())?;
            merged.append(DailyDataSeries::new(end, tail))?;
            state.daily_data = merged;
        }
        let updates = self.recompute_chain(chain, &state, false)?;
        let day = state.current_day;
        debug!(
            %chain,
            begin = state.daily_data.begin(),
            end = state.daily_data.end(),
            "applied daily data"
        );
        self.chains.insert(chain, state);
        Ok(match day {
            Some(day) => self.commit(updates, day),
            None => Vec::new(),
        })
    }

    // ── Per-account updates ─────────────────────────────────────────────

    pub fn mark_loading(&mut self, key: &AccountKey) -> Result<(), PortfolioError> {
        self.account_mut(key)?.loading = true;
        Ok(())
    }

    /// Replace an account's stakes with a freshly fetched list.
    ///
    /// The list is authoritative: stakes missing from it are dropped. Stakes
    /// present in both keep any interest accrued through a later day.
    pub fn apply_stake_list(&mut self, key: &AccountKey, records: &[StakeRecord]) -> Result<(), PortfolioError> {
        let data = self.account(key)?;
        let chain = key.chain;
        let state = self.chains.get(&chain).cloned().unwrap_or_default();
        let day = state.current_day.ok_or(PortfolioError::CurrentDayUnknown(chain))?;
        let engine = self.engine(chain);

        let incoming = engine.derive_stakes(records, day)?;
        let fetched: BTreeSet<StakeKey> = incoming.iter().map(Stake::key).collect();
        let known = data
            .stakes
            .iter()
            .filter(|s| fetched.contains(&s.key()))
            .cloned()
            .collect();
        let merged = merge_stakes(known, incoming);
        let (stakes, total) = rebuild(&engine, &state, merged, data.liquid_balance)?;

        let data = self.account_mut(key)?;
        data.stakes = stakes;
        data.total = total;
        data.loading = false;
        data.last_error = None;
        data.last_refreshed_day = Some(day);
        info!(account = %key, stakes = data.stakes.len(), current_day = day, "applied stake list");
        self.sync_favorite(key);
        Ok(())
    }

    pub fn apply_balance(&mut self, key: &AccountKey, balance: Hearts) -> Result<(), PortfolioError> {
        let data = self.account_mut(key)?;
        data.liquid_balance = balance;
        data.total.liquid_hearts = balance;
        self.sync_favorite(key);
        Ok(())
    }

    /// Note a failed fetch. Previously derived stakes and totals stay.
    pub fn record_failure(&mut self, key: &AccountKey, error: impl fmt::Display) -> Result<(), PortfolioError> {
        let data = self.account_mut(key)?;
        let message = error.to_string();
        warn!(account = %key, error = %message, "fetch failed, keeping last good state");
        data.loading = false;
        data.last_error = Some(message);
        Ok(())
    }

    // ── Internals ───────────────────────────────────────────────────────

    fn recompute_chain(
        &self,
        chain: Chain,
        state: &ChainState,
        rederive: bool,
    ) -> Result<Vec<(AccountKey, Vec<Stake>, Totals)>, PortfolioError> {
        let Some(day) = state.current_day else {
            return Ok(Vec::new());
        };
        let engine = self.engine(chain);
        let mut updates = Vec::new();
        for (key, data) in self.accounts.iter().filter(|(k, _)| k.chain == chain) {
            if data.stakes.is_empty() {
                continue;
            }
            let stakes = if rederive {
                data.stakes
                    .iter()
                    .map(|s| engine.rederive(s, day))
                    .collect::<Result<Vec<_>, _>>()?
            } else {
                data.stakes.clone()
            };
            let (stakes, total) = rebuild(&engine, state, stakes, data.liquid_balance)?;
            updates.push((key.clone(), stakes, total));
        }
        Ok(updates)
    }

    fn commit(&mut self, updates: Vec<(AccountKey, Vec<Stake>, Totals)>, day: Day) -> Vec<AccountKey> {
        let mut keys = Vec::with_capacity(updates.len());
        for (key, stakes, total) in updates {
            if let Some(data) = self.accounts.get_mut(&key) {
                data.stakes = stakes;
                data.total = total;
                data.last_refreshed_day = Some(day);
            }
            self.sync_favorite(&key);
            keys.push(key);
        }
        keys
    }
}

/// Accrue `stakes` against the chain's daily data (when any) and total them.
fn rebuild(
    engine: &AccrualEngine,
    state: &ChainState,
    stakes: Vec<Stake>,
    liquid: Hearts,
) -> Result<(Vec<Stake>, Totals), PortfolioError> {
    let stakes = match state.current_day {
        Some(day) if !state.daily_data.is_empty() => {
            engine.accrue_all(&stakes, &state.daily_data, state.global_info.as_ref(), day)?
        }
        _ => stakes,
    };
    let mut total = aggregate(&stakes)?;
    total.liquid_hearts = liquid;
    Ok((stakes, total))
}
