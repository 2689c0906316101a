//! Nullable chain source: scripted answers instead of RPC calls.

use hexwatch_types::{AccountAddress, Chain, ChainSource, Day, Hearts, SourceError, StakeRecord, U256};
use std::cell::RefCell;
use std::collections::HashMap;

/// One kind of request a [`NullChainSource`] can answer (or fail).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Call {
    CurrentDay(Chain),
    GlobalInfo(Chain),
    DailyData { chain: Chain, begin: Day, end: Day },
    Stakes(AccountAddress, Chain),
    Balance(AccountAddress, Chain),
}

impl Call {
    /// Failure slot for this call. Daily-data calls fail per chain, whatever the range.
    fn slot(&self) -> Call {
        match self {
            Call::DailyData { chain, .. } => Call::DailyData {
                chain: *chain,
                begin: 0,
                end: 0,
            },
            other => other.clone(),
        }
    }
}

#[derive(Default)]
struct ChainScript {
    current_day: Option<Day>,
    global_info: Vec<U256>,
    /// Packed words from day 0.
    daily_data: Vec<U256>,
}

/// A test chain source with programmable contract state.
#[derive(Default)]
pub struct NullChainSource {
    chains: RefCell<HashMap<Chain, ChainScript>>,
    stakes: RefCell<HashMap<(AccountAddress, Chain), Vec<StakeRecord>>>,
    balances: RefCell<HashMap<(AccountAddress, Chain), Hearts>>,
    failures: RefCell<HashMap<Call, SourceError>>,
    calls: RefCell<Vec<Call>>,
}

impl NullChainSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_current_day(&self, chain: Chain, day: Day) {
        self.chains.borrow_mut().entry(chain).or_default().current_day = Some(day);
    }

    pub fn set_global_info(&self, chain: Chain, words: Vec<U256>) {
        self.chains.borrow_mut().entry(chain).or_default().global_info = words;
    }

    /// Replace the chain's daily data; `words[d]` is day `d`.
    pub fn set_daily_data(&self, chain: Chain, words: Vec<U256>) {
        self.chains.borrow_mut().entry(chain).or_default().daily_data = words;
    }

    pub fn push_daily_data(&self, chain: Chain, word: U256) {
        self.chains.borrow_mut().entry(chain).or_default().daily_data.push(word);
    }

    pub fn set_stakes(&self, address: &AccountAddress, chain: Chain, stakes: Vec<StakeRecord>) {
        self.stakes.borrow_mut().insert((address.clone(), chain), stakes);
    }

    pub fn set_balance(&self, address: &AccountAddress, chain: Chain, balance: Hearts) {
        self.balances.borrow_mut().insert((address.clone(), chain), balance);
    }

    /// Make every later `call` fail with `error` until [`NullChainSource::heal`].
    pub fn fail(&self, call: Call, error: SourceError) {
        self.failures.borrow_mut().insert(call.slot(), error);
    }

    pub fn heal(&self, call: &Call) {
        self.failures.borrow_mut().remove(&call.slot());
    }

    /// Every call made so far, in order (for assertions).
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Clear the call log.
    pub fn reset_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    fn record(&self, call: Call) -> Result<(), SourceError> {
        let failure = self.failures.borrow().get(&call.slot()).cloned();
        self.calls.borrow_mut().push(call);
        match failure {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

fn not_found(what: impl Into<String>, chain: Chain) -> SourceError {
    SourceError::NotFound {
        what: what.into(),
        chain: chain.to_string(),
    }
}

impl ChainSource for NullChainSource {
    fn stakes(&self, address: &AccountAddress, chain: Chain) -> Result<Vec<StakeRecord>, SourceError> {
        self.record(Call::Stakes(address.clone(), chain))?;
        Ok(self
            .stakes
            .borrow()
            .get(&(address.clone(), chain))
            .cloned()
            .unwrap_or_default())
    }

    fn daily_data_range(&self, chain: Chain, begin: Day, end: Day) -> Result<Vec<U256>, SourceError> {
        self.record(Call::DailyData { chain, begin, end })?;
        let chains = self.chains.borrow();
        let words = chains.get(&chain).map(|c| c.daily_data.as_slice()).unwrap_or(&[]);
        words
            .get(begin as usize..end as usize)
            .map(<[U256]>::to_vec)
            .ok_or_else(|| not_found(format!("daily data {begin}..{end}"), chain))
    }

    fn current_day(&self, chain: Chain) -> Result<Day, SourceError> {
        self.record(Call::CurrentDay(chain))?;
        self.chains
            .borrow()
            .get(&chain)
            .and_then(|c| c.current_day)
            .ok_or_else(|| not_found("current day", chain))
    }

    fn global_info(&self, chain: Chain) -> Result<Vec<U256>, SourceError> {
        self.record(Call::GlobalInfo(chain))?;
        self.chains
            .borrow()
            .get(&chain)
            .filter(|c| !c.global_info.is_empty())
            .map(|c| c.global_info.clone())
            .ok_or_else(|| not_found("global info", chain))
    }

    fn balance(&self, address: &AccountAddress, chain: Chain) -> Result<Hearts, SourceError> {
        self.record(Call::Balance(address.clone(), chain))?;
        Ok(self
            .balances
            .borrow()
            .get(&(address.clone(), chain))
            .copied()
            .unwrap_or(Hearts::ZERO))
    }
}
