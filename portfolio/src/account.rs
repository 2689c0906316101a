//! Tracked accounts and their derived state.

use crate::totals::Totals;
use hexwatch_accrual::Stake;
use hexwatch_types::{AccountAddress, AccountKey, Chain, Day, Hearts};
use serde::{Deserialize, Serialize};

/// An address the user follows on one chain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub address: AccountAddress,
    pub chain: Chain,
    pub name: String,
    pub is_favorite: bool,
}

impl Account {
    pub fn new(address: AccountAddress, chain: Chain, name: impl Into<String>) -> Self {
        Self {
            address,
            chain,
            name: name.into(),
            is_favorite: false,
        }
    }

    pub fn favorite(mut self) -> Self {
        self.is_favorite = true;
        self
    }

    pub fn key(&self) -> AccountKey {
        AccountKey::new(self.address.clone(), self.chain)
    }
}

/// Everything the store knows about one account.
///
/// `stakes` holds one entry per stake identity in canonical order; `total`
/// is always the aggregate of `stakes` plus `liquid_balance`. After a
/// failed fetch `last_error` is set and the previous stakes stay in place.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AccountData {
    pub account: Account,
    pub stakes: Vec<Stake>,
    pub total: Totals,
    pub liquid_balance: Hearts,
    pub loading: bool,
    pub last_error: Option<String>,
    /// Current day the stakes were last derived against.
    pub last_refreshed_day: Option<Day>,
}

impl AccountData {
    pub fn new(account: Account) -> Self {
        Self {
            account,
            stakes: Vec::new(),
            total: Totals::default(),
            liquid_balance: Hearts::ZERO,
            loading: false,
            last_error: None,
            last_refreshed_day: None,
        }
    }

    pub fn key(&self) -> AccountKey {
        self.account.key()
    }

    /// True when the account has derived data but the last fetch failed.
    pub fn is_stale(&self) -> bool {
        self.last_error.is_some() && self.last_refreshed_day.is_some()
    }
}
