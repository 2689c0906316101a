//! The chain-access collaborator.
//!
//! Implementations talk to a chain node (or a file, or a test double) and
//! hand back raw contract values. Nothing here decodes or derives; that is
//! the accrual engine's job.

use crate::address::AccountAddress;
use crate::amount::Hearts;
use crate::chain::Chain;
use crate::error::SourceError;
use crate::records::StakeRecord;
use crate::time::Day;
use crate::u256::U256;

pub trait ChainSource {
    /// All stakes currently listed for `address`.
    fn stakes(&self, address: &AccountAddress, chain: Chain) -> Result<Vec<StakeRecord>, SourceError>;

    /// Packed daily-data words for days `[begin, end)`.
    fn daily_data_range(&self, chain: Chain, begin: Day, end: Day) -> Result<Vec<U256>, SourceError>;

    /// The contract's current day.
    fn current_day(&self, chain: Chain) -> Result<Day, SourceError>;

    /// The raw word array returned by the contract's `globalInfo()`.
    fn global_info(&self, chain: Chain) -> Result<Vec<U256>, SourceError>;

    /// Liquid (unstaked) balance of `address`.
    fn balance(&self, address: &AccountAddress, chain: Chain) -> Result<Hearts, SourceError>;
}
