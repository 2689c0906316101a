//! Raw records as returned by the staking contract.

use crate::amount::{Hearts, Shares};
use crate::time::Day;
use crate::u256::U256;
use serde::{Deserialize, Serialize};

/// One entry of the contract's `stakeLists(address, index)`.
///
/// Every field is immutable once the stake exists, except `unlocked_day`,
/// which the contract sets when the stake is ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakeRecord {
    pub stake_id: U256,
    pub staked_hearts: Hearts,
    pub stake_shares: Shares,
    pub locked_day: Day,
    pub staked_days: Day,
    /// 0 while the stake has not been unlocked.
    #[serde(default)]
    pub unlocked_day: Day,
    #[serde(default)]
    pub is_auto_stake: bool,
}
