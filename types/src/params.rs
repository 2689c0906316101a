//! Protocol constants mirrored from the staking contract.
//!
//! The packing widths and bonus-pool figures must match the contract
//! bit-for-bit. Only the grace period and minimum penalty days are exposed as
//! configuration, because they feed display classification rather than the
//! contract's own arithmetic.

use crate::chain::Chain;
use crate::time::{Day, Timestamp};
use crate::u256::U256;
use serde::{Deserialize, Serialize};

/// Width of the payout and shares lanes in a packed daily-data word.
pub const HEARTS_UINT_SHIFT: usize = 72;

/// Width of the sats lane in a packed daily-data word.
pub const SATS_UINT_SHIFT: usize = 56;

/// Launch of the contract: 2019-12-03T00:00:00Z.
pub const LAUNCH_TIMESTAMP_SECS: u64 = 1_575_331_200;

/// Days after a stake's term during which ending it carries no penalty.
pub const GRACE_PERIOD: Day = 14;

/// Floor on the number of days' payout an early-ending stake forfeits.
pub const EARLY_PENALTY_MIN_DAYS: Day = 90;

/// The day whose unclaimed-satoshi pool was distributed to open stakes.
pub const BIG_PAY_DAY: Day = 352;

pub const HEARTS_PER_SATOSHI: u64 = 10_000;
pub const CLAIMABLE_BTC_ADDR_COUNT: u64 = 27_997_742;
pub const CLAIMABLE_SATOSHIS_TOTAL: u64 = 910_087_996_911_001;

/// Constants needed by the decoder, classifier and calculator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolConstants {
    pub grace_period_days: Day,
    pub early_penalty_min_days: Day,
    pub big_pay_day: Day,
    pub launch: Timestamp,
    pub hearts_per_satoshi: u64,
    pub claimable_btc_addr_count: u64,
    pub claimable_satoshis_total: u64,
}

impl ProtocolConstants {
    /// Constants for a given chain. Both chains run the same contract.
    pub fn for_chain(_chain: Chain) -> Self {
        Self::default()
    }

    /// Mask selecting one hearts-width lane of a packed daily-data word.
    pub fn hearts_mask() -> U256 {
        U256::low_mask(HEARTS_UINT_SHIFT)
    }

    /// Mask selecting the sats lane of a packed daily-data word.
    pub fn sats_mask() -> U256 {
        U256::low_mask(SATS_UINT_SHIFT)
    }

    /// Calendar start of a protocol day.
    pub fn day_start(&self, day: Day) -> Timestamp {
        self.launch.add_days(day)
    }

    /// Protocol day containing `now`.
    pub fn day_at(&self, now: Timestamp) -> Day {
        self.launch.days_until(now)
    }
}

impl Default for ProtocolConstants {
    fn default() -> Self {
        Self {
            grace_period_days: GRACE_PERIOD,
            early_penalty_min_days: EARLY_PENALTY_MIN_DAYS,
            big_pay_day: BIG_PAY_DAY,
            launch: Timestamp::new(LAUNCH_TIMESTAMP_SECS),
            hearts_per_satoshi: HEARTS_PER_SATOSHI,
            claimable_btc_addr_count: CLAIMABLE_BTC_ADDR_COUNT,
            claimable_satoshis_total: CLAIMABLE_SATOSHIS_TOTAL,
        }
    }
}
