//! Network-wide parameters from the contract's `globalInfo()`.

use crate::error::AccrualError;
use hexwatch_types::{Day, Hearts, Shares, U256};
use serde::{Deserialize, Serialize};

/// Number of leading words every `globalInfo()` response carries.
const REQUIRED_WORDS: usize = 10;

/// Decoded global info. Read-only to stakes; refreshed independently of them.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalInfo {
    pub locked_hearts_total: Hearts,
    pub next_stake_shares_total: Shares,
    pub share_rate: U256,
    pub stake_penalty_total: Hearts,
    pub daily_data_count: Day,
    pub stake_shares_total: Shares,
    pub latest_stake_id: U256,
    pub unclaimed_satoshis_total: U256,
    pub claimed_satoshis_total: U256,
    pub claimed_btc_addr_count: U256,
    pub timestamp: Option<u64>,
    pub total_supply: Option<Hearts>,
}

impl GlobalInfo {
    /// Decode the word array in contract order.
    pub fn from_words(words: &[U256]) -> Result<Self, AccrualError> {
        if words.len() < REQUIRED_WORDS {
            return Err(AccrualError::Configuration(format!(
                "global info needs at least {REQUIRED_WORDS} words, got {}",
                words.len()
            )));
        }
        Ok(Self {
            locked_hearts_total: Hearts::new(words[0]),
            next_stake_shares_total: Shares::new(words[1]),
            share_rate: words[2],
            stake_penalty_total: Hearts::new(words[3]),
            daily_data_count: word_to_day(words[4])?,
            stake_shares_total: Shares::new(words[5]),
            latest_stake_id: words[6],
            unclaimed_satoshis_total: words[7],
            claimed_satoshis_total: words[8],
            claimed_btc_addr_count: words[9],
            timestamp: words
                .get(10)
                .map(|w| if w.bits() > 64 { u64::MAX } else { w.low_u64() }),
            total_supply: words.get(11).copied().map(Hearts::new),
        })
    }
}

fn word_to_day(word: U256) -> Result<Day, AccrualError> {
    if word > U256::from(Day::MAX) {
        return Err(AccrualError::Configuration(format!(
            "day count {word} does not fit a day index"
        )));
    }
    Ok(word.low_u32())
}
