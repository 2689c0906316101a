//! A [`ChainSource`] backed by a JSON chain snapshot file.
//!
//! ```json
//! {
//!   "chains": {
//!     "pulsechain": {
//!       "currentDay": 1500,
//!       "globalInfo": ["0", "..."],
//!       "dailyData": ["0x...", "..."],
//!       "accounts": {
//!         "0xabc...": { "balance": "12345", "stakes": [ { "stakeId": "1", ... } ] }
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! `dailyData[d]` is the packed word for day `d`. Integers may be decimal or
//! `0x` hex strings.

use anyhow::Context;
use hexwatch_types::{AccountAddress, Chain, ChainSource, Day, Hearts, SourceError, StakeRecord, U256};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSnapshot {
    #[serde(default)]
    chains: BTreeMap<String, RawChain>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawChain {
    current_day: Option<Day>,
    #[serde(default)]
    global_info: Vec<U256>,
    #[serde(default)]
    daily_data: Vec<U256>,
    #[serde(default)]
    accounts: BTreeMap<String, RawAccount>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAccount {
    #[serde(default)]
    balance: Hearts,
    #[serde(default)]
    stakes: Vec<StakeRecord>,
}

struct ChainData {
    current_day: Option<Day>,
    global_info: Vec<U256>,
    daily_data: Vec<U256>,
    accounts: BTreeMap<AccountAddress, RawAccount>,
}

/// Chain state read once from a snapshot file.
pub struct SnapshotSource {
    chains: BTreeMap<Chain, ChainData>,
}

impl SnapshotSource {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read chain snapshot {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("invalid chain snapshot {}", path.display()))
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        let raw: RawSnapshot = serde_json::from_str(content)?;
        let mut chains = BTreeMap::new();
        for (name, chain) in raw.chains {
            let id: Chain = name.parse()?;
            let mut accounts = BTreeMap::new();
            for (address, account) in chain.accounts {
                accounts.insert(AccountAddress::parse(&address)?, account);
            }
            chains.insert(
                id,
                ChainData {
                    current_day: chain.current_day,
                    global_info: chain.global_info,
                    daily_data: chain.daily_data,
                    accounts,
                },
            );
        }
        Ok(Self { chains })
    }

    /// Every address the snapshot lists on `chain`.
    pub fn addresses(&self, chain: Chain) -> Vec<AccountAddress> {
        self.chains
            .get(&chain)
            .map(|c| c.accounts.keys().cloned().collect())
            .unwrap_or_default()
    }

    fn chain(&self, chain: Chain) -> Result<&ChainData, SourceError> {
        self.chains.get(&chain).ok_or_else(|| SourceError::NotFound {
            what: "chain".to_string(),
            chain: chain.to_string(),
        })
    }

    fn account(&self, address: &AccountAddress, chain: Chain) -> Result<&RawAccount, SourceError> {
        self.chain(chain)?
            .accounts
            .get(address)
            .ok_or_else(|| SourceError::NotFound {
                what: format!("account {address}"),
                chain: chain.to_string(),
            })
    }
}

impl ChainSource for SnapshotSource {
    fn stakes(&self, address: &AccountAddress, chain: Chain) -> Result<Vec<StakeRecord>, SourceError> {
        Ok(self.account(address, chain)?.stakes.clone())
    }

    fn daily_data_range(&self, chain: Chain, begin: Day, end: Day) -> Result<Vec<U256>, SourceError> {
        let words = &self.chain(chain)?.daily_data;
        words
            .get(begin as usize..end as usize)
            .map(<[U256]>::to_vec)
            .ok_or_else(|| {
                SourceError::Malformed(format!(
                    "snapshot holds {} days of daily data, {begin}..{end} requested",
                    words.len()
                ))
            })
    }

    fn current_day(&self, chain: Chain) -> Result<Day, SourceError> {
        self.chain(chain)?.current_day.ok_or_else(|| SourceError::NotFound {
            what: "current day".to_string(),
            chain: chain.to_string(),
        })
    }

    fn global_info(&self, chain: Chain) -> Result<Vec<U256>, SourceError> {
        Ok(self.chain(chain)?.global_info.clone())
    }

    fn balance(&self, address: &AccountAddress, chain: Chain) -> Result<Hearts, SourceError> {
        Ok(self.account(address, chain)?.balance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "chains": {
            "pls": {
                "currentDay": 3,
                "dailyData": ["1", "2", "0x3"],
                "accounts": {
                    "0x00000000000000000000000000000000000000AA": {
                        "balance": "500",
                        "stakes": [{
                            "stakeId": "7",
                            "stakedHearts": "1000",
                            "stakeShares": "10",
                            "lockedDay": 0,
                            "stakedDays": 30
                        }]
                    }
                }
            }
        }
    }"#;

    fn address() -> AccountAddress {
        AccountAddress::parse("0x00000000000000000000000000000000000000aa").unwrap()
    }

    #[test]
    fn reads_chain_and_accounts() {
        let source = SnapshotSource::from_json(SNAPSHOT).unwrap();
        assert_eq!(source.current_day(Chain::Pulsechain).unwrap(), 3);
        assert_eq!(source.addresses(Chain::Pulsechain), vec![address()]);
        assert_eq!(source.balance(&address(), Chain::Pulsechain).unwrap(), Hearts::from_u64(500));
        let stakes = source.stakes(&address(), Chain::Pulsechain).unwrap();
        assert_eq!(stakes[0].stake_id, U256::from(7u64));
        assert_eq!(stakes[0].unlocked_day, 0);
        assert_eq!(
            source.daily_data_range(Chain::Pulsechain, 1, 3).unwrap(),
            vec![U256::from(2u64), U256::from(3u64)]
        );
    }

    #[test]
    fn missing_chain_is_not_found() {
        let source = SnapshotSource::from_json(SNAPSHOT).unwrap();
        assert!(matches!(source.current_day(Chain::Ethereum), Err(SourceError::NotFound { .. })));
    }

    #[test]
    fn out_of_range_daily_data_is_malformed() {
        let source = SnapshotSource::from_json(SNAPSHOT).unwrap();
        assert!(matches!(
            source.daily_data_range(Chain::Pulsechain, 0, 10),
            Err(SourceError::Malformed(_))
        ));
    }

    #[test]
    fn unknown_chain_name_is_rejected() {
        assert!(SnapshotSource::from_json(r#"{"chains": {"solana": {}}}"#).is_err());
    }

    #[test]
    fn missing_file_has_context() {
        let err = SnapshotSource::from_file(Path::new("/nonexistent/chain.json"))
            .err()
            .unwrap();
        assert!(err.to_string().contains("/nonexistent/chain.json"));
    }
}
