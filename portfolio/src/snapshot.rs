//! Binary snapshot of the store's last good state.

use crate::account::AccountData;
use crate::error::PortfolioError;
use crate::store::{ChainState, PortfolioStore};
use hexwatch_types::Chain;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Bumped whenever the snapshot layout changes.
const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Snapshot {
    version: u32,
    accounts: Vec<AccountData>,
    chains: BTreeMap<Chain, ChainState>,
}

impl PortfolioStore {
    pub fn to_snapshot_bytes(&self) -> Result<Vec<u8>, PortfolioError> {
        let snapshot = Snapshot {
            version: SNAPSHOT_VERSION,
            accounts: self.accounts.values().cloned().collect(),
            chains: self.chains.clone(),
        };
        bincode::serialize(&snapshot).map_err(|e| PortfolioError::Snapshot(e.to_string()))
    }

    /// Restore a store from [`PortfolioStore::to_snapshot_bytes`] output.
    ///
    /// Constants are not part of the snapshot; set them again with
    /// [`PortfolioStore::set_constants`]. In-flight loading flags are cleared.
    pub fn from_snapshot_bytes(bytes: &[u8]) -> Result<Self, PortfolioError> {
        let snapshot: Snapshot =
            bincode::deserialize(bytes).map_err(|e| PortfolioError::Snapshot(e.to_string()))?;
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(PortfolioError::Snapshot(format!(
                "unsupported snapshot version {} (expected {SNAPSHOT_VERSION})",
                snapshot.version
            )));
        }
        let mut store = PortfolioStore::new();
        store.chains = snapshot.chains;
        for mut data in snapshot.accounts {
            data.loading = false;
            let key = data.key();
            let favorite = data.account.is_favorite;
            if favorite {
                store.favorites.upsert(key.clone(), data.total.clone());
            }
            store.accounts.insert(key, data);
        }
        Ok(store)
    }

    pub fn save_snapshot(&self, path: impl AsRef<Path>) -> Result<(), PortfolioError> {
        let bytes = self.to_snapshot_bytes()?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!(path = %path.as_ref().display(), bytes = bytes.len(), "saved snapshot");
        Ok(())
    }

    pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Self, PortfolioError> {
        let bytes = std::fs::read(path.as_ref())?;
        Self::from_snapshot_bytes(&bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::Account;
    use hexwatch_accrual::{DailyData, DailyDataSeries};
    use hexwatch_types::{AccountAddress, Hearts, Shares, StakeRecord, U256};

    fn populated() -> PortfolioStore {
        let mut store = PortfolioStore::new();
        let address = AccountAddress::parse("0x00000000000000000000000000000000000000aa").unwrap();
        let account = Account::new(address, Chain::Ethereum, "main").favorite();
        let key = account.key();
        store.register_account(account);
        store.set_current_day(Chain::Ethereum, 10).unwrap();
        let day = DailyData {
            payout: Hearts::from_u64(1_000),
            shares: Shares::from_u64(100),
            sats: U256::zero(),
        };
        store
            .apply_daily_data(Chain::Ethereum, DailyDataSeries::new(0, vec![day; 10]))
            .unwrap();
        let record = StakeRecord {
            stake_id: U256::from(42u64),
            staked_hearts: Hearts::from_u64(5_000),
            stake_shares: Shares::from_u64(10),
            locked_day: 2,
            staked_days: 30,
            unlocked_day: 0,
            is_auto_stake: false,
        };
        store.apply_stake_list(&key, &[record]).unwrap();
        store.apply_balance(&key, Hearts::from_u64(9)).unwrap();
        store.mark_loading(&key).unwrap();
        store
    }

    #[test]
    fn restores_accounts_chains_and_favorites() {
        let store = populated();
        let bytes = store.to_snapshot_bytes().unwrap();
        let restored = PortfolioStore::from_snapshot_bytes(&bytes).unwrap();

        assert_eq!(restored.current_day(Chain::Ethereum), Some(10));
        assert_eq!(restored.chain(Chain::Ethereum), store.chain(Chain::Ethereum));
        let original = store.accounts().next().unwrap();
        let copy = restored.accounts().next().unwrap();
        assert_eq!(copy.stakes, original.stakes);
        assert_eq!(copy.total, original.total);
        assert!(!copy.loading);
        assert_eq!(restored.favorites(), store.favorites());
    }

    #[test]
    fn garbage_is_a_snapshot_error() {
        assert!(matches!(
            PortfolioStore::from_snapshot_bytes(&[1, 2, 3]),
            Err(PortfolioError::Snapshot(_))
        ));
    }

    #[test]
    fn round_trips_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio.bin");
        populated().save_snapshot(&path).unwrap();
        let restored = PortfolioStore::load_snapshot(&path).unwrap();
        assert_eq!(restored.len(), 1);
    }
}
