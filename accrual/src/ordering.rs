//! Canonical stake ordering and merging.
//!
//! Stakes sort by `(served day, stake id)`: maturity first, the immutable id
//! breaking ties so the order is total and repeatable.

use crate::stake::Stake;
use hexwatch_types::{Chain, U256};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identity of a stake across chains.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StakeKey {
    pub chain: Chain,
    pub stake_id: U256,
}

impl StakeKey {
    pub fn new(chain: Chain, stake_id: U256) -> Self {
        Self { chain, stake_id }
    }
}

/// Sort key: served day, then stake id, then chain.
pub fn order_key(stake: &Stake) -> (u64, U256, Chain) {
    let served = u64::from(stake.locked_day) + u64::from(stake.staked_days);
    (served, stake.stake_id, stake.chain)
}

/// Sort into canonical order. Idempotent.
pub fn sort_stakes(stakes: &mut [Stake]) {
    stakes.sort_by_key(order_key);
}

/// Union two stake sets, one record per identity, in canonical order.
///
/// On a clash the incoming record wins, since it carries the freshest chain
/// fields (an unlock day, say). Interest figures come from whichever copy
/// was accrued through the later day, so a freshly fetched stake does not
/// blank out interest computed earlier.
pub fn merge_stakes(known: Vec<Stake>, incoming: Vec<Stake>) -> Vec<Stake> {
    let mut merged: BTreeMap<StakeKey, Stake> = known.into_iter().map(|s| (s.key(), s)).collect();
    for mut stake in incoming {
        if let Some(previous) = merged.get(&stake.key()) {
            if previous.accrued_through > stake.accrued_through {
                stake.carry_accrual_from(previous);
            }
        }
        merged.insert(stake.key(), stake);
    }
    let mut stakes: Vec<Stake> = merged.into_values().collect();
    sort_stakes(&mut stakes);
    stakes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stake::test_support::stake;
    use hexwatch_types::Hearts;

    fn ids(stakes: &[Stake]) -> Vec<u64> {
        stakes.iter().map(|s| s.stake_id.low_u64()).collect()
    }

    #[test]
    fn sorts_by_maturity_then_id() {
        let mut stakes = vec![stake(3, 0, 100), stake(1, 50, 100), stake(2, 0, 100)];
        sort_stakes(&mut stakes);
        assert_eq!(ids(&stakes), vec![2, 3, 1]);
    }

    #[test]
    fn sorting_is_idempotent() {
        let mut stakes = vec![stake(9, 5, 5), stake(4, 0, 10), stake(7, 1, 1)];
        sort_stakes(&mut stakes);
        let once = stakes.clone();
        sort_stakes(&mut stakes);
        assert_eq!(stakes, once);
    }

    #[test]
    fn merge_deduplicates_by_identity() {
        let known = vec![stake(1, 0, 10), stake(2, 0, 20)];
        let incoming = vec![stake(2, 0, 20), stake(3, 0, 5)];
        let merged = merge_stakes(known, incoming);
        assert_eq!(ids(&merged), vec![3, 1, 2]);
    }

    #[test]
    fn merge_keeps_later_accrual() {
        let mut accrued = stake(1, 0, 10);
        accrued.interest_hearts = Hearts::from_u64(77);
        accrued.accrued_through = Some(8);
        let mut fresh = stake(1, 0, 10);
        fresh.unlocked_day = 9;

        let merged = merge_stakes(vec![accrued.clone()], vec![fresh]);
        assert_eq!(merged.len(), 1);
        assert_eq!(merged[0].unlocked_day, 9);
        assert_eq!(merged[0].interest_hearts, Hearts::from_u64(77));

        let mut newer = stake(1, 0, 10);
        newer.interest_hearts = Hearts::from_u64(80);
        newer.accrued_through = Some(9);
        let merged = merge_stakes(vec![accrued], vec![newer]);
        assert_eq!(merged[0].interest_hearts, Hearts::from_u64(80));
    }

    #[test]
    fn same_id_on_two_chains_are_distinct() {
        let eth = stake(1, 0, 10);
        let mut pls = stake(1, 0, 10);
        pls.chain = Chain::Pulsechain;
        let merged = merge_stakes(vec![eth], vec![pls]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].chain, Chain::Ethereum);
    }
}
