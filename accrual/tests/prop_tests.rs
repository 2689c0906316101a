use proptest::prelude::*;

use hexwatch_accrual::daily_data::{decode_daily_data, DailyData, DailyDataSeries};
use hexwatch_accrual::status::{classify_days, percent_complete};
use hexwatch_accrual::{compute_interest, sort_stakes, AccrualEngine, StakeStatus};
use hexwatch_types::{Chain, Day, Hearts, Shares, StakeRecord, U256};

fn series_from(days: &[(u64, u64)]) -> DailyDataSeries {
    let packed: Vec<U256> = days
        .iter()
        .map(|&(payout, shares)| {
            DailyData {
                payout: Hearts::from_u64(payout),
                shares: Shares::from_u64(shares),
                sats: U256::zero(),
            }
            .encode()
            .unwrap()
        })
        .collect();
    decode_daily_data(&packed, 0, days.len() as Day).unwrap()
}

fn record(id: u64, locked_day: Day, staked_days: Day, unlocked_day: Day) -> StakeRecord {
    StakeRecord {
        stake_id: U256::from(id),
        staked_hearts: Hearts::from_u64(1_000),
        stake_shares: Shares::from_u64(10),
        locked_day,
        staked_days,
        unlocked_day,
        is_auto_stake: false,
    }
}

proptest! {
    /// Interest over [a, b) equals interest over [a, m) plus [m, b).
    #[test]
    fn interest_is_range_additive(
        days in prop::collection::vec((0u64..1_000_000_000, 0u64..1_000_000), 1..60),
        stake_shares in 0u64..1_000_000,
        cuts in (0usize..60, 0usize..60, 0usize..60),
    ) {
        let series = series_from(&days);
        let mut points = [cuts.0 % (days.len() + 1), cuts.1 % (days.len() + 1), cuts.2 % (days.len() + 1)];
        points.sort_unstable();
        let [a, m, b] = points.map(|p| p as Day);
        let shares = Shares::from_u64(stake_shares);

        let whole = compute_interest(shares, &series, a, b, None).unwrap().payout;
        let left = compute_interest(shares, &series, a, m, None).unwrap().payout;
        let right = compute_interest(shares, &series, m, b, None).unwrap().payout;
        prop_assert_eq!(Some(whole), left.checked_add(right));
    }

    /// A day with zero total shares contributes exactly zero and never errors.
    #[test]
    fn zero_share_days_contribute_zero(
        payouts in prop::collection::vec(0u64..u64::MAX, 1..30),
        stake_shares in 0u64..u64::MAX,
    ) {
        let days: Vec<(u64, u64)> = payouts.iter().map(|&p| (p, 0)).collect();
        let series = series_from(&days);
        let payout = compute_interest(Shares::from_u64(stake_shares), &series, 0, days.len() as Day, None).unwrap();
        prop_assert!(payout.payout.is_zero());
    }

    /// Interest never exceeds the payout total: a stake cannot own more than all shares.
    #[test]
    fn interest_bounded_by_total_payout(
        days in prop::collection::vec((0u64..1_000_000_000, 1u64..1_000_000), 1..40),
        fraction_pct in 0u64..=100,
    ) {
        let series = series_from(&days);
        let min_shares = days.iter().map(|d| d.1).min().unwrap();
        let stake_shares = min_shares * fraction_pct / 100;
        let payout = compute_interest(Shares::from_u64(stake_shares), &series, 0, days.len() as Day, None).unwrap();
        let total: u64 = days.iter().map(|d| d.0).sum();
        prop_assert!(payout.payout <= Hearts::from_u64(total));
    }

    /// Every (locked, staked, unlocked, current) maps to exactly one status.
    #[test]
    fn classifier_is_total(
        locked in 0u32..10_000,
        staked in 1u32..6_000,
        unlocked in 0u32..20_000,
        current in 0u32..20_000,
        grace in 0u32..30,
    ) {
        let status = classify_days(locked, staked, unlocked, current, grace);
        prop_assert!(status.is_ok());
        let served = locked + staked;
        let expected_bleeding = unlocked == 0 && current > served + grace;
        prop_assert_eq!(status.unwrap() == StakeStatus::Bleeding, expected_bleeding);
    }

    /// percent_complete stays in [0, 1] for any current day.
    #[test]
    fn percent_complete_clamped(
        locked in 0u32..10_000,
        staked in 1u32..6_000,
        current in 0u32..u32::MAX,
    ) {
        let p = percent_complete(locked, staked, current).unwrap();
        prop_assert!((0.0..=1.0).contains(&p));
    }

    /// served_days is exactly locked_day + staked_days.
    #[test]
    fn served_days_invariant(
        locked in 0u32..100_000,
        staked in 1u32..6_000,
        current in 0u32..200_000,
    ) {
        let engine = AccrualEngine::for_chain(Chain::Ethereum);
        let stake = engine.derive_stake(&record(1, locked, staked, 0), current).unwrap();
        prop_assert_eq!(stake.served_days, locked + staked);
    }

    /// Sorting is deterministic: sorting a shuffled copy gives the same order.
    #[test]
    fn ordering_is_total_and_stable(
        stakes in prop::collection::vec((0u64..50, 0u32..100, 1u32..100), 0..40),
        seed in 0usize..1000,
    ) {
        let engine = AccrualEngine::for_chain(Chain::Ethereum);
        let records: Vec<StakeRecord> = stakes
            .iter()
            .enumerate()
            .map(|(i, &(_, locked, staked))| record(i as u64, locked, staked, 0))
            .collect();
        let derived: Vec<_> = records.iter().map(|r| engine.derive_stake(r, 50).unwrap()).collect();

        let mut sorted = derived.clone();
        sort_stakes(&mut sorted);
        let mut rotated = derived;
        if !rotated.is_empty() {
            let k = seed % rotated.len();
            rotated.rotate_left(k);
        }
        sort_stakes(&mut rotated);
        prop_assert_eq!(&sorted, &rotated);

        for pair in sorted.windows(2) {
            let a = (pair[0].served_days, pair[0].stake_id);
            let b = (pair[1].served_days, pair[1].stake_id);
            prop_assert!(a < b);
        }
    }
}
