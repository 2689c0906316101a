//! Daily data decoding.
//!
//! The contract stores one packed word per day:
//!
//! ```text
//! | sats (56 bits) | shares (72 bits) | payout (72 bits) |
//! ```
//!
//! `payout` is the day's total hearts paid to stakers, `shares` the total
//! stake shares outstanding that day, `sats` the unclaimed satoshi total.

use crate::error::AccrualError;
use hexwatch_types::params::{HEARTS_UINT_SHIFT, SATS_UINT_SHIFT};
use hexwatch_types::{Day, Hearts, ProtocolConstants, Shares, U256};
use serde::{Deserialize, Serialize};

/// One decoded day of network-wide payout data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyData {
    pub payout: Hearts,
    pub shares: Shares,
    pub sats: U256,
}

impl DailyData {
    pub fn decode(packed: U256) -> Self {
        let hearts_mask = ProtocolConstants::hearts_mask();
        let mut word = packed;
        let payout = word & hearts_mask;
        word = word >> HEARTS_UINT_SHIFT;
        let shares = word & hearts_mask;
        word = word >> HEARTS_UINT_SHIFT;
        let sats = word & ProtocolConstants::sats_mask();
        Self {
            payout: Hearts::new(payout),
            shares: Shares::new(shares),
            sats,
        }
    }

    /// Pack back into a contract word. Fails if a field is wider than its lane.
    pub fn encode(&self) -> Result<U256, AccrualError> {
        let hearts_mask = ProtocolConstants::hearts_mask();
        if self.payout.raw() > hearts_mask {
            return Err(AccrualError::Configuration(format!(
                "payout {} exceeds the {HEARTS_UINT_SHIFT}-bit lane",
                self.payout.raw()
            )));
        }
        if self.shares.raw() > hearts_mask {
            return Err(AccrualError::Configuration(format!(
                "shares {} exceed the {HEARTS_UINT_SHIFT}-bit lane",
                self.shares.raw()
            )));
        }
        if self.sats > ProtocolConstants::sats_mask() {
            return Err(AccrualError::Configuration(format!(
                "sats {} exceed the {SATS_UINT_SHIFT}-bit lane",
                self.sats
            )));
        }
        let word = (self.sats << (2 * HEARTS_UINT_SHIFT))
            | (self.shares.raw() << HEARTS_UINT_SHIFT)
            | self.payout.raw();
        Ok(word)
    }
}

/// Decoded days addressed by absolute protocol day.
///
/// Covers `[begin, end)`; `day(d)` looks up protocol day `d`, not an offset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyDataSeries {
    begin: Day,
    days: Vec<DailyData>,
}

impl DailyDataSeries {
    pub fn new(begin: Day, days: Vec<DailyData>) -> Self {
        Self { begin, days }
    }

    pub fn begin(&self) -> Day {
        self.begin
    }

    /// Exclusive end of the covered range.
    pub fn end(&self) -> Day {
        let len = Day::try_from(self.days.len()).unwrap_or(Day::MAX);
        self.begin.saturating_add(len)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn get(&self, day: Day) -> Option<&DailyData> {
        let offset = day.checked_sub(self.begin)?;
        self.days.get(offset as usize)
    }

    /// Strict lookup: a day outside the decoded range is an error the caller
    /// can act on by fetching more data.
    pub fn day(&self, day: Day) -> Result<&DailyData, AccrualError> {
        self.get(day).ok_or(AccrualError::MissingDailyData {
            day,
            begin: self.begin,
            end: self.end(),
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (Day, &DailyData)> {
        (self.begin..).zip(self.days.iter())
    }

    /// Append a range that starts exactly where this one ends.
    pub fn append(&mut self, next: DailyDataSeries) -> Result<(), AccrualError> {
        if next.is_empty() {
            return Ok(());
        }
        if self.is_empty() {
            *self = next;
            return Ok(());
        }
        if next.begin != self.end() {
            return Err(AccrualError::Configuration(format!(
                "daily data range {}..{} does not continue {}..{}",
                next.begin,
                next.end(),
                self.begin,
                self.end()
            )));
        }
        self.days.extend(next.days);
        Ok(())
    }
}

/// Decode the packed words fetched for days `[begin, end)`.
pub fn decode_daily_data(packed: &[U256], begin: Day, end: Day) -> Result<DailyDataSeries, AccrualError> {
    if begin > end {
        return Err(AccrualError::Configuration(format!(
            "daily data range is inverted: {begin}..{end}"
        )));
    }
    let expected = (end - begin) as usize;
    if packed.len() != expected {
        return Err(AccrualError::Configuration(format!(
            "expected {expected} packed daily data words for {begin}..{end}, got {}",
            packed.len()
        )));
    }
    let days = packed.iter().copied().map(DailyData::decode).collect();
    Ok(DailyDataSeries::new(begin, days))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(payout: u64, shares: u64, sats: u64) -> DailyData {
        DailyData {
            payout: Hearts::from_u64(payout),
            shares: Shares::from_u64(shares),
            sats: U256::from(sats),
        }
    }

    #[test]
    fn decode_splits_lanes() {
        let packed = (U256::from(7u64) << 144usize) | (U256::from(100u64) << 72usize) | U256::from(1000u64);
        assert_eq!(DailyData::decode(packed), day(1000, 100, 7));
    }

    #[test]
    fn decode_masks_full_lanes() {
        let packed = U256::MAX;
        let decoded = DailyData::decode(packed);
        assert_eq!(decoded.payout.raw(), ProtocolConstants::hearts_mask());
        assert_eq!(decoded.shares.raw(), ProtocolConstants::hearts_mask());
        assert_eq!(decoded.sats, ProtocolConstants::sats_mask());
    }

    #[test]
    fn encode_inverts_decode() {
        let original = day(123_456_789, 987_654_321, 42);
        let packed = original.encode().unwrap();
        assert_eq!(DailyData::decode(packed), original);
    }

    #[test]
    fn encode_rejects_overwide_lane() {
        let mut wide = day(0, 0, 0);
        wide.payout = Hearts::new(U256::one() << 72usize);
        assert!(matches!(wide.encode(), Err(AccrualError::Configuration(_))));
    }

    #[test]
    fn series_is_addressed_by_absolute_day() {
        let packed: Vec<U256> = (0..3u64).map(|i| day(i, 10, 0).encode().unwrap()).collect();
        let series = decode_daily_data(&packed, 50, 53).unwrap();
        assert_eq!(series.begin(), 50);
        assert_eq!(series.end(), 53);
        assert_eq!(series.day(51).unwrap().payout, Hearts::from_u64(1));
        assert_eq!(
            series.day(53).unwrap_err(),
            AccrualError::MissingDailyData { day: 53, begin: 50, end: 53 }
        );
        assert!(series.get(49).is_none());
    }

    #[test]
    fn length_mismatch_is_configuration_error() {
        let packed = vec![U256::zero(); 2];
        assert!(matches!(
            decode_daily_data(&packed, 0, 3),
            Err(AccrualError::Configuration(_))
        ));
        assert!(matches!(
            decode_daily_data(&packed, 5, 3),
            Err(AccrualError::Configuration(_))
        ));
    }

    #[test]
    fn append_requires_contiguous_ranges() {
        let mut series = decode_daily_data(&[U256::zero(); 2], 0, 2).unwrap();
        let gap = decode_daily_data(&[U256::zero()], 3, 4).unwrap();
        assert!(series.append(gap).is_err());
        let next = decode_daily_data(&[U256::zero(); 3], 2, 5).unwrap();
        series.append(next).unwrap();
        assert_eq!(series.end(), 5);
        assert_eq!(series.iter().count(), 5);
    }
}
