//! 256-bit unsigned integer mirroring the contract's `uint256`.
//!
//! Human-readable formats (JSON, TOML) carry it as a decimal string so
//! consumers never lose precision; deserialization there also accepts
//! `0x`-prefixed hex strings and plain numbers, which is what chain tooling
//! usually emits. Binary formats carry the four little-endian limbs.

use crate::error::TypesError;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uint::construct_uint;

construct_uint! {
    /// 256-bit unsigned integer used for every on-chain quantity.
    pub struct U256(4);
}

impl U256 {
    /// Parse a decimal or `0x`-prefixed hexadecimal string.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        let trimmed = raw.trim();
        let parsed = match trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
        {
            Some(hex_digits) => Self::from_str_radix(hex_digits, 16).ok(),
            None => Self::from_dec_str(trimmed).ok(),
        };
        parsed.ok_or_else(|| TypesError::InvalidInteger(raw.to_string()))
    }

    /// Lossy conversion to `f64`, for ratios only.
    pub fn to_f64_lossy(&self) -> f64 {
        self.0
            .iter()
            .rev()
            .fold(0.0, |acc, limb| acc * 18_446_744_073_709_551_616.0 + *limb as f64)
    }

    /// A mask with the low `bits` bits set.
    pub fn low_mask(bits: usize) -> Self {
        if bits >= 256 {
            Self::MAX
        } else {
            (Self::one() << bits) - Self::one()
        }
    }
}

impl Serialize for U256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            self.0.serialize(serializer)
        }
    }
}

impl<'de> Deserialize<'de> for U256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            deserializer.deserialize_any(U256Visitor)
        } else {
            <[u64; 4]>::deserialize(deserializer).map(U256)
        }
    }
}

struct U256Visitor;

impl<'de> Visitor<'de> for U256Visitor {
    type Value = U256;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal or 0x-prefixed hex string, or an unsigned integer")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<U256, E> {
        Ok(U256::from(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<U256, E> {
        u64::try_from(v)
            .map(U256::from)
            .map_err(|_| E::custom(format!("negative value {v} for U256")))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<U256, E> {
        U256::parse(v).map_err(E::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_decimal_and_hex() {
        assert_eq!(U256::parse("1000").unwrap(), U256::from(1000u64));
        assert_eq!(U256::parse("0xff").unwrap(), U256::from(255u64));
        assert_eq!(U256::parse(" 42 ").unwrap(), U256::from(42u64));
        assert!(U256::parse("not a number").is_err());
        assert!(U256::parse("-1").is_err());
    }

    #[test]
    fn low_mask_widths() {
        assert_eq!(U256::low_mask(0), U256::zero());
        assert_eq!(U256::low_mask(8), U256::from(255u64));
        assert_eq!(U256::low_mask(72), (U256::one() << 72usize) - U256::one());
        assert_eq!(U256::low_mask(256), U256::MAX);
    }

    #[test]
    fn to_f64_lossy_matches_small_values() {
        assert_eq!(U256::from(123_456u64).to_f64_lossy(), 123_456.0);
        let big = U256::one() << 64usize;
        assert_eq!(big.to_f64_lossy(), 18_446_744_073_709_551_616.0);
    }

    #[test]
    fn json_uses_decimal_strings() {
        let value = U256::MAX;
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, format!("\"{}\"", value));
        let back: U256 = serde_json::from_str(&json).unwrap();
        assert_eq!(back, value);

        let from_number: U256 = serde_json::from_str("7").unwrap();
        assert_eq!(from_number, U256::from(7u64));
        let from_hex: U256 = serde_json::from_str("\"0x10\"").unwrap();
        assert_eq!(from_hex, U256::from(16u64));
    }

    #[test]
    fn bincode_uses_limbs() {
        let value = (U256::one() << 200usize) + U256::from(9u64);
        let bytes = bincode::serialize(&value).unwrap();
        assert_eq!(bytes.len(), 32);
        let back: U256 = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, value);
    }
}
