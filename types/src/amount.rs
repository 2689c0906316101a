//! Token amount types for hearts and shares.
//!
//! Both are 256-bit unsigned integers to mirror on-chain precision. Hearts are
//! the smallest unit of the staked token (1 HEX = 10^8 hearts); shares are the
//! weight a stake carries in the daily pro-rata payout.

use crate::u256::U256;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of hearts in one whole token.
pub const HEARTS_PER_HEX: u64 = 100_000_000;

/// A hearts amount: principal, interest, payout or balance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Hearts(U256);

impl Hearts {
    pub const ZERO: Self = Self(U256([0; 4]));

    pub fn new(raw: U256) -> Self {
        Self(raw)
    }

    pub fn from_u64(raw: u64) -> Self {
        Self(U256::from(raw))
    }

    /// Whole tokens expressed in hearts.
    pub fn from_hex(units: u64) -> Self {
        Self(U256::from(units) * U256::from(HEARTS_PER_HEX))
    }

    pub fn raw(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Ratio `self / other` as a float; zero when `other` is zero.
    pub fn ratio(&self, other: Hearts) -> f64 {
        if other.is_zero() {
            return 0.0;
        }
        self.0.to_f64_lossy() / other.0.to_f64_lossy()
    }
}

impl From<u64> for Hearts {
    fn from(raw: u64) -> Self {
        Self::from_u64(raw)
    }
}

impl fmt::Display for Hearts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} hearts", self.0)
    }
}

/// A stake's share weight, or a network-wide share total.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Shares(U256);

impl Shares {
    pub const ZERO: Self = Self(U256([0; 4]));

    pub fn new(raw: U256) -> Self {
        Self(raw)
    }

    pub fn from_u64(raw: u64) -> Self {
        Self(U256::from(raw))
    }

    pub fn raw(&self) -> U256 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }
}

impl From<u64> for Shares {
    fn from(raw: u64) -> Self {
        Self::from_u64(raw)
    }
}

impl fmt::Display for Shares {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} shares", self.0)
    }
}
