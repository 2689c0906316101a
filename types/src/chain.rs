//! Chain identifier.

use crate::error::TypesError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which chain a stake or account lives on.
///
/// PulseChain forked Ethereum with the staking contract's full state, so both
/// chains run the same contract and share its constants; everything in the
/// engine is parameterised by this value rather than duplicated per chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Chain {
    Ethereum,
    Pulsechain,
}

impl Chain {
    pub const ALL: [Chain; 2] = [Chain::Ethereum, Chain::Pulsechain];

    /// Human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ethereum => "ethereum",
            Self::Pulsechain => "pulsechain",
        }
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Chain {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ethereum" | "eth" => Ok(Self::Ethereum),
            "pulsechain" | "pls" => Ok(Self::Pulsechain),
            _ => Err(TypesError::UnknownChain(s.to_string())),
        }
    }
}
