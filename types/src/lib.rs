//! Fundamental types for hexwatch.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! the 256-bit integer substrate, hearts and shares amounts, protocol days and
//! timestamps, chains, account addresses, protocol constants, the raw records
//! returned by a chain node, and the [`ChainSource`] trait that fetches them.

pub mod address;
pub mod amount;
pub mod chain;
pub mod error;
pub mod params;
pub mod records;
pub mod source;
pub mod time;
pub mod u256;

pub use address::{AccountAddress, AccountKey};
pub use amount::{Hearts, Shares};
pub use chain::Chain;
pub use error::{SourceError, TypesError};
pub use params::ProtocolConstants;
pub use records::StakeRecord;
pub use source::ChainSource;
pub use time::{Day, Timestamp};
pub use u256::U256;
