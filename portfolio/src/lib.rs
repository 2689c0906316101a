//! Account portfolio for hexwatch.
//!
//! Folds derived stakes into per-account totals and a favorites rollup, and
//! owns the single mutable store the rest of the application reads from.
//!
//! The store is single-writer: every update is an explicit method call
//! keyed by [`AccountKey`](hexwatch_types::AccountKey), and a lookup for an
//! account that is not registered is an error, never a silent no-op.

pub mod account;
pub mod config;
pub mod error;
pub mod refresh;
pub mod snapshot;
pub mod store;
pub mod totals;

pub use account::{Account, AccountData};
pub use config::PortfolioConfig;
pub use error::PortfolioError;
pub use refresh::{refresh_chain, RefreshReport};
pub use store::{ChainState, PortfolioStore};
pub use totals::{aggregate, GroupTotals, Totals};
