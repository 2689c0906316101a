//! Stake accrual: the deterministic kernel of hexwatch.
//!
//! Given immutable stake records and the contract's packed daily data, this
//! crate derives every stake's status and accrued interest:
//!
//! `interest(stake, [a, b)) = Σ_{d ∈ [a, b)} stake_shares × payout_d / shares_d`
//!
//! with truncating 256-bit integer division, exactly as the contract pays out.
//!
//! This crate handles:
//! - Unpacking daily-data words into payout, shares and sats lanes
//! - Decoding the contract's global info words
//! - Classifying a stake into one of five lifecycle states
//! - Summing pro-rata payouts over full and trailing windows, plus Big Pay Day
//! - Canonical stake ordering and merging of stake sets
//!
//! Every function is pure: identical inputs always give identical outputs.

pub mod daily_data;
pub mod engine;
pub mod error;
pub mod global_info;
pub mod ordering;
pub mod payout;
pub mod stake;
pub mod status;

pub use daily_data::{decode_daily_data, DailyData, DailyDataSeries};
pub use engine::AccrualEngine;
pub use error::AccrualError;
pub use global_info::GlobalInfo;
pub use ordering::{merge_stakes, sort_stakes, StakeKey};
pub use payout::{compute_interest, BigPayDayPool, InterestWindow, Payout, WindowedInterest};
pub use stake::Stake;
pub use status::{classify, StakeStatus};
