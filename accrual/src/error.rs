//! Accrual-specific errors.

use hexwatch_types::Day;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccrualError {
    /// Input the engine cannot interpret: zero-length stakes, packed data
    /// whose length disagrees with its day range, truncated global info.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("arithmetic overflow in accrual computation")]
    ArithmeticOverflow,

    #[error("no daily data for day {day} (decoded range {begin}..{end})")]
    MissingDailyData { day: Day, begin: Day, end: Day },
}
