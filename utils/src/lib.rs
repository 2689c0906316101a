//! Shared utilities for hexwatch.

pub mod logging;

pub use logging::{init_logging, LogFormat, LoggingError};
