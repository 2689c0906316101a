//! Nullable infrastructure for deterministic testing.
//!
//! The only external dependency the portfolio has is the chain node, reached
//! through [`ChainSource`](hexwatch_types::ChainSource). This crate provides a
//! test-friendly implementation that:
//! - Returns exactly the values a test scripted
//! - Can be made to fail per call site
//! - Records every call for assertions
//! - Never touches the filesystem or network

pub mod chain_source;

pub use chain_source::{Call, NullChainSource};
