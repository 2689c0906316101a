//! Error types shared across crates.

use thiserror::Error;

/// Errors raised while parsing or constructing fundamental types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid account address: {0}")]
    InvalidAddress(String),

    #[error("invalid 256-bit integer: {0}")]
    InvalidInteger(String),

    #[error("unknown chain: {0}")]
    UnknownChain(String),
}

/// Errors surfaced by a [`ChainSource`](crate::ChainSource) implementation.
///
/// These belong to the collaborator that talks to a chain node. The engine
/// never retries them; the caller decides what to show.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    #[error("chain source unavailable: {0}")]
    Unavailable(String),

    #[error("{what} not found on {chain}")]
    NotFound { what: String, chain: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}
