use hexwatch_accrual::AccrualError;
use hexwatch_types::{AccountKey, Chain, SourceError, TypesError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PortfolioError {
    #[error("account {0} is not registered")]
    AccountNotFound(AccountKey),

    #[error("current day for {0} is not known yet")]
    CurrentDayUnknown(Chain),

    #[error("accrual error: {0}")]
    Accrual(#[from] AccrualError),

    #[error("chain source error: {0}")]
    Source(#[from] SourceError),

    #[error("invalid value: {0}")]
    Types(#[from] TypesError),

    #[error("config error: {0}")]
    Config(String),

    #[error("snapshot error: {0}")]
    Snapshot(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
