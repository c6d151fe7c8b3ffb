use crate::domain::wallet::{Balance, WalletId};
use rust_decimal::Decimal;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, WalletError>;

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("wallet {0} not found")]
    WalletNotFound(WalletId),
    #[error("insufficient funds on wallet {wallet}: balance {balance}, requested {requested}")]
    InsufficientFunds {
        wallet: WalletId,
        balance: Balance,
        requested: Decimal,
    },
    #[error("deposit would overflow the balance of wallet {0}")]
    BalanceOverflow(WalletId),
    #[error("unsupported operation type: {0}")]
    InvalidOperation(String),
    #[error("malformed request: {}", .0.join("; "))]
    MalformedRequest(Vec<String>),
    #[error("wallet engine is shutting down")]
    ShuttingDown,
    #[error("lane for wallet {0} closed before the request was applied")]
    LaneClosed(WalletId),
    #[error("storage error: {0}")]
    Storage(Box<dyn std::error::Error + Send + Sync>),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WalletError {
    pub fn storage<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Storage(err.into())
    }
}
