use super::wallet::{Balance, WalletId};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Durable mapping from wallet id to its current balance.
///
/// Implementations only need per-key read-after-write consistency: every wallet
/// has a single writer, the lane worker that owns it.
#[async_trait]
pub trait BalanceStore: Send + Sync {
    async fn store(&self, wallet: WalletId, balance: Balance) -> Result<()>;
    async fn get(&self, wallet: WalletId) -> Result<Option<Balance>>;
    async fn all_balances(&self) -> Result<Vec<(WalletId, Balance)>>;
}

pub type BalanceStoreRef = Arc<dyn BalanceStore>;
