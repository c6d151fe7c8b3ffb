use crate::domain::ports::BalanceStore;
use crate::domain::wallet::{Balance, WalletId};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory balance store.
///
/// Uses `Arc<RwLock<HashMap<WalletId, Balance>>>` so clones share the same data.
/// Ideal for testing or runs where persistence is not required.
#[derive(Default, Clone)]
pub struct InMemoryBalanceStore {
    balances: Arc<RwLock<HashMap<WalletId, Balance>>>,
}

impl InMemoryBalanceStore {
    /// Creates a new, empty in-memory balance store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BalanceStore for InMemoryBalanceStore {
    async fn store(&self, wallet: WalletId, balance: Balance) -> Result<()> {
        let mut balances = self.balances.write().await;
        balances.insert(wallet, balance);
        Ok(())
    }

    async fn get(&self, wallet: WalletId) -> Result<Option<Balance>> {
        let balances = self.balances.read().await;
        Ok(balances.get(&wallet).copied())
    }

    async fn all_balances(&self) -> Result<Vec<(WalletId, Balance)>> {
        let balances = self.balances.read().await;
        Ok(balances.iter().map(|(w, b)| (*w, *b)).collect())
    }
}
