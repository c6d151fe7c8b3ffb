use crate::domain::ports::BalanceStore;
use crate::domain::wallet::{Balance, WalletId};
use crate::error::{Result, WalletError};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options};
use std::path::Path;
use std::sync::Arc;

/// Column Family for storing wallet balances.
pub const CF_BALANCES: &str = "balances";

/// A persistent balance store implementation using RocksDB.
///
/// Balances live in their own Column Family, keyed by the 16 raw bytes of the
/// wallet id and encoded as JSON decimal strings so no precision is lost.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// # Arguments
    ///
    /// * `path` - The filesystem path where the database will be stored.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_balances = ColumnFamilyDescriptor::new(CF_BALANCES, Options::default());
        let db = DB::open_cf_descriptors(&opts, path, vec![cf_balances])
            .map_err(WalletError::storage)?;

        Ok(Self { db: Arc::new(db) })
    }

    fn balances(&self) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(CF_BALANCES)
            .ok_or_else(|| WalletError::storage("balances column family not found"))
    }
}

#[async_trait]
impl BalanceStore for RocksDBStore {
    async fn store(&self, wallet: WalletId, balance: Balance) -> Result<()> {
        let cf = self.balances()?;
        let value = serde_json::to_vec(&balance).map_err(WalletError::storage)?;
        self.db
            .put_cf(cf, wallet.as_bytes(), value)
            .map_err(WalletError::storage)
    }

    async fn get(&self, wallet: WalletId) -> Result<Option<Balance>> {
        let cf = self.balances()?;
        match self.db.get_cf(cf, wallet.as_bytes()).map_err(WalletError::storage)? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(WalletError::storage),
            None => Ok(None),
        }
    }

    async fn all_balances(&self) -> Result<Vec<(WalletId, Balance)>> {
        let cf = self.balances()?;
        let mut balances = Vec::new();

        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (key, value) = item.map_err(WalletError::storage)?;
            let wallet = WalletId::from_slice(&key).ok_or_else(|| {
                WalletError::storage(format!("invalid wallet key of {} bytes", key.len()))
            })?;
            let balance = serde_json::from_slice(&value).map_err(WalletError::storage)?;
            balances.push((wallet, balance));
        }

        Ok(balances)
    }
}
