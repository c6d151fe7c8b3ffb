#![allow(dead_code)]

use async_trait::async_trait;
use std::fs::File;
use std::io::Error;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use wallet_lanes::domain::ports::BalanceStore;
use wallet_lanes::domain::wallet::{Balance, WalletId};
use wallet_lanes::error::{Result, WalletError};
use wallet_lanes::infrastructure::in_memory::InMemoryBalanceStore;

pub const W1: &str = "00000000-0000-4000-8000-000000000001";
pub const W2: &str = "00000000-0000-4000-8000-000000000002";
pub const W3: &str = "00000000-0000-4000-8000-000000000003";
pub const W4: &str = "00000000-0000-4000-8000-000000000004";
pub const W9: &str = "00000000-0000-4000-8000-000000000009";

pub fn wallet(id: &str) -> WalletId {
    id.parse().expect("valid wallet id")
}

pub fn write_seeds(path: &Path, seeds: &[(&str, &str)]) -> std::result::Result<(), Error> {
    let mut wtr = csv::Writer::from_writer(File::create(path)?);
    wtr.write_record(["wallet", "balance"])?;
    for (wallet, balance) in seeds {
        wtr.write_record([*wallet, *balance])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_requests(path: &Path, rows: &[[&str; 3]]) -> std::result::Result<(), Error> {
    let mut wtr = csv::Writer::from_writer(File::create(path)?);
    wtr.write_record(["wallet", "operation", "amount"])?;
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Writes `wallets` seeds of 0.00 and `rows` deposits of 1.00 spread round-robin
/// over them. Wallet ids are `00000000-0000-4000-8000-{index:012}`.
pub fn generate_load(
    seeds: &Path,
    requests: &Path,
    wallets: usize,
    rows: usize,
) -> std::result::Result<(), Error> {
    let ids: Vec<String> = (0..wallets)
        .map(|i| format!("00000000-0000-4000-8000-{i:012}"))
        .collect();

    let mut wtr = csv::Writer::from_writer(File::create(seeds)?);
    wtr.write_record(["wallet", "balance"])?;
    for id in &ids {
        wtr.write_record([id.as_str(), "0.00"])?;
    }
    wtr.flush()?;

    let mut wtr = csv::Writer::from_writer(File::create(requests)?);
    wtr.write_record(["wallet", "operation", "amount"])?;
    for i in 0..rows {
        wtr.write_record([ids[i % wallets].as_str(), "DEPOSIT", "1.00"])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Balance store that can freeze writes for one wallet while every other wallet
/// keeps going.
pub struct StallingStore {
    pub inner: InMemoryBalanceStore,
    pub stalled: WalletId,
    pub gate: Semaphore,
}

impl StallingStore {
    pub fn new(inner: InMemoryBalanceStore, stalled: WalletId) -> Arc<Self> {
        Arc::new(Self {
            inner,
            stalled,
            gate: Semaphore::new(0),
        })
    }

    pub fn release(&self) {
        self.gate.add_permits(Semaphore::MAX_PERMITS / 2);
    }
}

#[async_trait]
impl BalanceStore for StallingStore {
    async fn store(&self, wallet: WalletId, balance: Balance) -> Result<()> {
        if wallet == self.stalled {
            self.gate
                .acquire()
                .await
                .map_err(WalletError::storage)?
                .forget();
        }
        self.inner.store(wallet, balance).await
    }

    async fn get(&self, wallet: WalletId) -> Result<Option<Balance>> {
        self.inner.get(wallet).await
    }

    async fn all_balances(&self) -> Result<Vec<(WalletId, Balance)>> {
        self.inner.all_balances().await
    }
}
