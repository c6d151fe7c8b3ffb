use crate::domain::wallet::{Balance, WalletId};
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct BalanceRow {
    wallet: WalletId,
    balance: Balance,
}

/// Writes wallet balances as CSV with the header `wallet,balance`.
pub struct BalanceWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> BalanceWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    /// Writes every balance, ordered by wallet id so output is deterministic.
    pub fn write_balances(&mut self, mut balances: Vec<(WalletId, Balance)>) -> Result<()> {
        balances.sort_by_key(|(wallet, _)| *wallet);
        for (wallet, balance) in balances {
            self.writer.serialize(BalanceRow { wallet, balance })?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
