use crate::domain::wallet::{Balance, WalletId};
use crate::error::{Result, WalletError};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct SeedRow {
    wallet: WalletId,
    #[serde(with = "rust_decimal::serde::str")]
    balance: Decimal,
}

/// Reads the opening balances of wallets from a CSV source.
///
/// Expected header: `wallet, balance`. Balances keep the scale they were written
/// with, so `1000.00` stays `1000.00`.
pub struct SeedReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> SeedReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);
        Self { reader }
    }

    pub fn wallets(self) -> impl Iterator<Item = Result<(WalletId, Balance)>> {
        self.reader.into_deserialize().map(|result| {
            let row: SeedRow = result.map_err(WalletError::from)?;
            if row.balance.is_sign_negative() {
                return Err(WalletError::MalformedRequest(vec![format!(
                    "opening balance of wallet {} must not be negative",
                    row.wallet
                )]));
            }
            Ok((row.wallet, Balance::new(row.balance)))
        })
    }
}
