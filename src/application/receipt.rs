use crate::domain::wallet::{Balance, WalletId};
use crate::error::{Result, WalletError};
use tokio::sync::oneshot;

/// Proof that a request was ordered into its wallet's lane.
///
/// Being accepted does not mean being applied. Await [`Receipt::settled`] for the
/// authoritative outcome, or drop the receipt if the outcome does not matter.
#[derive(Debug)]
pub struct Receipt {
    wallet: WalletId,
    outcome: oneshot::Receiver<Result<Balance>>,
}

impl Receipt {
    pub(crate) fn new(wallet: WalletId) -> (Self, oneshot::Sender<Result<Balance>>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                wallet,
                outcome: rx,
            },
            tx,
        )
    }

    pub fn wallet(&self) -> WalletId {
        self.wallet
    }

    /// Waits until the lane worker has handled the request.
    ///
    /// Returns the balance right after the request was applied, or the error the
    /// worker hit while applying it.
    pub async fn settled(self) -> Result<Balance> {
        self.outcome
            .await
            .unwrap_or(Err(WalletError::LaneClosed(self.wallet)))
    }
}
