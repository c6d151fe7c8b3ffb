use super::lane::LaneRegistry;
use super::receipt::Receipt;
use crate::config::EngineConfig;
use crate::domain::ports::BalanceStoreRef;
use crate::domain::request::{ChangeRequest, OperationType};
use crate::domain::wallet::{Balance, WalletId};
use crate::error::{Result, WalletError};
use tracing::debug;

/// The public entry point for balance changes and balance reads.
///
/// `WalletService` validates a request against the current balance snapshot and
/// hands it to the lane of its wallet. It never waits for the request to be
/// applied: changes to one wallet are serialized by that wallet's lane, while
/// changes to different wallets proceed independently.
pub struct WalletService {
    store: BalanceStoreRef,
    lanes: LaneRegistry,
    config: EngineConfig,
}

impl WalletService {
    /// Creates a new `WalletService` instance.
    ///
    /// # Arguments
    ///
    /// * `store` - The balance store shared with every lane worker.
    /// * `config` - Idle reclamation and shutdown settings for the lanes.
    pub fn new(store: BalanceStoreRef, config: EngineConfig) -> Self {
        Self {
            lanes: LaneRegistry::new(store.clone(), config),
            store,
            config,
        }
    }

    /// Orders a balance change for application.
    ///
    /// Withdrawals that the current snapshot obviously cannot cover are refused
    /// right away. That check is only a shortcut: the snapshot may be stale, and
    /// the lane re-checks against the live balance when the request is applied.
    /// The returned [`Receipt`] reports that authoritative outcome.
    ///
    /// # Errors
    ///
    /// * `WalletNotFound` - The wallet does not exist.
    /// * `InsufficientFunds` - A withdrawal exceeds the snapshot balance.
    /// * `ShuttingDown` - The service no longer accepts requests.
    pub async fn submit(&self, request: ChangeRequest) -> Result<Receipt> {
        let snapshot = self.balance(request.wallet).await?;

        if request.operation == OperationType::Withdraw && !snapshot.covers(request.amount) {
            debug!(
                wallet = %request.wallet,
                %snapshot,
                amount = %request.amount.value(),
                "withdrawal refused by pre-check"
            );
            return Err(request.insufficient_funds(snapshot));
        }

        self.lanes.get_or_create_lane(request.wallet)?.enqueue(request)
    }

    /// Reads the committed balance of `wallet`.
    ///
    /// Requests that were accepted but not yet applied are not reflected.
    pub async fn balance(&self, wallet: WalletId) -> Result<Balance> {
        self.store
            .get(wallet)
            .await?
            .ok_or(WalletError::WalletNotFound(wallet))
    }

    pub fn active_lanes(&self) -> usize {
        self.lanes.active_lanes()
    }

    /// Stops all lanes according to the configured shutdown policy.
    pub async fn shutdown(&self) {
        self.lanes.shutdown(self.config.shutdown_policy).await;
    }
}
