use super::lane::{Job, Lanes};
use crate::config::ShutdownPolicy;
use crate::domain::ports::BalanceStoreRef;
use crate::domain::request::ChangeRequest;
use crate::domain::wallet::{Balance, WalletId};
use crate::error::{Result, WalletError};
use std::sync::Weak;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, trace, warn};

enum Next {
    Job(Job),
    Idle,
    Closed,
    Shutdown(ShutdownPolicy),
}

/// Sole consumer of one wallet's lane.
///
/// Applies requests strictly in the order they were enqueued and sleeps on the
/// channel while the lane is empty. A failing request is reported through its
/// receipt and skipped; it never stalls the lane.
pub(crate) struct LaneWorker {
    pub(crate) wallet: WalletId,
    pub(crate) lane: u64,
    pub(crate) receiver: mpsc::UnboundedReceiver<Job>,
    pub(crate) store: BalanceStoreRef,
    pub(crate) lanes: Weak<Lanes>,
    pub(crate) idle_timeout: Option<Duration>,
    pub(crate) drain: CancellationToken,
    pub(crate) discard: CancellationToken,
}

impl LaneWorker {
    pub(crate) async fn run(mut self) {
        debug!(wallet = %self.wallet, lane = self.lane, "lane worker started");

        loop {
            let next = tokio::select! {
                biased;
                _ = self.discard.cancelled() => Next::Shutdown(ShutdownPolicy::Discard),
                _ = self.drain.cancelled() => Next::Shutdown(ShutdownPolicy::Drain),
                next = next_job(&mut self.receiver, self.idle_timeout) => next,
            };

            match next {
                Next::Job(job) => self.process(job).await,
                Next::Idle => {
                    if self.try_retire() {
                        break;
                    }
                }
                Next::Closed => break,
                Next::Shutdown(policy) => {
                    self.finish(policy).await;
                    break;
                }
            }
        }

        debug!(wallet = %self.wallet, lane = self.lane, "lane worker stopped");
    }

    async fn process(&self, job: Job) {
        let Job { request, reply } = job;
        let outcome = self.apply(&request).await;

        match &outcome {
            Ok(balance) => trace!(
                wallet = %self.wallet,
                operation = %request.operation,
                amount = %request.amount.value(),
                %balance,
                "request applied"
            ),
            Err(e @ WalletError::InsufficientFunds { .. }) => {
                warn!(wallet = %self.wallet, error = %e, "withdrawal refused in lane")
            }
            Err(e) => error!(
                wallet = %self.wallet,
                operation = %request.operation,
                error = %e,
                "request dropped"
            ),
        }

        if reply.send(outcome).is_err() {
            trace!(wallet = %self.wallet, "receipt dropped before the outcome arrived");
        }
    }

    async fn apply(&self, request: &ChangeRequest) -> Result<Balance> {
        let current = self
            .store
            .get(self.wallet)
            .await?
            .ok_or(WalletError::WalletNotFound(self.wallet))?;
        let updated = request.apply_to(current)?;
        self.store.store(self.wallet, updated).await?;
        Ok(updated)
    }

    /// Removes this lane from the registry if nothing can still reach it.
    ///
    /// Runs under the same shard lock as lane creation, so a producer either got
    /// its job in before the check or will create a fresh lane afterwards. Once the
    /// registry is gone the worker stays until its last sender drops.
    fn try_retire(&self) -> bool {
        let Some(lanes) = self.lanes.upgrade() else {
            return false;
        };
        let retired = lanes
            .remove_if(&self.wallet, |_, lane| {
                lane.id() == self.lane && lane.is_unreferenced() && self.receiver.is_empty()
            })
            .is_some();

        if retired {
            debug!(wallet = %self.wallet, lane = self.lane, "idle lane retired");
        }
        retired
    }

    async fn finish(&mut self, policy: ShutdownPolicy) {
        self.receiver.close();
        let mut pending = 0usize;

        while let Some(job) = self.receiver.recv().await {
            pending += 1;
            match policy {
                ShutdownPolicy::Drain => self.process(job).await,
                ShutdownPolicy::Discard => {
                    if job.reply.send(Err(WalletError::ShuttingDown)).is_err() {
                        trace!(wallet = %self.wallet, "receipt dropped before the outcome arrived");
                    }
                }
            }
        }

        if pending > 0 {
            debug!(
                wallet = %self.wallet,
                lane = self.lane,
                ?policy,
                pending,
                "lane flushed on shutdown"
            );
        }
    }
}

async fn next_job(
    receiver: &mut mpsc::UnboundedReceiver<Job>,
    idle_timeout: Option<Duration>,
) -> Next {
    let job = match idle_timeout {
        Some(timeout) => match tokio::time::timeout(timeout, receiver.recv()).await {
            Ok(job) => job,
            Err(_) => return Next::Idle,
        },
        None => receiver.recv().await,
    };
    job.map_or(Next::Closed, Next::Job)
}
