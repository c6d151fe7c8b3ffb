use super::receipt::Receipt;
use super::worker::LaneWorker;
use crate::config::{EngineConfig, ShutdownPolicy};
use crate::domain::ports::BalanceStoreRef;
use crate::domain::request::ChangeRequest;
use crate::domain::wallet::{Balance, WalletId};
use crate::error::{Result, WalletError};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::{mpsc, oneshot};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

/// A request waiting in a lane together with the channel its outcome goes to.
pub(crate) struct Job {
    pub(crate) request: ChangeRequest,
    pub(crate) reply: oneshot::Sender<Result<Balance>>,
}

pub(crate) type Lanes = DashMap<WalletId, Lane>;

/// Registry-side half of an entity lane.
///
/// The receiving half is owned by the lane's worker, so nobody else can dequeue.
pub(crate) struct Lane {
    id: u64,
    sender: mpsc::UnboundedSender<Job>,
}

impl Lane {
    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    /// No [`LaneHandle`] is alive, only the registry's own sender.
    pub(crate) fn is_unreferenced(&self) -> bool {
        self.sender.strong_count() == 1
    }

    fn handle(&self, wallet: WalletId) -> LaneHandle {
        LaneHandle {
            wallet,
            lane: self.id,
            sender: self.sender.clone(),
        }
    }
}

/// Producer handle for one wallet's lane.
///
/// While a handle is alive its lane is never reclaimed, so enqueueing through it
/// cannot race with worker retirement. Keep handles short-lived.
#[derive(Debug)]
pub struct LaneHandle {
    wallet: WalletId,
    lane: u64,
    sender: mpsc::UnboundedSender<Job>,
}

impl LaneHandle {
    pub fn wallet(&self) -> WalletId {
        self.wallet
    }

    pub fn lane_id(&self) -> u64 {
        self.lane
    }

    /// Appends `request` to the tail of the lane. Never blocks.
    pub fn enqueue(&self, request: ChangeRequest) -> Result<Receipt> {
        if request.wallet != self.wallet {
            return Err(WalletError::MalformedRequest(vec![format!(
                "request for wallet {} routed to the lane of wallet {}",
                request.wallet, self.wallet
            )]));
        }

        let (receipt, reply) = Receipt::new(self.wallet);
        self.sender
            .send(Job { request, reply })
            .map_err(|_| WalletError::LaneClosed(self.wallet))?;
        Ok(receipt)
    }
}

/// Maps every wallet with pending work to its lane.
///
/// At most one lane, and therefore one worker, exists per wallet at any time.
/// Lanes are created on first use and, when an idle timeout is configured,
/// retired by their own worker once they have been empty and unreferenced for
/// that long.
pub struct LaneRegistry {
    lanes: Arc<Lanes>,
    store: BalanceStoreRef,
    config: EngineConfig,
    next_lane_id: AtomicU64,
    closing: AtomicBool,
    tracker: TaskTracker,
    drain: CancellationToken,
    discard: CancellationToken,
}

impl LaneRegistry {
    pub fn new(store: BalanceStoreRef, config: EngineConfig) -> Self {
        Self {
            lanes: Arc::new(DashMap::new()),
            store,
            config,
            next_lane_id: AtomicU64::new(1),
            closing: AtomicBool::new(false),
            tracker: TaskTracker::new(),
            drain: CancellationToken::new(),
            discard: CancellationToken::new(),
        }
    }

    /// Returns a handle to the lane of `wallet`, creating the lane and starting its
    /// worker if there is none.
    ///
    /// Lookup and insertion happen under a single map entry lock, so concurrent
    /// callers for the same wallet always end up on the same lane.
    pub fn get_or_create_lane(&self, wallet: WalletId) -> Result<LaneHandle> {
        let entry = self.lanes.entry(wallet);
        if self.closing.load(Ordering::SeqCst) {
            return Err(WalletError::ShuttingDown);
        }

        let lane = match entry {
            Entry::Occupied(mut occupied) => {
                if occupied.get().sender.is_closed() {
                    warn!(%wallet, lane = occupied.get().id, "lane worker is gone, replacing lane");
                    occupied.insert(self.spawn_lane(wallet));
                }
                occupied.into_ref()
            }
            Entry::Vacant(vacant) => vacant.insert(self.spawn_lane(wallet)),
        };
        Ok(lane.handle(wallet))
    }

    pub fn active_lanes(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_closing(&self) -> bool {
        self.closing.load(Ordering::SeqCst)
    }

    /// Stops every lane and waits for all workers to exit.
    ///
    /// New lanes are refused from the moment this is called. Calling it again
    /// only waits for the first shutdown to finish.
    pub async fn shutdown(&self, policy: ShutdownPolicy) {
        if self.closing.swap(true, Ordering::SeqCst) {
            self.tracker.wait().await;
            return;
        }

        info!(?policy, lanes = self.lanes.len(), "shutting down lanes");
        match policy {
            ShutdownPolicy::Drain => self.drain.cancel(),
            ShutdownPolicy::Discard => self.discard.cancel(),
        }
        self.lanes.clear();
        self.tracker.close();
        self.tracker.wait().await;
        info!("all lanes stopped");
    }

    fn spawn_lane(&self, wallet: WalletId) -> Lane {
        let id = self.next_lane_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::unbounded_channel();
        let worker = LaneWorker {
            wallet,
            lane: id,
            receiver,
            store: Arc::clone(&self.store),
            lanes: Arc::downgrade(&self.lanes),
            idle_timeout: self.config.idle_timeout,
            drain: self.drain.clone(),
            discard: self.discard.clone(),
        };
        self.tracker.spawn(worker.run());
        debug!(%wallet, lane = id, "lane spawned");
        Lane { id, sender }
    }
}
