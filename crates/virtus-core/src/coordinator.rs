// ── Polling coordinator ──
//
// Owns the single cached state snapshot and the polling cadence.
// Mutations are broadcast to subscribers via `watch` channels; refreshes
// are coalesced so at most one remote fetch is in flight at a time.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use virtus_api::{AcState, VirtusClient};

use crate::error::CoreError;

/// Outcome of the most recent refresh attempt.
///
/// Separate from the snapshot channel on purpose: a failed refresh
/// leaves the last-known-good snapshot visible (stale-but-available)
/// while this signal tells observers the data stopped moving.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UpdateStatus {
    /// No refresh has completed yet.
    #[default]
    NotStarted,
    /// Last refresh succeeded at the given instant.
    Ok { at: DateTime<Utc> },
    /// Last refresh failed; the held snapshot (if any) is stale.
    Failed { reason: String },
}

/// Coordinator for one device's cached state.
///
/// Cheaply cloneable via `Arc`. [`start()`](Self::start) performs the
/// initial synchronous refresh (setup aborts on failure) and spawns the
/// periodic poll task; [`request_refresh()`](Self::request_refresh) is
/// the out-of-band trigger used after every write.
#[derive(Clone)]
pub struct Coordinator {
    inner: Arc<CoordinatorInner>,
}

struct CoordinatorInner {
    client: Arc<VirtusClient>,
    poll_interval: Duration,
    /// Last successful snapshot. `None` until the first successful poll.
    state: watch::Sender<Option<Arc<AcState>>>,
    status: watch::Sender<UpdateStatus>,
    /// Serializes remote fetches. Combined with `refresh_seq` this
    /// collapses overlapping refresh requests into one in-flight fetch.
    refresh_gate: Mutex<()>,
    /// Bumped after every completed fetch, success or failure.
    refresh_seq: AtomicU64,
    cancel: CancellationToken,
    poll_task: std::sync::Mutex<Option<JoinHandle<()>>>,
}

impl Coordinator {
    pub fn new(client: Arc<VirtusClient>, poll_interval: Duration) -> Self {
        let (state, _) = watch::channel(None);
        let (status, _) = watch::channel(UpdateStatus::NotStarted);

        Self {
            inner: Arc::new(CoordinatorInner {
                client,
                poll_interval,
                state,
                status,
                refresh_gate: Mutex::new(()),
                refresh_seq: AtomicU64::new(0),
                cancel: CancellationToken::new(),
                poll_task: std::sync::Mutex::new(None),
            }),
        }
    }

    /// The gateway this coordinator polls. Adapters use it for writes.
    pub fn client(&self) -> &Arc<VirtusClient> {
        &self.inner.client
    }

    /// Perform the first refresh and start the periodic poll task.
    ///
    /// The first refresh is synchronous relative to setup: an error here
    /// means the device never becomes available and the caller should
    /// abort activation.
    pub async fn start(&self) -> Result<(), CoreError> {
        self.request_refresh().await?;

        let mut guard = self
            .inner
            .poll_task
            .lock()
            .expect("poll task lock poisoned");
        if guard.is_none() && !self.inner.poll_interval.is_zero() {
            let coordinator = self.clone();
            let cancel = self.inner.cancel.clone();
            *guard = Some(tokio::spawn(poll_task(
                coordinator,
                self.inner.poll_interval,
                cancel,
            )));
        }
        Ok(())
    }

    /// Stop polling. In-flight operations are abandoned, not awaited --
    /// writes are idempotent full-value replacements, so there is
    /// nothing to compensate.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
        if let Some(task) = self
            .inner
            .poll_task
            .lock()
            .expect("poll task lock poisoned")
            .take()
        {
            task.abort();
        }
    }

    // ── Readers ──────────────────────────────────────────────────────

    /// The current snapshot, if any poll has succeeded yet.
    pub fn current(&self) -> Option<Arc<AcState>> {
        self.inner.state.borrow().clone()
    }

    /// Subscribe to snapshot replacements.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<AcState>>> {
        self.inner.state.subscribe()
    }

    /// Outcome of the most recent refresh.
    pub fn status(&self) -> UpdateStatus {
        self.inner.status.borrow().clone()
    }

    /// Subscribe to refresh outcomes.
    pub fn subscribe_status(&self) -> watch::Receiver<UpdateStatus> {
        self.inner.status.subscribe()
    }

    // ── Refresh ──────────────────────────────────────────────────────

    /// Refresh the snapshot now, outside the regular poll cadence.
    ///
    /// Overlapping calls coalesce: whoever holds the gate fetches, and a
    /// caller that waited while that fetch ran adopts its outcome
    /// instead of fetching again. The poll task goes through the same
    /// gate, so a timer tick and a post-write refresh can never race two
    /// fetches against the remote.
    pub async fn request_refresh(&self) -> Result<(), CoreError> {
        let seen = self.inner.refresh_seq.load(Ordering::Acquire);
        let _gate = self.inner.refresh_gate.lock().await;

        if self.inner.refresh_seq.load(Ordering::Acquire) != seen {
            // Another fetch completed while we waited for the gate.
            return match self.status() {
                UpdateStatus::Failed { reason } => Err(CoreError::UpdateFailed { reason }),
                _ => Ok(()),
            };
        }

        self.refresh_locked().await
    }

    /// The actual fetch. Caller must hold the refresh gate.
    async fn refresh_locked(&self) -> Result<(), CoreError> {
        let result = self.inner.client.get_state().await;
        self.inner.refresh_seq.fetch_add(1, Ordering::AcqRel);

        match result {
            Ok(state) => {
                debug!(
                    last_reported = %state.last_reported_date,
                    "state refresh successful"
                );
                self.inner.state.send_replace(Some(Arc::new(state)));
                self.inner
                    .status
                    .send_replace(UpdateStatus::Ok { at: Utc::now() });
                Ok(())
            }
            Err(e) => {
                // Keep the previous snapshot readable; only the status
                // channel reports the failure.
                let reason = e.to_string();
                warn!(error = %e, "state refresh failed");
                self.inner
                    .status
                    .send_replace(UpdateStatus::Failed {
                        reason: reason.clone(),
                    });
                Err(CoreError::UpdateFailed { reason })
            }
        }
    }
}

/// Periodic poll loop. The immediate first tick is consumed -- `start()`
/// already did the initial refresh.
async fn poll_task(coordinator: Coordinator, interval: Duration, cancel: CancellationToken) {
    let mut ticker = tokio::time::interval(interval);
    ticker.tick().await;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = ticker.tick() => {
                if let Err(e) = coordinator.request_refresh().await {
                    warn!(error = %e, "periodic refresh failed");
                }
            }
        }
    }
}
