//! Periodic expiry sweeper.
//!
//! A correctness backstop independent of webhook delivery: once per interval
//! it re-derives revocations from stored expiry timestamps, catching members
//! whose negative billing events were lost upstream. It talks to the rest of
//! the system only through the subscription store.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use groupgate_store::{RocksStore, Store};

use crate::access::AccessController;

/// Background task revoking access for members past their paid period.
pub struct ExpirySweeper {
    store: Arc<RocksStore>,
    access: AccessController,
    interval: Duration,
    shutdown: CancellationToken,
}

impl ExpirySweeper {
    /// Create a sweeper; it does nothing until [`run`](Self::run) is awaited.
    #[must_use]
    pub fn new(
        store: Arc<RocksStore>,
        access: AccessController,
        interval: Duration,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            store,
            access,
            interval,
            shutdown,
        }
    }

    /// Loop forever, sweeping once per interval, until cancelled.
    ///
    /// The first tick fires immediately, so a restart catches up on anything
    /// that expired while the process was down.
    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(interval_secs = self.interval.as_secs(), "expiry sweeper started");

        loop {
            tokio::select! {
                () = self.shutdown.cancelled() => {
                    tracing::info!("expiry sweeper stopped");
                    break;
                }
                _ = ticker.tick() => {
                    self.sweep_once().await;
                }
            }
        }
    }

    /// One sweep pass: revoke every member whose paid period has lapsed.
    ///
    /// Individual revocation failures are logged by the access controller and
    /// do not abort the batch; a store failure aborts only this pass.
    pub async fn sweep_once(&self) {
        let now = chrono::Utc::now().timestamp();

        let expired = match self.store.list_expired(now) {
            Ok(expired) => expired,
            Err(e) => {
                tracing::error!(error = %e, "expiry scan failed, skipping pass");
                return;
            }
        };

        if expired.is_empty() {
            tracing::debug!("no expired subscriptions");
            return;
        }

        tracing::info!(count = expired.len(), "revoking expired members");

        for member_id in expired {
            self.access.revoke(member_id).await;
        }
    }
}
