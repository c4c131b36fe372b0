//! Broadcast distributor
//!
//! A single long-lived task that drains the pending update queue in FIFO
//! order and fans each update out to the subscribers whose scope matches.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::notification::Notification;
use super::registry::{DeliveryError, SubscriberRegistry};
use crate::location::Location;
use crate::stats::TrackerStats;

/// Consumer side of the pending update queue
///
/// The only component that removes subscribers because a write failed.
#[derive(Debug)]
pub struct Distributor {
    queue: mpsc::Receiver<Location>,
    registry: Arc<SubscriberRegistry>,
    stats: Arc<TrackerStats>,
}

impl Distributor {
    pub(crate) fn new(
        queue: mpsc::Receiver<Location>,
        registry: Arc<SubscriberRegistry>,
        stats: Arc<TrackerStats>,
    ) -> Self {
        Self {
            queue,
            registry,
            stats,
        }
    }

    /// Run until every ingest handle is gone
    ///
    /// In a running server that never happens; the task lives as long as the
    /// process (or until its handle is aborted). Queued updates are not
    /// drained on shutdown.
    pub async fn run(mut self) {
        tracing::info!("Broadcast distributor started");

        while let Some(location) = self.queue.recv().await {
            self.distribute(location);
        }

        tracing::info!("Broadcast distributor stopped");
    }

    /// Spawn [`run`](Self::run) on the current runtime
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    /// Fan one update out to every matching subscriber
    ///
    /// Returns the number of subscribers that accepted it.
    fn distribute(&self, location: Location) -> usize {
        let tenant_id = location.tenant_id.clone();
        let notification = Arc::new(Notification::LocationUpdate { location });
        let mut delivered = 0;

        for subscriber in self.registry.snapshot() {
            if !subscriber.wants(&tenant_id) {
                continue;
            }

            match subscriber.try_deliver(&notification) {
                Ok(()) => delivered += 1,
                Err(DeliveryError::Lagged) => {
                    self.stats.record_lagged();
                    tracing::debug!(
                        subscriber_id = subscriber.id,
                        "Subscriber buffer full, skipping update"
                    );
                }
                Err(DeliveryError::Closed) => {
                    if self.registry.remove(subscriber.id) {
                        self.stats.record_evicted();
                        tracing::warn!(
                            subscriber_id = subscriber.id,
                            "Failed to send to subscriber, removed"
                        );
                    }
                }
            }
        }

        self.stats.record_delivered(delivered as u64);
        self.stats.record_distributed();
        delivered
    }
}
