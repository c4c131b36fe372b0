//! Update ingest
//!
//! Entry point for every producer. The store write always happens; only the
//! notification to live subscribers is allowed to be lost.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::location::{Location, LocationReport, ReportError};
use crate::stats::TrackerStats;
use crate::store::LocationStore;

/// Accepts location updates from producers
///
/// Cheap to clone; every producer can hold its own handle.
#[derive(Debug, Clone)]
pub struct UpdateIngest {
    store: Arc<LocationStore>,
    queue: mpsc::Sender<Location>,
    stats: Arc<TrackerStats>,
}

impl UpdateIngest {
    pub(crate) fn new(
        store: Arc<LocationStore>,
        queue: mpsc::Sender<Location>,
        stats: Arc<TrackerStats>,
    ) -> Self {
        Self {
            store,
            queue,
            stats,
        }
    }

    /// Store a location and queue it for broadcast
    ///
    /// Never blocks on the broadcast path: if the queue is full the update is
    /// still stored, only its notification is dropped. Returns the stored,
    /// timestamped copy.
    pub async fn submit(&self, location: Location) -> Location {
        let stored = self.store.upsert(location).await;
        self.stats.record_received();

        match self.queue.try_send(stored.clone()) {
            Ok(()) => {
                tracing::debug!(
                    asset_id = %stored.asset_id,
                    tenant = %stored.tenant_id,
                    "Location update queued"
                );
            }
            Err(TrySendError::Full(_)) => {
                let dropped = self.stats.record_dropped();
                tracing::warn!(
                    asset_id = %stored.asset_id,
                    dropped_total = dropped,
                    "Broadcast queue full, dropping update"
                );
            }
            Err(TrySendError::Closed(_)) => {
                let dropped = self.stats.record_dropped();
                tracing::warn!(
                    asset_id = %stored.asset_id,
                    dropped_total = dropped,
                    "Distributor not running, dropping update"
                );
            }
        }

        stored
    }

    /// Validate a report, then [`submit`](Self::submit) it
    pub async fn submit_report(&self, report: LocationReport) -> Result<Location, ReportError> {
        let location = report.into_location()?;
        Ok(self.submit(location).await)
    }

    /// Free slots left in the pending update queue
    pub fn queue_headroom(&self) -> usize {
        self.queue.capacity()
    }
}
