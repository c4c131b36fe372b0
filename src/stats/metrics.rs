//! Counters for the ingest and broadcast paths

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;

/// Tracker-wide counters
///
/// All counters are monotonically increasing and updated with relaxed
/// atomics; they are for observation, not for synchronization.
#[derive(Debug)]
pub struct TrackerStats {
    started_at: Instant,
    updates_received: AtomicU64,
    updates_dropped: AtomicU64,
    updates_distributed: AtomicU64,
    notifications_delivered: AtomicU64,
    notifications_lagged: AtomicU64,
    subscribers_added: AtomicU64,
    subscribers_evicted: AtomicU64,
}

impl TrackerStats {
    /// Create a zeroed stats tracker
    pub fn new() -> Self {
        Self {
            started_at: Instant::now(),
            updates_received: AtomicU64::new(0),
            updates_dropped: AtomicU64::new(0),
            updates_distributed: AtomicU64::new(0),
            notifications_delivered: AtomicU64::new(0),
            notifications_lagged: AtomicU64::new(0),
            subscribers_added: AtomicU64::new(0),
            subscribers_evicted: AtomicU64::new(0),
        }
    }

    /// An update was written to the store
    pub fn record_received(&self) {
        self.updates_received.fetch_add(1, Ordering::Relaxed);
    }

    /// An update could not be queued for distribution
    ///
    /// Returns the total number of drops so far.
    pub fn record_dropped(&self) -> u64 {
        self.updates_dropped.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// The distributor finished fanning out one update
    pub fn record_distributed(&self) {
        self.updates_distributed.fetch_add(1, Ordering::Relaxed);
    }

    /// `count` subscribers accepted a notification
    pub fn record_delivered(&self, count: u64) {
        self.notifications_delivered.fetch_add(count, Ordering::Relaxed);
    }

    /// A subscriber's outbound buffer was full and a notification was skipped
    pub fn record_lagged(&self) {
        self.notifications_lagged.fetch_add(1, Ordering::Relaxed);
    }

    /// A subscriber was registered
    pub fn record_subscriber_added(&self) {
        self.subscribers_added.fetch_add(1, Ordering::Relaxed);
    }

    /// A subscriber was removed after a failed write
    pub fn record_evicted(&self) {
        self.subscribers_evicted.fetch_add(1, Ordering::Relaxed);
    }

    /// Time since the tracker was created
    pub fn uptime(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            uptime_secs: self.uptime().as_secs(),
            updates_received: self.updates_received.load(Ordering::Relaxed),
            updates_dropped: self.updates_dropped.load(Ordering::Relaxed),
            updates_distributed: self.updates_distributed.load(Ordering::Relaxed),
            notifications_delivered: self.notifications_delivered.load(Ordering::Relaxed),
            notifications_lagged: self.notifications_lagged.load(Ordering::Relaxed),
            subscribers_added: self.subscribers_added.load(Ordering::Relaxed),
            subscribers_evicted: self.subscribers_evicted.load(Ordering::Relaxed),
        }
    }
}

impl Default for TrackerStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable copy of [`TrackerStats`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    /// Seconds since start
    pub uptime_secs: u64,
    /// Updates written to the store
    pub updates_received: u64,
    /// Updates that never reached the distribution queue
    pub updates_dropped: u64,
    /// Updates the distributor has fanned out
    pub updates_distributed: u64,
    /// Notifications accepted by subscriber connections
    pub notifications_delivered: u64,
    /// Notifications skipped because a subscriber fell behind
    pub notifications_lagged: u64,
    /// Subscribers ever registered
    pub subscribers_added: u64,
    /// Subscribers removed after a failed write
    pub subscribers_evicted: u64,
}
