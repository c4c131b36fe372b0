//! Tracker facade
//!
//! Wires the location store, update ingest and subscriber registry together.
//! The matching [`Distributor`] is returned separately so the caller decides
//! where and when it runs.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;

use crate::broadcast::{
    Distributor, SubscriberId, SubscriberRegistry, Subscription, TrackerConfig, UpdateIngest,
};
use crate::location::{Location, LocationReport, ReportError, TenantScope};
use crate::stats::{StatsSnapshot, TrackerStats};
use crate::store::LocationStore;

/// Shared state behind every transport adapter and producer
#[derive(Debug)]
pub struct Tracker {
    config: TrackerConfig,
    store: Arc<LocationStore>,
    registry: Arc<SubscriberRegistry>,
    ingest: UpdateIngest,
    stats: Arc<TrackerStats>,
}

impl Tracker {
    /// Create a tracker and the distributor that serves its subscribers
    ///
    /// Nothing is delivered to subscribers until the distributor runs.
    pub fn new(config: TrackerConfig) -> (Self, Distributor) {
        let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
        let store = Arc::new(LocationStore::new());
        let registry = Arc::new(SubscriberRegistry::new(config.subscriber_buffer));
        let stats = Arc::new(TrackerStats::new());

        let ingest = UpdateIngest::new(Arc::clone(&store), tx, Arc::clone(&stats));
        let distributor = Distributor::new(rx, Arc::clone(&registry), Arc::clone(&stats));

        let tracker = Self {
            config,
            store,
            registry,
            ingest,
            stats,
        };

        (tracker, distributor)
    }

    /// Get the tracker configuration
    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Handle for producers
    pub fn ingest(&self) -> &UpdateIngest {
        &self.ingest
    }

    /// Validate and submit a report
    pub async fn submit(&self, report: LocationReport) -> Result<Location, ReportError> {
        self.ingest.submit_report(report).await
    }

    /// Latest location of one asset
    pub async fn location(&self, asset_id: &str) -> Option<Location> {
        self.store.get(asset_id).await
    }

    /// Latest locations visible under `scope`
    pub async fn locations(&self, scope: &TenantScope) -> Vec<Location> {
        self.store.get_all(scope).await
    }

    /// Register a live subscriber
    ///
    /// The caller is expected to follow up with an initial snapshot from
    /// [`locations`](Self::locations) and to [`unsubscribe`](Self::unsubscribe)
    /// when its connection ends.
    pub fn subscribe(&self, scope: TenantScope) -> Subscription {
        let subscription = self.registry.add(scope);
        self.stats.record_subscriber_added();
        subscription
    }

    /// Unregister a subscriber; a no-op if it is already gone
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        self.registry.remove(id)
    }

    /// Number of live subscribers
    pub fn subscriber_count(&self) -> usize {
        self.registry.len()
    }

    /// Counters plus current sizes
    pub async fn stats(&self) -> TrackerSnapshot {
        TrackerSnapshot {
            tracked_assets: self.store.len().await,
            subscribers: self.registry.len(),
            counters: self.stats.snapshot(),
        }
    }
}

/// Serializable tracker status
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerSnapshot {
    /// Assets with a stored location
    pub tracked_assets: usize,
    /// Live subscribers
    pub subscribers: usize,
    /// Ingest and broadcast counters
    #[serde(flatten)]
    pub counters: StatsSnapshot,
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::broadcast::Notification;

    fn report(asset: &str, tenant: &str, lat: f64, lon: f64) -> LocationReport {
        LocationReport::new(asset, lat, lon).tenant(tenant)
    }

    async fn next_update(sub: &mut Subscription) -> Location {
        let notification = tokio::time::timeout(Duration::from_secs(1), sub.receiver.recv())
            .await
            .expect("timed out waiting for update")
            .expect("subscription closed");
        match notification.as_ref() {
            Notification::LocationUpdate { location } => location.clone(),
            other => panic!("unexpected notification: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_example_scenario() {
        let (tracker, distributor) = Tracker::new(TrackerConfig::default());
        let _handle = distributor.spawn();

        let mut sub_x = tracker.subscribe(TenantScope::tenant("x"));
        let mut sub_y = tracker.subscribe(TenantScope::tenant("y"));
        assert!(tracker.locations(&sub_x.scope).await.is_empty());

        tracker.submit(report("a1", "x", 10.0, 20.0)).await.unwrap();
        tracker.submit(report("a1", "x", 11.0, 21.0)).await.unwrap();

        let latest = tracker.location("a1").await.unwrap();
        assert_eq!((latest.latitude, latest.longitude), (11.0, 21.0));

        assert_eq!(next_update(&mut sub_x).await.latitude, 10.0);
        assert_eq!(next_update(&mut sub_x).await.latitude, 11.0);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(sub_y.receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_overflow_keeps_latest_state() {
        let config = TrackerConfig::default().queue_capacity(4);
        let (tracker, _distributor) = Tracker::new(config);

        // Distributor not running: the queue saturates after four updates
        for asset in ["a", "b", "c"] {
            for step in 0..10 {
                tracker
                    .submit(report(asset, "x", step as f64, step as f64))
                    .await
                    .unwrap();
            }
        }

        for asset in ["a", "b", "c"] {
            assert_eq!(tracker.location(asset).await.unwrap().latitude, 9.0);
        }

        let stats = tracker.stats().await;
        assert_eq!(stats.tracked_assets, 3);
        assert_eq!(stats.counters.updates_received, 30);
        assert_eq!(stats.counters.updates_dropped, 26);
    }

    #[tokio::test]
    async fn test_overflow_with_slow_subscriber() {
        let config = TrackerConfig::default()
            .queue_capacity(4)
            .subscriber_buffer(2);
        let (tracker, distributor) = Tracker::new(config);
        let mut slow = tracker.subscribe(TenantScope::All);

        // Distributor not running yet: four updates queue, six are dropped
        for step in 0..10 {
            tracker
                .submit(report("a1", "x", step as f64, 0.0))
                .await
                .unwrap();
        }
        let _handle = distributor.spawn();

        tokio::time::timeout(Duration::from_secs(1), async {
            while tracker.stats().await.counters.updates_distributed < 4 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap();

        // Nothing lost at rest
        assert_eq!(tracker.location("a1").await.unwrap().latitude, 9.0);

        // In transit: the oldest two fit the subscriber buffer, the rest lag
        assert_eq!(next_update(&mut slow).await.latitude, 0.0);
        assert_eq!(next_update(&mut slow).await.latitude, 1.0);
        assert!(slow.receiver.try_recv().is_err());

        let stats = tracker.stats().await;
        assert_eq!(stats.counters.updates_received, 10);
        assert_eq!(stats.counters.updates_dropped, 6);
        assert_eq!(stats.counters.notifications_delivered, 2);
        assert_eq!(stats.counters.notifications_lagged, 2);
        assert_eq!(stats.subscribers, 1);
    }

    #[tokio::test]
    async fn test_unsubscribe_twice() {
        let (tracker, _distributor) = Tracker::new(TrackerConfig::default());
        let sub = tracker.subscribe(TenantScope::All);

        assert_eq!(tracker.subscriber_count(), 1);
        assert!(tracker.unsubscribe(sub.id));
        assert!(!tracker.unsubscribe(sub.id));
        assert_eq!(tracker.subscriber_count(), 0);
        assert_eq!(tracker.stats().await.counters.subscribers_added, 1);
    }

    #[tokio::test]
    async fn test_stats_json_is_flat() {
        let (tracker, _distributor) = Tracker::new(TrackerConfig::default());
        tracker.submit(report("a1", "x", 0.0, 0.0)).await.unwrap();

        let value = serde_json::to_value(tracker.stats().await).unwrap();
        assert_eq!(value["trackedAssets"], 1);
        assert_eq!(value["subscribers"], 0);
        assert_eq!(value["updatesReceived"], 1);
    }
}
