//! Location store implementation

use std::collections::HashMap;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::location::{Location, TenantScope};

/// Concurrent map from asset id to its latest location
///
/// Thread-safe via `RwLock`. Queries vastly outnumber writes, so readers share
/// the lock. Every critical section only touches the map and never awaits
/// anything else while holding it.
#[derive(Debug, Default)]
pub struct LocationStore {
    locations: RwLock<HashMap<String, Location>>,
}

impl LocationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Stamp `location` with the receive time and make it the asset's latest
    ///
    /// The stamp never goes backwards for a given asset, even if the wall
    /// clock does. Returns the stored copy.
    pub async fn upsert(&self, mut location: Location) -> Location {
        let mut locations = self.locations.write().await;

        let now = Utc::now();
        location.timestamp = match locations.get(&location.asset_id) {
            Some(previous) if previous.timestamp > now => previous.timestamp,
            _ => now,
        };

        let stored = location.clone();
        if let Some(previous) = locations.insert(location.asset_id.clone(), location) {
            if previous.tenant_id != stored.tenant_id {
                tracing::debug!(
                    asset_id = %stored.asset_id,
                    from = %previous.tenant_id,
                    to = %stored.tenant_id,
                    "Asset moved between tenants"
                );
            }
        }

        stored
    }

    /// Get the latest location of an asset
    pub async fn get(&self, asset_id: &str) -> Option<Location> {
        self.locations.read().await.get(asset_id).cloned()
    }

    /// Snapshot every location visible under `scope`
    ///
    /// Order is unspecified. The result is a copy; later updates do not
    /// show up in it.
    pub async fn get_all(&self, scope: &TenantScope) -> Vec<Location> {
        self.locations
            .read()
            .await
            .values()
            .filter(|location| location.is_visible_to(scope))
            .cloned()
            .collect()
    }

    /// Number of tracked assets
    pub async fn len(&self) -> usize {
        self.locations.read().await.len()
    }

    /// Check if no asset has reported yet
    pub async fn is_empty(&self) -> bool {
        self.locations.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::location::LocationReport;

    fn location(asset: &str, tenant: &str, lat: f64, lon: f64) -> Location {
        LocationReport::new(asset, lat, lon)
            .tenant(tenant)
            .into_location()
            .unwrap()
    }

    #[tokio::test]
    async fn test_latest_write_wins() {
        let store = LocationStore::new();

        let first = store.upsert(location("a1", "x", 10.0, 20.0)).await;
        let second = store.upsert(location("a1", "x", 11.0, 21.0)).await;

        let latest = store.get("a1").await.unwrap();
        assert_eq!(latest.latitude, 11.0);
        assert_eq!(latest.longitude, 21.0);
        assert_eq!(latest, second);
        assert!(second.timestamp >= first.timestamp);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_upsert_stamps_timestamp() {
        let store = LocationStore::new();
        let before = Utc::now();

        let stored = store.upsert(location("a1", "x", 0.0, 0.0)).await;

        assert!(stored.timestamp >= before);
        assert!(stored.timestamp <= Utc::now());
    }

    #[tokio::test]
    async fn test_timestamps_non_decreasing() {
        let store = LocationStore::new();
        let mut last = None;

        for i in 0..50 {
            let stored = store
                .upsert(location("a1", "x", i as f64 / 10.0, 0.0))
                .await;
            if let Some(previous) = last {
                assert!(stored.timestamp >= previous);
            }
            last = Some(stored.timestamp);
        }
    }

    #[tokio::test]
    async fn test_get_unknown_asset() {
        let store = LocationStore::new();
        assert!(store.get("missing").await.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_tenant_isolation() {
        let store = LocationStore::new();
        store.upsert(location("a1", "t1", 1.0, 1.0)).await;
        store.upsert(location("a2", "t1", 2.0, 2.0)).await;
        store.upsert(location("b1", "t2", 3.0, 3.0)).await;

        let t1 = store.get_all(&TenantScope::tenant("t1")).await;
        assert_eq!(t1.len(), 2);
        assert!(t1.iter().all(|l| l.tenant_id == "t1"));

        let t2 = store.get_all(&TenantScope::tenant("t2")).await;
        assert_eq!(t2.len(), 1);
        assert_eq!(t2[0].asset_id, "b1");

        assert!(store.get_all(&TenantScope::tenant("t3")).await.is_empty());
        assert_eq!(store.get_all(&TenantScope::All).await.len(), 3);
    }

    #[tokio::test]
    async fn test_asset_changes_tenant() {
        let store = LocationStore::new();
        store.upsert(location("a1", "t1", 1.0, 1.0)).await;
        store.upsert(location("a1", "t2", 1.0, 1.0)).await;

        assert!(store.get_all(&TenantScope::tenant("t1")).await.is_empty());
        assert_eq!(store.get_all(&TenantScope::tenant("t2")).await.len(), 1);
    }

    #[tokio::test]
    async fn test_snapshot_is_not_live() {
        let store = LocationStore::new();
        store.upsert(location("a1", "x", 1.0, 1.0)).await;

        let snapshot = store.get_all(&TenantScope::tenant("x")).await;
        store.upsert(location("a1", "x", 5.0, 5.0)).await;

        assert_eq!(snapshot[0].latitude, 1.0);
    }

    #[tokio::test]
    async fn test_concurrent_writers_and_readers() {
        let store = Arc::new(LocationStore::new());
        let mut handles = Vec::new();

        for writer in 0..8 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                for step in 0..100 {
                    let asset = format!("asset-{}", writer);
                    store
                        .upsert(location(&asset, "x", step as f64 / 100.0, step as f64 / 100.0))
                        .await;
                }
            }));
        }
        for _ in 0..4 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                for _ in 0..100 {
                    for l in store.get_all(&TenantScope::tenant("x")).await {
                        // Whole-value replacement: both coordinates come from the same write
                        assert_eq!(l.latitude, l.longitude);
                    }
                }
            }));
        }

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(store.len().await, 8);
        for writer in 0..8 {
            let latest = store.get(&format!("asset-{}", writer)).await.unwrap();
            assert_eq!(latest.latitude, 0.99);
        }
    }
}
