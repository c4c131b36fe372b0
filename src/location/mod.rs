//! Location values and tenant scoping
//!
//! A [`Location`] is the latest known position of one asset. Producers send a
//! [`LocationReport`]; the receive timestamp on the resulting `Location` is
//! always assigned by the store, never taken from the caller.

pub mod report;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use report::{LocationReport, ReportError};

/// Tenant assigned to reports that do not name one
pub const DEFAULT_TENANT: &str = "default";

/// A point-in-time position report for a single asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// Stable identifier of the physical asset
    pub asset_id: String,
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Speed in km/h
    pub speed: f64,
    /// Heading in degrees, 0 to 360
    pub heading: f64,
    /// Horizontal accuracy in meters
    pub accuracy: f64,
    /// Receive timestamp (UTC), stamped on upsert
    pub timestamp: DateTime<Utc>,
    /// Visibility domain the asset belongs to
    pub tenant_id: String,
}

impl Location {
    /// Check whether this location is visible under `scope`
    pub fn is_visible_to(&self, scope: &TenantScope) -> bool {
        scope.matches(&self.tenant_id)
    }
}

/// Visibility filter for queries and subscribers
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum TenantScope {
    /// Every tenant
    #[default]
    All,
    /// A single tenant
    Tenant(String),
}

impl TenantScope {
    /// Scope limited to one tenant
    pub fn tenant(id: impl Into<String>) -> Self {
        TenantScope::Tenant(id.into())
    }

    /// Build a scope from an optional query value
    ///
    /// Absent and empty values both mean "all tenants".
    pub fn from_param(value: Option<&str>) -> Self {
        match value {
            Some(id) if !id.is_empty() => TenantScope::Tenant(id.to_string()),
            _ => TenantScope::All,
        }
    }

    /// Check whether a location of `tenant_id` falls inside this scope
    pub fn matches(&self, tenant_id: &str) -> bool {
        match self {
            TenantScope::All => true,
            TenantScope::Tenant(id) => id == tenant_id,
        }
    }
}

impl fmt::Display for TenantScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TenantScope::All => write!(f, "*"),
            TenantScope::Tenant(id) => write!(f, "{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_from_param() {
        assert_eq!(TenantScope::from_param(None), TenantScope::All);
        assert_eq!(TenantScope::from_param(Some("")), TenantScope::All);
        assert_eq!(
            TenantScope::from_param(Some("uce-001")),
            TenantScope::tenant("uce-001")
        );
    }

    #[test]
    fn test_scope_matches() {
        let scoped = TenantScope::tenant("x");

        assert!(scoped.matches("x"));
        assert!(!scoped.matches("y"));
        assert!(TenantScope::All.matches("x"));
        assert!(TenantScope::All.matches(""));
    }

    #[test]
    fn test_location_json_shape() {
        let location = Location {
            asset_id: "a1".into(),
            latitude: 10.0,
            longitude: 20.0,
            speed: 0.0,
            heading: 90.0,
            accuracy: 5.0,
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
            tenant_id: "x".into(),
        };

        let value = serde_json::to_value(&location).unwrap();

        assert_eq!(value["assetId"], "a1");
        assert_eq!(value["tenantId"], "x");
        assert_eq!(value["latitude"], 10.0);
        assert_eq!(value["timestamp"], "1970-01-01T00:00:00Z");
        assert!(location.is_visible_to(&TenantScope::tenant("x")));
        assert!(!location.is_visible_to(&TenantScope::tenant("y")));
    }
}
