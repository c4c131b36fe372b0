//! Incoming location reports
//!
//! Reports arrive from producers (HTTP clients, the device simulator) and are
//! validated before anything touches the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Location, DEFAULT_TENANT};

/// Error type for report validation
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReportError {
    /// `assetId` was absent or empty
    #[error("assetId is required")]
    MissingAssetId,
    /// A numeric field was NaN or infinite
    #[error("{0} must be a finite number")]
    NotFinite(&'static str),
    /// Latitude outside [-90, 90]
    #[error("latitude {0} is outside [-90, 90]")]
    LatitudeOutOfRange(f64),
    /// Longitude outside [-180, 180]
    #[error("longitude {0} is outside [-180, 180]")]
    LongitudeOutOfRange(f64),
    /// Speed or accuracy below zero
    #[error("{field} must not be negative (got {value})")]
    Negative {
        /// Offending field
        field: &'static str,
        /// Reported value
        value: f64,
    },
}

/// A position report as submitted by a producer
///
/// Any `timestamp` in the payload is ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationReport {
    /// Asset identifier
    #[serde(default)]
    pub asset_id: String,
    /// Latitude in degrees
    #[serde(default)]
    pub latitude: f64,
    /// Longitude in degrees
    #[serde(default)]
    pub longitude: f64,
    /// Speed in km/h
    #[serde(default)]
    pub speed: f64,
    /// Heading in degrees
    #[serde(default)]
    pub heading: f64,
    /// Accuracy in meters
    #[serde(default)]
    pub accuracy: f64,
    /// Owning tenant; defaults to [`DEFAULT_TENANT`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
}

impl LocationReport {
    /// Create a report for an asset at the given coordinates
    pub fn new(asset_id: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            asset_id: asset_id.into(),
            latitude,
            longitude,
            ..Default::default()
        }
    }

    /// Set the owning tenant
    pub fn tenant(mut self, tenant_id: impl Into<String>) -> Self {
        self.tenant_id = Some(tenant_id.into());
        self
    }

    /// Set speed in km/h
    pub fn speed(mut self, speed: f64) -> Self {
        self.speed = speed;
        self
    }

    /// Set heading in degrees
    pub fn heading(mut self, heading: f64) -> Self {
        self.heading = heading;
        self
    }

    /// Set accuracy in meters
    pub fn accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// Validate the report and turn it into an unstamped [`Location`]
    ///
    /// The timestamp is left at the Unix epoch; the store stamps it on upsert.
    pub fn into_location(self) -> Result<Location, ReportError> {
        if self.asset_id.trim().is_empty() {
            return Err(ReportError::MissingAssetId);
        }

        for (field, value) in [
            ("latitude", self.latitude),
            ("longitude", self.longitude),
            ("speed", self.speed),
            ("heading", self.heading),
            ("accuracy", self.accuracy),
        ] {
            if !value.is_finite() {
                return Err(ReportError::NotFinite(field));
            }
        }

        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(ReportError::LatitudeOutOfRange(self.latitude));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(ReportError::LongitudeOutOfRange(self.longitude));
        }
        if self.speed < 0.0 {
            return Err(ReportError::Negative {
                field: "speed",
                value: self.speed,
            });
        }
        if self.accuracy < 0.0 {
            return Err(ReportError::Negative {
                field: "accuracy",
                value: self.accuracy,
            });
        }

        let tenant_id = match self.tenant_id {
            Some(id) if !id.is_empty() => id,
            _ => DEFAULT_TENANT.to_string(),
        };

        Ok(Location {
            asset_id: self.asset_id,
            latitude: self.latitude,
            longitude: self.longitude,
            speed: self.speed,
            heading: self.heading.rem_euclid(360.0),
            accuracy: self.accuracy,
            timestamp: DateTime::<Utc>::UNIX_EPOCH,
            tenant_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_report() {
        let location = LocationReport::new("a1", 10.0, 20.0)
            .tenant("x")
            .speed(42.0)
            .heading(370.0)
            .accuracy(8.0)
            .into_location()
            .unwrap();

        assert_eq!(location.asset_id, "a1");
        assert_eq!(location.tenant_id, "x");
        assert_eq!(location.speed, 42.0);
        assert_eq!(location.heading, 10.0);
        assert_eq!(location.timestamp, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn test_default_tenant() {
        let location = LocationReport::new("a1", 0.0, 0.0).into_location().unwrap();
        assert_eq!(location.tenant_id, DEFAULT_TENANT);

        let location = LocationReport::new("a1", 0.0, 0.0)
            .tenant("")
            .into_location()
            .unwrap();
        assert_eq!(location.tenant_id, DEFAULT_TENANT);
    }

    #[test]
    fn test_missing_asset_id() {
        let result = LocationReport::new("  ", 0.0, 0.0).into_location();
        assert_eq!(result, Err(ReportError::MissingAssetId));
    }

    #[test]
    fn test_out_of_range_coordinates() {
        assert_eq!(
            LocationReport::new("a1", 91.0, 0.0).into_location(),
            Err(ReportError::LatitudeOutOfRange(91.0))
        );
        assert_eq!(
            LocationReport::new("a1", 0.0, -180.5).into_location(),
            Err(ReportError::LongitudeOutOfRange(-180.5))
        );
    }

    #[test]
    fn test_non_finite_and_negative() {
        assert_eq!(
            LocationReport::new("a1", f64::NAN, 0.0).into_location(),
            Err(ReportError::NotFinite("latitude"))
        );
        assert!(matches!(
            LocationReport::new("a1", 0.0, 0.0).speed(-1.0).into_location(),
            Err(ReportError::Negative { field: "speed", .. })
        ));
    }

    #[test]
    fn test_deserialize_ignores_timestamp() {
        let json = r#"{
            "assetId": "a1",
            "latitude": -0.18,
            "longitude": -78.46,
            "timestamp": "2001-01-01T00:00:00Z",
            "tenantId": "uce-001"
        }"#;

        let report: LocationReport = serde_json::from_str(json).unwrap();
        let location = report.into_location().unwrap();

        assert_eq!(location.tenant_id, "uce-001");
        assert_eq!(location.speed, 0.0);
        assert_eq!(location.timestamp, DateTime::<Utc>::UNIX_EPOCH);
    }
}
