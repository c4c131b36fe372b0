//! Messages pushed to live subscribers

use serde::{Deserialize, Serialize};

use crate::location::Location;

/// A message sent on a subscriber's stream
///
/// Serialized with an internal `type` tag:
/// `{"type":"initial_locations","locations":[...]}` and
/// `{"type":"location_update","location":{...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Notification {
    /// Snapshot sent once, right after the subscriber registers
    InitialLocations {
        /// Locations visible to the subscriber at registration time
        locations: Vec<Location>,
    },
    /// A single update fanned out by the distributor
    LocationUpdate {
        /// The stored (timestamped) location
        location: Location,
    },
}

impl Notification {
    /// Wire name of the notification kind
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::InitialLocations { .. } => "initial_locations",
            Notification::LocationUpdate { .. } => "location_update",
        }
    }

    /// Encode as a JSON text frame
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
