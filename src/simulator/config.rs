//! Simulator configuration

use std::time::Duration;

/// A group of simulated devices belonging to one tenant
#[derive(Debug, Clone, PartialEq)]
pub struct Fleet {
    /// Tenant the devices report under
    pub tenant_id: String,
    /// Number of devices
    pub devices: usize,
}

impl Fleet {
    /// Create a fleet of `devices` for `tenant_id`
    pub fn new(tenant_id: impl Into<String>, devices: usize) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            devices,
        }
    }
}

/// Device simulator configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SimulatorConfig {
    /// Fleets to simulate
    pub fleets: Vec<Fleet>,

    /// Center of the simulated area (latitude, longitude)
    pub origin: (f64, f64),

    /// Maximum initial offset from the origin, in degrees
    pub spread: f64,

    /// Maximum movement per report, in degrees
    pub step: f64,

    /// Maximum simulated speed in km/h
    pub max_speed: f64,

    /// Shortest pause between two reports of one device
    pub min_interval: Duration,

    /// Longest pause between two reports of one device
    pub max_interval: Duration,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            fleets: vec![Fleet::new("uce-001", 5), Fleet::new("uce-002", 3)],
            // Quito
            origin: (-0.1807, -78.4678),
            spread: 0.1,
            step: 0.001,
            max_speed: 60.0,
            min_interval: Duration::from_secs(2),
            max_interval: Duration::from_secs(4),
        }
    }
}

impl SimulatorConfig {
    /// Replace the fleets
    pub fn fleets(mut self, fleets: Vec<Fleet>) -> Self {
        self.fleets = fleets;
        self
    }

    /// Add one fleet
    pub fn fleet(mut self, tenant_id: impl Into<String>, devices: usize) -> Self {
        self.fleets.push(Fleet::new(tenant_id, devices));
        self
    }

    /// Set the center of the simulated area
    pub fn origin(mut self, latitude: f64, longitude: f64) -> Self {
        self.origin = (latitude, longitude);
        self
    }

    /// Set the report interval range
    ///
    /// The bounds are swapped if given in the wrong order.
    pub fn interval(mut self, min: Duration, max: Duration) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        self.min_interval = min;
        self.max_interval = max;
        self
    }

    /// Total number of simulated devices
    pub fn device_count(&self) -> usize {
        self.fleets.iter().map(|fleet| fleet.devices).sum()
    }
}
