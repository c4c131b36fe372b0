//! Server configuration

use std::net::{Ipv4Addr, SocketAddr};

use crate::broadcast::TrackerConfig;
use crate::simulator::SimulatorConfig;

/// Default listen port
pub const DEFAULT_PORT: u16 = 3009;

/// Server configuration options
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub bind_addr: SocketAddr,

    /// Maximum concurrent WebSocket subscribers (0 = unlimited)
    pub max_subscribers: usize,

    /// Run the device simulator alongside the server
    pub simulate_devices: bool,

    /// Queue and buffer sizes for the broadcast path
    pub tracker: TrackerConfig,

    /// Fleets and timing for the device simulator
    pub simulator: SimulatorConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from((Ipv4Addr::UNSPECIFIED, DEFAULT_PORT)),
            max_subscribers: 0, // Unlimited
            simulate_devices: false,
            tracker: TrackerConfig::default(),
            simulator: SimulatorConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Create a new config with custom bind address
    pub fn with_addr(addr: SocketAddr) -> Self {
        Self {
            bind_addr: addr,
            ..Default::default()
        }
    }

    /// Set the bind address
    pub fn bind(mut self, addr: SocketAddr) -> Self {
        self.bind_addr = addr;
        self
    }

    /// Set maximum concurrent subscribers
    pub fn max_subscribers(mut self, max: usize) -> Self {
        self.max_subscribers = max;
        self
    }

    /// Enable or disable the device simulator
    pub fn simulate_devices(mut self, enabled: bool) -> Self {
        self.simulate_devices = enabled;
        self
    }

    /// Set the tracker configuration
    pub fn tracker(mut self, tracker: TrackerConfig) -> Self {
        self.tracker = tracker;
        self
    }

    /// Set the simulator configuration
    pub fn simulator(mut self, simulator: SimulatorConfig) -> Self {
        self.simulator = simulator;
        self
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();

        assert_eq!(config.bind_addr.port(), 3009);
        assert!(config.bind_addr.ip().is_unspecified());
        assert_eq!(config.max_subscribers, 0);
        assert!(!config.simulate_devices);
        assert_eq!(config.tracker, TrackerConfig::default());
    }

    #[test]
    fn test_with_addr() {
        let addr: SocketAddr = "127.0.0.1:4000".parse().unwrap();
        let config = ServerConfig::with_addr(addr);

        assert_eq!(config.bind_addr.port(), 4000);
    }

    #[test]
    fn test_builder_chaining() {
        let addr: SocketAddr = "127.0.0.1:3010".parse().unwrap();
        let config = ServerConfig::default()
            .bind(addr)
            .max_subscribers(10)
            .simulate_devices(true)
            .tracker(TrackerConfig::default().queue_capacity(5))
            .simulator(
                SimulatorConfig::default()
                    .interval(Duration::from_millis(1), Duration::from_millis(2)),
            );

        assert_eq!(config.bind_addr, addr);
        assert_eq!(config.max_subscribers, 10);
        assert!(config.simulate_devices);
        assert_eq!(config.tracker.queue_capacity, 5);
        assert_eq!(config.simulator.max_interval, Duration::from_millis(2));
    }
}
