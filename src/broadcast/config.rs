//! Tracker configuration

/// Default capacity of the pending update queue
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

/// Default per-subscriber outbound buffer
pub const DEFAULT_SUBSCRIBER_BUFFER: usize = 64;

/// Configuration for the ingest and broadcast paths
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Updates that may wait for the distributor before new ones are dropped
    pub queue_capacity: usize,

    /// Notifications buffered per subscriber before it counts as lagging
    pub subscriber_buffer: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            subscriber_buffer: DEFAULT_SUBSCRIBER_BUFFER,
        }
    }
}

impl TrackerConfig {
    /// Set the pending update queue capacity (minimum 1)
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity.max(1);
        self
    }

    /// Set the per-subscriber outbound buffer (minimum 1)
    pub fn subscriber_buffer(mut self, size: usize) -> Self {
        self.subscriber_buffer = size.max(1);
        self
    }
}
