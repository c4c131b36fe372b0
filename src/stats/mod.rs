//! Tracker statistics

pub mod metrics;

pub use metrics::{StatsSnapshot, TrackerStats};
