//! # geotrack-rs
//!
//! Real-time location fan-out. Producers report where assets are, the latest
//! position per asset is kept in memory, and every change is pushed to live
//! subscribers whose tenant scope matches.
//!
//! ## Quick start
//!
//! ```no_run
//! use geotrack_rs::{ServerConfig, TrackerServer};
//!
//! #[tokio::main]
//! async fn main() -> geotrack_rs::Result<()> {
//!     let config = ServerConfig::default().simulate_devices(true);
//!     TrackerServer::new(config).run().await
//! }
//! ```
//!
//! ## Embedding without HTTP
//!
//! ```no_run
//! use geotrack_rs::{LocationReport, TenantScope, Tracker, TrackerConfig};
//!
//! # async fn demo() {
//! let (tracker, distributor) = Tracker::new(TrackerConfig::default());
//! let _handle = distributor.spawn();
//!
//! let mut subscription = tracker.subscribe(TenantScope::tenant("acme"));
//! tracker
//!     .submit(LocationReport::new("truck-7", 52.52, 13.40).tenant("acme"))
//!     .await
//!     .unwrap();
//!
//! let update = subscription.receiver.recv().await;
//! # }
//! ```

pub mod broadcast;
pub mod error;
pub mod location;
pub mod server;
pub mod simulator;
pub mod stats;
pub mod store;
pub mod tracker;

pub use broadcast::{Notification, TrackerConfig};
pub use error::{Error, Result};
pub use location::{Location, LocationReport, ReportError, TenantScope};
pub use server::{ServerConfig, TrackerServer};
pub use simulator::{DeviceSimulator, SimulatorConfig};
pub use tracker::{Tracker, TrackerSnapshot};
