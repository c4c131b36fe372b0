//! HTTP and WebSocket transport
//!
//! Thin adapters over [`Tracker`](crate::tracker::Tracker): the REST routes
//! are producers and point queries, `/ws` turns a connection into a scoped
//! subscriber.
//!
//! | Route                       | Purpose                                 |
//! |-----------------------------|-----------------------------------------|
//! | `GET  /api/health`          | Liveness                                |
//! | `GET  /api/stats`           | Counters and sizes                      |
//! | `GET  /api/locations`       | Latest locations of `?tenantId=`        |
//! | `GET  /api/locations/{id}`  | Latest location of one asset            |
//! | `POST /api/locations`       | Submit a report                         |
//! | `GET  /ws`                  | Live feed, all tenants or `?tenantId=`  |

pub mod config;
pub mod error;
pub mod handlers;
pub mod listener;
pub mod routes;
pub mod state;
pub mod websocket;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use listener::TrackerServer;
pub use routes::router;
pub use state::AppState;
