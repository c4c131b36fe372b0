//! Update ingest and tenant-scoped fan-out
//!
//! Producers hand updates to [`UpdateIngest`], which writes the store and
//! queues the update on a bounded channel without waiting. A single
//! [`Distributor`] drains that channel in order and pushes each update to the
//! subscribers in the [`SubscriberRegistry`] whose scope matches.
//!
//! # Architecture
//!
//! ```text
//!   [Producer]   [Producer]   POST /api/locations
//!        │            │              │
//!        └────────────┼──────────────┘
//!                     ▼
//!              UpdateIngest::submit()
//!                │            │
//!      upsert()  │            │ try_send()  (full ⇒ drop + count)
//!                ▼            ▼
//!        LocationStore   mpsc::channel(queue_capacity)
//!                             │
//!                             ▼
//!                       Distributor (one task, FIFO)
//!                             │ snapshot()
//!                             ▼
//!                    SubscriberRegistry
//!            ┌────────────────┼────────────────┐
//!            ▼                ▼                ▼
//!      [scope = x]       [scope = y]      [scope = *]
//!      try_deliver()     (skipped)        try_deliver()
//!            │                                 │
//!            └──► per-subscriber mpsc ──► WebSocket writer
//! ```
//!
//! # Loss model
//!
//! The store is never skipped. Notifications can be lost in two places: at
//! the pending queue when it is full, and at a subscriber's own buffer when
//! that subscriber falls behind. Both are counted in
//! [`TrackerStats`](crate::stats::TrackerStats). A subscriber whose writer has
//! gone away is removed on the next delivery attempt.

pub mod config;
pub mod distributor;
pub mod ingest;
pub mod notification;
pub mod registry;

pub use config::TrackerConfig;
pub use distributor::Distributor;
pub use ingest::UpdateIngest;
pub use notification::Notification;
pub use registry::{DeliveryError, Subscriber, SubscriberId, SubscriberRegistry, Subscription};
