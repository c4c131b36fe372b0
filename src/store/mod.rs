//! Latest-known-position store
//!
//! One [`Location`](crate::location::Location) per asset, replaced wholesale on
//! every update. Queries read from here directly; they never touch the
//! broadcast path.
//!
//! ```text
//!      UpdateIngest::submit()          GET /api/locations[/{id}]
//!               │                               │
//!               ▼                               ▼
//!   ┌─────────────────────────────────────────────────────┐
//!   │ LocationStore                                       │
//!   │   RwLock<HashMap<AssetId, Location>>                │
//!   │   upsert() = write lock    get()/get_all() = read   │
//!   └─────────────────────────────────────────────────────┘
//! ```

pub mod locations;

pub use locations::LocationStore;
