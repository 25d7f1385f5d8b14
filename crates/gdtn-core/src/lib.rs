//! `gdtn-core` — foundational types for the `geodtn` dissemination framework.
//!
//! This crate is a dependency of every other `gdtn-*` crate.  It intentionally
//! has no `gdtn-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module       | Contents                                              |
//! |--------------|-------------------------------------------------------|
//! | [`ids`]      | `NodeId`, `PacketId`                                  |
//! | [`geo`]      | `GeoPoint`, haversine distance                        |
//! | [`area`]     | `TimeWindow`, `GeoTemporalArea`                       |
//! | [`time`]     | `Tick`, `SimClock`, `SimConfig`                       |
//! | [`rng`]      | `NodeRng` (per-node), `SimRng` (global)               |
//! | [`error`]    | `DtnError`, `DtnResult`                               |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod area;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use area::{GeoTemporalArea, TimeWindow};
pub use error::{DtnError, DtnResult};
pub use geo::GeoPoint;
pub use ids::{NodeId, PacketId};
pub use rng::{NodeRng, SimRng};
pub use time::{SimClock, SimConfig, Tick};
