//! `gdtn-predict` — movement prediction and spatial lookup.
//!
//! The dissemination engine consumes this crate as a *prediction oracle*:
//! given a node's known waypoint route, will it enter a target geographic
//! area, and when?  The answer is only ever used to break forwarding ties or
//! prioritize transmission order — never to gate correctness.
//!
//! | Module     | Contents                                                |
//! |------------|---------------------------------------------------------|
//! | [`route`]  | `Waypoint`, `PlannedRoute` (piecewise-linear movement)  |
//! | [`oracle`] | `MovementOracle` trait, `RouteOracle`, `NoOracle`       |
//! | [`index`]  | `PositionIndex` — R-tree range queries over positions   |
//! | [`loader`] | CSV waypoint-route loading                              |

pub mod error;
pub mod index;
pub mod loader;
pub mod oracle;
pub mod route;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::PredictError;
pub use index::PositionIndex;
pub use loader::{load_routes_csv, load_routes_reader};
pub use oracle::{MovementOracle, NoOracle, RouteOracle};
pub use route::{PlannedRoute, Waypoint};
