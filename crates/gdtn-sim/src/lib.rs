//! `gdtn-sim` — tick loop driver for the geodtn framework.
//!
//! # Three-phase tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Movement  — every node's position is updated from its movement model
//!                 (parallel with the `parallel` feature).
//!   ② Contacts  — an R-tree range query finds all pairs within
//!                 contact_range_m; new pairs exchange summaries and
//!                 transfer packets in both directions, ongoing pairs
//!                 refresh freshness, ended pairs close their sessions.
//!   ③ Upkeep    — every engine purges expired packets, stale neighbors,
//!                 and aged duplicate records.
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Runs the movement phase on Rayon's thread pool.         |
//! | `fx-hash`  | FxHash for the per-tick contact pair set.               |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use gdtn_predict::NoOracle;
//! use gdtn_routing::SprayPolicy;
//! use gdtn_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(config, positions, SprayPolicy::binary(8), NoOracle)
//!     .movements(movements)
//!     .build()?;
//! sim.originate(NodeId(0), payload, area, 5)?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod movement;
pub mod observer;
pub mod sim;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use movement::Movement;
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
