//! `gdtn-routing` — replication policies and the dissemination engine.
//!
//! One engine, many protocols: the flooding/epidemic, restricted-epidemic,
//! spray-and-wait, and geo-temporal variants differ only in the
//! [`ReplicationPolicy`] type parameter and two [`EngineConfig`] flags
//! (`relevance_gate`, `use_oracle`).
//!
//! | Module     | Contents                                                  |
//! |------------|-----------------------------------------------------------|
//! | [`policy`] | `ReplicationPolicy`, `EpidemicPolicy`, `SprayPolicy`      |
//! | [`engine`] | `DisseminationEngine`, `EngineConfig`, `ReceiveOutcome`   |
//! | [`wire`]   | `PacketWire` — the transfer copy that crosses a contact   |
//! | [`stats`]  | `EngineStats` counters                                    |
//! | [`error`]  | `RoutingError`                                            |

pub mod engine;
pub mod error;
pub mod policy;
pub mod stats;
pub mod wire;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use engine::{DisseminationEngine, EngineConfig, ReceiveOutcome};
pub use error::RoutingError;
pub use policy::{EpidemicPolicy, ForwardSplit, ReplicationPolicy, SprayMode, SprayPolicy};
pub use stats::EngineStats;
pub use wire::PacketWire;
