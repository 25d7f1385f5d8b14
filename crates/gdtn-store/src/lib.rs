//! `gdtn-store` — the carried-packet store.
//!
//! A node's [`PacketsQueue`] holds every data item it currently carries,
//! bounded by a maximum packet count and a payload-summary byte budget.
//! Insertion beyond a bound runs the eviction policy: the lowest-priority,
//! soonest-to-expire, fewest-replicas packet goes first, and a new packet
//! that ranks below every occupant is rejected rather than admitted.
//!
//! Rejections ([`RejectReason`]) are ordinary outcome values, not errors —
//! the caller observes them silently and moves on.

pub mod packet;
pub mod queue;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use packet::{CarriedPacket, ReplicaBudget};
pub use queue::{InsertOutcome, PacketsQueue, QueueConfig, RejectReason};
