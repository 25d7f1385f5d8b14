//! `DuplicateDetector` — sliding record of already-processed packet ids.
//!
//! Serves two purposes in the engine:
//!
//! - refuse re-accepting a packet this node has already carried (and possibly
//!   since discarded), and
//! - avoid re-sending a packet to a neighbor known from a prior exchange to
//!   hold it (via the neighbor table's `known_held` sets, which this detector
//!   backs on the receive side).
//!
//! Records live independently of the packet's lifetime in the queue: a packet
//! may be evicted long before its duplicate record ages out.

use std::collections::HashMap;

use gdtn_core::{PacketId, Tick};

/// Set-semantics seen-record with per-id recency.
///
/// `mark_seen` is idempotent: marking an already-seen id only refreshes its
/// seen-time (recency-based eviction), never duplicates storage.
#[derive(Default)]
pub struct DuplicateDetector {
    seen: HashMap<PacketId, Tick>,
}

impl DuplicateDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` iff `id` has been marked and not yet aged out.
    #[inline]
    pub fn already_seen(&self, id: PacketId) -> bool {
        self.seen.contains_key(&id)
    }

    /// Record `id` as processed at `now`.  Refreshes the seen-time if the id
    /// is already present.
    #[inline]
    pub fn mark_seen(&mut self, id: PacketId, now: Tick) {
        self.seen.insert(id, now);
    }

    /// Drop all records whose seen-time is more than `horizon_ticks` before
    /// `now`.
    pub fn purge_older_than(&mut self, now: Tick, horizon_ticks: u64) {
        self.seen.retain(|_, &mut t| t + horizon_ticks >= now);
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
