//! `NeighborTable` — tracks which nodes are currently or recently in range.
//!
//! # Freshness model
//!
//! Every contact event refreshes the neighbor's expiry to
//! `now + expiry_ticks`.  An entry present in the table therefore implies a
//! contact within the configured expiry window.  Expired entries are removed
//! eagerly by [`purge_expired`][NeighborTable::purge_expired] (called each
//! scheduling tick) and excluded lazily by the read-only queries, so a stale
//! entry can never be observed as active even between purges.

use std::collections::{HashMap, HashSet};

use gdtn_core::{GeoPoint, NodeId, PacketId, Tick};

// ── NeighborEntry ─────────────────────────────────────────────────────────────

/// Per-neighbor contact state.
#[derive(Clone, Debug)]
pub struct NeighborEntry {
    /// Tick of the most recent contact event.
    pub last_contact: Tick,

    /// The entry is considered gone once this tick has passed.
    pub expires: Tick,

    /// Predicted future position reported at contact time, if any.  Used by
    /// the engine's relevance gate; refreshed only when a new prediction is
    /// supplied.
    pub predicted_position: Option<GeoPoint>,

    /// Packets this neighbor is known to hold, learned from summary
    /// exchanges and confirmed sends.  What `select_for_neighbor` subtracts.
    known_held: HashSet<PacketId>,
}

impl NeighborEntry {
    /// `true` iff the neighbor is known to hold `id`.
    #[inline]
    pub fn knows(&self, id: PacketId) -> bool {
        self.known_held.contains(&id)
    }

    /// Number of packets this neighbor is known to hold.
    pub fn known_count(&self) -> usize {
        self.known_held.len()
    }
}

// ── NeighborTable ─────────────────────────────────────────────────────────────

/// The set of neighbors a node has been in contact with recently.
pub struct NeighborTable {
    /// Ticks an entry survives without a renewed contact.
    expiry_ticks: u64,
    entries: HashMap<NodeId, NeighborEntry>,
}

impl NeighborTable {
    pub fn new(expiry_ticks: u64) -> Self {
        Self {
            expiry_ticks,
            entries: HashMap::new(),
        }
    }

    // ── Mutating operations ───────────────────────────────────────────────

    /// Insert or refresh the entry for `neighbor`, resetting its expiry to
    /// `now + expiry_ticks`.
    ///
    /// A `predicted_position` of `None` leaves any earlier prediction in
    /// place — contact refreshes without new movement information must not
    /// erase what the last full contact reported.
    pub fn record_contact(
        &mut self,
        neighbor: NodeId,
        now: Tick,
        predicted_position: Option<GeoPoint>,
    ) {
        let entry = self.entries.entry(neighbor).or_insert(NeighborEntry {
            last_contact: now,
            expires: now,
            predicted_position: None,
            known_held: HashSet::new(),
        });
        entry.last_contact = now;
        entry.expires = now + self.expiry_ticks;
        if predicted_position.is_some() {
            entry.predicted_position = predicted_position;
        }
    }

    /// Remove and return all entries whose expiry has passed, sorted by id
    /// for deterministic iteration by callers.
    pub fn purge_expired(&mut self, now: Tick) -> Vec<NodeId> {
        let mut gone: Vec<NodeId> = self
            .entries
            .iter()
            .filter(|(_, e)| e.expires < now)
            .map(|(&id, _)| id)
            .collect();
        gone.sort_unstable();
        for id in &gone {
            self.entries.remove(id);
        }
        gone
    }

    /// Record that `neighbor` holds `id` (confirmed send or summary entry).
    ///
    /// No-op if the neighbor has no entry — knowledge about a node we have
    /// never contacted is useless and would leak memory.
    pub fn mark_known_held(&mut self, neighbor: NodeId, id: PacketId) {
        if let Some(entry) = self.entries.get_mut(&neighbor) {
            entry.known_held.insert(id);
        }
    }

    /// Record a whole summary (the id list a neighbor advertised at contact
    /// start).
    pub fn record_summary(&mut self, neighbor: NodeId, ids: &[PacketId]) {
        if let Some(entry) = self.entries.get_mut(&neighbor) {
            entry.known_held.extend(ids.iter().copied());
        }
    }

    // ── Read-only queries ─────────────────────────────────────────────────

    /// `true` iff an entry exists and has not expired as of `now`.
    pub fn is_active_neighbor(&self, neighbor: NodeId, now: Tick) -> bool {
        self.entries
            .get(&neighbor)
            .is_some_and(|e| e.expires >= now)
    }

    /// All unexpired neighbors, most recent contact first (tie-break: lower
    /// id first).  Read-only — expired entries are excluded without being
    /// removed.
    ///
    /// The ordering is the transmission-order tie-break when bandwidth per
    /// contact is limited.
    pub fn active_neighbors(&self, now: Tick) -> Vec<NodeId> {
        let mut active: Vec<(Tick, NodeId)> = self
            .entries
            .iter()
            .filter(|(_, e)| e.expires >= now)
            .map(|(&id, e)| (e.last_contact, id))
            .collect();
        active.sort_unstable_by_key(|&(last, id)| (std::cmp::Reverse(last), id));
        active.into_iter().map(|(_, id)| id).collect()
    }

    /// `true` iff `neighbor` is known to hold `id`.
    pub fn knows(&self, neighbor: NodeId, id: PacketId) -> bool {
        self.entries.get(&neighbor).is_some_and(|e| e.knows(id))
    }

    /// The entry for `neighbor`, expired or not.
    pub fn entry(&self, neighbor: NodeId) -> Option<&NeighborEntry> {
        self.entries.get(&neighbor)
    }

    /// Total entries, including not-yet-purged expired ones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
