//! `PacketsQueue` — the bounded carried-packet store and its eviction policy.
//!
//! # Capacity model
//!
//! Two bounds, both configurable: a maximum live packet count and a maximum
//! total of payload-summary bytes.  Logically expired packets count toward
//! neither — they are dead weight awaiting the next purge and are never
//! forwarded.
//!
//! # Eviction policy
//!
//! When an insertion would exceed a bound, live occupants are ranked
//! ascending by `(priority, time_remaining, replicas_remaining)` with ties
//! broken by oldest creation tick: the least valuable packet is evicted
//! first.  The incoming packet competes under the same ranking — if it ranks
//! at or below every occupant it is rejected instead, so the queue never
//! displaces content to admit a strictly worse item.

use std::cmp::Reverse;
use std::collections::BTreeMap;

use gdtn_core::{PacketId, Tick};

use crate::packet::CarriedPacket;
use crate::ReplicaBudget;

// ── Configuration ─────────────────────────────────────────────────────────────

/// Capacity bounds for one node's queue.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QueueConfig {
    /// Maximum number of live packets.
    pub max_packets: usize,
    /// Maximum total payload-summary bytes across live packets.
    pub max_summary_bytes: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_packets: 64,
            max_summary_bytes: 64 * 1024,
        }
    }
}

// ── Outcomes ──────────────────────────────────────────────────────────────────

/// Why an insertion was refused.  All recoverable; never fatal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RejectReason {
    /// A packet with this id is already stored.
    DuplicateId,
    /// The destination window had fully elapsed at insertion time.
    Expired,
    /// The queue is full and every occupant outranks the new packet.
    CapacityExceededByLowerPriority,
}

/// Result of [`PacketsQueue::try_insert`].
#[derive(Debug, PartialEq, Eq)]
pub enum InsertOutcome {
    /// Stored; `evicted` lists any occupants displaced to make room.
    Accepted { evicted: Vec<PacketId> },
    Rejected(RejectReason),
}

impl InsertOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, InsertOutcome::Accepted { .. })
    }
}

// ── PacketsQueue ──────────────────────────────────────────────────────────────

/// Eviction rank: ascending lexicographic order, lowest rank evicted first.
type EvictKey = (u8, u64, u64, u64);

fn evict_key(p: &CarriedPacket, now: Tick) -> EvictKey {
    (
        p.priority,
        p.time_remaining(now),
        p.replicas.rank(),
        p.created.0,
    )
}

/// The set of packets one node currently carries, keyed by id.
///
/// `BTreeMap` keeps iteration order deterministic across runs.
pub struct PacketsQueue {
    config: QueueConfig,
    packets: BTreeMap<PacketId, CarriedPacket>,
}

impl PacketsQueue {
    pub fn new(config: QueueConfig) -> Self {
        Self {
            config,
            packets: BTreeMap::new(),
        }
    }

    // ── Insertion & eviction ──────────────────────────────────────────────

    /// Try to store `packet`, evicting lower-ranked occupants if a capacity
    /// bound would be exceeded.
    pub fn try_insert(&mut self, packet: CarriedPacket, now: Tick) -> InsertOutcome {
        if self.packets.contains_key(&packet.id) {
            return InsertOutcome::Rejected(RejectReason::DuplicateId);
        }
        if packet.is_expired(now) {
            return InsertOutcome::Rejected(RejectReason::Expired);
        }

        let candidate_key = evict_key(&packet, now);
        let mut evicted = Vec::new();

        while self.over_capacity_with(&packet, now) {
            let victim = match self.lowest_ranked_live(now) {
                // Only expired occupants remain yet the bound is still
                // exceeded: the candidate alone does not fit.
                None => {
                    self.restore(evicted);
                    return InsertOutcome::Rejected(RejectReason::CapacityExceededByLowerPriority);
                }
                Some((id, key)) => {
                    if candidate_key <= key {
                        // The new packet is the lowest-ranked item of all —
                        // reject it rather than displace better content.
                        self.restore(evicted);
                        return InsertOutcome::Rejected(
                            RejectReason::CapacityExceededByLowerPriority,
                        );
                    }
                    id
                }
            };
            let packet = self.packets.remove(&victim);
            debug_assert!(packet.is_some());
            evicted.push((victim, packet));
        }

        self.packets.insert(packet.id, packet);
        InsertOutcome::Accepted {
            evicted: evicted.into_iter().map(|(id, _)| id).collect(),
        }
    }

    /// `true` iff storing `candidate` on top of the current live occupants
    /// would exceed a bound.
    fn over_capacity_with(&self, candidate: &CarriedPacket, now: Tick) -> bool {
        self.occupancy(now) + 1 > self.config.max_packets
            || self.summary_bytes(now) + candidate.summary_len() > self.config.max_summary_bytes
    }

    /// The live occupant with the lowest eviction rank, if any.
    fn lowest_ranked_live(&self, now: Tick) -> Option<(PacketId, EvictKey)> {
        self.packets
            .values()
            .filter(|p| !p.is_expired(now))
            .map(|p| (p.id, evict_key(p, now)))
            .min_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)))
    }

    /// Put tentatively evicted packets back after a rejected insertion.
    fn restore(&mut self, evicted: Vec<(PacketId, Option<CarriedPacket>)>) {
        for (id, packet) in evicted {
            if let Some(p) = packet {
                self.packets.insert(id, p);
            }
        }
    }

    // ── Forwarding candidates ─────────────────────────────────────────────

    /// Produce the ordered forwarding candidate list for one neighbor.
    ///
    /// Includes every live packet with forwardable budget that `exclude`
    /// does not filter out (the engine closes over the neighbor's known-held
    /// set and any relevance gate).  Ordering: priority descending, then
    /// `predicted_entry` ascending (sooner predicted area entry first, no
    /// prediction last), then remaining-time-to-expiry ascending (most
    /// urgent first), then id for determinism.
    pub fn select_for_neighbor(
        &self,
        now: Tick,
        exclude: impl Fn(&CarriedPacket) -> bool,
        predicted_entry: impl Fn(&CarriedPacket) -> Option<Tick>,
    ) -> Vec<PacketId> {
        let mut candidates: Vec<(Reverse<u8>, u64, u64, PacketId)> = self
            .packets
            .values()
            .filter(|p| !p.is_expired(now) && !p.replicas.is_exhausted() && !exclude(p))
            .map(|p| {
                let entry_rank = predicted_entry(p).map_or(u64::MAX, |t| t.0);
                (Reverse(p.priority), entry_rank, p.time_remaining(now), p.id)
            })
            .collect();
        candidates.sort_unstable();
        candidates.into_iter().map(|(_, _, _, id)| id).collect()
    }

    // ── Replica accounting ────────────────────────────────────────────────

    /// Overwrite a packet's budget.  The sole budget-update entry point:
    /// the engine applies policy splits and restores aborted reservations
    /// through it.  Returns `false` if the packet is not stored.
    pub fn set_replicas(&mut self, id: PacketId, budget: ReplicaBudget) -> bool {
        match self.packets.get_mut(&id) {
            Some(p) => {
                p.replicas = budget;
                true
            }
            None => false,
        }
    }

    /// Record a forward attempt for `id` at `now`.
    pub fn touch_forward_attempt(&mut self, id: PacketId, now: Tick) {
        if let Some(p) = self.packets.get_mut(&id) {
            p.last_forward_attempt = Some(now);
        }
    }

    // ── Removal ───────────────────────────────────────────────────────────

    /// Remove and return one packet.
    pub fn remove(&mut self, id: PacketId) -> Option<CarriedPacket> {
        self.packets.remove(&id)
    }

    /// Evict every packet whose destination window has fully elapsed.
    /// Returns their ids in ascending order.
    pub fn purge_expired(&mut self, now: Tick) -> Vec<PacketId> {
        let expired: Vec<PacketId> = self
            .packets
            .values()
            .filter(|p| p.is_expired(now))
            .map(|p| p.id)
            .collect();
        for id in &expired {
            self.packets.remove(id);
        }
        expired
    }

    // ── Queries ───────────────────────────────────────────────────────────

    #[inline]
    pub fn contains(&self, id: PacketId) -> bool {
        self.packets.contains_key(&id)
    }

    pub fn get(&self, id: PacketId) -> Option<&CarriedPacket> {
        self.packets.get(&id)
    }

    /// Ids of all live packets, ascending (the summary advertised to peers).
    pub fn live_ids(&self, now: Tick) -> Vec<PacketId> {
        self.packets
            .values()
            .filter(|p| !p.is_expired(now))
            .map(|p| p.id)
            .collect()
    }

    /// Number of live packets as of `now` — what the capacity bound applies to.
    pub fn occupancy(&self, now: Tick) -> usize {
        self.packets.values().filter(|p| !p.is_expired(now)).count()
    }

    /// Total payload-summary bytes across live packets.
    pub fn summary_bytes(&self, now: Tick) -> usize {
        self.packets
            .values()
            .filter(|p| !p.is_expired(now))
            .map(|p| p.summary_len())
            .sum()
    }

    /// Stored packet count, including not-yet-purged expired ones.
    pub fn len(&self) -> usize {
        self.packets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CarriedPacket> {
        self.packets.values()
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }
}
