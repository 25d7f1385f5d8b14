//! `DisseminationEngine` — the per-node store-carry-forward state machine.
//!
//! # Contact session flow
//!
//! `Idle → ContactDetected → Exchanging → Transferring → Idle`, driven
//! entirely by the external contact-detection and transport collaborators:
//!
//! 1. [`start_exchange`][DisseminationEngine::start_exchange] — a neighbor
//!    came in range: record the contact, absorb its advertised summary,
//!    compute the ordered candidate batch, open a session.
//! 2. [`next_to_send`][DisseminationEngine::next_to_send] /
//!    [`commit_send`][DisseminationEngine::commit_send] — the transport
//!    pulls wire copies one at a time and confirms each delivery.  The
//!    handed budget is reserved the moment a wire is built, so sessions
//!    toward different peers draw from one shared allotment; a failed
//!    transfer restores its reservation.
//! 3. [`end_contact`][DisseminationEngine::end_contact] — the neighbor left
//!    range: the session is dropped, unconfirmed reservations are restored,
//!    nothing is retried.
//!
//! Each engine exclusively owns its neighbor table, queue, and duplicate
//! detector; engines interact only through [`PacketWire`] values moved by
//! the driver.

use std::collections::{HashMap, VecDeque};

use gdtn_contact::{DuplicateDetector, NeighborTable};
use gdtn_core::{GeoPoint, GeoTemporalArea, NodeId, PacketId, Tick};
use gdtn_predict::MovementOracle;
use gdtn_store::{
    CarriedPacket, InsertOutcome, PacketsQueue, QueueConfig, RejectReason, ReplicaBudget,
};

use crate::policy::ReplicationPolicy;
use crate::stats::EngineStats;
use crate::wire::PacketWire;
use crate::RoutingError;

// ── Configuration ─────────────────────────────────────────────────────────────

/// Per-engine tuning knobs.  The protocol variant is the combination of the
/// policy type parameter and the `relevance_gate`/`use_oracle` flags here.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineConfig {
    /// Ticks a neighbor entry survives without a renewed contact.
    pub neighbor_expiry_ticks: u64,
    /// Retention horizon for duplicate records.
    pub duplicate_horizon_ticks: u64,
    /// Maximum packets offered per contact; items beyond the cap wait for
    /// the next opportunity.
    pub contact_packet_budget: usize,
    /// Restricted epidemic: offer a packet only when the peer is predicted
    /// to reach its destination area.
    pub relevance_gate: bool,
    /// Order candidates by predicted area entry and count predicted entry
    /// as delivery relevance at receipt.
    pub use_oracle: bool,
    /// Capacity bounds for the carried-packet queue.
    pub queue: QueueConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::epidemic()
    }
}

impl EngineConfig {
    /// Plain flooding/epidemic: offer everything, no prediction.
    pub fn epidemic() -> Self {
        Self {
            neighbor_expiry_ticks: 30,
            duplicate_horizon_ticks: 600,
            contact_packet_budget: 16,
            relevance_gate: false,
            use_oracle: false,
            queue: QueueConfig::default(),
        }
    }

    /// Restricted epidemic: epidemic replication, but only toward peers
    /// predicted to reach the packet's area.
    pub fn restricted_epidemic() -> Self {
        Self {
            relevance_gate: true,
            ..Self::epidemic()
        }
    }

    /// Geo-temporal baseline: epidemic replication with oracle-ordered
    /// transmission and predicted-entry delivery relevance.
    pub fn geo_temporal() -> Self {
        Self {
            use_oracle: true,
            ..Self::epidemic()
        }
    }
}

// ── Outcomes ──────────────────────────────────────────────────────────────────

/// What happened to an inbound packet.
#[derive(Debug, PartialEq, Eq)]
pub enum ReceiveOutcome {
    /// This node is (or is predicted to be) inside the destination area
    /// within the window.  The packet is also retained for relay where
    /// capacity allows.
    Delivered,
    /// Accepted into the queue for further carrying.
    Stored,
    /// Refused; see the reason.  Never fatal.
    Rejected(RejectReason),
}

// ── Engine ────────────────────────────────────────────────────────────────────

/// One in-progress transfer toward a peer.
///
/// `in_flight` holds the budget reserved for each pulled-but-unconfirmed
/// wire; it is consumed by `commit_send` and restored on abort or contact
/// loss.
struct TransferSession {
    pending:   VecDeque<PacketId>,
    in_flight: HashMap<PacketId, ReplicaBudget>,
    opened:    Tick,
}

/// The dissemination state machine for one node.
pub struct DisseminationEngine<P: ReplicationPolicy> {
    node:       NodeId,
    config:     EngineConfig,
    policy:     P,
    neighbors:  NeighborTable,
    queue:      PacketsQueue,
    duplicates: DuplicateDetector,
    sessions:   HashMap<NodeId, TransferSession>,
    next_seq:   u32,
    stats:      EngineStats,
}

impl<P: ReplicationPolicy> DisseminationEngine<P> {
    pub fn new(node: NodeId, config: EngineConfig, policy: P) -> Self {
        let neighbors = NeighborTable::new(config.neighbor_expiry_ticks);
        let queue = PacketsQueue::new(config.queue.clone());
        Self {
            node,
            config,
            policy,
            neighbors,
            queue,
            duplicates: DuplicateDetector::new(),
            sessions: HashMap::new(),
            next_seq: 0,
            stats: EngineStats::default(),
        }
    }

    // ── Origination ───────────────────────────────────────────────────────

    /// Originate a new packet at this node.
    ///
    /// Fails only when the destination window has already fully elapsed.
    /// If the originator is itself inside the area the packet counts as
    /// delivered immediately; it is stored for relaying either way.
    pub fn originate(
        &mut self,
        summary: Vec<u8>,
        area: GeoTemporalArea,
        priority: u8,
        position: GeoPoint,
        now: Tick,
    ) -> Result<PacketId, RoutingError> {
        let window = area.window();
        if window.is_elapsed(now) {
            return Err(RoutingError::WindowElapsed {
                start: window.start,
                end:   window.end,
                now,
            });
        }

        let id = PacketId::new(self.node, self.next_seq);
        self.next_seq += 1;
        self.stats.originated += 1;

        if area.contains(position, now) {
            self.stats.delivered += 1;
        }

        let packet = CarriedPacket::new(
            id,
            self.node,
            now,
            area,
            summary,
            self.policy.initial_budget(),
            priority,
        );
        self.duplicates.mark_seen(id, now);
        let outcome = self.queue.try_insert(packet, now);
        self.account_insert(outcome);
        Ok(id)
    }

    // ── Contact sessions ──────────────────────────────────────────────────

    /// A neighbor came in range: record the contact, absorb its advertised
    /// id summary, and open a transfer session.
    ///
    /// Returns the ordered candidate batch (already capped at
    /// `contact_packet_budget`); the transport then pulls the items with
    /// [`next_to_send`][Self::next_to_send].
    pub fn start_exchange<O: MovementOracle + ?Sized>(
        &mut self,
        peer: NodeId,
        peer_summary: &[PacketId],
        predicted_position: Option<GeoPoint>,
        now: Tick,
        oracle: &O,
    ) -> Vec<PacketId> {
        self.neighbors.record_contact(peer, now, predicted_position);
        self.neighbors.record_summary(peer, peer_summary);

        let peer_predicted = self
            .neighbors
            .entry(peer)
            .and_then(|e| e.predicted_position);

        let neighbors = &self.neighbors;
        let policy = &self.policy;
        let relevance_gate = self.config.relevance_gate;
        let use_oracle = self.config.use_oracle;

        let exclude = |p: &CarriedPacket| {
            if neighbors.knows(peer, p.id) {
                return true;
            }
            if policy.on_forward(p.replicas).hands_nothing() {
                return true;
            }
            if relevance_gate {
                let predicted_inside =
                    peer_predicted.is_some_and(|pos| p.area.contains_point(pos));
                let will_enter = oracle.predict_area_entry(peer, &p.area).is_some();
                if !predicted_inside && !will_enter {
                    return true;
                }
            }
            false
        };
        let predicted_entry = |p: &CarriedPacket| {
            if use_oracle {
                oracle.predict_area_entry(peer, &p.area)
            } else {
                None
            }
        };

        let mut candidates = self.queue.select_for_neighbor(now, exclude, predicted_entry);
        candidates.truncate(self.config.contact_packet_budget);

        let session = TransferSession {
            pending:   candidates.iter().copied().collect(),
            in_flight: HashMap::new(),
            opened:    now,
        };
        // Reopening over a live session abandons it; give its unconfirmed
        // reservations back first.
        if let Some(old) = self.sessions.insert(peer, session) {
            for (id, handed) in old.in_flight {
                self.restore_reserved(id, handed);
            }
        }
        candidates
    }

    /// Pull the next wire copy for `peer`, or `None` when the session is
    /// drained (or was never opened).
    ///
    /// Skips packets that expired or entered the wait phase since the
    /// session opened.  The handed budget is deducted from the local copy
    /// here and held as the session's reservation, so a wire pulled for one
    /// peer can never be handed out again toward another; the reservation
    /// is finalized by [`commit_send`][Self::commit_send] and given back by
    /// [`abort_send`][Self::abort_send] or contact loss.
    pub fn next_to_send(&mut self, peer: NodeId, now: Tick) -> Option<PacketWire> {
        let session = self.sessions.get_mut(&peer)?;
        while let Some(id) = session.pending.pop_front() {
            let Some(packet) = self.queue.get(id) else {
                continue;
            };
            if packet.is_expired(now) {
                continue;
            }
            let split = self.policy.on_forward(packet.replicas);
            if split.hands_nothing() {
                continue;
            }
            let wire = PacketWire::from_packet(packet, split.handed);
            self.queue.set_replicas(id, split.kept);
            session.in_flight.insert(id, split.handed);
            self.queue.touch_forward_attempt(id, now);
            return Some(wire);
        }
        None
    }

    /// Transport confirmed `id` reached `peer`: the reservation made by
    /// [`next_to_send`][Self::next_to_send] becomes permanent and the peer
    /// is remembered as holding the packet.  A commit with no matching
    /// reservation is ignored.
    pub fn commit_send(&mut self, peer: NodeId, id: PacketId, _now: Tick) {
        let confirmed = self
            .sessions
            .get_mut(&peer)
            .is_some_and(|s| s.in_flight.remove(&id).is_some());
        if !confirmed {
            return;
        }
        self.neighbors.mark_known_held(peer, id);
        self.stats.replicated += 1;
    }

    /// Transport failed to deliver `id`: the reserved budget is added back
    /// to the local copy, and the next contact re-offers it.
    pub fn abort_send(&mut self, peer: NodeId, id: PacketId) {
        let handed = self
            .sessions
            .get_mut(&peer)
            .and_then(|s| s.in_flight.remove(&id));
        if let Some(handed) = handed {
            self.restore_reserved(id, handed);
        }
    }

    /// The peer refused `id`.  A duplicate refusal means the peer already
    /// holds the packet, which is worth remembering.
    pub fn note_peer_rejected(&mut self, peer: NodeId, id: PacketId, reason: RejectReason) {
        if reason == RejectReason::DuplicateId {
            self.neighbors.mark_known_held(peer, id);
        }
    }

    /// Refresh the contact freshness of an already-known neighbor without
    /// reopening an exchange.
    pub fn refresh_contact(&mut self, peer: NodeId, now: Tick) {
        self.neighbors.record_contact(peer, now, None);
    }

    /// The contact to `peer` was lost (or completed).  Unsent candidates
    /// remain queued, unconfirmed reservations are restored; no retry state
    /// is kept.
    pub fn end_contact(&mut self, peer: NodeId) {
        if let Some(session) = self.sessions.remove(&peer) {
            for (id, handed) in session.in_flight {
                self.restore_reserved(id, handed);
            }
        }
    }

    // ── Receive path ──────────────────────────────────────────────────────

    /// Process one inbound wire copy from `from`.
    ///
    /// An already-elapsed window is rejected outright and never marked
    /// seen.  A delivered packet is still retained for relay where capacity
    /// allows — `Delivered` takes precedence over any insertion refusal in
    /// the returned outcome, but refusals are still counted.
    pub fn receive<O: MovementOracle + ?Sized>(
        &mut self,
        from: NodeId,
        wire: PacketWire,
        position: GeoPoint,
        now: Tick,
        oracle: &O,
    ) -> ReceiveOutcome {
        // Whatever happens below, the sender evidently holds this packet.
        self.neighbors.mark_known_held(from, wire.id);

        if wire.area.is_expired(now) {
            self.stats.rejected_expired += 1;
            return ReceiveOutcome::Rejected(RejectReason::Expired);
        }
        if self.duplicates.already_seen(wire.id) {
            self.duplicates.mark_seen(wire.id, now);
            self.stats.rejected_duplicate += 1;
            return ReceiveOutcome::Rejected(RejectReason::DuplicateId);
        }
        self.duplicates.mark_seen(wire.id, now);

        let delivered = wire.area.contains(position, now)
            || (self.config.use_oracle
                && oracle.predict_area_entry(self.node, &wire.area).is_some());
        if delivered {
            self.stats.delivered += 1;
        }

        let outcome = self.queue.try_insert(wire.into_packet(), now);
        let refusal = self.account_insert(outcome);

        if delivered {
            ReceiveOutcome::Delivered
        } else {
            match refusal {
                None => ReceiveOutcome::Stored,
                Some(reason) => ReceiveOutcome::Rejected(reason),
            }
        }
    }

    // ── Periodic maintenance ──────────────────────────────────────────────

    /// Scheduling tick: purge expired packets, stale neighbors, and aged
    /// duplicate records.  Returns the ids of packets that expired.
    pub fn on_tick(&mut self, now: Tick) -> Vec<PacketId> {
        let expired = self.queue.purge_expired(now);
        self.stats.expired += expired.len() as u64;
        self.neighbors.purge_expired(now);
        self.duplicates
            .purge_older_than(now, self.config.duplicate_horizon_ticks);
        expired
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    pub fn queue(&self) -> &PacketsQueue {
        &self.queue
    }

    pub fn neighbors(&self) -> &NeighborTable {
        &self.neighbors
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// `true` iff a transfer session toward `peer` is open.
    pub fn has_session(&self, peer: NodeId) -> bool {
        self.sessions.contains_key(&peer)
    }

    /// Tick at which the session toward `peer` opened, if one is open.
    pub fn session_opened(&self, peer: NodeId) -> Option<Tick> {
        self.sessions.get(&peer).map(|s| s.opened)
    }

    /// The id summary this node advertises at contact start.
    pub fn summary(&self, now: Tick) -> Vec<PacketId> {
        self.queue.live_ids(now)
    }

    // ── Internals ─────────────────────────────────────────────────────────

    /// Give an unconfirmed reservation back to the local copy.  Dropped
    /// silently if the packet was purged in the meantime.
    fn restore_reserved(&mut self, id: PacketId, handed: ReplicaBudget) {
        if let Some(packet) = self.queue.get(id) {
            let restored = packet.replicas.plus(handed);
            self.queue.set_replicas(id, restored);
        }
    }

    /// Fold an insertion outcome into the stats counters; returns the
    /// refusal reason if the queue turned the packet away.
    fn account_insert(&mut self, outcome: InsertOutcome) -> Option<RejectReason> {
        match outcome {
            InsertOutcome::Accepted { evicted } => {
                self.stats.stored += 1;
                self.stats.evicted += evicted.len() as u64;
                None
            }
            InsertOutcome::Rejected(reason) => {
                match reason {
                    RejectReason::DuplicateId => self.stats.rejected_duplicate += 1,
                    RejectReason::Expired => self.stats.rejected_expired += 1,
                    RejectReason::CapacityExceededByLowerPriority => {
                        self.stats.rejected_capacity += 1;
                    }
                }
                Some(reason)
            }
        }
    }
}
