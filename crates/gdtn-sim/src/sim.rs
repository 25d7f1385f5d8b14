//! The `Sim` struct and its tick loop.

use gdtn_core::{GeoPoint, GeoTemporalArea, NodeId, NodeRng, PacketId, SimClock, SimConfig, Tick};
use gdtn_predict::{MovementOracle, PositionIndex};
use gdtn_routing::{DisseminationEngine, EngineStats, ReceiveOutcome, ReplicationPolicy};

use crate::movement::Movement;
use crate::{SimError, SimObserver, SimResult};

#[cfg(feature = "fx-hash")]
type PairSet = rustc_hash::FxHashSet<(NodeId, NodeId)>;
#[cfg(not(feature = "fx-hash"))]
type PairSet = std::collections::HashSet<(NodeId, NodeId)>;

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<P, O>` holds all per-node state and drives the three-phase tick loop:
///
/// 1. **Movement**: every node's position is updated from its movement model
///    (parallel with the `parallel` feature — each model touches only its
///    own position and RNG).
/// 2. **Contact detection**: an R-tree over the new positions yields all
///    pairs within `config.contact_range_m`.  Pairs are diffed against the
///    previous tick's set: new pairs run a full summary exchange and
///    transfer in both directions, ongoing pairs refresh contact freshness,
///    ended pairs close their sessions.
/// 3. **Maintenance**: every engine purges expired packets, stale neighbors,
///    and aged duplicate records.
///
/// Pairs are processed in ascending `(NodeId, NodeId)` order, so a run is
/// fully determined by the config seed.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<P: ReplicationPolicy, O: MovementOracle> {
    /// Global configuration (total ticks, seed, contact range, …).
    pub config: SimConfig,

    /// Simulation clock — tracks the current tick and maps to wall time.
    pub clock: SimClock,

    /// One dissemination engine per node, indexed by `NodeId`.
    pub engines: Vec<DisseminationEngine<P>>,

    /// Current node positions, indexed by `NodeId`.
    pub positions: Vec<GeoPoint>,

    /// Per-node movement models, indexed by `NodeId`.
    pub movements: Vec<Movement>,

    /// Per-node deterministic RNGs (random-walk movement only).
    pub rngs: Vec<NodeRng>,

    /// The shared movement-prediction oracle, read-only for all engines.
    pub oracle: O,

    /// Node pairs that were in contact last tick, canonicalized `a < b`.
    pub(crate) contacts: PairSet,
}

impl<P: ReplicationPolicy, O: MovementOracle> Sim<P, O> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run the simulation from the current tick to `config.end_tick()`.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<Ob: SimObserver>(&mut self, observer: &mut Ob) -> SimResult<()> {
        loop {
            let now = self.clock.current_tick;
            if now >= self.config.end_tick() {
                break;
            }

            observer.on_tick_start(now);
            let active = self.process_tick(now, observer);
            observer.on_tick_end(now, active);
            if self.config.stats_interval_ticks > 0
                && now.0.is_multiple_of(self.config.stats_interval_ticks)
            {
                self.emit_snapshot(now, observer);
            }

            self.clock.advance();
        }
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<Ob: SimObserver>(&mut self, n: u64, observer: &mut Ob) -> SimResult<()> {
        for _ in 0..n {
            let now = self.clock.current_tick;
            observer.on_tick_start(now);
            let active = self.process_tick(now, observer);
            observer.on_tick_end(now, active);
            if self.config.stats_interval_ticks > 0
                && now.0.is_multiple_of(self.config.stats_interval_ticks)
            {
                self.emit_snapshot(now, observer);
            }
            self.clock.advance();
        }
        Ok(())
    }

    /// Originate a packet at `node` this tick.
    pub fn originate(
        &mut self,
        node: NodeId,
        summary: Vec<u8>,
        area: GeoTemporalArea,
        priority: u8,
    ) -> SimResult<PacketId> {
        let idx = node.index();
        if idx >= self.engines.len() {
            return Err(SimError::UnknownNode(node));
        }
        let now = self.clock.current_tick;
        let position = self.positions[idx];
        let id = self.engines[idx].originate(summary, area, priority, position, now)?;
        Ok(id)
    }

    pub fn node_count(&self) -> usize {
        self.engines.len()
    }

    /// Cumulative counters for one node's engine.
    pub fn stats(&self, node: NodeId) -> Option<EngineStats> {
        self.engines.get(node.index()).map(|e| e.stats())
    }

    // ── Core tick processing ──────────────────────────────────────────────

    /// Run one tick; returns the number of active contact pairs.
    fn process_tick<Ob: SimObserver>(&mut self, now: Tick, observer: &mut Ob) -> usize {
        self.move_nodes(now);

        // ── Phase 2: contact detection ────────────────────────────────────
        //
        // R-tree built once per tick; every pair appears exactly once,
        // canonicalized (a, b) with a < b.
        let index = PositionIndex::build(&self.positions);
        let mut current = PairSet::default();
        for (i, &pos) in self.positions.iter().enumerate() {
            let a = NodeId(i as u32);
            for b in index.within_range(pos, self.config.contact_range_m) {
                if b > a {
                    current.insert((a, b));
                }
            }
        }
        let active = current.len();

        // Diff against last tick's pair set.  Sorted processing keeps runs
        // reproducible regardless of hash iteration order.
        let mut ended: Vec<(NodeId, NodeId)> =
            self.contacts.difference(&current).copied().collect();
        ended.sort_unstable();
        let mut started: Vec<(NodeId, NodeId)> =
            current.difference(&self.contacts).copied().collect();
        started.sort_unstable();
        let mut ongoing: Vec<(NodeId, NodeId)> =
            current.intersection(&self.contacts).copied().collect();
        ongoing.sort_unstable();

        let engines = &mut self.engines;
        let positions = &self.positions;
        let oracle = &self.oracle;

        for (a, b) in ended {
            engines[a.index()].end_contact(b);
            engines[b.index()].end_contact(a);
        }
        for (a, b) in started {
            run_transfer(engines, a, b, positions[b.index()], now, oracle, observer);
            run_transfer(engines, b, a, positions[a.index()], now, oracle, observer);
        }
        for (a, b) in ongoing {
            engines[a.index()].refresh_contact(b, now);
            engines[b.index()].refresh_contact(a, now);
        }
        self.contacts = current;

        // ── Phase 3: per-engine maintenance ───────────────────────────────
        for engine in self.engines.iter_mut() {
            engine.on_tick(now);
        }

        active
    }

    /// Phase 1: update every node's position from its movement model.
    fn move_nodes(&mut self, now: Tick) {
        #[cfg(not(feature = "parallel"))]
        {
            for ((pos, movement), rng) in self
                .positions
                .iter_mut()
                .zip(self.movements.iter())
                .zip(self.rngs.iter_mut())
            {
                *pos = movement.position_at(*pos, now, rng);
            }
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            self.positions
                .par_iter_mut()
                .zip(self.movements.par_iter())
                .zip(self.rngs.par_iter_mut())
                .for_each(|((pos, movement), rng)| {
                    *pos = movement.position_at(*pos, now, rng);
                });
        }
    }

    fn emit_snapshot<Ob: SimObserver>(&mut self, now: Tick, observer: &mut Ob) {
        let stats: Vec<EngineStats> = self.engines.iter().map(|e| e.stats()).collect();
        let occupancy: Vec<usize> = self
            .engines
            .iter()
            .map(|e| e.queue().occupancy(now))
            .collect();
        observer.on_snapshot(now, &stats, &occupancy);
    }
}

// ── Transfer helper ───────────────────────────────────────────────────────────

/// Run one direction of a fresh contact: `src` exchanges summaries with
/// `dst`, then pushes its candidate batch packet by packet.
///
/// Each packet transfer is atomic — the sender's split is applied only once
/// the receiver has accepted (or delivered) the copy.
fn run_transfer<P, O, Ob>(
    engines: &mut [DisseminationEngine<P>],
    src: NodeId,
    dst: NodeId,
    dst_pos: GeoPoint,
    now: Tick,
    oracle: &O,
    observer: &mut Ob,
) where
    P: ReplicationPolicy,
    O: MovementOracle,
    Ob: SimObserver,
{
    let (a, b) = (src.index(), dst.index());
    let (src_e, dst_e) = if a < b {
        let (lo, hi) = engines.split_at_mut(b);
        (&mut lo[a], &mut hi[0])
    } else {
        let (lo, hi) = engines.split_at_mut(a);
        (&mut hi[0], &mut lo[b])
    };

    let summary = dst_e.summary(now);
    src_e.start_exchange(dst, &summary, Some(dst_pos), now, oracle);

    while let Some(wire) = src_e.next_to_send(dst, now) {
        let id = wire.id;
        match dst_e.receive(src, wire, dst_pos, now, oracle) {
            ReceiveOutcome::Delivered => {
                src_e.commit_send(dst, id, now);
                observer.on_delivery(now, dst, id);
            }
            ReceiveOutcome::Stored => src_e.commit_send(dst, id, now),
            ReceiveOutcome::Rejected(reason) => {
                src_e.abort_send(dst, id);
                src_e.note_peer_rejected(dst, id, reason);
            }
        }
    }
    src_e.end_contact(dst);
}
