//! Unit tests for gdtn-sim.

use gdtn_core::{GeoPoint, GeoTemporalArea, NodeId, PacketId, SimConfig, Tick, TimeWindow};
use gdtn_predict::{NoOracle, PlannedRoute, Waypoint};
use gdtn_routing::{EpidemicPolicy, SprayPolicy};
use gdtn_store::ReplicaBudget;

use crate::movement::Movement;
use crate::{NoopObserver, SimBuilder, SimError, SimObserver};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn config(total_ticks: u64) -> SimConfig {
    SimConfig {
        start_unix_secs: 0,
        tick_duration_secs: 60,
        total_ticks,
        seed: 42,
        contact_range_m: 200.0,
        stats_interval_ticks: 0,
    }
}

fn area(min: (f32, f32), max: (f32, f32), start: u64, end: u64) -> GeoTemporalArea {
    GeoTemporalArea::new(
        GeoPoint::new(min.0, min.1),
        GeoPoint::new(max.0, max.1),
        TimeWindow { start: Tick(start), end: Tick(end) },
    )
    .unwrap()
}

fn route(waypoints: &[(f32, f32, u64)]) -> Movement {
    Movement::Route(
        PlannedRoute::new(
            waypoints
                .iter()
                .map(|&(lat, lon, tick)| Waypoint {
                    pos:  GeoPoint::new(lat, lon),
                    tick: Tick(tick),
                })
                .collect(),
        )
        .unwrap(),
    )
}

/// Records every delivery callback.
#[derive(Default)]
struct Recorder {
    deliveries: Vec<(Tick, NodeId, PacketId)>,
    snapshots:  usize,
}

impl SimObserver for Recorder {
    fn on_delivery(&mut self, tick: Tick, node: NodeId, packet: PacketId) {
        self.deliveries.push((tick, node, packet));
    }

    fn on_snapshot(&mut self, _tick: Tick, _stats: &[gdtn_routing::EngineStats], _occ: &[usize]) {
        self.snapshots += 1;
    }
}

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn movement_length_mismatch_is_an_error() {
        let positions = vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(1.0, 1.0)];
        let result = SimBuilder::new(config(10), positions, EpidemicPolicy, NoOracle)
            .movements(vec![Movement::Static])
            .build();
        assert!(matches!(
            result,
            Err(SimError::NodeCountMismatch { expected: 2, got: 1, .. })
        ));
    }

    #[test]
    fn zero_nodes_is_an_error() {
        let result = SimBuilder::new(config(10), vec![], EpidemicPolicy, NoOracle).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn originate_at_unknown_node_is_an_error() {
        let mut sim = SimBuilder::new(
            config(10),
            vec![GeoPoint::new(0.0, 0.0)],
            EpidemicPolicy,
            NoOracle,
        )
        .build()
        .unwrap();
        let result = sim.originate(NodeId(5), vec![1], area((1.0, 1.0), (2.0, 2.0), 0, 100), 5);
        assert!(matches!(result, Err(SimError::UnknownNode(NodeId(5)))));
    }
}

#[cfg(test)]
mod tick_tests {
    use super::*;

    #[test]
    fn static_nodes_in_range_exchange_on_first_tick() {
        // ~111 m apart, inside the 200 m contact range.
        let positions = vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.001, 0.0)];
        let mut sim = SimBuilder::new(config(5), positions, EpidemicPolicy, NoOracle)
            .build()
            .unwrap();

        let id = sim
            .originate(NodeId(0), vec![1, 2, 3], area((1.0, 1.0), (2.0, 2.0), 0, 1000), 5)
            .unwrap();
        sim.run(&mut NoopObserver).unwrap();

        assert!(sim.engines[1].queue().contains(id));
        assert_eq!(sim.stats(NodeId(1)).unwrap().stored, 1);
        assert_eq!(sim.stats(NodeId(0)).unwrap().replicated, 1);
    }

    #[test]
    fn out_of_range_nodes_never_exchange() {
        // ~11 km apart.
        let positions = vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.1, 0.0)];
        let mut sim = SimBuilder::new(config(5), positions, EpidemicPolicy, NoOracle)
            .build()
            .unwrap();

        sim.originate(NodeId(0), vec![1], area((1.0, 1.0), (2.0, 2.0), 0, 1000), 5)
            .unwrap();
        sim.run(&mut NoopObserver).unwrap();

        assert!(sim.engines[1].queue().is_empty());
    }

    #[test]
    fn route_movement_updates_positions() {
        let positions = vec![GeoPoint::new(0.0, 0.0)];
        let mut sim = SimBuilder::new(config(20), positions, EpidemicPolicy, NoOracle)
            .movements(vec![route(&[(0.0, 0.0, 0), (0.1, 0.0, 10)])])
            .build()
            .unwrap();

        sim.run_ticks(11, &mut NoopObserver).unwrap();
        assert!((sim.positions[0].lat - 0.1).abs() < 1e-4);
    }

    #[test]
    fn snapshots_fire_at_the_configured_interval() {
        let mut cfg = config(10);
        cfg.stats_interval_ticks = 2;
        let mut sim = SimBuilder::new(
            cfg,
            vec![GeoPoint::new(0.0, 0.0)],
            EpidemicPolicy,
            NoOracle,
        )
        .build()
        .unwrap();

        let mut recorder = Recorder::default();
        sim.run(&mut recorder).unwrap();
        // Ticks 0, 2, 4, 6, 8.
        assert_eq!(recorder.snapshots, 5);
    }
}

#[cfg(test)]
mod scenario_tests {
    use super::*;

    /// Binary spray end to end: A originates with budget 4, hands 2 to the
    /// ferry B, which later hands 1 to C inside the destination area; after
    /// the window elapses every queue is empty.
    #[test]
    fn spray_ferry_delivers_and_window_purge_clears_queues() {
        // C sits at the origin inside the destination rectangle; A is ~3 km
        // away; B ferries from A's position (reached at t=10) to C's
        // (reached at t=50).
        let dest = area((-0.0005, -0.0005), (0.0005, 0.0005), 0, 100);
        let positions = vec![
            GeoPoint::new(0.02, 0.02),  // A
            GeoPoint::new(0.05, 0.05),  // B (route start)
            GeoPoint::new(0.0, 0.0),    // C
        ];
        let movements = vec![
            Movement::Static,
            route(&[
                (0.05, 0.05, 0),
                (0.0201, 0.02, 10),
                (0.0001, 0.0, 50),
            ]),
            Movement::Static,
        ];

        let mut sim = SimBuilder::new(config(200), positions, SprayPolicy::binary(4), NoOracle)
            .movements(movements)
            .build()
            .unwrap();
        let id = sim
            .originate(NodeId(0), vec![0xab; 16], dest, 5)
            .unwrap();

        let mut recorder = Recorder::default();
        sim.run_ticks(60, &mut recorder).unwrap();

        // Exactly one delivery, at C.
        assert_eq!(recorder.deliveries.len(), 1);
        let (tick, node, packet) = recorder.deliveries[0];
        assert_eq!(node, NodeId(2));
        assert_eq!(packet, id);
        assert!(tick >= Tick(10) && tick <= Tick(50), "delivered at {tick}");

        // Budgets after both splits: A kept 2, B kept 1, C got 1.
        let budget = |n: usize| sim.engines[n].queue().get(id).unwrap().replicas;
        assert_eq!(budget(0), ReplicaBudget::Bounded(2));
        assert_eq!(budget(1), ReplicaBudget::Bounded(1));
        assert_eq!(budget(2), ReplicaBudget::Bounded(1));

        // Window elapses at t=100; by t=160 every copy is purged.
        sim.run_ticks(100, &mut recorder).unwrap();
        for n in 0..3 {
            assert!(sim.engines[n].queue().is_empty(), "node {n} still holds a copy");
            assert_eq!(sim.stats(NodeId(n as u32)).unwrap().expired, 1);
        }
    }

    /// Duplicate suppression across repeated contacts: the second meeting
    /// offers nothing because the sender remembers what the peer holds.
    #[test]
    fn recontact_does_not_resend() {
        // A static at the origin; B approaches twice (t=2 and t=6).
        let positions = vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.01, 0.0)];
        let movements = vec![
            Movement::Static,
            route(&[
                (0.01, 0.0, 0),
                (0.001, 0.0, 2),
                (0.01, 0.0, 4),
                (0.001, 0.0, 6),
                (0.001, 0.0, 8),
            ]),
        ];

        let mut sim = SimBuilder::new(config(10), positions, EpidemicPolicy, NoOracle)
            .movements(movements)
            .build()
            .unwrap();
        let id = sim
            .originate(NodeId(0), vec![1], area((1.0, 1.0), (2.0, 2.0), 0, 1000), 5)
            .unwrap();
        sim.run(&mut NoopObserver).unwrap();

        assert!(sim.engines[1].queue().contains(id));
        assert_eq!(sim.stats(NodeId(1)).unwrap().stored, 1);
        assert_eq!(sim.stats(NodeId(1)).unwrap().rejected_duplicate, 0);
        assert_eq!(sim.stats(NodeId(0)).unwrap().replicated, 1);
    }
}
