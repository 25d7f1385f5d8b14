//! Unit tests for gdtn-routing.

use gdtn_core::{GeoPoint, GeoTemporalArea, NodeId, Tick, TimeWindow};
use gdtn_predict::NoOracle;
use gdtn_store::{RejectReason, ReplicaBudget};

use crate::engine::{DisseminationEngine, EngineConfig, ReceiveOutcome};
use crate::policy::{EpidemicPolicy, ReplicationPolicy, SprayPolicy};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Rectangle (0,0)-(10,10), window [0, 100].
fn test_area() -> GeoTemporalArea {
    GeoTemporalArea::new(
        GeoPoint::new(0.0, 0.0),
        GeoPoint::new(10.0, 10.0),
        TimeWindow { start: Tick(0), end: Tick(100) },
    )
    .unwrap()
}

fn inside() -> GeoPoint {
    GeoPoint::new(5.0, 5.0)
}

fn outside() -> GeoPoint {
    GeoPoint::new(20.0, 20.0)
}

fn epidemic_engine(node: u32) -> DisseminationEngine<EpidemicPolicy> {
    DisseminationEngine::new(NodeId(node), EngineConfig::epidemic(), EpidemicPolicy)
}

fn spray_engine(node: u32, initial: u32) -> DisseminationEngine<SprayPolicy> {
    DisseminationEngine::new(
        NodeId(node),
        EngineConfig::epidemic(),
        SprayPolicy::binary(initial),
    )
}

#[cfg(test)]
mod policy_tests {
    use super::*;

    #[test]
    fn binary_spray_conserves_budget() {
        let policy = SprayPolicy::binary(0);
        for n in 0..=64u32 {
            let split = policy.on_forward(ReplicaBudget::Bounded(n));
            let kept = split.kept.count().unwrap();
            let handed = split.handed.count().unwrap();
            assert_eq!(kept + handed, n, "n = {n}");
            if n >= 2 {
                assert!(handed >= 1, "no progress at n = {n}");
            }
        }
    }

    #[test]
    fn source_spray_conserves_budget() {
        let policy = SprayPolicy::source(0);
        for n in 0..=64u32 {
            let split = policy.on_forward(ReplicaBudget::Bounded(n));
            let kept = split.kept.count().unwrap();
            let handed = split.handed.count().unwrap();
            assert_eq!(kept + handed, n, "n = {n}");
            if n >= 1 {
                assert_eq!(handed, 1, "source spray hands exactly one at n = {n}");
            }
        }
    }

    #[test]
    fn binary_split_rounds_toward_keeper() {
        let split = SprayPolicy::binary(0).on_forward(ReplicaBudget::Bounded(5));
        assert_eq!(split.kept, ReplicaBudget::Bounded(3));
        assert_eq!(split.handed, ReplicaBudget::Bounded(2));
    }

    #[test]
    fn last_binary_replica_is_not_handed() {
        let split = SprayPolicy::binary(0).on_forward(ReplicaBudget::Bounded(1));
        assert!(split.hands_nothing());
        assert_eq!(split.kept, ReplicaBudget::Bounded(1));
    }

    #[test]
    fn epidemic_budget_never_decrements() {
        let split = EpidemicPolicy.on_forward(ReplicaBudget::Unbounded);
        assert_eq!(split.kept, ReplicaBudget::Unbounded);
        assert_eq!(split.handed, ReplicaBudget::Unbounded);
        assert!(!split.hands_nothing());
    }
}

#[cfg(test)]
mod engine_tests {
    use super::*;

    #[test]
    fn originate_rejects_elapsed_window() {
        let mut engine = epidemic_engine(1);
        let result = engine.originate(vec![1], test_area(), 5, outside(), Tick(150));
        assert!(result.is_err());
        assert_eq!(engine.stats().originated, 0);
    }

    #[test]
    fn originate_inside_area_counts_as_delivered_at_source() {
        let mut engine = epidemic_engine(1);
        let id = engine
            .originate(vec![1], test_area(), 5, inside(), Tick(0))
            .unwrap();
        assert_eq!(engine.stats().delivered, 1);
        assert!(engine.queue().contains(id), "still retained for relay");
    }

    #[test]
    fn full_transfer_applies_binary_split_on_both_sides() {
        let mut a = spray_engine(1, 4);
        let mut b = spray_engine(2, 4);
        let now = Tick(10);

        let id = a
            .originate(vec![7; 8], test_area(), 5, outside(), Tick(0))
            .unwrap();

        let batch = a.start_exchange(NodeId(2), &b.summary(now), None, now, &NoOracle);
        assert_eq!(batch, vec![id]);

        let wire = a.next_to_send(NodeId(2), now).unwrap();
        assert_eq!(wire.replicas, ReplicaBudget::Bounded(2));

        let outcome = b.receive(NodeId(1), wire, outside(), now, &NoOracle);
        assert_eq!(outcome, ReceiveOutcome::Stored);
        a.commit_send(NodeId(2), id, now);

        assert_eq!(a.queue().get(id).unwrap().replicas, ReplicaBudget::Bounded(2));
        assert_eq!(b.queue().get(id).unwrap().replicas, ReplicaBudget::Bounded(2));
        assert_eq!(a.stats().replicated, 1);
    }

    /// Two sessions pulled before either commit must still draw from the
    /// one shared allotment: copies in circulation never exceed it.
    #[test]
    fn interleaved_sessions_conserve_replica_budget() {
        let mut a = spray_engine(1, 4);
        let now = Tick(10);
        let id = a
            .originate(vec![1], test_area(), 5, outside(), Tick(0))
            .unwrap();

        a.start_exchange(NodeId(2), &[], None, now, &NoOracle);
        a.start_exchange(NodeId(3), &[], None, now, &NoOracle);

        let to_b = a.next_to_send(NodeId(2), now).unwrap();
        let to_c = a.next_to_send(NodeId(3), now).unwrap();
        a.commit_send(NodeId(2), id, now);
        a.commit_send(NodeId(3), id, now);

        assert_eq!(to_b.replicas, ReplicaBudget::Bounded(2));
        assert_eq!(to_c.replicas, ReplicaBudget::Bounded(1));
        let kept = a.queue().get(id).unwrap().replicas.count().unwrap();
        let handed = to_b.replicas.count().unwrap() + to_c.replicas.count().unwrap();
        assert_eq!(kept + handed, 4, "kept={kept} handed={handed}");
        assert_eq!(a.stats().replicated, 2);
    }

    #[test]
    fn aborted_send_restores_reserved_budget() {
        let mut a = spray_engine(1, 4);
        let now = Tick(10);
        let id = a
            .originate(vec![1], test_area(), 5, outside(), Tick(0))
            .unwrap();

        a.start_exchange(NodeId(2), &[], None, now, &NoOracle);
        let wire = a.next_to_send(NodeId(2), now).unwrap();
        assert_eq!(wire.replicas, ReplicaBudget::Bounded(2));
        assert_eq!(a.queue().get(id).unwrap().replicas, ReplicaBudget::Bounded(2));

        a.abort_send(NodeId(2), id);
        assert_eq!(a.queue().get(id).unwrap().replicas, ReplicaBudget::Bounded(4));
        assert_eq!(a.stats().replicated, 0);
    }

    #[test]
    fn lost_contact_restores_uncommitted_budget() {
        let mut a = spray_engine(1, 4);
        let now = Tick(10);
        let id = a
            .originate(vec![1], test_area(), 5, outside(), Tick(0))
            .unwrap();

        a.start_exchange(NodeId(2), &[], None, now, &NoOracle);
        a.next_to_send(NodeId(2), now).unwrap();
        a.end_contact(NodeId(2));

        assert_eq!(a.queue().get(id).unwrap().replicas, ReplicaBudget::Bounded(4));
        // The peer never confirmed, so it is not marked as holding the
        // packet and the next contact offers it again.
        let batch = a.start_exchange(NodeId(2), &[], None, Tick(20), &NoOracle);
        assert_eq!(batch, vec![id]);
    }

    #[test]
    fn receive_inside_area_is_delivered_and_retained() {
        let mut a = epidemic_engine(1);
        let mut b = epidemic_engine(2);
        let now = Tick(10);

        let id = a
            .originate(vec![1], test_area(), 5, outside(), Tick(0))
            .unwrap();
        a.start_exchange(NodeId(2), &[], None, now, &NoOracle);
        let wire = a.next_to_send(NodeId(2), now).unwrap();

        let outcome = b.receive(NodeId(1), wire, inside(), now, &NoOracle);
        assert_eq!(outcome, ReceiveOutcome::Delivered);
        assert_eq!(b.stats().delivered, 1);
        assert!(b.queue().contains(id), "delivered packets still relay");
    }

    #[test]
    fn receive_rejects_expired_outright() {
        let mut b = epidemic_engine(2);
        let wire = crate::PacketWire {
            id:       gdtn_core::PacketId::new(NodeId(1), 0),
            source:   NodeId(1),
            created:  Tick(0),
            area:     test_area(),
            summary:  vec![1],
            replicas: ReplicaBudget::Unbounded,
            priority: 5,
        };
        let outcome = b.receive(NodeId(1), wire, inside(), Tick(150), &NoOracle);
        assert_eq!(outcome, ReceiveOutcome::Rejected(RejectReason::Expired));
        assert!(b.queue().is_empty());
        assert_eq!(b.stats().rejected_expired, 1);
    }

    #[test]
    fn receive_rejects_seen_duplicates() {
        let mut a = epidemic_engine(1);
        let mut b = epidemic_engine(2);
        let now = Tick(10);

        a.originate(vec![1], test_area(), 5, outside(), Tick(0)).unwrap();
        a.start_exchange(NodeId(2), &[], None, now, &NoOracle);
        let wire = a.next_to_send(NodeId(2), now).unwrap();

        assert_eq!(
            b.receive(NodeId(1), wire.clone(), outside(), now, &NoOracle),
            ReceiveOutcome::Stored
        );
        assert_eq!(
            b.receive(NodeId(1), wire, outside(), Tick(11), &NoOracle),
            ReceiveOutcome::Rejected(RejectReason::DuplicateId)
        );
        assert_eq!(b.stats().rejected_duplicate, 1);
    }

    #[test]
    fn candidate_list_excludes_packets_the_peer_holds() {
        let mut a = epidemic_engine(1);
        let now = Tick(10);

        let id = a
            .originate(vec![1], test_area(), 5, outside(), Tick(0))
            .unwrap();

        // The peer's summary advertises the packet: nothing to offer.
        let batch = a.start_exchange(NodeId(2), &[id], None, now, &NoOracle);
        assert!(batch.is_empty());
    }

    #[test]
    fn committed_send_is_not_reoffered_on_recontact() {
        let mut a = epidemic_engine(1);
        let now = Tick(10);

        let id = a
            .originate(vec![1], test_area(), 5, outside(), Tick(0))
            .unwrap();

        let batch = a.start_exchange(NodeId(2), &[], None, now, &NoOracle);
        assert_eq!(batch, vec![id]);
        a.next_to_send(NodeId(2), now).unwrap();
        a.commit_send(NodeId(2), id, now);
        a.end_contact(NodeId(2));

        let batch = a.start_exchange(NodeId(2), &[], None, Tick(20), &NoOracle);
        assert!(batch.is_empty(), "peer is known to hold the packet");
    }

    #[test]
    fn wait_phase_packet_is_never_offered() {
        let mut a = spray_engine(1, 1);
        let now = Tick(10);

        // Budget 1 under binary spray: the single replica is kept.
        a.originate(vec![1], test_area(), 5, outside(), Tick(0)).unwrap();
        let batch = a.start_exchange(NodeId(2), &[], None, now, &NoOracle);
        assert!(batch.is_empty());
        assert_eq!(a.queue().len(), 1, "still queued for direct delivery");
    }

    #[test]
    fn relevance_gate_requires_peer_heading_to_area() {
        let mut a = DisseminationEngine::new(
            NodeId(1),
            EngineConfig::restricted_epidemic(),
            EpidemicPolicy,
        );
        let now = Tick(10);
        a.originate(vec![1], test_area(), 5, outside(), Tick(0)).unwrap();

        // Peer predicted outside the rectangle, no oracle: withheld.
        let batch = a.start_exchange(NodeId(2), &[], Some(outside()), now, &NoOracle);
        assert!(batch.is_empty());
        a.end_contact(NodeId(2));

        // Peer predicted inside: offered.
        let batch = a.start_exchange(NodeId(2), &[], Some(inside()), Tick(11), &NoOracle);
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn lost_contact_truncates_transfer_without_retry_state() {
        let mut a = epidemic_engine(1);
        let now = Tick(10);

        let id = a
            .originate(vec![1], test_area(), 5, outside(), Tick(0))
            .unwrap();
        a.start_exchange(NodeId(2), &[], None, now, &NoOracle);
        a.end_contact(NodeId(2));

        assert!(a.next_to_send(NodeId(2), now).is_none());
        assert!(!a.has_session(NodeId(2)));
        assert!(a.queue().contains(id), "unsent item stays queued");
    }

    #[test]
    fn tick_purges_expired_packets_into_stats() {
        let mut a = epidemic_engine(1);
        let id = a
            .originate(vec![1], test_area(), 5, outside(), Tick(0))
            .unwrap();

        assert!(a.on_tick(Tick(50)).is_empty());
        let expired = a.on_tick(Tick(150));
        assert_eq!(expired, vec![id]);
        assert_eq!(a.stats().expired, 1);
        assert!(a.queue().is_empty());
    }

    #[test]
    fn peer_duplicate_refusal_is_remembered() {
        let mut a = epidemic_engine(1);
        let now = Tick(10);

        let id = a
            .originate(vec![1], test_area(), 5, outside(), Tick(0))
            .unwrap();
        a.start_exchange(NodeId(2), &[], None, now, &NoOracle);
        a.next_to_send(NodeId(2), now).unwrap();
        a.note_peer_rejected(NodeId(2), id, RejectReason::DuplicateId);
        a.end_contact(NodeId(2));

        let batch = a.start_exchange(NodeId(2), &[], None, Tick(20), &NoOracle);
        assert!(batch.is_empty());
    }
}
