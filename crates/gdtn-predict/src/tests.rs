//! Unit tests for gdtn-predict.

use gdtn_core::{GeoPoint, GeoTemporalArea, NodeId, Tick, TimeWindow};

use crate::route::{PlannedRoute, Waypoint};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn wp(lat: f32, lon: f32, tick: u64) -> Waypoint {
    Waypoint {
        pos:  GeoPoint::new(lat, lon),
        tick: Tick(tick),
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

#[cfg(test)]
mod route_tests {
    use super::*;
    use crate::PredictError;

    #[test]
    fn unsorted_waypoints_rejected() {
        let result = PlannedRoute::new(vec![wp(0.0, 0.0, 10), wp(1.0, 1.0, 5)]);
        assert!(matches!(result, Err(PredictError::UnsortedWaypoints)));
    }

    #[test]
    fn position_clamps_at_both_ends() {
        let route = PlannedRoute::new(vec![wp(0.0, 0.0, 10), wp(10.0, 0.0, 20)]).unwrap();
        assert_eq!(route.position_at(Tick(0)), Some(GeoPoint::new(0.0, 0.0)));
        assert_eq!(route.position_at(Tick(100)), Some(GeoPoint::new(10.0, 0.0)));
    }

    #[test]
    fn position_interpolates_between_waypoints() {
        let route = PlannedRoute::new(vec![wp(0.0, 0.0, 10), wp(10.0, 20.0, 20)]).unwrap();
        let mid = route.position_at(Tick(15)).unwrap();
        assert!((mid.lat - 5.0).abs() < 1e-4);
        assert!((mid.lon - 10.0).abs() < 1e-4);
    }

    #[test]
    fn empty_route_has_no_position() {
        assert_eq!(PlannedRoute::empty().position_at(Tick(0)), None);
    }

    #[test]
    fn entry_found_mid_segment() {
        // Moves from (0, -10) to (0, 10) over ticks 0..100; the rectangle
        // spans lon [-1, 1], so the node is inside around ticks 45..55.
        let route = PlannedRoute::new(vec![wp(0.0, -10.0, 0), wp(0.0, 10.0, 100)]).unwrap();
        let a = area((-1.0, -1.0), (1.0, 1.0), 0, 1000);

        let entry = route.first_area_entry(&a).unwrap();
        assert!((45..=46).contains(&entry.0), "got {entry}");
    }

    #[test]
    fn entry_respects_window_start() {
        // Node is inside spatially from tick 45, but the window opens at 50.
        let route = PlannedRoute::new(vec![wp(0.0, -10.0, 0), wp(0.0, 10.0, 100)]).unwrap();
        let a = area((-1.0, -1.0), (1.0, 1.0), 50, 1000);
        assert_eq!(route.first_area_entry(&a), Some(Tick(50)));
    }

    #[test]
    fn no_entry_when_window_missed() {
        // Node transits the rectangle around ticks 45..55, window closes at 20.
        let route = PlannedRoute::new(vec![wp(0.0, -10.0, 0), wp(0.0, 10.0, 100)]).unwrap();
        let a = area((-1.0, -1.0), (1.0, 1.0), 0, 20);
        assert_eq!(route.first_area_entry(&a), None);
    }

    #[test]
    fn stationary_suffix_counts() {
        // Route ends inside the rectangle at tick 30; window opens at 100.
        let route = PlannedRoute::new(vec![wp(5.0, -10.0, 0), wp(0.5, 0.5, 30)]).unwrap();
        let a = area((0.0, 0.0), (1.0, 1.0), 100, 200);
        assert_eq!(route.first_area_entry(&a), Some(Tick(100)));
    }

    #[test]
    fn stationary_prefix_counts() {
        // Node starts inside the rectangle and leaves at tick 50.
        let route = PlannedRoute::new(vec![wp(0.5, 0.5, 50), wp(20.0, 20.0, 60)]).unwrap();
        let a = area((0.0, 0.0), (1.0, 1.0), 10, 200);
        assert_eq!(route.first_area_entry(&a), Some(Tick(10)));
    }

    #[test]
    fn route_that_misses_rectangle() {
        let route = PlannedRoute::new(vec![wp(20.0, 0.0, 0), wp(20.0, 10.0, 100)]).unwrap();
        let a = area((0.0, 0.0), (1.0, 1.0), 0, 1000);
        assert_eq!(route.first_area_entry(&a), None);
    }
}

#[cfg(test)]
mod oracle_tests {
    use super::*;
    use crate::{MovementOracle, NoOracle, RouteOracle};
    use std::collections::HashMap;

    #[test]
    fn no_oracle_predicts_nothing() {
        let a = area((0.0, 0.0), (1.0, 1.0), 0, 100);
        assert_eq!(NoOracle.predict_area_entry(NodeId(0), &a), None);
    }

    #[test]
    fn route_oracle_delegates_to_route() {
        let mut routes = HashMap::new();
        routes.insert(
            NodeId(1),
            PlannedRoute::new(vec![wp(0.0, -10.0, 0), wp(0.0, 10.0, 100)]).unwrap(),
        );
        let oracle = RouteOracle::new(routes);
        let a = area((-1.0, -1.0), (1.0, 1.0), 0, 1000);

        assert!(oracle.predict_area_entry(NodeId(1), &a).is_some());
        assert_eq!(oracle.predict_area_entry(NodeId(2), &a), None, "unknown node");
    }
}

#[cfg(test)]
mod index_tests {
    use super::*;
    use crate::PositionIndex;

    #[test]
    fn range_query_finds_only_nearby_nodes() {
        // Node 1 is ~111 m north of node 0; node 2 is ~11 km away.
        let positions = vec![
            GeoPoint::new(30.0, -88.0),
            GeoPoint::new(30.001, -88.0),
            GeoPoint::new(30.1, -88.0),
        ];
        let index = PositionIndex::build(&positions);

        let hits = index.within_range(positions[0], 200.0);
        assert_eq!(hits, vec![NodeId(0), NodeId(1)], "query point itself is included");

        let hits = index.within_range(positions[2], 200.0);
        assert_eq!(hits, vec![NodeId(2)]);
    }

    #[test]
    fn exact_distance_filter_applies() {
        // ~157 m apart diagonally; inside a 200 m range, outside 100 m.
        let positions = vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.001, 0.001)];
        let index = PositionIndex::build(&positions);

        assert_eq!(index.within_range(positions[0], 200.0).len(), 2);
        assert_eq!(index.within_range(positions[0], 100.0).len(), 1);
    }
}

#[cfg(test)]
mod loader_tests {
    use super::*;
    use crate::load_routes_reader;
    use std::io::Cursor;

    #[test]
    fn loads_and_groups_by_node() {
        let csv = "\
node_id,lat,lon,tick
0,30.0,-88.0,0
0,30.1,-88.0,100
1,31.0,-88.0,0
";
        let routes = load_routes_reader(Cursor::new(csv)).unwrap();
        assert_eq!(routes.len(), 2);
        assert_eq!(routes[&NodeId(0)].waypoints().len(), 2);
        assert_eq!(routes[&NodeId(1)].waypoints().len(), 1);
        let mid = routes[&NodeId(0)].position_at(Tick(50)).unwrap();
        assert!((mid.lat - 30.05).abs() < 1e-4);
    }

    #[test]
    fn bad_row_is_a_parse_error() {
        let csv = "node_id,lat,lon,tick\n0,not-a-float,-88.0,0\n";
        assert!(load_routes_reader(Cursor::new(csv)).is_err());
    }
}
