//! CSV route loader.
//!
//! # CSV format
//!
//! One row per waypoint, chronological within each node:
//!
//! ```csv
//! node_id,lat,lon,tick
//! 0,30.694,-88.043,0
//! 0,30.700,-88.050,120
//! 1,30.690,-88.040,0
//! ```
//!
//! Nodes absent from the CSV simply get no route — they are treated as
//! stationary by the movement model and yield no oracle predictions.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use gdtn_core::{GeoPoint, NodeId, Tick};

use crate::route::{PlannedRoute, Waypoint};
use crate::PredictError;

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct RouteRecord {
    node_id: u32,
    lat:     f32,
    lon:     f32,
    tick:    u64,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load per-node `PlannedRoute`s from a CSV file.
pub fn load_routes_csv(path: &Path) -> Result<HashMap<NodeId, PlannedRoute>, PredictError> {
    let file = std::fs::File::open(path).map_err(PredictError::Io)?;
    load_routes_reader(file)
}

/// Like [`load_routes_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or loading from network
/// streams.
pub fn load_routes_reader<R: Read>(
    reader: R,
) -> Result<HashMap<NodeId, PlannedRoute>, PredictError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut by_node: HashMap<NodeId, Vec<Waypoint>> = HashMap::new();

    for result in csv_reader.deserialize::<RouteRecord>() {
        let row = result.map_err(|e| PredictError::Parse(e.to_string()))?;
        by_node.entry(NodeId(row.node_id)).or_default().push(Waypoint {
            pos:  GeoPoint::new(row.lat, row.lon),
            tick: Tick(row.tick),
        });
    }

    by_node
        .into_iter()
        .map(|(node, waypoints)| Ok((node, PlannedRoute::new(waypoints)?)))
        .collect()
}
