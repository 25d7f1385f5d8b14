//! `PositionIndex` — R-tree range queries over node positions.
//!
//! Built once per tick from the current position array and queried for every
//! node, replacing the O(N²) all-pairs distance scan with an R-tree range
//! lookup plus an exact haversine filter.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use gdtn_core::{GeoPoint, NodeId};

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Entry stored in the R-tree: a 2-D `[lat, lon]` point with the associated
/// `NodeId`.
#[derive(Clone)]
struct PosEntry {
    point: [f32; 2], // [lat, lon]
    id: NodeId,
}

impl RTreeObject for PosEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for PosEntry {
    /// Squared Euclidean distance in lat/lon space — only used for the
    /// over-approximate candidate pass; exact distance is re-checked with
    /// haversine.
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── PositionIndex ─────────────────────────────────────────────────────────────

/// Metres per degree of latitude (and of longitude at the equator).
const M_PER_DEG: f32 = 111_320.0;

/// Spatial index over one tick's node positions.
pub struct PositionIndex {
    tree: RTree<PosEntry>,
}

impl PositionIndex {
    /// Bulk-load the index from the per-node position array (indexed by
    /// `NodeId`).
    pub fn build(positions: &[GeoPoint]) -> Self {
        let entries: Vec<PosEntry> = positions
            .iter()
            .enumerate()
            .map(|(i, p)| PosEntry {
                point: [p.lat, p.lon],
                id: NodeId(i as u32),
            })
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// All nodes within `range_m` metres of `center`, ascending by id.
    ///
    /// The degree radius over-approximates (longitude degrees shrink with
    /// latitude, so the radius is widened by `1 / cos(lat)`); candidates are
    /// then filtered with the exact haversine distance.
    pub fn within_range(&self, center: GeoPoint, range_m: f32) -> Vec<NodeId> {
        let cos_lat = center.lat.to_radians().cos().abs().max(0.01);
        let radius_deg = range_m / M_PER_DEG / cos_lat * 1.001;

        let mut hits: Vec<NodeId> = self
            .tree
            .locate_within_distance([center.lat, center.lon], radius_deg * radius_deg)
            .filter(|e| GeoPoint::new(e.point[0], e.point[1]).distance_m(center) <= range_m)
            .map(|e| e.id)
            .collect();
        hits.sort_unstable();
        hits
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}
