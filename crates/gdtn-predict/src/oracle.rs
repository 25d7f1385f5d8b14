//! The `MovementOracle` trait — the engine's read-only prediction interface.

use std::collections::HashMap;

use gdtn_core::{GeoTemporalArea, NodeId, Tick};

use crate::route::PlannedRoute;

/// Predicts whether and when a node will enter a geographic area.
///
/// Read-only and side-effect-free from the engine's perspective.  The engine
/// uses predictions only to break forwarding ties and order transmissions —
/// a wrong or missing prediction degrades efficiency, never correctness.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so a single oracle can serve every
/// node's engine.
pub trait MovementOracle: Send + Sync {
    /// The earliest tick at which `node` is predicted to be inside `area`
    /// (spatially and within the time window), or `None` if unknown.
    fn predict_area_entry(&self, node: NodeId, area: &GeoTemporalArea) -> Option<Tick>;
}

// ── NoOracle ──────────────────────────────────────────────────────────────────

/// An oracle that predicts nothing.  Use for protocol variants that ignore
/// movement prediction (plain epidemic, spray-and-wait).
pub struct NoOracle;

impl MovementOracle for NoOracle {
    fn predict_area_entry(&self, _node: NodeId, _area: &GeoTemporalArea) -> Option<Tick> {
        None
    }
}

// ── RouteOracle ───────────────────────────────────────────────────────────────

/// An oracle backed by the nodes' known waypoint routes.
///
/// Exact for route-following nodes; nodes without a registered route yield
/// no prediction.
pub struct RouteOracle {
    routes: HashMap<NodeId, PlannedRoute>,
}

impl RouteOracle {
    pub fn new(routes: HashMap<NodeId, PlannedRoute>) -> Self {
        Self { routes }
    }

    pub fn route(&self, node: NodeId) -> Option<&PlannedRoute> {
        self.routes.get(&node)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl MovementOracle for RouteOracle {
    fn predict_area_entry(&self, node: NodeId, area: &GeoTemporalArea) -> Option<Tick> {
        self.routes.get(&node)?.first_area_entry(area)
    }
}
