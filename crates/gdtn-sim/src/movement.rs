//! Per-node movement models.

use gdtn_core::{GeoPoint, NodeRng, Tick};
use gdtn_predict::PlannedRoute;

/// Metres per degree of latitude (and of longitude at the equator).
const M_PER_DEG: f32 = 111_320.0;

/// How one node moves each tick.
pub enum Movement {
    /// Never moves.
    Static,
    /// Follows a waypoint route; position is fully determined by the tick,
    /// so the prediction oracle is exact for these nodes.
    Route(PlannedRoute),
    /// Steps `step_m` metres in a uniformly random direction each tick.
    RandomWalk { step_m: f32 },
}

impl Movement {
    /// The node's position this tick, given where it was last tick.
    pub fn position_at(&self, current: GeoPoint, now: Tick, rng: &mut NodeRng) -> GeoPoint {
        match self {
            Movement::Static => current,
            Movement::Route(route) => route.position_at(now).unwrap_or(current),
            Movement::RandomWalk { step_m } => {
                let theta: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
                let cos_lat = current.lat.to_radians().cos().abs().max(0.01);
                GeoPoint::new(
                    current.lat + step_m * theta.cos() / M_PER_DEG,
                    current.lon + step_m * theta.sin() / (M_PER_DEG * cos_lat),
                )
            }
        }
    }

    /// `true` iff the model ignores its RNG (movement is reproducible from
    /// the tick alone).
    pub fn is_deterministic(&self) -> bool {
        !matches!(self, Movement::RandomWalk { .. })
    }
}
