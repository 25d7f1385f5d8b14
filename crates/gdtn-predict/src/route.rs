//! `PlannedRoute` — piecewise-linear movement along timestamped waypoints.
//!
//! # Movement model
//!
//! A route is a chronologically ordered list of `(position, tick)` waypoints.
//! The node sits at the first waypoint's position until its tick, moves in a
//! straight line between consecutive waypoints, and remains at the last
//! waypoint's position forever after.  The same model backs both the
//! simulation's route-following movement and the prediction oracle's
//! area-entry estimate, so predictions are exact for route-following nodes.

use gdtn_core::{GeoPoint, GeoTemporalArea, Tick};

use crate::PredictError;

// ── Waypoint ──────────────────────────────────────────────────────────────────

/// One timestamped position on a route.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waypoint {
    pub pos:  GeoPoint,
    pub tick: Tick,
}

// ── PlannedRoute ──────────────────────────────────────────────────────────────

/// A node's known movement plan.
#[derive(Clone, Debug, Default)]
pub struct PlannedRoute {
    waypoints: Vec<Waypoint>,
}

impl PlannedRoute {
    /// Build a route from waypoints.  Ticks must be non-decreasing.
    pub fn new(waypoints: Vec<Waypoint>) -> Result<Self, PredictError> {
        if waypoints.windows(2).any(|w| w[1].tick < w[0].tick) {
            return Err(PredictError::UnsortedWaypoints);
        }
        Ok(Self { waypoints })
    }

    /// A route with no waypoints — the node never moves and yields no
    /// predictions.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    // ── Position lookup ───────────────────────────────────────────────────

    /// Interpolated position at `now`, or `None` for an empty route.
    ///
    /// Clamps: before the first waypoint's tick the node is at the first
    /// position; after the last it stays at the last.
    pub fn position_at(&self, now: Tick) -> Option<GeoPoint> {
        let first = self.waypoints.first()?;
        if now <= first.tick {
            return Some(first.pos);
        }
        let last = self.waypoints.last()?;
        if now >= last.tick {
            return Some(last.pos);
        }

        // Invariant: first.tick < now < last.tick, so a bracketing segment exists.
        for pair in self.waypoints.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if a.tick <= now && now <= b.tick {
                let dt = b.tick - a.tick;
                if dt == 0 {
                    return Some(b.pos);
                }
                let t = now.since(a.tick) as f32 / dt as f32;
                return Some(a.pos.lerp(b.pos, t));
            }
        }
        unreachable!("waypoints are chronologically ordered");
    }

    // ── Area-entry prediction ─────────────────────────────────────────────

    /// The earliest tick at which this route is inside `area` — spatially
    /// inside the rectangle *and* within the time window.  `None` if the
    /// route never makes it.
    ///
    /// Scans the route's stationary prefix, each movement segment, and the
    /// stationary suffix in chronological order; the first hit is the
    /// earliest because candidate entry ticks are non-decreasing along the
    /// timeline.
    pub fn first_area_entry(&self, area: &GeoTemporalArea) -> Option<Tick> {
        let first = self.waypoints.first()?;
        let last = self.waypoints.last()?;
        let window = area.window();

        // Stationary prefix: at first.pos over [0, first.tick].
        if area.contains_point(first.pos) {
            if let Some(t) = earliest_in(Tick::ZERO, first.tick, window.start, window.end) {
                return Some(t);
            }
        }

        // Movement segments.
        for pair in self.waypoints.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if let Some((u0, u1)) = clip_to_rect(a.pos, b.pos, area) {
                let dt = (b.tick - a.tick) as f32;
                // Conservative integer bounds: enter no earlier than the clip
                // says, leave no later.
                let enter = a.tick + (u0 * dt).ceil() as u64;
                let exit = a.tick + (u1 * dt).floor() as u64;
                if let Some(t) = earliest_in(enter, exit, window.start, window.end) {
                    return Some(t);
                }
            }
        }

        // Stationary suffix: at last.pos from last.tick on.
        if area.contains_point(last.pos) {
            if let Some(t) = earliest_in(last.tick, Tick(u64::MAX), window.start, window.end) {
                return Some(t);
            }
        }

        None
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Earliest tick in the intersection of `[lo, hi]` and `[w_start, w_end]`.
fn earliest_in(lo: Tick, hi: Tick, w_start: Tick, w_end: Tick) -> Option<Tick> {
    let start = lo.max(w_start);
    let end = hi.min(w_end);
    (start <= end).then_some(start)
}

/// Liang-Barsky clip of the segment `p → q` against the area's rectangle.
///
/// Returns the parameter interval `[u0, u1] ⊆ [0, 1]` during which the
/// segment lies inside, or `None` if it misses entirely.
fn clip_to_rect(p: GeoPoint, q: GeoPoint, area: &GeoTemporalArea) -> Option<(f32, f32)> {
    let (min, max) = (area.min(), area.max());
    let mut u0 = 0.0_f32;
    let mut u1 = 1.0_f32;

    let axes = [
        (p.lat, q.lat - p.lat, min.lat, max.lat),
        (p.lon, q.lon - p.lon, min.lon, max.lon),
    ];
    for (start, delta, lo, hi) in axes {
        if delta == 0.0 {
            if start < lo || start > hi {
                return None;
            }
            continue;
        }
        let (t_lo, t_hi) = ((lo - start) / delta, (hi - start) / delta);
        let (enter, exit) = if t_lo <= t_hi { (t_lo, t_hi) } else { (t_hi, t_lo) };
        u0 = u0.max(enter);
        u1 = u1.min(exit);
        if u0 > u1 {
            return None;
        }
    }
    Some((u0, u1))
}
