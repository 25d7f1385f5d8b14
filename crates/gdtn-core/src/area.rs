//! Geo-temporal destination areas.
//!
//! A [`GeoTemporalArea`] is the unit of relevance for every carried packet:
//! an axis-aligned lat/lon rectangle plus a closed tick interval.  A packet
//! is deliverable to a node exactly when the node's `(position, tick)` falls
//! inside both; once the window's end tick has passed the packet is logically
//! expired everywhere.
//!
//! Both types are immutable value types — all queries are pure.

use crate::{DtnError, DtnResult, GeoPoint, Tick};

// ── TimeWindow ────────────────────────────────────────────────────────────────

/// A closed tick interval `[start, end]`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeWindow {
    pub start: Tick,
    pub end:   Tick,
}

impl TimeWindow {
    /// `true` iff `t` falls inside the closed interval.
    #[inline]
    pub fn contains(&self, t: Tick) -> bool {
        self.start <= t && t <= self.end
    }

    /// `true` once the window has fully elapsed (strictly after `end`).
    #[inline]
    pub fn is_elapsed(&self, now: Tick) -> bool {
        now > self.end
    }

    /// Ticks until the window closes; 0 once elapsed.
    #[inline]
    pub fn remaining(&self, now: Tick) -> u64 {
        self.end.0.saturating_sub(now.0)
    }
}

// ── GeoTemporalArea ───────────────────────────────────────────────────────────

/// An axis-aligned lat/lon rectangle plus a time window.
///
/// Construct via [`GeoTemporalArea::new`], which normalizes the two corner
/// points (so `min <= max` per axis) and validates the window.  The value is
/// immutable afterwards.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoTemporalArea {
    min: GeoPoint,
    max: GeoPoint,
    window: TimeWindow,
}

impl GeoTemporalArea {
    /// Build an area from two opposite rectangle corners and a time window.
    ///
    /// Corners may be given in any order.  Fails with
    /// [`DtnError::InvalidWindow`] if `window.end < window.start`.
    pub fn new(corner_a: GeoPoint, corner_b: GeoPoint, window: TimeWindow) -> DtnResult<Self> {
        if window.end < window.start {
            return Err(DtnError::InvalidWindow {
                start: window.start,
                end:   window.end,
            });
        }
        Ok(Self {
            min: GeoPoint::new(corner_a.lat.min(corner_b.lat), corner_a.lon.min(corner_b.lon)),
            max: GeoPoint::new(corner_a.lat.max(corner_b.lat), corner_a.lon.max(corner_b.lon)),
            window,
        })
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// South-west corner (minimum lat/lon).
    #[inline]
    pub fn min(&self) -> GeoPoint {
        self.min
    }

    /// North-east corner (maximum lat/lon).
    #[inline]
    pub fn max(&self) -> GeoPoint {
        self.max
    }

    #[inline]
    pub fn window(&self) -> TimeWindow {
        self.window
    }

    /// Geometric center of the rectangle.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min.lat + self.max.lat) * 0.5,
            (self.min.lon + self.max.lon) * 0.5,
        )
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// `true` iff `p` lies inside the rectangle (boundary inclusive).
    #[inline]
    pub fn contains_point(&self, p: GeoPoint) -> bool {
        self.min.lat <= p.lat
            && p.lat <= self.max.lat
            && self.min.lon <= p.lon
            && p.lon <= self.max.lon
    }

    /// The point-in-time-and-space query: inside the rectangle *and* inside
    /// the time window.
    #[inline]
    pub fn contains(&self, p: GeoPoint, t: Tick) -> bool {
        self.window.contains(t) && self.contains_point(p)
    }

    /// `true` once the time window has fully elapsed — the packet carrying
    /// this area must no longer be forwarded or counted toward capacity.
    #[inline]
    pub fn is_expired(&self, now: Tick) -> bool {
        self.window.is_elapsed(now)
    }

    /// Ticks until the window closes; 0 once elapsed.
    #[inline]
    pub fn time_remaining(&self, now: Tick) -> u64 {
        self.window.remaining(now)
    }

    /// Great-circle distance from `p` to the nearest point of the rectangle,
    /// in metres.  Returns 0 for points inside.  Used for priority scoring.
    pub fn distance_to_boundary_m(&self, p: GeoPoint) -> f32 {
        let nearest = GeoPoint::new(
            p.lat.clamp(self.min.lat, self.max.lat),
            p.lon.clamp(self.min.lon, self.max.lon),
        );
        p.distance_m(nearest)
    }
}

impl std::fmt::Display for GeoTemporalArea {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{} .. {}] @ [{}, {}]",
            self.min, self.max, self.window.start, self.window.end
        )
    }
}
