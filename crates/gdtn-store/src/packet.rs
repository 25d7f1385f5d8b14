//! `CarriedPacket` and its replication budget.

use gdtn_core::{GeoTemporalArea, NodeId, PacketId, Tick};

// ── ReplicaBudget ─────────────────────────────────────────────────────────────

/// How many further copies of a packet this carrier may hand out.
///
/// Epidemic-family protocols replicate without bound; spray-and-wait starts
/// from a fixed allotment `L` and splits it on every forward.  An enum keeps
/// the two regimes apart in the type instead of a magic sentinel integer,
/// and makes "never negative" true by construction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReplicaBudget {
    /// Replicate freely; never decremented.
    Unbounded,
    /// At most this many further copies may be handed out.
    Bounded(u32),
}

impl ReplicaBudget {
    /// `true` iff the budget is `Bounded(0)` — the "wait" phase, where the
    /// packet may still be delivered directly but not forwarded.
    #[inline]
    pub fn is_exhausted(self) -> bool {
        matches!(self, ReplicaBudget::Bounded(0))
    }

    /// The bounded count, or `None` for unbounded budgets.
    #[inline]
    pub fn count(self) -> Option<u32> {
        match self {
            ReplicaBudget::Unbounded => None,
            ReplicaBudget::Bounded(n) => Some(n),
        }
    }

    /// Budget with `other`'s copies added back in.  Unbounded absorbs.
    #[inline]
    pub fn plus(self, other: ReplicaBudget) -> ReplicaBudget {
        match (self, other) {
            (ReplicaBudget::Bounded(a), ReplicaBudget::Bounded(b)) => {
                ReplicaBudget::Bounded(a.saturating_add(b))
            }
            _ => ReplicaBudget::Unbounded,
        }
    }

    /// Sort key for eviction ranking: fewest remaining replicas first, with
    /// unbounded budgets ranked last.
    #[inline]
    pub(crate) fn rank(self) -> u64 {
        match self {
            ReplicaBudget::Unbounded => u64::MAX,
            ReplicaBudget::Bounded(n) => n as u64,
        }
    }
}

impl std::fmt::Display for ReplicaBudget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplicaBudget::Unbounded => write!(f, "∞"),
            ReplicaBudget::Bounded(n) => write!(f, "{n}"),
        }
    }
}

// ── CarriedPacket ─────────────────────────────────────────────────────────────

/// One data item stored by a node awaiting further relay or delivery.
///
/// Owned exclusively by the carrying node's [`PacketsQueue`][crate::PacketsQueue];
/// neighbors only ever receive serialized copies, never shared references.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CarriedPacket {
    /// Globally unique id (source node + per-source sequence number).
    pub id: PacketId,

    /// The node that originated the packet.
    pub source: NodeId,

    /// Tick at which the source originated the packet.
    pub created: Tick,

    /// Where and when the packet is relevant.  A packet whose window has
    /// fully elapsed is logically expired: never forwarded, never counted
    /// toward capacity.
    pub area: GeoTemporalArea,

    /// Application payload summary.  Its length counts toward the queue's
    /// byte budget.
    pub summary: Vec<u8>,

    /// Remaining replication budget.
    pub replicas: ReplicaBudget,

    /// Priority score; higher survives eviction longer and transmits first.
    pub priority: u8,

    /// Last tick this carrier attempted to forward the packet, if any.
    pub last_forward_attempt: Option<Tick>,
}

impl CarriedPacket {
    pub fn new(
        id: PacketId,
        source: NodeId,
        created: Tick,
        area: GeoTemporalArea,
        summary: Vec<u8>,
        replicas: ReplicaBudget,
        priority: u8,
    ) -> Self {
        Self {
            id,
            source,
            created,
            area,
            summary,
            replicas,
            priority,
            last_forward_attempt: None,
        }
    }

    /// `true` once the destination window has fully elapsed.
    #[inline]
    pub fn is_expired(&self, now: Tick) -> bool {
        self.area.is_expired(now)
    }

    /// Ticks until the destination window closes; 0 once elapsed.
    #[inline]
    pub fn time_remaining(&self, now: Tick) -> u64 {
        self.area.time_remaining(now)
    }

    /// Bytes this packet contributes to the queue's summary byte budget.
    #[inline]
    pub fn summary_len(&self) -> usize {
        self.summary.len()
    }
}
