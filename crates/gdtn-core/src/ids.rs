//! Strongly typed, zero-cost identifier wrappers.
//!
//! `NodeId` is an opaque identifier for a mobile node.  It is `Copy + Ord +
//! Hash` so it can be used as a map key and sorted collection element without
//! ceremony.  The inner integer is `pub` to allow direct indexing into
//! per-node `Vec`s via `id.0 as usize`, but callers should prefer the
//! `.index()` helper for clarity.
//!
//! `PacketId` packs the originating node and a per-source sequence number
//! into one `u64`, making ids globally unique without any coordination
//! between nodes.

use std::fmt;

// ── NodeId ────────────────────────────────────────────────────────────────────

/// Opaque identifier of a mobile node.  Max ~4.3 billion nodes.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel meaning "no valid node" — equivalent to `u32::MAX`.
    pub const INVALID: NodeId = NodeId(u32::MAX);

    /// Cast to `usize` for direct use as a `Vec` index.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for NodeId {
    /// Returns the `INVALID` sentinel so uninitialized ids are visibly invalid.
    #[inline(always)]
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl From<NodeId> for usize {
    #[inline(always)]
    fn from(id: NodeId) -> usize {
        id.0 as usize
    }
}

impl TryFrom<usize> for NodeId {
    type Error = std::num::TryFromIntError;
    fn try_from(n: usize) -> Result<NodeId, Self::Error> {
        u32::try_from(n).map(NodeId)
    }
}

// ── PacketId ──────────────────────────────────────────────────────────────────

/// Globally unique identifier of a data packet.
///
/// Layout: `source_node << 32 | sequence_number`.  Each node numbers the
/// packets it originates with a private monotonically increasing counter, so
/// no two nodes can ever produce the same id.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PacketId(pub u64);

impl PacketId {
    /// Compose an id from the originating node and its sequence counter.
    #[inline]
    pub fn new(source: NodeId, seq: u32) -> Self {
        PacketId(((source.0 as u64) << 32) | seq as u64)
    }

    /// The node that originated this packet.
    #[inline]
    pub fn source(self) -> NodeId {
        NodeId((self.0 >> 32) as u32)
    }

    /// The per-source sequence number.
    #[inline]
    pub fn seq(self) -> u32 {
        self.0 as u32
    }
}

impl fmt::Display for PacketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PacketId({}:{})", self.source().0, self.seq())
    }
}
