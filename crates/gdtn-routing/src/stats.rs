//! Per-engine dissemination counters.

/// Write-only counters one engine accumulates over its lifetime.
///
/// Every packet loss shows up in exactly one of `evicted` or `expired`;
/// nothing is dropped unaccounted.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineStats {
    /// Packets this node originated.
    pub originated: u64,
    /// Packets delivered at this node (inside their area at receipt, or at
    /// origination).
    pub delivered: u64,
    /// Inbound packets accepted into the queue.
    pub stored: u64,
    /// Successful forwards to a neighbor.
    pub replicated: u64,
    /// Inbound packets refused as already seen or already queued.
    pub rejected_duplicate: u64,
    /// Inbound packets refused because their window had elapsed at receipt.
    pub rejected_expired: u64,
    /// Inbound packets refused because every queue occupant outranked them.
    pub rejected_capacity: u64,
    /// Queue occupants displaced to admit higher-ranked packets.
    pub evicted: u64,
    /// Packets purged after their window elapsed while queued.
    pub expired: u64,
}

impl std::fmt::Display for EngineStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "orig={} dlv={} sto={} rep={} rej_dup={} rej_exp={} rej_cap={} evic={} exp={}",
            self.originated,
            self.delivered,
            self.stored,
            self.replicated,
            self.rejected_duplicate,
            self.rejected_expired,
            self.rejected_capacity,
            self.evicted,
            self.expired,
        )
    }
}
