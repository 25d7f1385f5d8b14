//! Plain data row types written by output backends.

/// One node's cumulative engine counters and queue occupancy at a snapshot
/// tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeStatsRow {
    pub node_id:         u32,
    pub tick:            u64,
    pub originated:      u64,
    pub delivered:       u64,
    pub stored:          u64,
    pub replicated:      u64,
    pub evicted:         u64,
    pub expired:         u64,
    pub queue_occupancy: u64,
}

/// Summary statistics for one simulation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickSummaryRow {
    pub tick:            u64,
    pub unix_time_secs:  i64,
    pub active_contacts: u64,
}

/// One delivery event: a packet reached a node inside its destination area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryRow {
    pub tick:      u64,
    pub node_id:   u32,
    pub packet_id: u64,
}
