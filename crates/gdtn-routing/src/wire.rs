//! `PacketWire` — the serialized copy of a packet that crosses a contact.
//!
//! Nodes never share ownership of a [`CarriedPacket`]; what travels between
//! engines is this value, carrying the receiver's budget as assigned by the
//! sender's replication policy.

use gdtn_core::{GeoTemporalArea, NodeId, PacketId, Tick};
use gdtn_store::{CarriedPacket, ReplicaBudget};

/// One packet as transferred to a neighbor.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PacketWire {
    pub id:       PacketId,
    pub source:   NodeId,
    pub created:  Tick,
    pub area:     GeoTemporalArea,
    pub summary:  Vec<u8>,
    /// The receiver's initial budget (the `handed` half of the split).
    pub replicas: ReplicaBudget,
    pub priority: u8,
}

impl PacketWire {
    /// Build the transfer copy of `packet` with the receiver's budget.
    pub fn from_packet(packet: &CarriedPacket, handed: ReplicaBudget) -> Self {
        Self {
            id:       packet.id,
            source:   packet.source,
            created:  packet.created,
            area:     packet.area.clone(),
            summary:  packet.summary.clone(),
            replicas: handed,
            priority: packet.priority,
        }
    }

    /// Rebuild a locally owned packet on the receiving side.
    pub fn into_packet(self) -> CarriedPacket {
        CarriedPacket::new(
            self.id,
            self.source,
            self.created,
            self.area,
            self.summary,
            self.replicas,
            self.priority,
        )
    }
}
