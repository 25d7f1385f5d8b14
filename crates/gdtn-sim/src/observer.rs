//! Simulation observer trait for progress reporting and data collection.

use gdtn_core::{NodeId, PacketId, Tick};
use gdtn_routing::EngineStats;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — delivery printer
///
/// ```rust,ignore
/// struct DeliveryPrinter;
///
/// impl SimObserver for DeliveryPrinter {
///     fn on_delivery(&mut self, tick: Tick, node: NodeId, packet: PacketId) {
///         println!("tick {tick}: {packet} delivered at {node}");
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick.
    ///
    /// `active_contacts` is the number of node pairs in radio range this
    /// tick.
    fn on_tick_end(&mut self, _tick: Tick, _active_contacts: usize) {}

    /// Called when an inbound packet is delivered at a node (the node is
    /// inside the packet's destination area within its window).
    fn on_delivery(&mut self, _tick: Tick, _node: NodeId, _packet: PacketId) {}

    /// Called at snapshot intervals (every `config.stats_interval_ticks`).
    ///
    /// `stats` and `occupancy` are indexed by node: the cumulative engine
    /// counters and the current live queue occupancy.
    fn on_snapshot(&mut self, _tick: Tick, _stats: &[EngineStats], _occupancy: &[usize]) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
