//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use gdtn_core::{NodeId, PacketId, SimConfig, Tick};
use gdtn_routing::EngineStats;
use gdtn_sim::SimObserver;

use crate::row::{DeliveryRow, NodeStatsRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::OutputError;

/// A [`SimObserver`] that writes node stats, tick summaries, and delivery
/// events to any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:             W,
    start_unix_secs:    i64,
    tick_duration_secs: u32,
    last_error:         Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// Create an observer backed by `writer`, using `config` for wall-clock
    /// conversion.
    pub fn new(writer: W, config: &SimConfig) -> Self {
        Self {
            writer,
            start_unix_secs:    config.start_unix_secs,
            tick_duration_secs: config.tick_duration_secs,
            last_error:         None,
        }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn unix_time(&self, tick: Tick) -> i64 {
        self.start_unix_secs + tick.0 as i64 * self.tick_duration_secs as i64
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, tick: Tick, active_contacts: usize) {
        let row = TickSummaryRow {
            tick:            tick.0,
            unix_time_secs:  self.unix_time(tick),
            active_contacts: active_contacts as u64,
        };
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }

    fn on_delivery(&mut self, tick: Tick, node: NodeId, packet: PacketId) {
        let row = DeliveryRow {
            tick:      tick.0,
            node_id:   node.0,
            packet_id: packet.0,
        };
        let result = self.writer.write_delivery(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, stats: &[EngineStats], occupancy: &[usize]) {
        let rows: Vec<NodeStatsRow> = stats
            .iter()
            .zip(occupancy)
            .enumerate()
            .map(|(i, (s, &occ))| NodeStatsRow {
                node_id:         i as u32,
                tick:            tick.0,
                originated:      s.originated,
                delivered:       s.delivered,
                stored:          s.stored,
                replicated:      s.replicated,
                evicted:         s.evicted,
                expired:         s.expired,
                queue_occupancy: occ as u64,
            })
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_node_stats(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
