//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `node_stats.csv`
//! - `tick_summaries.csv`
//! - `deliveries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{DeliveryRow, NodeStatsRow, OutputResult, TickSummaryRow};

/// Writes simulation output to three CSV files.
pub struct CsvWriter {
    node_stats: Writer<File>,
    summaries:  Writer<File>,
    deliveries: Writer<File>,
    finished:   bool,
}

impl CsvWriter {
    /// Open (or create) the CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut node_stats = Writer::from_path(dir.join("node_stats.csv"))?;
        node_stats.write_record([
            "node_id",
            "tick",
            "originated",
            "delivered",
            "stored",
            "replicated",
            "evicted",
            "expired",
            "queue_occupancy",
        ])?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(["tick", "unix_time_secs", "active_contacts"])?;

        let mut deliveries = Writer::from_path(dir.join("deliveries.csv"))?;
        deliveries.write_record(["tick", "node_id", "packet_id"])?;

        Ok(Self {
            node_stats,
            summaries,
            deliveries,
            finished: false,
        })
    }
}

impl OutputWriter for CsvWriter {
    fn write_node_stats(&mut self, rows: &[NodeStatsRow]) -> OutputResult<()> {
        for row in rows {
            self.node_stats.write_record(&[
                row.node_id.to_string(),
                row.tick.to_string(),
                row.originated.to_string(),
                row.delivered.to_string(),
                row.stored.to_string(),
                row.replicated.to_string(),
                row.evicted.to_string(),
                row.expired.to_string(),
                row.queue_occupancy.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.unix_time_secs.to_string(),
            row.active_contacts.to_string(),
        ])?;
        Ok(())
    }

    fn write_delivery(&mut self, row: &DeliveryRow) -> OutputResult<()> {
        self.deliveries.write_record(&[
            row.tick.to_string(),
            row.node_id.to_string(),
            row.packet_id.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.node_stats.flush()?;
        self.summaries.flush()?;
        self.deliveries.flush()?;
        Ok(())
    }
}
