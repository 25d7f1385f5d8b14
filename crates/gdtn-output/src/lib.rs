//! `gdtn-output` — simulation output writers for the geodtn framework.
//!
//! The CSV backend creates three files:
//!
//! | File                 | Contents                                        |
//! |----------------------|-------------------------------------------------|
//! | `node_stats.csv`     | Per-node engine counters at snapshot intervals  |
//! | `tick_summaries.csv` | Active contact count per tick                   |
//! | `deliveries.csv`     | One row per delivery event                      |
//!
//! Backends implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `gdtn_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use gdtn_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer, &config);
//! sim.run(&mut obs)?;
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{DeliveryRow, NodeStatsRow, TickSummaryRow};
pub use writer::OutputWriter;
