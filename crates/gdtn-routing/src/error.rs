//! Routing error types.
//!
//! Forwarding rejections are ordinary outcome values
//! ([`ReceiveOutcome`][crate::ReceiveOutcome],
//! [`InsertOutcome`][gdtn_store::InsertOutcome]) — `Err` is reserved for
//! calls that cannot produce a meaningful packet at all.

use gdtn_core::Tick;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoutingError {
    /// The destination window had already fully elapsed at origination time.
    #[error("destination window [{start}, {end}] already elapsed at {now}")]
    WindowElapsed { start: Tick, end: Tick, now: Tick },
}
