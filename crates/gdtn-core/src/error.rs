//! Framework error type.
//!
//! Sub-crates may define their own error enums and convert them into
//! `DtnError` via `From` impls, or keep them separate and wrap `DtnError` as
//! one variant.  Both patterns are acceptable; prefer whichever keeps error
//! sites clean.
//!
//! Note that packet rejections (duplicate, expired, capacity) are *not*
//! errors — they are ordinary outcome values returned by the store and the
//! engine.  `DtnError` is reserved for construction-time validation failures.

use thiserror::Error;

use crate::Tick;

/// The top-level error type for `gdtn-core` and a common base for sub-crates.
#[derive(Debug, Error)]
pub enum DtnError {
    #[error("time window ends at {end} before it starts at {start}")]
    InvalidWindow { start: Tick, end: Tick },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for all `gdtn-*` crates.
pub type DtnResult<T> = Result<T, DtnError>;
