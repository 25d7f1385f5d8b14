//! `gdtn-contact` — neighbor tracking and duplicate suppression.
//!
//! Two leaf components of the dissemination core live here:
//!
//! - [`NeighborTable`]: which nodes are (or were recently) in contact range,
//!   with last-seen/expiry ticks, an optional predicted position, and the
//!   set of packets each neighbor is known to hold.
//! - [`DuplicateDetector`]: a sliding record of packet ids this node has
//!   already processed, so redundant receipt/forward cycles are suppressed.
//!
//! Both are plain in-memory maps owned exclusively by one node's engine; all
//! operations are total (no error conditions) and bounded.

pub mod duplicate;
pub mod neighbor;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use duplicate::DuplicateDetector;
pub use neighbor::{NeighborEntry, NeighborTable};
