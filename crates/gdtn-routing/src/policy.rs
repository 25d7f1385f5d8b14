//! Replication policies.
//!
//! The protocol variants (epidemic, restricted epidemic, spray-and-wait,
//! geo-temporal baseline) are one engine parameterized by a policy: the
//! policy decides how large a budget a freshly originated packet gets and
//! how the remaining budget splits between sender and receiver on each
//! forward.  Everything else (relevance gating, oracle ordering) is an
//! [`EngineConfig`][crate::EngineConfig] flag.

use gdtn_store::ReplicaBudget;

// ── ForwardSplit ──────────────────────────────────────────────────────────────

/// How one forward divides the sender's remaining budget.
///
/// `kept` becomes the sender's new budget, `handed` the receiver's initial
/// budget.  For bounded budgets the policy must conserve the total:
/// `kept + handed == n`, and `handed >= 1` whenever `n >= 2` so a contact
/// with available replicas always makes progress.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ForwardSplit {
    pub kept:   ReplicaBudget,
    pub handed: ReplicaBudget,
}

impl ForwardSplit {
    /// `true` iff this forward would give the receiver nothing — the engine
    /// skips offering such packets (spray "wait" phase).
    #[inline]
    pub fn hands_nothing(self) -> bool {
        self.handed == ReplicaBudget::Bounded(0)
    }
}

// ── ReplicationPolicy ─────────────────────────────────────────────────────────

/// Per-variant replication behavior, selected at configuration time.
///
/// `Clone` lets the driver instantiate one engine per node from a single
/// policy value.
pub trait ReplicationPolicy: Clone + Send + Sync + 'static {
    /// Budget assigned to a packet this node originates.
    fn initial_budget(&self) -> ReplicaBudget;

    /// Split `remaining` between the sender (`kept`) and a new carrier
    /// (`handed`).
    fn on_forward(&self, remaining: ReplicaBudget) -> ForwardSplit;
}

// ── EpidemicPolicy ────────────────────────────────────────────────────────────

/// Unbounded replication: every contact may receive a copy, budgets are
/// never decremented.
#[derive(Copy, Clone, Debug, Default)]
pub struct EpidemicPolicy;

impl ReplicationPolicy for EpidemicPolicy {
    fn initial_budget(&self) -> ReplicaBudget {
        ReplicaBudget::Unbounded
    }

    fn on_forward(&self, _remaining: ReplicaBudget) -> ForwardSplit {
        ForwardSplit {
            kept:   ReplicaBudget::Unbounded,
            handed: ReplicaBudget::Unbounded,
        }
    }
}

// ── SprayPolicy ───────────────────────────────────────────────────────────────

/// How a spray budget splits on forward.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SprayMode {
    /// Binary spray: keeper takes `ceil(n/2)`, receiver `floor(n/2)`.
    Binary,
    /// Source spray: hand exactly one replica per contact until exhausted.
    Source,
}

/// Spray-and-wait: a fixed initial allotment `L`, split on every forward.
/// A packet whose budget reaches zero enters the "wait" phase: it is kept
/// for possible direct delivery but never offered again.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SprayPolicy {
    pub initial: u32,
    pub mode:    SprayMode,
}

impl SprayPolicy {
    pub fn binary(initial: u32) -> Self {
        Self { initial, mode: SprayMode::Binary }
    }

    pub fn source(initial: u32) -> Self {
        Self { initial, mode: SprayMode::Source }
    }
}

impl ReplicationPolicy for SprayPolicy {
    fn initial_budget(&self) -> ReplicaBudget {
        ReplicaBudget::Bounded(self.initial)
    }

    fn on_forward(&self, remaining: ReplicaBudget) -> ForwardSplit {
        let n = match remaining {
            // A spray queue never holds unbounded budgets, but pass one
            // through unchanged rather than invent a count.
            ReplicaBudget::Unbounded => {
                return ForwardSplit {
                    kept:   ReplicaBudget::Unbounded,
                    handed: ReplicaBudget::Unbounded,
                };
            }
            ReplicaBudget::Bounded(n) => n,
        };

        let (kept, handed) = match self.mode {
            SprayMode::Binary => (n.div_ceil(2), n / 2),
            SprayMode::Source => (n.saturating_sub(1), n.min(1)),
        };
        ForwardSplit {
            kept:   ReplicaBudget::Bounded(kept),
            handed: ReplicaBudget::Bounded(handed),
        }
    }
}
