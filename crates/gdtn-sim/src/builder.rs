//! Fluent builder for constructing a [`Sim`].

use gdtn_core::{GeoPoint, NodeId, NodeRng, SimConfig};
use gdtn_predict::MovementOracle;
use gdtn_routing::{DisseminationEngine, EngineConfig, ReplicationPolicy};

use crate::movement::Movement;
use crate::{Sim, SimError, SimResult};

/// Fluent builder for [`Sim<P, O>`].
///
/// # Required inputs
///
/// - [`SimConfig`] — total ticks, seed, contact range, …
/// - `Vec<GeoPoint>` — one initial position per node (defines node count)
/// - `P: ReplicationPolicy` — the protocol's replication behavior
/// - `O: MovementOracle` — the prediction source
///   ([`NoOracle`][gdtn_predict::NoOracle] for prediction-free variants)
///
/// # Optional inputs (have defaults)
///
/// | Method              | Default                        |
/// |---------------------|--------------------------------|
/// | `.movements(v)`     | All `Movement::Static`         |
/// | `.engine_config(c)` | `EngineConfig::epidemic()`     |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, positions, SprayPolicy::binary(8), oracle)
///     .movements(movements)
///     .engine_config(EngineConfig::geo_temporal())
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<P: ReplicationPolicy, O: MovementOracle> {
    config:        SimConfig,
    positions:     Vec<GeoPoint>,
    movements:     Option<Vec<Movement>>,
    engine_config: Option<EngineConfig>,
    policy:        P,
    oracle:        O,
}

impl<P: ReplicationPolicy, O: MovementOracle> SimBuilder<P, O> {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, positions: Vec<GeoPoint>, policy: P, oracle: O) -> Self {
        Self {
            config,
            positions,
            movements: None,
            engine_config: None,
            policy,
            oracle,
        }
    }

    /// Supply per-node movement models (must be length `node_count`).
    ///
    /// If not called, every node is stationary.
    pub fn movements(mut self, movements: Vec<Movement>) -> Self {
        self.movements = Some(movements);
        self
    }

    /// Supply the engine configuration applied to every node.
    ///
    /// If not called, [`EngineConfig::epidemic()`] is used.
    pub fn engine_config(mut self, engine_config: EngineConfig) -> Self {
        self.engine_config = Some(engine_config);
        self
    }

    /// Validate inputs, seed the per-node RNGs, and return a ready-to-run
    /// [`Sim`].
    pub fn build(self) -> SimResult<Sim<P, O>> {
        let node_count = self.positions.len();
        if node_count == 0 {
            return Err(SimError::Config("at least one node is required".into()));
        }

        let movements = match self.movements {
            Some(m) => {
                if m.len() != node_count {
                    return Err(SimError::NodeCountMismatch {
                        expected: node_count,
                        got:      m.len(),
                        what:     "movement models",
                    });
                }
                m
            }
            None => (0..node_count).map(|_| Movement::Static).collect(),
        };

        let engine_config = self.engine_config.unwrap_or_default();
        let engines = (0..node_count)
            .map(|i| {
                DisseminationEngine::new(
                    NodeId(i as u32),
                    engine_config.clone(),
                    self.policy.clone(),
                )
            })
            .collect();
        let rngs = (0..node_count)
            .map(|i| NodeRng::new(self.config.seed, NodeId(i as u32)))
            .collect();

        Ok(Sim {
            clock: self.config.make_clock(),
            config: self.config,
            engines,
            positions: self.positions,
            movements,
            rngs,
            oracle: self.oracle,
            contacts: Default::default(),
        })
    }
}
