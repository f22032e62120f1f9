//! `LayeredWorld`: deterministic synthetic layered graph for stress tests
//! and benchmarks.
//!
//! A root fans out to every node of layer 0; each node of layer `l` links
//! to `fanout` consecutive (wrapping) nodes of layer `l + 1`, so every node
//! is reachable. Attributes and the AND/OR tag of every edge come from a
//! seeded LCG, so the same config always builds a byte-identical graph.
//! Most nodes have several parents, so the same node is reached along many
//! paths and duplicates are discarded at pop time.
//!
//! Regime constructors at the bottom pair a world with a budget and the
//! observable thresholds that prove the regime's stress axis was hit.

use trailhead_kernel::graph::{ActivityGraph, GraphError, NodeId, NodeSpec, Relation};
use trailhead_search::policy::SearchBudget;

use crate::contract::{GraphWorld, WorldGraph};

/// Shape and seed of a layered world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayeredConfig {
    pub layers: usize,
    pub width: usize,
    /// Children per node in the next layer (clamped to `width`).
    pub fanout: usize,
    /// Per-mille probability that an edge is tagged AND.
    pub and_per_mille: u32,
    pub seed: u64,
}

impl Default for LayeredConfig {
    fn default() -> Self {
        Self {
            layers: 6,
            width: 8,
            fanout: 3,
            and_per_mille: 250,
            seed: 0x7472_6169_6c68_6561,
        }
    }
}

/// Synthetic layered world.
pub struct LayeredWorld {
    config: LayeredConfig,
    world_id: String,
}

impl LayeredWorld {
    #[must_use]
    pub fn new(config: LayeredConfig) -> Self {
        let world_id = format!(
            "layered_{}x{}_f{}_s{:x}",
            config.layers, config.width, config.fanout, config.seed
        );
        Self { config, world_id }
    }

    #[must_use]
    pub fn config(&self) -> LayeredConfig {
        self.config
    }

    /// Total node count including the root.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.config.layers * self.config.width
    }
}

impl GraphWorld for LayeredWorld {
    fn world_id(&self) -> &str {
        &self.world_id
    }

    fn build(&self) -> Result<WorldGraph, GraphError> {
        let LayeredConfig {
            layers,
            width,
            fanout,
            and_per_mille,
            seed,
        } = self.config;
        let fanout = fanout.min(width);
        let mut rng = Lcg::new(seed);
        let mut graph = ActivityGraph::new();

        let root = graph.add_node(
            NodeSpec::new("root", 0.0, 0.0, 0.0)
                .mandatory(true)
                .description("Synthetic starting point.")
                .location("layer -1"),
        )?;

        let mut ids: Vec<Vec<NodeId>> = Vec::with_capacity(layers);
        for layer in 0..layers {
            let mut row = Vec::with_capacity(width);
            for slot in 0..width {
                // Half-hour steps up to 4h, cost in steps of 5 up to 60, score 1..=10.
                let hours = f64::from(rng.below(8) + 1) * 0.5;
                let cost = f64::from(rng.below(13)) * 5.0;
                let score = f64::from(rng.below(10) + 1);
                let id = graph.add_node(
                    NodeSpec::new(format!("L{layer}N{slot}"), hours, cost, score)
                        .description(format!("Synthetic activity {slot} of layer {layer}."))
                        .location(format!("layer {layer}")),
                )?;
                row.push(id);
            }
            ids.push(row);
        }

        if let Some(first) = ids.first() {
            for &child in first {
                graph.add_edge(root, child, rng.relation(and_per_mille))?;
            }
        }
        for pair in ids.windows(2) {
            let (parents, children) = (&pair[0], &pair[1]);
            // Rotating by a per-layer shift keeps every child covered.
            let shift = rng.below_usize(width);
            for (slot, &parent) in parents.iter().enumerate() {
                for k in 0..fanout {
                    let child = children[(slot + shift + k) % width];
                    graph.add_edge(parent, child, rng.relation(and_per_mille))?;
                }
            }
        }

        Ok(WorldGraph { graph, root })
    }
}

/// Knuth MMIX linear congruential generator.
struct Lcg(u64);

impl Lcg {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.0 >> 33
    }

    #[allow(clippy::cast_possible_truncation)]
    fn below(&mut self, bound: u32) -> u32 {
        // next() yields 31 significant bits, so the remainder fits in u32.
        (self.next() % u64::from(bound.max(1))) as u32
    }

    #[allow(clippy::cast_possible_truncation)]
    fn below_usize(&mut self, bound: usize) -> usize {
        (self.next() % (bound.max(1) as u64)) as usize
    }

    fn relation(&mut self, and_per_mille: u32) -> Relation {
        if self.below(1000) < and_per_mille {
            Relation::And
        } else {
            Relation::Or
        }
    }
}

// ---------------------------------------------------------------------------
// Regimes
// ---------------------------------------------------------------------------

/// Test-side expectations for a regime.
#[derive(Debug, Clone)]
pub struct RegimeExpectations {
    /// Minimum number of states discarded because their node was visited.
    pub min_duplicates_discarded: u64,
    /// Minimum number of children dropped over a ceiling.
    pub min_children_dropped: u64,
    /// Minimum frontier high-water mark.
    pub min_frontier_high_water: u64,
    /// Whether every node of the graph should end up in the plan.
    pub expects_full_coverage: bool,
}

/// A matched `(world, budget, expectations)` triple.
pub struct Regime {
    pub world: LayeredWorld,
    pub budget: SearchBudget,
    pub expectations: RegimeExpectations,
}

/// **Unconstrained** regime: ceilings far above any path total, so every
/// reachable node is accepted and every re-reach is a duplicate.
#[must_use]
pub fn regime_unconstrained() -> Regime {
    let config = LayeredConfig::default();
    Regime {
        world: LayeredWorld::new(config),
        budget: SearchBudget::new(1.0e6, 1.0e6),
        expectations: RegimeExpectations {
            min_duplicates_discarded: 1,
            min_children_dropped: 0,
            min_frontier_high_water: 8,
            expects_full_coverage: true,
        },
    }
}

/// **Tight budget** regime: a one-day, low-cost trip that cuts most paths
/// after a couple of layers.
#[must_use]
pub fn regime_tight_budget() -> Regime {
    let config = LayeredConfig::default();
    Regime {
        world: LayeredWorld::new(config),
        budget: SearchBudget::from_trip(1, 40.0),
        expectations: RegimeExpectations {
            min_duplicates_discarded: 0,
            min_children_dropped: 1,
            min_frontier_high_water: 1,
            expects_full_coverage: false,
        },
    }
}

/// **Wide frontier** regime: wide layers with full fanout so the frontier
/// holds many states at once.
#[must_use]
pub fn regime_wide_frontier() -> Regime {
    let config = LayeredConfig {
        layers: 4,
        width: 32,
        fanout: 32,
        and_per_mille: 500,
        seed: 42,
    };
    Regime {
        world: LayeredWorld::new(config),
        budget: SearchBudget::new(1.0e6, 1.0e6),
        expectations: RegimeExpectations {
            min_duplicates_discarded: 32,
            min_children_dropped: 0,
            min_frontier_high_water: 32,
            expects_full_coverage: true,
        },
    }
}
