//! Shared helpers for trailhead benchmark suites.

use trailhead_harness::contract::GraphWorld;
use trailhead_harness::worlds::layered::Regime;
use trailhead_kernel::graph::{ActivityGraph, NodeId};
use trailhead_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};
use trailhead_search::engine::{SearchEngine, SearchResult};
use trailhead_search::policy::SearchBudget;
use trailhead_search::trace::TraceBindings;

/// A world built once, so benchmarks can time only `search()`.
pub struct SearchSetup {
    pub graph: ActivityGraph,
    pub root: NodeId,
    pub budget: SearchBudget,
    pub bindings: TraceBindings,
}

/// Build the graph and trace bindings for a world.
///
/// # Panics
///
/// Panics if the world fails to build or hash. Benchmark setup failures
/// are fatal.
pub fn prepare_search_setup(world: &dyn GraphWorld, budget: SearchBudget) -> SearchSetup {
    let built = world.build().expect("world build");
    let graph_digest = built.graph.digest().expect("graph digest");
    SearchSetup {
        graph: built.graph,
        root: built.root,
        budget,
        bindings: TraceBindings {
            world_id: world.world_id().to_string(),
            graph_digest: graph_digest.as_str().to_string(),
        },
    }
}

/// [`prepare_search_setup`] for a layered regime.
#[must_use]
pub fn prepare_regime(regime: &Regime) -> SearchSetup {
    prepare_search_setup(&regime.world, regime.budget)
}

/// Run a traced search over prepared inputs.
///
/// # Panics
///
/// Panics if engine pre-flight fails. Benchmark inputs are expected to be valid.
#[must_use]
pub fn run_search_only(setup: &SearchSetup) -> SearchResult {
    SearchEngine::new(&setup.graph, setup.root, setup.budget)
        .expect("engine pre-flight")
        .search_traced(&setup.bindings)
}

/// Digest of a result's canonical trace, for checking that a timed loop
/// keeps producing the same decisions.
///
/// # Panics
///
/// Panics if the trace cannot be serialized.
#[must_use]
pub fn determinism_guard(result: &SearchResult) -> ContentHash {
    let bytes = result
        .trace
        .to_canonical_json_bytes()
        .expect("trace serialization");
    canonical_hash(HashDomain::BenchGuard, &bytes)
}

/// Run the setup twice and fail loudly if the decisions differ.
///
/// # Panics
///
/// Panics on divergence; a non-deterministic engine makes timings meaningless.
pub fn assert_deterministic(name: &str, setup: &SearchSetup) -> ContentHash {
    let first = determinism_guard(&run_search_only(setup));
    let second = determinism_guard(&run_search_only(setup));
    assert_eq!(first, second, "{name}: search is not deterministic");
    first
}
