//! Planner runner: world → graph → search → itinerary → bundle.
//!
//! The runner owns orchestration only. Worlds supply the graph, the search
//! crate decides the plan, and the bundle module packages the results.

use tracing::{debug, info};

use trailhead_kernel::graph::{ActivityGraph, GraphError};
use trailhead_kernel::proof::canon::{canonical_json_bytes, CanonError};
use trailhead_search::engine::{Plan, SearchEngine};
use trailhead_search::error::SearchError;
use trailhead_search::heuristic::AdditiveHeuristic;
use trailhead_search::policy::SearchPolicy;
use trailhead_search::trace::{SearchTrace, TraceBindings};

use crate::bundle::{
    build_bundle, ArtifactBundle, ArtifactInput, BundleBuildError, GRAPH_ARTIFACT,
    ITINERARY_ARTIFACT, PLAN_ARTIFACT, REQUEST_ARTIFACT, TRACE_ARTIFACT,
};
use crate::contract::GraphWorld;
use crate::render::render_itinerary;
use crate::request::TripRequest;

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct PlanRun {
    pub world_id: String,
    pub request: TripRequest,
    pub graph: ActivityGraph,
    pub plan: Plan,
    pub trace: SearchTrace,
    pub itinerary: String,
    pub bundle: ArtifactBundle,
}

/// Failure anywhere in the run pipeline.
#[derive(Debug)]
pub enum RunError {
    /// The world's graph failed to build or hash.
    Graph(GraphError),
    /// Pre-flight search validation failed.
    Search(SearchError),
    /// An artifact could not be canonicalized.
    Canon(CanonError),
    /// Bundle assembly failed.
    Bundle(BundleBuildError),
}

impl std::fmt::Display for RunError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Graph(e) => write!(f, "graph: {e}"),
            Self::Search(e) => write!(f, "search: {e}"),
            Self::Canon(e) => write!(f, "canonicalization: {e}"),
            Self::Bundle(e) => write!(f, "bundle: {e}"),
        }
    }
}

impl std::error::Error for RunError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Graph(e) => Some(e),
            Self::Search(e) => Some(e),
            Self::Canon(e) => Some(e),
            Self::Bundle(e) => Some(e),
        }
    }
}

impl From<GraphError> for RunError {
    fn from(e: GraphError) -> Self {
        Self::Graph(e)
    }
}

impl From<SearchError> for RunError {
    fn from(e: SearchError) -> Self {
        Self::Search(e)
    }
}

impl From<CanonError> for RunError {
    fn from(e: CanonError) -> Self {
        Self::Canon(e)
    }
}

impl From<BundleBuildError> for RunError {
    fn from(e: BundleBuildError) -> Self {
        Self::Bundle(e)
    }
}

/// Run a world through the planner and package the result.
///
/// Pipeline:
/// 1. `world.build()` → graph + root, graph digest
/// 2. `SearchEngine::with_parts` (pre-flight validation)
/// 3. `search_traced` with the world id and graph digest bound into the trace
/// 4. Render the itinerary
/// 5. Assemble the bundle: `request.json`, `graph.json`, `plan.json`,
///    `search_trace.json` (normative) and `itinerary.txt` (observational)
///
/// # Errors
///
/// Returns [`RunError`] if the graph fails to build, the search inputs fail
/// validation, or an artifact cannot be serialized.
pub fn run_plan(
    world: &dyn GraphWorld,
    request: &TripRequest,
    policy: SearchPolicy,
) -> Result<PlanRun, RunError> {
    let world_id = world.world_id().to_string();
    let built = world.build()?;
    let graph_digest = built.graph.digest()?;
    debug!(
        world_id = %world_id,
        nodes = built.graph.len(),
        edges = built.graph.edge_count(),
        graph_digest = %graph_digest,
        "world built"
    );

    let engine = SearchEngine::with_parts(
        &built.graph,
        built.root,
        request.search_budget(),
        policy,
        AdditiveHeuristic,
    )?;
    let bindings = TraceBindings {
        world_id: world_id.clone(),
        graph_digest: graph_digest.as_str().to_string(),
    };
    let result = engine.search_traced(&bindings);
    let itinerary = render_itinerary(&built.graph, &result.plan);

    let request_value = serde_json::json!({
        "policy": policy.to_json_value(),
        "policy_digest": policy.digest()?.as_str(),
        "request": request.to_json_value(),
        "schema_version": "request.v1",
        "world_id": world_id,
    });
    let artifacts: Vec<ArtifactInput> = vec![
        (REQUEST_ARTIFACT, canonical_json_bytes(&request_value)?, true).into(),
        (GRAPH_ARTIFACT, built.graph.canonical_bytes()?, true).into(),
        (
            PLAN_ARTIFACT,
            canonical_json_bytes(&result.plan.to_json_value())?,
            true,
        )
            .into(),
        (TRACE_ARTIFACT, result.trace.to_canonical_json_bytes()?, true).into(),
        (ITINERARY_ARTIFACT, itinerary.clone().into_bytes(), false).into(),
    ];
    let bundle = build_bundle(artifacts)?;

    info!(
        world_id = %world_id,
        num_days = request.num_days,
        budget = request.budget,
        accepted = result.plan.len(),
        total_cost = result.plan.total_cost,
        bundle_digest = %bundle.digest,
        "plan complete"
    );

    Ok(PlanRun {
        world_id,
        request: *request,
        graph: built.graph,
        plan: result.plan,
        trace: result.trace,
        itinerary,
        bundle,
    })
}
