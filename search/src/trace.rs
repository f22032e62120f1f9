//! `SearchTrace`: expansion-event audit log.
//!
//! The normative decision surface is the ordered list of `ExpandEvent`
//! entries: one per popped state whose node had not been visited yet,
//! each listing every outgoing edge and what happened to it.

use trailhead_kernel::graph::{NodeId, Relation};
use trailhead_kernel::proof::canon::{canonical_json_bytes, CanonError};
use trailhead_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};

use crate::policy::{SearchBudget, SearchPolicy};
use crate::state::FrontierKey;

/// Caller-supplied bindings recorded in trace metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TraceBindings {
    /// Name of the world that built the graph.
    pub world_id: String,
    /// `ActivityGraph::digest()` of the searched graph.
    pub graph_digest: String,
}

/// The complete search audit trail.
#[derive(Debug, Clone)]
pub struct SearchTrace {
    /// Ordered expansion events (normative decision surface).
    pub expansions: Vec<ExpandEvent>,
    /// Aggregate metadata with bindings.
    pub metadata: TraceMetadata,
}

/// A single frontier-pop + child-expansion event.
#[derive(Debug, Clone)]
pub struct ExpandEvent {
    /// Total order of non-stale frontier pops.
    pub expansion_order: u64,
    /// The node being expanded.
    pub node: NodeId,
    pub identifier: String,
    /// The frontier key at time of pop.
    pub pop_key: FrontierKey,
    pub depth: u32,
    /// Whether the popped state fit both ceilings and joined the plan.
    pub accepted: bool,
    /// One record per outgoing edge, in edge order.
    pub children: Vec<ChildRecord>,
}

/// An outgoing edge with its evaluated candidate totals and outcome.
#[derive(Debug, Clone)]
pub struct ChildRecord {
    /// Index in the parent's edge list.
    pub index: u64,
    pub child: NodeId,
    pub identifier: String,
    pub relation: Relation,
    /// `parent accumulator + estimate(child)`.
    pub accumulator: f64,
    pub cumulative_time: f64,
    pub cumulative_resource: f64,
    pub outcome: ChildOutcome,
}

/// Outcome of evaluating a child during expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildOutcome {
    /// Pushed onto the frontier with this insertion sequence number.
    Enqueued { sequence: u64 },
    /// Dropped permanently; the ceiling(s) it would have broken.
    Dropped(Ceiling),
}

/// Which ceiling a dropped child exceeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ceiling {
    Time,
    Resource,
    Both,
}

impl Ceiling {
    /// Classify a candidate that failed [`SearchBudget::admits`].
    #[must_use]
    pub fn exceeded(budget: &SearchBudget, time: f64, resource: f64) -> Self {
        match (
            time > budget.available_time,
            resource > budget.available_resource,
        ) {
            (true, false) => Self::Time,
            (false, true) => Self::Resource,
            _ => Self::Both,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Time => "time",
            Self::Resource => "resource",
            Self::Both => "both",
        }
    }
}

/// Aggregate metadata with bindings.
#[derive(Debug, Clone)]
pub struct TraceMetadata {
    // Bindings
    pub world_id: String,
    pub graph_digest: String,
    pub root_identifier: String,

    // Budget and policy echo
    pub budget: SearchBudget,
    pub policy: SearchPolicy,

    // Counters
    pub total_expansions: u64,
    pub total_accepted: u64,
    pub total_duplicates_discarded: u64,
    pub total_children_enqueued: u64,
    pub total_children_dropped: u64,
    pub frontier_high_water: u64,
}

// ---------------------------------------------------------------------------
// Canonical JSON serialization
// ---------------------------------------------------------------------------

impl SearchTrace {
    /// Serialize the trace to canonical JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if serialization fails.
    pub fn to_canonical_json_bytes(&self) -> Result<Vec<u8>, CanonError> {
        canonical_json_bytes(&self.to_json_value())
    }

    /// Content hash of the canonical bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if serialization fails.
    pub fn digest(&self) -> Result<ContentHash, CanonError> {
        Ok(canonical_hash(
            HashDomain::SearchTrace,
            &self.to_canonical_json_bytes()?,
        ))
    }

    /// Build the JSON value representation.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        let expansions: Vec<serde_json::Value> =
            self.expansions.iter().map(expand_event_to_json).collect();
        serde_json::json!({
            "expansions": expansions,
            "metadata": metadata_to_json(&self.metadata),
            "schema_version": "search_trace.v1",
        })
    }
}

fn expand_event_to_json(e: &ExpandEvent) -> serde_json::Value {
    let children: Vec<serde_json::Value> = e.children.iter().map(child_record_to_json).collect();
    serde_json::json!({
        "accepted": e.accepted,
        "children": children,
        "depth": e.depth,
        "expansion_order": e.expansion_order,
        "identifier": e.identifier,
        "node_index": e.node.index(),
        "pop_key": pop_key_to_json(&e.pop_key),
    })
}

fn pop_key_to_json(k: &FrontierKey) -> serde_json::Value {
    serde_json::json!({
        "accumulator": k.accumulator,
        "cumulative_resource": k.cumulative_resource,
        "cumulative_time": k.cumulative_time,
        "sequence": k.sequence,
    })
}

fn child_record_to_json(c: &ChildRecord) -> serde_json::Value {
    serde_json::json!({
        "accumulator": c.accumulator,
        "cumulative_resource": c.cumulative_resource,
        "cumulative_time": c.cumulative_time,
        "identifier": c.identifier,
        "index": c.index,
        "node_index": c.child.index(),
        "outcome": outcome_to_json(c.outcome),
        "relation": c.relation.as_str(),
    })
}

fn outcome_to_json(o: ChildOutcome) -> serde_json::Value {
    match o {
        ChildOutcome::Enqueued { sequence } => {
            serde_json::json!({"sequence": sequence, "type": "enqueued"})
        }
        ChildOutcome::Dropped(ceiling) => {
            serde_json::json!({"exceeds": ceiling.as_str(), "type": "dropped"})
        }
    }
}

fn metadata_to_json(m: &TraceMetadata) -> serde_json::Value {
    serde_json::json!({
        "available_resource": m.budget.available_resource,
        "available_time": m.budget.available_time,
        "frontier_high_water": m.frontier_high_water,
        "graph_digest": m.graph_digest,
        "policy": m.policy.to_json_value(),
        "root_identifier": m.root_identifier,
        "total_accepted": m.total_accepted,
        "total_children_dropped": m.total_children_dropped,
        "total_children_enqueued": m.total_children_enqueued,
        "total_duplicates_discarded": m.total_duplicates_discarded,
        "total_expansions": m.total_expansions,
        "world_id": m.world_id,
    })
}
