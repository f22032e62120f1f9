//! Search entry point and expansion loop.
//!
//! # Algorithm
//!
//! ```text
//! push (estimate(root), 0, 0, root)
//! while pop → state:
//!     visited(node)?            → discard
//!     mark visited
//!     fits both ceilings?       → append to plan, total_cost := cumulative_resource
//!     for (child, relation) in edges:
//!         t' = t + child.time, r' = r + child.resource, a' = a + estimate(child)
//!         fits both ceilings?   → push, else drop for good
//! ```
//!
//! The root's own costs never enter the cumulative totals, the AND/OR tag
//! does not change expansion, and a node is finalized through whichever
//! path pops first. These are properties of the planner, not accidents of
//! this implementation; see the policy module for the reserved alternatives.

use tracing::{debug, trace};

use trailhead_kernel::graph::{ActivityGraph, GraphNode, NodeId};

use crate::error::SearchError;
use crate::frontier::BestFirstFrontier;
use crate::heuristic::{AdditiveHeuristic, Heuristic};
use crate::policy::{SearchBudget, SearchPolicy};
use crate::state::SearchState;
use crate::trace::{
    Ceiling, ChildOutcome, ChildRecord, ExpandEvent, SearchTrace, TraceBindings, TraceMetadata,
};

/// One accepted node of a plan, with the path totals it was accepted at.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanStep {
    pub node: NodeId,
    pub identifier: String,
    pub parent: Option<NodeId>,
    pub depth: u32,
    pub accumulator: f64,
    pub cumulative_time: f64,
    pub cumulative_resource: f64,
}

/// The result of a search: accepted nodes in acceptance order and the
/// cumulative resource cost of the last accepted node.
///
/// `total_cost` is overwritten by each accepted node, not summed over the
/// plan; it is 0 when nothing was accepted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Plan {
    pub steps: Vec<PlanStep>,
    pub total_cost: f64,
}

impl Plan {
    /// Accepted identifiers in order.
    #[must_use]
    pub fn identifiers(&self) -> Vec<&str> {
        self.steps.iter().map(|s| s.identifier.as_str()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// JSON form: `{"plan": [identifiers], "steps": [...], "total_cost": x}`.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        let steps: Vec<serde_json::Value> = self
            .steps
            .iter()
            .map(|s| {
                serde_json::json!({
                    "accumulator": s.accumulator,
                    "cumulative_resource": s.cumulative_resource,
                    "cumulative_time": s.cumulative_time,
                    "depth": s.depth,
                    "identifier": s.identifier,
                    "node_index": s.node.index(),
                    "parent_index": s.parent.map(NodeId::index),
                })
            })
            .collect();
        serde_json::json!({
            "plan": self.identifiers(),
            "steps": steps,
            "total_cost": self.total_cost,
        })
    }
}

/// Result of a traced search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub plan: Plan,
    pub trace: SearchTrace,
}

/// Greedy best-first planner over a borrowed [`ActivityGraph`].
///
/// The engine never mutates the graph. Frontier and visited state are
/// local to each `search` call, so one engine (or several engines over the
/// same graph, on different threads) can be searched repeatedly.
#[derive(Debug, Clone)]
pub struct SearchEngine<'g, H = AdditiveHeuristic> {
    graph: &'g ActivityGraph,
    root: NodeId,
    budget: SearchBudget,
    policy: SearchPolicy,
    heuristic: H,
}

impl<'g> SearchEngine<'g, AdditiveHeuristic> {
    /// Engine with the additive heuristic and the default policy.
    ///
    /// # Errors
    ///
    /// See [`SearchEngine::with_parts`].
    pub fn new(
        graph: &'g ActivityGraph,
        root: NodeId,
        budget: SearchBudget,
    ) -> Result<Self, SearchError> {
        Self::with_parts(
            graph,
            root,
            budget,
            SearchPolicy::default(),
            AdditiveHeuristic,
        )
    }

    /// Engine for a trip of `num_days` (8 hours each) and a cost budget.
    ///
    /// # Errors
    ///
    /// See [`SearchEngine::with_parts`].
    pub fn for_trip(
        graph: &'g ActivityGraph,
        root: NodeId,
        num_days: u32,
        available_budget: f64,
    ) -> Result<Self, SearchError> {
        Self::new(graph, root, SearchBudget::from_trip(num_days, available_budget))
    }
}

impl<'g, H: Heuristic> SearchEngine<'g, H> {
    /// Fully specified engine.
    ///
    /// # Errors
    ///
    /// - [`SearchError::RootNotInGraph`] if `root` is out of range for `graph`.
    /// - [`SearchError::InvalidBudget`] for negative or non-finite ceilings.
    /// - [`SearchError::UnsupportedPolicyMode`] for reserved policy options.
    pub fn with_parts(
        graph: &'g ActivityGraph,
        root: NodeId,
        budget: SearchBudget,
        policy: SearchPolicy,
        heuristic: H,
    ) -> Result<Self, SearchError> {
        if !graph.contains(root) {
            return Err(SearchError::RootNotInGraph { root });
        }
        budget.validate()?;
        policy.validate()?;
        Ok(Self {
            graph,
            root,
            budget,
            policy,
            heuristic,
        })
    }

    #[must_use]
    pub fn budget(&self) -> SearchBudget {
        self.budget
    }

    #[must_use]
    pub fn policy(&self) -> SearchPolicy {
        self.policy
    }

    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Run the search and return the plan.
    #[must_use]
    pub fn search(&self) -> Plan {
        self.run(None).0
    }

    /// Run the search and also return the expansion audit trail.
    #[must_use]
    pub fn search_traced(&self, bindings: &TraceBindings) -> SearchResult {
        let mut events = Vec::new();
        let (plan, counters) = self.run(Some(&mut events));
        let root_identifier = self
            .graph
            .node(self.root)
            .map(|n| n.identifier().to_string())
            .unwrap_or_default();
        let trace = SearchTrace {
            expansions: events,
            metadata: TraceMetadata {
                world_id: bindings.world_id.clone(),
                graph_digest: bindings.graph_digest.clone(),
                root_identifier,
                budget: self.budget,
                policy: self.policy,
                total_expansions: counters.expansions,
                total_accepted: plan.len() as u64,
                total_duplicates_discarded: counters.duplicates,
                total_children_enqueued: counters.enqueued,
                total_children_dropped: counters.dropped,
                frontier_high_water: counters.high_water,
            },
        };
        SearchResult { plan, trace }
    }

    fn run(&self, mut events: Option<&mut Vec<ExpandEvent>>) -> (Plan, Counters) {
        let mut frontier = BestFirstFrontier::new();
        let mut plan = Plan::default();
        let mut counters = Counters::default();

        let Some(root) = self.graph.node(self.root) else {
            return (plan, counters);
        };
        frontier.push(SearchState::root(self.root, self.heuristic.estimate(root)));

        while let Some(current) = frontier.pop() {
            if !frontier.mark_visited(current.node) {
                counters.duplicates += 1;
                trace!(node = %current.node, "discarding state for visited node");
                continue;
            }
            let Some(node) = self.graph.node(current.node) else {
                continue;
            };

            let accepted = self
                .budget
                .admits(current.cumulative_time, current.cumulative_resource);
            if accepted {
                plan.total_cost = current.cumulative_resource;
                plan.steps.push(PlanStep {
                    node: current.node,
                    identifier: node.identifier().to_string(),
                    parent: current.parent,
                    depth: current.depth,
                    accumulator: current.accumulator,
                    cumulative_time: current.cumulative_time,
                    cumulative_resource: current.cumulative_resource,
                });
            }
            debug!(
                identifier = node.identifier(),
                accumulator = current.accumulator,
                cumulative_time = current.cumulative_time,
                cumulative_resource = current.cumulative_resource,
                accepted,
                "expanding"
            );

            let children = self.expand(&current, node, &mut frontier, &mut counters);
            if let Some(events) = events.as_deref_mut() {
                events.push(ExpandEvent {
                    expansion_order: counters.expansions,
                    node: current.node,
                    identifier: node.identifier().to_string(),
                    pop_key: current.key(),
                    depth: current.depth,
                    accepted,
                    children,
                });
            }
            counters.expansions += 1;
        }

        counters.high_water = frontier.high_water();
        debug!(
            accepted = plan.len(),
            total_cost = plan.total_cost,
            expansions = counters.expansions,
            "search finished"
        );
        (plan, counters)
    }

    /// Evaluate every outgoing edge of `node`, pushing the children that fit.
    fn expand(
        &self,
        current: &SearchState,
        node: &GraphNode,
        frontier: &mut BestFirstFrontier,
        counters: &mut Counters,
    ) -> Vec<ChildRecord> {
        let mut records = Vec::with_capacity(node.edges().len());
        for (index, edge) in node.edges().iter().enumerate() {
            let Some(child) = self.graph.node(edge.child) else {
                continue;
            };
            let cumulative_time = current.cumulative_time + child.time_cost();
            let cumulative_resource = current.cumulative_resource + child.resource_cost();
            let accumulator = current.accumulator + self.heuristic.estimate(child);

            let outcome = if self.budget.admits(cumulative_time, cumulative_resource) {
                counters.enqueued += 1;
                let sequence = frontier.push(SearchState {
                    accumulator,
                    cumulative_time,
                    cumulative_resource,
                    node: edge.child,
                    parent: Some(current.node),
                    depth: current.depth + 1,
                    sequence: 0,
                });
                ChildOutcome::Enqueued { sequence }
            } else {
                counters.dropped += 1;
                let ceiling = Ceiling::exceeded(&self.budget, cumulative_time, cumulative_resource);
                trace!(
                    child = child.identifier(),
                    ?ceiling,
                    "dropping child over ceiling"
                );
                ChildOutcome::Dropped(ceiling)
            };

            records.push(ChildRecord {
                index: index as u64,
                child: edge.child,
                identifier: child.identifier().to_string(),
                relation: edge.relation,
                accumulator,
                cumulative_time,
                cumulative_resource,
                outcome,
            });
        }
        records
    }
}

#[derive(Debug, Default)]
struct Counters {
    expansions: u64,
    duplicates: u64,
    enqueued: u64,
    dropped: u64,
    high_water: u64,
}
