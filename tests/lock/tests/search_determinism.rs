//! In-process determinism and regime behavior.
//!
//! Proves:
//! 1. N=10 runs of the same world produce identical canonical trace bytes
//! 2. The bundle digest is stable across runs
//! 3. Each layered regime exercises the search behavior it is named for
//! 4. Every accepted step respects both ceilings, in every regime
//! 5. No node is accepted twice; every accepted step extends an earlier one

use std::collections::BTreeSet;

use trailhead_harness::contract::GraphWorld;
use trailhead_harness::request::TripRequest;
use trailhead_harness::runner::run_plan;
use trailhead_harness::worlds::layered::{
    regime_tight_budget, regime_unconstrained, regime_wide_frontier, Regime,
};
use trailhead_harness::worlds::paris::ParisSample;
use trailhead_search::engine::{Plan, SearchEngine, SearchResult};
use trailhead_search::policy::{SearchBudget, SearchPolicy};
use trailhead_search::trace::TraceBindings;

const N: usize = 10;

fn regimes() -> Vec<(&'static str, Regime)> {
    vec![
        ("unconstrained", regime_unconstrained()),
        ("tight_budget", regime_tight_budget()),
        ("wide_frontier", regime_wide_frontier()),
    ]
}

fn run_regime(regime: &Regime) -> (usize, SearchResult) {
    let world = regime.world.build().unwrap();
    let bindings = TraceBindings {
        world_id: regime.world.world_id().to_string(),
        graph_digest: world.graph.digest().unwrap().as_str().to_string(),
    };
    let result = SearchEngine::new(&world.graph, world.root, regime.budget)
        .unwrap()
        .search_traced(&bindings);
    (world.graph.len(), result)
}

fn assert_plan_well_formed(plan: &Plan, budget: SearchBudget, label: &str) {
    let mut seen = BTreeSet::new();
    for (i, step) in plan.steps.iter().enumerate() {
        assert!(
            budget.admits(step.cumulative_time, step.cumulative_resource),
            "{label}: step {i} ({}) exceeds a ceiling",
            step.identifier
        );
        assert!(
            seen.insert(step.node),
            "{label}: {} accepted twice",
            step.identifier
        );
        match step.parent {
            None => assert_eq!(i, 0, "{label}: only the root has no parent"),
            Some(parent) => assert!(
                plan.steps[..i].iter().any(|s| s.node == parent),
                "{label}: {} accepted before its parent",
                step.identifier
            ),
        }
    }
}

#[test]
fn paris_trace_bytes_identical_across_runs() {
    let request = TripRequest::new(2, 100.0).unwrap();
    let first = run_plan(&ParisSample, &request, SearchPolicy::default()).unwrap();
    let baseline = first.trace.to_canonical_json_bytes().unwrap();
    for i in 1..N {
        let run = run_plan(&ParisSample, &request, SearchPolicy::default()).unwrap();
        assert_eq!(
            run.trace.to_canonical_json_bytes().unwrap(),
            baseline,
            "run {i} trace bytes diverged"
        );
        assert_eq!(run.bundle.digest, first.bundle.digest, "run {i} bundle digest");
    }
}

#[test]
fn regime_trace_bytes_identical_across_runs() {
    for (name, regime) in regimes() {
        let baseline = run_regime(&regime).1.trace.to_canonical_json_bytes().unwrap();
        for i in 1..N {
            let bytes = run_regime(&regime).1.trace.to_canonical_json_bytes().unwrap();
            assert_eq!(bytes, baseline, "{name}: run {i} trace bytes diverged");
        }
    }
}

#[test]
fn regimes_meet_their_expectations() {
    for (name, regime) in regimes() {
        let (node_count, result) = run_regime(&regime);
        let meta = &result.trace.metadata;
        let expect = &regime.expectations;

        assert!(
            meta.total_duplicates_discarded >= expect.min_duplicates_discarded,
            "{name}: duplicates {} < {}",
            meta.total_duplicates_discarded,
            expect.min_duplicates_discarded
        );
        assert!(
            meta.total_children_dropped >= expect.min_children_dropped,
            "{name}: dropped {} < {}",
            meta.total_children_dropped,
            expect.min_children_dropped
        );
        assert!(
            meta.frontier_high_water >= expect.min_frontier_high_water,
            "{name}: high water {} < {}",
            meta.frontier_high_water,
            expect.min_frontier_high_water
        );
        assert_eq!(
            result.plan.len() == node_count,
            expect.expects_full_coverage,
            "{name}: accepted {} of {node_count} nodes",
            result.plan.len()
        );
    }
}

#[test]
fn counters_agree_with_trace_events() {
    for (name, regime) in regimes() {
        let (_, result) = run_regime(&regime);
        let meta = &result.trace.metadata;
        let children: u64 = result
            .trace
            .expansions
            .iter()
            .map(|e| e.children.len() as u64)
            .sum();
        assert_eq!(meta.total_expansions, result.trace.expansions.len() as u64, "{name}");
        assert_eq!(meta.total_accepted, result.plan.len() as u64, "{name}");
        assert_eq!(
            meta.total_children_enqueued + meta.total_children_dropped,
            children,
            "{name}: every outgoing edge is either enqueued or dropped"
        );
        // Every enqueued state is eventually popped: as an expansion or as a
        // duplicate. The root accounts for the one extra pop.
        assert_eq!(
            meta.total_expansions + meta.total_duplicates_discarded,
            meta.total_children_enqueued + 1,
            "{name}"
        );
    }
}

#[test]
fn accepted_steps_respect_both_ceilings() {
    for (name, regime) in regimes() {
        let (_, result) = run_regime(&regime);
        assert_plan_well_formed(&result.plan, regime.budget, name);
    }
    for (days, budget) in [(1, 50.0), (2, 100.0), (3, 200.0), (1, 10.0)] {
        let world = ParisSample.build().unwrap();
        let engine = SearchEngine::for_trip(&world.graph, world.root, days, budget).unwrap();
        assert_plan_well_formed(&engine.search(), engine.budget(), "paris");
    }
}

#[test]
fn plan_matches_accepted_trace_events() {
    for (name, regime) in regimes() {
        let (_, result) = run_regime(&regime);
        let accepted: Vec<&str> = result
            .trace
            .expansions
            .iter()
            .filter(|e| e.accepted)
            .map(|e| e.identifier.as_str())
            .collect();
        assert_eq!(result.plan.identifiers(), accepted, "{name}");
    }
}
