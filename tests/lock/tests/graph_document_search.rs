//! End-to-end search over graphs loaded from JSON documents.
//!
//! Proves:
//! 1. A document-defined graph plans the same as one built in code
//! 2. Edges may reference nodes declared later in the document
//! 3. Cycles terminate; each node is accepted at most once
//! 4. AND-tagged edges plan exactly like OR-tagged edges
//! 5. Malformed documents fail at build time with typed errors

use trailhead_harness::contract::GraphWorld;
use trailhead_harness::request::TripRequest;
use trailhead_harness::runner::run_plan;
use trailhead_harness::worlds::document::GraphDocument;
use trailhead_kernel::graph::GraphError;
use trailhead_search::engine::SearchEngine;
use trailhead_search::policy::{SearchBudget, SearchPolicy};

fn node(id: &str, t: f64, r: f64, d: f64, edges: &[(&str, &str)]) -> serde_json::Value {
    let edges: Vec<serde_json::Value> = edges
        .iter()
        .map(|(child, relation)| serde_json::json!({"child": child, "relation": relation}))
        .collect();
    serde_json::json!({
        "identifier": id,
        "time_cost": t,
        "resource_cost": r,
        "desirability": d,
        "edges": edges,
    })
}

fn document(nodes: Vec<serde_json::Value>) -> GraphDocument {
    let text = serde_json::json!({ "nodes": nodes }).to_string();
    GraphDocument::parse("doc", &text).unwrap()
}

fn plan_ids(doc: &GraphDocument, budget: SearchBudget) -> (Vec<String>, f64) {
    let world = doc.build().unwrap();
    let plan = SearchEngine::new(&world.graph, world.root, budget)
        .unwrap()
        .search();
    let ids = plan.identifiers().into_iter().map(String::from).collect();
    (ids, plan.total_cost)
}

#[test]
fn three_node_chain_stops_at_resource_ceiling() {
    let doc = document(vec![
        node("A", 1.0, 5.0, 3.0, &[("B", "or")]),
        node("B", 2.0, 5.0, 8.0, &[("C", "or")]),
        node("C", 5.0, 50.0, 1.0, &[]),
    ]);
    let (ids, total) = plan_ids(&doc, SearchBudget::new(10.0, 20.0));
    assert_eq!(ids, vec!["A", "B"]);
    assert!((total - 5.0).abs() < f64::EPSILON);
}

#[test]
fn forward_references_resolve() {
    let doc = document(vec![
        node("start", 0.0, 0.0, 0.0, &[("later", "or")]),
        node("later", 1.0, 1.0, 0.0, &[]),
    ]);
    let (ids, _) = plan_ids(&doc, SearchBudget::new(5.0, 5.0));
    assert_eq!(ids, vec!["start", "later"]);
}

#[test]
fn cycle_terminates_with_each_node_once() {
    let doc = document(vec![
        node("a", 0.0, 0.0, 0.0, &[("b", "or")]),
        node("b", 1.0, 1.0, 0.0, &[("c", "or")]),
        node("c", 1.0, 1.0, 0.0, &[("a", "or"), ("b", "or")]),
    ]);
    let (ids, total) = plan_ids(&doc, SearchBudget::new(100.0, 100.0));
    assert_eq!(ids, vec!["a", "b", "c"]);
    assert!((total - 2.0).abs() < f64::EPSILON);
}

#[test]
fn and_edges_plan_like_or_edges() {
    let build = |relation: &str| {
        document(vec![
            node("root", 0.0, 0.0, 0.0, &[("x", relation), ("y", relation)]),
            node("x", 2.0, 4.0, 1.0, &[("z", relation)]),
            node("y", 1.0, 1.0, 5.0, &[]),
            node("z", 1.0, 1.0, 1.0, &[]),
        ])
    };
    let budget = SearchBudget::new(8.0, 8.0);
    let (or_ids, or_total) = plan_ids(&build("or"), budget);
    let (and_ids, and_total) = plan_ids(&build("and"), budget);
    assert_eq!(or_ids, vec!["root", "y", "x", "z"]);
    assert_eq!(and_ids, or_ids);
    assert_eq!(and_total.to_bits(), or_total.to_bits());
}

#[test]
fn explicit_root_overrides_first_node() {
    let text = serde_json::json!({
        "root": "second",
        "nodes": [
            node("first", 1.0, 1.0, 0.0, &[]),
            node("second", 1.0, 1.0, 0.0, &[("first", "or")]),
        ],
    })
    .to_string();
    let doc = GraphDocument::parse("doc", &text).unwrap();
    let (ids, _) = plan_ids(&doc, SearchBudget::new(5.0, 5.0));
    assert_eq!(ids, vec!["second", "first"]);
}

#[test]
fn document_world_runs_through_the_harness() {
    let doc = document(vec![
        node("A", 1.0, 5.0, 3.0, &[("B", "or")]),
        node("B", 2.0, 5.0, 8.0, &[]),
    ]);
    let run = run_plan(
        &doc,
        &TripRequest::new(1, 20.0).unwrap(),
        SearchPolicy::default(),
    )
    .unwrap();
    assert_eq!(run.world_id, "doc");
    assert_eq!(run.plan.identifiers(), vec!["A", "B"]);
    assert_eq!(run.trace.metadata.root_identifier, "A");
}

#[test]
fn malformed_documents_fail_with_typed_errors() {
    assert!(matches!(
        GraphDocument::parse("doc", "{not json"),
        Err(GraphError::ParseError { .. })
    ));

    let dangling = document(vec![node("a", 0.0, 0.0, 0.0, &[("ghost", "or")])]);
    assert!(matches!(
        dangling.build(),
        Err(GraphError::UnknownIdentifier { .. })
    ));

    let bad_relation = document(vec![
        node("a", 0.0, 0.0, 0.0, &[("b", "xor")]),
        node("b", 0.0, 0.0, 0.0, &[]),
    ]);
    assert!(matches!(
        bad_relation.build(),
        Err(GraphError::ParseError { .. })
    ));

    let negative = document(vec![node("a", -1.0, 0.0, 0.0, &[])]);
    assert!(matches!(
        negative.build(),
        Err(GraphError::InvalidAttribute { .. })
    ));
}
