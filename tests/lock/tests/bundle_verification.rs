//! Bundle integrity and semantic bindings over real plan runs.
//!
//! Proves:
//! 1. A fresh run's bundle verifies
//! 2. Tampered bytes fail the content hash check
//! 3. A trace bound to a different graph fails the graph digest binding
//! 4. An edited `graph.json` fails the graph digest binding
//! 5. A plan that disagrees with the trace fails the plan/trace binding
//! 6. The observational itinerary does not contribute to the digest
//! 7. Bundles missing optional artifacts still verify

use lock_tests::bundle_test_helpers::{rebuild_with_modified_json, rebuild_without_artifact};
use trailhead_harness::bundle::{
    verify_bundle, BundleVerifyError, GRAPH_ARTIFACT, ITINERARY_ARTIFACT, PLAN_ARTIFACT,
    REQUEST_ARTIFACT, TRACE_ARTIFACT,
};
use trailhead_harness::request::TripRequest;
use trailhead_harness::runner::{run_plan, PlanRun};
use trailhead_harness::worlds::paris::ParisSample;
use trailhead_search::policy::SearchPolicy;

fn paris_run() -> PlanRun {
    run_plan(
        &ParisSample,
        &TripRequest::new(2, 100.0).unwrap(),
        SearchPolicy::default(),
    )
    .unwrap()
}

#[test]
fn fresh_bundle_verifies() {
    let run = paris_run();
    verify_bundle(&run.bundle).unwrap();
    let names: Vec<&str> = run.bundle.artifacts.keys().map(String::as_str).collect();
    assert_eq!(
        names,
        vec![
            GRAPH_ARTIFACT,
            ITINERARY_ARTIFACT,
            PLAN_ARTIFACT,
            REQUEST_ARTIFACT,
            TRACE_ARTIFACT
        ]
    );
}

#[test]
fn tampered_bytes_fail_content_hash() {
    let mut bundle = paris_run().bundle;
    let plan = bundle.artifacts.get_mut(PLAN_ARTIFACT).unwrap();
    let last = plan.content.len() - 1;
    plan.content[last] ^= 0x01;
    assert!(matches!(
        verify_bundle(&bundle),
        Err(BundleVerifyError::ContentHashMismatch { ref artifact, .. }) if artifact == PLAN_ARTIFACT
    ));
}

#[test]
fn trace_bound_to_other_graph_fails() {
    let run = paris_run();
    let forged = "sha256:0000000000000000000000000000000000000000000000000000000000000000";
    let bundle = rebuild_with_modified_json(&run.bundle, TRACE_ARTIFACT, |trace| {
        trace["metadata"]["graph_digest"] = serde_json::json!(forged);
    });
    match verify_bundle(&bundle) {
        Err(BundleVerifyError::GraphDigestMismatch {
            in_trace,
            recomputed,
        }) => {
            assert_eq!(in_trace, forged);
            assert_eq!(recomputed, run.trace.metadata.graph_digest);
        }
        other => panic!("expected GraphDigestMismatch, got {other:?}"),
    }
}

#[test]
fn edited_graph_fails_digest_binding() {
    let run = paris_run();
    let bundle = rebuild_with_modified_json(&run.bundle, GRAPH_ARTIFACT, |graph| {
        graph["nodes"][1]["resource_cost"] = serde_json::json!(1);
    });
    assert!(matches!(
        verify_bundle(&bundle),
        Err(BundleVerifyError::GraphDigestMismatch { .. })
    ));
}

#[test]
fn trace_without_graph_digest_fails() {
    let run = paris_run();
    let bundle = rebuild_with_modified_json(&run.bundle, TRACE_ARTIFACT, |trace| {
        if let Some(meta) = trace["metadata"].as_object_mut() {
            meta.remove("graph_digest");
        }
    });
    assert_eq!(
        verify_bundle(&bundle),
        Err(BundleVerifyError::GraphDigestMissing)
    );
}

#[test]
fn plan_disagreeing_with_trace_fails() {
    let run = paris_run();
    let bundle = rebuild_with_modified_json(&run.bundle, PLAN_ARTIFACT, |plan| {
        if let Some(ids) = plan["plan"].as_array_mut() {
            ids.swap(1, 2);
        }
    });
    assert!(matches!(
        verify_bundle(&bundle),
        Err(BundleVerifyError::PlanTraceMismatch { .. })
    ));
}

#[test]
fn itinerary_is_outside_the_digest() {
    let run = paris_run();
    let without = rebuild_without_artifact(&run.bundle, ITINERARY_ARTIFACT);
    verify_bundle(&without).unwrap();
    assert_eq!(without.digest, run.bundle.digest);
}

#[test]
fn bundles_missing_bound_artifacts_still_verify() {
    let run = paris_run();
    for name in [GRAPH_ARTIFACT, PLAN_ARTIFACT, TRACE_ARTIFACT] {
        let bundle = rebuild_without_artifact(&run.bundle, name);
        verify_bundle(&bundle).unwrap_or_else(|e| panic!("without {name}: {e}"));
        assert_ne!(bundle.digest, run.bundle.digest, "{name} is normative");
    }
}
