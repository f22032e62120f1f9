//! Persisted bundle directories for real plan runs.
//!
//! Proves:
//! 1. write → read round-trips every artifact byte-for-byte
//! 2. The digest survives persistence
//! 3. On-disk tampering is caught on read
//! 4. Stray files and missing artifacts are rejected
//! 5. Bundles for graphs with inexact fractional costs verify after persistence

use std::path::Path;

use trailhead_harness::bundle::{
    verify_bundle, BundleVerifyError, GRAPH_ARTIFACT, PLAN_ARTIFACT, TRACE_ARTIFACT,
};
use trailhead_harness::bundle_dir::{read_bundle_dir, write_bundle_dir, BundleDirError};
use trailhead_harness::request::TripRequest;
use trailhead_harness::runner::{run_plan, PlanRun};
use trailhead_harness::worlds::document::GraphDocument;
use trailhead_harness::worlds::layered::{LayeredConfig, LayeredWorld};
use trailhead_harness::worlds::paris::ParisSample;
use trailhead_search::policy::SearchPolicy;

fn paris_run() -> PlanRun {
    run_plan(
        &ParisSample,
        &TripRequest::new(3, 200.0).unwrap(),
        SearchPolicy::default(),
    )
    .unwrap()
}

fn persisted(run: &PlanRun) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_bundle_dir(&run.bundle, dir.path()).unwrap();
    dir
}

fn overwrite_json(dir: &Path, name: &str, modify: impl FnOnce(&mut serde_json::Value)) {
    let path = dir.join(name);
    let mut value: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    modify(&mut value);
    std::fs::write(&path, serde_json::to_vec(&value).unwrap()).unwrap();
}

#[test]
fn paris_bundle_roundtrips() {
    let run = paris_run();
    let dir = persisted(&run);
    let loaded = read_bundle_dir(dir.path()).unwrap();
    assert_eq!(loaded.digest, run.bundle.digest);
    assert_eq!(loaded.manifest, run.bundle.manifest);
    assert_eq!(loaded.artifacts.len(), run.bundle.artifacts.len());
    for (name, artifact) in &run.bundle.artifacts {
        let read = loaded.get(name).unwrap();
        assert_eq!(read.content, artifact.content, "{name} bytes");
        assert_eq!(read.normative, artifact.normative, "{name} normative");
    }
}

#[test]
fn layered_bundle_roundtrips() {
    let world = LayeredWorld::new(LayeredConfig::default());
    let run = run_plan(
        &world,
        &TripRequest::new(2, 80.0).unwrap(),
        SearchPolicy::default(),
    )
    .unwrap();
    let dir = persisted(&run);
    assert_eq!(read_bundle_dir(dir.path()).unwrap().digest, run.bundle.digest);
}

#[test]
fn rewriting_is_idempotent() {
    let run = paris_run();
    let dir = persisted(&run);
    write_bundle_dir(&run.bundle, dir.path()).unwrap();
    assert_eq!(read_bundle_dir(dir.path()).unwrap().digest, run.bundle.digest);
}

#[test]
fn edited_plan_on_disk_is_caught() {
    let run = paris_run();
    let dir = persisted(&run);
    overwrite_json(dir.path(), PLAN_ARTIFACT, |plan| {
        plan["total_cost"] = serde_json::json!(1);
    });
    assert!(matches!(
        read_bundle_dir(dir.path()),
        Err(BundleDirError::Verify(BundleVerifyError::ContentHashMismatch { .. }))
    ));
}

#[test]
fn stray_file_is_rejected() {
    let run = paris_run();
    let dir = persisted(&run);
    std::fs::write(dir.path().join("notes.txt"), b"hello").unwrap();
    assert!(matches!(
        read_bundle_dir(dir.path()),
        Err(BundleDirError::ExtraFile { ref name }) if name == "notes.txt"
    ));
}

#[test]
fn deleted_artifact_is_reported_by_name() {
    let run = paris_run();
    let dir = persisted(&run);
    for name in [GRAPH_ARTIFACT, TRACE_ARTIFACT] {
        let path = dir.path().join(name);
        let saved = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(
            read_bundle_dir(dir.path()),
            Err(BundleDirError::MissingArtifact { name: ref missing }) if missing == name
        ));
        std::fs::write(&path, saved).unwrap();
    }
    read_bundle_dir(dir.path()).unwrap();
}

/// A three-level fan-out whose costs are not exact binary fractions.
fn fractional_document(seed: u32) -> GraphDocument {
    let s = f64::from(seed);
    let cost = |k: f64| (s + k) / 7.0 + 0.1 * k;
    let node = |id: &str, k: f64, edges: &[&str]| {
        let edges: Vec<serde_json::Value> = edges
            .iter()
            .map(|child| serde_json::json!({"child": child, "relation": "or"}))
            .collect();
        serde_json::json!({
            "identifier": id,
            "time_cost": cost(k) / 10.0,
            "resource_cost": cost(k + 1.0),
            "desirability": cost(k + 2.0) / 3.0,
            "edges": edges,
        })
    };
    let text = serde_json::json!({
        "nodes": [
            node("root", 0.0, &["a", "b"]),
            node("a", 1.0, &["c"]),
            node("b", 2.0, &["c", "d"]),
            node("c", 3.0, &[]),
            node("d", 4.0, &[]),
        ]
    })
    .to_string();
    GraphDocument::parse(format!("fractional-{seed}"), &text).unwrap()
}

#[test]
fn fractional_cost_bundles_verify_after_persistence() {
    let request = TripRequest::new(1, 100.0).unwrap();
    for seed in 0..64 {
        let run = run_plan(&fractional_document(seed), &request, SearchPolicy::default()).unwrap();
        assert!(run.plan.steps.len() > 1, "seed {seed}: plan stopped at the root");
        verify_bundle(&run.bundle)
            .unwrap_or_else(|e| panic!("seed {seed}: fresh bundle failed verify: {e}"));
        let dir = persisted(&run);
        let loaded = read_bundle_dir(dir.path())
            .unwrap_or_else(|e| panic!("seed {seed}: persisted bundle failed read: {e}"));
        assert_eq!(loaded.digest, run.bundle.digest, "seed {seed}");
    }
}
