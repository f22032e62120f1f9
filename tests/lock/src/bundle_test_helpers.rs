//! Shared test helpers for mutating and rebuilding artifact bundles.
//!
//! Rebuilding through `build_bundle` keeps content hashes, manifest and
//! digest consistent, so a negative test trips the semantic binding it
//! targets instead of a hash mismatch.

use trailhead_harness::bundle::{build_bundle, ArtifactBundle};
use trailhead_kernel::proof::canon::canonical_json_bytes;

/// Re-canonicalize a modified copy of the JSON artifact `name` and rebuild.
///
/// # Panics
///
/// Panics if the artifact is missing or not JSON. Test-only invariants.
pub fn rebuild_with_modified_json(
    bundle: &ArtifactBundle,
    name: &str,
    modify: impl FnOnce(&mut serde_json::Value),
) -> ArtifactBundle {
    let artifact = bundle.artifacts.get(name).unwrap();
    let mut value: serde_json::Value = serde_json::from_slice(&artifact.content).unwrap();
    modify(&mut value);
    let modified = canonical_json_bytes(&value).unwrap();

    let artifacts: Vec<(String, Vec<u8>, bool)> = bundle
        .artifacts
        .values()
        .map(|a| {
            let content = if a.name == name {
                modified.clone()
            } else {
                a.content.clone()
            };
            (a.name.clone(), content, a.normative)
        })
        .collect();
    build_bundle(artifacts).unwrap()
}

/// Rebuild the bundle without the artifact `name`.
///
/// # Panics
///
/// Panics if the rebuilt bundle cannot be assembled.
pub fn rebuild_without_artifact(bundle: &ArtifactBundle, name: &str) -> ArtifactBundle {
    let artifacts: Vec<(String, Vec<u8>, bool)> = bundle
        .artifacts
        .values()
        .filter(|a| a.name != name)
        .map(|a| (a.name.clone(), a.content.clone(), a.normative))
        .collect();
    build_bundle(artifacts).unwrap()
}
