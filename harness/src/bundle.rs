//! In-memory artifact bundle: the output of a planner run.
//!
//! No file I/O in this module; see `bundle_dir` for persistence.
//!
//! # Normative vs observational artifacts
//!
//! Each artifact is tagged `normative` (participates in the bundle digest)
//! or observational (listed in the manifest, excluded from the digest).
//! `itinerary.txt` is observational: it is a presentation of `plan.json`
//! and may change wording without changing the decision.
//!
//! The bundle digest is computed over the **digest basis**: a canonical
//! JSON projection of normative artifact hashes only.

use std::collections::BTreeMap;

use trailhead_kernel::graph::ActivityGraph;
use trailhead_kernel::proof::canon::canonical_json_bytes;
use trailhead_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};

/// Domain prefix for artifact content hashing.
pub const DOMAIN_BUNDLE_ARTIFACT: HashDomain = HashDomain::BundleArtifact;

/// Domain prefix for bundle digest computation.
pub const DOMAIN_BUNDLE_DIGEST: HashDomain = HashDomain::BundleDigest;

pub const REQUEST_ARTIFACT: &str = "request.json";
pub const GRAPH_ARTIFACT: &str = "graph.json";
pub const PLAN_ARTIFACT: &str = "plan.json";
pub const TRACE_ARTIFACT: &str = "search_trace.json";
pub const ITINERARY_ARTIFACT: &str = "itinerary.txt";

/// A single artifact in the bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleArtifact {
    /// Logical filename (e.g., `"plan.json"`).
    pub name: String,
    pub content: Vec<u8>,
    /// `canonical_hash(DOMAIN_BUNDLE_ARTIFACT, content)`.
    pub content_hash: ContentHash,
    /// Whether this artifact participates in the bundle digest.
    pub normative: bool,
}

/// The complete artifact bundle from one run.
#[derive(Debug, Clone)]
pub struct ArtifactBundle {
    /// Artifacts indexed by logical name, in sorted order.
    pub artifacts: BTreeMap<String, BundleArtifact>,
    /// Canonical JSON listing all artifacts with normative flags.
    pub manifest: Vec<u8>,
    /// Canonical JSON listing normative artifact hashes only.
    pub digest_basis: Vec<u8>,
    /// `canonical_hash(DOMAIN_BUNDLE_DIGEST, digest_basis)`.
    pub digest: ContentHash,
}

impl ArtifactBundle {
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&BundleArtifact> {
        self.artifacts.get(name)
    }
}

/// Error building a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleBuildError {
    /// Canonical JSON serialization failed.
    CanonError { detail: String },
    /// Two inputs used the same artifact name.
    DuplicateArtifact { name: String },
}

impl std::fmt::Display for BundleBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CanonError { detail } => write!(f, "canonical JSON error: {detail}"),
            Self::DuplicateArtifact { name } => write!(f, "duplicate artifact: {name}"),
        }
    }
}

impl std::error::Error for BundleBuildError {}

/// Input for bundle assembly: `(name, content, normative)`.
#[derive(Debug, Clone)]
pub struct ArtifactInput {
    pub name: String,
    pub content: Vec<u8>,
    pub normative: bool,
}

impl From<(String, Vec<u8>, bool)> for ArtifactInput {
    fn from((name, content, normative): (String, Vec<u8>, bool)) -> Self {
        Self {
            name,
            content,
            normative,
        }
    }
}

impl From<(&str, Vec<u8>, bool)> for ArtifactInput {
    fn from((name, content, normative): (&str, Vec<u8>, bool)) -> Self {
        Self {
            name: name.to_string(),
            content,
            normative,
        }
    }
}

/// Build an [`ArtifactBundle`] from artifact inputs.
///
/// Computes content hashes, builds the sorted manifest and digest basis,
/// and derives the bundle digest.
///
/// # Errors
///
/// Returns [`BundleBuildError`] on a duplicate name or if canonical JSON
/// serialization fails.
pub fn build_bundle(
    artifacts: Vec<impl Into<ArtifactInput>>,
) -> Result<ArtifactBundle, BundleBuildError> {
    let mut artifact_map = BTreeMap::new();

    for input in artifacts {
        let input = input.into();
        if artifact_map.contains_key(&input.name) {
            return Err(BundleBuildError::DuplicateArtifact { name: input.name });
        }
        let content_hash = canonical_hash(DOMAIN_BUNDLE_ARTIFACT, &input.content);
        artifact_map.insert(
            input.name.clone(),
            BundleArtifact {
                name: input.name,
                content: input.content,
                content_hash,
                normative: input.normative,
            },
        );
    }

    let manifest = compute_manifest_bytes(&artifact_map)
        .map_err(|detail| BundleBuildError::CanonError { detail })?;
    let digest_basis = compute_digest_basis_bytes(&artifact_map)
        .map_err(|detail| BundleBuildError::CanonError { detail })?;
    let digest = canonical_hash(DOMAIN_BUNDLE_DIGEST, &digest_basis);

    Ok(ArtifactBundle {
        artifacts: artifact_map,
        manifest,
        digest_basis,
        digest,
    })
}

/// Error from bundle integrity verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleVerifyError {
    /// An artifact's stored `content_hash` does not match the recomputed hash.
    ContentHashMismatch {
        artifact: String,
        expected: String,
        actual: String,
    },
    /// Stored manifest bytes do not match the manifest recomputed from artifacts.
    ManifestMismatch,
    ManifestNotCanonical,
    /// Stored digest basis does not match the recomputed normative projection.
    DigestBasisMismatch,
    DigestBasisNotCanonical,
    /// Stored digest does not match the hash of the digest basis.
    DigestMismatch { expected: String, actual: String },
    /// A normative JSON artifact is not in canonical form.
    ArtifactNotCanonical { artifact: String },
    /// `graph.json` could not be loaded as an activity graph.
    GraphParseError { detail: String },
    /// `search_trace.json` metadata is missing `graph_digest`.
    GraphDigestMissing,
    /// The trace's `graph_digest` does not match the digest of `graph.json`.
    GraphDigestMismatch { in_trace: String, recomputed: String },
    /// `plan.json` disagrees with the accepted expansions in the trace.
    PlanTraceMismatch { detail: String },
    /// Canonical JSON error during verification.
    CanonError { detail: String },
}

impl std::fmt::Display for BundleVerifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ContentHashMismatch {
                artifact,
                expected,
                actual,
            } => write!(
                f,
                "content hash mismatch for {artifact}: expected {expected}, got {actual}"
            ),
            Self::ManifestMismatch => write!(f, "manifest does not match artifacts"),
            Self::ManifestNotCanonical => write!(f, "manifest is not canonical JSON"),
            Self::DigestBasisMismatch => write!(f, "digest basis does not match artifacts"),
            Self::DigestBasisNotCanonical => write!(f, "digest basis is not canonical JSON"),
            Self::DigestMismatch { expected, actual } => {
                write!(f, "bundle digest mismatch: expected {expected}, got {actual}")
            }
            Self::ArtifactNotCanonical { artifact } => {
                write!(f, "normative artifact {artifact} is not canonical JSON")
            }
            Self::GraphParseError { detail } => write!(f, "graph.json: {detail}"),
            Self::GraphDigestMissing => write!(f, "search trace has no graph_digest"),
            Self::GraphDigestMismatch {
                in_trace,
                recomputed,
            } => write!(
                f,
                "graph digest mismatch: trace {in_trace}, graph.json {recomputed}"
            ),
            Self::PlanTraceMismatch { detail } => {
                write!(f, "plan/trace mismatch: {detail}")
            }
            Self::CanonError { detail } => write!(f, "canonical JSON error: {detail}"),
        }
    }
}

impl std::error::Error for BundleVerifyError {}

/// Verify the internal consistency of a bundle.
///
/// This is a pure integrity check; it does not re-run the search. It proves:
///
/// 1. Each artifact's `content_hash` matches its content.
/// 2. `manifest` matches the projection recomputed from all artifacts.
/// 3. `digest_basis` matches the projection recomputed from normative
///    artifacts only.
/// 4. `digest` matches `canonical_hash(DOMAIN_BUNDLE_DIGEST, digest_basis)`.
/// 5. `manifest`, `digest_basis` and normative `.json` artifacts are canonical.
/// 6. If `graph.json` and `search_trace.json` are both present, the trace's
///    `graph_digest` is the digest of the graph in `graph.json`.
/// 7. If `plan.json` and `search_trace.json` are both present, the plan
///    lists exactly the accepted expansions, in order.
///
/// # Errors
///
/// Returns the first [`BundleVerifyError`] encountered.
pub fn verify_bundle(bundle: &ArtifactBundle) -> Result<(), BundleVerifyError> {
    for artifact in bundle.artifacts.values() {
        let recomputed = canonical_hash(DOMAIN_BUNDLE_ARTIFACT, &artifact.content);
        if recomputed != artifact.content_hash {
            return Err(BundleVerifyError::ContentHashMismatch {
                artifact: artifact.name.clone(),
                expected: artifact.content_hash.as_str().to_string(),
                actual: recomputed.as_str().to_string(),
            });
        }
    }

    let expected_manifest = compute_manifest_bytes(&bundle.artifacts)
        .map_err(|detail| BundleVerifyError::CanonError { detail })?;
    if expected_manifest != bundle.manifest {
        return Err(BundleVerifyError::ManifestMismatch);
    }
    if !is_canonical_json(&bundle.manifest) {
        return Err(BundleVerifyError::ManifestNotCanonical);
    }

    let expected_basis = compute_digest_basis_bytes(&bundle.artifacts)
        .map_err(|detail| BundleVerifyError::CanonError { detail })?;
    if expected_basis != bundle.digest_basis {
        return Err(BundleVerifyError::DigestBasisMismatch);
    }
    if !is_canonical_json(&bundle.digest_basis) {
        return Err(BundleVerifyError::DigestBasisNotCanonical);
    }

    let recomputed_digest = canonical_hash(DOMAIN_BUNDLE_DIGEST, &bundle.digest_basis);
    if recomputed_digest != bundle.digest {
        return Err(BundleVerifyError::DigestMismatch {
            expected: bundle.digest.as_str().to_string(),
            actual: recomputed_digest.as_str().to_string(),
        });
    }

    for artifact in bundle.artifacts.values() {
        if artifact.normative
            && std::path::Path::new(&artifact.name)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
            && !is_canonical_json(&artifact.content)
        {
            return Err(BundleVerifyError::ArtifactNotCanonical {
                artifact: artifact.name.clone(),
            });
        }
    }

    verify_graph_digest_binding(bundle)?;
    verify_plan_trace_binding(bundle)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn compute_manifest_bytes(artifacts: &BTreeMap<String, BundleArtifact>) -> Result<Vec<u8>, String> {
    let manifest_artifacts: Vec<serde_json::Value> = artifacts
        .values()
        .map(|a| {
            serde_json::json!({
                "content_hash": a.content_hash.as_str(),
                "name": a.name,
                "normative": a.normative,
            })
        })
        .collect();

    let manifest_value = serde_json::json!({
        "artifacts": manifest_artifacts,
        "schema_version": "bundle.v1",
    });

    canonical_json_bytes(&manifest_value).map_err(|e| e.to_string())
}

fn compute_digest_basis_bytes(
    artifacts: &BTreeMap<String, BundleArtifact>,
) -> Result<Vec<u8>, String> {
    let normative_artifacts: Vec<serde_json::Value> = artifacts
        .values()
        .filter(|a| a.normative)
        .map(|a| {
            serde_json::json!({
                "content_hash": a.content_hash.as_str(),
                "name": a.name,
            })
        })
        .collect();

    let digest_basis_value = serde_json::json!({
        "artifacts": normative_artifacts,
        "schema_version": "bundle_digest_basis.v1",
    });

    canonical_json_bytes(&digest_basis_value).map_err(|e| e.to_string())
}

/// Parse → re-canonicalize → compare.
fn is_canonical_json(bytes: &[u8]) -> bool {
    serde_json::from_slice::<serde_json::Value>(bytes)
        .ok()
        .and_then(|value| canonical_json_bytes(&value).ok())
        .is_some_and(|recanonized| recanonized == bytes)
}

fn parse_json(artifact: &BundleArtifact) -> Result<serde_json::Value, BundleVerifyError> {
    serde_json::from_slice(&artifact.content).map_err(|e| BundleVerifyError::CanonError {
        detail: format!("{}: {e}", artifact.name),
    })
}

fn verify_graph_digest_binding(bundle: &ArtifactBundle) -> Result<(), BundleVerifyError> {
    let (Some(graph_artifact), Some(trace_artifact)) =
        (bundle.get(GRAPH_ARTIFACT), bundle.get(TRACE_ARTIFACT))
    else {
        return Ok(());
    };

    let graph_value = parse_json(graph_artifact)?;
    let graph = ActivityGraph::from_json_value(&graph_value).map_err(|e| {
        BundleVerifyError::GraphParseError {
            detail: e.to_string(),
        }
    })?;
    let recomputed = graph
        .digest()
        .map_err(|e| BundleVerifyError::GraphParseError {
            detail: e.to_string(),
        })?;

    let trace = parse_json(trace_artifact)?;
    let in_trace = trace["metadata"]["graph_digest"]
        .as_str()
        .ok_or(BundleVerifyError::GraphDigestMissing)?;
    if in_trace != recomputed.as_str() {
        return Err(BundleVerifyError::GraphDigestMismatch {
            in_trace: in_trace.to_string(),
            recomputed: recomputed.as_str().to_string(),
        });
    }
    Ok(())
}

fn verify_plan_trace_binding(bundle: &ArtifactBundle) -> Result<(), BundleVerifyError> {
    let (Some(plan_artifact), Some(trace_artifact)) =
        (bundle.get(PLAN_ARTIFACT), bundle.get(TRACE_ARTIFACT))
    else {
        return Ok(());
    };
    let plan = parse_json(plan_artifact)?;
    let trace = parse_json(trace_artifact)?;

    let planned: Vec<&str> = plan["plan"]
        .as_array()
        .map(|ids| ids.iter().filter_map(serde_json::Value::as_str).collect())
        .unwrap_or_default();
    let accepted: Vec<&str> = trace["expansions"]
        .as_array()
        .map(|events| {
            events
                .iter()
                .filter(|e| e["accepted"].as_bool() == Some(true))
                .filter_map(|e| e["identifier"].as_str())
                .collect()
        })
        .unwrap_or_default();
    if planned != accepted {
        return Err(BundleVerifyError::PlanTraceMismatch {
            detail: format!("plan lists {planned:?}, trace accepted {accepted:?}"),
        });
    }
    Ok(())
}
