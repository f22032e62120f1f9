//! Bundle directory persistence: write/read/verify an [`ArtifactBundle`]
//! on disk.
//!
//! # Directory layout
//!
//! ```text
//! <dir>/
//!   bundle_manifest.json         canonical JSON, full artifact listing
//!   bundle_digest_basis.json     canonical JSON, normative projection only
//!   bundle_digest.txt            ASCII digest string ("sha256:...")
//!   request.json                 artifact (normative)
//!   graph.json                   artifact (normative)
//!   plan.json                    artifact (normative)
//!   search_trace.json            artifact (normative)
//!   itinerary.txt                artifact (observational)
//! ```
//!
//! The directory path is never part of any hash surface. The manifest's
//! declared list is the source of truth.
//!
//! # Fail-closed semantics
//!
//! - Missing declared artifact files → error
//! - Extra undeclared files → error
//! - Stored digest differs from the recomputed one → error
//! - Integrity failures found by [`verify_bundle`] → error

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::debug;
use trailhead_kernel::proof::hash::{canonical_hash, ContentHash};

use crate::bundle::{
    verify_bundle, ArtifactBundle, BundleArtifact, BundleVerifyError, DOMAIN_BUNDLE_DIGEST,
};

const MANIFEST_FILENAME: &str = "bundle_manifest.json";
const DIGEST_BASIS_FILENAME: &str = "bundle_digest_basis.json";
const DIGEST_FILENAME: &str = "bundle_digest.txt";

const METADATA_FILENAMES: [&str; 3] = [MANIFEST_FILENAME, DIGEST_BASIS_FILENAME, DIGEST_FILENAME];

/// Error persisting or loading a bundle directory.
#[derive(Debug)]
pub enum BundleDirError {
    /// I/O error.
    Io { detail: String },
    /// A required metadata file is missing.
    MissingMetadata { filename: String },
    /// A declared artifact file is missing from the directory.
    MissingArtifact { name: String },
    /// An undeclared file exists in the directory.
    ExtraFile { name: String },
    /// An artifact name would escape the directory or collide with metadata.
    InvalidArtifactName { name: String },
    /// `bundle_manifest.json` is not valid JSON or not an artifact listing.
    ManifestParseError { detail: String },
    /// Manifest `schema_version` is not recognized.
    ManifestVersionMismatch { found: String },
    /// An artifact entry in the manifest is missing a required field.
    ManifestEntryInvalid { detail: String },
    /// `bundle_digest.txt` does not match the recomputed digest.
    DigestMismatch { stored: String, recomputed: String },
    /// The loaded bundle failed integrity verification.
    Verify(BundleVerifyError),
}

impl std::fmt::Display for BundleDirError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { detail } => write!(f, "I/O error: {detail}"),
            Self::MissingMetadata { filename } => write!(f, "missing metadata file: {filename}"),
            Self::MissingArtifact { name } => write!(f, "missing artifact: {name}"),
            Self::ExtraFile { name } => write!(f, "undeclared extra file: {name}"),
            Self::InvalidArtifactName { name } => write!(f, "invalid artifact name: {name:?}"),
            Self::ManifestParseError { detail } => write!(f, "manifest parse error: {detail}"),
            Self::ManifestVersionMismatch { found } => {
                write!(f, "manifest version mismatch: {found}")
            }
            Self::ManifestEntryInvalid { detail } => write!(f, "manifest entry invalid: {detail}"),
            Self::DigestMismatch { stored, recomputed } => {
                write!(f, "digest mismatch: stored={stored}, recomputed={recomputed}")
            }
            Self::Verify(e) => write!(f, "verify error: {e}"),
        }
    }
}

impl std::error::Error for BundleDirError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Verify(e) => Some(e),
            _ => None,
        }
    }
}

impl From<BundleVerifyError> for BundleDirError {
    fn from(e: BundleVerifyError) -> Self {
        Self::Verify(e)
    }
}

/// Write a bundle to `dir`, creating it if needed.
///
/// # Errors
///
/// Returns [`BundleDirError::Io`] on I/O failure and
/// [`BundleDirError::InvalidArtifactName`] for names that are not plain
/// file names.
pub fn write_bundle_dir(bundle: &ArtifactBundle, dir: &Path) -> Result<(), BundleDirError> {
    std::fs::create_dir_all(dir).map_err(|e| BundleDirError::Io {
        detail: format!("create_dir_all {}: {e}", dir.display()),
    })?;

    for artifact in bundle.artifacts.values() {
        check_artifact_name(&artifact.name)?;
        write_atomic(&dir.join(&artifact.name), &artifact.content)?;
    }

    write_atomic(&dir.join(MANIFEST_FILENAME), &bundle.manifest)?;
    write_atomic(&dir.join(DIGEST_BASIS_FILENAME), &bundle.digest_basis)?;
    write_atomic(&dir.join(DIGEST_FILENAME), bundle.digest.as_str().as_bytes())?;

    debug!(
        dir = %dir.display(),
        artifacts = bundle.artifacts.len(),
        digest = %bundle.digest,
        "bundle written"
    );
    Ok(())
}

/// Read a bundle directory and verify it.
///
/// # Errors
///
/// Returns [`BundleDirError`] on any layout, digest or integrity failure.
pub fn read_bundle_dir(dir: &Path) -> Result<ArtifactBundle, BundleDirError> {
    let manifest_bytes = read_required(dir, MANIFEST_FILENAME)?;
    let digest_basis_bytes = read_required(dir, DIGEST_BASIS_FILENAME)?;
    let digest_bytes = read_required(dir, DIGEST_FILENAME)?;

    let manifest_value: serde_json::Value =
        serde_json::from_slice(&manifest_bytes).map_err(|e| BundleDirError::ManifestParseError {
            detail: e.to_string(),
        })?;

    let schema_version = manifest_value["schema_version"].as_str().unwrap_or("");
    if schema_version != "bundle.v1" {
        return Err(BundleDirError::ManifestVersionMismatch {
            found: schema_version.to_string(),
        });
    }

    let entries = manifest_value["artifacts"].as_array().ok_or_else(|| {
        BundleDirError::ManifestParseError {
            detail: "\"artifacts\" is not an array".into(),
        }
    })?;

    let mut artifacts = BTreeMap::new();
    for entry in entries {
        let artifact = read_artifact(dir, entry)?;
        artifacts.insert(artifact.name.clone(), artifact);
    }

    for filename in list_files(dir)? {
        if !artifacts.contains_key(&filename) && !METADATA_FILENAMES.contains(&filename.as_str()) {
            return Err(BundleDirError::ExtraFile { name: filename });
        }
    }

    let recomputed = canonical_hash(DOMAIN_BUNDLE_DIGEST, &digest_basis_bytes);
    let stored = String::from_utf8_lossy(&digest_bytes).trim().to_string();
    if recomputed.as_str() != stored {
        return Err(BundleDirError::DigestMismatch {
            stored,
            recomputed: recomputed.as_str().to_string(),
        });
    }

    let bundle = ArtifactBundle {
        artifacts,
        manifest: manifest_bytes,
        digest_basis: digest_basis_bytes,
        digest: recomputed,
    };
    verify_bundle(&bundle)?;
    debug!(dir = %dir.display(), digest = %bundle.digest, "bundle read and verified");
    Ok(bundle)
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn read_artifact(dir: &Path, entry: &serde_json::Value) -> Result<BundleArtifact, BundleDirError> {
    let name = entry["name"]
        .as_str()
        .ok_or_else(|| BundleDirError::ManifestEntryInvalid {
            detail: "missing \"name\" field".into(),
        })?
        .to_string();
    check_artifact_name(&name)?;

    let hash_str =
        entry["content_hash"]
            .as_str()
            .ok_or_else(|| BundleDirError::ManifestEntryInvalid {
                detail: format!("missing \"content_hash\" for {name}"),
            })?;
    let content_hash =
        ContentHash::parse(hash_str).ok_or_else(|| BundleDirError::ManifestEntryInvalid {
            detail: format!("invalid content_hash for {name}: {hash_str}"),
        })?;
    let normative =
        entry["normative"]
            .as_bool()
            .ok_or_else(|| BundleDirError::ManifestEntryInvalid {
                detail: format!("missing \"normative\" for {name}"),
            })?;

    let content = std::fs::read(dir.join(&name))
        .map_err(|_| BundleDirError::MissingArtifact { name: name.clone() })?;

    Ok(BundleArtifact {
        name,
        content,
        content_hash,
        normative,
    })
}

/// Artifact names must be plain file names distinct from the metadata files.
fn check_artifact_name(name: &str) -> Result<(), BundleDirError> {
    let plain = !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\'])
        && !METADATA_FILENAMES.contains(&name);
    if plain {
        Ok(())
    } else {
        Err(BundleDirError::InvalidArtifactName {
            name: name.to_string(),
        })
    }
}

/// Write via temp file + rename (best-effort atomicity on Unix).
fn write_atomic(path: &Path, content: &[u8]) -> Result<(), BundleDirError> {
    let (Some(dir), Some(file_name)) = (path.parent(), path.file_name()) else {
        return Err(BundleDirError::Io {
            detail: format!("not a file path: {}", path.display()),
        });
    };
    let temp_path = dir.join(format!(".tmp_{}", file_name.to_string_lossy()));

    std::fs::write(&temp_path, content).map_err(|e| BundleDirError::Io {
        detail: format!("write {}: {e}", temp_path.display()),
    })?;
    std::fs::rename(&temp_path, path).map_err(|e| BundleDirError::Io {
        detail: format!("rename {} → {}: {e}", temp_path.display(), path.display()),
    })
}

fn read_required(dir: &Path, filename: &str) -> Result<Vec<u8>, BundleDirError> {
    std::fs::read(dir.join(filename)).map_err(|_| BundleDirError::MissingMetadata {
        filename: filename.to_string(),
    })
}

/// Regular files in `dir`, skipping leftover temp files.
fn list_files(dir: &Path) -> Result<BTreeSet<String>, BundleDirError> {
    let io = |e: std::io::Error| BundleDirError::Io {
        detail: format!("read_dir {}: {e}", dir.display()),
    };
    let mut files = BTreeSet::new();
    for entry in std::fs::read_dir(dir).map_err(io)? {
        let entry = entry.map_err(io)?;
        if !entry.file_type().map_err(io)?.is_file() {
            continue;
        }
        if let Some(name) = entry.file_name().to_str() {
            if !name.starts_with(".tmp_") {
                files.insert(name.to_string());
            }
        }
    }
    Ok(files)
}
