//! Search budget and policy types.

use trailhead_kernel::proof::canon::{canonical_json_bytes, CanonError};
use trailhead_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};

use crate::error::SearchError;

/// Hours of activity available per trip day.
pub const HOURS_PER_DAY: f64 = 8.0;

/// The two cumulative ceilings a plan must respect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchBudget {
    /// Ceiling on cumulative time along a path.
    pub available_time: f64,
    /// Ceiling on cumulative resource cost along a path.
    pub available_resource: f64,
}

impl SearchBudget {
    #[must_use]
    pub fn new(available_time: f64, available_resource: f64) -> Self {
        Self {
            available_time,
            available_resource,
        }
    }

    /// Derive ceilings from a trip length in whole days and a cost budget.
    ///
    /// `available_time = num_days * HOURS_PER_DAY`.
    #[must_use]
    pub fn from_trip(num_days: u32, available_budget: f64) -> Self {
        Self::new(f64::from(num_days) * HOURS_PER_DAY, available_budget)
    }

    /// Whether a cumulative `(time, resource)` pair fits under both ceilings.
    #[must_use]
    pub fn admits(&self, time: f64, resource: f64) -> bool {
        time <= self.available_time && resource <= self.available_resource
    }

    /// Reject negative or non-finite ceilings.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidBudget`] naming the offending ceiling.
    pub fn validate(&self) -> Result<(), SearchError> {
        for (name, value) in [
            ("available_time", self.available_time),
            ("available_resource", self.available_resource),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(SearchError::InvalidBudget {
                    detail: format!("{name} must be a non-negative finite number, got {value}"),
                });
            }
        }
        Ok(())
    }
}

/// Search dedup and edge-handling configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchPolicy {
    /// How visited states are keyed (default: `NodeIdentity`).
    pub dedup_key: DedupKey,
    /// How AND-tagged edges are expanded (default: `ExpandAsOr`).
    pub and_edges: AndEdgePolicy,
}

impl SearchPolicy {
    /// Validate that this policy uses only supported options.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::UnsupportedPolicyMode`] if a reserved option
    /// (`PathSignature`, `RequireAll`) is selected.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.dedup_key == DedupKey::PathSignature {
            return Err(SearchError::UnsupportedPolicyMode {
                detail: "DedupKey::PathSignature is reserved and not supported".into(),
            });
        }
        if self.and_edges == AndEdgePolicy::RequireAll {
            return Err(SearchError::UnsupportedPolicyMode {
                detail: "AndEdgePolicy::RequireAll is reserved and not supported".into(),
            });
        }
        Ok(())
    }

    /// Canonical JSON echo of the policy, for trace metadata.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "and_edges": self.and_edges.as_str(),
            "dedup_key": self.dedup_key.as_str(),
        })
    }

    /// Content hash of the canonical policy echo.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if serialization fails.
    pub fn digest(&self) -> Result<ContentHash, CanonError> {
        let bytes = canonical_json_bytes(&self.to_json_value())?;
        Ok(canonical_hash(HashDomain::SearchPolicy, &bytes))
    }
}

/// Dedup key policy: what makes two frontier states "the same".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DedupKey {
    /// A node is finalized once, through whichever path pops first.
    /// Cheaper paths found later are dropped.
    #[default]
    NodeIdentity,
    /// Reserved: key states by `(node, path signature)`. Selecting this is a
    /// hard error.
    PathSignature,
}

impl DedupKey {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NodeIdentity => "node_identity",
            Self::PathSignature => "path_signature",
        }
    }
}

/// How AND-tagged edges are treated during expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AndEdgePolicy {
    /// Every edge is expanded independently; the AND tag is carried only.
    #[default]
    ExpandAsOr,
    /// Reserved: require all AND siblings jointly before acceptance.
    /// Selecting this is a hard error.
    RequireAll,
}

impl AndEdgePolicy {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ExpandAsOr => "expand_as_or",
            Self::RequireAll => "require_all",
        }
    }
}
