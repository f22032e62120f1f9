//! Typed search errors.
//!
//! `SearchError` represents pre-flight failures only. Once a
//! [`crate::engine::SearchEngine`] has been constructed, `search()` cannot
//! fail: infeasible roots and empty plans are ordinary results.

use trailhead_kernel::graph::NodeId;

/// Typed failure for pre-flight search validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// A ceiling was negative or non-finite.
    InvalidBudget { detail: String },
    /// The root id is out of range for the graph being searched.
    RootNotInGraph { root: NodeId },
    /// A reserved policy option was selected.
    UnsupportedPolicyMode { detail: String },
}

impl std::fmt::Display for SearchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidBudget { detail } => write!(f, "invalid search budget: {detail}"),
            Self::RootNotInGraph { root } => {
                write!(f, "root node {root} is out of range for the searched graph")
            }
            Self::UnsupportedPolicyMode { detail } => {
                write!(f, "unsupported policy mode: {detail}")
            }
        }
    }
}

impl std::error::Error for SearchError {}
