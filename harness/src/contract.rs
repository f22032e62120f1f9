//! World contract: the minimal trait a world must implement.
//!
//! Worlds provide domain data only: the activity graph and which node the
//! search starts from. Hashing, searching, rendering and bundling are runner
//! concerns.

use trailhead_kernel::graph::{ActivityGraph, GraphError, NodeId};

/// A built world: the graph plus the search root.
#[derive(Debug, Clone)]
pub struct WorldGraph {
    pub graph: ActivityGraph,
    pub root: NodeId,
}

/// The contract a world must implement to be run by the harness runner.
pub trait GraphWorld {
    /// Unique world identifier (e.g., `"paris_sample"`).
    fn world_id(&self) -> &str;

    /// Build a fresh graph and pick its root.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError`] if the world's data fails graph validation.
    fn build(&self) -> Result<WorldGraph, GraphError>;
}
