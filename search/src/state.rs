//! Partial-search states and the frontier ordering key.

use std::cmp::Ordering;

use trailhead_kernel::graph::NodeId;

/// A partial-search state waiting on the frontier.
///
/// Created when a parent's expansion enqueues a child, consumed when
/// popped. Cumulative totals exclude the root's own costs: they only grow
/// when an edge is traversed into a child.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    /// Sum of heuristic estimates along the path, root included.
    pub accumulator: f64,
    /// Cumulative time of the children traversed into.
    pub cumulative_time: f64,
    /// Cumulative resource cost of the children traversed into.
    pub cumulative_resource: f64,
    /// The node this state reaches.
    pub node: NodeId,
    /// The node whose expansion produced this state (`None` for the root).
    pub parent: Option<NodeId>,
    /// Edges from the root (root = 0).
    pub depth: u32,
    /// Insertion counter assigned by the frontier at push time.
    pub sequence: u64,
}

impl SearchState {
    /// The root state: `(estimate(root), 0, 0, root)`.
    #[must_use]
    pub fn root(node: NodeId, estimate: f64) -> Self {
        Self {
            accumulator: estimate,
            cumulative_time: 0.0,
            cumulative_resource: 0.0,
            node,
            parent: None,
            depth: 0,
            sequence: 0,
        }
    }

    #[must_use]
    pub fn key(&self) -> FrontierKey {
        FrontierKey::from(self)
    }
}

/// The frontier ordering key:
/// `(accumulator, cumulative_time, cumulative_resource, sequence)`.
///
/// Lower sorts first. Floats compare under IEEE total ordering; the
/// insertion sequence makes the order total without ever looking at the
/// node itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrontierKey {
    pub accumulator: f64,
    pub cumulative_time: f64,
    pub cumulative_resource: f64,
    pub sequence: u64,
}

impl Eq for FrontierKey {}

impl PartialOrd for FrontierKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.accumulator
            .total_cmp(&other.accumulator)
            .then(self.cumulative_time.total_cmp(&other.cumulative_time))
            .then(
                self.cumulative_resource
                    .total_cmp(&other.cumulative_resource),
            )
            .then(self.sequence.cmp(&other.sequence))
    }
}

impl From<&SearchState> for FrontierKey {
    fn from(state: &SearchState) -> Self {
        Self {
            accumulator: state.accumulator,
            cumulative_time: state.cumulative_time,
            cumulative_resource: state.cumulative_resource,
            sequence: state.sequence,
        }
    }
}
