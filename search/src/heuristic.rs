//! Node scoring for frontier ordering.

use trailhead_kernel::graph::GraphNode;

/// Trait for node scoring.
///
/// Lower estimates mark nodes that are more attractive to expand. The
/// engine sums estimates along a path into the frontier accumulator, so an
/// implementation must be pure: same node, same value, every call.
pub trait Heuristic: Send + Sync {
    /// Scalar estimate for traversing into `node`.
    fn estimate(&self, node: &GraphNode) -> f64;
}

/// Default scoring rule: `time_cost + resource_cost - desirability`.
///
/// Cheap, desirable nodes score low. This is a ranking rule, not an
/// admissible cost-to-go bound.
#[derive(Debug, Clone, Copy, Default)]
pub struct AdditiveHeuristic;

impl Heuristic for AdditiveHeuristic {
    fn estimate(&self, node: &GraphNode) -> f64 {
        node.time_cost() + node.resource_cost() - node.desirability()
    }
}

impl<H: Heuristic + ?Sized> Heuristic for &H {
    fn estimate(&self, node: &GraphNode) -> f64 {
        (**self).estimate(node)
    }
}
