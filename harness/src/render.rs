//! Human-readable itinerary text.

use std::fmt::Write;

use trailhead_kernel::graph::ActivityGraph;
use trailhead_search::engine::Plan;

/// Render a plan as the itinerary printed to the traveller.
///
/// ```text
///
/// Best Travel Itinerary:
/// - Eiffel Tower (Champ de Mars, Paris): Iconic wrought-iron lattice tower.
///
/// Total Cost: 0 currency units
/// ```
///
/// Steps whose node is missing from `graph` are listed by identifier only.
#[must_use]
pub fn render_itinerary(graph: &ActivityGraph, plan: &Plan) -> String {
    let mut out = String::from("\nBest Travel Itinerary:\n");
    for step in &plan.steps {
        // Writing to a String cannot fail.
        let _ = match graph.node(step.node) {
            Some(node) => writeln!(
                out,
                "- {} ({}): {}",
                node.identifier(),
                node.location(),
                node.description()
            ),
            None => writeln!(out, "- {}", step.identifier),
        };
    }
    let _ = writeln!(out, "\nTotal Cost: {} currency units", plan.total_cost);
    out
}
