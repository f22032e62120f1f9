//! Graph module: the AND/OR activity graph the planner searches.
//!
//! Nodes live in an arena ([`ActivityGraph`]) and refer to each other by
//! [`NodeId`]. Edges may form cycles; nothing here forbids them.

mod activity_graph;
mod node;

pub use activity_graph::{ActivityGraph, GraphError};
pub use node::{Edge, GraphNode, NodeId, NodeSpec, Relation};
