//! `ActivityGraph`: arena of validated nodes joined by AND/OR edges.
//!
//! Identifiers are unique within a graph, so a `NodeId` and its identifier
//! are interchangeable as dedup keys. Node attributes are validated once,
//! at insertion; afterwards the only mutation is appending edges.

use std::collections::BTreeMap;

use super::node::{Edge, GraphNode, NodeId, NodeSpec, Relation};
use crate::proof::canon::canonical_json_bytes;
use crate::proof::hash::{canonical_hash, ContentHash, HashDomain};

/// Error type for graph construction, lookup and loading.
#[derive(Debug, Clone, PartialEq)]
pub enum GraphError {
    /// A node was added with an empty identifier.
    EmptyIdentifier,
    /// A node identifier was used twice.
    DuplicateIdentifier { identifier: String },
    /// A cost was negative or non-finite, or the desirability was non-finite.
    InvalidAttribute {
        identifier: String,
        field: &'static str,
        value: f64,
    },
    /// A `NodeId` does not belong to this graph.
    UnknownNode(NodeId),
    /// An identifier does not name any node in this graph.
    UnknownIdentifier { identifier: String },
    /// The arena cannot address more nodes.
    CapacityExceeded,
    /// A graph document was malformed.
    ParseError { detail: String },
    /// Canonical JSON serialization failed.
    CanonicalizationError { detail: String },
}

impl std::fmt::Display for GraphError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyIdentifier => write!(f, "node identifier must not be empty"),
            Self::DuplicateIdentifier { identifier } => {
                write!(f, "duplicate node identifier: {identifier:?}")
            }
            Self::InvalidAttribute {
                identifier,
                field,
                value,
            } => write!(f, "node {identifier:?} has invalid {field}: {value}"),
            Self::UnknownNode(id) => write!(f, "node {id} is not in this graph"),
            Self::UnknownIdentifier { identifier } => {
                write!(f, "no node named {identifier:?}")
            }
            Self::CapacityExceeded => write!(f, "graph node capacity exceeded"),
            Self::ParseError { detail } => write!(f, "graph document: {detail}"),
            Self::CanonicalizationError { detail } => {
                write!(f, "graph canonicalization failed: {detail}")
            }
        }
    }
}

impl std::error::Error for GraphError {}

/// Arena-backed AND/OR graph.
///
/// Nodes are stored in insertion order and never removed. The identifier
/// index is a `BTreeMap` so lookups do not depend on hasher state.
#[derive(Debug, Clone, Default)]
pub struct ActivityGraph {
    nodes: Vec<GraphNode>,
    by_identifier: BTreeMap<String, NodeId>,
}

impl ActivityGraph {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and insert a node, returning its id.
    ///
    /// # Errors
    ///
    /// - [`GraphError::EmptyIdentifier`] / [`GraphError::DuplicateIdentifier`]
    ///   if the identifier is empty or already present.
    /// - [`GraphError::InvalidAttribute`] if a cost is negative or non-finite,
    ///   or the desirability is non-finite.
    pub fn add_node(&mut self, spec: NodeSpec) -> Result<NodeId, GraphError> {
        if spec.identifier.is_empty() {
            return Err(GraphError::EmptyIdentifier);
        }
        if self.by_identifier.contains_key(&spec.identifier) {
            return Err(GraphError::DuplicateIdentifier {
                identifier: spec.identifier,
            });
        }
        for (field, value) in [
            ("time_cost", spec.time_cost),
            ("resource_cost", spec.resource_cost),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(GraphError::InvalidAttribute {
                    identifier: spec.identifier,
                    field,
                    value,
                });
            }
        }
        if !spec.desirability.is_finite() {
            return Err(GraphError::InvalidAttribute {
                identifier: spec.identifier,
                field: "desirability",
                value: spec.desirability,
            });
        }

        let raw = u32::try_from(self.nodes.len()).map_err(|_| GraphError::CapacityExceeded)?;
        let id = NodeId(raw);
        self.by_identifier.insert(spec.identifier.clone(), id);
        self.nodes.push(GraphNode {
            id,
            spec,
            edges: Vec::new(),
        });
        Ok(id)
    }

    /// Append an edge `parent → child` tagged with `relation`.
    ///
    /// Duplicate children and cycles are accepted as given.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] if either endpoint is not in this graph.
    pub fn add_edge(
        &mut self,
        parent: NodeId,
        child: NodeId,
        relation: Relation,
    ) -> Result<(), GraphError> {
        if !self.contains(child) {
            return Err(GraphError::UnknownNode(child));
        }
        let node = self
            .nodes
            .get_mut(parent.index())
            .ok_or(GraphError::UnknownNode(parent))?;
        node.edges.push(Edge { child, relation });
        Ok(())
    }

    /// Look up a node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(id.index())
    }

    /// Look up a node id by identifier.
    #[must_use]
    pub fn find(&self, identifier: &str) -> Option<NodeId> {
        self.by_identifier.get(identifier).copied()
    }

    /// Whether `id` indexes a node of this graph.
    ///
    /// Ids carry no graph identity, so an in-range id issued by another
    /// graph also passes.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter()
    }

    /// Total number of edges across all nodes.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.nodes.iter().map(|n| n.edges.len()).sum()
    }

    /// JSON document for this graph: `{"nodes": [...]}` in insertion order,
    /// edges referring to children by identifier.
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        let nodes: Vec<serde_json::Value> =
            self.nodes.iter().map(|n| n.to_json_value(self)).collect();
        serde_json::json!({ "nodes": nodes })
    }

    /// Canonical JSON bytes of [`Self::to_json_value`].
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::CanonicalizationError`] if serialization fails.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, GraphError> {
        canonical_json_bytes(&self.to_json_value()).map_err(|e| {
            GraphError::CanonicalizationError {
                detail: e.to_string(),
            }
        })
    }

    /// Content digest of the whole graph (nodes, metadata, edges, order).
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::CanonicalizationError`] if serialization fails.
    pub fn digest(&self) -> Result<ContentHash, GraphError> {
        Ok(canonical_hash(
            HashDomain::ActivityGraph,
            &self.canonical_bytes()?,
        ))
    }

    /// Content fingerprint of a single node, including its outgoing edges.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNode`] for foreign ids, or
    /// [`GraphError::CanonicalizationError`] if serialization fails.
    pub fn node_fingerprint(&self, id: NodeId) -> Result<ContentHash, GraphError> {
        let node = self.node(id).ok_or(GraphError::UnknownNode(id))?;
        let bytes = canonical_json_bytes(&node.to_json_value(self)).map_err(|e| {
            GraphError::CanonicalizationError {
                detail: e.to_string(),
            }
        })?;
        Ok(canonical_hash(HashDomain::GraphNode, &bytes))
    }

    /// Build a graph from the document shape produced by [`Self::to_json_value`].
    ///
    /// All nodes are inserted first, then edges are resolved by identifier,
    /// so edges may point forward or backward in the list. Optional node
    /// fields (`mandatory`, `description`, `location`, `edges`) default to
    /// `false` / empty.
    ///
    /// # Errors
    ///
    /// - [`GraphError::ParseError`] for malformed documents.
    /// - [`GraphError::UnknownIdentifier`] for edges naming a missing child.
    /// - Any validation error from [`Self::add_node`].
    pub fn from_json_value(value: &serde_json::Value) -> Result<Self, GraphError> {
        let nodes = value
            .get("nodes")
            .and_then(serde_json::Value::as_array)
            .ok_or_else(|| parse_error("expected object with a \"nodes\" array"))?;

        let mut graph = Self::new();
        let mut pending: Vec<(NodeId, &Vec<serde_json::Value>)> = Vec::new();

        for (index, entry) in nodes.iter().enumerate() {
            let obj = entry
                .as_object()
                .ok_or_else(|| parse_error(&format!("nodes[{index}] is not an object")))?;
            let identifier = obj
                .get("identifier")
                .and_then(serde_json::Value::as_str)
                .ok_or_else(|| parse_error(&format!("nodes[{index}].identifier missing")))?;
            let number = |field: &str| -> Result<f64, GraphError> {
                obj.get(field)
                    .and_then(serde_json::Value::as_f64)
                    .ok_or_else(|| parse_error(&format!("nodes[{index}].{field} missing")))
            };
            let text = |field: &str| -> String {
                obj.get(field)
                    .and_then(serde_json::Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            };

            let spec = NodeSpec::new(
                identifier,
                number("time_cost")?,
                number("resource_cost")?,
                number("desirability")?,
            )
            .mandatory(
                obj.get("mandatory")
                    .and_then(serde_json::Value::as_bool)
                    .unwrap_or(false),
            )
            .description(text("description"))
            .location(text("location"));

            let id = graph.add_node(spec)?;
            if let Some(edges) = obj.get("edges") {
                let edges = edges
                    .as_array()
                    .ok_or_else(|| parse_error(&format!("nodes[{index}].edges is not an array")))?;
                pending.push((id, edges));
            }
        }

        for (parent, edges) in pending {
            for edge in edges {
                let child_name = edge
                    .get("child")
                    .and_then(serde_json::Value::as_str)
                    .ok_or_else(|| parse_error("edge.child missing"))?;
                let relation = match edge.get("relation").and_then(serde_json::Value::as_str) {
                    Some("and") => Relation::And,
                    Some("or") => Relation::Or,
                    other => {
                        return Err(parse_error(&format!("edge.relation invalid: {other:?}")));
                    }
                };
                let child = graph
                    .find(child_name)
                    .ok_or_else(|| GraphError::UnknownIdentifier {
                        identifier: child_name.to_string(),
                    })?;
                graph.add_edge(parent, child, relation)?;
            }
        }

        Ok(graph)
    }
}

fn parse_error(detail: &str) -> GraphError {
    GraphError::ParseError {
        detail: detail.to_string(),
    }
}
