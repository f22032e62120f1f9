//! Graph vertices and AND/OR edges.

/// Index of a node inside its [`super::ActivityGraph`].
///
/// Ids are dense and assigned in insertion order, so they are only
/// meaningful together with the graph that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Position of the node in its graph's arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// How a child relates to its siblings under the same parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    /// Jointly required with the other AND children.
    And,
    /// One alternative among the OR children.
    Or,
}

impl Relation {
    /// Stable lowercase tag used in canonical JSON.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::And => "and",
            Self::Or => "or",
        }
    }
}

/// An outgoing edge: the child it points at and its AND/OR tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub child: NodeId,
    pub relation: Relation,
}

/// Attributes supplied when adding a node to a graph.
///
/// Costs are the marginal price of traversing *into* the node from a
/// parent. `description` and `location` are opaque and passed through.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeSpec {
    pub identifier: String,
    pub time_cost: f64,
    pub resource_cost: f64,
    pub desirability: f64,
    pub mandatory: bool,
    pub description: String,
    pub location: String,
}

impl NodeSpec {
    /// A spec with empty metadata and `mandatory = false`.
    #[must_use]
    pub fn new(
        identifier: impl Into<String>,
        time_cost: f64,
        resource_cost: f64,
        desirability: f64,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            time_cost,
            resource_cost,
            desirability,
            mandatory: false,
            description: String::new(),
            location: String::new(),
        }
    }

    #[must_use]
    pub fn mandatory(mut self, mandatory: bool) -> Self {
        self.mandatory = mandatory;
        self
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }
}

/// A validated vertex owned by an [`super::ActivityGraph`].
///
/// Fields are private: once inserted, only the owning graph may append
/// edges, and nothing may change costs or scores.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphNode {
    pub(crate) id: NodeId,
    pub(crate) spec: NodeSpec,
    pub(crate) edges: Vec<Edge>,
}

impl GraphNode {
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.spec.identifier
    }

    #[must_use]
    pub fn time_cost(&self) -> f64 {
        self.spec.time_cost
    }

    #[must_use]
    pub fn resource_cost(&self) -> f64 {
        self.spec.resource_cost
    }

    #[must_use]
    pub fn desirability(&self) -> f64 {
        self.spec.desirability
    }

    /// Carried for caller policy; the search does not enforce it.
    #[must_use]
    pub fn is_mandatory(&self) -> bool {
        self.spec.mandatory
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.spec.description
    }

    #[must_use]
    pub fn location(&self) -> &str {
        &self.spec.location
    }

    /// Outgoing edges in insertion order.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub(crate) fn to_json_value(&self, graph: &super::ActivityGraph) -> serde_json::Value {
        let edges: Vec<serde_json::Value> = self
            .edges
            .iter()
            .map(|e| {
                serde_json::json!({
                    "child": graph.node(e.child).map(GraphNode::identifier),
                    "relation": e.relation.as_str(),
                })
            })
            .collect();
        serde_json::json!({
            "description": self.spec.description,
            "desirability": self.spec.desirability,
            "edges": edges,
            "identifier": self.spec.identifier,
            "location": self.spec.location,
            "mandatory": self.spec.mandatory,
            "resource_cost": self.spec.resource_cost,
            "time_cost": self.spec.time_cost,
        })
    }
}
