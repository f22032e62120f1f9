//! `GraphDocument`: a world loaded from a JSON graph document.
//!
//! The document is the `ActivityGraph` JSON form plus an optional `"root"`
//! identifier. Without one, the first listed node is the root.
//!
//! ```json
//! {"root": "A",
//!  "nodes": [{"identifier": "A", "time_cost": 1, "resource_cost": 5,
//!             "desirability": 3, "edges": [{"child": "B", "relation": "or"}]},
//!            {"identifier": "B", "time_cost": 2, "resource_cost": 5,
//!             "desirability": 8}]}
//! ```

use trailhead_kernel::graph::{ActivityGraph, GraphError};

use crate::contract::{GraphWorld, WorldGraph};

/// A world backed by a parsed graph document.
#[derive(Debug, Clone)]
pub struct GraphDocument {
    world_id: String,
    document: serde_json::Value,
}

impl GraphDocument {
    /// Parse document text. Graph validation is deferred to [`GraphWorld::build`].
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::ParseError`] if `text` is not JSON.
    pub fn parse(world_id: impl Into<String>, text: &str) -> Result<Self, GraphError> {
        let document = serde_json::from_str(text).map_err(|e| GraphError::ParseError {
            detail: e.to_string(),
        })?;
        Ok(Self {
            world_id: world_id.into(),
            document,
        })
    }

    fn root_identifier(&self) -> Result<&str, GraphError> {
        if let Some(root) = self.document.get("root") {
            return root.as_str().ok_or_else(|| GraphError::ParseError {
                detail: "\"root\" must be a string".into(),
            });
        }
        self.document
            .get("nodes")
            .and_then(|nodes| nodes.get(0))
            .and_then(|first| first.get("identifier"))
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| GraphError::ParseError {
                detail: "document has no nodes to pick a root from".into(),
            })
    }
}

impl GraphWorld for GraphDocument {
    fn world_id(&self) -> &str {
        &self.world_id
    }

    fn build(&self) -> Result<WorldGraph, GraphError> {
        let graph = ActivityGraph::from_json_value(&self.document)?;
        let root_name = self.root_identifier()?;
        let root = graph
            .find(root_name)
            .ok_or_else(|| GraphError::UnknownIdentifier {
                identifier: root_name.to_string(),
            })?;
        Ok(WorldGraph { graph, root })
    }
}
