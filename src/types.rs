//! Core types shared across the tree engine.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Identifier of a tree node.
///
/// `Root` is the implicit top-level container. It is never stored in the
/// record arena and cannot collide with any string key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeId {
    Root,
    Key(String),
}

impl NodeId {
    pub fn is_root(&self) -> bool {
        matches!(self, NodeId::Root)
    }

    /// String key of a non-root node
    pub fn as_key(&self) -> Option<&str> {
        match self {
            NodeId::Root => None,
            NodeId::Key(key) => Some(key),
        }
    }

    /// Parent reference as stored in a record (`None` means the root).
    pub(crate) fn to_parent(&self) -> Option<String> {
        self.as_key().map(str::to_string)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Root => f.write_str("<root>"),
            NodeId::Key(key) => f.write_str(key),
        }
    }
}

impl From<&str> for NodeId {
    fn from(key: &str) -> Self {
        NodeId::Key(key.to_string())
    }
}

impl From<String> for NodeId {
    fn from(key: String) -> Self {
        NodeId::Key(key)
    }
}

impl From<&String> for NodeId {
    fn from(key: &String) -> Self {
        NodeId::Key(key.clone())
    }
}

impl From<Option<String>> for NodeId {
    fn from(parent: Option<String>) -> Self {
        parent.map(NodeId::Key).unwrap_or(NodeId::Root)
    }
}

impl From<Option<&String>> for NodeId {
    fn from(parent: Option<&String>) -> Self {
        parent.map(NodeId::from).unwrap_or(NodeId::Root)
    }
}

// Root travels as `null`, matching the `parent: null` convention of the
// serialized form.
impl Serialize for NodeId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            NodeId::Root => serializer.serialize_none(),
            NodeId::Key(key) => serializer.serialize_some(key),
        }
    }
}

impl<'de> Deserialize<'de> for NodeId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(Option::<String>::deserialize(deserializer)?.into())
    }
}

/// Traversal order for subtree iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraversalOrder {
    /// Pre-order: a node, then each child's subtree in index order
    #[default]
    DepthFirst,
    /// Level order
    BreadthFirst,
}

impl FromStr for TraversalOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dfs" | "depth_first" | "depth-first" => Ok(TraversalOrder::DepthFirst),
            "bfs" | "breadth_first" | "breadth-first" => Ok(TraversalOrder::BreadthFirst),
            other => Err(format!(
                "Invalid traversal order: {} (must be 'dfs' or 'bfs')",
                other
            )),
        }
    }
}

/// What happens to a deleted node's children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeleteStrategy {
    /// Refuse to delete a node that still has children
    #[default]
    Decline,
    /// Delete every descendant along with the node
    Cascade,
    /// Hand the children over to the deleted node's parent
    Reattach,
}

impl FromStr for DeleteStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "decline" => Ok(DeleteStrategy::Decline),
            "cascade" => Ok(DeleteStrategy::Cascade),
            "reattach" => Ok(DeleteStrategy::Reattach),
            other => Err(format!(
                "Invalid delete strategy: {} (must be 'decline', 'cascade', or 'reattach')",
                other
            )),
        }
    }
}
