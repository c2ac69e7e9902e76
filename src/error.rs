//! Error types for tree operations and the surrounding tooling.

use crate::types::NodeId;
use thiserror::Error;

/// Precondition violations raised by the tree engine.
///
/// None of these are transient: the tree performs no I/O, so every error
/// points at a call that should not have been made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("the root node cannot hold data, be moved, or be deleted")]
    RootMutation,

    #[error("node cannot be positioned relative to itself")]
    SelfReference,

    #[error("the root node cannot be used as a move anchor")]
    InvalidAnchor,

    #[error("unknown node: {0}")]
    UnknownNode(NodeId),

    #[error("node {0} has children and the decline strategy refuses to delete it")]
    CascadeRefused(String),

    #[error("node already exists: {0}")]
    DuplicateNode(String),

    #[error("moving {node} under {parent} would create a cycle")]
    CyclicMove { node: String, parent: NodeId },

    #[error("node handle belongs to a different tree")]
    ForeignNode,

    #[error("invalid serialized tree: {0}")]
    InvalidSerialized(String),

    #[error("payload could not be encoded as JSON: {0}")]
    PayloadEncoding(String),
}

impl TreeError {
    pub(crate) fn unknown(id: impl Into<NodeId>) -> Self {
        TreeError::UnknownNode(id.into())
    }
}

/// Errors surfaced by the CLI, configuration and logging layers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl From<config::ConfigError> for ApiError {
    fn from(err: config::ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}
