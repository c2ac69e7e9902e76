//! Runbook Tree: Ordered Hierarchical Structure Engine
//!
//! An ordered tree used to represent runbook document and workspace structure.
//! Nodes live in a flat arena keyed by identifier, each carrying an optional
//! payload, a parent reference and a dense sibling index.

pub mod config;
pub mod error;
pub mod logging;
pub mod tooling;
pub mod tree;
pub mod types;

pub use error::{ApiError, TreeError};
pub use tree::{
    LoadPolicy, Node, SerializedNode, SerializedTree, Tree, TreeSnapshot, TreeTraverser,
};
pub use types::{DeleteStrategy, NodeId, TraversalOrder};
