//! Ordered Tree
//!
//! Hierarchical structure for runbook documents and workspaces. A `Tree` owns
//! a flat arena of records behind a single read-write lock; `Node` handles are
//! cheap views that resolve everything against the tree on every call.

mod node;
mod serialized;
mod shift;
mod snapshot;
mod store;
mod traverser;

pub use node::Node;
pub use serialized::{LoadPolicy, SerializedNode, SerializedTree};
pub use snapshot::TreeSnapshot;
pub use traverser::TreeTraverser;

use crate::error::TreeError;
use crate::types::{DeleteStrategy, NodeId, TraversalOrder};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::fmt;
use std::sync::Arc;
use store::TreeStore;

/// Shared handle to a tree's canonical storage.
///
/// Cloning a `Tree` yields another handle to the same storage. Each operation
/// takes the lock once, so no caller ever observes a sibling range while its
/// indices are being shifted.
pub struct Tree<T> {
    store: Arc<RwLock<TreeStore<T>>>,
}

impl<T> Tree<T> {
    /// Create a tree with no nodes
    pub fn new() -> Self {
        Self::from_store(TreeStore::new())
    }

    /// Create a tree with no nodes and return its root handle
    pub fn empty() -> Node<T> {
        Self::new().root()
    }

    fn from_store(store: TreeStore<T>) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    pub(crate) fn read(&self) -> RwLockReadGuard<'_, TreeStore<T>> {
        self.store.read()
    }

    pub(crate) fn write(&self) -> RwLockWriteGuard<'_, TreeStore<T>> {
        self.store.write()
    }

    pub(crate) fn same_tree(&self, other: &Tree<T>) -> bool {
        Arc::ptr_eq(&self.store, &other.store)
    }

    pub fn root(&self) -> Node<T> {
        Node::new(NodeId::Root, self.clone())
    }

    /// Resolve any id in the tree, without subtree scoping
    pub fn node(&self, id: &NodeId) -> Option<Node<T>> {
        self.contains(id).then(|| Node::new(id.clone(), self.clone()))
    }

    /// Whether `id` names the root or a stored node
    pub fn contains(&self, id: &NodeId) -> bool {
        self.read().contains(id)
    }

    /// Number of stored nodes, not counting the root
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get_data(&self, id: &str) -> Result<Option<T>, TreeError>
    where
        T: Clone,
    {
        Ok(self.read().data(id)?.cloned())
    }

    /// Run `f` against the payload of `id` while holding the read lock
    pub fn with_data<R>(&self, id: &str, f: impl FnOnce(Option<&T>) -> R) -> Result<R, TreeError> {
        let store = self.read();
        Ok(f(store.data(id)?))
    }

    pub fn set_data(&self, id: &str, data: T) -> Result<(), TreeError> {
        self.write().set_data(id, Some(data))
    }

    pub fn clear_data(&self, id: &str) -> Result<(), TreeError> {
        self.write().set_data(id, None)
    }

    /// Parent of `id`: `Some(NodeId::Root)` for top-level nodes, `None` for the root
    pub fn get_parent(&self, id: &NodeId) -> Result<Option<NodeId>, TreeError> {
        self.read().parent_of(id)
    }

    /// Child ids of `id`, ascending by index
    pub fn get_children(&self, id: &NodeId) -> Result<Vec<String>, TreeError> {
        self.read().children_of(id).map(<[String]>::to_vec)
    }

    /// Sibling index of `id`; `None` for the root
    pub fn get_index(&self, id: &NodeId) -> Result<Option<usize>, TreeError> {
        self.read().index_of(id)
    }

    /// Insert `id` under `parent`.
    ///
    /// Without an `index` the node is appended; an index past the end is
    /// clamped to the append position.
    pub fn create_child(
        &self,
        id: impl Into<String>,
        parent: &NodeId,
        index: Option<usize>,
    ) -> Result<Node<T>, TreeError> {
        let id = id.into();
        self.write().create_child(id.clone(), parent, index)?;
        Ok(Node::new(NodeId::Key(id), self.clone()))
    }

    /// Move `id` under `parent` at `index` (appended when omitted).
    ///
    /// Fails with `CyclicMove` when `parent` is `id` or one of its descendants.
    pub fn update_node(
        &self,
        id: &str,
        parent: &NodeId,
        index: Option<usize>,
    ) -> Result<(), TreeError> {
        self.write().update_node(id, parent, index).map(|_| ())
    }

    /// Delete `id`, handling its children according to `strategy`
    pub fn delete_node(&self, id: &str, strategy: DeleteStrategy) -> Result<(), TreeError> {
        self.write().delete_node(id, strategy).map(|_| ())
    }

    /// Iterate the subtree rooted at `id`, starting with `id` itself
    pub fn traverse_starting_at(
        &self,
        id: &NodeId,
        order: TraversalOrder,
    ) -> Result<TreeTraverser<T>, TreeError> {
        if !self.contains(id) {
            return Err(TreeError::UnknownNode(id.clone()));
        }
        Ok(TreeTraverser::new(self.clone(), id.clone(), order))
    }
}

impl<T> Clone for Tree<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Tree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree").field("nodes", &self.len()).finish()
    }
}
