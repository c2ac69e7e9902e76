//! Node handles
//!
//! A `Node` is an id plus a handle to its tree. It caches nothing: every
//! query goes back to the tree, so a handle always reflects live structure
//! and fails with `UnknownNode` once its record has been deleted.

use super::snapshot::{build_json, build_snapshot, TreeSnapshot};
use super::{Tree, TreeTraverser};
use crate::error::TreeError;
use crate::types::{DeleteStrategy, NodeId, TraversalOrder};
use std::fmt;

pub struct Node<T> {
    id: NodeId,
    tree: Tree<T>,
}

impl<T> Node<T> {
    pub(crate) fn new(id: NodeId, tree: Tree<T>) -> Self {
        Self { id, tree }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn tree(&self) -> &Tree<T> {
        &self.tree
    }

    pub fn is_root(&self) -> bool {
        self.id.is_root()
    }

    fn handle(&self, id: NodeId) -> Node<T> {
        Node::new(id, self.tree.clone())
    }

    /// String key of this node; the root has none and cannot be mutated
    fn key(&self) -> Result<&str, TreeError> {
        self.id.as_key().ok_or(TreeError::RootMutation)
    }

    fn ensure_same_tree(&self, other: &Node<T>) -> Result<(), TreeError> {
        if self.tree.same_tree(&other.tree) {
            Ok(())
        } else {
            Err(TreeError::ForeignNode)
        }
    }

    /// Payload of this node. The root never holds one.
    pub fn get_data(&self) -> Result<Option<T>, TreeError>
    where
        T: Clone,
    {
        match &self.id {
            NodeId::Root => Ok(None),
            NodeId::Key(key) => self.tree.get_data(key),
        }
    }

    pub fn set_data(&self, data: T) -> Result<(), TreeError> {
        self.tree.set_data(self.key()?, data)
    }

    pub fn clear_data(&self) -> Result<(), TreeError> {
        self.tree.clear_data(self.key()?)
    }

    pub fn root(&self) -> Node<T> {
        self.tree.root()
    }

    /// Resolve `id` within this node's subtree.
    ///
    /// Returns `None` unless `id` is a strict descendant of this node. The root
    /// is always reachable.
    pub fn get_node(&self, id: &NodeId) -> Option<Node<T>> {
        if id.is_root() {
            return Some(self.root());
        }
        let store = self.tree.read();
        (store.contains(id) && store.is_descendant(id, &self.id)).then(|| self.handle(id.clone()))
    }

    /// Direct children in ascending index order
    pub fn children(&self) -> Result<Vec<Node<T>>, TreeError> {
        Ok(self
            .tree
            .get_children(&self.id)?
            .into_iter()
            .map(|child| self.handle(NodeId::Key(child)))
            .collect())
    }

    /// Iterate this node's subtree, starting with the node itself
    pub fn traverse(&self, order: TraversalOrder) -> Result<TreeTraverser<T>, TreeError> {
        self.tree.traverse_starting_at(&self.id, order)
    }

    /// Every strict descendant in `order`
    pub fn descendants(&self, order: TraversalOrder) -> Result<Vec<Node<T>>, TreeError> {
        Ok(self.traverse(order)?.skip(1).collect())
    }

    pub fn parent(&self) -> Result<Option<Node<T>>, TreeError> {
        Ok(self.tree.get_parent(&self.id)?.map(|parent| self.handle(parent)))
    }

    /// Parent chain, nearest first, ending with the root
    pub fn ancestors(&self) -> Result<Vec<Node<T>>, TreeError> {
        let mut ancestors = Vec::new();
        let mut current = self.parent()?;
        while let Some(node) = current {
            current = node.parent()?;
            ancestors.push(node);
        }
        Ok(ancestors)
    }

    /// Other children of this node's parent, in index order
    pub fn siblings(&self) -> Result<Vec<Node<T>>, TreeError> {
        match self.parent()? {
            None => Ok(Vec::new()),
            Some(parent) => Ok(parent
                .children()?
                .into_iter()
                .filter(|sibling| sibling.id != self.id)
                .collect()),
        }
    }

    /// Number of ancestors; 0 for the root
    pub fn depth(&self) -> Result<usize, TreeError> {
        Ok(self.ancestors()?.len())
    }

    /// Position among siblings; `None` for the root
    pub fn index(&self) -> Result<Option<usize>, TreeError> {
        self.tree.get_index(&self.id)
    }

    pub fn create_child(
        &self,
        id: impl Into<String>,
        index: Option<usize>,
    ) -> Result<Node<T>, TreeError> {
        self.tree.create_child(id, &self.id, index)
    }

    /// Reparent this node under `parent` at `index` (appended when omitted)
    pub fn move_to(&self, parent: &Node<T>, index: Option<usize>) -> Result<(), TreeError> {
        self.ensure_same_tree(parent)?;
        let key = self.key()?;
        if parent.id == self.id {
            return Err(TreeError::SelfReference);
        }
        self.tree.update_node(key, &parent.id, index)
    }

    /// Place this node immediately before `other`, under `other`'s parent
    pub fn move_before(&self, other: &Node<T>) -> Result<(), TreeError> {
        self.move_next_to(other, false)
    }

    /// Place this node immediately after `other`, under `other`'s parent
    pub fn move_after(&self, other: &Node<T>) -> Result<(), TreeError> {
        self.move_next_to(other, true)
    }

    fn move_next_to(&self, other: &Node<T>, after: bool) -> Result<(), TreeError> {
        self.ensure_same_tree(other)?;
        let key = self.key()?;
        let anchor = other.id.as_key().ok_or(TreeError::InvalidAnchor)?;
        self.tree.write().move_relative(key, anchor, after).map(|_| ())
    }

    pub fn delete(&self, strategy: DeleteStrategy) -> Result<(), TreeError> {
        self.tree.delete_node(self.key()?, strategy)
    }

    /// Owned snapshot of this subtree
    pub fn snapshot(&self) -> Result<TreeSnapshot<T>, TreeError>
    where
        T: Clone,
    {
        build_snapshot(&self.tree.read(), &self.id)
    }

    /// JSON rendering of this subtree: `{ id, data?, children }` per node
    pub fn json_tree(&self) -> Result<serde_json::Value, TreeError>
    where
        T: serde::Serialize,
    {
        build_json(&self.tree.read(), &self.id)
    }
}

impl<T> Clone for Node<T> {
    fn clone(&self) -> Self {
        self.handle(self.id.clone())
    }
}

impl<T> PartialEq for Node<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.tree.same_tree(&other.tree)
    }
}

impl<T> Eq for Node<T> {}

impl<T> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Node").field(&self.id).finish()
    }
}
