//! Record arena
//!
//! Canonical storage for a tree: one record per non-root node, keyed by id,
//! plus an ordered child list per parent. All lookups and structural edits
//! are implemented here; the public `Tree` handle only adds locking around
//! them.

use super::shift::{clamp_insert_index, insert_sibling, remove_sibling, ChildIndex};
use crate::error::TreeError;
use crate::types::{DeleteStrategy, NodeId};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Storage record for a non-root node
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NodeRecord<T> {
    pub id: String,
    pub data: Option<T>,
    /// `None` when parented directly under the root
    pub parent: Option<String>,
    pub index: usize,
}

pub(crate) type Records<T> = BTreeMap<String, NodeRecord<T>>;

pub(crate) struct TreeStore<T> {
    records: Records<T>,
    children: ChildIndex,
}

impl<T> TreeStore<T> {
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
            children: ChildIndex::default(),
        }
    }

    /// Wrap records whose sibling indices are already `0..n` per parent.
    pub fn from_records(records: Records<T>) -> Self {
        let children = ChildIndex::from_records(&records);
        Self { records, children }
    }

    pub fn records(&self) -> &Records<T> {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        match id {
            NodeId::Root => true,
            NodeId::Key(key) => self.records.contains_key(key),
        }
    }

    fn ensure_exists(&self, id: &NodeId) -> Result<(), TreeError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(TreeError::UnknownNode(id.clone()))
        }
    }

    pub fn record(&self, id: &str) -> Result<&NodeRecord<T>, TreeError> {
        self.records.get(id).ok_or_else(|| TreeError::unknown(id))
    }

    fn record_mut(&mut self, id: &str) -> Result<&mut NodeRecord<T>, TreeError> {
        self.records.get_mut(id).ok_or_else(|| TreeError::unknown(id))
    }

    pub fn data(&self, id: &str) -> Result<Option<&T>, TreeError> {
        Ok(self.record(id)?.data.as_ref())
    }

    pub fn set_data(&mut self, id: &str, data: Option<T>) -> Result<(), TreeError> {
        self.record_mut(id)?.data = data;
        Ok(())
    }

    /// Parent of `id`: `Root` for top-level nodes, `None` for the root itself.
    pub fn parent_of(&self, id: &NodeId) -> Result<Option<NodeId>, TreeError> {
        match id {
            NodeId::Root => Ok(None),
            NodeId::Key(key) => Ok(Some(NodeId::from(self.record(key)?.parent.as_ref()))),
        }
    }

    pub fn index_of(&self, id: &NodeId) -> Result<Option<usize>, TreeError> {
        match id {
            NodeId::Root => Ok(None),
            NodeId::Key(key) => Ok(Some(self.record(key)?.index)),
        }
    }

    /// Child ids of `id` in ascending index order.
    pub fn children_of(&self, id: &NodeId) -> Result<&[String], TreeError> {
        self.ensure_exists(id)?;
        Ok(self.children.get(id.as_key()))
    }

    pub fn child_at(&self, parent: &NodeId, index: usize) -> Option<String> {
        self.children.get(parent.as_key()).get(index).cloned()
    }

    /// Whether `candidate` sits strictly below `ancestor`.
    pub fn is_descendant(&self, candidate: &NodeId, ancestor: &NodeId) -> bool {
        let mut current = match candidate {
            NodeId::Root => return false,
            NodeId::Key(key) => match self.records.get(key) {
                Some(record) => NodeId::from(record.parent.as_ref()),
                None => return false,
            },
        };
        // A well-formed tree is never deeper than its record count.
        for _ in 0..=self.records.len() {
            if &current == ancestor {
                return true;
            }
            current = match &current {
                NodeId::Root => return false,
                NodeId::Key(key) => match self.records.get(key) {
                    Some(record) => NodeId::from(record.parent.as_ref()),
                    None => return false,
                },
            };
        }
        false
    }

    /// Insert a new record under `parent`; returns the index it landed at.
    pub fn create_child(
        &mut self,
        id: String,
        parent: &NodeId,
        index: Option<usize>,
    ) -> Result<usize, TreeError> {
        if self.records.contains_key(&id) {
            return Err(TreeError::DuplicateNode(id));
        }
        self.ensure_exists(parent)?;

        let parent_key = parent.to_parent();
        self.records.insert(
            id.clone(),
            NodeRecord {
                id: id.clone(),
                data: None,
                parent: parent_key.clone(),
                index: 0,
            },
        );
        let siblings = self.children.get_mut(parent_key.as_deref());
        let index = clamp_insert_index(index, siblings.len());
        debug!(node = %id, parent = %parent, index, "created node");
        insert_sibling(&mut self.records, siblings, index, id);
        Ok(index)
    }

    /// Move `id` under `parent`; returns the index it landed at.
    pub fn update_node(
        &mut self,
        id: &str,
        parent: &NodeId,
        index: Option<usize>,
    ) -> Result<usize, TreeError> {
        let (old_parent, old_index) = {
            let record = self.record(id)?;
            (record.parent.clone(), record.index)
        };
        self.ensure_exists(parent)?;
        let node = NodeId::from(id);
        if parent == &node || self.is_descendant(parent, &node) {
            return Err(TreeError::CyclicMove {
                node: id.to_string(),
                parent: parent.clone(),
            });
        }

        let old_siblings = self.children.get_mut(old_parent.as_deref());
        remove_sibling(&mut self.records, old_siblings, old_index);

        let parent_key = parent.to_parent();
        self.record_mut(id)?.parent = parent_key.clone();
        let siblings = self.children.get_mut(parent_key.as_deref());
        let index = clamp_insert_index(index, siblings.len());
        insert_sibling(&mut self.records, siblings, index, id.to_string());
        debug!(node = %id, parent = %parent, index, "moved node");
        Ok(index)
    }

    /// Move `id` so it sits directly before or after `anchor`.
    pub fn move_relative(
        &mut self,
        id: &str,
        anchor: &str,
        after: bool,
    ) -> Result<usize, TreeError> {
        if id == anchor {
            return Err(TreeError::SelfReference);
        }
        let (anchor_parent, anchor_index) = {
            let record = self.record(anchor)?;
            (record.parent.clone(), record.index)
        };
        let record = self.record(id)?;
        // Leaving a slot ahead of the anchor pulls the anchor one position earlier.
        let shifted = record.parent == anchor_parent && record.index < anchor_index;
        let target = match (after, shifted) {
            (false, false) => anchor_index,
            (false, true) => anchor_index - 1,
            (true, false) => anchor_index + 1,
            (true, true) => anchor_index,
        };
        self.update_node(id, &NodeId::from(anchor_parent), Some(target))
    }

    /// Delete `id` under `strategy`; returns every removed id, deepest first.
    pub fn delete_node(
        &mut self,
        id: &str,
        strategy: DeleteStrategy,
    ) -> Result<Vec<String>, TreeError> {
        let children = self.children_of(&NodeId::from(id))?.to_vec();
        if children.is_empty() {
            self.remove_record(id)?;
            return Ok(vec![id.to_string()]);
        }

        match strategy {
            DeleteStrategy::Decline => {
                warn!(
                    node = %id,
                    children = children.len(),
                    "declined to delete node with children"
                );
                Err(TreeError::CascadeRefused(id.to_string()))
            }
            DeleteStrategy::Cascade => {
                let removed = self.subtree_post_order(id);
                for descendant in &removed[..removed.len() - 1] {
                    self.records.remove(descendant);
                    self.children.forget(descendant);
                    debug!(node = %descendant, "deleted node");
                }
                self.remove_record(id)?;
                Ok(removed)
            }
            DeleteStrategy::Reattach => {
                let (parent, base) = {
                    let record = self.record(id)?;
                    (NodeId::from(record.parent.as_ref()), record.index)
                };
                for (offset, child) in children.iter().enumerate() {
                    self.update_node(child, &parent, Some(base + 1 + offset))?;
                }
                self.remove_record(id)?;
                Ok(vec![id.to_string()])
            }
        }
    }

    /// Ids of the subtree at `id`, children before parents, siblings in index order.
    fn subtree_post_order(&self, id: &str) -> Vec<String> {
        let mut order = Vec::new();
        let mut stack = vec![(id.to_string(), false)];
        while let Some((current, expanded)) = stack.pop() {
            if expanded {
                order.push(current);
                continue;
            }
            let children = self.children.get(Some(current.as_str()));
            let pending: Vec<(String, bool)> =
                children.iter().rev().map(|child| (child.clone(), false)).collect();
            stack.push((current, true));
            stack.extend(pending);
        }
        order
    }

    fn remove_record(&mut self, id: &str) -> Result<NodeRecord<T>, TreeError> {
        let record = self.records.remove(id).ok_or_else(|| TreeError::unknown(id))?;
        let siblings = self.children.get_mut(record.parent.as_deref());
        remove_sibling(&mut self.records, siblings, record.index);
        self.children.forget(id);
        debug!(node = %id, "deleted node");
        Ok(record)
    }
}

impl<T> Default for TreeStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
