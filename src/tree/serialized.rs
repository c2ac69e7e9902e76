//! Flat interchange form
//!
//! `SerializedTree` is the map persisted by the surrounding document model:
//! one entry per non-root node, keyed by id, with `parent: null` marking
//! children of the root.

use super::shift::{contiguity_violation, densify};
use super::store::{NodeRecord, Records, TreeStore};
use super::{Node, Tree};
use crate::error::TreeError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

/// Serialized record for a single node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedNode<T> {
    pub id: String,
    pub data: Option<T>,
    pub parent: Option<String>,
    pub index: usize,
}

pub type SerializedTree<T> = BTreeMap<String, SerializedNode<T>>;

/// How sibling indices are treated when loading a serialized tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadPolicy {
    /// Reject gaps and duplicates
    #[default]
    Strict,
    /// Rewrite indices to `0..n`, keeping `(index, id)` order
    Normalize,
}

impl<T> Tree<T> {
    /// Rebuild a tree from its flat form and return the root handle.
    ///
    /// Dangling parents, cycles, mismatched keys and non-contiguous indices
    /// are rejected.
    pub fn from_serialized(data: SerializedTree<T>) -> Result<Node<T>, TreeError> {
        Self::from_serialized_with(data, LoadPolicy::Strict)
    }

    pub fn from_serialized_with(
        data: SerializedTree<T>,
        policy: LoadPolicy,
    ) -> Result<Node<T>, TreeError> {
        let mut records: Records<T> = BTreeMap::new();
        for (key, node) in data {
            if key != node.id {
                return Err(TreeError::InvalidSerialized(format!(
                    "entry {} carries id {}",
                    key, node.id
                )));
            }
            records.insert(
                key,
                NodeRecord {
                    id: node.id,
                    data: node.data,
                    parent: node.parent,
                    index: node.index,
                },
            );
        }

        validate_links(&records)?;
        match policy {
            LoadPolicy::Strict => {
                if let Some(violation) = contiguity_violation(&records) {
                    return Err(TreeError::InvalidSerialized(violation));
                }
            }
            LoadPolicy::Normalize => {
                if densify(&mut records) {
                    warn!(nodes = records.len(), "normalized sibling indices while loading tree");
                }
            }
        }

        debug!(nodes = records.len(), ?policy, "loaded serialized tree");
        Ok(Tree::from_store(TreeStore::from_records(records)).root())
    }

    /// Flat form of the whole tree; the inverse of `from_serialized`
    pub fn to_serialized(&self) -> SerializedTree<T>
    where
        T: Clone,
    {
        self.read()
            .records()
            .iter()
            .map(|(key, record)| {
                (
                    key.clone(),
                    SerializedNode {
                        id: record.id.clone(),
                        data: record.data.clone(),
                        parent: record.parent.clone(),
                        index: record.index,
                    },
                )
            })
            .collect()
    }
}

/// Every parent must exist, and following parents from any node must reach the root.
fn validate_links<T>(records: &Records<T>) -> Result<(), TreeError> {
    let mut reaches_root: HashSet<&str> = HashSet::new();
    for start in records.keys() {
        let mut path: HashSet<&str> = HashSet::new();
        let mut current = start.as_str();
        loop {
            if reaches_root.contains(current) {
                break;
            }
            if !path.insert(current) {
                return Err(TreeError::InvalidSerialized(format!(
                    "cycle through {}",
                    current
                )));
            }
            match records[current].parent.as_deref() {
                None => break,
                Some(parent) if records.contains_key(parent) => current = parent,
                Some(parent) => {
                    return Err(TreeError::InvalidSerialized(format!(
                        "{} references missing parent {}",
                        current, parent
                    )));
                }
            }
        }
        reaches_root.extend(path);
    }
    Ok(())
}
