//! Nested subtree snapshots, owned or rendered as JSON.

use super::store::TreeStore;
use crate::error::TreeError;
use crate::types::NodeId;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Owned copy of a subtree, children in index order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSnapshot<T> {
    pub id: NodeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default)]
    pub children: Vec<TreeSnapshot<T>>,
}

impl<T> TreeSnapshot<T> {
    /// Number of nodes in the snapshot, including its top node
    pub fn len(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(snapshot) = pending.pop() {
            count += 1;
            pending.extend(&snapshot.children);
        }
        count
    }

    /// Depth-first search for `id` within the snapshot
    pub fn find(&self, id: &NodeId) -> Option<&TreeSnapshot<T>> {
        let mut pending = vec![self];
        while let Some(snapshot) = pending.pop() {
            if &snapshot.id == id {
                return Some(snapshot);
            }
            pending.extend(snapshot.children.iter().rev());
        }
        None
    }
}

impl<T> Drop for TreeSnapshot<T> {
    // Unlink children one level at a time so deep snapshots drop without recursion.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut snapshot) = pending.pop() {
            pending.append(&mut snapshot.children);
        }
    }
}

/// A node whose children are still being built
struct Frame<N, R> {
    node: N,
    pending: std::vec::IntoIter<String>,
    finished: Vec<R>,
}

/// Build a value for the subtree at `id` bottom-up with an explicit stack.
///
/// `open` runs for each node in pre-order; `close` combines a node with its
/// children's results, in index order.
fn fold_subtree<T, N, R>(
    store: &TreeStore<T>,
    id: &NodeId,
    mut open: impl FnMut(&NodeId) -> Result<N, TreeError>,
    mut close: impl FnMut(N, Vec<R>) -> R,
) -> Result<R, TreeError> {
    let mut enter = |id: &NodeId| -> Result<Frame<N, R>, TreeError> {
        let pending = store.children_of(id)?.to_vec().into_iter();
        Ok(Frame {
            node: open(id)?,
            pending,
            finished: Vec::new(),
        })
    };

    let mut stack = vec![enter(id)?];
    let mut result = None;
    while let Some(mut frame) = stack.pop() {
        if let Some(child) = frame.pending.next() {
            stack.push(frame);
            stack.push(enter(&NodeId::Key(child))?);
            continue;
        }
        let value = close(frame.node, frame.finished);
        match stack.last_mut() {
            Some(parent) => parent.finished.push(value),
            None => result = Some(value),
        }
    }
    result.ok_or_else(|| TreeError::UnknownNode(id.clone()))
}

pub(crate) fn build_snapshot<T: Clone>(
    store: &TreeStore<T>,
    id: &NodeId,
) -> Result<TreeSnapshot<T>, TreeError> {
    fold_subtree(
        store,
        id,
        |id| {
            let data = match id {
                NodeId::Root => None,
                NodeId::Key(key) => store.data(key)?.cloned(),
            };
            Ok((id.clone(), data))
        },
        |(id, data): (NodeId, Option<T>), children| TreeSnapshot { id, data, children },
    )
}

pub(crate) fn build_json<T: Serialize>(
    store: &TreeStore<T>,
    id: &NodeId,
) -> Result<Value, TreeError> {
    fold_subtree(
        store,
        id,
        |id| {
            let mut object = Map::new();
            object.insert(
                "id".to_string(),
                id.as_key().map_or(Value::Null, |key| Value::String(key.to_string())),
            );
            if let NodeId::Key(key) = id {
                if let Some(data) = store.data(key)? {
                    let value = serde_json::to_value(data)
                        .map_err(|e| TreeError::PayloadEncoding(format!("{}: {}", key, e)))?;
                    object.insert("data".to_string(), value);
                }
            }
            Ok(object)
        },
        |mut object: Map<String, Value>, children: Vec<Value>| {
            object.insert("children".to_string(), Value::Array(children));
            Value::Object(object)
        },
    )
}
