//! Subtree iteration
//!
//! `TreeTraverser` is lazy and single-pass. Each step takes the tree's read
//! lock and works from live state, so the tree may be edited between steps:
//! depth-first traversal ends once its cursor or its start node has been
//! deleted, and breadth-first traversal skips queued nodes that no longer
//! exist.

use super::store::TreeStore;
use super::{Node, Tree};
use crate::types::{NodeId, TraversalOrder};
use std::collections::VecDeque;
use std::iter::FusedIterator;

enum State {
    /// `last` is `None` until the start node has been yielded
    DepthFirst { last: Option<NodeId> },
    BreadthFirst { queue: VecDeque<NodeId> },
    Done,
}

pub struct TreeTraverser<T> {
    tree: Tree<T>,
    start: NodeId,
    state: State,
}

impl<T> TreeTraverser<T> {
    pub(crate) fn new(tree: Tree<T>, start: NodeId, order: TraversalOrder) -> Self {
        let state = match order {
            TraversalOrder::DepthFirst => State::DepthFirst { last: None },
            TraversalOrder::BreadthFirst => State::BreadthFirst {
                queue: VecDeque::from([start.clone()]),
            },
        };
        Self { tree, start, state }
    }

    /// Node the traversal started from
    pub fn start(&self) -> &NodeId {
        &self.start
    }
}

impl<T> Iterator for TreeTraverser<T> {
    type Item = Node<T>;

    fn next(&mut self) -> Option<Node<T>> {
        let next = {
            let store = self.tree.read();
            match &mut self.state {
                State::DepthFirst { last } => {
                    let next = match last.as_ref() {
                        None => store.contains(&self.start).then(|| self.start.clone()),
                        Some(current) => next_in_preorder(&store, &self.start, current),
                    };
                    last.clone_from(&next);
                    next
                }
                State::BreadthFirst { queue } => next_in_level_order(&store, queue),
                State::Done => None,
            }
        };

        match next {
            Some(id) => Some(Node::new(id, self.tree.clone())),
            None => {
                self.state = State::Done;
                None
            }
        }
    }
}

impl<T> FusedIterator for TreeTraverser<T> {}

/// Pre-order successor of `current` within the subtree rooted at `start`.
fn next_in_preorder<T>(store: &TreeStore<T>, start: &NodeId, current: &NodeId) -> Option<NodeId> {
    if !store.contains(start) || !store.contains(current) {
        return None;
    }
    if let Some(first) = store.child_at(current, 0) {
        return Some(NodeId::Key(first));
    }

    let mut cursor = current.clone();
    loop {
        if &cursor == start {
            return None;
        }
        let parent = store.parent_of(&cursor).ok()??;
        let index = store.index_of(&cursor).ok()??;
        if let Some(sibling) = store.child_at(&parent, index + 1) {
            return Some(NodeId::Key(sibling));
        }
        cursor = parent;
    }
}

fn next_in_level_order<T>(store: &TreeStore<T>, queue: &mut VecDeque<NodeId>) -> Option<NodeId> {
    while let Some(id) = queue.pop_front() {
        if let Ok(children) = store.children_of(&id) {
            queue.extend(children.iter().cloned().map(NodeId::Key));
            return Some(id);
        }
    }
    None
}
