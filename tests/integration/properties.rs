use proptest::prelude::*;
use runbook_tree::{DeleteStrategy, NodeId, TraversalOrder, Tree};

use super::support::assert_contiguous;

#[derive(Debug, Clone)]
enum Op {
    Create { parent: usize, index: Option<usize> },
    Move { node: usize, parent: usize, index: Option<usize> },
    MoveNextTo { node: usize, anchor: usize, after: bool },
    Delete { node: usize, strategy: DeleteStrategy },
}

fn op() -> impl Strategy<Value = Op> {
    let index = proptest::option::of(0usize..6);
    let strategy = prop_oneof![
        Just(DeleteStrategy::Decline),
        Just(DeleteStrategy::Cascade),
        Just(DeleteStrategy::Reattach),
    ];
    prop_oneof![
        3 => (any::<usize>(), index.clone())
            .prop_map(|(parent, index)| Op::Create { parent, index }),
        2 => (any::<usize>(), any::<usize>(), index)
            .prop_map(|(node, parent, index)| Op::Move { node, parent, index }),
        1 => (any::<usize>(), any::<usize>(), any::<bool>())
            .prop_map(|(node, anchor, after)| Op::MoveNextTo { node, anchor, after }),
        1 => (any::<usize>(), strategy).prop_map(|(node, strategy)| Op::Delete { node, strategy }),
    ]
}

/// Every node currently in the tree, root first
fn all_ids(tree: &Tree<u32>) -> Vec<NodeId> {
    tree.root()
        .traverse(TraversalOrder::BreadthFirst)
        .unwrap()
        .map(|n| n.id().clone())
        .collect()
}

/// Apply `ops`, ignoring rejected edits; returns the number of creates.
fn apply(tree: &Tree<u32>, ops: &[Op]) -> u32 {
    let mut created = 0u32;
    for op in ops {
        let ids = all_ids(tree);
        let pick = |n: usize| ids[n % ids.len()].clone();
        let handle = |id: NodeId| tree.node(&id).unwrap();
        match op {
            Op::Create { parent, index } => {
                let child = handle(pick(*parent))
                    .create_child(format!("n{}", created), *index)
                    .unwrap();
                child.set_data(created).unwrap();
                created += 1;
            }
            Op::Move { node, parent, index } => {
                let _ = handle(pick(*node)).move_to(&handle(pick(*parent)), *index);
            }
            Op::MoveNextTo { node, anchor, after } => {
                let node = handle(pick(*node));
                let anchor = handle(pick(*anchor));
                let _ = if *after {
                    node.move_after(&anchor)
                } else {
                    node.move_before(&anchor)
                };
            }
            Op::Delete { node, strategy } => {
                let _ = handle(pick(*node)).delete(*strategy);
            }
        }
    }
    created
}

proptest! {
    #[test]
    fn indices_stay_contiguous(ops in proptest::collection::vec(op(), 0..40)) {
        let tree = Tree::new();
        apply(&tree, &ops);
        assert_contiguous(&tree.root());
    }

    #[test]
    fn every_node_reaches_the_root(ops in proptest::collection::vec(op(), 0..40)) {
        let tree = Tree::new();
        apply(&tree, &ops);
        let reachable = tree.root().descendants(TraversalOrder::DepthFirst).unwrap();
        prop_assert_eq!(reachable.len(), tree.len());
        for node in reachable {
            prop_assert_eq!(node.depth().unwrap(), node.ancestors().unwrap().len());
            prop_assert!(node.depth().unwrap() >= 1);
        }
    }

    #[test]
    fn serialized_round_trip_is_lossless(ops in proptest::collection::vec(op(), 0..40)) {
        let tree = Tree::new();
        apply(&tree, &ops);
        let flat = tree.to_serialized();
        let restored = Tree::from_serialized(flat.clone()).unwrap();
        prop_assert_eq!(restored.tree().to_serialized(), flat);
        prop_assert_eq!(restored.json_tree().unwrap(), tree.root().json_tree().unwrap());
    }

    #[test]
    fn traversal_orders_visit_the_same_nodes(ops in proptest::collection::vec(op(), 0..40)) {
        let tree = Tree::new();
        apply(&tree, &ops);
        let mut dfs: Vec<NodeId> = tree.root().traverse(TraversalOrder::DepthFirst).unwrap()
            .map(|n| n.id().clone()).collect();
        let mut bfs = all_ids(&tree);
        prop_assert_eq!(dfs.len(), tree.len() + 1);
        dfs.sort_by_key(|id| id.to_string());
        bfs.sort_by_key(|id| id.to_string());
        prop_assert_eq!(dfs, bfs);
    }
}
