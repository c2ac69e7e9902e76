use runbook_tree::{NodeId, TraversalOrder, Tree, TreeError};
use serde_json::{json, Value};

use super::support::{assert_contiguous, chain, ids, node, sample_tree};

#[test]
fn end_to_end_document_scenario() {
    let root = sample_tree();
    let child1 = node(&root, "child1");

    assert_eq!(
        ids(&child1.descendants(TraversalOrder::DepthFirst).unwrap()),
        vec!["child3", "child4"]
    );
    assert_eq!(
        root.json_tree().unwrap(),
        json!({
            "id": null,
            "children": [
                {
                    "id": "child1",
                    "data": 1,
                    "children": [
                        {"id": "child3", "data": 3, "children": []},
                        {"id": "child4", "data": 4, "children": []}
                    ]
                },
                {"id": "child2", "data": 2, "children": []}
            ]
        })
    );
    assert!(root.json_tree().unwrap().get("data").is_none());
}

#[test]
fn insert_positions_shift_siblings() {
    let root = Tree::<()>::empty();
    for id in ["b", "d"] {
        root.create_child(id, None).unwrap();
    }
    root.create_child("a", Some(0)).unwrap();
    root.create_child("c", Some(2)).unwrap();
    root.create_child("e", Some(1000)).unwrap();

    assert_eq!(ids(&root.children().unwrap()), vec!["a", "b", "c", "d", "e"]);
    assert_contiguous(&root);
}

#[test]
fn move_keeps_single_parent_and_contiguous_indices() {
    let root = sample_tree();
    let child3 = node(&root, "child3");
    let child2 = node(&root, "child2");

    child3.move_to(&child2, None).unwrap();

    let holders: Vec<String> = root
        .descendants(TraversalOrder::DepthFirst)
        .unwrap()
        .into_iter()
        .chain(std::iter::once(root.clone()))
        .filter(|n| {
            n.children()
                .unwrap()
                .iter()
                .any(|c| c.id() == &NodeId::from("child3"))
        })
        .map(|n| n.id().to_string())
        .collect();
    assert_eq!(holders, vec!["child2"]);
    assert_eq!(ids(&node(&root, "child1").children().unwrap()), vec!["child4"]);
    assert_contiguous(&root);
}

#[test]
fn depth_matches_ancestor_count() {
    let root = sample_tree();
    assert_eq!(root.depth().unwrap(), 0);
    for n in root.descendants(TraversalOrder::BreadthFirst).unwrap() {
        assert_eq!(n.depth().unwrap(), n.ancestors().unwrap().len());
    }
    assert_eq!(node(&root, "child4").depth().unwrap(), 2);
}

#[test]
fn scoped_lookup_cannot_escape_subtree() {
    let root = sample_tree();
    let child2 = node(&root, "child2");
    assert!(root.tree().contains(&NodeId::from("child3")));
    assert!(child2.get_node(&NodeId::from("child3")).is_none());
    assert!(node(&root, "child1").get_node(&NodeId::from("child3")).is_some());
}

#[test]
fn handles_reflect_live_state() {
    let root = sample_tree();
    let child4 = node(&root, "child4");
    let alias = node(&root, "child4");

    child4.move_before(&node(&root, "child3")).unwrap();
    assert_eq!(alias.index().unwrap(), Some(0));
    assert_eq!(alias, child4);

    child4.set_data(40).unwrap();
    assert_eq!(alias.get_data().unwrap(), Some(40));
}

#[test]
fn root_guards() {
    let root = sample_tree();
    assert_eq!(root.set_data(0), Err(TreeError::RootMutation));
    assert_eq!(
        node(&root, "child1").move_after(&root),
        Err(TreeError::InvalidAnchor)
    );
    assert_eq!(
        root.create_child("child2", None).unwrap_err(),
        TreeError::DuplicateNode("child2".to_string())
    );
}

/// Length of a single-child JSON chain, unlinking each level as it goes
fn json_chain_length(mut value: Value) -> usize {
    let mut length = 0;
    loop {
        let next = match value.get_mut("children").map(Value::take) {
            Some(Value::Array(mut children)) => children.pop(),
            _ => None,
        };
        match next {
            Some(child) => {
                value = child;
                length += 1;
            }
            None => return length,
        }
    }
}

#[test]
fn json_tree_and_snapshot_handle_deep_chains() {
    let root = chain(20_000);
    let json = root.json_tree().unwrap();
    assert_eq!(json["children"][0]["data"], 0);
    assert_eq!(json_chain_length(json), 20_000);

    let snapshot = root.snapshot().unwrap();
    assert_eq!(snapshot.len(), 20_001);
    assert_eq!(
        snapshot.find(&NodeId::from("n19999")).and_then(|s| s.data),
        Some(19_999)
    );
}

#[test]
fn wide_parent_keeps_order_and_contiguity() {
    let root = Tree::<usize>::empty();
    for i in 0..2_000 {
        root.create_child(format!("c{}", i), Some(0)).unwrap();
    }
    let children = root.children().unwrap();
    assert_eq!(children.len(), 2_000);
    assert_eq!(children[0].id(), &NodeId::from("c1999"));
    assert_eq!(children[1_999].id(), &NodeId::from("c0"));
    assert_eq!(root.traverse(TraversalOrder::DepthFirst).unwrap().count(), 2_001);
    assert_contiguous(&root);
}
