//! Tests for loading flat records into a tree and packing them back

mod common;

use rstest::{fixture, rstest};
use serde_json::{json, Value};

use common::{links, n, sample_records, sample_tree};
use flattree::{FlatRecord, NodeData, NodeId, Side, Tree};

#[fixture]
fn tree() -> Tree {
    sample_tree()
}

// ============================================================
// load
// ============================================================

#[rstest]
fn given_sample_records_when_loading_then_links_slots_from_left_flags(tree: Tree) {
    // Assert
    assert_eq!(links(&tree, 100), (None, Some(n(101)), Some(n(102))));
    assert_eq!(links(&tree, 101), (Some(n(100)), Some(n(103)), Some(n(104))));
    assert_eq!(links(&tree, 102), (Some(n(100)), Some(n(105)), None));
    assert_eq!(tree.get(&n(105)).unwrap().parent, Some(n(102)));
    assert_eq!(tree.root(), &n(100));
    assert_eq!(tree.len(), 8);
}

#[test]
fn given_records_in_any_order_when_loading_then_same_tree() {
    // Arrange
    let mut records = sample_records();
    records.reverse();

    // Act
    let tree = Tree::load(&records).unwrap();

    // Assert
    assert_eq!(tree, sample_tree());
}

#[test]
fn given_invalid_records_when_loading_then_fails_like_validator() {
    // Arrange
    let records = vec![FlatRecord::root(1), FlatRecord::root(2)];

    // Act
    let result = Tree::load(&records);

    // Assert
    let expected = flattree::domain::validate(&records).unwrap_err();
    assert_eq!(result, Err(flattree::TreeError::Invalid(expected)));
}

#[rstest]
fn given_loaded_tree_when_serializing_then_emits_adjacency_map(tree: Tree) {
    // Act
    let value = serde_json::to_value(&tree).unwrap();

    // Assert
    assert_eq!(value["100"]["left"], json!(101));
    assert_eq!(value["100"]["right"], json!(102));
    assert_eq!(value["100"]["fork"], json!(true));
    assert_eq!(value["105"]["parent"], json!(102));
    assert!(value["107"].get("left").is_none());
}

// ============================================================
// pack
// ============================================================

#[rstest]
fn given_loaded_tree_when_packing_then_returns_initial_records(tree: Tree) {
    assert_eq!(tree.pack(), sample_records());
}

#[rstest]
#[case::numeric_ids(json!([
    { "id": 1, "parent": null, "left": null, "fork": true, "name": "root" },
    { "id": 2, "parent": 1, "left": true },
    { "id": 3, "parent": 1, "left": false, "weight": 2.5, "tags": ["a", "b"] }
]))]
#[case::string_ids(json!([
    { "id": "a", "parent": null, "left": null },
    { "id": "b", "parent": "a", "left": true, "fork": false }
]))]
#[case::single_root(json!([
    { "id": 7, "parent": null, "left": null, "note": { "nested": true } }
]))]
fn given_json_records_when_load_then_pack_then_records_are_unchanged(#[case] input: Value) {
    // Arrange
    let records: Vec<FlatRecord> = serde_json::from_value(input.clone()).unwrap();

    // Act
    let packed = Tree::load(&records).unwrap().pack();

    // Assert: same records, order-independent
    let mut expected = input.as_array().unwrap().clone();
    let mut actual = serde_json::to_value(&packed).unwrap().as_array().unwrap().clone();
    expected.sort_by_key(|v| v["id"].to_string());
    actual.sort_by_key(|v| v["id"].to_string());
    assert_eq!(actual, expected);
}

#[test]
fn given_record_with_right_key_when_packing_then_right_is_not_emitted() {
    // Arrange
    let records: Vec<FlatRecord> = serde_json::from_value(json!([
        { "id": 1, "parent": null, "left": null, "fork": true },
        { "id": 2, "parent": 1, "left": false, "right": 99 }
    ]))
    .unwrap();

    // Act
    let packed = serde_json::to_value(Tree::load(&records).unwrap().pack()).unwrap();

    // Assert
    assert!(packed[1].get("right").is_none());
    assert_eq!(packed[1]["left"], json!(false));
}

// ============================================================
// clone
// ============================================================

#[rstest]
fn given_tree_when_cloning_then_copy_is_equal(tree: Tree) {
    let copy = tree.clone();
    assert_eq!(copy, tree);
    assert_eq!(copy.get(&n(101)), tree.get(&n(101)));
}

#[rstest]
fn given_clone_when_editing_it_then_original_is_untouched(tree: Tree) {
    // Arrange
    let snapshot = tree.clone();
    let copy = tree.clone();

    // Act
    let edited = copy.insert(&n(107), NodeId::from("x"), None, NodeData::default()).unwrap();

    // Assert
    assert_eq!(tree, snapshot);
    assert_eq!(copy, snapshot);
    assert_ne!(edited, snapshot);
}

// ============================================================
// payload
// ============================================================

#[test]
fn given_node_with_fields_when_reading_payload_then_only_caller_fields_and_fork() {
    // Arrange
    let tree = Tree::load(&[
        FlatRecord::root(1).with_data(NodeData::fork().with_field("name", "top")),
        FlatRecord::child(2, 1, Side::Right),
    ])
    .unwrap();

    // Act
    let payload = tree.get(&n(1)).unwrap().payload();

    // Assert
    assert_eq!(payload, NodeData::fork().with_field("name", "top"));
    let value = serde_json::to_value(&payload).unwrap();
    for key in ["id", "parent", "left", "right"] {
        assert!(value.get(key).is_none(), "{} must not be in payload", key);
    }
}
