//! Shared fixtures for integration tests.
#![allow(dead_code)]

use flattree::util::testing;
use flattree::{FlatRecord, NodeData, NodeId, Side, Tree};

pub fn n(v: i64) -> NodeId {
    NodeId::Int(v)
}

//        100*
//       /    \
//    101*    102
//    /  \     |
//  103  104  105
//             |
//            106
//             |
//            107*
pub fn sample_records() -> Vec<FlatRecord> {
    testing::init_test_setup();
    vec![
        FlatRecord::root(100).with_data(NodeData::fork()),
        FlatRecord::child(101, 100, Side::Left).with_data(NodeData::fork()),
        FlatRecord::child(102, 100, Side::Right),
        FlatRecord::child(103, 101, Side::Left),
        FlatRecord::child(104, 101, Side::Right),
        FlatRecord::child(105, 102, Side::Left),
        FlatRecord::child(106, 105, Side::Left),
        FlatRecord::child(107, 106, Side::Left).with_data(NodeData::fork()),
    ]
}

pub fn sample_tree() -> Tree {
    Tree::load(&sample_records()).expect("sample records are valid")
}

/// Shorthand for a node's slots: (parent, left, right).
pub fn links(tree: &Tree, id: i64) -> (Option<NodeId>, Option<NodeId>, Option<NodeId>) {
    let node = tree.get(&n(id)).expect("node present");
    (node.parent.clone(), node.left.clone(), node.right.clone())
}
