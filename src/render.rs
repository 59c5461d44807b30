/*
Presentation adapter: turns a flat tree into a termtree for console output.
Reads ids and present children only, plus the optional decorations configured
in `RenderConfig`. Never mutates the tree.
 */
use serde_json::Value;
use termtree::Tree as TermTree;
use tracing::instrument;

use crate::config::RenderConfig;
use crate::domain::{Node, NodeId, Side, Tree};

pub trait TreeRender {
    fn to_tree_string(&self, opts: &RenderConfig) -> TermTree<String>;
}

impl TreeRender for Tree {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self, opts: &RenderConfig) -> TermTree<String> {
        fn build(tree: &Tree, id: &NodeId, side: Option<Side>, opts: &RenderConfig) -> TermTree<String> {
            match tree.get(id) {
                Some(node) => {
                    let leaves: Vec<_> = [Side::Left, Side::Right]
                        .into_iter()
                        .filter_map(|s| node.slot(s).map(|child| build(tree, child, Some(s), opts)))
                        .collect();
                    TermTree::new(node_label(node, side, opts)).with_leaves(leaves)
                }
                None => TermTree::new(format!("{} (missing)", id)),
            }
        }

        build(self, self.root(), None, opts)
    }
}

/// One line of output for `node`, e.g. `L 101* (payload)`.
pub fn node_label(node: &Node, side: Option<Side>, opts: &RenderConfig) -> String {
    let mut label = String::new();
    if opts.show_side {
        match side {
            Some(Side::Left) => label.push_str("L "),
            Some(Side::Right) => label.push_str("R "),
            None => {}
        }
    }
    label.push_str(&node.id.to_string());
    if opts.mark_fork && node.is_fork() {
        label.push('*');
    }
    if let Some(value) = opts.label.as_ref().and_then(|key| node.data.fields.get(key)) {
        match value {
            Value::String(s) => label.push_str(&format!(" ({})", s)),
            other => label.push_str(&format!(" ({})", other)),
        }
    }
    label
}
