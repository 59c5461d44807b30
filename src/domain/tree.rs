use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use tracing::instrument;

use crate::domain::entities::{Node, NodeId, Side};
use crate::domain::error::{TreeError, TreeResult, ValidationError};
use crate::domain::validate::validate;

/// Binary tree held as a flat, id-keyed adjacency map.
///
/// Values are immutable from the outside: every edit returns a new `Tree` and
/// leaves the receiver untouched. `Clone` produces a fully independent copy.
/// Serializes as the adjacency map keyed by id.
#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    /// Node storage, one entry per id
    nodes: BTreeMap<NodeId, Node>,
    /// Id of the only node without a parent
    root: NodeId,
}

impl Serialize for Tree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.nodes.serialize(serializer)
    }
}

impl Tree {
    pub(crate) fn from_parts(nodes: BTreeMap<NodeId, Node>, root: NodeId) -> Self {
        Self { nodes, root }
    }

    pub fn root(&self) -> &NodeId {
        &self.root
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Present children of `id`, left slot first. Empty for unknown ids.
    pub fn children(&self, id: &NodeId) -> Vec<&NodeId> {
        self.get(id).map(Node::children).unwrap_or_default()
    }

    /// Parent id and slot occupied by `id`; `None` for the root or unknown ids.
    pub fn position(&self, id: &NodeId) -> Option<(&NodeId, Side)> {
        let parent = self.get(id)?.parent.as_ref()?;
        let side = self.get(parent)?.side_of(id)?;
        Some((parent, side))
    }

    /// Pre-order walk from the root, left before right.
    #[instrument(level = "trace", skip(self))]
    pub fn iter(&self) -> TreeIterator {
        TreeIterator::new(self, &self.root)
    }

    /// Post-order walk of the subtree rooted at `id`: children before self.
    #[instrument(level = "trace", skip(self))]
    pub fn iter_postorder(&self, id: &NodeId) -> PostOrderIterator {
        PostOrderIterator::new(self, id)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        self.calculate_depth(&self.root)
    }

    fn calculate_depth(&self, id: &NodeId) -> usize {
        if let Some(node) = self.get(id) {
            1 + node
                .children()
                .into_iter()
                .map(|child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Ids of childless nodes, in pre-order.
    #[instrument(level = "debug", skip(self))]
    pub fn leaves(&self) -> Vec<&NodeId> {
        self.iter()
            .filter(|node| node.left.is_none() && node.right.is_none())
            .map(|node| &node.id)
            .collect()
    }

    /// True when `candidate` is a strict ancestor of `id`.
    ///
    /// Walks parent references upward; O(depth).
    #[instrument(level = "trace", skip(self))]
    pub fn has_as_parent(&self, id: &NodeId, candidate: &NodeId) -> bool {
        let mut current = self.get(id).and_then(|node| node.parent.as_ref());
        while let Some(parent) = current {
            if parent == candidate {
                return true;
            }
            current = self.get(parent).and_then(|node| node.parent.as_ref());
        }
        false
    }

    /// Verifies the adjacency invariants: links agree in both directions and
    /// the packed form passes the record validator.
    #[instrument(level = "debug", skip(self))]
    pub fn check_invariants(&self) -> Result<(), ValidationError> {
        for node in self.nodes.values() {
            for child in node.children() {
                let linked_back = self
                    .get(child)
                    .is_some_and(|c| c.parent.as_ref() == Some(&node.id));
                if !linked_back {
                    return Err(ValidationError::BrokenLink {
                        parent: node.id.clone(),
                        id: child.clone(),
                    });
                }
            }
            if let Some(parent) = &node.parent {
                if self.get(parent).and_then(|p| p.side_of(&node.id)).is_none() {
                    return Err(ValidationError::BrokenLink {
                        parent: parent.clone(),
                        id: node.id.clone(),
                    });
                }
            }
        }
        if self.get(&self.root).map_or(true, |root| !root.is_root()) {
            return Err(ValidationError::NoRoot);
        }
        validate(&self.pack())
    }

    // Working-copy helpers. Only called on a fresh clone inside an edit.

    pub(crate) fn node_mut(&mut self, id: &NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id)
    }

    pub(crate) fn insert_node(&mut self, node: Node) {
        self.nodes.insert(node.id.clone(), node);
    }

    /// Drops a single entry; its children are left to the caller.
    pub(crate) fn remove_entry(&mut self, id: &NodeId) -> Option<Node> {
        self.nodes.remove(id)
    }

    pub(crate) fn set_slot(&mut self, parent: &NodeId, side: Side, child: Option<NodeId>) {
        if let Some(node) = self.nodes.get_mut(parent) {
            *node.slot_mut(side) = child;
        }
    }

    pub(crate) fn set_parent(&mut self, id: &NodeId, parent: Option<NodeId>) {
        if let Some(node) = self.nodes.get_mut(id) {
            node.parent = parent;
        }
    }

    /// Parent and slot of a non-root node, or why there is none.
    pub(crate) fn require_position(
        &self,
        id: &NodeId,
        on_root: impl FnOnce(NodeId) -> TreeError,
    ) -> TreeResult<(NodeId, Side)> {
        let node = self
            .get(id)
            .ok_or_else(|| TreeError::NodeNotFound(id.clone()))?;
        let parent = node.parent.as_ref().ok_or_else(|| on_root(id.clone()))?;
        let side = self
            .get(parent)
            .and_then(|p| p.side_of(id))
            .ok_or_else(|| ValidationError::BrokenLink {
                parent: parent.clone(),
                id: id.clone(),
            })?;
        Ok((parent.clone(), side))
    }

    /// Drops `id` and all its descendants, children before self.
    /// Does not touch the parent's slot.
    pub(crate) fn delete_subtree(&mut self, id: &NodeId) -> usize {
        let doomed: Vec<NodeId> = self.iter_postorder(id).map(|node| node.id.clone()).collect();
        for id in &doomed {
            self.nodes.remove(id);
        }
        doomed.len()
    }
}

pub struct TreeIterator<'a> {
    tree: &'a Tree,
    stack: Vec<&'a NodeId>,
}

impl<'a> TreeIterator<'a> {
    fn new(tree: &'a Tree, start: &'a NodeId) -> Self {
        Self {
            tree,
            stack: vec![start],
        }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current) = self.stack.pop() {
            if let Some(node) = self.tree.get(current) {
                // Push children in reverse order for left-to-right traversal
                for child in node.children().into_iter().rev() {
                    self.stack.push(child);
                }
                return Some(node);
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    tree: &'a Tree,
    stack: Vec<(&'a NodeId, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(tree: &'a Tree, start: &NodeId) -> Self {
        let mut stack = Vec::new();
        if let Some(node) = tree.get(start) {
            stack.push((&node.id, false));
        }
        Self { tree, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current, visited)) = self.stack.pop() {
            if let Some(node) = self.tree.get(current) {
                if !visited {
                    self.stack.push((current, true));
                    for child in node.children().into_iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some(node);
                }
            }
        }
        None
    }
}
