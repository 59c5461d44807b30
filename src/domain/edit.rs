//! Insert, remove and swap edits.
//!
//! Each edit checks its preconditions against `self`, then applies the change
//! to a clone and returns it. A failing call never produces a partial result.

use tracing::{debug, instrument};

use crate::domain::entities::{Node, NodeData, NodeId, Side};
use crate::domain::error::{TreeError, TreeResult};
use crate::domain::tree::Tree;

/// Slot a new child lands in under `parent`.
///
/// Forks take the requested side, or the first free one when none is given.
/// Non-forks only have a left slot; asking for the right one is an error.
pub(crate) fn insert_side(parent: &Node, requested: Option<Side>) -> TreeResult<Side> {
    if parent.is_fork() {
        match requested {
            Some(side) => Ok(side),
            None => parent
                .free_slot()
                .ok_or_else(|| TreeError::NoFreeSlot(parent.id.clone())),
        }
    } else {
        match requested {
            Some(Side::Right) => Err(TreeError::SideNotAllowed(parent.id.clone())),
            _ => Ok(Side::Left),
        }
    }
}

/// Child kept by `remove_node` when the caller does not say.
///
/// Left, except for a fork whose only child sits on the right.
fn default_keep(node: &Node) -> Side {
    if node.is_fork() && node.right.is_some() && node.left.is_none() {
        Side::Right
    } else {
        Side::Left
    }
}

impl Tree {
    /// Adds `id` as a child of `parent`.
    ///
    /// A child already sitting in the chosen slot is pushed one level down and
    /// becomes the left child of the new node.
    #[instrument(level = "debug", skip(self, data))]
    pub fn insert(
        &self,
        parent: &NodeId,
        id: NodeId,
        side: Option<Side>,
        data: NodeData,
    ) -> TreeResult<Tree> {
        let parent_node = self
            .get(parent)
            .ok_or_else(|| TreeError::ParentNotFound(parent.clone()))?;
        if self.contains(&id) {
            return Err(TreeError::NodeExists(id));
        }
        let side = insert_side(parent_node, side)?;
        let displaced = parent_node.slot(side).cloned();
        debug!(%side, ?displaced, "placing node");

        let mut next = self.clone();
        if let Some(child) = &displaced {
            next.set_parent(child, Some(id.clone()));
        }
        next.set_slot(parent, side, Some(id.clone()));
        next.insert_node(Node {
            id,
            parent: Some(parent.clone()),
            left: displaced,
            right: None,
            data: data.strip_reserved(),
        });
        Ok(next)
    }

    pub fn insert_left(&self, parent: &NodeId, id: NodeId, data: NodeData) -> TreeResult<Tree> {
        self.insert(parent, id, Some(Side::Left), data)
    }

    pub fn insert_right(&self, parent: &NodeId, id: NodeId, data: NodeData) -> TreeResult<Tree> {
        self.insert(parent, id, Some(Side::Right), data)
    }

    /// Removes a single node, splicing one of its children into its place.
    ///
    /// The kept child takes over the slot the node occupied under its parent;
    /// the other child's subtree is deleted. Without an explicit `keep` the
    /// left child survives, unless the node is a fork whose only child is on
    /// the right.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_node(&self, id: &NodeId, keep: Option<Side>) -> TreeResult<Tree> {
        let node = self
            .get(id)
            .ok_or_else(|| TreeError::NodeNotFound(id.clone()))?;
        let (parent, side) = self.require_position(id, TreeError::CannotRemoveRoot)?;
        let keep = keep.unwrap_or_else(|| default_keep(node));
        let kept = node.slot(keep).cloned();
        let dropped = node.slot(keep.opposite()).cloned();

        let mut next = self.clone();
        if let Some(dropped) = &dropped {
            let count = next.delete_subtree(dropped);
            debug!(%dropped, count, "discarded subtree");
        }
        next.remove_entry(id);
        if let Some(kept) = &kept {
            next.set_parent(kept, Some(parent.clone()));
        }
        next.set_slot(&parent, side, kept);
        Ok(next)
    }

    /// Removes a node together with both of its subtrees.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_subtree(&self, id: &NodeId) -> TreeResult<Tree> {
        if !self.contains(id) {
            return Err(TreeError::NodeNotFound(id.clone()));
        }
        let (parent, side) = self.require_position(id, TreeError::CannotRemoveRoot)?;

        let mut next = self.clone();
        next.set_slot(&parent, side, None);
        let count = next.delete_subtree(id);
        debug!(count, "pruned subtree");
        Ok(next)
    }

    /// Exchanges the left and right children of a fork.
    #[instrument(level = "debug", skip(self))]
    pub fn swap_children(&self, id: &NodeId) -> TreeResult<Tree> {
        let node = self
            .get(id)
            .ok_or_else(|| TreeError::NodeNotFound(id.clone()))?;
        if !node.is_fork() || node.children().is_empty() {
            return Err(TreeError::NotAFork(id.clone()));
        }

        let mut next = self.clone();
        if let Some(node) = next.node_mut(id) {
            std::mem::swap(&mut node.left, &mut node.right);
        }
        Ok(next)
    }
}
