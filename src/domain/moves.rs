//! Relocation of single nodes and whole subtrees.

use tracing::{debug, instrument};

use crate::domain::edit::insert_side;
use crate::domain::entities::{Node, NodeId, Side};
use crate::domain::error::{TreeError, TreeResult};
use crate::domain::tree::Tree;

/// Empty slot under `target` for an incoming subtree.
///
/// Same side policy as `insert`, but nothing is ever pushed down: an explicit
/// side must be free, and without one there must be a free slot to pick.
fn subtree_side(target: &Node, requested: Option<Side>) -> TreeResult<Side> {
    let side = insert_side(target, requested)?;
    if target.slot(side).is_some() {
        return Err(match requested {
            Some(side) => TreeError::SlotOccupied {
                id: target.id.clone(),
                side,
            },
            None => TreeError::NoFreeSlot(target.id.clone()),
        });
    }
    Ok(side)
}

impl Tree {
    /// Moves a single node under `target`, leaving its descendants behind.
    ///
    /// The source is spliced out (its only child takes its place), then
    /// inserted under `target` with the usual side policy. Moving a node under
    /// its own parent swaps a fork's children, or changes nothing otherwise.
    #[instrument(level = "debug", skip(self))]
    pub fn move_node(&self, target: &NodeId, source: &NodeId, side: Option<Side>) -> TreeResult<Tree> {
        let target_node = self
            .get(target)
            .ok_or_else(|| TreeError::TargetNotFound(target.clone()))?;
        let source_node = self
            .get(source)
            .ok_or_else(|| TreeError::SourceNotFound(source.clone()))?;
        let (parent, current) = self.require_position(source, TreeError::CannotMoveRoot)?;
        if source_node.left.is_some() && source_node.right.is_some() {
            return Err(TreeError::CannotMoveFork(source.clone()));
        }
        if target == source {
            return Err(TreeError::CyclicMove {
                target: target.clone(),
                node: source.clone(),
            });
        }

        if &parent == target {
            if target_node.is_fork() {
                if side == Some(current) {
                    debug!(%current, "already in place");
                    return Ok(self.clone());
                }
                return self.swap_children(target);
            }
            insert_side(target_node, side)?;
            debug!("single-slot parent, nothing to move");
            return Ok(self.clone());
        }

        let data = source_node.payload();
        self.remove_node(source, None)?
            .insert(target, source.clone(), side, data)
    }

    /// Moves `source` with all of its descendants into a free slot of `target`.
    #[instrument(level = "debug", skip(self))]
    pub fn move_subtree(&self, target: &NodeId, source: &NodeId, side: Option<Side>) -> TreeResult<Tree> {
        if !self.contains(target) {
            return Err(TreeError::TargetNotFound(target.clone()));
        }
        if !self.contains(source) {
            return Err(TreeError::SourceNotFound(source.clone()));
        }
        if target == self.root() {
            return Err(TreeError::TargetIsRoot(target.clone()));
        }
        if target == source || self.has_as_parent(target, source) {
            return Err(TreeError::CyclicMove {
                target: target.clone(),
                node: source.clone(),
            });
        }
        let (parent, current) = self.require_position(source, TreeError::CannotMoveRoot)?;

        let mut next = self.clone();
        next.set_slot(&parent, current, None);
        let side = {
            let target_node = next
                .get(target)
                .ok_or_else(|| TreeError::TargetNotFound(target.clone()))?;
            subtree_side(target_node, side)?
        };
        debug!(from = %parent, %side, "relinking subtree");
        next.set_slot(target, side, Some(source.clone()));
        next.set_parent(source, Some(target.clone()));
        Ok(next)
    }
}
