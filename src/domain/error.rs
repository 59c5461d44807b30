//! Domain-level errors (no external dependencies)

use thiserror::Error;

use crate::domain::entities::{NodeId, Side};

/// Structural rule violated by a flat record list.
///
/// Rules are checked in declaration order; the first failure wins.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no records")]
    Empty,

    #[error("record #{index} has no id")]
    MissingId { index: usize },

    #[error("duplicate id: {0}")]
    DuplicateId(NodeId),

    #[error("no root: exactly one record must have no parent")]
    NoRoot,

    #[error("multiple roots: {0} and {1} both have no parent")]
    MultipleRoots(NodeId, NodeId),

    #[error("node {id} references unknown parent {parent}")]
    DanglingParent { id: NodeId, parent: NodeId },

    #[error("node {parent} is not a fork but has right child {id}")]
    IllegalRightChild { parent: NodeId, id: NodeId },

    #[error("{side} slot of node {parent} claimed by both {first} and {second}")]
    SlotTaken {
        parent: NodeId,
        side: Side,
        first: NodeId,
        second: NodeId,
    },

    #[error("node {0} is not reachable from the root")]
    Unreachable(NodeId),

    #[error("broken link between parent {parent} and child {id}")]
    BrokenLink { parent: NodeId, id: NodeId },
}

/// Precondition violated by a tree operation.
///
/// Every check runs before the working copy is touched, so a failed call
/// leaves nothing behind.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    #[error("invalid tree: {0}")]
    Invalid(#[from] ValidationError),

    #[error("parent not found: {0}")]
    ParentNotFound(NodeId),

    #[error("target not found: {0}")]
    TargetNotFound(NodeId),

    #[error("source not found: {0}")]
    SourceNotFound(NodeId),

    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("node already exists: {0}")]
    NodeExists(NodeId),

    #[error("cannot remove root node {0}")]
    CannotRemoveRoot(NodeId),

    #[error("cannot move root node {0}")]
    CannotMoveRoot(NodeId),

    #[error("node {0} is not a fork: children attach on the left only")]
    SideNotAllowed(NodeId),

    #[error("node {0} has no free slot")]
    NoFreeSlot(NodeId),

    #[error("{side} slot of node {id} is occupied")]
    SlotOccupied { id: NodeId, side: Side },

    #[error("node {0} is not a fork with children")]
    NotAFork(NodeId),

    #[error("node {0} has two children, move it as a subtree")]
    CannotMoveFork(NodeId),

    #[error("cannot move {node} under itself or its descendant {target}")]
    CyclicMove { target: NodeId, node: NodeId },

    #[error("cannot move a subtree onto root node {0}")]
    TargetIsRoot(NodeId),
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
