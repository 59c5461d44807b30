//! Domain entities: node ids, slots, payloads, flat records and adjacency nodes

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Keys owned by the tree structure. They never survive inside a payload.
pub const RESERVED_KEYS: [&str; 4] = ["id", "parent", "left", "right"];

/// Caller-supplied node identity.
///
/// JSON numbers and strings are both accepted on the wire. Ids only need to be
/// unique and orderable; the tree never generates them.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    Int(i64),
    Str(String),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Int(n) => write!(f, "{}", n),
            NodeId::Str(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for NodeId {
    fn from(n: i64) -> Self {
        NodeId::Int(n)
    }
}

impl From<i32> for NodeId {
    fn from(n: i32) -> Self {
        NodeId::Int(i64::from(n))
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId::Str(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId::Str(s)
    }
}

/// Integers win; anything else is kept verbatim as a string id.
impl FromStr for NodeId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(s.parse::<i64>()
            .map(NodeId::Int)
            .unwrap_or_else(|_| NodeId::Str(s.to_string())))
    }
}

/// Structural position of a child under its parent. Not a sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Maps the wire `left` flag onto a slot.
    pub fn from_left(left: bool) -> Self {
        if left {
            Side::Left
        } else {
            Side::Right
        }
    }

    pub fn is_left(self) -> bool {
        self == Side::Left
    }

    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

/// Caller payload carried by a node.
///
/// The `fork` flag travels with the payload, so it survives moves. A node is a
/// fork only when the flag is explicitly `true`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fork: Option<bool>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl NodeData {
    /// Payload of a node allowed to hold two children.
    pub fn fork() -> Self {
        Self {
            fork: Some(true),
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    pub fn is_fork(&self) -> bool {
        self.fork == Some(true)
    }

    /// Drops structural keys a caller may have smuggled into the fields.
    pub(crate) fn strip_reserved(mut self) -> Self {
        for key in RESERVED_KEYS {
            self.fields.remove(key);
        }
        self
    }
}

/// External wire shape: one row of the flat tree table.
///
/// `left` tells which slot of `parent` the record occupies and is `null` for the
/// root. A missing or `null` flag on a non-root record reads as the right slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatRecord {
    #[serde(default)]
    pub id: Option<NodeId>,
    #[serde(default)]
    pub parent: Option<NodeId>,
    #[serde(default)]
    pub left: Option<bool>,
    #[serde(flatten)]
    pub data: NodeData,
}

impl FlatRecord {
    pub fn root(id: impl Into<NodeId>) -> Self {
        Self {
            id: Some(id.into()),
            parent: None,
            left: None,
            data: NodeData::default(),
        }
    }

    pub fn child(id: impl Into<NodeId>, parent: impl Into<NodeId>, side: Side) -> Self {
        Self {
            id: Some(id.into()),
            parent: Some(parent.into()),
            left: Some(side.is_left()),
            data: NodeData::default(),
        }
    }

    pub fn with_data(mut self, data: NodeData) -> Self {
        self.data = data;
        self
    }

    /// Slot this record claims under its parent.
    pub fn side(&self) -> Side {
        Side::from_left(self.left.unwrap_or(false))
    }
}

/// Internal adjacency form of a tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<NodeId>,
    #[serde(flatten)]
    pub data: NodeData,
}

impl Node {
    pub fn is_fork(&self) -> bool {
        self.data.is_fork()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Caller fields only; structural references are not part of it.
    pub fn payload(&self) -> NodeData {
        self.data.clone()
    }

    pub fn slot(&self, side: Side) -> Option<&NodeId> {
        match side {
            Side::Left => self.left.as_ref(),
            Side::Right => self.right.as_ref(),
        }
    }

    pub(crate) fn slot_mut(&mut self, side: Side) -> &mut Option<NodeId> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    /// Present children, left slot first.
    pub fn children(&self) -> Vec<&NodeId> {
        [self.left.as_ref(), self.right.as_ref()]
            .into_iter()
            .flatten()
            .collect()
    }

    /// Slot holding `child`, if it is a child of this node.
    pub fn side_of(&self, child: &NodeId) -> Option<Side> {
        if self.left.as_ref() == Some(child) {
            Some(Side::Left)
        } else if self.right.as_ref() == Some(child) {
            Some(Side::Right)
        } else {
            None
        }
    }

    /// First empty slot, left before right.
    pub fn free_slot(&self) -> Option<Side> {
        [Side::Left, Side::Right]
            .into_iter()
            .find(|side| self.slot(*side).is_none())
    }
}
