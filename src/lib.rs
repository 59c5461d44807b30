//! Binary trees stored as flat `{id, parent, left}` records.
//!
//! Records are validated and loaded into an id-keyed adjacency map
//! ([`domain::Tree`]), edited through copy-on-write operations that each return
//! a new tree, and packed back into records.

pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod render;
pub mod util;

pub use domain::{FlatRecord, Node, NodeData, NodeId, Side, Tree, TreeError, TreeResult, ValidationError};
