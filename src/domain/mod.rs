//! Domain layer: flat-record binary trees and their structural edits
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod codec;
pub mod edit;
pub mod entities;
pub mod error;
pub mod moves;
pub mod tree;
pub mod validate;

pub use entities::*;
pub use error::{TreeError, TreeResult, ValidationError};
pub use tree::{PostOrderIterator, Tree, TreeIterator};
pub use validate::validate;
