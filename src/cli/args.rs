//! CLI argument definitions using clap

use std::convert::Infallible;
use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::domain::{NodeId, Side};

/// Edit binary trees stored as flat {id, parent, left} JSON records
#[derive(Parser, Debug)]
#[command(name = "flattree")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Debug level: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub debug: u8,

    /// Directory holding the local .flattree.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Ids typed on the command line: integers first, anything else as a string.
///
/// Explicit so clap does not pick `From<String>`, which would always yield a
/// string id.
fn parse_node_id(raw: &str) -> Result<NodeId, Infallible> {
    raw.parse()
}

/// Requested slot; neither flag means automatic placement.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct SideArgs {
    /// Use the left slot
    #[arg(long, conflicts_with = "right")]
    pub left: bool,
    /// Use the right slot (fork nodes only)
    #[arg(long)]
    pub right: bool,
}

impl SideArgs {
    pub fn side(&self) -> Option<Side> {
        match (self.left, self.right) {
            (true, _) => Some(Side::Left),
            (_, true) => Some(Side::Right),
            _ => None,
        }
    }
}

/// Where edited records go.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct WriteArgs {
    /// Print the resulting records instead of writing the file
    #[arg(short = 'n', long)]
    pub dry_run: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check records against the tree rules
    Validate {
        /// JSON file with flat records
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Print the tree
    Show {
        /// JSON file with flat records
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Show size, root, depth and leaves
    Info {
        /// JSON file with flat records
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// Insert a new node under a parent
    Insert {
        /// JSON file with flat records
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Parent id
        #[arg(value_parser = parse_node_id)]
        parent: NodeId,
        /// New node id
        #[arg(value_parser = parse_node_id)]
        id: NodeId,
        #[command(flatten)]
        side: SideArgs,
        /// Allow the new node to hold two children
        #[arg(long)]
        fork: bool,
        /// Payload as a JSON object
        #[arg(long)]
        data: Option<String>,
        #[command(flatten)]
        write: WriteArgs,
    },

    /// Remove a node, keeping one child in its place
    Remove {
        /// JSON file with flat records
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Node id
        #[arg(value_parser = parse_node_id)]
        id: NodeId,
        /// Keep the left child
        #[arg(long, conflicts_with = "keep_right")]
        keep_left: bool,
        /// Keep the right child
        #[arg(long)]
        keep_right: bool,
        #[command(flatten)]
        write: WriteArgs,
    },

    /// Remove a node and everything below it
    Prune {
        /// JSON file with flat records
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Node id
        #[arg(value_parser = parse_node_id)]
        id: NodeId,
        #[command(flatten)]
        write: WriteArgs,
    },

    /// Swap the children of a fork node
    Swap {
        /// JSON file with flat records
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Fork node id
        #[arg(value_parser = parse_node_id)]
        id: NodeId,
        #[command(flatten)]
        write: WriteArgs,
    },

    /// Move a single node under a new parent
    MoveNode {
        /// JSON file with flat records
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// New parent id
        #[arg(value_parser = parse_node_id)]
        target: NodeId,
        /// Node to move
        #[arg(value_parser = parse_node_id)]
        source: NodeId,
        #[command(flatten)]
        side: SideArgs,
        #[command(flatten)]
        write: WriteArgs,
    },

    /// Move a node with all its descendants under a new parent
    MoveSubtree {
        /// JSON file with flat records
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// New parent id
        #[arg(value_parser = parse_node_id)]
        target: NodeId,
        /// Subtree root to move
        #[arg(value_parser = parse_node_id)]
        source: NodeId,
        #[command(flatten)]
        side: SideArgs,
        #[command(flatten)]
        write: WriteArgs,
    },

    /// Show effective settings
    Config,

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}
