//! Conversion between flat records and the adjacency map.

use std::collections::BTreeMap;

use tracing::{debug, instrument};

use crate::domain::entities::{FlatRecord, Node};
use crate::domain::error::{TreeResult, ValidationError};
use crate::domain::tree::Tree;
use crate::domain::validate::validate;

impl Tree {
    /// Builds the adjacency map from flat records.
    ///
    /// Fails with the validator's error when the records are not a well-formed
    /// tree. The per-record `left` flag is consumed here: it becomes the
    /// parent's `left` or `right` reference and is not stored on the node.
    #[instrument(level = "debug", skip(records), fields(count = records.len()))]
    pub fn load(records: &[FlatRecord]) -> TreeResult<Self> {
        validate(records)?;

        let mut nodes = BTreeMap::new();
        let mut root = None;
        for record in records {
            let Some(id) = record.id.clone() else {
                continue;
            };
            if record.parent.is_none() {
                root = Some(id.clone());
            }
            nodes.insert(
                id.clone(),
                Node {
                    id,
                    parent: record.parent.clone(),
                    left: None,
                    right: None,
                    data: record.data.clone().strip_reserved(),
                },
            );
        }

        for record in records {
            if let (Some(id), Some(parent)) = (&record.id, &record.parent) {
                if let Some(parent) = nodes.get_mut(parent) {
                    *parent.slot_mut(record.side()) = Some(id.clone());
                }
            }
        }

        let root = root.ok_or(ValidationError::NoRoot)?;
        debug!(root = %root, nodes = nodes.len(), "tree loaded");
        Ok(Tree::from_parts(nodes, root))
    }

    /// Flattens the tree back into records, one per node in id order.
    ///
    /// `left` is derived from the parent's slots and is `None` for the root;
    /// the `right` reference is not emitted.
    #[instrument(level = "debug", skip(self))]
    pub fn pack(&self) -> Vec<FlatRecord> {
        self.nodes()
            .map(|node| FlatRecord {
                id: Some(node.id.clone()),
                parent: node.parent.clone(),
                left: node
                    .parent
                    .as_ref()
                    .and_then(|parent| self.get(parent))
                    .map(|parent| parent.left.as_ref() == Some(&node.id)),
                data: node.payload(),
            })
            .collect()
    }
}
