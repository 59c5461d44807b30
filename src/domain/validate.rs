//! Structural checks on a flat record list, run before anything is loaded.

use std::collections::{HashMap, HashSet, VecDeque};

use itertools::Itertools;
use tracing::{debug, instrument};

use crate::domain::entities::{FlatRecord, NodeId, Side};
use crate::domain::error::ValidationError;

/// Checks `records` against the tree rules, stopping at the first violation.
///
/// Rules, in order:
/// 1. the list is not empty
/// 2. every record carries an id
/// 3. ids are unique
/// 4. exactly one record has no parent (the root)
/// 5. every parent reference resolves to a record
/// 6. only fork nodes receive a right-side child
/// 7. no slot is claimed twice
/// 8. every record is reachable from the root
///
/// Read-only; record order is irrelevant.
#[instrument(level = "debug", skip(records), fields(count = records.len()))]
pub fn validate(records: &[FlatRecord]) -> Result<(), ValidationError> {
    if records.is_empty() {
        return Err(ValidationError::Empty);
    }

    let mut ids: Vec<&NodeId> = Vec::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        match &record.id {
            Some(id) => ids.push(id),
            None => return Err(ValidationError::MissingId { index }),
        }
    }

    if let Some(dup) = ids.iter().copied().duplicates().next() {
        return Err(ValidationError::DuplicateId(dup.clone()));
    }

    let roots: Vec<&NodeId> = records
        .iter()
        .filter(|r| r.parent.is_none())
        .filter_map(|r| r.id.as_ref())
        .collect();
    let root = match roots.as_slice() {
        [] => return Err(ValidationError::NoRoot),
        [root] => *root,
        [first, second, ..] => {
            return Err(ValidationError::MultipleRoots(
                (*first).clone(),
                (*second).clone(),
            ))
        }
    };

    // (id, parent, side) for every non-root record
    let links: Vec<(&NodeId, &NodeId, Side)> = records
        .iter()
        .filter_map(|r| Some((r.id.as_ref()?, r.parent.as_ref()?, r.side())))
        .collect();

    let by_id: HashMap<&NodeId, &FlatRecord> = records
        .iter()
        .filter_map(|r| r.id.as_ref().map(|id| (id, r)))
        .collect();

    for (id, parent, _) in &links {
        if !by_id.contains_key(parent) {
            return Err(ValidationError::DanglingParent {
                id: (*id).clone(),
                parent: (*parent).clone(),
            });
        }
    }

    for (id, parent, side) in &links {
        let parent_is_fork = by_id.get(parent).is_some_and(|p| p.data.is_fork());
        if *side == Side::Right && !parent_is_fork {
            return Err(ValidationError::IllegalRightChild {
                parent: (*parent).clone(),
                id: (*id).clone(),
            });
        }
    }

    let mut slots: HashMap<(&NodeId, Side), &NodeId> = HashMap::new();
    for (id, parent, side) in &links {
        if let Some(first) = slots.insert((*parent, *side), *id) {
            return Err(ValidationError::SlotTaken {
                parent: (*parent).clone(),
                side: *side,
                first: first.clone(),
                second: (*id).clone(),
            });
        }
    }

    let mut children: HashMap<&NodeId, Vec<&NodeId>> = HashMap::new();
    for ((parent, _), id) in &slots {
        children.entry(*parent).or_default().push(*id);
    }
    let mut seen: HashSet<&NodeId> = HashSet::from([root]);
    let mut queue = VecDeque::from([root]);
    while let Some(current) = queue.pop_front() {
        for child in children.get(current).into_iter().flatten() {
            if seen.insert(*child) {
                queue.push_back(*child);
            }
        }
    }
    if let Some(stray) = ids.iter().find(|id| !seen.contains(**id)) {
        return Err(ValidationError::Unreachable((*stray).clone()));
    }

    debug!(root = %root, "records valid");
    Ok(())
}
