//! Sibling order maintenance
//!
//! `ChildIndex` keeps every parent's children as an ordered id list, and
//! each record's `index` mirrors its position in that list. Structural edits
//! go through `insert_sibling`/`remove_sibling`, which renumber only the
//! siblings after the touched position.

use super::store::Records;
use std::collections::{BTreeMap, HashMap};

/// Ordered child lists, keyed by stored parent reference
#[derive(Debug, Default)]
pub(crate) struct ChildIndex {
    root: Vec<String>,
    nested: HashMap<String, Vec<String>>,
}

impl ChildIndex {
    /// Build from records whose indices are already `0..n` per parent.
    pub fn from_records<T>(records: &Records<T>) -> Self {
        let mut index = Self::default();
        for (parent, siblings) in sibling_groups(records) {
            let ids = siblings.into_iter().map(|(_, id)| id).collect();
            match parent {
                None => index.root = ids,
                Some(parent) => {
                    index.nested.insert(parent, ids);
                }
            }
        }
        index
    }

    pub fn get(&self, parent: Option<&str>) -> &[String] {
        match parent {
            None => &self.root,
            Some(key) => self.nested.get(key).map(Vec::as_slice).unwrap_or_default(),
        }
    }

    pub fn get_mut(&mut self, parent: Option<&str>) -> &mut Vec<String> {
        match parent {
            None => &mut self.root,
            Some(key) => self.nested.entry(key.to_string()).or_default(),
        }
    }

    /// Drop the child list of a removed node.
    pub fn forget(&mut self, parent: &str) {
        self.nested.remove(parent);
    }
}

/// Insertion position for a requested index: append when absent, clamp when past the end.
pub(crate) fn clamp_insert_index(requested: Option<usize>, count: usize) -> usize {
    requested.map_or(count, |index| index.min(count))
}

/// Insert `id` at `at` and shift every later sibling one position on.
pub(crate) fn insert_sibling<T>(
    records: &mut Records<T>,
    siblings: &mut Vec<String>,
    at: usize,
    id: String,
) {
    siblings.insert(at, id);
    renumber_from(records, siblings, at);
}

/// Remove the sibling at `at` and shift every later sibling one position back.
pub(crate) fn remove_sibling<T>(
    records: &mut Records<T>,
    siblings: &mut Vec<String>,
    at: usize,
) -> Option<String> {
    if at >= siblings.len() {
        return None;
    }
    let removed = siblings.remove(at);
    renumber_from(records, siblings, at);
    Some(removed)
}

fn renumber_from<T>(records: &mut Records<T>, siblings: &[String], from: usize) {
    for (offset, id) in siblings[from..].iter().enumerate() {
        if let Some(record) = records.get_mut(id) {
            record.index = from + offset;
        }
    }
}

fn sibling_groups<T>(records: &Records<T>) -> BTreeMap<Option<String>, Vec<(usize, String)>> {
    let mut groups: BTreeMap<Option<String>, Vec<(usize, String)>> = BTreeMap::new();
    for record in records.values() {
        groups
            .entry(record.parent.clone())
            .or_default()
            .push((record.index, record.id.clone()));
    }
    for siblings in groups.values_mut() {
        siblings.sort();
    }
    groups
}

/// First parent whose children do not occupy exactly `0..n`, described for error output.
pub(crate) fn contiguity_violation<T>(records: &Records<T>) -> Option<String> {
    sibling_groups(records)
        .into_iter()
        .find_map(|(parent, siblings)| {
            let contiguous = siblings
                .iter()
                .enumerate()
                .all(|(expected, (index, _))| *index == expected);
            if contiguous {
                return None;
            }
            let indices: Vec<usize> = siblings.iter().map(|(index, _)| *index).collect();
            Some(format!(
                "children of {} have indices {:?}, expected 0..{}",
                parent.as_deref().unwrap_or("<root>"),
                indices,
                siblings.len()
            ))
        })
}

/// Rewrite indices to `0..n` per parent, keeping the existing `(index, id)` order.
///
/// Returns whether any record changed.
pub(crate) fn densify<T>(records: &mut Records<T>) -> bool {
    let mut changed = false;
    for siblings in sibling_groups(records).into_values() {
        for (expected, (_, id)) in siblings.into_iter().enumerate() {
            if let Some(record) = records.get_mut(&id) {
                if record.index != expected {
                    record.index = expected;
                    changed = true;
                }
            }
        }
    }
    changed
}
