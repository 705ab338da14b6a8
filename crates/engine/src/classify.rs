use std::collections::BTreeMap;

use crate::model::Row;

/// The three disjoint key partitions of one reconciliation call.
/// All three are sorted ascending on the key's string form, so downstream
/// output ordering is reproducible regardless of input row order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPartition {
    /// Keys present only in the source: rows to create on the target.
    pub create: Vec<String>,
    /// Keys present only in the target: rows to delete from the target.
    pub delete: Vec<String>,
    /// Keys present in both: candidates for the change detector.
    pub update_candidates: Vec<String>,
}

/// Partition the two index key sets by set difference and intersection.
pub fn classify(
    source: &BTreeMap<String, &Row>,
    target: &BTreeMap<String, &Row>,
) -> KeyPartition {
    let mut create = Vec::new();
    let mut update_candidates = Vec::new();

    // BTreeMap iteration is already ascending lexicographic.
    for key in source.keys() {
        if target.contains_key(key) {
            update_candidates.push(key.clone());
        } else {
            create.push(key.clone());
        }
    }

    let delete = target
        .keys()
        .filter(|k| !source.contains_key(*k))
        .cloned()
        .collect();

    KeyPartition {
        create,
        delete,
        update_candidates,
    }
}
