use std::collections::BTreeMap;

use crate::config::DuplicatePolicy;
use crate::error::SyncError;
use crate::model::{Dataset, Row};
use crate::normalize::clean;

/// Build the key → row index for one dataset.
///
/// Keys are cleaned before indexing. A row is dropped when its cleaned key
/// is absent (missing, blank, sentinel) or the literal `"0"` — upstream
/// extractions emit those for filler rows. Duplicate keys are resolved per
/// `policy`; under `Reject` every duplicated key is reported at once.
pub fn build_index<'a>(
    dataset: &'a Dataset,
    key_field: &str,
    policy: DuplicatePolicy,
) -> Result<BTreeMap<String, &'a Row>, SyncError> {
    let mut index: BTreeMap<String, &Row> = BTreeMap::new();
    let mut dup_counts: BTreeMap<String, usize> = BTreeMap::new();

    for row in &dataset.rows {
        let key = match clean(row.get(key_field)) {
            Some(k) if k != "0" => k,
            _ => continue,
        };

        match policy {
            DuplicatePolicy::LastWins => {
                index.insert(key, row);
            }
            DuplicatePolicy::FirstWins => {
                index.entry(key).or_insert(row);
            }
            DuplicatePolicy::Reject => {
                if index.insert(key.clone(), row).is_some() {
                    *dup_counts.entry(key).or_insert(1) += 1;
                }
            }
        }
    }

    if !dup_counts.is_empty() {
        return Err(SyncError::DuplicateKeys {
            dataset: dataset.name.clone(),
            keys: dup_counts.into_iter().collect(),
        });
    }

    Ok(index)
}
