use serde::Serialize;

use crate::model::Row;
use crate::normalize::{clean, fold_for_compare};

/// One tracked field whose folded values differ between source and target.
/// Values carried here are the cleaned forms, for diagnostics only —
/// payloads re-derive their own values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDiff {
    pub field: String,
    pub source: Option<String>,
    pub target: Option<String>,
}

/// Compare every tracked field of an update candidate. No short-circuit:
/// the full list of differing fields is returned, even though callers
/// usually only ask whether it is empty.
pub fn changed_fields(source: &Row, target: &Row, compare_fields: &[String]) -> Vec<FieldDiff> {
    let mut diffs = Vec::new();

    for field in compare_fields {
        let source_raw = source.get(field);
        let target_raw = target.get(field);

        let differs = fold_for_compare(source_raw) != fold_for_compare(target_raw)
            || sentinel_override(source_raw, target_raw);

        if differs {
            diffs.push(FieldDiff {
                field: field.clone(),
                source: clean(source_raw),
                target: clean(target_raw),
            });
        }
    }

    diffs
}

pub fn has_changed(source: &Row, target: &Row, compare_fields: &[String]) -> bool {
    !changed_fields(source, target, compare_fields).is_empty()
}

/// A stray placeholder token on the target ("undefined", "NULL", …) must be
/// actively cleared even though both sides fold to absent. Fires only when
/// the raw source is genuinely empty — a source holding a sentinel token of
/// its own keeps self-reconciliation a no-op.
fn sentinel_override(source_raw: Option<&str>, target_raw: Option<&str>) -> bool {
    let target_is_placeholder = match target_raw {
        Some(t) => !t.trim().is_empty() && clean(Some(t)).is_none(),
        None => false,
    };
    let source_is_blank = match source_raw {
        Some(s) => s.trim().is_empty(),
        None => true,
    };
    target_is_placeholder && source_is_blank
}
