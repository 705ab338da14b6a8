use serde_json::Value;

use crate::config::SyncConfig;
use crate::model::{OutputRecord, Row};
use crate::normalize::clean;

/// Rows to create: key plus the source's cleaned compare-field values.
pub fn build_create(key: &str, source: &Row, config: &SyncConfig) -> OutputRecord {
    mirror_record(key, source, config)
}

/// Rows to update: the source is authoritative, so every compare field
/// mirrors the source's cleaned value — including fields that did not
/// individually change. The target's technical id is attached so the
/// caller can address the existing row.
pub fn build_update(key: &str, source: &Row, target: &Row, config: &SyncConfig) -> OutputRecord {
    let mut record = mirror_record(key, source, config);
    attach_technical_id(&mut record, target, config);
    record
}

/// Rows to delete: key plus the target's own cleaned values (for caller
/// verification) and its technical id.
pub fn build_delete(key: &str, target: &Row, config: &SyncConfig) -> OutputRecord {
    let mut record = mirror_record(key, target, config);
    attach_technical_id(&mut record, target, config);
    record
}

/// Key first, then compare fields in declared order. Absent values render
/// as explicit empty strings, never omitted fields.
fn mirror_record(key: &str, row: &Row, config: &SyncConfig) -> OutputRecord {
    let mut record = OutputRecord::new();
    record.insert(config.key_field.clone(), Value::String(key.to_string()));
    for field in &config.compare_fields {
        let value = clean(row.get(field)).unwrap_or_default();
        record.insert(field.clone(), Value::String(value));
    }
    record
}

/// The technical id is the one field omitted entirely when absent: an
/// empty handle is not addressable.
fn attach_technical_id(record: &mut OutputRecord, target: &Row, config: &SyncConfig) {
    if let Some(ref tech) = config.technical_id {
        if let Some(value) = clean(target.get(tech)) {
            record.insert(tech.clone(), Value::String(value));
        }
    }
}
