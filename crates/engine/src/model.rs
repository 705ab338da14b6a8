use std::collections::HashMap;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single row from either dataset. Values are raw strings as extracted;
/// a column absent from the map reads as absent.
#[derive(Debug, Clone, Default)]
pub struct Row {
    pub values: HashMap<String, String>,
}

impl Row {
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }
}

/// An ordered sequence of rows sharing one declared column schema.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Dataset {
    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }
}

/// The two datasets of one reconciliation call. `source` is authoritative;
/// `target` is the store to be mirrored onto it.
pub struct SyncInput {
    pub source: Dataset,
    pub target: Dataset,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// One output record. Field order follows the declared compare-field order
/// (serde_json `preserve_order` keeps map insertion order).
pub type OutputRecord = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Serialize)]
pub struct SyncCounts {
    pub create: usize,
    pub update: usize,
    pub delete: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncMeta {
    pub config_name: String,
    pub key_field: String,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncResult {
    pub meta: SyncMeta,
    pub counts: SyncCounts,
    pub to_create: Vec<OutputRecord>,
    pub to_update: Vec<OutputRecord>,
    pub to_delete: Vec<OutputRecord>,
}
