//! `regsync-engine` — two-dataset registry reconciliation engine.
//!
//! Computes the minimal create/update/delete set that makes a target
//! dataset mirror an authoritative source, keyed on a shared business key.
//! Pure engine crate: receives pre-loaded records, returns classified
//! results. No network, no process-global state.

pub mod classify;
pub mod config;
pub mod detect;
pub mod engine;
pub mod error;
pub mod index;
pub mod model;
pub mod normalize;
pub mod payload;

pub use config::{DuplicatePolicy, SyncConfig};
pub use engine::{load_csv_dataset, run};
pub use error::SyncError;
pub use model::{Dataset, Row, SyncInput, SyncResult};
