use serde::Deserialize;

use crate::error::SyncError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    pub name: String,
    /// Business-key column shared by both datasets.
    #[serde(default = "default_key_field")]
    pub key_field: String,
    /// Ordered list of columns whose values decide record equality.
    pub compare_fields: Vec<String>,
    /// Target-side row handle, propagated on update/delete, never compared.
    #[serde(default)]
    pub technical_id: Option<String>,
    #[serde(default)]
    pub on_duplicate: DuplicatePolicy,
    #[serde(default)]
    pub source: Option<FileConfig>,
    #[serde(default)]
    pub target: Option<FileConfig>,
}

fn default_key_field() -> String {
    "IdRegistre".into()
}

/// Where the CLI host finds a dataset. The engine itself never reads files.
#[derive(Debug, Clone, Deserialize)]
pub struct FileConfig {
    pub file: String,
}

/// What to do when one dataset carries the same business key twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep the row encountered last (legacy extraction behavior).
    LastWins,
    /// Keep the row encountered first.
    FirstWins,
    /// Fail the call, reporting every duplicated key.
    Reject,
}

impl Default for DuplicatePolicy {
    fn default() -> Self {
        Self::LastWins
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl SyncConfig {
    pub fn from_toml(input: &str) -> Result<Self, SyncError> {
        let config: SyncConfig =
            toml::from_str(input).map_err(|e| SyncError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SyncError> {
        if self.key_field.trim().is_empty() {
            return Err(SyncError::ConfigValidation(
                "key_field must not be empty".into(),
            ));
        }

        if self.compare_fields.is_empty() {
            return Err(SyncError::ConfigValidation(
                "at least one compare field is required".into(),
            ));
        }

        for (i, field) in self.compare_fields.iter().enumerate() {
            if field.trim().is_empty() {
                return Err(SyncError::ConfigValidation(format!(
                    "compare field #{} is empty",
                    i + 1
                )));
            }
            if field == &self.key_field {
                return Err(SyncError::ConfigValidation(format!(
                    "key field '{field}' must not be listed in compare_fields"
                )));
            }
            if self.compare_fields[..i].contains(field) {
                return Err(SyncError::ConfigValidation(format!(
                    "compare field '{field}' listed twice"
                )));
            }
        }

        if let Some(ref tech) = self.technical_id {
            if tech.trim().is_empty() {
                return Err(SyncError::ConfigValidation(
                    "technical_id must not be empty when set".into(),
                ));
            }
            if self.compare_fields.contains(tech) {
                return Err(SyncError::ConfigValidation(format!(
                    "technical_id '{tech}' must not be a compare field"
                )));
            }
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
