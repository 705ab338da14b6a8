use std::fmt;

#[derive(Debug)]
pub enum SyncError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty key field, empty compare list, etc.).
    ConfigValidation(String),
    /// A declared field is absent from a dataset's schema.
    MissingColumn { dataset: String, column: String },
    /// Duplicate business keys found under the `reject` policy.
    DuplicateKeys { dataset: String, keys: Vec<(String, usize)> },
    /// IO / CSV read error.
    Io(String),
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { dataset, column } => {
                write!(f, "dataset '{dataset}': missing column '{column}'")
            }
            Self::DuplicateKeys { dataset, keys } => {
                writeln!(f, "dataset '{dataset}': duplicate keys found:")?;
                for (key, count) in keys {
                    writeln!(f, "  key {key:?} appears {count} times")?;
                }
                Ok(())
            }
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for SyncError {}
