//! CLI exit code registry — part of the shell contract, scripts rely on
//! these staying stable.

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

// 2 is the usage-error code, emitted by clap itself on bad arguments.

/// Config file rejected (parse or validation).
pub const EXIT_INVALID_CONFIG: u8 = 3;

/// A dataset is missing a declared column.
pub const EXIT_SCHEMA: u8 = 4;

/// Duplicate business keys under the `reject` policy.
pub const EXIT_DUPLICATE: u8 = 5;

/// Runtime failure (file read, CSV parse, output write).
pub const EXIT_RUNTIME: u8 = 6;
