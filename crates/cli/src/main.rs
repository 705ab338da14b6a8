//! `regsync` — config-driven two-dataset reconciliation.
//!
//! Thin host around `regsync-engine`: reads the TOML config, loads the two
//! CSV files it names, runs the engine, renders JSON and a human summary.
//! Fetching the CSVs from wherever they live upstream is someone else's job.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use regsync_engine::{load_csv_dataset, SyncConfig, SyncError, SyncInput, SyncResult};

mod exit_codes;
use exit_codes::{
    EXIT_DUPLICATE, EXIT_INVALID_CONFIG, EXIT_RUNTIME, EXIT_SCHEMA, EXIT_SUCCESS,
};

#[derive(Parser)]
#[command(name = "regsync", about = "Reconcile a target dataset against an authoritative registry", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run reconciliation from a TOML config file
    #[command(after_help = "\
Examples:
  regsync run registre.sync.toml
  regsync run registre.sync.toml --json
  regsync run registre.sync.toml --output result.json")]
    Run {
        /// Path to the .sync.toml config file
        config: PathBuf,

        /// Output JSON to stdout instead of human summary only
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Validate a config without loading data or running
    Validate {
        /// Path to the .sync.toml config file
        config: PathBuf,
    },
}

#[derive(Debug)]
struct CliError {
    code: u8,
    message: String,
    hint: Option<String>,
}

impl CliError {
    fn runtime(msg: impl Into<String>) -> Self {
        Self { code: EXIT_RUNTIME, message: msg.into(), hint: None }
    }

    fn engine(err: SyncError) -> Self {
        let code = match err {
            SyncError::ConfigParse(_) | SyncError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
            SyncError::MissingColumn { .. } => EXIT_SCHEMA,
            SyncError::DuplicateKeys { .. } => EXIT_DUPLICATE,
            SyncError::Io(_) => EXIT_RUNTIME,
        };
        Self { code, message: err.to_string(), hint: None }
    }

    fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { config, json, output } => cmd_run(config, json, output),
        Commands::Validate { config } => cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(e) => {
            eprintln!("error: {}", e.message);
            if let Some(hint) = e.hint {
                eprintln!("hint: {hint}");
            }
            ExitCode::from(e.code)
        }
    }
}

fn load_config(config_path: &Path) -> Result<SyncConfig, CliError> {
    let config_str = std::fs::read_to_string(config_path)
        .map_err(|e| CliError::runtime(format!("cannot read config: {e}")))?;
    SyncConfig::from_toml(&config_str).map_err(CliError::engine)
}

fn cmd_run(
    config_path: PathBuf,
    json_output: bool,
    output_file: Option<PathBuf>,
) -> Result<(), CliError> {
    let config = load_config(&config_path)?;

    // Resolve data files relative to the config file's directory.
    let base_dir = config_path
        .parent()
        .unwrap_or_else(|| Path::new("."));

    let source = load_dataset(&config, base_dir, DatasetRole::Source)?;
    let target = load_dataset(&config, base_dir, DatasetRole::Target)?;

    let result = regsync_engine::run(&config, &SyncInput { source, target })
        .map_err(CliError::engine)?;

    let json_str = serde_json::to_string_pretty(&result)
        .map_err(|e| CliError::runtime(format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = output_file {
        std::fs::write(path, &json_str)
            .map_err(|e| CliError::runtime(format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if json_output {
        println!("{json_str}");
    }

    eprintln!("{}", summary_line(&result));
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DatasetRole {
    Source,
    Target,
}

impl DatasetRole {
    fn as_str(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Target => "target",
        }
    }
}

fn load_dataset(
    config: &SyncConfig,
    base_dir: &Path,
    role: DatasetRole,
) -> Result<regsync_engine::Dataset, CliError> {
    let file = match role {
        DatasetRole::Source => config.source.as_ref().map(|f| f.file.clone()),
        DatasetRole::Target => config.target.as_ref().map(|f| f.file.clone()),
    }
    .ok_or_else(|| {
        let name = role.as_str();
        CliError {
            code: EXIT_INVALID_CONFIG,
            message: format!("config has no [{name}] file entry"),
            hint: Some(format!("add `[{name}]\\nfile = \"…\"` to the config")),
        }
    })?;

    let csv_path = base_dir.join(&file);
    let csv_data = std::fs::read_to_string(&csv_path).map_err(|e| {
        CliError::runtime(format!("cannot read {}: {e}", csv_path.display()))
    })?;
    load_csv_dataset(role.as_str(), &csv_data).map_err(CliError::engine)
}

fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(&config_path).map_err(|e| {
        e.with_hint("see `regsync run --help` for the expected config shape")
    })?;
    eprintln!(
        "config '{}' OK: key '{}', {} compare field(s)",
        config.name,
        config.key_field,
        config.compare_fields.len()
    );
    Ok(())
}

fn summary_line(result: &SyncResult) -> String {
    format!(
        "{}: {} to create, {} to update, {} to delete",
        result.meta.config_name,
        result.counts.create,
        result.counts.update,
        result.counts.delete
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn run_end_to_end_with_files() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "gel.csv",
            "IdRegistre,Nom,Prenom\n5,Durand,Anne\n",
        );
        write_file(dir.path(), "tt.csv", "IdRegistre,Nom,Prenom\n9,Vieux,Luc\n");
        let config_path = write_file(
            dir.path(),
            "registre.sync.toml",
            r#"
name = "GEL vs TT"
compare_fields = ["Nom", "Prenom"]

[source]
file = "gel.csv"

[target]
file = "tt.csv"
"#,
        );

        let out = dir.path().join("result.json");
        cmd_run(config_path, false, Some(out.clone())).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(json["counts"]["create"], 1);
        assert_eq!(json["counts"]["delete"], 1);
        assert_eq!(json["to_create"][0]["IdRegistre"], "5");
    }

    #[test]
    fn missing_file_entry_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = write_file(
            dir.path(),
            "bad.sync.toml",
            r#"
name = "No files"
compare_fields = ["Nom"]
"#,
        );
        let err = cmd_run(config_path, false, None).unwrap_err();
        assert_eq!(err.code, EXIT_INVALID_CONFIG);
        assert!(err.message.contains("[source]"));
    }

    #[test]
    fn validate_rejects_bad_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = write_file(
            dir.path(),
            "bad.sync.toml",
            r#"
name = "Empty"
compare_fields = []
"#,
        );
        let err = cmd_validate(config_path).unwrap_err();
        assert_eq!(err.code, EXIT_INVALID_CONFIG);
        assert!(err.hint.is_some());
    }

    #[test]
    fn summary_line_format() {
        use regsync_engine::model::{SyncCounts, SyncMeta};

        let result = SyncResult {
            meta: SyncMeta {
                config_name: "GEL vs TT".into(),
                key_field: "IdRegistre".into(),
                engine_version: "0.0.0".into(),
                run_at: String::new(),
            },
            counts: SyncCounts { create: 2, update: 1, delete: 0 },
            to_create: vec![],
            to_update: vec![],
            to_delete: vec![],
        };
        assert_eq!(
            summary_line(&result),
            "GEL vs TT: 2 to create, 1 to update, 0 to delete"
        );
    }

    #[test]
    fn roles_load_their_own_files() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "gel.csv", "IdRegistre,Nom\n1,Source\n");
        write_file(dir.path(), "tt.csv", "IdRegistre,Nom\n2,Target\n");
        let config_path = write_file(
            dir.path(),
            "roles.sync.toml",
            r#"
name = "Roles"
compare_fields = ["Nom"]

[source]
file = "gel.csv"

[target]
file = "tt.csv"
"#,
        );

        let config = load_config(&config_path).unwrap();
        let source = load_dataset(&config, dir.path(), DatasetRole::Source).unwrap();
        let target = load_dataset(&config, dir.path(), DatasetRole::Target).unwrap();
        assert_eq!(source.rows[0].get("Nom"), Some("Source"));
        assert_eq!(target.rows[0].get("Nom"), Some("Target"));
    }

    #[test]
    fn identical_files_run_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "a.csv", "IdRegistre,Nom\n1,X\n");
        write_file(dir.path(), "b.csv", "IdRegistre,Nom\n1,X\n");
        let config_path = write_file(
            dir.path(),
            "same.sync.toml",
            r#"
name = "Same"
compare_fields = ["Nom"]

[source]
file = "a.csv"

[target]
file = "b.csv"
"#,
        );
        // Self-identical data: counts all zero.
        cmd_run(config_path, false, None).unwrap();
    }
}
