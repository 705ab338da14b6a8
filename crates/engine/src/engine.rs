use std::collections::HashMap;

use crate::classify::classify;
use crate::config::SyncConfig;
use crate::detect::has_changed;
use crate::error::SyncError;
use crate::index::build_index;
use crate::model::{Dataset, Row, SyncCounts, SyncInput, SyncMeta, SyncResult};
use crate::payload::{build_create, build_delete, build_update};

/// Run one reconciliation: index both datasets, partition the key sets,
/// detect changes on the intersection, build the three payloads.
///
/// Pure function of its inputs; holds no state across calls.
pub fn run(config: &SyncConfig, input: &SyncInput) -> Result<SyncResult, SyncError> {
    config.validate()?;
    check_schema(config, &input.source, false)?;
    check_schema(config, &input.target, true)?;

    let source_index = build_index(&input.source, &config.key_field, config.on_duplicate)?;
    let target_index = build_index(&input.target, &config.key_field, config.on_duplicate)?;

    let partition = classify(&source_index, &target_index);

    let to_create: Vec<_> = partition
        .create
        .iter()
        .map(|key| build_create(key, source_index[key], config))
        .collect();

    let to_update: Vec<_> = partition
        .update_candidates
        .iter()
        .filter(|key| {
            has_changed(
                source_index[key.as_str()],
                target_index[key.as_str()],
                &config.compare_fields,
            )
        })
        .map(|key| build_update(key, source_index[key], target_index[key], config))
        .collect();

    let to_delete: Vec<_> = partition
        .delete
        .iter()
        .map(|key| build_delete(key, target_index[key], config))
        .collect();

    Ok(SyncResult {
        meta: SyncMeta {
            config_name: config.name.clone(),
            key_field: config.key_field.clone(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        counts: SyncCounts {
            create: to_create.len(),
            update: to_update.len(),
            delete: to_delete.len(),
        },
        to_create,
        to_update,
        to_delete,
    })
}

/// Reject before any indexing if a declared field is missing from the
/// dataset's schema. The technical id is a target-side column only.
fn check_schema(config: &SyncConfig, dataset: &Dataset, is_target: bool) -> Result<(), SyncError> {
    let missing = |column: &str| SyncError::MissingColumn {
        dataset: dataset.name.clone(),
        column: column.to_string(),
    };

    if !dataset.has_column(&config.key_field) {
        return Err(missing(&config.key_field));
    }
    for field in &config.compare_fields {
        if !dataset.has_column(field) {
            return Err(missing(field));
        }
    }
    if is_target {
        if let Some(ref tech) = config.technical_id {
            if !dataset.has_column(tech) {
                return Err(missing(tech));
            }
        }
    }

    Ok(())
}

/// Parse already-fetched CSV text into a Dataset. Header row required;
/// empty cells are kept as empty strings and absorbed by normalization.
pub fn load_csv_dataset(name: &str, csv_data: &str) -> Result<Dataset, SyncError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes());

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| SyncError::Io(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| SyncError::Io(e.to_string()))?;
        let mut values = HashMap::new();
        for (i, column) in columns.iter().enumerate() {
            if let Some(value) = record.get(i) {
                values.insert(column.clone(), value.to_string());
            }
        }
        rows.push(Row { values });
    }

    Ok(Dataset {
        name: name.to_string(),
        columns,
        rows,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DuplicatePolicy;

    fn config() -> SyncConfig {
        SyncConfig {
            name: "test".into(),
            key_field: "IdRegistre".into(),
            compare_fields: vec!["Nom".into(), "Prenom".into()],
            technical_id: Some("RowId".into()),
            on_duplicate: DuplicatePolicy::LastWins,
            source: None,
            target: None,
        }
    }

    fn dataset(name: &str, csv_data: &str) -> Dataset {
        load_csv_dataset(name, csv_data).unwrap()
    }

    #[test]
    fn load_csv_basic() {
        let ds = dataset(
            "gel",
            "IdRegistre,Nom,Prenom\n5,Durand,Anne\n7,Dupont,\n",
        );
        assert_eq!(ds.columns, vec!["IdRegistre", "Nom", "Prenom"]);
        assert_eq!(ds.rows.len(), 2);
        assert_eq!(ds.rows[0].get("Nom"), Some("Durand"));
        assert_eq!(ds.rows[1].get("Prenom"), Some(""));
    }

    #[test]
    fn load_csv_short_row_reads_as_absent() {
        let ds = dataset("gel", "IdRegistre,Nom,Prenom\n5,Durand\n");
        assert_eq!(ds.rows[0].get("Prenom"), None);
    }

    #[test]
    fn missing_key_column_is_a_schema_error() {
        let source = dataset("gel", "Id,Nom,Prenom\n5,Durand,Anne\n");
        let target = dataset("tt", "IdRegistre,Nom,Prenom,RowId\n");
        let err = run(&config(), &SyncInput { source, target }).unwrap_err();
        assert!(err.to_string().contains("missing column 'IdRegistre'"));
        assert!(err.to_string().contains("'gel'"));
    }

    #[test]
    fn missing_compare_column_is_a_schema_error() {
        let source = dataset("gel", "IdRegistre,Nom\n5,Durand\n");
        let target = dataset("tt", "IdRegistre,Nom,Prenom,RowId\n");
        let err = run(&config(), &SyncInput { source, target }).unwrap_err();
        assert!(err.to_string().contains("missing column 'Prenom'"));
    }

    #[test]
    fn technical_id_required_on_target_only() {
        let source = dataset("gel", "IdRegistre,Nom,Prenom\n5,Durand,Anne\n");
        let target = dataset("tt", "IdRegistre,Nom,Prenom\n");
        let err = run(&config(), &SyncInput { source, target }).unwrap_err();
        assert!(err.to_string().contains("missing column 'RowId'"));
        assert!(err.to_string().contains("'tt'"));

        // Source without the technical id column is fine.
        let source = dataset("gel", "IdRegistre,Nom,Prenom\n5,Durand,Anne\n");
        let target = dataset("tt", "IdRegistre,Nom,Prenom,RowId\n");
        assert!(run(&config(), &SyncInput { source, target }).is_ok());
    }

    #[test]
    fn three_way_split_end_to_end() {
        let source = dataset(
            "gel",
            "IdRegistre,Nom,Prenom\n\
             1,Créée,Anne\n\
             2,Durand,Paul\n\
             3,Martin,Zoé\n",
        );
        let target = dataset(
            "tt",
            "IdRegistre,Nom,Prenom,RowId\n\
             2,DURAND ,paul,r-2\n\
             3,Ancien,Zoé,r-3\n\
             4,Partie,Luc,r-4\n",
        );

        let result = run(&config(), &SyncInput { source, target }).unwrap();
        assert_eq!(result.counts.create, 1);
        assert_eq!(result.counts.update, 1);
        assert_eq!(result.counts.delete, 1);

        assert_eq!(result.to_create[0]["IdRegistre"], "1");
        assert_eq!(result.to_create[0]["Nom"], "Créée");

        // Key 2 differs only by case/whitespace: no update for it.
        assert_eq!(result.to_update[0]["IdRegistre"], "3");
        assert_eq!(result.to_update[0]["Nom"], "Martin");
        assert_eq!(result.to_update[0]["RowId"], "r-3");

        assert_eq!(result.to_delete[0]["IdRegistre"], "4");
        assert_eq!(result.to_delete[0]["Nom"], "Partie");
        assert_eq!(result.to_delete[0]["RowId"], "r-4");
    }

    #[test]
    fn duplicate_reject_policy_propagates() {
        let mut config = config();
        config.on_duplicate = DuplicatePolicy::Reject;
        config.technical_id = None;

        let source = dataset(
            "gel",
            "IdRegistre,Nom,Prenom\n5,Durand,Anne\n5,Dupont,Anne\n",
        );
        let target = dataset("tt", "IdRegistre,Nom,Prenom\n");
        let err = run(&config, &SyncInput { source, target }).unwrap_err();
        assert!(matches!(err, SyncError::DuplicateKeys { .. }));
    }

    #[test]
    fn empty_inputs_yield_empty_complete_result() {
        let source = dataset("gel", "IdRegistre,Nom,Prenom\n");
        let target = dataset("tt", "IdRegistre,Nom,Prenom,RowId\n");
        let result = run(&config(), &SyncInput { source, target }).unwrap();
        assert_eq!(result.counts.create, 0);
        assert_eq!(result.counts.update, 0);
        assert_eq!(result.counts.delete, 0);
        assert!(result.to_create.is_empty());
        assert_eq!(result.meta.config_name, "test");
        assert!(!result.meta.engine_version.is_empty());
    }
}
