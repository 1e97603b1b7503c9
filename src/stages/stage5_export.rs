use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::io::{write_csv, write_sqlite};
use crate::models::Table;

/// Configuration for Stage 5 export
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Flat-file sink, overwritten on every run
    pub csv_path: PathBuf,
    /// SQLite database holding the structured sink
    pub db_path: PathBuf,
    /// Table replaced inside `db_path`
    pub table_name: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from("04_data/processed/probation_cleaned.csv"),
            db_path: PathBuf::from("04_data/processed/probation_data.db"),
            table_name: "probation_records".to_string(),
        }
    }
}

/// Result of Stage 5 export
#[derive(Debug, Clone, Serialize)]
pub struct ExportResult {
    pub csv_path: PathBuf,
    pub db_path: PathBuf,
    pub rows_written: usize,
}

/// Execute Stage 5: write the cleaned table to both sinks
///
/// The CSV is written first, then the database table. The sinks are
/// independent; a failure in the second does not undo the first.
pub fn export(table: &Table, config: &ExportConfig) -> Result<ExportResult> {
    ensure_parent(&config.csv_path)?;
    ensure_parent(&config.db_path)?;

    info!("Stage 5: writing {} rows to {:?}", table.len(), config.csv_path);
    let rows_written = write_csv(table, &config.csv_path)?;

    info!(
        "Stage 5: replacing table {:?} in {:?}",
        config.table_name, config.db_path
    );
    write_sqlite(table, &config.db_path, &config.table_name)?;

    Ok(ExportResult {
        csv_path: config.csv_path.clone(),
        db_path: config.db_path.clone(),
        rows_written,
    })
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}
