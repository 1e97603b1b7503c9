use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::io::load_csv;
use crate::models::{ColumnNames, Table};
use crate::stages::{
    CategoryConfig, CategoryResult, DateConfig, DateResult, DedupResult, ExportConfig,
    ExportResult, ScoreConfig, ScoreResult, deduplicate, export, normalize_categories,
    normalize_headers, reconcile_scores, validate_dates,
};

/// Vocabularies and column names for the cleaning stages
///
/// Every field has a default matching the standard probation extract, so a
/// JSON override file only needs the parts it changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub columns: ColumnNames,
    pub scores: ScoreConfig,
    pub dates: DateConfig,
    pub categories: CategoryConfig,
}

impl PipelineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }
}

/// Counts collected from every stage of one run
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub rows_loaded: usize,
    pub dedup: DedupResult,
    pub scores: ScoreResult,
    pub dates: DateResult,
    pub categories: CategoryResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export: Option<ExportResult>,
}

impl PipelineReport {
    /// Rows left after cleaning
    pub fn rows_cleaned(&self) -> usize {
        self.rows_loaded - self.dedup.duplicates_removed
    }

    /// Write to a JSON file
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

/// Run the in-memory cleaning stages over a freshly loaded table
///
/// Headers are normalized and the required columns checked before any row
/// is touched, so a schema problem leaves the table's rows as loaded.
pub fn clean(table: &mut Table, config: &PipelineConfig) -> Result<PipelineReport> {
    let rows_loaded = table.len();

    info!("Stage 0: normalizing {} headers", table.columns.len());
    normalize_headers(table);
    config.columns.check(table)?;

    let dedup = deduplicate(table);
    let scores = reconcile_scores(table, &config.columns, &config.scores)?;
    let dates = validate_dates(table, &config.columns, &config.dates)?;
    let categories = normalize_categories(table, &config.columns, &config.categories)?;

    Ok(PipelineReport {
        rows_loaded,
        dedup,
        scores,
        dates,
        categories,
        export: None,
    })
}

/// Load, clean and export in one pass
///
/// Nothing is written unless loading and every cleaning stage succeed.
pub fn run(
    input: &Path,
    export_config: &ExportConfig,
    config: &PipelineConfig,
) -> Result<PipelineReport> {
    info!("Loading case records from {:?}", input);
    let mut table = load_csv(input)?;
    info!("Loaded {} rows, {} columns", table.len(), table.columns.len());

    let mut report = clean(&mut table, config)?;
    report.export = Some(export(&table, export_config)?);

    info!(
        "Complete: {} rows in, {} rows out",
        report.rows_loaded,
        report.rows_cleaned()
    );

    Ok(report)
}
