use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::models::{Cell, ColumnNames, Table};

/// Configuration for Stage 3 date validation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DateConfig {
    /// Calendar date formats, tried in order
    pub date_formats: Vec<String>,
    /// Date-time formats whose date part is kept
    pub datetime_formats: Vec<String>,
}

impl Default for DateConfig {
    fn default() -> Self {
        Self {
            date_formats: vec![
                "%Y-%m-%d".to_string(),
                "%Y/%m/%d".to_string(),
                "%m/%d/%Y".to_string(),
                "%Y%m%d".to_string(),
            ],
            datetime_formats: vec![
                "%Y-%m-%d %H:%M:%S".to_string(),
                "%Y-%m-%dT%H:%M:%S".to_string(),
            ],
        }
    }
}

impl DateConfig {
    /// Parse a raw value into a date, `None` when no format matches
    pub fn parse(&self, raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        self.date_formats
            .iter()
            .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
            .or_else(|| {
                self.datetime_formats
                    .iter()
                    .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                    .map(|dt| dt.date())
            })
    }
}

/// Result of Stage 3 date validation
#[derive(Debug, Clone, Default, Serialize)]
pub struct DateResult {
    /// Per column, present values that did not parse and became absent
    pub unparseable: BTreeMap<String, usize>,
    /// Rows whose actual discharge preceded the sentence date
    pub impossible_corrected: usize,
}

/// Execute Stage 3: Date validation
///
/// Unparseable dates become absent, then `actual_discharge_date` is nulled
/// where it precedes `sentence_date`. Rows are never dropped.
pub fn validate_dates(
    table: &mut Table,
    columns: &ColumnNames,
    config: &DateConfig,
) -> Result<DateResult> {
    let mut result = DateResult::default();

    for name in columns.date_columns() {
        let index = table.require_column(name)?;
        let mut failed = 0;
        for row in &mut table.rows {
            let parsed = parse_cell(&row[index], config);
            if parsed.is_absent() && !row[index].is_absent() {
                debug!("Unparseable {} value {:?}", name, row[index]);
                failed += 1;
            }
            row[index] = parsed;
        }
        result.unparseable.insert(name.to_string(), failed);
    }

    let sentence = table.require_column(&columns.sentence_date)?;
    let actual = table.require_column(&columns.actual_discharge_date)?;

    for row in &mut table.rows {
        if is_impossible(&row[sentence], &row[actual]) {
            row[actual] = Cell::Absent;
            result.impossible_corrected += 1;
        }
    }

    info!(
        "Stage 3: {} impossible discharge dates nulled, unparseable {:?}",
        result.impossible_corrected, result.unparseable
    );

    Ok(result)
}

/// Parse one cell into `Cell::Date` or `Cell::Absent`
fn parse_cell(cell: &Cell, config: &DateConfig) -> Cell {
    match cell {
        Cell::Date(d) => Cell::Date(*d),
        Cell::Absent => Cell::Absent,
        other => other
            .as_text()
            .and_then(|raw| config.parse(&raw))
            .map(Cell::Date)
            .unwrap_or(Cell::Absent),
    }
}

/// True when both dates are present and the end precedes the start
pub fn is_impossible(sentence: &Cell, actual: &Cell) -> bool {
    match (sentence.as_date(), actual.as_date()) {
        (Some(start), Some(end)) => end < start,
        _ => false,
    }
}
