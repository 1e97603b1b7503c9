use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::models::{Cell, ColumnNames, RawScore, ScoreSource, Table};

/// Configuration for Stage 2 score reconciliation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreConfig {
    /// Text labels and the score each stands for. Matched case-sensitively.
    pub labels: BTreeMap<String, i64>,
    /// Fill value when no row yields a score, leaving the median undefined
    pub fallback_score: i64,
}

impl Default for ScoreConfig {
    fn default() -> Self {
        let labels = [
            ("Low", 2),
            ("Lo", 2),
            ("Medium", 5),
            ("Med", 5),
            ("High", 8),
            ("Hi", 8),
            ("H", 8),
        ]
        .into_iter()
        .map(|(label, score)| (label.to_string(), score))
        .collect();

        Self {
            labels,
            fallback_score: 5,
        }
    }
}

/// Result of Stage 2 reconciliation
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScoreResult {
    /// Rows settled by the numeric channel
    pub from_numeric: usize,
    /// Rows settled by the label channel
    pub from_label: usize,
    /// Rows filled with the imputed value
    pub imputed: usize,
    /// Median of the merged column, if any row was settled
    pub median: Option<f64>,
    /// Value written into every imputed row
    pub fill_value: i64,
}

/// Numeric channel: the cell read as a number, or unset
pub fn numeric_channel(score: &RawScore) -> Option<f64> {
    match score {
        RawScore::Integer(n) => Some(*n as f64),
        RawScore::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        RawScore::Absent => None,
    }
}

/// Label channel: the cell looked up in the synonym table, or unset
pub fn label_channel(score: &RawScore, config: &ScoreConfig) -> Option<f64> {
    match score {
        RawScore::Text(s) => config.labels.get(s).map(|&v| v as f64),
        _ => None,
    }
}

/// Merge both channels, preferring the numeric value
pub fn merge_channels(score: &RawScore, config: &ScoreConfig) -> Option<(f64, ScoreSource)> {
    numeric_channel(score)
        .map(|v| (v, ScoreSource::Numeric))
        .or_else(|| label_channel(score, config).map(|v| (v, ScoreSource::Label)))
}

/// Median with the usual even-cardinality convention (mean of the middle two)
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Execute Stage 2: Score reconciliation
///
/// Numeric value, else label, else the median of the merged values. Every
/// value is truncated when written, so the clean column has no gaps.
pub fn reconcile_scores(
    table: &mut Table,
    columns: &ColumnNames,
    config: &ScoreConfig,
) -> Result<ScoreResult> {
    let index = table.require_column(&columns.compas_score)?;

    let merged: Vec<Option<(f64, ScoreSource)>> = table
        .column(index)
        .map(|cell| merge_channels(&RawScore::from(cell), config))
        .collect();

    let settled: Vec<f64> = merged.iter().flatten().map(|(v, _)| *v).collect();
    let median = median(&settled);

    let mut result = ScoreResult {
        median,
        ..Default::default()
    };

    result.fill_value = match median {
        Some(m) => m.trunc() as i64,
        None => {
            if !merged.is_empty() {
                warn!(
                    "Stage 2: no usable scores in {} rows, imputing fallback {}",
                    merged.len(),
                    config.fallback_score
                );
            }
            config.fallback_score
        }
    };

    let clean: Vec<Cell> = merged
        .iter()
        .map(|entry| match entry {
            Some((value, source)) => {
                match source {
                    ScoreSource::Numeric => result.from_numeric += 1,
                    ScoreSource::Label => result.from_label += 1,
                }
                Cell::Integer(value.trunc() as i64)
            }
            None => {
                result.imputed += 1;
                Cell::Integer(result.fill_value)
            }
        })
        .collect();

    table.set_column(&columns.compas_score_clean, clean);

    debug!("Stage 2: median {:?}, fill value {}", result.median, result.fill_value);
    info!(
        "Stage 2: {} numeric, {} from labels, {} imputed with {}",
        result.from_numeric, result.from_label, result.imputed, result.fill_value
    );

    Ok(result)
}
