use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::Result;
use crate::models::{Cell, ColumnNames, DischargeCategory, Table};

/// Configuration for Stage 4 category normalization
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryConfig {
    /// Lowercased, trimmed raw label -> canonical category
    pub synonyms: BTreeMap<String, DischargeCategory>,
}

impl Default for CategoryConfig {
    fn default() -> Self {
        let synonyms = [
            ("revoked - tech", DischargeCategory::Revoked),
            ("revoked-new crime", DischargeCategory::Revoked),
            ("revoked", DischargeCategory::Revoked),
            ("successful", DischargeCategory::Successful),
            ("absconded", DischargeCategory::Absconded),
            ("deceased", DischargeCategory::Deceased),
            ("active", DischargeCategory::Active),
        ]
        .into_iter()
        .map(|(raw, category)| (raw.to_string(), category))
        .collect();

        Self { synonyms }
    }
}

impl CategoryConfig {
    /// Map a raw outcome to its category. Total: anything unknown is `Other`.
    pub fn classify(&self, raw: Option<&str>) -> DischargeCategory {
        raw.map(|s| s.trim().to_lowercase())
            .and_then(|key| self.synonyms.get(&key).copied())
            .unwrap_or(DischargeCategory::Other)
    }
}

/// Result of Stage 4 category normalization
#[derive(Debug, Clone, Default, Serialize)]
pub struct CategoryResult {
    /// Rows per canonical category after cleaning
    pub counts: BTreeMap<DischargeCategory, usize>,
    /// Rows whose raw value matched no synonym
    pub unmapped: usize,
}

/// Execute Stage 4: canonicalize the discharge-type column in place
pub fn normalize_categories(
    table: &mut Table,
    columns: &ColumnNames,
    config: &CategoryConfig,
) -> Result<CategoryResult> {
    let index = table.require_column(&columns.discharge_type)?;
    let mut result = CategoryResult::default();

    for row in &mut table.rows {
        let raw = row[index].as_text();
        let category = config.classify(raw.as_deref());
        if category == DischargeCategory::Other {
            let known_other = raw
                .as_deref()
                .is_some_and(|s| s.trim().eq_ignore_ascii_case(DischargeCategory::Other.as_str()));
            if !known_other {
                result.unmapped += 1;
            }
        }
        *result.counts.entry(category).or_default() += 1;
        row[index] = Cell::Text(category.as_str().to_string());
    }

    info!(
        "Stage 4: {} discharge types unmapped, categories {:?}",
        result.unmapped, result.counts
    );

    Ok(result)
}

/// Raw discharge-type values and how often each occurs, most frequent first
pub fn discharge_type_frequency(
    table: &Table,
    columns: &ColumnNames,
) -> Result<Vec<(String, usize)>> {
    let index = table.require_column(&columns.discharge_type)?;
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();
    for cell in table.column(index) {
        *counts.entry(cell.to_string()).or_default() += 1;
    }

    let mut frequency: Vec<(String, usize)> = counts.into_iter().collect();
    frequency.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    Ok(frequency)
}
