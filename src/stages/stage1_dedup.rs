use std::collections::HashSet;

use serde::Serialize;
use tracing::info;

use crate::models::Table;

/// Result of Stage 1 deduplication
#[derive(Debug, Clone, Serialize)]
pub struct DedupResult {
    pub rows_before: usize,
    pub duplicates_removed: usize,
}

/// Stage 1: drop rows identical to an earlier row across every column
///
/// Rows are compared as loaded, before dates and categories are normalized.
/// The first occurrence of each row survives and row order is otherwise kept.
pub fn deduplicate(table: &mut Table) -> DedupResult {
    let rows_before = table.len();
    let mut seen = HashSet::with_capacity(rows_before);
    let rows = std::mem::take(&mut table.rows);
    table.rows = rows
        .into_iter()
        .filter(|row| seen.insert(row.clone()))
        .collect();

    let duplicates_removed = rows_before - table.len();
    info!(
        "Stage 1: {} duplicate rows removed, {} remain",
        duplicates_removed,
        table.len()
    );

    DedupResult {
        rows_before,
        duplicates_removed,
    }
}
