use tracing::debug;

use crate::models::Table;

/// Canonical form of a raw header: lowercase, whitespace replaced by `_`
pub fn normalize_header(raw: &str) -> String {
    raw.to_lowercase()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .collect()
}

/// Stage 0: normalize every header in place
///
/// Pure metadata transform; cell values are not inspected.
pub fn normalize_headers(table: &mut Table) {
    for column in &mut table.columns {
        let normalized = normalize_header(column);
        if normalized != *column {
            debug!("Header {:?} -> {:?}", column, normalized);
            *column = normalized;
        }
    }
}
