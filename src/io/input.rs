use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{PipelineError, Result};
use crate::models::{Cell, Table};

/// Load a CSV file of raw case records into a Table
///
/// The existence check runs before the file is opened so a missing source
/// surfaces as `MissingInput` rather than a parse failure.
pub fn load_csv(path: &Path) -> Result<Table> {
    if !path.exists() {
        return Err(PipelineError::MissingInput {
            path: path.to_path_buf(),
        });
    }
    let file = std::fs::File::open(path)?;
    let table = parse_csv(file)?;
    debug!(
        "Read {} rows x {} columns from {:?}",
        table.len(),
        table.columns.len(),
        path
    );
    Ok(table)
}

/// Parse CSV content with a header row into a Table
///
/// Headers are kept verbatim; normalizing them is a separate stage.
pub fn parse_csv<R: Read>(reader: R) -> Result<Table> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let mut table = Table::new(columns);

    for record in rdr.records() {
        let record = record?;
        table.push_row(record.iter().map(Cell::parse).collect());
    }

    Ok(table)
}
