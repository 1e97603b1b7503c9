use std::path::{Path, PathBuf};

use csv::WriterBuilder;
use rusqlite::Connection;
use rusqlite::types::Value;

use crate::error::Result;
use crate::models::{Cell, Table};

/// Write the table as CSV, fully replacing any existing file
///
/// Rows go to a sibling temporary file first which is then renamed over
/// `path`, so an interrupted write never leaves a truncated CSV behind.
pub fn write_csv(table: &Table, path: &Path) -> Result<usize> {
    let tmp_path = temporary_sibling(path);
    {
        let mut writer = WriterBuilder::new().from_path(&tmp_path)?;
        writer.write_record(&table.columns)?;
        for row in &table.rows {
            writer.write_record(row.iter().map(|cell| cell.to_string()))?;
        }
        writer.flush()?;
    }
    std::fs::rename(&tmp_path, path)?;
    Ok(table.len())
}

/// Write the table into a SQLite database under `table_name`
///
/// Prior contents of that table are discarded. Drop, create and insert run in
/// one transaction, so readers see either the old table or the new one.
pub fn write_sqlite(table: &Table, path: &Path, table_name: &str) -> Result<usize> {
    let mut conn = Connection::open(path)?;
    let tx = conn.transaction()?;
    let target = quote_ident(table_name);

    tx.execute(&format!("DROP TABLE IF EXISTS {}", target), [])?;

    let column_defs: Vec<String> = (0..table.columns.len())
        .map(|i| {
            format!("{} {}", quote_ident(&table.columns[i]), sql_type(table, i))
        })
        .collect();
    tx.execute(
        &format!("CREATE TABLE {} ({})", target, column_defs.join(", ")),
        [],
    )?;

    {
        let names: Vec<String> = table.columns.iter().map(|c| quote_ident(c)).collect();
        let placeholders: Vec<String> =
            (1..=table.columns.len()).map(|i| format!("?{}", i)).collect();
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO {} ({}) VALUES ({})",
            target,
            names.join(", "),
            placeholders.join(", ")
        ))?;
        let types: Vec<&str> = (0..table.columns.len()).map(|i| sql_type(table, i)).collect();
        for row in &table.rows {
            let values = row.iter().zip(&types).map(|(cell, ty)| sql_value(cell, ty));
            stmt.execute(rusqlite::params_from_iter(values))?;
        }
    }

    tx.commit()?;
    Ok(table.len())
}

/// `INTEGER` when every present cell is an exact integer, `TEXT` otherwise
///
/// A single `"007"` keeps the whole column as text, so no value is rewritten.
fn sql_type(table: &Table, index: usize) -> &'static str {
    let mut present = table.column(index).filter(|c| !c.is_absent()).peekable();
    if present.peek().is_none() {
        return "TEXT";
    }
    if present.all(|c| c.as_integer().is_some()) {
        "INTEGER"
    } else {
        "TEXT"
    }
}

fn sql_value(cell: &Cell, column_type: &str) -> Value {
    match (cell, column_type) {
        (Cell::Absent, _) => Value::Null,
        (Cell::Integer(n), _) => Value::Integer(*n),
        (other, "INTEGER") => other
            .as_integer()
            .map(Value::Integer)
            .unwrap_or_else(|| Value::Text(other.to_string())),
        (other, _) => Value::Text(other.to_string()),
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn temporary_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}
