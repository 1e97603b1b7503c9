use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// Raw values that the loader reads as a missing cell
pub const MISSING_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "NULL", "null", "None", "<NA>", "NaT",
];

/// Date format used when writing cells back out
pub const OUTPUT_DATE_FORMAT: &str = "%Y-%m-%d";

/// A single table cell
///
/// The loader only produces `Absent` and `Text`, keeping every value exactly as
/// read. `Integer` and `Date` cells are written by the cleaning stages.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Cell {
    Absent,
    Integer(i64),
    Text(String),
    Date(NaiveDate),
}

impl Cell {
    /// Classify a raw field read from the input file
    pub fn parse(raw: &str) -> Self {
        if MISSING_MARKERS.contains(&raw) {
            Cell::Absent
        } else {
            Cell::Text(raw.to_string())
        }
    }

    /// Integer value, for text only when it prints back byte-for-byte
    ///
    /// `"007"` and `"+5"` are not integers here, so writing the value back out
    /// never changes what was read.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Cell::Integer(n) => Some(*n),
            Cell::Text(s) => s.parse::<i64>().ok().filter(|n| n.to_string() == *s),
            _ => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Cell::Absent)
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Textual form of the cell, `None` when absent
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Absent => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Absent => Ok(()),
            Cell::Integer(n) => write!(f, "{}", n),
            Cell::Text(s) => f.write_str(s),
            Cell::Date(d) => write!(f, "{}", d.format(OUTPUT_DATE_FORMAT)),
        }
    }
}

pub type Row = Vec<Cell>;

/// In-memory table of case records sharing one column schema
///
/// Row order is preserved from the input so that output is reproducible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Append a row, padding or truncating it to the table width
    pub fn push_row(&mut self, mut row: Row) {
        row.resize(self.columns.len(), Cell::Absent);
        self.rows.push(row);
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Index of a column the pipeline cannot run without
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| PipelineError::MissingColumn {
                column: name.to_string(),
            })
    }

    /// Cells of one column, in row order
    pub fn column(&self, index: usize) -> impl Iterator<Item = &Cell> + '_ {
        self.rows.iter().map(move |row| &row[index])
    }

    /// Set a column's cells, appending the column if it does not exist yet
    pub fn set_column(&mut self, name: &str, cells: Vec<Cell>) {
        debug_assert_eq!(cells.len(), self.rows.len());
        match self.column_index(name) {
            Some(index) => {
                for (row, cell) in self.rows.iter_mut().zip(cells) {
                    row[index] = cell;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, cell) in self.rows.iter_mut().zip(cells) {
                    row.push(cell);
                }
            }
        }
    }
}

/// Column vocabulary the stages address after header normalization
///
/// `doc_number` and `assigned_officer` are passed through untouched, so only
/// the columns a stage reads or writes are named here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub compas_score: String,
    pub compas_score_clean: String,
    pub sentence_date: String,
    pub discharge_date: String,
    pub actual_discharge_date: String,
    pub discharge_type: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            compas_score: "compas_score".to_string(),
            compas_score_clean: "compas_score_clean".to_string(),
            sentence_date: "sentence_date".to_string(),
            discharge_date: "discharge_date".to_string(),
            actual_discharge_date: "actual_discharge_date".to_string(),
            discharge_type: "discharge_type".to_string(),
        }
    }
}

impl ColumnNames {
    /// The three date columns, in the order they are parsed
    pub fn date_columns(&self) -> [&str; 3] {
        [
            self.sentence_date.as_str(),
            self.discharge_date.as_str(),
            self.actual_discharge_date.as_str(),
        ]
    }

    /// Fail if any input column the stages read is missing
    pub fn check(&self, table: &Table) -> Result<()> {
        table.require_column(&self.compas_score)?;
        for column in self.date_columns() {
            table.require_column(column)?;
        }
        table.require_column(&self.discharge_type)?;
        Ok(())
    }
}
