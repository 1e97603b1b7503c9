use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors that stop the pipeline.
///
/// Per-cell anomalies (bad scores, bad dates, unknown categories) are never
/// reported here; the stages absorb them into their cleaning rules.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The input source does not exist. Checked before any parsing.
    #[error("input file not found at {path:?}")]
    MissingInput { path: PathBuf },

    /// A column the pipeline addresses is absent after header normalization
    #[error("required column `{column}` is missing from the input")]
    MissingColumn { column: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
