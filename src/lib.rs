pub mod error;
pub mod io;
pub mod models;
pub mod pipeline;
pub mod stages;

pub use error::{PipelineError, Result};
pub use io::{load_csv, parse_csv, write_csv, write_sqlite};
pub use models::{Cell, ColumnNames, DischargeCategory, RawScore, Table};
pub use pipeline::{clean, run, PipelineConfig, PipelineReport};
pub use stages::{
    deduplicate, export, normalize_categories, normalize_headers, reconcile_scores,
    validate_dates, CategoryConfig, DateConfig, ExportConfig, ScoreConfig,
};
