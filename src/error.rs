use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaxprepError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("File has no header row")]
    EmptyFile,

    #[error("Row {row} has {found} fields but the header has {expected}")]
    MalformedRow {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("Rules file error: {0}")]
    RulesFile(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Amount total for {0} is out of range")]
    AmountOverflow(String),

    #[error("Failed to write {failed} of {total} reports")]
    ReportsFailed { failed: usize, total: usize },
}

pub type Result<T> = std::result::Result<T, TaxprepError>;
