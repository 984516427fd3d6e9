use thiserror::Error;

use crate::validator::ValidationError;

#[derive(Error, Debug)]
pub enum StatementError {
    #[error("no pay date found in {source_file}")]
    MissingDate { source_file: String },

    #[error("insufficient data extracted from {source_file}: only {fields_found} monetary field(s) found")]
    InsufficientData {
        source_file: String,
        fields_found: usize,
    },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("unsupported financial institution: {0}")]
    UnknownInstitution(String),

    #[error("invalid reconciliation period '{0}': expected YYYY or MM-YYYY (e.g. 2024 or 06-2024)")]
    InvalidPeriod(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StatementError>;
