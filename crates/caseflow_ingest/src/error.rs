//! Error types for the ingestion pipeline.

use thiserror::Error;

/// Ingestion result type.
pub type Result<T> = std::result::Result<T, IngestError>;

/// Errors raised while reading, validating, or importing case files.
#[derive(Error, Debug)]
pub enum IngestError {
    /// Structural failure: required columns absent from the input. Raised
    /// before any row-level checks run.
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// One or more rows failed required-field checks. The message carries
    /// every offending row/field pair so a user can fix all of them at once.
    #[error("Validation errors:\n{}", .0.join("\n"))]
    Validation(Vec<String>),

    /// File unreadable or unwritable
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parse failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Spreadsheet read failure
    #[error("Spreadsheet error: {0}")]
    Xlsx(#[from] calamine::XlsxError),

    /// Spreadsheet write failure (template creation)
    #[error("Spreadsheet write error: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    /// Workbook contains no sheets
    #[error("Workbook has no sheets: {0}")]
    EmptyWorkbook(String),

    /// Storage failure
    #[error(transparent)]
    Db(#[from] caseflow_db::DbError),
}
