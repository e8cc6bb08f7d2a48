//! Error types for the storage layer.

use thiserror::Error;

/// Storage operation result type.
pub type Result<T> = std::result::Result<T, DbError>;

/// Storage errors.
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLx error (connection, query, etc.)
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// IO error (file system operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Table or column name that cannot be used safely in SQL
    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),

    /// A loose table with no columns cannot be saved
    #[error("Cannot save a table with no columns")]
    NoColumns,

    /// Query rejected by the read-only guard
    #[error("Query rejected: {0}")]
    RejectedQuery(String),
}

impl DbError {
    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a rejected query error.
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::RejectedQuery(msg.into())
    }
}
