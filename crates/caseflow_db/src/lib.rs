//! SQLite persistence layer for Caseflow.
//!
//! All database access goes through [`CaseDb`]. Opening a database is
//! idempotent: the `cases` schema is created on first use and verified on
//! every subsequent open, and inserts are strictly append-only.
//!
//! # Usage
//!
//! ```rust,ignore
//! use caseflow_db::{CaseDb, Result};
//!
//! let db = CaseDb::open("./data/app.db").await?;
//! let inserted = db.insert_cases(&records).await?;
//! ```

mod cases;
mod dump;
mod error;
mod schema;
mod sql_guard;

pub use dump::WriteMode;
pub use error::{DbError, Result};
pub use sql_guard::validate_read_only;

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::info;

/// Handle to a Caseflow SQLite database.
#[derive(Clone)]
pub struct CaseDb {
    pool: SqlitePool,
}

impl CaseDb {
    /// Open or create a database at the given path.
    ///
    /// Creates the parent directory and the `cases` table if missing. Safe to
    /// call on every startup and every import.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let url = format!("sqlite:{}?mode=rwc", path.display());

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        let db = Self { pool };
        db.ensure_schema().await?;

        info!(path = %path.display(), "Database opened");

        Ok(db)
    }

    /// Open an existing database (fails if not exists).
    pub async fn open_existing(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DbError::not_found(format!(
                "Database not found: {}",
                path.display()
            )));
        }

        let url = format!("sqlite:{}?mode=rw", path.display());

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        Ok(Self { pool })
    }

    /// Get the underlying connection pool (escape hatch for complex queries).
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection.
    pub async fn close(self) {
        self.pool.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn open_creates_database() {
        let tmp = TempDir::new().unwrap();
        let db_path = tmp.path().join("test.db");

        let db = CaseDb::open(&db_path).await.unwrap();
        assert!(db_path.exists());

        db.close().await;
    }

    #[tokio::test]
    async fn open_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        let db_path = tmp.path().join("test.db");

        let db = CaseDb::open(&db_path).await.unwrap();
        db.close().await;

        // Second open must not error or alter the schema.
        let db = CaseDb::open(&db_path).await.unwrap();
        assert_eq!(db.case_count().await.unwrap(), 0);
        db.close().await;
    }

    #[tokio::test]
    async fn open_existing_fails_if_not_exists() {
        let tmp = TempDir::new().unwrap();
        let db_path = tmp.path().join("nonexistent.db");

        let result = CaseDb::open_existing(&db_path).await;
        assert!(result.is_err());
    }
}
