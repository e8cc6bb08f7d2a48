//! Schema creation for the `cases` table.
//!
//! The single CREATE TABLE statement lives here. Creation is idempotent and
//! runs on every open; there is no migration path.

use crate::error::Result;
use crate::CaseDb;
use tracing::debug;

impl CaseDb {
    /// Ensure the `cases` table exists.
    pub(crate) async fn ensure_schema(&self) -> Result<()> {
        // WAL keeps readers (reports) from blocking the import paths.
        sqlx::query("PRAGMA journal_mode=WAL")
            .execute(&self.pool)
            .await?;
        sqlx::query("PRAGMA synchronous=NORMAL")
            .execute(&self.pool)
            .await?;

        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS cases (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                date TEXT,
                complainant TEXT,
                accused TEXT,
                offences TEXT,
                subject TEXT,
                court_heard_in TEXT,
                submitted INTEGER,
                submitted_documents TEXT,
                last_court_date TEXT,
                next_court_date TEXT
            )"#,
        )
        .execute(&self.pool)
        .await?;

        debug!("Database schema verified");
        Ok(())
    }
}
