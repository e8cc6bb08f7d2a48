//! Append-only insert paths for the `cases` table.
//!
//! Two entry points exist:
//!
//! - [`CaseDb::insert_cases`] takes validated [`CaseRecord`]s; the type system
//!   already guarantees the normalization invariants.
//! - [`CaseDb::append_cases`] takes a loose [`Table`] and re-applies date and
//!   submitted-flag coercion itself. It must stay safe to call without going
//!   through the validator (the interactive single-row flow does exactly that),
//!   so it never assumes cleaned input.

use crate::error::Result;
use crate::CaseDb;
use caseflow_model::{parse_case_date, submitted_flag, CaseRecord, Table, CASE_COLUMNS};
use chrono::NaiveDate;
use sqlx::Row;

const INSERT_CASE_SQL: &str = "INSERT INTO cases \
    (date, complainant, accused, offences, subject, court_heard_in, submitted, \
     submitted_documents, last_court_date, next_court_date) \
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

impl CaseDb {
    /// Append validated case records. Returns the number of rows inserted.
    pub async fn insert_cases(&self, records: &[CaseRecord]) -> Result<u64> {
        let mut tx = self.pool.begin().await?;
        for rec in records {
            sqlx::query(INSERT_CASE_SQL)
                .bind(iso(rec.date))
                .bind(rec.complainant.as_str())
                .bind(rec.accused.as_str())
                .bind(rec.offences.as_str())
                .bind(rec.subject.as_str())
                .bind(rec.court_heard_in.as_str())
                .bind(rec.submitted as i64)
                .bind(rec.submitted_documents.as_deref())
                .bind(rec.last_court_date.map(iso))
                .bind(rec.next_court_date.map(iso))
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(records.len() as u64)
    }

    /// Append rows from a loose table, normalizing as it goes.
    ///
    /// Missing case columns are backfilled with nulls, date columns are parsed
    /// and rendered as ISO text (unparseable values become null), and the
    /// submitted flag is coerced to 0/1. No required-field validation happens
    /// here; callers wanting batch validation go through the validator first.
    pub async fn append_cases(&self, table: &Table) -> Result<u64> {
        let mut table = table.clone();
        for col in CASE_COLUMNS {
            table.backfill_column(col);
        }

        let mut tx = self.pool.begin().await?;
        for row in 0..table.row_count() {
            sqlx::query(INSERT_CASE_SQL)
                .bind(parse_case_date(table.cell(row, "date")).map(iso))
                .bind(table.cell(row, "complainant").as_text())
                .bind(table.cell(row, "accused").as_text())
                .bind(table.cell(row, "offences").as_text())
                .bind(table.cell(row, "subject").as_text())
                .bind(table.cell(row, "court_heard_in").as_text())
                .bind(submitted_flag(table.cell(row, "submitted")) as i64)
                .bind(table.cell(row, "submitted_documents").as_text())
                .bind(parse_case_date(table.cell(row, "last_court_date")).map(iso))
                .bind(parse_case_date(table.cell(row, "next_court_date")).map(iso))
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(table.row_count() as u64)
    }

    /// Number of rows currently stored in `cases`.
    pub async fn case_count(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COUNT(*) FROM cases")
            .fetch_one(&self.pool)
            .await?;
        Ok(row.try_get(0)?)
    }
}
