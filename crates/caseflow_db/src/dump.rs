//! Generic loose-table storage: raw dumps in, loose tables out.
//!
//! These paths carry no validation at all. They back the `excel` / `manual` /
//! `db` staging commands and the report read-back, where the column set is
//! whatever the source file happened to contain.

use crate::error::{DbError, Result};
use crate::CaseDb;
use caseflow_model::{Cell, Table};
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteRow};
use sqlx::{Column, Row};
use tracing::debug;

/// Write disposition for [`CaseDb::save_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Keep existing rows and append.
    Append,
    /// Drop the table first and rewrite it.
    Replace,
}

/// Table names must be plain identifiers; they are interpolated into SQL.
fn check_table_name(name: &str) -> Result<&str> {
    let mut chars = name.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if valid {
        Ok(name)
    } else {
        Err(DbError::InvalidIdentifier(name.to_string()))
    }
}

/// Column names come from arbitrary file headers; quote rather than reject.
fn quote_column(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn bind_cell<'q>(
    query: Query<'q, Sqlite, SqliteArguments<'q>>,
    cell: &Cell,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match cell {
        Cell::Null => query.bind(None::<String>),
        Cell::Text(s) => query.bind(s.clone()),
        Cell::Int(i) => query.bind(*i),
        Cell::Real(f) => query.bind(*f),
    }
}

/// Decode one column of a result row into a loose cell.
///
/// SQLite values carry their own type, so try integer, then real, then text.
fn decode_cell(row: &SqliteRow, idx: usize) -> Cell {
    if let Ok(value) = row.try_get::<Option<i64>, _>(idx) {
        return value.map(Cell::Int).unwrap_or(Cell::Null);
    }
    if let Ok(value) = row.try_get::<Option<f64>, _>(idx) {
        return value.map(Cell::Real).unwrap_or(Cell::Null);
    }
    match row.try_get::<Option<String>, _>(idx) {
        Ok(Some(s)) => Cell::Text(s),
        _ => Cell::Null,
    }
}

fn table_from_rows(rows: &[SqliteRow]) -> Table {
    let columns = match rows.first() {
        Some(first) => first
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect(),
        None => Vec::new(),
    };
    let mut table = Table::new(columns);
    for row in rows {
        let cells = (0..row.columns().len())
            .map(|idx| decode_cell(row, idx))
            .collect();
        table.push_row(cells);
    }
    table
}

impl CaseDb {
    /// Save a loose table under `table_name`, creating it on first use.
    ///
    /// Columns are stored untyped (SQLite dynamic typing). Returns the number
    /// of rows written.
    pub async fn save_table(
        &self,
        table: &Table,
        table_name: &str,
        mode: WriteMode,
    ) -> Result<u64> {
        let name = check_table_name(table_name)?;
        if table.columns().is_empty() {
            return Err(DbError::NoColumns);
        }

        let columns_sql = table
            .columns()
            .iter()
            .map(|c| quote_column(c))
            .collect::<Vec<_>>()
            .join(", ");

        let mut tx = self.pool.begin().await?;

        if mode == WriteMode::Replace {
            sqlx::query(&format!("DROP TABLE IF EXISTS {name}"))
                .execute(&mut *tx)
                .await?;
        }
        sqlx::query(&format!(
            "CREATE TABLE IF NOT EXISTS {name} ({columns_sql})"
        ))
        .execute(&mut *tx)
        .await?;

        let placeholders = vec!["?"; table.columns().len()].join(", ");
        let insert_sql = format!("INSERT INTO {name} ({columns_sql}) VALUES ({placeholders})");

        for row in table.rows() {
            let mut query = sqlx::query(&insert_sql);
            for cell in row {
                query = bind_cell(query, cell);
            }
            query.execute(&mut *tx).await?;
        }
        tx.commit().await?;

        debug!(table = name, rows = table.row_count(), "Saved loose table");
        Ok(table.row_count() as u64)
    }

    /// Read a whole stored table back as a loose table.
    ///
    /// An empty table comes back with no columns; callers treating emptiness
    /// specially (reports) check `is_empty` first.
    pub async fn read_table(&self, table_name: &str) -> Result<Table> {
        let name = check_table_name(table_name)?;
        let rows = sqlx::query(&format!("SELECT * FROM {name}"))
            .fetch_all(&self.pool)
            .await?;
        Ok(table_from_rows(&rows))
    }

    /// Run a read-only query and return the result as a loose table.
    ///
    /// The statement is checked by the read-only guard first; anything that is
    /// not a single SELECT/WITH statement is rejected.
    pub async fn query_to_table(&self, sql: &str) -> Result<Table> {
        crate::sql_guard::validate_read_only(sql)?;
        let rows = sqlx::query(sql).fetch_all(&self.pool).await?;
        Ok(table_from_rows(&rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn staging() -> Table {
        let mut t = Table::new(vec!["name".into(), "amount".into()]);
        t.push_row(vec![Cell::Text("alpha".into()), Cell::Int(3)]);
        t.push_row(vec![Cell::Text("beta".into()), Cell::Real(1.5)]);
        t
    }

    #[tokio::test]
    async fn save_and_read_round_trip() {
        let tmp = TempDir::new().unwrap();
        let db = CaseDb::open(tmp.path().join("test.db")).await.unwrap();

        db.save_table(&staging(), "excel_import", WriteMode::Append)
            .await
            .unwrap();

        let out = db.read_table("excel_import").await.unwrap();
        assert_eq!(out.row_count(), 2);
        assert_eq!(out.cell(0, "name"), &Cell::Text("alpha".into()));
        assert_eq!(out.cell(0, "amount"), &Cell::Int(3));
        assert_eq!(out.cell(1, "amount"), &Cell::Real(1.5));
        db.close().await;
    }

    #[tokio::test]
    async fn append_vs_replace() {
        let tmp = TempDir::new().unwrap();
        let db = CaseDb::open(tmp.path().join("test.db")).await.unwrap();

        db.save_table(&staging(), "manual_inputs", WriteMode::Append)
            .await
            .unwrap();
        db.save_table(&staging(), "manual_inputs", WriteMode::Append)
            .await
            .unwrap();
        assert_eq!(db.read_table("manual_inputs").await.unwrap().row_count(), 4);

        db.save_table(&staging(), "manual_inputs", WriteMode::Replace)
            .await
            .unwrap();
        assert_eq!(db.read_table("manual_inputs").await.unwrap().row_count(), 2);
        db.close().await;
    }

    #[tokio::test]
    async fn rejects_bad_table_name() {
        let tmp = TempDir::new().unwrap();
        let db = CaseDb::open(tmp.path().join("test.db")).await.unwrap();

        let err = db
            .save_table(&staging(), "bad name; drop", WriteMode::Append)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::InvalidIdentifier(_)));
        db.close().await;
    }

    #[tokio::test]
    async fn query_to_table_rejects_writes() {
        let tmp = TempDir::new().unwrap();
        let db = CaseDb::open(tmp.path().join("test.db")).await.unwrap();

        let err = db.query_to_table("DELETE FROM cases").await.unwrap_err();
        assert!(matches!(err, DbError::RejectedQuery(_)));

        let out = db
            .query_to_table("SELECT COUNT(*) AS n FROM cases")
            .await
            .unwrap();
        assert_eq!(out.cell(0, "n"), &Cell::Int(0));
        db.close().await;
    }
}
