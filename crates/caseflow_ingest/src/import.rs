//! The import orchestrator: file in, validated rows appended, count out.

use crate::error::Result;
use crate::read::read_table_file;
use crate::validate::clean_and_validate;
use caseflow_db::CaseDb;
use std::path::Path;
use tracing::info;

/// Import a filled template file into an open database.
///
/// Reads the file by extension, validates the whole batch (failures propagate
/// verbatim, nothing is inserted), then appends the rows. The only filesystem
/// effect is reading the input; moving files around is the scheduler's job.
pub async fn import_template(path: &Path, db: &CaseDb) -> Result<u64> {
    let table = read_table_file(path, None)?;
    let records = clean_and_validate(&table)?;
    let inserted = db.insert_cases(&records).await?;
    info!(file = %path.display(), rows = inserted, "Imported template");
    Ok(inserted)
}

/// Convenience wrapper opening (and schema-checking) the database itself.
///
/// Reads and validates before touching storage, so a rejected batch leaves no
/// empty database behind.
pub async fn import_template_into(path: &Path, db_path: &Path) -> Result<u64> {
    let table = read_table_file(path, None)?;
    let records = clean_and_validate(&table)?;
    let db = CaseDb::open(db_path).await?;
    let inserted = db.insert_cases(&records).await?;
    db.close().await;
    info!(file = %path.display(), rows = inserted, "Imported template");
    Ok(inserted)
}
