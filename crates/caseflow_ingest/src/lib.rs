//! Ingestion pipeline for Caseflow: file readers, the validator/normalizer,
//! template creation, and the import orchestrator.
//!
//! The flow for a filled template is
//! `read_table_file` → `clean_and_validate` → `CaseDb::insert_cases`,
//! wired together by [`import_template`]. The readers and validator are pure
//! with respect to the filesystem and database.

mod error;
mod import;
mod read;
mod template;
mod validate;

pub use error::{IngestError, Result};
pub use import::{import_template, import_template_into};
pub use read::{read_csv, read_table_file, read_xlsx};
pub use template::{write_template, TemplateFormat};
pub use validate::clean_and_validate;
