//! The validator/normalizer: loose table in, validated case records out.
//!
//! Two passes, two strictness levels:
//!
//! 1. Structural: all required columns must be present. Fails fast, naming
//!    exactly the missing columns, before any row is looked at.
//! 2. Per-row: required fields must be non-null and non-blank after
//!    normalization. Failures are aggregated across the whole batch so the
//!    caller sees every defect in one pass.
//!
//! The function is pure and idempotent: no side effects, and validating its
//! own output again yields the same records.

use crate::error::{IngestError, Result};
use caseflow_model::{
    parse_case_date, submitted_flag, CaseRecord, Table, REQUIRED_COLUMNS,
};

/// Clean and validate a batch of case rows.
///
/// The whole batch is rejected on any failure; there is no partial result.
pub fn clean_and_validate(table: &Table) -> Result<Vec<CaseRecord>> {
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|col| !table.has_column(col))
        .map(|col| col.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(IngestError::MissingColumns(missing));
    }

    let mut errors = Vec::new();
    let mut records = Vec::with_capacity(table.row_count());
    for row in 0..table.row_count() {
        match build_record(table, row) {
            Ok(record) => records.push(record),
            Err(mut row_errors) => errors.append(&mut row_errors),
        }
    }

    if !errors.is_empty() {
        return Err(IngestError::Validation(errors));
    }
    Ok(records)
}

/// Normalize one row and check its required fields, collecting every error.
fn build_record(table: &Table, row: usize) -> std::result::Result<CaseRecord, Vec<String>> {
    let mut errors = Vec::new();

    // `date` is validated on the post-parse value: an unparseable string is
    // as empty as a blank cell.
    let date = parse_case_date(table.cell(row, "date"));
    if date.is_none() {
        errors.push(empty_field(row, "date"));
    }

    let mut text_field = |column: &str| {
        let value = table.cell(row, column).as_text();
        if value.is_none() {
            errors.push(empty_field(row, column));
        }
        value
    };
    let complainant = text_field("complainant");
    let accused = text_field("accused");
    let offences = text_field("offences");
    let subject = text_field("subject");
    let court_heard_in = text_field("court_heard_in");

    // Coercion makes `submitted` 0 or 1 no matter the input, so it can never
    // fail the required-field check.
    let submitted = submitted_flag(table.cell(row, "submitted"));

    let submitted_documents = table.cell(row, "submitted_documents").as_text();
    let last_court_date = parse_case_date(table.cell(row, "last_court_date"));
    let next_court_date = parse_case_date(table.cell(row, "next_court_date"));

    let (Some(date), Some(complainant), Some(accused), Some(offences), Some(subject), Some(court_heard_in)) =
        (date, complainant, accused, offences, subject, court_heard_in)
    else {
        return Err(errors);
    };

    Ok(CaseRecord {
        date,
        complainant,
        accused,
        offences,
        subject,
        court_heard_in,
        submitted,
        submitted_documents,
        last_court_date,
        next_court_date,
    })
}

fn empty_field(row: usize, column: &str) -> String {
    format!("Row {row}: required field '{column}' is empty")
}
