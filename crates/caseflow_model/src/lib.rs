//! Shared data model for Caseflow.
//!
//! Two representations of case data live here:
//!
//! - [`Table`] / [`Cell`]: a loose bag-of-columns table, the shape of anything
//!   freshly read from a CSV file, a spreadsheet, or a SQL query.
//! - [`CaseRecord`]: the strict, fully-normalized form that the validator
//!   produces and the `cases` table stores.
//!
//! The normalization primitives (`parse_case_date`, `submitted_flag`) are
//! defined once here so every path into storage coerces values identically.

mod case;
mod table;

pub use case::{
    parse_case_date, submitted_flag, CaseRecord, CASE_COLUMNS, COURT_CHOICES, DATE_COLUMNS,
    FREE_TEXT_COLUMNS, REQUIRED_COLUMNS,
};
pub use table::{Cell, Table};
