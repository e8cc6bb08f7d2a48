//! The strict case record and the normalization rules shared by every
//! ingestion path.

use crate::table::Cell;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Full column set of the `cases` table, in storage order.
pub const CASE_COLUMNS: [&str; 10] = [
    "date",
    "complainant",
    "accused",
    "offences",
    "subject",
    "court_heard_in",
    "submitted",
    "submitted_documents",
    "last_court_date",
    "next_court_date",
];

/// Columns that must be non-null and non-blank after normalization.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "date",
    "complainant",
    "accused",
    "offences",
    "subject",
    "court_heard_in",
    "submitted",
];

/// Free-text columns whose blank values normalize to null.
pub const FREE_TEXT_COLUMNS: [&str; 6] = [
    "complainant",
    "accused",
    "offences",
    "subject",
    "court_heard_in",
    "submitted_documents",
];

/// Date columns stored as ISO `YYYY-MM-DD` text.
pub const DATE_COLUMNS: [&str; 3] = ["date", "last_court_date", "next_court_date"];

/// Controlled list offered by the interactive `add` flow. Storage does not
/// enforce it; "Other" lets the user type any court name.
pub const COURT_CHOICES: [&str; 5] = [
    "Magistrates Court",
    "High Court",
    "Family Court",
    "Local Court",
    "Other",
];

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];

/// One validated case row, ready for append-only storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub date: NaiveDate,
    pub complainant: String,
    pub accused: String,
    pub offences: String,
    pub subject: String,
    pub court_heard_in: String,
    pub submitted: bool,
    pub submitted_documents: Option<String>,
    pub last_court_date: Option<NaiveDate>,
    pub next_court_date: Option<NaiveDate>,
}

/// Parse a calendar date from a loose cell. Unparseable values are `None`,
/// never an error; required-field checks run on the parsed value.
pub fn parse_case_date(cell: &Cell) -> Option<NaiveDate> {
    let text = cell.as_text()?;
    // A datetime string still counts as its date part.
    let date_part = text.split_whitespace().next().unwrap_or(&text);
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// Coerce a loose cell to the 0/1 submitted flag.
///
/// Case-insensitive {"1", "true", "yes", "y"} map to true; everything else,
/// including null, maps to false.
pub fn submitted_flag(cell: &Cell) -> bool {
    match cell {
        Cell::Null => false,
        Cell::Int(i) => *i == 1,
        Cell::Real(f) => *f == 1.0,
        Cell::Text(s) => {
            matches!(s.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "y")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submitted_flag_truth_table() {
        for raw in ["1", "true", "yes", "y", "Y", "TRUE", " Yes "] {
            assert!(submitted_flag(&Cell::Text(raw.into())), "{raw:?}");
        }
        for raw in ["0", "no", "n", "false", "", "maybe", "2"] {
            assert!(!submitted_flag(&Cell::Text(raw.into())), "{raw:?}");
        }
        assert!(!submitted_flag(&Cell::Null));
        assert!(submitted_flag(&Cell::Int(1)));
        assert!(!submitted_flag(&Cell::Int(0)));
    }

    #[test]
    fn date_parsing_accepts_common_formats() {
        let expect = NaiveDate::from_ymd_opt(2025, 11, 24).unwrap();
        for raw in ["2025-11-24", "2025/11/24", "24/11/2025", "2025-11-24 10:30:00"] {
            assert_eq!(parse_case_date(&Cell::Text(raw.into())), Some(expect), "{raw:?}");
        }
    }

    #[test]
    fn date_parsing_rejects_garbage() {
        for raw in ["not-a-date", "2025-13-40", ""] {
            assert_eq!(parse_case_date(&Cell::Text(raw.into())), None, "{raw:?}");
        }
        assert_eq!(parse_case_date(&Cell::Null), None);
    }
}
