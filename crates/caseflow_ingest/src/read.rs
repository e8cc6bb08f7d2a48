//! Readers turning input files into loose tables.
//!
//! Format is selected by file extension: `.xlsx` goes through the spreadsheet
//! reader, everything else through the CSV reader.

use crate::error::{IngestError, Result};
use calamine::{open_workbook, Data, Reader, Xlsx};
use caseflow_model::{Cell, Table};
use std::path::Path;

/// Read a CSV file with a header row. Blank cells become nulls.
pub fn read_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::Reader::from_path(path)?;
    let columns = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut table = Table::new(columns);
    for record in reader.records() {
        let record = record?;
        table.push_row(record.iter().map(Cell::from_text).collect());
    }
    Ok(table)
}

/// Read one sheet of an `.xlsx` workbook (first sheet when unnamed).
///
/// The first row is taken as the header row. Date cells are rendered as ISO
/// `YYYY-MM-DD` text so they flow through the same date parsing as CSV input.
pub fn read_xlsx(path: &Path, sheet: Option<&str>) -> Result<Table> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let sheet_name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| IngestError::EmptyWorkbook(path.display().to_string()))?,
    };
    let range = workbook.worksheet_range(&sheet_name)?;

    let mut rows = range.rows();
    let columns = match rows.next() {
        Some(header) => header.iter().map(header_text).collect(),
        None => Vec::new(),
    };

    let mut table = Table::new(columns);
    for row in rows {
        table.push_row(row.iter().map(cell_from_data).collect());
    }
    Ok(table)
}

/// Read a file as a loose table, dispatching on extension.
pub fn read_table_file(path: &Path, sheet: Option<&str>) -> Result<Table> {
    if has_extension(path, "xlsx") {
        read_xlsx(path, sheet)
    } else {
        read_csv(path)
    }
}

pub(crate) fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(ext))
}

fn header_text(data: &Data) -> String {
    match data {
        Data::String(s) => s.trim().to_string(),
        other => other.to_string().trim().to_string(),
    }
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Null,
        Data::String(s) => Cell::from_text(s),
        Data::Float(f) => Cell::Real(*f),
        Data::Int(i) => Cell::Int(*i),
        Data::Bool(b) => Cell::Int(*b as i64),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(when) => Cell::Text(when.date().format("%Y-%m-%d").to_string()),
            None => Cell::Null,
        },
        Data::DateTimeIso(s) => Cell::from_text(s),
        Data::DurationIso(s) => Cell::from_text(s),
        Data::Error(_) => Cell::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn csv_round_trip() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("input.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "date,complainant,notes").unwrap();
        writeln!(file, "2025-11-24,Alice,").unwrap();
        writeln!(file, " 2025-12-01 , Bob ,seen").unwrap();
        drop(file);

        let table = read_csv(&path).unwrap();
        assert_eq!(table.columns(), &["date", "complainant", "notes"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.cell(0, "notes"), &Cell::Null);
        assert_eq!(table.cell(1, "complainant"), &Cell::Text("Bob".into()));
    }

    #[test]
    fn dispatch_prefers_csv_for_unknown_extensions() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("input.dat");
        std::fs::write(&path, "a,b\n1,2\n").unwrap();

        let table = read_table_file(&path, None).unwrap();
        assert_eq!(table.columns(), &["a", "b"]);
    }

    #[test]
    fn extension_check_is_case_insensitive() {
        assert!(has_extension(Path::new("A.XLSX"), "xlsx"));
        assert!(has_extension(Path::new("a.Csv"), "csv"));
        assert!(!has_extension(Path::new("a.txt"), "csv"));
    }
}
