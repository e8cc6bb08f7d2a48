//! Loose tabular data: a named column set plus rows of weakly-typed cells.

use serde::{Deserialize, Serialize};

/// A single weakly-typed cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Null,
    Text(String),
    Int(i64),
    Real(f64),
}

impl Cell {
    /// Build a cell from raw text: blank input becomes `Null`, never an empty string.
    pub fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Cell::Null
        } else {
            Cell::Text(trimmed.to_string())
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Textual view of the cell, with blank text treated as absent.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Null => None,
            Cell::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            }
            Cell::Int(i) => Some(i.to_string()),
            Cell::Real(f) => Some(f.to_string()),
        }
    }

    /// Numeric view of the cell, parsing text where possible.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Null => None,
            Cell::Int(i) => Some(*i as f64),
            Cell::Real(f) => Some(*f),
            Cell::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }
}

/// A loose in-memory table: arbitrary columns, rows of [`Cell`] values.
///
/// Rows are padded or truncated to the column count on insert, so every row
/// always has exactly `columns.len()` cells.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Append a row, padding missing cells with `Null` and dropping extras.
    pub fn push_row(&mut self, mut cells: Vec<Cell>) {
        cells.resize(self.columns.len(), Cell::Null);
        self.rows.push(cells);
    }

    /// Cell at (row, column name); `Null` when the column is absent.
    pub fn cell(&self, row: usize, column: &str) -> &Cell {
        self.column_index(column)
            .and_then(|idx| self.rows.get(row).map(|r| &r[idx]))
            .unwrap_or(&Cell::Null)
    }

    /// Add a column filled with `Null` if it is not already present.
    pub fn backfill_column(&mut self, name: &str) {
        if self.has_column(name) {
            return;
        }
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.push(Cell::Null);
        }
    }

    /// All values of one column, in row order. Empty when the column is absent.
    pub fn column_values(&self, name: &str) -> Vec<&Cell> {
        match self.column_index(name) {
            Some(idx) => self.rows.iter().map(|r| &r[idx]).collect(),
            None => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut t = Table::new(vec!["a".into(), "b".into()]);
        t.push_row(vec![Cell::Text("x".into()), Cell::Int(1)]);
        t.push_row(vec![Cell::Null]);
        t
    }

    #[test]
    fn push_row_pads_and_truncates() {
        let mut t = sample();
        assert_eq!(t.rows()[1], vec![Cell::Null, Cell::Null]);

        t.push_row(vec![Cell::Int(1), Cell::Int(2), Cell::Int(3)]);
        assert_eq!(t.rows()[2].len(), 2);
    }

    #[test]
    fn cell_lookup_handles_missing_column() {
        let t = sample();
        assert_eq!(t.cell(0, "a"), &Cell::Text("x".into()));
        assert_eq!(t.cell(0, "nope"), &Cell::Null);
    }

    #[test]
    fn backfill_adds_null_column_once() {
        let mut t = sample();
        t.backfill_column("c");
        t.backfill_column("c");
        assert_eq!(t.columns(), &["a", "b", "c"]);
        assert!(t.rows().iter().all(|r| r[2] == Cell::Null));
    }

    #[test]
    fn blank_text_normalizes_to_null() {
        assert_eq!(Cell::from_text("   "), Cell::Null);
        assert_eq!(Cell::from_text(" hi "), Cell::Text("hi".into()));
        assert_eq!(Cell::Text("  ".into()).as_text(), None);
    }
}
