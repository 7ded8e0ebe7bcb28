//! In-memory spreadsheet grid.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::invoice::rules::amounts::{decimal_from_f64, parse_amount};

/// A single cell value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl Cell {
    pub fn text(s: impl Into<String>) -> Self {
        Cell::Text(s.into())
    }

    /// Numeric value of the cell, if it has one.
    ///
    /// Text is read as an amount, so "1,234.50" yields 1234.50.
    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            Cell::Number(n) => decimal_from_f64(*n),
            Cell::Text(s) => parse_amount(s).ok(),
            Cell::Empty | Cell::Bool(_) => None,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Empty => Ok(()),
            Cell::Text(s) => f.write_str(s),
            // Integers without decimals, as a spreadsheet shows them
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Bool(b) => f.write_str(if *b { "TRUE" } else { "FALSE" }),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

/// One row of cells.
pub type Row = Vec<Cell>;

/// Rows of one worksheet. Row 0 is the header.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpreadsheetGrid {
    /// Worksheet name, kept for re-encoding.
    pub sheet_name: String,
    rows: Vec<Row>,
}

static EMPTY: Cell = Cell::Empty;

impl SpreadsheetGrid {
    pub fn new(sheet_name: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            rows,
        }
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Width of the header row.
    pub fn header_width(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    /// Cell at (row, col); missing cells read as empty.
    pub fn get(&self, row: usize, col: usize) -> &Cell {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY)
    }

    /// Set a cell, growing the row with empty cells if needed.
    ///
    /// Does nothing if `row` is out of range.
    pub fn set(&mut self, row: usize, col: usize, cell: Cell) {
        if let Some(r) = self.rows.get_mut(row) {
            if r.len() <= col {
                r.resize(col + 1, Cell::Empty);
            }
            r[col] = cell;
        }
    }

    /// Append cells to the header row.
    pub fn extend_header<I: IntoIterator<Item = Cell>>(&mut self, cells: I) {
        if let Some(header) = self.rows.first_mut() {
            header.extend(cells);
        }
    }

    /// Pad every row with empty cells up to the header width.
    ///
    /// Rows wider than the header are left as they are.
    pub fn normalize(&mut self) {
        let width = self.header_width();
        for row in self.rows.iter_mut().skip(1) {
            if row.len() < width {
                row.resize(width, Cell::Empty);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_normalize_pads_to_header() {
        let mut grid = SpreadsheetGrid::new(
            "Sheet1",
            vec![
                vec!["a".into(), "b".into(), "c".into()],
                vec!["x".into()],
                vec![],
                vec!["1".into(), "2".into(), "3".into(), "4".into()],
            ],
        );
        grid.normalize();

        let widths: Vec<usize> = grid.rows().iter().map(Vec::len).collect();
        assert_eq!(widths, vec![3, 3, 3, 4]);
        assert_eq!(grid.get(1, 2), &Cell::Empty);
    }

    #[test]
    fn test_get_and_set() {
        let mut grid = SpreadsheetGrid::new("S", vec![vec!["h".into()], vec![]]);
        assert_eq!(grid.get(5, 5), &Cell::Empty);

        grid.set(1, 2, Cell::text("v"));
        assert_eq!(grid.rows()[1], vec![Cell::Empty, Cell::Empty, Cell::text("v")]);

        grid.set(9, 0, Cell::text("ignored"));
        assert_eq!(grid.len(), 2);
    }

    #[test]
    fn test_cell_display() {
        assert_eq!(Cell::Number(1234567890.0).to_string(), "1234567890");
        assert_eq!(Cell::Number(12.5).to_string(), "12.5");
        assert_eq!(Cell::Empty.to_string(), "");
        assert_eq!(Cell::Bool(true).to_string(), "TRUE");
    }

    #[test]
    fn test_cell_as_decimal() {
        assert_eq!(Cell::Number(12.5).as_decimal(), Some(dec!(12.5)));
        assert_eq!(Cell::text("1,234.50").as_decimal(), Some(dec!(1234.50)));
        assert_eq!(Cell::text("n/a").as_decimal(), None);
        assert_eq!(Cell::Empty.as_decimal(), None);
    }
}
