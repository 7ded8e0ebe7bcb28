//! Decode and encode xlsx payloads.
//!
//! Only the first worksheet is read; output payloads hold a single sheet
//! carrying the same name.

use std::io::Cursor;

use calamine::{Data, Reader, Xlsx};
use rust_xlsxwriter::{Workbook, XlsxError};
use tracing::debug;

use crate::error::SheetError;
use crate::models::grid::{Cell, Row, SpreadsheetGrid};

/// Read the first worksheet of an xlsx payload.
///
/// Empty rows above and columns to the left of the used range are kept so
/// that row numbers and column letters still line up. Trailing empty cells
/// are dropped from each row.
pub fn read_workbook(bytes: &[u8]) -> Result<SpreadsheetGrid, SheetError> {
    let cursor = Cursor::new(bytes);
    let mut workbook: Xlsx<_> = calamine::open_workbook_from_rs(cursor)
        .map_err(|e| SheetError::Read(format!("failed to open xlsx: {e}")))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(SheetError::NoSheets)?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| SheetError::Read(format!("sheet '{sheet_name}': {e}")))?;

    let (row_offset, col_offset) = range
        .start()
        .map(|(row, col)| (row as usize, col as usize))
        .unwrap_or((0, 0));

    let mut rows: Vec<Row> = vec![Vec::new(); row_offset];
    rows.extend(range.rows().map(|data| {
        let mut row = vec![Cell::Empty; col_offset];
        row.extend(data.iter().map(cell_from_data));
        while row.last().is_some_and(|c| *c == Cell::Empty) {
            row.pop();
        }
        row
    }));

    debug!("Read sheet '{}' with {} rows", sheet_name, rows.len());
    Ok(SpreadsheetGrid::new(sheet_name, rows))
}

/// Encode a grid as a one-sheet xlsx payload.
pub fn write_workbook(grid: &SpreadsheetGrid) -> Result<Vec<u8>, SheetError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    if !grid.sheet_name.is_empty() {
        worksheet.set_name(&grid.sheet_name).map_err(write_error)?;
    }

    for (r, row) in grid.rows().iter().enumerate() {
        let r = u32::try_from(r).map_err(|_| SheetError::Write(format!("row {r} out of range")))?;
        for (c, cell) in row.iter().enumerate() {
            let c = u16::try_from(c)
                .map_err(|_| SheetError::Write(format!("column {c} out of range")))?;
            match cell {
                Cell::Empty => {}
                Cell::Text(s) if s.is_empty() => {}
                Cell::Text(s) => {
                    worksheet.write_string(r, c, s).map_err(write_error)?;
                }
                Cell::Number(n) => {
                    worksheet.write_number(r, c, *n).map_err(write_error)?;
                }
                Cell::Bool(b) => {
                    worksheet.write_boolean(r, c, *b).map_err(write_error)?;
                }
            }
        }
    }

    workbook.save_to_buffer().map_err(write_error)
}

fn write_error(e: XlsxError) -> SheetError {
    SheetError::Write(e.to_string())
}

fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Empty,
        Data::String(s) if s.is_empty() => Cell::Empty,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(e) => Cell::Text(e.to_string()),
    }
}
