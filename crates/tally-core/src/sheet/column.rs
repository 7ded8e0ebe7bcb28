//! Conversion between spreadsheet column labels and zero-based indices.

use crate::error::SheetError;

/// Number of columns in an xlsx worksheet; the last one is "XFD".
pub const MAX_COLUMNS: usize = 16_384;

/// Convert a column label ("A", "z", "AA") to a zero-based index.
///
/// Letters are case-insensitive. Each position is a base-26 digit with
/// 'A' = 1, so "A" -> 0, "Z" -> 25, "AA" -> 26. Labels past "XFD" are
/// rejected.
pub fn column_to_index(label: &str) -> Result<usize, SheetError> {
    let invalid = || SheetError::InvalidColumnLabel(label.to_string());

    if label.is_empty() {
        return Err(invalid());
    }

    let mut value: usize = 0;
    for c in label.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(invalid());
        }
        let digit = (c.to_ascii_uppercase() as u8 - b'A' + 1) as usize;
        value = value * 26 + digit;
        if value > MAX_COLUMNS {
            return Err(invalid());
        }
    }

    Ok(value - 1)
}

/// Convert a zero-based column index back to its uppercase label.
pub fn index_to_column(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;

    while n > 0 {
        let rem = (n - 1) % 26;
        letters.push((b'A' + rem as u8) as char);
        n = (n - 1) / 26;
    }

    letters.iter().rev().collect()
}
