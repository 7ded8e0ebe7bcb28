//! Spreadsheet transformations and the xlsx container.

pub mod column;
mod grouper;
mod merger;
pub mod workbook;

pub use column::{column_to_index, index_to_column, MAX_COLUMNS};
pub use grouper::{GroupRequest, SpreadsheetGrouper, SEPARATOR_ROWS};
pub use merger::{MergeUpdate, ReconciliationMerger};
pub use workbook::{read_workbook, write_workbook};
