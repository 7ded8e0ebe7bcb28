//! Fill a spreadsheet's amount column from invoice text.

use tracing::{debug, info};

use super::column::column_to_index;
use crate::error::SheetError;
use crate::invoice::{Document, TextAmountLocator};
use crate::models::config::ReconcileConfig;
use crate::models::grid::{Cell, SpreadsheetGrid};

/// One amount written into the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeUpdate {
    /// Grid row that was updated.
    pub row: usize,
    /// Identifier searched for.
    pub identifier: String,
    /// Formatted amount written.
    pub amount: String,
}

/// Runs the locator over every data row of a grid.
pub struct ReconciliationMerger {
    locator: TextAmountLocator,
    identifier_index: usize,
    amount_index: usize,
    appended_headers: Vec<String>,
}

impl ReconciliationMerger {
    pub fn new(config: &ReconcileConfig, locator: TextAmountLocator) -> Result<Self, SheetError> {
        Ok(Self {
            locator,
            identifier_index: column_to_index(&config.identifier_column)?,
            amount_index: column_to_index(&config.amount_column)?,
            appended_headers: config.appended_headers.clone(),
        })
    }

    /// Write the located amount of each row's identifier into the amount column.
    ///
    /// Header cells from the configuration are appended first, then all
    /// rows are padded to the header width. Rows with an empty identifier
    /// or no match keep their amount cell unchanged.
    pub fn merge(&self, grid: &mut SpreadsheetGrid, document: &Document) -> Vec<MergeUpdate> {
        if !grid.is_empty() {
            grid.extend_header(self.appended_headers.iter().map(|h| Cell::text(h.as_str())));
        }
        grid.normalize();

        let mut updates = Vec::new();

        for row in 1..grid.len() {
            let identifier = grid.get(row, self.identifier_index).to_string();
            if identifier.is_empty() {
                continue;
            }

            if let Some(hit) = self.locator.locate(document, &identifier) {
                let amount = hit.formatted();
                debug!("Row {}: {} -> {}", row, identifier, amount);
                grid.set(row, self.amount_index, Cell::text(amount.as_str()));
                updates.push(MergeUpdate {
                    row,
                    identifier,
                    amount,
                });
            }
        }

        info!(
            "Matched {} of {} rows",
            updates.len(),
            grid.len().saturating_sub(1)
        );

        updates
    }
}
