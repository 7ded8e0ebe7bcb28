//! Core library for invoice amount reconciliation.
//!
//! This crate provides:
//! - Amount lookup for shipment identifiers in invoice text
//! - Spreadsheet grouping with separator and subtotal rows
//! - xlsx decoding/encoding and PDF text extraction around both

pub mod error;
pub mod invoice;
pub mod models;
pub mod pdf;
pub mod sheet;

pub use error::{Result, TallyError};
pub use invoice::{Document, LocatedAmount, TextAmountLocator};
pub use models::config::TallyConfig;
pub use models::grid::{Cell, SpreadsheetGrid};
pub use pdf::{PdfExtractor, PdfProcessor};
pub use sheet::{GroupRequest, MergeUpdate, ReconciliationMerger, SpreadsheetGrouper};

use models::config::GroupingConfig;
use pdf::extract_document_text;
use sheet::{read_workbook, write_workbook};
use tracing::info;

/// Output of a reconciliation run.
#[derive(Debug, Clone)]
pub struct ReconcileOutput {
    /// Updated xlsx payload.
    pub workbook: Vec<u8>,
    /// Amounts written, in row order.
    pub updates: Vec<MergeUpdate>,
}

/// Group the first sheet of an xlsx payload and re-encode it.
pub fn group_workbook(
    workbook: &[u8],
    request: &GroupRequest,
    config: &GroupingConfig,
) -> Result<Vec<u8>> {
    if workbook.is_empty() || request.reference_column.is_empty() {
        return Err(TallyError::MissingInput(
            "a workbook and a reference column are required".into(),
        ));
    }

    let grid = read_workbook(workbook)?;
    let grouped = SpreadsheetGrouper::new(config.clone()).group(grid, request)?;
    Ok(write_workbook(&grouped)?)
}

/// Fill the amount column of an xlsx payload from already extracted text.
pub fn reconcile_text(
    workbook: &[u8],
    document: &Document,
    config: &TallyConfig,
) -> Result<ReconcileOutput> {
    if workbook.is_empty() {
        return Err(TallyError::MissingInput("a workbook is required".into()));
    }

    let merger = ReconciliationMerger::new(
        &config.reconcile,
        TextAmountLocator::from_config(&config.locator),
    )?;

    let mut grid = read_workbook(workbook)?;
    let updates = merger.merge(&mut grid, document);

    Ok(ReconcileOutput {
        workbook: write_workbook(&grid)?,
        updates,
    })
}

/// Extract the text of every PDF, in order, and reconcile the workbook
/// against their concatenation.
///
/// Document order is significant: the first document mentioning an
/// identifier supplies its amount.
pub fn reconcile_workbook(
    workbook: &[u8],
    documents: &[&[u8]],
    processor: &mut dyn PdfProcessor,
    config: &TallyConfig,
) -> Result<ReconcileOutput> {
    if workbook.is_empty() || documents.is_empty() {
        return Err(TallyError::MissingInput(
            "at least one PDF and one workbook are required".into(),
        ));
    }

    let mut texts = Vec::with_capacity(documents.len());
    for data in documents {
        texts.push(extract_document_text(processor, data)?);
    }
    info!("Extracted text from {} documents", texts.len());

    reconcile_text(workbook, &Document::concat(&texts), config)
}
