//! Error types for the tally-core library.

use thiserror::Error;

/// Main error type for the tally library.
#[derive(Error, Debug)]
pub enum TallyError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Spreadsheet processing error.
    #[error("spreadsheet error: {0}")]
    Sheet(#[from] SheetError),

    /// A required input was not supplied.
    #[error("missing input: {0}")]
    MissingInput(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF text extraction.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text from PDF: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,
}

/// Errors related to spreadsheet grids and workbook payloads.
#[derive(Error, Debug)]
pub enum SheetError {
    /// Column label is empty or contains non-letter characters.
    #[error("invalid column label: {0:?}")]
    InvalidColumnLabel(String),

    /// Totals were requested without a usable total column.
    #[error("totals requested but no total column given")]
    MissingTotalColumn,

    /// The workbook payload could not be decoded.
    #[error("failed to read workbook: {0}")]
    Read(String),

    /// The workbook payload could not be encoded.
    #[error("failed to write workbook: {0}")]
    Write(String),

    /// The workbook has no worksheet.
    #[error("workbook contains no sheets")]
    NoSheets,
}

/// Errors related to amount extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// A matched amount token is not a valid number.
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),
}

/// Result type for the tally library.
pub type Result<T> = std::result::Result<T, TallyError>;
