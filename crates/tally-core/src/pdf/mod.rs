//! PDF text extraction.

mod extractor;

pub use extractor::PdfExtractor;

use tracing::debug;

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF processing implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract text from the entire PDF.
    fn extract_text(&self) -> Result<String>;
}

/// Load a payload and return its text.
pub fn extract_document_text(processor: &mut dyn PdfProcessor, data: &[u8]) -> Result<String> {
    processor.load(data)?;
    let text = processor.extract_text()?;
    debug!(
        "Extracted {} lines from {} pages",
        text.lines().count(),
        processor.page_count()
    );
    Ok(text)
}
