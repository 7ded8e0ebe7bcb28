//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::debug;

use super::{PdfProcessor, Result};
use crate::error::PdfError;

/// Loads invoices with lopdf and reads their text with pdf-extract.
///
/// Only the (decrypted) payload and its page count are kept between
/// `load` and `extract_text`.
#[derive(Debug, Default)]
pub struct PdfExtractor {
    payload: Vec<u8>,
    pages: u32,
}

impl PdfExtractor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        let pages = u32::try_from(doc.get_pages().len()).unwrap_or(u32::MAX);
        if pages == 0 {
            return Err(PdfError::NoPages);
        }

        let payload = if doc.is_encrypted() {
            // Carrier invoices ship with an empty user password
            doc.decrypt("").map_err(|_| PdfError::Encrypted)?;
            let mut plain = Vec::new();
            doc.save_to(&mut plain)
                .map_err(|e| PdfError::Parse(format!("re-encoding decrypted PDF: {e}")))?;
            plain
        } else {
            data.to_vec()
        };

        debug!("Loaded PDF: {} pages, {} bytes", pages, payload.len());
        self.payload = payload;
        self.pages = pages;
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.pages
    }

    fn extract_text(&self) -> Result<String> {
        if self.payload.is_empty() {
            return Err(PdfError::Parse("no document loaded".to_string()));
        }
        pdf_extract::extract_text_from_mem(&self.payload)
            .map_err(|e| PdfError::TextExtraction(e.to_string()))
    }
}
