use crate::error::FormpullError;
use crate::extraction::{BackendOutcome, TextBackend};
use crate::model::ExtractionMethod;
use lopdf::Document;
use std::path::Path;
use tracing::{debug, warn};

/// Fallback text backend reading page content streams with lopdf.
///
/// No layout is preserved. Pages are concatenated in page order, each
/// followed by a blank line.
pub struct PageTextExtractor;

impl PageTextExtractor {
    pub fn new() -> Self {
        PageTextExtractor
    }

    pub fn read_text(&self, pdf_path: &Path) -> Result<String, FormpullError> {
        let doc = Document::load(pdf_path)?;
        let pages = doc.get_pages();
        debug!(path = %pdf_path.display(), page_count = pages.len(), "extracting page text");

        let mut text = String::new();
        for page_number in pages.keys() {
            match doc.extract_text(&[*page_number]) {
                Ok(page_text) => text.push_str(&page_text),
                Err(e) => {
                    warn!(page = page_number, error = %e, "failed to extract text from page, skipping");
                }
            }
            text.push_str("\n\n");
        }

        Ok(text)
    }
}

impl Default for PageTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBackend for PageTextExtractor {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::PageText
    }

    fn extract_text(&self, pdf_path: &Path) -> BackendOutcome<String> {
        BackendOutcome::from_text(self.read_text(pdf_path))
    }

    fn backend_name(&self) -> &str {
        "lopdf"
    }
}
