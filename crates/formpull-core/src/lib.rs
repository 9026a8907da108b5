pub mod batch;
pub mod error;
pub mod export;
pub mod extraction;
pub mod model;
pub mod orchestrator;
pub mod patterns;
pub mod transfer;

use error::FormpullError;
use model::ExtractionResult;
use orchestrator::PdfDataExtractor;
use patterns::FieldPatterns;
use std::path::Path;

/// Main API entry point: extract form fields, text, scalar fields and the
/// first table from one PDF using the default backend stack.
///
/// `field_patterns` replaces the built-in pattern set when given. Returns
/// an error only when the path is missing or not a PDF.
pub fn extract_all(
    pdf_path: &Path,
    field_patterns: Option<&FieldPatterns>,
) -> Result<ExtractionResult, FormpullError> {
    let extractor = PdfDataExtractor::default();
    match field_patterns {
        Some(patterns) => extractor.extract(pdf_path, patterns),
        None => extractor.extract(pdf_path, &FieldPatterns::default()),
    }
}
