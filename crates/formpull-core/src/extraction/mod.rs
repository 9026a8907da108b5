pub mod acroform;
pub mod page_text;
pub mod pdftotext;
pub mod table;

use crate::error::FormpullError;
use crate::model::{ExtractionMethod, FormFields};
use std::path::Path;

/// Outcome of one backend attempt on one PDF.
///
/// Backends never return errors to the orchestrator; a failure is just
/// another outcome, carried with its reason for logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendOutcome<T> {
    Success(T),
    Empty,
    Failure(String),
}

impl BackendOutcome<String> {
    /// Classify backend text output. Whitespace-only text counts as empty.
    pub fn from_text(result: Result<String, FormpullError>) -> Self {
        match result {
            Ok(text) if text.trim().is_empty() => BackendOutcome::Empty,
            Ok(text) => BackendOutcome::Success(text),
            Err(e) => BackendOutcome::Failure(e.to_string()),
        }
    }
}

impl BackendOutcome<FormFields> {
    pub fn from_fields(result: Result<FormFields, FormpullError>) -> Self {
        match result {
            Ok(fields) if fields.is_empty() => BackendOutcome::Empty,
            Ok(fields) => BackendOutcome::Success(fields),
            Err(e) => BackendOutcome::Failure(e.to_string()),
        }
    }
}

/// A strategy that turns a PDF into plain text.
pub trait TextBackend: Send + Sync {
    /// Label recorded in the result when this backend supplies the text.
    fn method(&self) -> ExtractionMethod;

    fn extract_text(&self, pdf_path: &Path) -> BackendOutcome<String>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// A strategy that reads embedded fillable-field values from a PDF.
pub trait FormFieldBackend: Send + Sync {
    fn extract_fields(&self, pdf_path: &Path) -> BackendOutcome<FormFields>;

    fn backend_name(&self) -> &str;
}
