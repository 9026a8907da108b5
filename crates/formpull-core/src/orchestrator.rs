use crate::error::FormpullError;
use crate::extraction::acroform::AcroFormExtractor;
use crate::extraction::page_text::PageTextExtractor;
use crate::extraction::pdftotext::{PdftotextExtractor, DEFAULT_PDFTOTEXT_BIN};
use crate::extraction::table::extract_table;
use crate::extraction::{BackendOutcome, FormFieldBackend, TextBackend};
use crate::model::{ExtractionMethod, ExtractionResult};
use crate::patterns::FieldPatterns;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Settings for the default backend stack.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// pdftotext executable, looked up on PATH when not absolute.
    pub pdftotext_bin: PathBuf,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            pdftotext_bin: PathBuf::from(DEFAULT_PDFTOTEXT_BIN),
        }
    }
}

/// Runs the extraction backends against one PDF and assembles the result.
///
/// The form-field backend always runs. Text backends run in list order
/// and the first one producing text wins; its text alone feeds the field
/// patterns and the table parser.
pub struct PdfDataExtractor {
    form_backend: Box<dyn FormFieldBackend>,
    text_backends: Vec<Box<dyn TextBackend>>,
}

impl PdfDataExtractor {
    /// Default stack: AcroForm fields, then pdftotext, then lopdf page text.
    pub fn new(config: &OrchestratorConfig) -> Self {
        let text_backends: Vec<Box<dyn TextBackend>> = vec![
            Box::new(PdftotextExtractor::with_binary(config.pdftotext_bin.clone())),
            Box::new(PageTextExtractor::new()),
        ];
        Self::with_backends(Box::new(AcroFormExtractor::new()), text_backends)
    }

    pub fn with_backends(
        form_backend: Box<dyn FormFieldBackend>,
        text_backends: Vec<Box<dyn TextBackend>>,
    ) -> Self {
        Self {
            form_backend,
            text_backends,
        }
    }

    /// Extract everything from one PDF.
    ///
    /// Only setup errors (missing file, not a PDF) are returned; backend
    /// failures are logged and leave their part of the result empty.
    pub fn extract(
        &self,
        pdf_path: &Path,
        patterns: &FieldPatterns,
    ) -> Result<ExtractionResult, FormpullError> {
        check_input(pdf_path)?;

        let mut result = ExtractionResult::new(pdf_path);

        match self.form_backend.extract_fields(pdf_path) {
            BackendOutcome::Success(fields) => {
                debug!(path = %pdf_path.display(), count = fields.len(), "form fields extracted");
                result.form_fields = fields;
                result.metadata.methods.push(ExtractionMethod::FormFields);
            }
            BackendOutcome::Empty => {
                debug!(path = %pdf_path.display(), "no form fields found");
            }
            BackendOutcome::Failure(reason) => {
                warn!(
                    path = %pdf_path.display(),
                    backend = self.form_backend.backend_name(),
                    error = %reason,
                    "form field extraction failed"
                );
            }
        }

        for backend in &self.text_backends {
            match backend.extract_text(pdf_path) {
                BackendOutcome::Success(text) => {
                    debug!(
                        path = %pdf_path.display(),
                        backend = backend.backend_name(),
                        chars = text.len(),
                        "text extracted"
                    );
                    result.extracted_data = patterns.match_text(&text);
                    result.table_data = extract_table(&text);
                    result.text_content = text;
                    result.metadata.methods.push(backend.method());
                    break;
                }
                BackendOutcome::Empty => {
                    debug!(
                        path = %pdf_path.display(),
                        backend = backend.backend_name(),
                        "backend produced no text, trying next"
                    );
                }
                BackendOutcome::Failure(reason) => {
                    warn!(
                        path = %pdf_path.display(),
                        backend = backend.backend_name(),
                        error = %reason,
                        "text extraction failed, trying next"
                    );
                }
            }
        }

        if result.text_content.is_empty() {
            debug!(path = %pdf_path.display(), "no text backend produced output");
        }

        Ok(result)
    }
}

impl Default for PdfDataExtractor {
    fn default() -> Self {
        Self::new(&OrchestratorConfig::default())
    }
}

/// Fail fast on inputs no backend should see.
pub fn check_input(pdf_path: &Path) -> Result<(), FormpullError> {
    if !pdf_path.exists() {
        return Err(FormpullError::NotFound {
            path: pdf_path.to_path_buf(),
        });
    }
    if !has_pdf_extension(pdf_path) {
        return Err(FormpullError::NotPdf {
            path: pdf_path.to_path_buf(),
        });
    }
    Ok(())
}

/// True when the file name ends in `.pdf`, ignoring case. A bare `.pdf`
/// name counts, although `Path::extension` sees no extension there.
pub fn has_pdf_extension(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase().ends_with(".pdf"))
        .unwrap_or(false)
}
