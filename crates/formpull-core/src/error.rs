use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum FormpullError {
    #[error("PDF file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("file is not a PDF: {}", path.display())]
    NotPdf { path: PathBuf },

    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("invalid pattern for field '{field}': {reason}")]
    PatternInvalid { field: String, reason: String },

    #[error("failed to load field patterns from {path}: {reason}")]
    PatternLoad { path: PathBuf, reason: String },

    #[error("failed to write workbook: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<lopdf::Error> for FormpullError {
    fn from(e: lopdf::Error) -> Self {
        FormpullError::Extraction(e.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for FormpullError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        FormpullError::Export(e.to_string())
    }
}
