use crate::error::FormpullError;
use crate::extraction::{BackendOutcome, TextBackend};
use crate::model::ExtractionMethod;
use std::path::{Path, PathBuf};
use std::process::Command;

pub const DEFAULT_PDFTOTEXT_BIN: &str = "pdftotext";

/// PDF extraction backend using pdftotext (from poppler-utils).
///
/// Uses `pdftotext -layout` to preserve whitespace alignment of tables,
/// which the table parser relies on for column boundaries.
pub struct PdftotextExtractor {
    binary: PathBuf,
}

impl PdftotextExtractor {
    pub fn new() -> Self {
        Self::with_binary(DEFAULT_PDFTOTEXT_BIN)
    }

    pub fn with_binary(binary: impl Into<PathBuf>) -> Self {
        PdftotextExtractor {
            binary: binary.into(),
        }
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }

    fn run(&self, pdf_path: &Path) -> Result<String, FormpullError> {
        let output = Command::new(&self.binary)
            .arg("-layout")
            .arg(pdf_path)
            .arg("-") // output to stdout
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    FormpullError::PdftotextNotFound
                } else {
                    FormpullError::Extraction(format!("pdftotext failed: {}", e))
                }
            })?;

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Err(FormpullError::PdftotextFailed { code, stderr });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBackend for PdftotextExtractor {
    fn method(&self) -> ExtractionMethod {
        ExtractionMethod::Pdftotext
    }

    fn extract_text(&self, pdf_path: &Path) -> BackendOutcome<String> {
        BackendOutcome::from_text(self.run(pdf_path))
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}
