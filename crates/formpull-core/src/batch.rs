use crate::error::FormpullError;
use crate::export::{self, Record, COMBINED_FILENAME};
use crate::model::{ExtractionMethod, ExtractionResult};
use crate::orchestrator::{has_pdf_extension, PdfDataExtractor};
use crate::patterns::FieldPatterns;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize)]
pub struct BatchEntry {
    pub filename: String,
    pub json_path: PathBuf,
    pub methods: Vec<ExtractionMethod>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    pub filename: String,
    pub reason: String,
}

/// What a batch run produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    pub processed: Vec<BatchEntry>,
    pub failed: Vec<BatchFailure>,
    /// Combined workbook, written only when at least one file succeeded.
    pub combined_path: Option<PathBuf>,
}

impl BatchSummary {
    pub fn is_empty(&self) -> bool {
        self.processed.is_empty() && self.failed.is_empty()
    }
}

/// `<stem>_data.json` inside `output_dir`.
pub fn output_json_path(output_dir: &Path, pdf_path: &Path) -> PathBuf {
    let stem = pdf_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    output_dir.join(format!("{stem}_data.json"))
}

/// Save a result as pretty-printed JSON.
pub fn save_result(path: &Path, result: &ExtractionResult) -> Result<(), FormpullError> {
    let json = serde_json::to_string_pretty(result)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Extract one PDF and write its JSON next to the other outputs.
pub fn extract_to_dir(
    extractor: &PdfDataExtractor,
    pdf_path: &Path,
    output_dir: &Path,
    patterns: &FieldPatterns,
) -> Result<(ExtractionResult, PathBuf), FormpullError> {
    let result = extractor.extract(pdf_path, patterns)?;
    std::fs::create_dir_all(output_dir)?;
    let json_path = output_json_path(output_dir, pdf_path);
    save_result(&json_path, &result)?;
    Ok((result, json_path))
}

/// PDF files directly inside `dir` (case-insensitive `.pdf`), sorted by name.
pub fn list_pdfs(dir: &Path) -> Result<Vec<PathBuf>, FormpullError> {
    let mut pdfs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_pdf_extension(&path) {
            pdfs.push(path);
        }
    }
    pdfs.sort();
    Ok(pdfs)
}

/// Process every PDF in `pdf_dir`, writing one JSON per file and a
/// combined workbook to `output_dir`.
///
/// A file that fails its setup check is recorded in `failed` and the batch
/// moves on. An empty directory is not an error.
pub fn process_batch(
    extractor: &PdfDataExtractor,
    pdf_dir: &Path,
    output_dir: &Path,
    patterns: &FieldPatterns,
) -> Result<BatchSummary, FormpullError> {
    std::fs::create_dir_all(output_dir)?;

    let pdfs = list_pdfs(pdf_dir)?;
    let mut summary = BatchSummary::default();
    if pdfs.is_empty() {
        info!(dir = %pdf_dir.display(), "no PDF files found");
        return Ok(summary);
    }

    let mut rows: Vec<Record> = Vec::new();
    for pdf in &pdfs {
        let filename = pdf
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!(file = %filename, "processing");

        match extract_to_dir(extractor, pdf, output_dir, patterns) {
            Ok((result, json_path)) => {
                info!(file = %filename, output = %json_path.display(), "extracted data saved");
                rows.push(export::combined_row(&result));
                summary.processed.push(BatchEntry {
                    filename,
                    json_path,
                    methods: result.metadata.methods,
                });
            }
            Err(e) => {
                warn!(file = %filename, error = %e, "failed to process PDF");
                summary.failed.push(BatchFailure {
                    filename,
                    reason: e.to_string(),
                });
            }
        }
    }

    if !rows.is_empty() {
        let combined_path = output_dir.join(COMBINED_FILENAME);
        let columns = export::column_order(&rows);
        export::write_workbook(&combined_path, &columns, &rows)?;
        info!(output = %combined_path.display(), rows = rows.len(), "combined data saved");
        summary.combined_path = Some(combined_path);
    }

    Ok(summary)
}
