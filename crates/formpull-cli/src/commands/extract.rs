use formpull_core::batch;
use formpull_core::error::FormpullError;
use formpull_core::extraction::pdftotext::PdftotextExtractor;
use formpull_core::orchestrator::{OrchestratorConfig, PdfDataExtractor};
use formpull_core::patterns::FieldPatterns;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::output;

pub fn run(
    input: PathBuf,
    output_dir: PathBuf,
    pattern_file: Option<PathBuf>,
    pdftotext_bin: PathBuf,
    output_format: &str,
) -> Result<(), FormpullError> {
    // Custom patterns replace the defaults wholesale.
    let patterns = match pattern_file {
        Some(path) => {
            let patterns = FieldPatterns::load(&path)?;
            info!(file = %path.display(), count = patterns.len(), "loaded custom field patterns");
            patterns
        }
        None => FieldPatterns::default(),
    };

    let config = OrchestratorConfig { pdftotext_bin };
    if !PdftotextExtractor::with_binary(config.pdftotext_bin.clone()).is_available() {
        warn!(
            binary = %config.pdftotext_bin.display(),
            "pdftotext not available, layout text extraction will fall back to page text"
        );
    }
    let extractor = PdfDataExtractor::new(&config);

    if input.is_dir() {
        let summary = batch::process_batch(&extractor, &input, &output_dir, &patterns)?;
        match output_format {
            "json" => output::json::print(&summary)?,
            _ => println!("{}", output::table::format_batch(&summary)),
        }
        return Ok(());
    }

    let (result, json_path) = batch::extract_to_dir(&extractor, &input, &output_dir, &patterns)?;
    match output_format {
        "json" => output::json::print(&result)?,
        _ => println!("{}", output::table::format_result(&result)),
    }
    eprintln!("Extracted data saved to {}", json_path.display());

    Ok(())
}
