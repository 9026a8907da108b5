use formpull_core::error::FormpullError;
use formpull_core::transfer;
use std::path::Path;

pub fn run(json_dir: &Path, output_file: &Path) -> Result<(), FormpullError> {
    let records = transfer::collect_records(json_dir)?;
    let written = transfer::write_records(output_file, &records)?;

    if written == 0 {
        eprintln!("No data to export from {}", json_dir.display());
    } else {
        eprintln!(
            "Transferred {} record(s) to {}",
            written,
            output_file.display()
        );
    }
    Ok(())
}
