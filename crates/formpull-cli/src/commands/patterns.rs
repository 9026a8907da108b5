use formpull_core::error::FormpullError;
use formpull_core::patterns::{FieldPatterns, DEFAULT_FIELD_PATTERNS};
use std::path::Path;

pub fn list() -> Result<(), FormpullError> {
    println!("Built-in field patterns (case-insensitive, group 1 is the value):\n");
    let width = DEFAULT_FIELD_PATTERNS
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(8);
    for (name, pattern) in DEFAULT_FIELD_PATTERNS {
        println!("  {:<width$}  {}", name, pattern, width = width);
    }
    println!();
    println!("A custom file is a JSON object of field name -> regex and replaces");
    println!("this set entirely. Example:");
    println!();
    println!(r#"  {{ "name": "Name:\\s*([^\\n]+)", "policy": "Policy No\\.?\\s*(\\d+)" }}"#);
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), FormpullError> {
    let patterns = FieldPatterns::load(file)?;

    println!("Pattern file '{}' is valid.", file.display());
    println!("  Fields: {}", patterns.len());
    for p in patterns.iter() {
        println!("    {}: {}", p.name(), p.source());
    }

    if patterns.is_empty() {
        println!("\nWarnings:");
        println!("  - no patterns defined; extracted_data will always be empty");
    }

    Ok(())
}
