use formpull_core::batch::BatchSummary;
use formpull_core::model::ExtractionResult;
use std::fmt::Write;

pub fn format_result(result: &ExtractionResult) -> String {
    let mut out = String::new();
    let methods = if result.metadata.methods.is_empty() {
        "none".to_string()
    } else {
        result.metadata.methods_joined()
    };

    writeln!(out, "=== {} ===\n", result.metadata.filename).ok();
    writeln!(out, "  Methods: {methods}").ok();

    if !result.form_fields.is_empty() {
        writeln!(out, "\n  Form fields:").ok();
        write_pairs(&mut out, result.form_fields.iter());
    }

    if !result.extracted_data.is_empty() {
        writeln!(out, "\n  Text fields:").ok();
        write_pairs(&mut out, result.extracted_data.iter());
    }

    if result.table_data.is_empty() {
        writeln!(out, "\n  No table detected").ok();
    } else {
        let columns: Vec<&String> = result
            .table_data
            .first()
            .map(|row| row.keys().collect())
            .unwrap_or_default();
        writeln!(
            out,
            "\n  Table: {} row(s), columns: {}",
            result.table_data.len(),
            columns
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        )
        .ok();
    }

    out
}

fn write_pairs<'a>(out: &mut String, pairs: impl Iterator<Item = (&'a String, &'a Option<String>)>) {
    let pairs: Vec<_> = pairs.collect();
    let width = pairs.iter().map(|(k, _)| k.len()).max().unwrap_or(10);
    for (name, value) in pairs {
        // Multi-line values (addresses) are shown on one line.
        let shown = value
            .as_deref()
            .map(|v| v.lines().map(str::trim).collect::<Vec<_>>().join(" / "))
            .unwrap_or_else(|| "-".to_string());
        writeln!(out, "    {:<width$}  {}", name, shown, width = width).ok();
    }
}

pub fn format_batch(summary: &BatchSummary) -> String {
    let mut out = String::new();

    if summary.is_empty() {
        writeln!(out, "No PDF files found").ok();
        return out;
    }

    let width = summary
        .processed
        .iter()
        .map(|e| e.filename.len())
        .chain(summary.failed.iter().map(|f| f.filename.len()))
        .max()
        .unwrap_or(10);

    for entry in &summary.processed {
        let methods = entry
            .methods
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(",");
        let methods = if methods.is_empty() { "none".into() } else { methods };
        writeln!(
            out,
            "  {:<width$}  {:<22}  -> {}",
            entry.filename,
            methods,
            entry.json_path.display(),
            width = width
        )
        .ok();
    }

    for failure in &summary.failed {
        writeln!(
            out,
            "  {:<width$}  FAILED: {}",
            failure.filename,
            failure.reason,
            width = width
        )
        .ok();
    }

    writeln!(
        out,
        "\n{} processed, {} failed",
        summary.processed.len(),
        summary.failed.len()
    )
    .ok();
    if let Some(ref path) = summary.combined_path {
        writeln!(out, "Combined data saved to {}", path.display()).ok();
    }

    out
}
