//! Flatten saved extraction results into spreadsheet records.
//!
//! Unlike the batch workbook, which has one row per PDF, a transfer expands
//! every table row into its own record so line items can be filtered and
//! summed downstream.

use crate::error::FormpullError;
use crate::export::{self, combined_row, Record};
use crate::model::ExtractionResult;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Columns placed first, in this order, when present.
pub const PRIORITY_COLUMNS: &[&str] = &[
    "record_type",
    "row_number",
    "name",
    "email",
    "phone",
    "date",
    "address",
    "filename",
    "extraction_methods",
];

pub const RECORD_TYPE_FORM: &str = "form";
pub const RECORD_TYPE_TABLE_ROW: &str = "table_row";

/// Records for one result: one per table row, or a single form record.
pub fn records_from_result(result: &ExtractionResult) -> Vec<Record> {
    let base = combined_row(result);

    if result.table_data.is_empty() {
        let mut record = base;
        record.set("record_type", Some(RECORD_TYPE_FORM.to_string()));
        return vec![record];
    }

    result
        .table_data
        .iter()
        .enumerate()
        .map(|(i, table_row)| {
            let mut record = base.clone();
            for (column, value) in table_row {
                record.set(format!("table_{column}"), Some(value.clone()));
            }
            record.set("record_type", Some(RECORD_TYPE_TABLE_ROW.to_string()));
            record.set("row_number", Some((i + 1).to_string()));
            record
        })
        .collect()
}

/// Read every `*.json` result in `json_dir` (sorted, non-recursive).
/// Files that do not parse as a result are logged and skipped.
pub fn collect_records(json_dir: &Path) -> Result<Vec<Record>, FormpullError> {
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(json_dir)? {
        let path = entry?.path();
        let is_json = path
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);
        if path.is_file() && is_json {
            paths.push(path);
        }
    }
    paths.sort();

    if paths.is_empty() {
        info!(dir = %json_dir.display(), "no JSON files found");
    }

    let mut records = Vec::new();
    for path in &paths {
        match load_result(path) {
            Ok(result) => records.extend(records_from_result(&result)),
            Err(e) => warn!(file = %path.display(), error = %e, "skipping unreadable result"),
        }
    }
    Ok(records)
}

fn load_result(path: &Path) -> Result<ExtractionResult, FormpullError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Priority columns that occur, then all others in first-seen order.
pub fn ordered_columns(records: &[Record]) -> Vec<String> {
    let all = export::column_order(records);
    let mut columns: Vec<String> = PRIORITY_COLUMNS
        .iter()
        .filter(|p| all.iter().any(|c| c == *p))
        .map(|p| p.to_string())
        .collect();
    columns.extend(
        all.into_iter()
            .filter(|c| !PRIORITY_COLUMNS.contains(&c.as_str())),
    );
    columns
}

/// Write records to a workbook. Returns the number of data rows written;
/// nothing is written when there are no records.
pub fn write_records(path: &Path, records: &[Record]) -> Result<usize, FormpullError> {
    if records.is_empty() {
        info!("no data to export");
        return Ok(0);
    }
    let columns = ordered_columns(records);
    export::write_workbook(path, &columns, records)?;
    Ok(records.len())
}
