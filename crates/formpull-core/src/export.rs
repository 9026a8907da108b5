use crate::error::FormpullError;
use crate::model::ExtractionResult;
use rust_xlsxwriter::Workbook;
use std::path::Path;

/// File name of the per-batch workbook.
pub const COMBINED_FILENAME: &str = "combined_data.xlsx";

/// Worksheet name used for every workbook this crate writes.
pub const SHEET_NAME: &str = "Extracted";

/// One spreadsheet row of ordered `column -> value` cells.
///
/// Setting an existing column replaces its value in place, so the column
/// keeps the position where it was first seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    cells: Vec<(String, Option<String>)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, column: impl Into<String>, value: Option<String>) {
        let column = column.into();
        match self.cells.iter_mut().find(|(c, _)| *c == column) {
            Some((_, existing)) => *existing = value,
            None => self.cells.push((column, value)),
        }
    }

    pub fn extend<'a, I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = (&'a String, &'a Option<String>)>,
    {
        for (column, value) in cells {
            self.set(column.clone(), value.clone());
        }
    }

    /// Value of a column; `None` both when absent and when null.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(c, _)| c == column)
            .and_then(|(_, v)| v.as_deref())
    }

    pub fn contains(&self, column: &str) -> bool {
        self.cells.iter().any(|(c, _)| c == column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(c, _)| c.as_str())
    }
}

/// Flatten one result into a row: form fields, then text-matched fields
/// (overwriting same-named form fields), then `filename` and
/// `extraction_methods`.
pub fn combined_row(result: &ExtractionResult) -> Record {
    let mut record = Record::new();
    record.extend(&result.form_fields);
    record.extend(&result.extracted_data);
    record.set("filename", Some(result.metadata.filename.clone()));
    record.set(
        "extraction_methods",
        Some(result.metadata.methods_joined()),
    );
    record
}

/// Union of all columns in first-seen order.
pub fn column_order(records: &[Record]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        for column in record.columns() {
            if !columns.iter().any(|c| c == column) {
                columns.push(column.to_string());
            }
        }
    }
    columns
}

/// Write records as a single-sheet workbook with one header row.
/// Missing and null cells are left blank.
pub fn write_workbook(
    path: &Path,
    columns: &[String],
    records: &[Record],
) -> Result<(), FormpullError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, name) in columns.iter().enumerate() {
        worksheet.write_string(0, column_index(col)?, name)?;
    }

    for (row, record) in records.iter().enumerate() {
        let row = u32::try_from(row + 1)
            .map_err(|_| FormpullError::Export(format!("too many rows: {}", row + 1)))?;
        for (col, name) in columns.iter().enumerate() {
            if let Some(value) = record.get(name) {
                worksheet.write_string(row, column_index(col)?, value)?;
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn column_index(col: usize) -> Result<u16, FormpullError> {
    u16::try_from(col).map_err(|_| FormpullError::Export(format!("too many columns: {}", col + 1)))
}
