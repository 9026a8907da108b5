use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Embedded form field values keyed by fully-qualified field name, in
/// field-tree order.
pub type FormFields = IndexMap<String, Option<String>>;

/// Scalar fields recovered from plain text, in pattern order.
pub type ExtractedData = IndexMap<String, Option<String>>;

/// One data line of a detected table, keyed by column name in header order.
pub type TableRow = IndexMap<String, String>;

/// Label recording which backend contributed to a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    FormFields,
    Pdftotext,
    /// Native page-by-page fallback. The wire label predates the current
    /// backend and is kept so existing consumers keep matching on it.
    #[serde(rename = "pypdf")]
    PageText,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExtractionMethod::FormFields => "form_fields",
            ExtractionMethod::Pdftotext => "pdftotext",
            ExtractionMethod::PageText => "pypdf",
        }
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionMetadata {
    pub filename: String,
    pub path: String,
    /// Backends that produced non-empty output, in the order attempted.
    #[serde(default, alias = "extraction_methods")]
    pub methods: Vec<ExtractionMethod>,
}

impl ExtractionMetadata {
    pub fn for_path(pdf_path: &Path) -> Self {
        Self {
            filename: pdf_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            path: pdf_path.display().to_string(),
            methods: Vec::new(),
        }
    }

    /// Methods joined with commas, as written to spreadsheet exports.
    pub fn methods_joined(&self) -> String {
        self.methods
            .iter()
            .map(ExtractionMethod::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Everything recovered from one source PDF.
///
/// `extracted_data` and `table_data` always come from a single text
/// backend (the first that produced text), never a merge of several.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    #[serde(default)]
    pub metadata: ExtractionMetadata,
    #[serde(default)]
    pub form_fields: FormFields,
    #[serde(default)]
    pub text_content: String,
    #[serde(default)]
    pub extracted_data: ExtractedData,
    #[serde(default)]
    pub table_data: Vec<TableRow>,
}

impl ExtractionResult {
    pub fn new(pdf_path: &Path) -> Self {
        Self {
            metadata: ExtractionMetadata::for_path(pdf_path),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.metadata.methods.is_empty()
    }
}
