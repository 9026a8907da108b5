use crate::error::FormpullError;
use crate::extraction::{BackendOutcome, FormFieldBackend};
use crate::model::FormFields;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Field trees deeper than this are treated as malformed.
const MAX_FIELD_DEPTH: usize = 32;

/// Reads the AcroForm field dictionary of a fillable PDF.
///
/// Field names are fully qualified (`parent.child`); a field without a
/// value maps to `None`. A PDF without an AcroForm yields an empty map.
pub struct AcroFormExtractor;

impl AcroFormExtractor {
    pub fn new() -> Self {
        AcroFormExtractor
    }

    pub fn read_fields(&self, pdf_path: &Path) -> Result<FormFields, FormpullError> {
        let doc = Document::load(pdf_path)?;
        let mut fields = FormFields::new();

        let Some(acroform) = acroform_dict(&doc)? else {
            debug!(path = %pdf_path.display(), "no AcroForm dictionary");
            return Ok(fields);
        };

        let mut visited = HashSet::new();
        for (id, field) in child_dicts(&doc, acroform.get(b"Fields").ok()) {
            if id.is_some_and(|id| !visited.insert(id)) {
                continue;
            }
            collect_field(&doc, field, None, None, 0, &mut visited, &mut fields);
        }

        Ok(fields)
    }
}

impl Default for AcroFormExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FormFieldBackend for AcroFormExtractor {
    fn extract_fields(&self, pdf_path: &Path) -> BackendOutcome<FormFields> {
        BackendOutcome::from_fields(self.read_fields(pdf_path))
    }

    fn backend_name(&self) -> &str {
        "acroform"
    }
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> Result<&'a Object, lopdf::Error> {
    match obj {
        Object::Reference(id) => doc.get_object(*id),
        other => Ok(other),
    }
}

fn acroform_dict(doc: &Document) -> Result<Option<&Dictionary>, FormpullError> {
    let root = resolve(doc, doc.trailer.get(b"Root")?)?.as_dict()?;
    match root.get(b"AcroForm") {
        Ok(obj) => Ok(Some(resolve(doc, obj)?.as_dict()?)),
        Err(_) => Ok(None),
    }
}

/// A field dictionary plus its object id when it was reached by reference.
type FieldNode<'a> = (Option<ObjectId>, &'a Dictionary);

/// Resolve an optional array of (possibly indirect) dictionaries.
fn child_dicts<'a>(doc: &'a Document, array: Option<&'a Object>) -> Vec<FieldNode<'a>> {
    let Some(items) = array
        .and_then(|a| resolve(doc, a).ok())
        .and_then(|a| a.as_array().ok())
    else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let id = item.as_reference().ok();
            let dict = resolve(doc, item).ok()?.as_dict().ok()?;
            Some((id, dict))
        })
        .collect()
}

fn partial_name(doc: &Document, field: &Dictionary) -> Option<String> {
    match resolve(doc, field.get(b"T").ok()?).ok()? {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        _ => None,
    }
}

fn collect_field<'a>(
    doc: &'a Document,
    field: &'a Dictionary,
    parent_name: Option<&str>,
    inherited_value: Option<&'a Object>,
    depth: usize,
    visited: &mut HashSet<ObjectId>,
    out: &mut FormFields,
) {
    if depth > MAX_FIELD_DEPTH {
        return;
    }

    let name = match (parent_name, partial_name(doc, field)) {
        (Some(parent), Some(partial)) => Some(format!("{parent}.{partial}")),
        (None, Some(partial)) => Some(partial),
        (parent, None) => parent.map(str::to_string),
    };
    let value = field.get(b"V").ok().or(inherited_value);

    // Kids without /T are widget annotations of this field, not subfields.
    // A kid already walked means the field tree has a cycle or shares a node.
    let subfields: Vec<&Dictionary> = child_dicts(doc, field.get(b"Kids").ok())
        .into_iter()
        .filter(|(_, kid)| kid.has(b"T"))
        .filter(|(id, _)| id.map_or(true, |id| visited.insert(id)))
        .map(|(_, kid)| kid)
        .collect();

    if subfields.is_empty() {
        if let Some(name) = name {
            out.insert(name, value.and_then(|v| render_value(doc, v)));
        }
        return;
    }

    for kid in subfields {
        collect_field(doc, kid, name.as_deref(), value, depth + 1, visited, out);
    }
}

fn render_value(doc: &Document, value: &Object) -> Option<String> {
    match resolve(doc, value).ok()? {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        Object::Name(name) => Some(format!("/{}", String::from_utf8_lossy(name))),
        Object::Integer(i) => Some(i.to_string()),
        Object::Real(r) => Some(r.to_string()),
        Object::Boolean(b) => Some(b.to_string()),
        Object::Array(items) => Some(
            items
                .iter()
                .filter_map(|item| match item {
                    Object::Array(_) => None,
                    other => render_value(doc, other),
                })
                .collect::<Vec<_>>()
                .join(","),
        ),
        Object::Stream(stream) => {
            let bytes = stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone());
            Some(String::from_utf8_lossy(&bytes).into_owned())
        }
        _ => None,
    }
}

/// Decode a PDF text string: UTF-16BE with BOM, UTF-8 with BOM, or
/// PDFDocEncoding (treated as Latin-1).
pub fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    if let Some(utf8) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8_lossy(utf8).into_owned();
    }
    bytes.iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;
    use std::path::PathBuf;

    fn write_form_pdf(dir: &Path, fields: Vec<Dictionary>, with_acroform: bool) -> PathBuf {
        write_form_pdf_with(
            dir,
            |doc| {
                fields
                    .into_iter()
                    .map(|f| doc.add_object(f).into())
                    .collect()
            },
            with_acroform,
        )
    }

    /// `add_fields` adds the field objects and returns the `/Fields` entries.
    fn write_form_pdf_with(
        dir: &Path,
        add_fields: impl FnOnce(&mut Document) -> Vec<Object>,
        with_acroform: bool,
    ) -> PathBuf {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );

        let field_refs = add_fields(&mut doc);
        let mut catalog = dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        };
        if with_acroform {
            let acroform_id = doc.add_object(dictionary! { "Fields" => field_refs });
            catalog.set("AcroForm", acroform_id);
        }
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", catalog_id);

        let path = dir.join("form.pdf");
        doc.save(&path).unwrap();
        path
    }

    #[test]
    fn test_reads_flat_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_form_pdf(
            dir.path(),
            vec![
                dictionary! { "T" => Object::string_literal("name"), "V" => Object::string_literal("Alice") },
                dictionary! { "T" => Object::string_literal("subscribe"), "V" => Object::Name(b"Yes".to_vec()) },
                dictionary! { "T" => Object::string_literal("comments") },
            ],
            true,
        );

        let fields = AcroFormExtractor::new().read_fields(&path).unwrap();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields["name"].as_deref(), Some("Alice"));
        assert_eq!(fields["subscribe"].as_deref(), Some("/Yes"));
        assert_eq!(fields["comments"], None);
    }

    #[test]
    fn test_qualifies_nested_field_names() {
        let dir = tempfile::tempdir().unwrap();
        let mut doc_fields = Vec::new();
        // Kids are inlined so the test does not depend on object numbering.
        doc_fields.push(dictionary! {
            "T" => Object::string_literal("applicant"),
            "Kids" => vec![
                Object::Dictionary(dictionary! {
                    "T" => Object::string_literal("email"),
                    "V" => Object::string_literal("alice@example.com"),
                }),
                Object::Dictionary(dictionary! {
                    "T" => Object::string_literal("age"),
                    "V" => 42,
                }),
            ],
        });
        let path = write_form_pdf(dir.path(), doc_fields, true);

        let fields = AcroFormExtractor::new().read_fields(&path).unwrap();
        assert_eq!(
            fields["applicant.email"].as_deref(),
            Some("alice@example.com")
        );
        assert_eq!(fields["applicant.age"].as_deref(), Some("42"));
        assert!(!fields.contains_key("applicant"));
    }

    #[test]
    fn test_self_referencing_kids_terminate() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_form_pdf_with(
            dir.path(),
            |doc| {
                let field_id = doc.new_object_id();
                doc.objects.insert(
                    field_id,
                    Object::Dictionary(dictionary! {
                        "T" => Object::string_literal("a"),
                        "V" => Object::string_literal("loop"),
                        "Kids" => vec![field_id.into(), field_id.into()],
                    }),
                );
                vec![field_id.into(), field_id.into()]
            },
            true,
        );

        let fields = AcroFormExtractor::new().read_fields(&path).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["a"].as_deref(), Some("loop"));
    }

    #[test]
    fn test_two_field_cycle_terminates() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_form_pdf_with(
            dir.path(),
            |doc| {
                let parent_id = doc.new_object_id();
                let child_id = doc.new_object_id();
                doc.objects.insert(
                    parent_id,
                    Object::Dictionary(dictionary! {
                        "T" => Object::string_literal("parent"),
                        "Kids" => vec![child_id.into()],
                    }),
                );
                doc.objects.insert(
                    child_id,
                    Object::Dictionary(dictionary! {
                        "T" => Object::string_literal("child"),
                        "V" => Object::string_literal("x"),
                        "Kids" => vec![parent_id.into(), child_id.into()],
                    }),
                );
                vec![parent_id.into()]
            },
            true,
        );

        let fields = AcroFormExtractor::new().read_fields(&path).unwrap();
        assert_eq!(fields.len(), 1);
        assert_eq!(fields["parent.child"].as_deref(), Some("x"));
    }

    #[test]
    fn test_no_acroform_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_form_pdf(dir.path(), vec![], false);

        let extractor = AcroFormExtractor::new();
        assert!(extractor.read_fields(&path).unwrap().is_empty());
        assert_eq!(extractor.extract_fields(&path), BackendOutcome::Empty);
    }

    #[test]
    fn test_corrupt_pdf_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"this is not a pdf").unwrap();

        assert!(matches!(
            AcroFormExtractor::new().extract_fields(&path),
            BackendOutcome::Failure(_)
        ));
    }

    #[test]
    fn test_decode_pdf_string() {
        assert_eq!(decode_pdf_string(b"Caf\xe9"), "Café");
        assert_eq!(
            decode_pdf_string(&[0xFE, 0xFF, 0x00, 0x41, 0x00, 0x6C, 0x00, 0xE9]),
            "Alé"
        );
        assert_eq!(decode_pdf_string(b"\xEF\xBB\xBFna\xC3\xAFve"), "naïve");
    }
}
