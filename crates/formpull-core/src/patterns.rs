use crate::error::FormpullError;
use crate::model::ExtractedData;
use indexmap::IndexMap;
use regex::{Regex, RegexBuilder};
use std::path::Path;

/// Built-in field patterns, used unless the caller supplies a full
/// replacement set. Each has exactly one capture group.
pub const DEFAULT_FIELD_PATTERNS: &[(&str, &str)] = &[
    ("name", r"Name:[\s\n]*([^\n]+)"),
    ("email", r"Email:[\s\n]*([^\n@]+@[^\n\s]+)"),
    ("phone", r"Phone:[\s\n]*([0-9\-\(\)\s\.]+)"),
    ("address", r"Address:[\s\n]*([^\n]+(?:\n[^\n]+){0,3})"),
    (
        "date",
        r"Date:[\s\n]*([0-9]{1,2}[/\-][0-9]{1,2}[/\-][0-9]{2,4})",
    ),
];

/// A named, compiled, case-insensitive pattern.
#[derive(Debug, Clone)]
pub struct FieldPattern {
    name: String,
    source: String,
    regex: Regex,
}

impl FieldPattern {
    pub fn new(name: &str, pattern: &str) -> Result<Self, FormpullError> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| FormpullError::PatternInvalid {
                field: name.to_string(),
                reason: e.to_string(),
            })?;

        // captures_len counts the implicit whole-match group.
        let groups = regex.captures_len() - 1;
        if groups != 1 {
            return Err(FormpullError::PatternInvalid {
                field: name.to_string(),
                reason: format!("expected exactly one capture group, found {groups}"),
            });
        }

        Ok(Self {
            name: name.to_string(),
            source: pattern.to_string(),
            regex,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Leftmost match over the whole text, group 1 trimmed.
    pub fn find(&self, text: &str) -> Option<String> {
        self.regex
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
    }
}

/// The set of field patterns applied to extracted text.
///
/// Never mutated after construction; a custom set replaces the defaults
/// wholesale rather than being merged into them.
#[derive(Debug, Clone)]
pub struct FieldPatterns {
    patterns: Vec<FieldPattern>,
}

impl FieldPatterns {
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, FormpullError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let patterns = pairs
            .into_iter()
            .map(|(name, pattern)| FieldPattern::new(name, pattern))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn from_map(map: &IndexMap<String, String>) -> Result<Self, FormpullError> {
        Self::from_pairs(map.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    /// Load a custom pattern set from a JSON object of `field -> regex`.
    pub fn load(path: &Path) -> Result<Self, FormpullError> {
        let content = std::fs::read_to_string(path).map_err(|e| FormpullError::PatternLoad {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let map: IndexMap<String, String> =
            serde_json::from_str(&content).map_err(|e| FormpullError::PatternLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Self::from_map(&map)
    }

    /// Parse a pattern set from a JSON string (no file path context).
    pub fn parse_str(json: &str) -> Result<Self, FormpullError> {
        let map: IndexMap<String, String> = serde_json::from_str(json)?;
        Self::from_map(&map)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldPattern> {
        self.patterns.iter()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Run every pattern against `text`. Fields without a match map to
    /// `None`; patterns are independent and may capture the same span.
    pub fn match_text(&self, text: &str) -> ExtractedData {
        self.patterns
            .iter()
            .map(|p| (p.name.clone(), p.find(text)))
            .collect()
    }
}

impl Default for FieldPatterns {
    fn default() -> Self {
        Self::from_pairs(DEFAULT_FIELD_PATTERNS.iter().copied())
            .expect("built-in field patterns compile with one capture group")
    }
}
