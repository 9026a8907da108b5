use crate::model::TableRow;
use regex::Regex;
use std::sync::LazyLock;

/// Reconstruct table data from layout-preserving text.
///
/// pdftotext -layout keeps column alignment using spaces, so column
/// boundaries can be read off the header line's token offsets and applied
/// to every following line.
static HEADER_CANDIDATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+\s+\w+\s+\w+").expect("valid header regex"));

static CONFIRM_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\w+\s+\w+").expect("valid confirm regex"));

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b\w+\b").expect("valid word regex"));

/// Number of lines after a candidate header that must look tabular too.
const CONFIRM_LINES: usize = 3;

/// Extract the first table found in `text`.
///
/// Returns an empty vector when no header is found; that just means no
/// table is present.
pub fn extract_table(text: &str) -> Vec<TableRow> {
    let lines: Vec<&str> = text.split('\n').collect();

    let Some(header_idx) = find_header(&lines) else {
        return Vec::new();
    };

    let header = lines[header_idx];
    let boundaries = column_boundaries(header);
    if boundaries.len() < 2 {
        return Vec::new();
    }
    let names = column_names(header, &boundaries);

    let mut rows = Vec::new();
    for line in &lines[header_idx + 1..] {
        // A blank line ends the table only once a row has been collected;
        // leading blank lines are skipped. Kept asymmetric for compatibility
        // with existing exports, though it is probably unintended.
        if line.trim().is_empty() {
            if rows.is_empty() {
                continue;
            }
            break;
        }

        let len = line.chars().count();
        if !boundaries.iter().any(|&b| b < len) {
            continue;
        }

        let row: TableRow = names
            .iter()
            .cloned()
            .zip(slice_columns(line, &boundaries))
            .collect();
        rows.push(row);
    }

    rows
}

/// Index of the first line with 3+ word tokens whose next three lines each
/// have 2+ word tokens.
pub fn find_header(lines: &[&str]) -> Option<usize> {
    lines.iter().enumerate().position(|(i, line)| {
        HEADER_CANDIDATE.is_match(line)
            && i + CONFIRM_LINES < lines.len()
            && lines[i + 1..=i + CONFIRM_LINES]
                .iter()
                .all(|l| CONFIRM_LINE.is_match(l))
    })
}

/// Character offsets at which each header token starts.
pub fn column_boundaries(header: &str) -> Vec<usize> {
    WORD.find_iter(header)
        .map(|m| header[..m.start()].chars().count())
        .collect()
}

/// Header text between consecutive boundaries, trimmed. The last column
/// runs to the end of the line.
fn column_names(header: &str, boundaries: &[usize]) -> Vec<String> {
    slice_columns(header, boundaries)
}

fn slice_columns(line: &str, boundaries: &[usize]) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    boundaries
        .iter()
        .enumerate()
        .map(|(i, &start)| {
            let end = boundaries.get(i + 1).copied().unwrap_or(chars.len());
            let start = start.min(chars.len());
            let end = end.clamp(start, chars.len());
            chars[start..end].iter().collect::<String>().trim().to_string()
        })
        .collect()
}
