pub mod html;
pub mod numeric;
pub mod spreadsheet;

use std::collections::HashMap;

pub use html::read_html_table;
pub use numeric::parse_locale_number;
pub use spreadsheet::read_workbook;

/// Normalized result of reading any tabular source. Cell text stays text
/// here; nothing downstream may assume a cell is already numeric.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    /// Column names in document order. Never empty strings, never duplicated;
    /// such columns are dropped while reading.
    pub headers: Vec<String>,
    /// One map per data row, keyed by header. Keys are always a subset of
    /// `headers`.
    pub rows: Vec<HashMap<String, String>>,
}

impl RawTable {
    /// Cell text for `header` in `row`, trimmed. Empty string when the
    /// column is missing from the row.
    pub fn cell<'a>(&self, row: &'a HashMap<String, String>, header: &str) -> &'a str {
        row.get(header).map(|s| s.trim()).unwrap_or("")
    }
}

/// Drop empty and duplicate header names, keeping the original column
/// positions of the survivors so rows can be keyed positionally.
pub(crate) fn keep_headers(raw: &[String]) -> Vec<(usize, String)> {
    let mut seen: Vec<&str> = Vec::new();
    let mut kept = Vec::new();
    for (idx, name) in raw.iter().enumerate() {
        let name = name.trim();
        if name.is_empty() || seen.contains(&name) {
            continue;
        }
        seen.push(name);
        kept.push((idx, name.to_string()));
    }
    kept
}
