use std::collections::HashMap;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use tracing::debug;

use crate::error::SourceReadError;
use crate::ingest::{keep_headers, RawTable};

/// Read workbook bytes into a `RawTable`, first worksheet only.
///
/// Row 1 is the header row regardless of content. Columns with an empty
/// header are dropped, taking their cells with them. Formula cells yield
/// their cached result (calamine's default range), or empty text when the
/// workbook stored none.
pub fn read_workbook(bytes: &[u8]) -> Result<RawTable, SourceReadError> {
    let cursor = Cursor::new(bytes);
    let mut workbook = open_workbook_auto_from_rs(cursor)?;

    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or(SourceReadError::NoWorksheet)?;
    let range = workbook.worksheet_range(&sheet)?;

    let mut rows_iter = range.rows();
    let header_cells: Vec<String> = match rows_iter.next() {
        Some(row) => row.iter().map(cell_text).collect(),
        None => Vec::new(),
    };
    let kept = keep_headers(&header_cells);

    let mut rows = Vec::new();
    for row in rows_iter {
        let mut map = HashMap::with_capacity(kept.len());
        for (idx, header) in &kept {
            let text = row.get(*idx).map(cell_text).unwrap_or_default();
            map.insert(header.clone(), text);
        }
        rows.push(map);
    }

    debug!(
        sheet = %sheet,
        columns = kept.len(),
        rows = rows.len(),
        "read workbook"
    );

    Ok(RawTable {
        headers: kept.into_iter().map(|(_, h)| h).collect(),
        rows,
    })
}

/// Uniform text view of a cell. Whole floats render without a trailing
/// ".0" so work-order numbers stored as numbers still join on text.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => format_float(*f),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => format_float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(_) => String::new(),
    }
}

fn format_float(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}
