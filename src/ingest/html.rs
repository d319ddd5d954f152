use std::collections::HashMap;

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::debug;

use crate::error::SourceReadError;
use crate::ingest::{keep_headers, parse_locale_number, RawTable};

static TABLE_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table").expect("invalid table selector"));
static ROW_SEL: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("invalid tr selector"));
static CELL_SEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("th, td").expect("invalid cell selector"));

/// Minimum non-empty cells for a row to qualify as the header row.
const MIN_HEADER_CELLS: usize = 3;

/// Read an MES browser export into a `RawTable` without prior knowledge of
/// the document structure.
///
/// The data table is taken to be the `<table>` with the most rows; legend
/// and layout tables are smaller. Within it, the header row is the first
/// row with at least three non-empty cells none of which parses as a
/// number (an all-numeric row is data). Fully blank rows below the header
/// are visual spacers and are dropped.
///
/// When no table exists or no row qualifies as a header, this fails
/// outright. Guessing a layout here would let the join run on mismatched
/// columns, which is strictly worse than asking for a manual mapping.
pub fn read_html_table(html: &str) -> Result<RawTable, SourceReadError> {
    let document = Html::parse_document(html);

    let mut best: Option<Vec<Vec<String>>> = None;
    for table in document.select(&TABLE_SEL) {
        let grid = table_grid(&table);
        let better = match &best {
            Some(b) => grid.len() > b.len(),
            None => true,
        };
        if better {
            best = Some(grid);
        }
    }
    let grid = best.ok_or(SourceReadError::NoTable)?;

    let header_idx = grid
        .iter()
        .position(|row| is_header_row(row))
        .ok_or(SourceReadError::NoHeaderRow {
            rows_scanned: grid.len(),
        })?;

    let kept = keep_headers(&grid[header_idx]);
    let mut rows = Vec::new();
    for cells in &grid[header_idx + 1..] {
        if cells.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        let mut map = HashMap::with_capacity(kept.len());
        for (idx, header) in &kept {
            let text = cells.get(*idx).cloned().unwrap_or_default();
            map.insert(header.clone(), text);
        }
        rows.push(map);
    }

    debug!(
        header_row = header_idx,
        columns = kept.len(),
        rows = rows.len(),
        "read html table"
    );

    Ok(RawTable {
        headers: kept.into_iter().map(|(_, h)| h).collect(),
        rows,
    })
}

/// A header row has enough labelled cells and none of them is numeric.
fn is_header_row(cells: &[String]) -> bool {
    let non_empty: Vec<&String> = cells.iter().filter(|c| !c.trim().is_empty()).collect();
    non_empty.len() >= MIN_HEADER_CELLS
        && non_empty.iter().all(|c| parse_locale_number(c).is_none())
}

fn table_grid(table: &ElementRef) -> Vec<Vec<String>> {
    table
        .select(&ROW_SEL)
        .map(|tr| {
            tr.select(&CELL_SEL)
                .map(|cell| cell.text().collect::<String>().trim().to_string())
                .collect()
        })
        .collect()
}
