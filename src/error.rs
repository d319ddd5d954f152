use thiserror::Error;

use crate::detect::SourceKind;

/// A source byte buffer could not be turned into a table. Fatal for the
/// run; the caller surfaces it instead of guessing a layout.
#[derive(Debug, Error)]
pub enum SourceReadError {
    #[error("could not open workbook: {0}")]
    Workbook(#[from] calamine::Error),

    #[error("workbook contains no worksheets")]
    NoWorksheet,

    #[error("document contains no <table> element")]
    NoTable,

    #[error("no usable header row found ({rows_scanned} rows scanned)")]
    NoHeaderRow { rows_scanned: usize },
}

/// Configuration errors at join time, distinct from per-cell data problems
/// (those recover locally as absent values and never abort the run).
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("work order column is not mapped for the {0} source")]
    UnmappedWorkOrder(SourceKind),
}
