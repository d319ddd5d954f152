//! Reconciles a production plan spreadsheet against an MES execution
//! report: schema-free ingestion, heuristic column detection, locale-aware
//! numeric parsing, and a join-and-aggregate pass over work-order keys.
//!
//! The pipeline is a pure transformation per comparison run: two byte
//! buffers and a confirmed column mapping in, merged records, statistics
//! and a report workbook out. Nothing is persisted.

pub mod detect;
pub mod error;
pub mod export;
pub mod ingest;
pub mod reconcile;

pub use detect::{detect_mapping, ColumnMapping, FieldRole, SourceKind};
pub use error::{ReconcileError, SourceReadError};
pub use export::export_report;
pub use ingest::{parse_locale_number, read_html_table, read_workbook, RawTable};
pub use reconcile::{build_stats, reconcile, MergedRecord, ReconciliationStats};
