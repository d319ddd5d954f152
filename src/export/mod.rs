use anyhow::{Context, Result};
use rust_xlsxwriter::{Format, Workbook};
use tracing::debug;

use crate::reconcile::{MergedRecord, ReconciliationStats};

/// Output column order. Fixed; downstream consumers rely on it.
pub const REPORT_HEADERS: [&str; 10] = [
    "Part Code",
    "Operator",
    "Work Order",
    "Op No",
    "Machine",
    "Op Code",
    "Actual Duration (min)",
    "Planned Duration (min)",
    "Deviation (min)",
    "Deviation (%)",
];

/// Render the merged rows plus a trailing summary block into workbook
/// bytes.
///
/// Absent numeric values stay blank cells. Writing a zero or a placeholder
/// string would destroy the "no value" semantics the whole pipeline
/// preserves. The deviation percentage is written as a signed text cell
/// ("+12.5%").
pub fn export_report(
    records: &[MergedRecord],
    stats: &ReconciliationStats,
) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let bold = Format::new().set_bold();

    for (col, header) in REPORT_HEADERS.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *header, &bold)
            .context("writing report header")?;
    }

    for (i, r) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_string(row, 0, &r.part_code)?;
        sheet.write_string(row, 1, &r.operator)?;
        sheet.write_string(row, 2, &r.work_order)?;
        sheet.write_string(row, 3, &r.operation_no)?;
        sheet.write_string(row, 4, &r.machine)?;
        sheet.write_string(row, 5, &r.operation_code)?;
        if let Some(actual) = r.actual_minutes {
            sheet.write_number(row, 6, actual)?;
        }
        if let Some(planned) = r.planned_minutes {
            sheet.write_number(row, 7, planned)?;
        }
        if let Some(deviation) = r.deviation_minutes {
            sheet.write_number(row, 8, deviation)?;
        }
        if let Some(pct) = r.deviation_pct {
            sheet.write_string(row, 9, format!("{:+.1}%", pct))?;
        }
    }

    // summary block, one blank row below the data
    let summary: [(&str, f64); 6] = [
        ("Records", stats.total as f64),
        ("With deviation", stats.with_deviation as f64),
        ("Slower than plan", stats.slower_than_plan as f64),
        ("Faster than plan", stats.faster_than_plan as f64),
        ("Deviation sum (min)", stats.deviation_sum_minutes),
        ("Mean deviation (%)", stats.mean_deviation_pct),
    ];
    let base = records.len() as u32 + 2;
    for (i, (label, value)) in summary.iter().enumerate() {
        let row = base + i as u32;
        sheet.write_string_with_format(row, 0, *label, &bold)?;
        sheet.write_number(row, 1, *value)?;
    }

    let bytes = workbook
        .save_to_buffer()
        .context("saving report workbook")?;
    debug!(rows = records.len(), bytes = bytes.len(), "report rendered");
    Ok(bytes)
}
