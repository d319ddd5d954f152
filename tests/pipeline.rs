//! End-to-end run: plan workbook + MES HTML export in, report workbook out.

use std::fs;
use std::io::Write;

use anyhow::Result;
use mesrecon::{
    build_stats, detect_mapping, export_report, read_html_table, read_workbook, reconcile,
    FieldRole, SourceKind,
};
use rust_xlsxwriter::Workbook;
use tempfile::NamedTempFile;

fn plan_workbook() -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, header) in ["Work Order No", "Part Code", "Planned Duration (min)"]
        .iter()
        .enumerate()
    {
        sheet.write_string(0, col as u16, *header)?;
    }
    let rows = [("WO-1", "X1", 120.0), ("WO-2", "X2", 45.5), ("WO-3", "X3", 30.0)];
    for (i, (wo, part, minutes)) in rows.iter().enumerate() {
        let row = (i + 1) as u32;
        sheet.write_string(row, 0, *wo)?;
        sheet.write_string(row, 1, *part)?;
        sheet.write_number(row, 2, *minutes)?;
    }
    Ok(workbook.save_to_buffer()?)
}

fn mes_html() -> String {
    let mut rows = String::new();
    // WO-1 on plan: 7320 s = 122.0 min against 120 planned
    // WO-2 on plan, locale cycle time: 2.580,0 s = 43.0 min against 45.5
    // WO-9 never planned; one row with no work order at all
    for cells in [
        ["Auftrag", "Bediener", "Maschine", "Zykluszeit"],
        ["WO-1", "smith", "M1", "7320"],
        ["WO-2", "jones", "M2", "2.580,0"],
        ["WO-9", "smith", "M1", "600"],
        ["", "", "", ""],
    ] {
        rows.push_str("<tr>");
        for cell in cells {
            rows.push_str(&format!("<td>{}</td>", cell));
        }
        rows.push_str("</tr>");
    }
    format!(
        "<html><body><table><tr><td>legend</td></tr></table><table>{}</table></body></html>",
        rows
    )
}

#[test]
fn plan_and_mes_reports_reconcile_into_a_readable_workbook() -> Result<()> {
    let plan = read_workbook(&plan_workbook()?)?;
    let mes = read_html_table(&mes_html())?;

    let plan_map = detect_mapping(&plan.headers, SourceKind::Plan);
    let mes_map = detect_mapping(&mes.headers, SourceKind::Mes);
    assert_eq!(plan_map.get(FieldRole::WorkOrder), Some("Work Order No"));
    assert_eq!(mes_map.get(FieldRole::WorkOrder), Some("Auftrag"));
    assert_eq!(mes_map.get(FieldRole::CycleTime), Some("Zykluszeit"));

    let records = reconcile(&plan, &mes, &plan_map, &mes_map)?;
    // the blank-work-order row is gone; WO-3 ran nothing and emits nothing
    assert_eq!(records.len(), 3);

    let wo1 = &records[0];
    assert_eq!(wo1.work_order, "WO-1");
    assert_eq!(wo1.part_code, "X1");
    assert_eq!(wo1.operator, "smith");
    assert_eq!(wo1.actual_minutes, Some(122.0));
    assert_eq!(wo1.planned_minutes, Some(120.0));
    assert_eq!(wo1.deviation_minutes, Some(2.0));
    assert_eq!(wo1.deviation_pct, Some(1.7));

    let wo2 = &records[1];
    assert_eq!(wo2.actual_minutes, Some(43.0));
    assert_eq!(wo2.deviation_minutes, Some(-2.5));

    let wo9 = &records[2];
    assert_eq!(wo9.part_code, "");
    assert_eq!(wo9.planned_minutes, None);
    assert_eq!(wo9.deviation_minutes, None);

    let stats = build_stats(&records);
    assert_eq!(stats.total, 3);
    assert_eq!(stats.with_deviation, 2);
    assert_eq!(stats.slower_than_plan, 1);
    assert_eq!(stats.faster_than_plan, 1);
    assert_eq!(stats.deviation_sum_minutes, -0.5);

    // save through the filesystem and read the artifact back
    let report = export_report(&records, &stats)?;
    let mut file = NamedTempFile::new()?;
    file.write_all(&report)?;
    let bytes = fs::read(file.path())?;
    let table = read_workbook(&bytes)?;

    assert_eq!(table.headers[2], "Work Order");
    let first = &table.rows[0];
    assert_eq!(table.cell(first, "Work Order"), "WO-1");
    assert_eq!(table.cell(first, "Actual Duration (min)"), "122");
    assert_eq!(table.cell(first, "Deviation (%)"), "+1.7%");
    Ok(())
}
