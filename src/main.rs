use anyhow::{bail, Context, Result};
use mesrecon::{
    detect::{detect_mapping, ColumnMapping, SourceKind},
    export::export_report,
    ingest::{read_html_table, read_workbook, RawTable},
    reconcile::{build_stats, reconcile},
};
use serde::Deserialize;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Confirmed mappings as saved by the column-mapping UI.
#[derive(Debug, Deserialize)]
struct MappingFile {
    plan: ColumnMapping,
    mes: ColumnMapping,
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    // ─── 2) parse args ───────────────────────────────────────────────
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 4 || args.len() > 5 {
        bail!(
            "usage: {} <plan.xlsx> <mes.xlsx|mes.html> <out.xlsx> [mapping.json]",
            args[0]
        );
    }
    let (plan_path, mes_path, out_path) = (&args[1], &args[2], &args[3]);

    // ─── 3) read both sources ────────────────────────────────────────
    let plan_bytes = tokio::fs::read(plan_path)
        .await
        .with_context(|| format!("reading plan file {}", plan_path))?;
    let mes_bytes = tokio::fs::read(mes_path)
        .await
        .with_context(|| format!("reading MES file {}", mes_path))?;

    let plan = read_workbook(&plan_bytes).context("parsing plan workbook")?;
    let mes = read_source(mes_path, &mes_bytes).context("parsing MES report")?;
    info!(
        plan_rows = plan.rows.len(),
        mes_rows = mes.rows.len(),
        "sources loaded"
    );

    // ─── 4) column mappings: confirmed file, or detector proposal ────
    let (plan_map, mes_map) = match args.get(4) {
        Some(path) => {
            let text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading mapping file {}", path))?;
            let file: MappingFile = serde_json::from_str(&text).context("parsing mapping file")?;
            (file.plan, file.mes)
        }
        None => {
            let plan_map = detect_mapping(&plan.headers, SourceKind::Plan);
            let mes_map = detect_mapping(&mes.headers, SourceKind::Mes);
            info!(?plan_map, ?mes_map, "detected column mappings");
            (plan_map, mes_map)
        }
    };

    // ─── 5) join, aggregate, export ──────────────────────────────────
    let records = reconcile(&plan, &mes, &plan_map, &mes_map)?;
    let stats = build_stats(&records);
    info!(
        total = stats.total,
        with_deviation = stats.with_deviation,
        slower = stats.slower_than_plan,
        faster = stats.faster_than_plan,
        "reconciliation complete"
    );

    let report = export_report(&records, &stats)?;
    tokio::fs::write(out_path, report)
        .await
        .with_context(|| format!("writing report {}", out_path))?;
    info!("report written to {}", out_path);

    Ok(())
}

/// MES exports arrive either as a workbook or as an HTML page saved from
/// the browser; dispatch on the extension.
fn read_source(path: &str, bytes: &[u8]) -> Result<RawTable> {
    let ext = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());
    let table = match ext.as_deref() {
        Some("html") | Some("htm") => read_html_table(&String::from_utf8_lossy(bytes))?,
        _ => read_workbook(bytes)?,
    };
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_extension_dispatches_to_the_html_reader() {
        let html = r#"<table>
            <tr><td>Work Order</td><td>Machine</td><td>Cycle Time</td></tr>
            <tr><td>WO-1</td><td>M1</td><td>60</td></tr>
        </table>"#;
        let table = read_source("export.HTML", html.as_bytes()).unwrap();
        assert_eq!(table.headers.len(), 3);
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn other_extensions_go_to_the_workbook_reader() {
        // not a workbook, so the workbook reader must be the one failing
        let err = read_source("export.xlsx", b"<table></table>").unwrap_err();
        assert!(err.to_string().contains("workbook"));
    }
}
