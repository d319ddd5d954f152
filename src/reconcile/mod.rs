pub mod stats;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::detect::{ColumnMapping, FieldRole, SourceKind};
use crate::error::ReconcileError;
use crate::ingest::{parse_locale_number, RawTable};

pub use stats::{build_stats, ReconciliationStats};

/// One joined plan/MES row. Numeric fields are absent when the source
/// value was missing, unmapped, or unparsable; zero is a real duration and
/// is never substituted for "unknown".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergedRecord {
    pub part_code: String,
    pub operator: String,
    pub work_order: String,
    pub operation_no: String,
    pub machine: String,
    pub operation_code: String,
    /// Planned duration in minutes, straight from the plan column.
    pub planned_minutes: Option<f64>,
    /// Actual duration in minutes, converted from MES cycle-time seconds.
    pub actual_minutes: Option<f64>,
    /// actual − planned, one decimal. Present only when both sides are.
    pub deviation_minutes: Option<f64>,
    /// deviation / planned × 100, one decimal. Undefined when planned is
    /// zero or absent.
    pub deviation_pct: Option<f64>,
}

pub(crate) fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Join the plan table to the MES table on the work-order key.
///
/// The MES side drives: one output record per executed row, so planned
/// work that never ran produces nothing. Plan rows are indexed
/// first-seen-wins on the trimmed work-order number; later duplicates are
/// ignored. MES rows whose work-order cell is empty after trimming cannot
/// be attributed to any plan and are excluded.
///
/// Only the work-order role is mandatory on each side. Every other
/// unmapped role, missing plan match, or unparsable cell degrades to an
/// empty/absent field in that record alone.
pub fn reconcile(
    plan: &RawTable,
    mes: &RawTable,
    plan_map: &ColumnMapping,
    mes_map: &ColumnMapping,
) -> Result<Vec<MergedRecord>, ReconcileError> {
    let plan_wo = plan_map
        .get(FieldRole::WorkOrder)
        .ok_or(ReconcileError::UnmappedWorkOrder(SourceKind::Plan))?;
    let mes_wo = mes_map
        .get(FieldRole::WorkOrder)
        .ok_or(ReconcileError::UnmappedWorkOrder(SourceKind::Mes))?;

    // first-seen-wins on duplicate plan keys
    let mut plan_index: HashMap<&str, &HashMap<String, String>> = HashMap::new();
    for row in &plan.rows {
        let key = plan.cell(row, plan_wo);
        if !key.is_empty() {
            plan_index.entry(key).or_insert(row);
        }
    }

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for row in &mes.rows {
        let key = mes.cell(row, mes_wo);
        if key.is_empty() {
            skipped += 1;
            continue;
        }
        let plan_row = plan_index.get(key).copied();

        let mes_field = |role: FieldRole| -> String {
            mes_map
                .get(role)
                .map(|col| mes.cell(row, col).to_string())
                .unwrap_or_default()
        };
        let plan_field = |role: FieldRole| -> String {
            match (plan_map.get(role), plan_row) {
                (Some(col), Some(prow)) => plan.cell(prow, col).to_string(),
                _ => String::new(),
            }
        };

        let actual_minutes = mes_map
            .get(FieldRole::CycleTime)
            .and_then(|col| parse_locale_number(mes.cell(row, col)))
            .map(|seconds| round1(seconds / 60.0));
        let planned_minutes = match (plan_map.get(FieldRole::PlannedDuration), plan_row) {
            (Some(col), Some(prow)) => parse_locale_number(plan.cell(prow, col)),
            _ => None,
        };

        let deviation_minutes = match (actual_minutes, planned_minutes) {
            (Some(a), Some(p)) => Some(round1(a - p)),
            _ => None,
        };
        // division by a zero plan is undefined, not infinity
        let deviation_pct = match (deviation_minutes, planned_minutes) {
            (Some(d), Some(p)) if p != 0.0 => Some(round1(d / p * 100.0)),
            _ => None,
        };

        records.push(MergedRecord {
            part_code: plan_field(FieldRole::PartCode),
            operator: mes_field(FieldRole::Operator),
            work_order: key.to_string(),
            operation_no: mes_field(FieldRole::OperationNo),
            machine: mes_field(FieldRole::Machine),
            operation_code: mes_field(FieldRole::OperationCode),
            planned_minutes,
            actual_minutes,
            deviation_minutes,
            deviation_pct,
        });
    }

    if skipped > 0 {
        debug!(skipped, "MES rows without a work order excluded");
    }
    info!(
        plan_rows = plan.rows.len(),
        mes_rows = mes.rows.len(),
        merged = records.len(),
        "reconciled"
    );

    Ok(records)
}
