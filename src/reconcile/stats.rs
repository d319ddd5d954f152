use serde::{Deserialize, Serialize};

use crate::reconcile::{round1, MergedRecord};

/// Aggregate view over one reconciliation run. Derived, never mutated;
/// recompute after any change to the record set.
///
/// `with_deviation` versus `total` doubles as the data-completeness
/// signal: rows with unparsable or unmatched durations lower it without
/// raising any error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationStats {
    /// All merged records.
    pub total: usize,
    /// Records where both durations were present.
    pub with_deviation: usize,
    /// Deviation > 0: actual ran slower than planned.
    pub slower_than_plan: usize,
    /// Deviation < 0: actual ran faster than planned.
    pub faster_than_plan: usize,
    /// Sum of present deviations, minutes, one decimal.
    pub deviation_sum_minutes: f64,
    /// Mean of present deviation percentages, one decimal. Zero when no
    /// record carries a percentage, keeping the function total.
    pub mean_deviation_pct: f64,
}

/// Pure fold over the record set.
pub fn build_stats(records: &[MergedRecord]) -> ReconciliationStats {
    let deviations: Vec<f64> = records.iter().filter_map(|r| r.deviation_minutes).collect();
    let percentages: Vec<f64> = records.iter().filter_map(|r| r.deviation_pct).collect();

    let mean_deviation_pct = if percentages.is_empty() {
        0.0
    } else {
        round1(percentages.iter().sum::<f64>() / percentages.len() as f64)
    };

    ReconciliationStats {
        total: records.len(),
        with_deviation: deviations.len(),
        slower_than_plan: deviations.iter().filter(|d| **d > 0.0).count(),
        faster_than_plan: deviations.iter().filter(|d| **d < 0.0).count(),
        deviation_sum_minutes: round1(deviations.iter().sum()),
        mean_deviation_pct,
    }
}
