//! Run report assembly and output writing

use crate::Result;
use chrono::Utc;
use link_metrics::{RowFailure, RunResult};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// Summary of one pipeline run, written beside the augmented rows.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub generated_at: String,
    pub total_rows: usize,
    /// Rows refused by at least one per-row stage.
    pub invalid_rows: usize,
    /// Sum over rows with a valid coverage column, in km².
    pub total_coverage_area_km2: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_utilization_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energy_efficiency_bits_per_joule: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregation_failure: Option<String>,
    pub failures: Vec<RowFailure>,
}

impl RunReport {
    pub fn from_run(result: &RunResult) -> Self {
        let total_coverage_area_km2 = result
            .rows
            .iter()
            .filter_map(|r| r.coverage_area_km2)
            .sum();

        Self {
            generated_at: Utc::now().to_rfc3339(),
            total_rows: result.rows.len(),
            invalid_rows: result.diagnostics.invalid_rows,
            total_coverage_area_km2,
            channel_utilization_pct: result.summary.map(|s| s.channel_utilization_pct),
            energy_efficiency_bits_per_joule: result
                .summary
                .map(|s| s.energy_efficiency_bits_per_joule),
            aggregation_failure: result.diagnostics.aggregation_failure.clone(),
            failures: result.diagnostics.failures.clone(),
        }
    }
}

/// Write any serializable value as pretty JSON.
pub fn write_json<T: Serialize>(path: impl AsRef<Path>, value: &T) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, value)?;
    Ok(())
}
