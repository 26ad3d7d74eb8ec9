//! Stage orchestration
//!
//! [`Pipeline`] walks the run through its five states, applying one stage
//! to every row before advancing. Rows are independent within a stage, so
//! a sequential scan is semantically sufficient; the aggregate step only
//! runs once every row has passed all four per-row stages.
//!
//! Failure policy (deliberate, see DESIGN.md): a per-row domain error is
//! caught at the row boundary — the offending column stays empty, the
//! cause is recorded in the diagnostics, and the run continues. A
//! configuration error aborts before any row is touched. An aggregation
//! division-by-zero is fatal for the aggregate step only; the annotated
//! rows are still returned.

use crate::aggregate::{network_summary, NetworkSummary};
use crate::config::NetworkConfig;
use crate::events::{EventSink, PipelineEvent, TracingSink};
use crate::row::{LinkRow, RowFailure};
use crate::{coverage, delay, doppler, link_budget};
use crate::{Result, Stage};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Orchestrator states, entered in order. `AggregateDone` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Init,
    DopplerDone,
    LinkBudgetDone,
    DelayDone,
    CoverageDone,
    AggregateDone,
}

/// Per-run failure accounting.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunDiagnostics {
    /// Number of distinct rows refused by at least one stage.
    pub invalid_rows: usize,
    pub failures: Vec<RowFailure>,
    /// Cause when the aggregate step was refused (`summary` is then `None`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregation_failure: Option<String>,
}

/// Output of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunResult {
    /// The input rows, annotated with the derived metric columns.
    pub rows: Vec<LinkRow>,
    /// Network-wide scalars; `None` when the aggregate step was refused.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<NetworkSummary>,
    pub diagnostics: RunDiagnostics,
}

/// Sequences the four per-row stages and the aggregator over a row
/// collection, reporting progress through an [`EventSink`].
pub struct Pipeline<'cfg, S = TracingSink> {
    config: &'cfg NetworkConfig,
    sink: S,
    state: RunState,
}

impl<'cfg> Pipeline<'cfg, TracingSink> {
    /// Pipeline reporting through `tracing`.
    pub fn new(config: &'cfg NetworkConfig) -> Self {
        Self::with_sink(config, TracingSink)
    }
}

impl<'cfg, S: EventSink> Pipeline<'cfg, S> {
    pub fn with_sink(config: &'cfg NetworkConfig, sink: S) -> Self {
        Self {
            config,
            sink,
            state: RunState::Init,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    /// Run the full pipeline over `rows`.
    ///
    /// Fails fast on an invalid configuration; every other failure mode
    /// is captured in the returned [`RunResult`].
    pub fn run(mut self, mut rows: Vec<LinkRow>) -> Result<RunResult> {
        self.config.validate()?;
        self.sink.emit(&PipelineEvent::RunStarted { rows: rows.len() });

        let mut failures: Vec<RowFailure> = Vec::new();

        self.apply_stage(Stage::Doppler, &mut rows, &mut failures, |row, config| {
            row.doppler_shift = Some(doppler::doppler_shift(row, config));
            Ok(())
        });
        self.state = RunState::DopplerDone;

        self.apply_stage(Stage::LinkBudget, &mut rows, &mut failures, |row, config| {
            row.link_budget = Some(link_budget::link_budget(row, config)?);
            Ok(())
        });
        self.state = RunState::LinkBudgetDone;

        self.apply_stage(Stage::Delay, &mut rows, &mut failures, |row, config| {
            row.end_to_end_delay = Some(delay::end_to_end_delay(row, config));
            Ok(())
        });
        self.state = RunState::DelayDone;

        self.apply_stage(Stage::Coverage, &mut rows, &mut failures, |row, config| {
            row.coverage_area_km2 = Some(coverage::coverage_area(row, config)?);
            Ok(())
        });
        self.state = RunState::CoverageDone;

        // Barrier: every row has now been through all four per-row stages.
        self.sink.emit(&PipelineEvent::StageStarted {
            stage: Stage::Aggregate,
            rows: rows.len(),
        });
        let (summary, aggregation_failure) = match network_summary(&rows, self.config) {
            Ok(summary) => {
                self.sink.emit(&PipelineEvent::SummaryReady { summary });
                (Some(summary), None)
            }
            Err(err) => {
                let reason = err.to_string();
                self.sink.emit(&PipelineEvent::AggregateFailed {
                    reason: reason.clone(),
                });
                (None, Some(reason))
            }
        };
        self.state = RunState::AggregateDone;

        let invalid_rows = failures
            .iter()
            .map(|f| f.row)
            .collect::<BTreeSet<_>>()
            .len();
        self.sink.emit(&PipelineEvent::RunCompleted { invalid_rows });

        Ok(RunResult {
            rows,
            summary,
            diagnostics: RunDiagnostics {
                invalid_rows,
                failures,
                aggregation_failure,
            },
        })
    }

    fn apply_stage<F>(
        &mut self,
        stage: Stage,
        rows: &mut [LinkRow],
        failures: &mut Vec<RowFailure>,
        apply: F,
    ) where
        F: Fn(&mut LinkRow, &NetworkConfig) -> Result<()>,
    {
        self.sink.emit(&PipelineEvent::StageStarted {
            stage,
            rows: rows.len(),
        });

        let mut failed_rows = 0;
        for (index, row) in rows.iter_mut().enumerate() {
            if let Err(err) = apply(row, self.config) {
                failed_rows += 1;
                let reason = err.to_string();
                self.sink.emit(&PipelineEvent::RowFailed {
                    stage,
                    row: index,
                    reason: reason.clone(),
                });
                failures.push(RowFailure {
                    row: index,
                    stage,
                    reason,
                });
            }
        }

        self.sink.emit(&PipelineEvent::StageCompleted { stage, failed_rows });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{NullSink, VecSink};
    use crate::MetricsError;

    fn sample_config() -> NetworkConfig {
        serde_json::from_value(serde_json::json!({
            "earth_radius": 6_371_000.0,
            "speed_of_light": 3.0e8,
            "carrier_frequency": 868.0e6,
            "gateway_gain": 12.0,
            "satellite_gain": 5.0,
            "lora_parameters": { "transmission_power": 14.0, "bandwidth": 125_000.0 },
            "processing_delay": { "satellite": 0.005, "gateway": 0.002 },
            "queue_parameters": { "utilization_factor": 0.9, "service_rate": 100.0 },
            "packet_size": 1024.0,
            "data_rate": 5470.0,
            "simulation_time": 100.0,
            "power_consumption_per_satellite": 10.0,
            "num_leo_satellites": 60
        }))
        .unwrap()
    }

    fn sample_rows() -> Vec<LinkRow> {
        vec![
            LinkRow::new(500_000.0, 7600.0, 45.0, 800_000.0).with_traffic(10.0, 4.0e6),
            LinkRow::new(550_000.0, -7500.0, 10.0, 1_400_000.0).with_traffic(20.0, 6.0e6),
            LinkRow::new(600_000.0, 7400.0, 85.0, 650_000.0).with_traffic(5.0, 1.0e6),
        ]
    }

    #[test]
    fn test_clean_run_annotates_every_row() {
        let config = sample_config();
        let result = Pipeline::with_sink(&config, NullSink)
            .run(sample_rows())
            .unwrap();

        assert!(result.rows.iter().all(LinkRow::fully_annotated));
        assert_eq!(result.diagnostics.invalid_rows, 0);
        assert!(result.diagnostics.failures.is_empty());

        let summary = result.summary.unwrap();
        assert_eq!(summary.channel_utilization_pct, 35.0);
    }

    #[test]
    fn test_invalid_config_aborts_before_rows() {
        let mut config = sample_config();
        config.data_rate = 0.0;
        let err = Pipeline::with_sink(&config, NullSink)
            .run(sample_rows())
            .unwrap_err();
        assert!(matches!(err, MetricsError::InvalidConfig { .. }));
    }

    #[test]
    fn test_bad_row_is_skipped_and_counted() {
        let config = sample_config();
        let mut rows = sample_rows();
        rows[1].distance_to_device = -10.0; // refused by the link-budget stage
        rows[1].altitude = -5.0; // refused by the coverage stage

        let result = Pipeline::with_sink(&config, NullSink).run(rows).unwrap();

        // One distinct row, two stage refusals.
        assert_eq!(result.diagnostics.invalid_rows, 1);
        assert_eq!(result.diagnostics.failures.len(), 2);
        assert_eq!(result.diagnostics.failures[0].row, 1);
        assert_eq!(result.diagnostics.failures[0].stage, Stage::LinkBudget);
        assert_eq!(result.diagnostics.failures[1].stage, Stage::Coverage);

        // The refused columns stay empty; the rest are populated.
        assert!(result.rows[1].link_budget.is_none());
        assert!(result.rows[1].coverage_area_km2.is_none());
        assert!(result.rows[1].doppler_shift.is_some());
        assert!(result.rows[1].end_to_end_delay.is_some());

        // Healthy rows are untouched by the neighbour's failure.
        assert!(result.rows[0].fully_annotated());
        assert!(result.rows[2].fully_annotated());
        assert!(result.summary.is_some());
    }

    #[test]
    fn test_aggregate_refusal_still_returns_rows() {
        let mut config = sample_config();
        config.simulation_time = 0.0;

        let result = Pipeline::with_sink(&config, NullSink)
            .run(sample_rows())
            .unwrap();

        assert!(result.summary.is_none());
        let cause = result.diagnostics.aggregation_failure.unwrap();
        assert!(cause.contains("simulation_time"));
        assert!(result.rows.iter().all(LinkRow::fully_annotated));
    }

    #[test]
    fn test_event_stream_covers_all_stages() {
        let config = sample_config();
        let mut sink = VecSink::default();

        let pipeline = Pipeline::with_sink(&config, &mut sink);
        assert_eq!(pipeline.state(), RunState::Init);
        pipeline.run(sample_rows()).unwrap();

        let events = &sink.events;
        assert!(matches!(events.first(), Some(PipelineEvent::RunStarted { rows: 3 })));
        assert!(matches!(events.last(), Some(PipelineEvent::RunCompleted { invalid_rows: 0 })));

        for stage in [
            Stage::Doppler,
            Stage::LinkBudget,
            Stage::Delay,
            Stage::Coverage,
            Stage::Aggregate,
        ] {
            assert!(
                events
                    .iter()
                    .any(|e| matches!(e, PipelineEvent::StageStarted { stage: s, .. } if *s == stage)),
                "no start event for {stage}"
            );
        }
        assert!(events
            .iter()
            .any(|e| matches!(e, PipelineEvent::SummaryReady { .. })));
    }

    #[test]
    fn test_rerun_is_bit_identical() {
        let config = sample_config();
        let first = Pipeline::with_sink(&config, NullSink)
            .run(sample_rows())
            .unwrap();
        let second = Pipeline::with_sink(&config, NullSink)
            .run(sample_rows())
            .unwrap();
        assert_eq!(first, second);

        // Feeding annotated rows back through produces the same columns.
        let third = Pipeline::with_sink(&config, NullSink)
            .run(first.rows.clone())
            .unwrap();
        assert_eq!(first.rows, third.rows);
    }
}
