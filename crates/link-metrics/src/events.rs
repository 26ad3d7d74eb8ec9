//! Pipeline event stream
//!
//! The computational core never talks to a logging backend directly.
//! [`Pipeline`](crate::Pipeline) emits typed events through an injected
//! [`EventSink`]; [`TracingSink`] forwards them to the `tracing`
//! backbone and [`NullSink`] discards them (tests, embedding).

use crate::{NetworkSummary, Stage};
use tracing::{info, warn};

/// Progress and failure notifications emitted during a run.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    RunStarted {
        rows: usize,
    },
    StageStarted {
        stage: Stage,
        rows: usize,
    },
    StageCompleted {
        stage: Stage,
        failed_rows: usize,
    },
    /// A per-row stage refused its inputs; the row keeps going through
    /// later stages with this column left empty.
    RowFailed {
        stage: Stage,
        row: usize,
        reason: String,
    },
    /// The aggregate step was refused; per-row columns remain valid.
    AggregateFailed {
        reason: String,
    },
    SummaryReady {
        summary: NetworkSummary,
    },
    RunCompleted {
        invalid_rows: usize,
    },
}

/// Receiver for pipeline events.
pub trait EventSink {
    fn emit(&mut self, event: &PipelineEvent);
}

impl<T: EventSink> EventSink for &mut T {
    fn emit(&mut self, event: &PipelineEvent) {
        (**self).emit(event);
    }
}

/// Forwards events to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&mut self, event: &PipelineEvent) {
        match event {
            PipelineEvent::RunStarted { rows } => {
                info!("starting metrics run over {rows} rows");
            }
            PipelineEvent::StageStarted { stage, rows } => {
                info!("{stage} stage: processing {rows} rows");
            }
            PipelineEvent::StageCompleted { stage, failed_rows: 0 } => {
                info!("{stage} stage complete");
            }
            PipelineEvent::StageCompleted { stage, failed_rows } => {
                warn!("{stage} stage complete, {failed_rows} rows refused");
            }
            PipelineEvent::RowFailed { stage, row, reason } => {
                warn!("row {row} refused by {stage} stage: {reason}");
            }
            PipelineEvent::AggregateFailed { reason } => {
                warn!("aggregation refused: {reason}");
            }
            PipelineEvent::SummaryReady { summary } => {
                info!(
                    "channel utilization {:.2}%, energy efficiency {:.2} bits/J",
                    summary.channel_utilization_pct, summary.energy_efficiency_bits_per_joule
                );
            }
            PipelineEvent::RunCompleted { invalid_rows } => {
                info!("run complete ({invalid_rows} invalid rows)");
            }
        }
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &PipelineEvent) {}
}

/// Buffers events in memory. Used by tests to assert on the stream.
#[derive(Debug, Default)]
pub struct VecSink {
    pub events: Vec<PipelineEvent>,
}

impl EventSink for VecSink {
    fn emit(&mut self, event: &PipelineEvent) {
        self.events.push(event.clone());
    }
}
