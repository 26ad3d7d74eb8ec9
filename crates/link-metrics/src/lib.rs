//! Link Metrics Library
//!
//! Per-link physical-layer and network-level metric estimation for a LEO
//! satellite IoT constellation: Doppler shift, link budget, end-to-end
//! delay, ground coverage area, and network-wide channel utilization and
//! energy efficiency.
//!
//! The computation is organized as a five-stage pipeline over a collection
//! of [`LinkRow`] observations sharing one immutable [`NetworkConfig`]:
//!
//! ```text
//! rows ─> Doppler ─> LinkBudget ─> Delay ─> Coverage ─> Aggregate
//! ```
//!
//! Each per-row stage is a pure function of `(row, config)`; the aggregator
//! is a pure reduction over the whole collection and only runs once every
//! row has passed the four per-row stages. [`Pipeline`] sequences the
//! stages and reports progress and per-row failures through an injected
//! [`EventSink`].

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub mod aggregate;
pub mod config;
pub mod coverage;
pub mod delay;
pub mod doppler;
pub mod events;
pub mod link_budget;
pub mod pipeline;
pub mod row;

pub use aggregate::{network_summary, NetworkSummary};
pub use config::{LoraParameters, NetworkConfig, ProcessingDelay, QueueParameters};
pub use events::{EventSink, NullSink, PipelineEvent, TracingSink};
pub use pipeline::{Pipeline, RunDiagnostics, RunResult, RunState};
pub use row::{LinkRow, RowFailure};

/// Speed of light in vacuum, m/s.
///
/// Used by the Doppler stage only. The link-budget and delay stages use the
/// configured `speed_of_light` instead; the two values are kept distinct on
/// purpose (the configured one may model a non-vacuum medium).
pub const VACUUM_SPEED_OF_LIGHT: f64 = 299_792_458.0;

#[derive(Error, Debug)]
pub enum MetricsError {
    #[error("invalid config value for {key}: {reason}")]
    InvalidConfig { key: &'static str, reason: String },
    #[error("{stage} stage input out of domain: {reason}")]
    Domain { stage: Stage, reason: String },
    #[error("{stage} stage requires {field} from an earlier stage")]
    MissingDerived { stage: Stage, field: &'static str },
    #[error("division by zero: {quantity} is zero")]
    DivisionByZero { quantity: &'static str },
}

impl MetricsError {
    pub(crate) fn domain(stage: Stage, reason: impl Into<String>) -> Self {
        Self::Domain {
            stage,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MetricsError>;

/// The five pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    Doppler,
    LinkBudget,
    Delay,
    Coverage,
    Aggregate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Doppler => "doppler",
            Stage::LinkBudget => "link-budget",
            Stage::Delay => "delay",
            Stage::Coverage => "coverage",
            Stage::Aggregate => "aggregate",
        };
        f.write_str(name)
    }
}
