//! Simulation Runner
//!
//! Ingestion and reporting around the `link-metrics` pipeline: loads the
//! JSON configuration and row table, runs the pipeline, and writes the
//! augmented rows plus a run report back to disk.

use thiserror::Error;

pub mod loader;
pub mod report;

#[derive(Error, Debug)]
pub enum RunnerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("configuration rejected: {0}")]
    Config(#[from] link_metrics::MetricsError),
    #[error("no usable rows in {0}")]
    NoRows(String),
}

pub type Result<T> = std::result::Result<T, RunnerError>;
