//! Per-link observation rows
//!
//! One [`LinkRow`] per (satellite, time, device) observation. The four
//! kinematic inputs come from the external data source; the derived
//! columns are populated by the pipeline in stage order and are
//! write-once for a run. A derived column left `None` after a run means
//! the stage refused the row's inputs (see [`RowFailure`]) — the pipeline
//! never invents a number for a failed stage.

use crate::Stage;
use serde::{Deserialize, Serialize};

/// One satellite-device observation with its derived metric columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkRow {
    /// Satellite altitude above the surface, in meters.
    pub altitude: f64,
    /// Satellite speed in m/s.
    pub velocity: f64,
    /// Elevation angle of the satellite as seen from the device, degrees.
    pub elevation_angle: f64,
    /// Slant range between satellite and device, in meters.
    pub distance_to_device: f64,
    /// Time this link spent transmitting during the run, in seconds.
    /// Supplied by the data source, consumed only by the aggregator.
    #[serde(default)]
    pub transmission_time: f64,
    /// Payload bits successfully delivered over this link.
    /// Supplied by the data source, consumed only by the aggregator.
    #[serde(default)]
    pub effective_throughput: f64,

    // Derived columns, populated in stage order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doppler_shift: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link_budget: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_to_end_delay: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage_area_km2: Option<f64>,
}

impl LinkRow {
    /// Row with the four kinematic inputs and no traffic accounting.
    pub fn new(altitude: f64, velocity: f64, elevation_angle: f64, distance_to_device: f64) -> Self {
        Self {
            altitude,
            velocity,
            elevation_angle,
            distance_to_device,
            transmission_time: 0.0,
            effective_throughput: 0.0,
            doppler_shift: None,
            link_budget: None,
            end_to_end_delay: None,
            coverage_area_km2: None,
        }
    }

    /// Attach the externally supplied traffic figures.
    pub fn with_traffic(mut self, transmission_time: f64, effective_throughput: f64) -> Self {
        self.transmission_time = transmission_time;
        self.effective_throughput = effective_throughput;
        self
    }

    /// True once every per-row stage has produced a value for this row.
    pub fn fully_annotated(&self) -> bool {
        self.doppler_shift.is_some()
            && self.link_budget.is_some()
            && self.end_to_end_delay.is_some()
            && self.coverage_area_km2.is_some()
    }
}

/// One per-row stage refusal, recorded by the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowFailure {
    /// Index of the row in the input collection.
    pub row: usize,
    pub stage: Stage,
    /// Rendered cause, including the offending input value.
    pub reason: String,
}
