//! Ground coverage area
//!
//! Instantaneous spherical-cap footprint visible from a satellite at a
//! given altitude.

use crate::{config::NetworkConfig, row::LinkRow, MetricsError, Result, Stage};
use std::f64::consts::PI;

/// Coverage area in km² for one observation.
///
/// `θ_max = acos(R_E / (R_E + h))`, `A = 2π·R_E²·(1 − cos θ_max)`,
/// converted from m² to km². A negative altitude puts the `acos` argument
/// above 1 and is refused as a domain error.
pub fn coverage_area(row: &LinkRow, config: &NetworkConfig) -> Result<f64> {
    let h = row.altitude;
    if h < 0.0 {
        return Err(MetricsError::domain(
            Stage::Coverage,
            format!("altitude must be non-negative, got {h}"),
        ));
    }
    let earth_radius = config.earth_radius;

    let theta_max = (earth_radius / (earth_radius + h)).acos();
    let area_m2 = 2.0 * PI * earth_radius.powi(2) * (1.0 - theta_max.cos());

    Ok(area_m2 / 1e6)
}
