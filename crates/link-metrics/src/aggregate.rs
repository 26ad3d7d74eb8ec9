//! Network-wide aggregates
//!
//! Reductions over the full row collection: channel utilization and
//! energy efficiency. Both consume only the externally supplied traffic
//! columns (`transmission_time`, `effective_throughput`), never the
//! derived per-row metrics, but the orchestrator still schedules them
//! strictly after every per-row stage has completed.

use crate::{config::NetworkConfig, row::LinkRow, MetricsError, Result};
use serde::{Deserialize, Serialize};

/// The two network-level scalars produced by a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetworkSummary {
    /// Fraction of the simulated time the channel was transmitting, in percent.
    pub channel_utilization_pct: f64,
    /// Delivered bits per Joule consumed by the fleet.
    pub energy_efficiency_bits_per_joule: f64,
}

/// Channel utilization in percent.
///
/// `100 · Σ transmission_time / simulation_time`. A zero simulation time
/// is refused as a division-by-zero error, never returned as NaN or
/// infinity.
pub fn channel_utilization(rows: &[LinkRow], config: &NetworkConfig) -> Result<f64> {
    if config.simulation_time == 0.0 {
        return Err(MetricsError::DivisionByZero {
            quantity: "simulation_time",
        });
    }
    let total_transmission: f64 = rows.iter().map(|r| r.transmission_time).sum();
    Ok(total_transmission / config.simulation_time * 100.0)
}

/// Energy efficiency in bits per Joule.
///
/// `Σ effective_throughput / (P_sat · N_sat · simulation_time)`, with the
/// denominator in Joules. A zero denominator (zero power, empty fleet, or
/// zero simulation time) is refused as a division-by-zero error.
pub fn energy_efficiency(rows: &[LinkRow], config: &NetworkConfig) -> Result<f64> {
    let total_energy_joules = config.power_consumption_per_satellite
        * f64::from(config.num_leo_satellites)
        * config.simulation_time;
    if total_energy_joules == 0.0 {
        return Err(MetricsError::DivisionByZero {
            quantity: "total fleet energy (power × satellites × simulation_time)",
        });
    }
    let total_throughput: f64 = rows.iter().map(|r| r.effective_throughput).sum();
    Ok(total_throughput / total_energy_joules)
}

/// Both aggregates in one pass.
pub fn network_summary(rows: &[LinkRow], config: &NetworkConfig) -> Result<NetworkSummary> {
    Ok(NetworkSummary {
        channel_utilization_pct: channel_utilization(rows, config)?,
        energy_efficiency_bits_per_joule: energy_efficiency(rows, config)?,
    })
}
