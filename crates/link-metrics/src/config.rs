//! Simulation configuration
//!
//! Typed view of the physical and network constants consumed by the
//! pipeline. The configuration is deserialized once before the run starts
//! and shared read-only across every stage invocation; missing required
//! keys fail at deserialization, before any row is processed.

use crate::{MetricsError, Result};
use serde::{Deserialize, Serialize};

fn default_atmospheric_loss() -> f64 {
    2.0
}

/// Physical and network constants for one simulation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Earth radius in meters.
    pub earth_radius: f64,
    /// Configured signal propagation speed in m/s, consumed by the
    /// link-budget and delay formulas. Distinct from
    /// [`crate::VACUUM_SPEED_OF_LIGHT`] used by the Doppler stage.
    pub speed_of_light: f64,
    /// Carrier frequency in Hz.
    pub carrier_frequency: f64,
    /// Gateway transmit antenna gain in dBi.
    pub gateway_gain: f64,
    /// Satellite receive antenna gain in dBi.
    pub satellite_gain: f64,
    /// Atmospheric loss in dB. Defaults to 2 dB when absent.
    #[serde(default = "default_atmospheric_loss")]
    pub atmospheric_loss: f64,
    pub lora_parameters: LoraParameters,
    pub processing_delay: ProcessingDelay,
    pub queue_parameters: QueueParameters,
    /// Packet size in bits.
    pub packet_size: f64,
    /// Data rate in bits per second.
    pub data_rate: f64,
    /// Total simulated time in seconds.
    pub simulation_time: f64,
    /// Per-satellite power draw in watts.
    pub power_consumption_per_satellite: f64,
    /// Fleet size.
    pub num_leo_satellites: u32,
}

/// LoRa radio parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoraParameters {
    /// Transmit power in dBm.
    pub transmission_power: f64,
    /// Channel bandwidth in Hz.
    pub bandwidth: f64,
}

/// Fixed processing times on each hop, in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingDelay {
    pub satellite: f64,
    pub gateway: f64,
}

/// M/M/1 queueing model parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueParameters {
    /// Utilization factor rho. Values at or above 1 describe a saturated
    /// queue and yield an unbounded queueing delay downstream.
    pub utilization_factor: f64,
    /// Service rate in packets per second.
    pub service_rate: f64,
}

impl NetworkConfig {
    /// Reject structurally unusable values before the pipeline starts.
    ///
    /// Conditions the error taxonomy assigns to later stages are left
    /// alone here: a non-positive carrier frequency surfaces as a per-row
    /// domain error in the link-budget stage, and a zero simulation time
    /// or zero total power surfaces when the aggregator runs.
    pub fn validate(&self) -> Result<()> {
        self.require_finite()?;

        Self::positive("earth_radius", self.earth_radius)?;
        Self::positive("speed_of_light", self.speed_of_light)?;
        Self::positive("lora_parameters.bandwidth", self.lora_parameters.bandwidth)?;
        Self::positive("queue_parameters.service_rate", self.queue_parameters.service_rate)?;
        Self::positive("data_rate", self.data_rate)?;

        if self.queue_parameters.utilization_factor < 0.0 {
            return Err(MetricsError::InvalidConfig {
                key: "queue_parameters.utilization_factor",
                reason: format!(
                    "must be non-negative, got {}",
                    self.queue_parameters.utilization_factor
                ),
            });
        }

        Ok(())
    }

    fn require_finite(&self) -> Result<()> {
        let fields = [
            ("earth_radius", self.earth_radius),
            ("speed_of_light", self.speed_of_light),
            ("carrier_frequency", self.carrier_frequency),
            ("gateway_gain", self.gateway_gain),
            ("satellite_gain", self.satellite_gain),
            ("atmospheric_loss", self.atmospheric_loss),
            ("lora_parameters.transmission_power", self.lora_parameters.transmission_power),
            ("lora_parameters.bandwidth", self.lora_parameters.bandwidth),
            ("processing_delay.satellite", self.processing_delay.satellite),
            ("processing_delay.gateway", self.processing_delay.gateway),
            ("queue_parameters.utilization_factor", self.queue_parameters.utilization_factor),
            ("queue_parameters.service_rate", self.queue_parameters.service_rate),
            ("packet_size", self.packet_size),
            ("data_rate", self.data_rate),
            ("simulation_time", self.simulation_time),
            ("power_consumption_per_satellite", self.power_consumption_per_satellite),
        ];
        for (key, value) in fields {
            if !value.is_finite() {
                return Err(MetricsError::InvalidConfig {
                    key,
                    reason: format!("must be finite, got {value}"),
                });
            }
        }
        Ok(())
    }

    fn positive(key: &'static str, value: f64) -> Result<()> {
        if value > 0.0 {
            Ok(())
        } else {
            Err(MetricsError::InvalidConfig {
                key,
                reason: format!("must be positive, got {value}"),
            })
        }
    }
}
