//! Link budget computation
//!
//! Net received signal power in dB after transmit power, antenna gains,
//! free-space path loss, atmospheric loss, and Doppler-induced
//! degradation. Consumes the Doppler column produced by the previous
//! stage.

use crate::{config::NetworkConfig, row::LinkRow, MetricsError, Result, Stage};

/// Link budget in dB for one observation.
///
/// ```text
/// budget = P_t + G_t + G_r − L_fs − L_atm − L_d
/// L_fs   = 20·log10(d) + 20·log10(f_c) − 20·log10(c)
/// L_d    = 20·log10(1 + f_d / BW)
/// ```
///
/// `c` is the configured propagation speed, not the vacuum constant the
/// Doppler stage uses. Inputs that leave `log10` undefined are refused as
/// domain errors rather than silently producing NaN: non-positive
/// distance or carrier frequency, and a Doppler shift so far negative
/// that `1 + f_d/BW` is not positive.
pub fn link_budget(row: &LinkRow, config: &NetworkConfig) -> Result<f64> {
    let d = row.distance_to_device;
    if d <= 0.0 {
        return Err(MetricsError::domain(
            Stage::LinkBudget,
            format!("distance_to_device must be positive, got {d}"),
        ));
    }
    let f_c = config.carrier_frequency;
    if f_c <= 0.0 {
        return Err(MetricsError::domain(
            Stage::LinkBudget,
            format!("carrier_frequency must be positive, got {f_c}"),
        ));
    }
    let f_d = row.doppler_shift.ok_or(MetricsError::MissingDerived {
        stage: Stage::LinkBudget,
        field: "doppler_shift",
    })?;

    let bandwidth = config.lora_parameters.bandwidth;
    let degradation_arg = 1.0 + f_d / bandwidth;
    if degradation_arg <= 0.0 {
        return Err(MetricsError::domain(
            Stage::LinkBudget,
            format!(
                "doppler degradation undefined: 1 + f_d/BW = {degradation_arg} \
                 (f_d = {f_d} Hz, BW = {bandwidth} Hz)"
            ),
        ));
    }

    let free_space_loss =
        20.0 * d.log10() + 20.0 * f_c.log10() - 20.0 * config.speed_of_light.log10();
    let doppler_degradation = 20.0 * degradation_arg.log10();

    Ok(config.lora_parameters.transmission_power
        + config.gateway_gain
        + config.satellite_gain
        - free_space_loss
        - config.atmospheric_loss
        - doppler_degradation)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> NetworkConfig {
        serde_json::from_value(serde_json::json!({
            "earth_radius": 6_371_000.0,
            "speed_of_light": 3.0e8,
            "carrier_frequency": 868.0e6,
            "gateway_gain": 12.0,
            "satellite_gain": 5.0,
            "atmospheric_loss": 2.0,
            "lora_parameters": { "transmission_power": 14.0, "bandwidth": 125_000.0 },
            "processing_delay": { "satellite": 0.005, "gateway": 0.002 },
            "queue_parameters": { "utilization_factor": 0.9, "service_rate": 100.0 },
            "packet_size": 1024.0,
            "data_rate": 5470.0,
            "simulation_time": 3600.0,
            "power_consumption_per_satellite": 10.0,
            "num_leo_satellites": 60
        }))
        .unwrap()
    }

    fn row_at(distance_m: f64) -> LinkRow {
        let mut row = LinkRow::new(500_000.0, 7600.0, 30.0, distance_m);
        row.doppler_shift = Some(0.0);
        row
    }

    #[test]
    fn test_budget_decreases_with_distance() {
        let config = sample_config();
        let near = link_budget(&row_at(600_000.0), &config).unwrap();
        let far = link_budget(&row_at(1_800_000.0), &config).unwrap();
        assert!(near > far, "path loss should dominate: {near} vs {far}");

        // Tripling the distance costs 20·log10(3) ≈ 9.54 dB.
        assert!((near - far - 9.542).abs() < 0.01);
    }

    #[test]
    fn test_doppler_degradation_reduces_budget() {
        let config = sample_config();
        let mut shifted = row_at(1_000_000.0);
        shifted.doppler_shift = Some(20_000.0);

        let unshifted = link_budget(&row_at(1_000_000.0), &config).unwrap();
        let with_shift = link_budget(&shifted, &config).unwrap();
        assert!(with_shift < unshifted);
    }

    #[test]
    fn test_non_positive_distance_is_domain_error() {
        let config = sample_config();
        for d in [0.0, -50.0] {
            let err = link_budget(&row_at(d), &config).unwrap_err();
            assert!(matches!(err, MetricsError::Domain { stage: Stage::LinkBudget, .. }));
        }
    }

    #[test]
    fn test_non_positive_carrier_frequency_is_domain_error() {
        let mut config = sample_config();
        config.carrier_frequency = 0.0;
        let err = link_budget(&row_at(1_000_000.0), &config).unwrap_err();
        assert!(matches!(err, MetricsError::Domain { .. }));
    }

    #[test]
    fn test_missing_doppler_column_is_refused() {
        let config = sample_config();
        let row = LinkRow::new(500_000.0, 7600.0, 30.0, 1_000_000.0);
        let err = link_budget(&row, &config).unwrap_err();
        assert!(matches!(
            err,
            MetricsError::MissingDerived { field: "doppler_shift", .. }
        ));
    }

    #[test]
    fn test_extreme_negative_shift_is_domain_error() {
        let config = sample_config();
        let mut row = row_at(1_000_000.0);
        row.doppler_shift = Some(-2.0 * config.lora_parameters.bandwidth);
        let err = link_budget(&row, &config).unwrap_err();
        assert!(matches!(err, MetricsError::Domain { .. }));
    }
}
