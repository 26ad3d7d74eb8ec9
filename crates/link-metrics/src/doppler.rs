//! Doppler shift estimation
//!
//! Frequency offset of the received signal due to relative motion between
//! the satellite and the ground device.

use crate::{config::NetworkConfig, row::LinkRow, VACUUM_SPEED_OF_LIGHT};

/// Doppler shift in Hz for one observation.
///
/// `f_d = f_c · v_s · cos(θ) / c₀`, with θ the elevation angle and `c₀`
/// the vacuum speed of light ([`VACUUM_SPEED_OF_LIGHT`], not the
/// configured propagation speed). Total over all real inputs.
pub fn doppler_shift(row: &LinkRow, config: &NetworkConfig) -> f64 {
    let theta = row.elevation_angle.to_radians();
    config.carrier_frequency * (row.velocity * theta.cos()) / VACUUM_SPEED_OF_LIGHT
}
