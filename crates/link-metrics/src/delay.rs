//! End-to-end delay estimation
//!
//! Sum of propagation, processing, queueing, and transmission delay for
//! one device-to-satellite link. Depends only on the raw row and the
//! configuration, not on the earlier derived columns.

use crate::config::{NetworkConfig, QueueParameters};
use crate::row::LinkRow;

/// Total end-to-end delay in seconds.
///
/// An unbounded queueing term (saturated M/M/1 queue) propagates into the
/// sum: the result is `f64::INFINITY`, never a clipped finite value.
pub fn end_to_end_delay(row: &LinkRow, config: &NetworkConfig) -> f64 {
    let propagation = row.distance_to_device / config.speed_of_light;
    let processing = config.processing_delay.satellite + config.processing_delay.gateway;
    let queueing = queueing_delay(&config.queue_parameters);
    let transmission = config.packet_size / config.data_rate;

    propagation + processing + queueing + transmission
}

/// M/M/1 waiting time `ρ / (μ·(1−ρ))` in seconds.
///
/// At or above saturation (`ρ ≥ 1`) the queue never drains; the delay is
/// reported as `f64::INFINITY`. This is a domain policy, not an error —
/// the marker is distinguishable from any finite delay via
/// [`f64::is_infinite`].
pub fn queueing_delay(queue: &QueueParameters) -> f64 {
    let rho = queue.utilization_factor;
    if rho < 1.0 {
        rho / (queue.service_rate * (1.0 - rho))
    } else {
        f64::INFINITY
    }
}
