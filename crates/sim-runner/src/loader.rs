//! Data loading from JSON files

use crate::{Result, RunnerError};
use link_metrics::{LinkRow, NetworkConfig};
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::{info, warn};

/// Raw observation row from JSON. The four kinematic fields are required
/// for a row to be usable; the traffic fields default to zero.
#[derive(Debug, Deserialize)]
struct RawRow {
    altitude: Option<f64>,
    velocity: Option<f64>,
    elevation_angle: Option<f64>,
    distance_to_device: Option<f64>,
    transmission_time: Option<f64>,
    effective_throughput: Option<f64>,
}

/// Load and validate the simulation configuration.
///
/// Missing required keys fail at deserialization; `validate()` then
/// rejects structurally unusable values. Either way the failure happens
/// before any row is processed.
pub fn load_config(path: impl AsRef<Path>) -> Result<NetworkConfig> {
    let path = path.as_ref();
    info!("Loading configuration from {:?}", path);

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let config: NetworkConfig = serde_json::from_reader(reader)?;
    config.validate()?;

    Ok(config)
}

/// Load observation rows from a JSON array.
///
/// Rows missing any kinematic field are skipped and counted. Absent
/// traffic fields default to zero; how many rows were defaulted is
/// logged, since the aggregates silently shrink when the data source
/// leaves them out.
pub fn load_rows(path: impl AsRef<Path>) -> Result<Vec<LinkRow>> {
    let path = path.as_ref();
    info!("Loading observation rows from {:?}", path);

    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let raw: Vec<RawRow> = serde_json::from_reader(reader)?;

    let mut rows = Vec::with_capacity(raw.len());
    let mut skipped = 0;
    let mut defaulted_traffic = 0;

    for entry in raw {
        let (altitude, velocity, elevation_angle, distance) = match (
            entry.altitude,
            entry.velocity,
            entry.elevation_angle,
            entry.distance_to_device,
        ) {
            (Some(h), Some(v), Some(e), Some(d)) => (h, v, e, d),
            _ => {
                skipped += 1;
                continue;
            }
        };

        if entry.transmission_time.is_none() || entry.effective_throughput.is_none() {
            defaulted_traffic += 1;
        }

        rows.push(
            LinkRow::new(altitude, velocity, elevation_angle, distance).with_traffic(
                entry.transmission_time.unwrap_or(0.0),
                entry.effective_throughput.unwrap_or(0.0),
            ),
        );
    }

    if rows.is_empty() {
        return Err(RunnerError::NoRows(path.display().to_string()));
    }

    info!(
        "Loaded {} rows ({} skipped for missing kinematic fields)",
        rows.len(),
        skipped
    );
    if defaulted_traffic > 0 {
        warn!(
            "{} rows had no traffic accounting; their transmission time and \
             throughput default to zero",
            defaulted_traffic
        );
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    const CONFIG_JSON: &str = r#"{
        "earth_radius": 6371000.0,
        "speed_of_light": 3.0e8,
        "carrier_frequency": 868.0e6,
        "gateway_gain": 12.0,
        "satellite_gain": 5.0,
        "lora_parameters": { "transmission_power": 14.0, "bandwidth": 125000.0 },
        "processing_delay": { "satellite": 0.005, "gateway": 0.002 },
        "queue_parameters": { "utilization_factor": 0.9, "service_rate": 100.0 },
        "packet_size": 1024.0,
        "data_rate": 5470.0,
        "simulation_time": 3600.0,
        "power_consumption_per_satellite": 10.0,
        "num_leo_satellites": 60
    }"#;

    #[test]
    fn test_load_config() {
        let file = write_temp(CONFIG_JSON);
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.num_leo_satellites, 60);
        assert_eq!(config.atmospheric_loss, 2.0); // defaulted
    }

    #[test]
    fn test_load_config_missing_key_fails() {
        let file = write_temp(r#"{"earth_radius": 6371000.0}"#);
        assert!(matches!(load_config(file.path()), Err(RunnerError::Json(_))));
    }

    #[test]
    fn test_load_rows_skips_incomplete() {
        let file = write_temp(
            r#"[
                {"altitude": 500000.0, "velocity": 7600.0,
                 "elevation_angle": 45.0, "distance_to_device": 800000.0,
                 "transmission_time": 10.0, "effective_throughput": 4.0e6},
                {"altitude": 550000.0, "velocity": 7500.0}
            ]"#,
        );

        let rows = load_rows(file.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].transmission_time, 10.0);
    }

    #[test]
    fn test_load_rows_defaults_traffic() {
        let file = write_temp(
            r#"[{"altitude": 500000.0, "velocity": 7600.0,
                 "elevation_angle": 45.0, "distance_to_device": 800000.0}]"#,
        );

        let rows = load_rows(file.path()).unwrap();
        assert_eq!(rows[0].transmission_time, 0.0);
        assert_eq!(rows[0].effective_throughput, 0.0);
    }

    #[test]
    fn test_load_rows_empty_is_error() {
        let file = write_temp("[]");
        assert!(matches!(load_rows(file.path()), Err(RunnerError::NoRows(_))));
    }
}
