//! LEO IoT Metrics Simulation CLI
//!
//! Runs the five-stage link-metrics pipeline over a row table.
//!
//! Usage:
//!   run-simulation --config data/simulation_config.json \
//!                  --rows data/leo_positions.json \
//!                  --output out/annotated_rows.json \
//!                  --report out/run_report.json

use anyhow::Result;
use clap::Parser;
use link_metrics::Pipeline;
use sim_runner::{loader, report::{self, RunReport}};
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(
    name = "run-simulation",
    about = "Estimate per-link and network metrics for a LEO IoT constellation"
)]
struct Args {
    /// Path to the simulation configuration JSON
    #[arg(short, long, default_value = "data/simulation_config.json")]
    config: PathBuf,

    /// Path to the observation rows JSON
    #[arg(short, long, default_value = "data/leo_positions.json")]
    rows: PathBuf,

    /// Output file for the annotated rows
    #[arg(short, long, default_value = "out/annotated_rows.json")]
    output: PathBuf,

    /// Output file for the run report
    #[arg(long, default_value = "out/run_report.json")]
    report: PathBuf,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("{}", "=".repeat(60));
    info!("LEO IoT Link Metrics Simulation");
    info!("{}", "=".repeat(60));

    let config = loader::load_config(&args.config)?;
    let rows = loader::load_rows(&args.rows)?;

    let result = Pipeline::new(&config).run(rows)?;
    let run_report = RunReport::from_run(&result);

    if let Some(parent) = args.output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if let Some(parent) = args.report.parent() {
        std::fs::create_dir_all(parent)?;
    }

    info!("Writing annotated rows to {:?}", args.output);
    report::write_json(&args.output, &result.rows)?;
    info!("Writing run report to {:?}", args.report);
    report::write_json(&args.report, &run_report)?;

    info!("{}", "=".repeat(60));
    info!("SUMMARY");
    info!("{}", "=".repeat(60));
    info!("Rows processed: {}", run_report.total_rows);
    info!("Invalid rows:   {}", run_report.invalid_rows);
    info!(
        "Total coverage: {:.0} km^2",
        run_report.total_coverage_area_km2
    );
    match (&run_report.channel_utilization_pct, &run_report.energy_efficiency_bits_per_joule) {
        (Some(utilization), Some(efficiency)) => {
            info!("Channel utilization: {utilization:.2}%");
            info!("Energy efficiency:   {efficiency:.2} bits/J");
        }
        _ => {
            if let Some(cause) = &run_report.aggregation_failure {
                warn!("Network aggregates unavailable: {cause}");
            }
        }
    }

    Ok(())
}
