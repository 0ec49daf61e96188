//! CLI entry point for the congestion cost estimator.
//!
//! Provides subcommands for listing vehicle classes, entering and importing
//! traffic samples, running a congestion cost analysis over a location and
//! date range, and regenerating the report for a stored result.

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use congestion_cost::catalog::VehicleCatalog;
use congestion_cost::engine::aggregate;
use congestion_cost::engine::types::{AnalysisOutcome, AnalysisParams, DelayGating};
use congestion_cost::report::{ReportRenderer, TextReport};
use congestion_cost::sample::{TrafficSample, import_csv};
use congestion_cost::store::DataStore;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "congestion_cost")]
#[command(about = "Estimate the economic and environmental cost of road congestion", long_about = None)]
struct Cli {
    /// Path to the JSON data store (overrides DATA_FILE_PATH)
    #[arg(long)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the vehicle classes known to the catalog
    Vehicles,
    /// Validate and append a single traffic sample
    Add {
        #[arg(long)]
        location: String,

        /// Observation date, YYYY-MM-DD
        #[arg(long)]
        date: String,

        /// Observation time, HH:MM
        #[arg(long)]
        time: String,

        /// Vehicle class id (see `vehicles`)
        #[arg(long)]
        vehicle_class: u32,

        /// Vehicle count
        #[arg(long)]
        volume: u32,

        /// Observed travel time in minutes
        #[arg(long)]
        actual_travel_time: f64,

        /// Free-flow travel time in minutes
        #[arg(long)]
        free_flow_travel_time: f64,

        /// Segment length in kilometers
        #[arg(long)]
        distance_km: f64,
    },
    /// Bulk-import traffic samples from a CSV file
    Import {
        /// CSV file with a header row matching the sample fields
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
    /// Run a congestion cost analysis over a location and date range
    Analyze {
        #[arg(long)]
        location: String,

        /// Range start, YYYY-MM-DD, inclusive
        #[arg(long)]
        start_date: String,

        /// Range end, YYYY-MM-DD, inclusive
        #[arg(long)]
        end_date: String,

        /// Monetary value of one person-hour of delay
        #[arg(long, default_value_t = 50.0)]
        value_of_time: f64,

        /// Petrol price per liter
        #[arg(long, default_value_t = 150.0)]
        petrol_price: f64,

        /// Diesel price per liter
        #[arg(long, default_value_t = 200.0)]
        diesel_price: f64,

        /// Assumed free-flow speed in km/h (recorded in the result)
        #[arg(long, default_value_t = 80.0)]
        free_flow_speed: f64,

        /// Whether zero-delay samples still pay the fuel penalty
        #[arg(long, value_enum, default_value_t = DelayGating::Always)]
        delay_gating: DelayGating,

        /// Optional: write a text report to this path
        #[arg(short, long)]
        report: Option<PathBuf>,
    },
    /// Regenerate the report document for a stored analysis result
    Report {
        /// Result id (printed by `analyze`)
        #[arg(value_name = "RESULT_ID")]
        id: String,

        /// Output path for the report document
        #[arg(short, long, default_value = "report.txt")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/congestion_cost.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("congestion_cost.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let data_path = cli.data.unwrap_or_else(|| {
        std::env::var("DATA_FILE_PATH")
            .unwrap_or_else(|_| "data/database.json".to_string())
            .into()
    });
    let store = DataStore::new(data_path);
    let catalog = VehicleCatalog::default_catalog();

    match cli.command {
        Commands::Vehicles => {
            for class in catalog.iter() {
                info!(
                    id = class.id,
                    name = %class.name,
                    fuel = %class.fuel_type,
                    base_fc = class.base_fuel_consumption,
                    occupancy = class.occupancy,
                    co2_factor = class.co2_factor,
                    multiplier = class.congestion_multiplier,
                    "Vehicle class"
                );
            }
        }
        Commands::Add {
            location,
            date,
            time,
            vehicle_class,
            volume,
            actual_travel_time,
            free_flow_travel_time,
            distance_km,
        } => {
            if catalog.lookup(vehicle_class).is_none() {
                bail!("unknown vehicle class id {vehicle_class}, see `vehicles`");
            }

            let sample = TrafficSample::new(
                &location,
                &date,
                &time,
                vehicle_class,
                volume,
                actual_travel_time,
                free_flow_travel_time,
                distance_km,
            )
            .context("sample rejected")?;

            let id = sample.id.clone();
            store.append_sample(sample)?;
            info!(sample_id = %id, "Traffic sample recorded");
        }
        Commands::Import { file } => {
            let (samples, skipped) = import_csv(&file)?;
            if skipped > 0 {
                warn!(skipped, "Some CSV rows were skipped");
            }
            if samples.is_empty() {
                bail!("no valid samples found in {}", file.display());
            }

            let count = samples.len();
            store.append_samples(samples)?;
            info!(imported = count, skipped, "CSV import complete");
        }
        Commands::Analyze {
            location,
            start_date,
            end_date,
            value_of_time,
            petrol_price,
            diesel_price,
            free_flow_speed,
            delay_gating,
            report,
        } => {
            let params = AnalysisParams {
                location,
                date_range_start: start_date,
                date_range_end: end_date,
                value_of_time,
                petrol_price,
                diesel_price,
                free_flow_speed,
                delay_gating,
            };

            let db = store.load()?;
            match aggregate::run(&db.traffic_data, &catalog, &params) {
                AnalysisOutcome::NoData => {
                    info!(
                        location = %params.location,
                        start = %params.date_range_start,
                        end = %params.date_range_end,
                        "No data available for the selected location and date range"
                    );
                }
                AnalysisOutcome::Completed(result) => {
                    // Persist before rendering: a renderer failure must not
                    // lose the computed result.
                    store.append_result(&result)?;
                    info!(result_id = %result.id, "Analysis result saved");

                    println!("{}", serde_json::to_string_pretty(&result)?);

                    if let Some(path) = report {
                        match TextReport.render(&result) {
                            Ok(bytes) => {
                                std::fs::write(&path, bytes)?;
                                info!(path = %path.display(), "Report written");
                            }
                            Err(e) => {
                                error!(error = %e, "Report rendering failed; result is saved");
                            }
                        }
                    }
                }
            }
        }
        Commands::Report { id, output } => {
            let Some(result) = store.find_result(&id)? else {
                bail!("no stored result with id {id}");
            };

            let bytes = TextReport.render(&result)?;
            std::fs::write(&output, bytes)?;
            info!(result_id = %id, path = %output.display(), "Report regenerated");
        }
    }

    Ok(())
}
