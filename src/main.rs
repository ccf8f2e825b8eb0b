//! CLI entry point for the managed charging enrollment dashboard.
//!
//! Each subcommand runs one pass over the configured sources and prints the
//! resulting view as JSON, or exports the core views as CSV.

use anyhow::{Context, Result};
use charging_enrollment::{
    cache::SourceCache,
    config::DataSources,
    dashboard::{Dashboard, MapPanel},
    output::{export_views, write_json},
    views::{MonthlyTable, RateComparison, Selection, aggregate_geo, aggregate_monthly, utility_totals},
};
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::Path;
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "charging-enrollment")]
#[command(about = "Explore managed charging program enrollments", long_about = None)]
struct Cli {
    /// Enrollment CSV path or URL (overrides ENROLLMENTS_SOURCE)
    #[arg(long, global = true)]
    enrollments: Option<String>,

    /// Vehicle count CSV path or URL (overrides VEHICLES_SOURCE)
    #[arg(long, global = true)]
    vehicles: Option<String>,

    /// Electricity rate CSV path or URL (overrides RATES_SOURCE)
    #[arg(long, global = true)]
    rates: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print every view for one utility selection
    Dashboard {
        /// Utility to select ("Show All", "DTE", "National Grid", "Xcel Energy")
        #[arg(short, long)]
        utility: Option<String>,

        /// Shareable query string carrying the selection, e.g. "utility=DTE"
        #[arg(short, long, conflicts_with = "utility")]
        query: Option<String>,
    },
    /// Print enrolled users per utility
    Totals,
    /// Print enrollment locations for the map
    Map {
        #[arg(short, long, default_value = "Show All")]
        utility: String,
    },
    /// Print monthly enrollments per utility
    Monthly {
        /// Print a zero-filled month by utility table instead
        #[arg(long, default_value_t = false)]
        pivot: bool,
    },
    /// Print hourly electricity rates and the enrolled savings
    Rates,
    /// Print the share of vehicles enrolled
    Vehicles,
    /// Write geo, totals, and monthly views as CSV files
    Export {
        /// Directory to write CSV files into
        #[arg(short = 'd', long, default_value = "views")]
        output_dir: String,

        /// Gzip compress the CSV files
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path = std::env::var("LOG_FILE_PATH")
        .unwrap_or_else(|_| "logs/charging_enrollment.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("charging_enrollment.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let sources = DataSources::from_env().with_overrides(
        cli.enrollments.as_deref(),
        cli.vehicles.as_deref(),
        cli.rates.as_deref(),
    );
    info!(
        enrollments = %sources.enrollments,
        vehicles = %sources.vehicles,
        rates = %sources.rates,
        "Sources resolved"
    );

    let mut cache = SourceCache::new();
    let stdout = std::io::stdout().lock();

    match cli.command {
        Commands::Dashboard { utility, query } => {
            let selection = match (utility, query) {
                (Some(token), _) => Selection::from_token(&token),
                (None, Some(query)) => Selection::from_query(&query),
                (None, None) => Selection::ShowAll,
            };
            let dashboard = Dashboard::build(&mut cache, &sources, selection)
                .context("failed to build dashboard")?;
            write_json(stdout, &dashboard)?;
        }
        Commands::Totals => {
            let enrollments = cache
                .enrollments(&sources.enrollments)
                .context("failed to load enrollments")?;
            let totals = utility_totals(&aggregate_geo(&enrollments));
            write_json(stdout, &totals)?;
        }
        Commands::Map { utility } => {
            let enrollments = cache
                .enrollments(&sources.enrollments)
                .context("failed to load enrollments")?;
            let selection = Selection::from_token(&utility);
            let panel = MapPanel::new(&aggregate_geo(&enrollments), selection);
            info!(selection = %selection, points = panel.points.len(), "Map view ready");
            write_json(stdout, &panel)?;
        }
        Commands::Monthly { pivot } => {
            let enrollments = cache
                .enrollments(&sources.enrollments)
                .context("failed to load enrollments")?;
            let monthly = aggregate_monthly(&enrollments);
            if pivot {
                write_json(stdout, &MonthlyTable::pivot(&monthly))?;
            } else {
                write_json(stdout, &monthly)?;
            }
        }
        Commands::Rates => {
            let rates = cache
                .electricity_rates(&sources.rates)
                .context("failed to load electricity rates")?;
            let comparison = RateComparison::from_samples(&rates);
            write_json(
                stdout,
                &serde_json::json!({
                    "samples": rates.as_slice(),
                    "comparison": comparison,
                }),
            )?;
        }
        Commands::Vehicles => {
            let vehicles = cache
                .vehicle_summary(&sources.vehicles)
                .context("failed to load vehicle summary")?;
            write_json(stdout, &vehicles.as_slice())?;
        }
        Commands::Export { output_dir, gzip } => {
            let enrollments = cache
                .enrollments(&sources.enrollments)
                .context("failed to load enrollments")?;
            let geo = aggregate_geo(&enrollments);
            let totals = utility_totals(&geo);
            let monthly = aggregate_monthly(&enrollments);

            let written = export_views(Path::new(&output_dir), &geo, &totals, &monthly, gzip)?;
            for path in written {
                info!(path = %path.display(), "Wrote view");
            }
        }
    }

    Ok(())
}
