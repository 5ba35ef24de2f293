//! Catalog enricher CLI.
//!
//! Adds tile-service links, time-indexed items and a temporal extent to a
//! catalog collection, then writes the collection directory.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use catalog_enricher::{run, RunOptions};
use tile_catalog::Strategy;

#[derive(Parser, Debug)]
#[command(name = "catalog-enricher")]
#[command(about = "Add tile-service links and time series items to a catalog collection")]
struct Args {
    /// Endpoint configuration (tile service and time entries)
    #[arg(short, long, env = "ENRICHER_ENDPOINT")]
    endpoint: PathBuf,

    /// Collection configuration (name, title, GeoJSON overlay)
    #[arg(short, long, env = "ENRICHER_COLLECTION")]
    collection: Option<PathBuf>,

    /// Catalog configuration (id, build directory)
    #[arg(long, env = "ENRICHER_CATALOG")]
    catalog: Option<PathBuf>,

    /// Existing collection directory to enrich
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Directory the enriched collection is written to
    #[arg(short, long)]
    output: PathBuf,

    /// Override the endpoint's reconciliation strategy
    #[arg(long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Log level
    #[arg(long, default_value = "info", env = "RUST_LOG")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum StrategyArg {
    Rebuild,
    Merge,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Rebuild => Strategy::Rebuild,
            StrategyArg::Merge => Strategy::Merge,
        }
    }
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    if args.log_json {
        fmt().with_env_filter(filter).with_target(true).json().init();
    } else {
        fmt().with_env_filter(filter).with_target(true).init();
    }

    info!(endpoint = ?args.endpoint, output = ?args.output, "Starting catalog enricher");

    let options = RunOptions {
        endpoint: args.endpoint,
        collection: args.collection,
        catalog: args.catalog,
        input: args.input,
        output: args.output,
        strategy: args.strategy.map(Strategy::from),
    };

    let report = match run(&options) {
        Ok(report) => report,
        Err(e) => {
            error!(error = %format!("{:#}", e), "Enrichment failed");
            return Err(e);
        }
    };

    for skipped in &report.skipped {
        warn!(
            index = skipped.index,
            time = ?skipped.time,
            reason = ?skipped.reason,
            "Time entry skipped"
        );
    }
    info!(
        strategy = ?report.strategy,
        created = report.created.len(),
        updated = report.updated.len(),
        skipped = report.skipped.len(),
        collection_links = report.collection_links,
        overlay = report.overlay.is_some(),
        "Done"
    );

    Ok(())
}
