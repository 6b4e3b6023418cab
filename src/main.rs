//! # rightprice
//!
//! Retrieves historical sold prices for a UK postcode from Rightmove and
//! exports them as a flat table, one row per sale.
//!
//! ## Usage
//!
//! ```sh
//! rightprice sold-prices --postcode "SE3 0AA" --radius 0.5 --years 5 -o se3.csv
//! rightprice scrape-url --url "https://www.rightmove.co.uk/house-prices/se3.html?pageNumber=" -o se3.csv
//! rightprice commute --stations stations.csv -o soi.csv
//! ```
//!
//! ## Architecture
//!
//! The sold-prices pipeline is strictly sequential:
//! 1. **Validation**: postcode, radius and years are checked before any request
//! 2. **Page count**: page 1 is fetched and its pagination control read
//! 3. **Extraction**: every page is fetched in turn (with a fixed pause) and
//!    its property cards parsed into listings
//! 4. **Output**: listings are flattened to rows and written as CSV or JSON
//!
//! The `commute` command is independent: it queries a transit-routing API for
//! the fastest journey from each station to a few stations of interest.

use clap::Parser;
use std::error::Error;
use std::path::Path;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod cli;
mod config;
mod error;
mod models;
mod outputs;
mod retriever;
mod scrapers;
mod transit;
mod utils;
mod validate;

use chrono::{Utc, Weekday};
use cli::{Cli, Command, CommuteArgs, OutputArgs};
use config::Settings;
use models::SoldPriceTable;
use outputs::OutputFormat;
use retriever::SoldPriceRetriever;
use scrapers::fetch::HttpFetcher;
use scrapers::rightmove::SearchTarget;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();

    // .env is optional; it only feeds env-backed CLI options
    if let Err(e) = dotenvy::dotenv() {
        debug!(error = %e, "No .env file loaded");
    }

    let args = Cli::parse();
    debug!(config = ?args.config, "Parsed CLI arguments");

    let settings = Settings::load(args.config.as_deref())?;
    info!(base_url = %settings.base_url, page_delay_secs = settings.page_delay_secs, "rightprice starting up");

    let outcome = tokio::select! {
        res = run(args.command, &settings) => res,
        _ = tokio::signal::ctrl_c() => {
            error!("Interrupted; no output written");
            return Err("interrupted".into());
        }
    };

    if let Err(e) = outcome {
        error!(error = %e, "Command failed");
        return Err(e.into());
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, secs = elapsed.as_secs(), millis = elapsed.subsec_millis(), "Execution complete");
    Ok(())
}

async fn run(command: Command, settings: &Settings) -> error::Result<()> {
    match command {
        Command::SoldPrices(args) => {
            let retriever = SoldPriceRetriever::for_postcode(
                HttpFetcher::new(settings)?,
                &settings.base_url,
                &args.postcode,
                args.radius,
                args.years,
                settings.page_delay(),
            )?;
            let table = retriever.retrieve().await?;
            write_output(&table, &args.output).await
        }
        Command::ScrapeUrl(args) => {
            let target = SearchTarget::prebuilt(&args.url)?;
            let retriever = SoldPriceRetriever::new(HttpFetcher::new(settings)?, target, settings.page_delay());
            let table = retriever.retrieve().await?;
            write_output(&table, &args.output).await
        }
        Command::Commute(args) => run_commute(args, settings).await,
    }
}

#[instrument(level = "info", skip_all, fields(path = %output.output_path.display(), format = ?output.format))]
async fn write_output(table: &SoldPriceTable, output: &OutputArgs) -> error::Result<()> {
    if table.is_empty() {
        warn!("Retrieval returned no rows; writing header only");
    }
    match output.format {
        OutputFormat::Csv => outputs::csv::write_table(table, &output.output_path)?,
        OutputFormat::Json => outputs::json::write_table(table, &output.output_path).await?,
    }
    report_saved(table.len(), &output.output_path);
    Ok(())
}

async fn run_commute(args: CommuteArgs, settings: &Settings) -> error::Result<()> {
    let stations = transit::read_stations(&args.stations)?;
    info!(count = stations.len(), path = %args.stations.display(), "Loaded stations");

    let depart_at = transit::next_departure(Utc::now().date_naive(), Weekday::Tue, args.hour)?.to_rfc3339();
    info!(%depart_at, "Routing with departure time");

    let client = transit::TransitClient::new(settings, args.api_key)?;
    let rows = transit::commute_durations(&client, &stations, &args.stations_of_interest, &depart_at).await?;

    outputs::csv::write_commutes(&rows, &args.output_path)?;
    report_saved(rows.len(), &args.output_path);
    Ok(())
}

fn report_saved(count: usize, path: &Path) {
    info!(records = count, path = %path.display(), "Saved output");
    println!("Saved {} records to {}", count, path.display());
}
