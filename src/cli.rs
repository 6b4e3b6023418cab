//! Command-line interface definitions for rightprice.
//!
//! Options with an `env` attribute can also be supplied through environment
//! variables (a `.env` file in the working directory is loaded first).

use crate::outputs::OutputFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Command-line arguments for rightprice.
///
/// # Examples
///
/// ```sh
/// # Sold prices within a quarter mile of W14 0DB, last two years
/// rightprice sold-prices --postcode "W14 0DB" --radius 0.25 --years 2 -o w14.csv
///
/// # A search URL copied from the site, cut after "pageNumber="
/// rightprice scrape-url --url "https://www.rightmove.co.uk/house-prices/w14.html?soldIn=2&pageNumber=" -o w14.csv
///
/// # Commute times to Victoria and Eastcote
/// rightprice commute --stations data/raw/london_stations_coords.csv -o soi.csv
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML settings file
    #[arg(short, long, global = true, env = "RIGHTPRICE_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Retrieve sold prices for a postcode
    SoldPrices(SoldPricesArgs),
    /// Retrieve sold prices from a pre-built search URL ending in "pageNumber="
    ScrapeUrl(ScrapeUrlArgs),
    /// Compute the fastest commute from every station to stations of interest
    Commute(CommuteArgs),
}

#[derive(Args, Debug)]
pub struct SoldPricesArgs {
    /// Postcode with a space separator, e.g. "SE3 0AA"
    #[arg(short, long)]
    pub postcode: String,

    /// Search radius in miles (0.25, 0.5, 1, 3, 5, 10)
    #[arg(short, long)]
    pub radius: Option<f64>,

    /// Only include sales from the last N years (2, 3, 5, 10, 15, 20)
    #[arg(short, long)]
    pub years: Option<u32>,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct ScrapeUrlArgs {
    /// Search URL ending with "pageNumber=" (without the page number)
    #[arg(short, long)]
    pub url: String,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Where to write the table
    #[arg(short, long)]
    pub output_path: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,
}

#[derive(Args, Debug)]
pub struct CommuteArgs {
    /// CSV of stations with NAME, x (longitude) and y (latitude) columns
    #[arg(short, long)]
    pub stations: PathBuf,

    /// Where to write the commute table (CSV)
    #[arg(short, long)]
    pub output_path: PathBuf,

    /// Station of interest; repeat for several
    #[arg(long = "station", default_values_t = vec!["Victoria".to_string(), "Eastcote".to_string()])]
    pub stations_of_interest: Vec<String>,

    /// Transit API partner key
    #[arg(long, env = "CM_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Departure hour (UTC) on the next Tuesday
    #[arg(long, default_value_t = 8)]
    pub hour: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sold_prices_parsing() {
        let cli = Cli::parse_from([
            "rightprice",
            "sold-prices",
            "--postcode",
            "W14 0DB",
            "--radius",
            "0.25",
            "--years",
            "2",
            "--output-path",
            "./w14.csv",
        ]);

        let Command::SoldPrices(args) = cli.command else {
            panic!("expected sold-prices");
        };
        assert_eq!(args.postcode, "W14 0DB");
        assert_eq!(args.radius, Some(0.25));
        assert_eq!(args.years, Some(2));
        assert_eq!(args.output.output_path, PathBuf::from("./w14.csv"));
        assert_eq!(args.output.format, OutputFormat::Csv);
    }

    #[test]
    fn test_scrape_url_short_flags() {
        let cli = Cli::parse_from([
            "rightprice",
            "scrape-url",
            "-u",
            "https://www.rightmove.co.uk/house-prices/w14.html?pageNumber=",
            "-o",
            "/tmp/out.json",
            "-f",
            "json",
        ]);

        let Command::ScrapeUrl(args) = cli.command else {
            panic!("expected scrape-url");
        };
        assert!(args.url.ends_with("pageNumber="));
        assert_eq!(args.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_commute_defaults() {
        let cli = Cli::parse_from([
            "rightprice",
            "commute",
            "--stations",
            "stations.csv",
            "--output-path",
            "soi.csv",
            "--api-key",
            "secret",
        ]);

        let Command::Commute(args) = cli.command else {
            panic!("expected commute");
        };
        assert_eq!(args.stations_of_interest, vec!["Victoria", "Eastcote"]);
        assert_eq!(args.hour, 8);
    }

    #[test]
    fn test_postcode_is_required() {
        assert!(Cli::try_parse_from(["rightprice", "sold-prices", "-o", "x.csv"]).is_err());
    }

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
