//! CLI commands and argument parsing

use crate::history::{parse_date, Adjust, Period};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Paginated snapshot fetcher CLI
#[derive(Parser, Debug)]
#[command(name = "snapshot-pager")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, global = true, default_value = "csv")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch all pages of a snapshot endpoint and rank them
    Spot {
        /// Built-in endpoint name or YAML file
        #[arg(short, long, default_value = "a-share-spot")]
        endpoint: PathBuf,

        /// Directory for the dated CSV file
        #[arg(long, default_value = "csv")]
        output_dir: PathBuf,

        /// Exact output file (overrides --output-dir)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Maximum pages in flight (overrides the endpoint)
        #[arg(long)]
        concurrency: Option<usize>,

        /// Per-page timeout in seconds (overrides the endpoint)
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Fetch historical klines for one symbol
    History {
        /// Six-digit symbol, e.g. 600000
        #[arg(short, long)]
        symbol: String,

        /// daily, weekly or monthly
        #[arg(long, default_value = "daily")]
        period: Period,

        /// none, qfq or hfq
        #[arg(long, default_value = "none")]
        adjust: Adjust,

        /// First day (YYYYMMDD or YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        start: Option<NaiveDate>,

        /// Last day (YYYYMMDD or YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        end: Option<NaiveDate>,

        /// Built-in endpoint name or YAML file
        #[arg(short, long, default_value = "a-share-hist")]
        endpoint: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Request timeout in seconds (overrides the endpoint)
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// List built-in endpoints
    List,

    /// Validate an endpoint definition
    Validate {
        /// Built-in endpoint name or YAML file
        #[arg(short, long)]
        endpoint: PathBuf,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// CSV with a header row
    Csv,
    /// JSON output (one row per line)
    Json,
    /// Human-readable JSON
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spot_defaults() {
        let cli = Cli::try_parse_from(["snapshot-pager", "spot"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Csv);
        assert!(!cli.verbose);
        match cli.command {
            Commands::Spot {
                endpoint,
                output_dir,
                output,
                concurrency,
                timeout,
            } => {
                assert_eq!(endpoint, PathBuf::from("a-share-spot"));
                assert_eq!(output_dir, PathBuf::from("csv"));
                assert!(output.is_none());
                assert!(concurrency.is_none());
                assert!(timeout.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_spot_overrides() {
        let cli = Cli::try_parse_from([
            "snapshot-pager",
            "spot",
            "--concurrency",
            "8",
            "--timeout",
            "30",
            "--format",
            "json",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.verbose);
        let Commands::Spot {
            concurrency,
            timeout,
            ..
        } = cli.command
        else {
            panic!("expected spot");
        };
        assert_eq!(concurrency, Some(8));
        assert_eq!(timeout, Some(30));
    }

    #[test]
    fn test_history_args() {
        let cli = Cli::try_parse_from([
            "snapshot-pager",
            "history",
            "--symbol",
            "600000",
            "--period",
            "weekly",
            "--adjust",
            "qfq",
            "--start",
            "20240101",
            "--end",
            "2024-06-30",
        ])
        .unwrap();
        let Commands::History {
            symbol,
            period,
            adjust,
            start,
            end,
            ..
        } = cli.command
        else {
            panic!("expected history");
        };
        assert_eq!(symbol, "600000");
        assert_eq!(period, Period::Weekly);
        assert_eq!(adjust, Adjust::Qfq);
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 6, 30));
    }

    #[test]
    fn test_history_rejects_bad_period() {
        assert!(
            Cli::try_parse_from(["snapshot-pager", "history", "-s", "600000", "--period", "hourly"])
                .is_err()
        );
    }

    #[test]
    fn test_history_requires_symbol() {
        assert!(Cli::try_parse_from(["snapshot-pager", "history"]).is_err());
    }
}
