// ABOUTME: GBA CLI - command-line front end for the regional indicator analysis services
// ABOUTME: Loads a JSON dataset, runs one analysis or forecast and prints the JSON payload
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//!
//! Usage:
//! ```bash
//! # Linear trend of GDP (indicator 1) for Shenzhen (city 1)
//! gba-cli --dataset data/sample_dataset.json trend --city 1 --indicator 1
//!
//! # Five-year ensemble forecast at 90% confidence
//! gba-cli predict --city 1 --indicator 1 --model ensemble --years 5 --confidence 0.9
//!
//! # Baseline plus two what-if scenarios
//! gba-cli simulate --city 1 --indicator 1 --scenario optimistic=10 --scenario pessimistic=-5
//!
//! # Rankings for 2018 through 2022
//! gba-cli ranking-history --indicator 1 --start-year 2018 --end-year 2022
//! ```
//!
//! Exit status is 0 for a success payload, 2 when the payload reports an
//! analysis error, and 1 for infrastructure failures.

mod commands;
mod helpers;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use gba_insight::config::environment::InsightConfig;
use gba_insight::logging::LoggingConfig;
use gba_insight::models::{CityId, ForecastModel, IndicatorId, YearRange};
use tracing::{debug, error};

use helpers::output::{parse_scenario, print_json};

#[derive(Parser)]
#[command(
    name = "gba-cli",
    about = "GBA Insight regional indicator analysis CLI",
    long_about = "Trend, growth, correlation, ranking and forecast analysis over a JSON dataset of yearly city indicators."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Dataset file (overrides GBA_DATASET_PATH)
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Pretty-print the JSON output
    #[arg(long, global = true)]
    pretty: bool,
}

/// One city/indicator series
#[derive(Args, Clone, Copy)]
struct SeriesArgs {
    /// City identifier
    #[arg(long)]
    city: CityId,

    /// Indicator identifier
    #[arg(long)]
    indicator: IndicatorId,
}

/// Optional inclusive year bounds
#[derive(Args, Clone, Copy)]
struct RangeArgs {
    /// First year included
    #[arg(long)]
    start_year: Option<i32>,

    /// Last year included
    #[arg(long)]
    end_year: Option<i32>,
}

impl From<RangeArgs> for YearRange {
    fn from(args: RangeArgs) -> Self {
        Self::new(args.start_year, args.end_year)
    }
}

#[derive(Subcommand)]
enum Command {
    /// List the cities and indicators in the dataset
    Catalog,

    /// Raw yearly values with missing years retained
    Timeseries {
        #[command(flatten)]
        series: SeriesArgs,
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Fit a linear trend to one series
    Trend {
        #[command(flatten)]
        series: SeriesArgs,
        #[command(flatten)]
        range: RangeArgs,
    },

    /// Year-over-year growth into a year
    Growth {
        #[command(flatten)]
        series: SeriesArgs,

        /// Year whose growth over the previous year is reported
        #[arg(long)]
        year: i32,
    },

    /// Pairwise Pearson correlation between indicators, pooled across cities
    Correlation {
        /// Comma-separated city identifiers
        #[arg(long, value_delimiter = ',', required = true)]
        cities: Vec<CityId>,

        /// Comma-separated indicator identifiers
        #[arg(long, value_delimiter = ',', required = true)]
        indicators: Vec<IndicatorId>,

        #[command(flatten)]
        range: RangeArgs,
    },

    /// Side-by-side statistics for several cities
    Compare {
        /// Comma-separated city identifiers
        #[arg(long, value_delimiter = ',', required = true)]
        cities: Vec<CityId>,

        /// Comma-separated indicator identifiers
        #[arg(long, value_delimiter = ',', required = true)]
        indicators: Vec<IndicatorId>,

        #[command(flatten)]
        range: RangeArgs,
    },

    /// Rank cities by an indicator in one year
    Ranking {
        /// Indicator identifier
        #[arg(long)]
        indicator: IndicatorId,

        /// Ranked year
        #[arg(long)]
        year: i32,
    },

    /// Rankings for every year of an inclusive range
    RankingHistory {
        /// Indicator identifier
        #[arg(long)]
        indicator: IndicatorId,

        /// First year
        #[arg(long)]
        start_year: i32,

        /// Last year
        #[arg(long)]
        end_year: i32,
    },

    /// Regional GDP, population and trade totals
    Summary {
        /// Summarized year
        #[arg(long)]
        year: i32,
    },

    /// Forecast one series
    Predict {
        #[command(flatten)]
        series: SeriesArgs,

        /// Model: linear, arima or ensemble
        #[arg(long, default_value = "linear")]
        model: ForecastModel,

        /// Number of future years (defaults to GBA_DEFAULT_PREDICTION_YEARS)
        #[arg(long)]
        years: Option<usize>,

        /// Confidence level in (0, 1) (defaults to GBA_DEFAULT_CONFIDENCE_LEVEL)
        #[arg(long)]
        confidence: Option<f64>,
    },

    /// Scale a linear forecast by named percentage growth factors
    Simulate {
        #[command(flatten)]
        series: SeriesArgs,

        /// Scenario as name=factor, repeatable (e.g. optimistic=10)
        #[arg(long = "scenario", value_parser = parse_scenario, required = true)]
        scenarios: Vec<(String, f64)>,

        /// Number of future years (defaults to GBA_DEFAULT_PREDICTION_YEARS)
        #[arg(long)]
        years: Option<usize>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = LoggingConfig::for_cli(cli.verbose).init() {
        eprintln!("Failed to initialize logging: {e:#}");
    }

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!(error = %e, "Command failed");
            eprintln!("Error: {e:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let mut config = InsightConfig::from_env()?;
    if let Some(dataset) = cli.dataset {
        config.dataset_path = Some(dataset);
    }

    let dataset = config
        .dataset_path
        .clone()
        .context("No dataset given: pass --dataset or set GBA_DATASET_PATH")?;
    debug!(dataset = %dataset.display(), "Using dataset");

    let context = commands::CommandContext::load(&dataset, &config)?;
    let runtime = config.build_runtime()?;
    let output = runtime.block_on(context.execute(cli.command))?;

    print_json(&output.payload, cli.pretty)?;

    Ok(if output.is_failure {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    })
}
