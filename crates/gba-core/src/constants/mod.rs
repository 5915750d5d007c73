// ABOUTME: Application constants for analysis thresholds, forecast defaults and environment keys
// ABOUTME: Organizes fixed values by domain so analyzers and configuration share one source
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Application constants organized by domain

/// Minimum history and classification thresholds used by the analysis engine
pub mod analysis {
    /// Minimum present points for a trend fit
    pub const MIN_TREND_POINTS: usize = 2;

    /// Minimum present points for the linear forecaster
    pub const MIN_LINEAR_FORECAST_POINTS: usize = 5;

    /// Minimum present points for the ARIMA forecaster
    pub const MIN_ARIMA_POINTS: usize = 10;

    /// Minimum paired observations for a correlation entry
    pub const MIN_CORRELATION_PAIRS: usize = 3;

    /// |r| at or above which a correlation is "strong"
    pub const STRONG_CORRELATION: f64 = 0.8;

    /// |r| at or above which a correlation is "moderate"
    pub const MODERATE_CORRELATION: f64 = 0.6;

    /// |r| at or above which a correlation is "weak"
    pub const WEAK_CORRELATION: f64 = 0.4;

    /// Decimal places for slope, intercept, R², correlation and accuracy metrics
    pub const COEFFICIENT_DECIMALS: i32 = 4;

    /// Decimal places for values, bounds and percentages
    pub const VALUE_DECIMALS: i32 = 2;
}

/// Forecast request defaults
pub mod forecast {
    /// Horizon used when a request does not specify one
    pub const DEFAULT_PREDICTION_YEARS: usize = 3;

    /// Confidence level used when a request does not specify one
    pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;

    /// Upper bound on the forecast horizon
    pub const MAX_PREDICTION_YEARS: usize = 50;
}

/// Indicator catalog codes used by the regional summary
pub mod indicator_codes {
    /// Gross domestic product
    pub const GDP: &str = "gdp";

    /// Resident population
    pub const POPULATION: &str = "population";

    /// Total import/export volume
    pub const TOTAL_TRADE: &str = "total_trade";
}

/// Environment variable names read by the application layer
pub mod env_config {
    /// JSON dataset backing the in-memory series store
    pub const DATASET_PATH: &str = "GBA_DATASET_PATH";

    /// Override of the default forecast horizon
    pub const DEFAULT_PREDICTION_YEARS: &str = "GBA_DEFAULT_PREDICTION_YEARS";

    /// Override of the default confidence level
    pub const DEFAULT_CONFIDENCE_LEVEL: &str = "GBA_DEFAULT_CONFIDENCE_LEVEL";

    /// Size of the blocking pool used for numeric work
    pub const MAX_BLOCKING_THREADS: &str = "GBA_MAX_BLOCKING_THREADS";

    /// Deployment environment
    pub const ENVIRONMENT: &str = "ENVIRONMENT";
}

/// Service identifiers used in structured logs
pub mod service_names {
    /// Main service name
    pub const GBA_INSIGHT: &str = "gba-insight";

    /// Command-line interface
    pub const GBA_CLI: &str = "gba-cli";
}

/// Runtime defaults
pub mod defaults {
    /// Default number of blocking threads for numeric work
    pub const MAX_BLOCKING_THREADS: usize = 8;
}
