// ABOUTME: Forecasting and statistical-analysis engine for regional economic indicators
// ABOUTME: Trend, correlation, growth, ranking, comparison and linear/ARIMA/ensemble/scenario forecasts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # GBA Intelligence
//!
//! Synchronous, stateless analysis over a [`SeriesAccessor`]. Every public
//! operation returns an [`AnalysisResult`]: either a success payload or an
//! [`AnalysisFailure`] carrying the labels resolved so far and the reason.
//! Nothing here panics on bad data and nothing is cached between calls.

/// Series Accessor trait, label resolution and present-value series
pub mod accessor;
/// Multi-city comparison and regional summary
pub mod comparison;
/// Engine configuration
pub mod config;
/// Indicator-to-indicator correlation
pub mod correlation_analyzer;
/// Analysis error taxonomy
pub mod errors;
/// Linear, ARIMA, ensemble and scenario forecasting
pub mod forecast;
/// Year-over-year growth
pub mod growth_rate;
/// Nelder-Mead minimizer
pub mod optimization;
/// Cross-city rankings
pub mod ranking;
/// OLS, Pearson and quantile primitives
pub mod statistical_analysis;
/// Linear trend analysis
pub mod trend_analyzer;

pub use accessor::{timeseries, ObservedSeries, SeriesAccessor, SeriesLabels, TimeSeriesView};
pub use comparison::{CityComparison, ComparisonAnalyzer, IndicatorComparison, RegionalSummary};
pub use config::{ConfigError, IntelligenceConfig};
pub use correlation_analyzer::{CorrelationAnalyzer, CorrelationResult, CorrelationStrength};
pub use errors::{AnalysisError, AnalysisFailure, AnalysisResult, HistoryRequirement};
pub use forecast::{
    forecaster_for, predict, ArimaForecaster, EnsembleForecaster, ForecastAccuracy,
    ForecastParams, ForecastPoint, ForecastResult, Forecaster, LinearForecaster, ModelType,
    ScenarioResult, ScenarioSimulator,
};
pub use growth_rate::{GrowthDirection, GrowthRateCalculator, GrowthRateResult};
pub use ranking::{CityRanking, RankingAggregator};
pub use statistical_analysis::StatisticalAnalyzer;
pub use trend_analyzer::{TrendAnalyzer, TrendDirection, TrendResult};
