// ABOUTME: Linear trend analysis of one city/indicator series over an optional year range
// ABOUTME: Reports slope, intercept, R², overall growth rate and the up/down/flat direction
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::cmp::Ordering;

use gba_core::constants::analysis::{COEFFICIENT_DECIMALS, VALUE_DECIMALS};
use gba_core::models::TrendAnalysisRequest;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::accessor::{load_observed_series, resolve_labels, ObservedSeries, SeriesAccessor, SeriesLabels};
use crate::errors::{AnalysisError, AnalysisFailure, AnalysisResult, HistoryRequirement};
use crate::statistical_analysis::{round_to, StatisticalAnalyzer};

/// Sign of a fitted slope
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    /// Positive slope
    Up,
    /// Negative slope
    Down,
    /// Slope exactly zero
    Flat,
}

impl TrendDirection {
    /// Direction from the sign of `slope`; only an exact zero is flat
    #[must_use]
    pub fn from_slope(slope: f64) -> Self {
        match slope.partial_cmp(&0.0) {
            Some(Ordering::Greater) => Self::Up,
            Some(Ordering::Less) => Self::Down,
            _ => Self::Flat,
        }
    }
}

/// Linear trend of one series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    /// City / indicator labels
    #[serde(flatten)]
    pub labels: SeriesLabels,
    /// Change per year, 4 decimals
    pub slope: f64,
    /// Fitted value at year zero, 4 decimals
    pub intercept: f64,
    /// Goodness of fit against the training points, 4 decimals
    pub r_squared: f64,
    /// Percent change first to last value, 2 decimals; absent for a zero first value
    pub growth_rate: Option<f64>,
    /// Direction derived from the unrounded slope
    pub trend: TrendDirection,
    /// Present points fitted
    pub data_points: usize,
}

/// Fits least-squares trends to indicator series
pub struct TrendAnalyzer;

impl TrendAnalyzer {
    /// Fetch the requested series and fit its trend
    ///
    /// # Errors
    ///
    /// Returns `InsufficientHistory` below two present points, or `DataAccess`
    /// when the accessor fails
    pub fn analyze(
        accessor: &dyn SeriesAccessor,
        request: &TrendAnalysisRequest,
    ) -> AnalysisResult<TrendResult> {
        let labels = resolve_labels(accessor, request.city_id, request.indicator_id);
        let series = load_observed_series(
            accessor,
            request.city_id,
            request.indicator_id,
            request.range,
            &labels,
        )?;
        Self::analyze_series(labels, &series)
    }

    /// Fit the trend of an already-filtered series
    ///
    /// # Errors
    ///
    /// Returns `InsufficientHistory` below two present points
    pub fn analyze_series(
        labels: SeriesLabels,
        series: &ObservedSeries,
    ) -> AnalysisResult<TrendResult> {
        match Self::fit(series) {
            Ok(parts) => Ok(TrendResult { labels, ..parts }),
            Err(error) => Err(AnalysisFailure::new(labels, error)),
        }
    }

    fn fit(series: &ObservedSeries) -> Result<TrendResult, AnalysisError> {
        let requirement = HistoryRequirement::Trend;
        if series.len() < requirement.minimum_points() {
            return Err(AnalysisError::insufficient(requirement, series.len()));
        }

        let regression = StatisticalAnalyzer::linear_regression(&series.years_f64(), &series.values)?;
        debug!(
            slope = regression.slope,
            r_squared = regression.r_squared,
            points = series.len(),
            "Fitted trend"
        );

        let growth_rate = match (series.values.first(), series.values.last()) {
            (Some(&first), Some(&last)) => StatisticalAnalyzer::percent_change(first, last)
                .map(|rate| round_to(rate, VALUE_DECIMALS)),
            _ => None,
        };

        Ok(TrendResult {
            labels: SeriesLabels::default(),
            slope: round_to(regression.slope, COEFFICIENT_DECIMALS),
            intercept: round_to(regression.intercept, COEFFICIENT_DECIMALS),
            r_squared: round_to(regression.r_squared, COEFFICIENT_DECIMALS),
            growth_rate,
            trend: TrendDirection::from_slope(regression.slope),
            data_points: series.len(),
        })
    }
}
