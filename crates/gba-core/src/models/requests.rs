// ABOUTME: Request payloads for trend, correlation, comparison, ranking and forecast operations
// ABOUTME: Carries serde defaults so partially specified JSON requests resolve to documented defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{CityId, IndicatorId, YearRange};
use crate::constants::forecast::{DEFAULT_CONFIDENCE_LEVEL, DEFAULT_PREDICTION_YEARS};
use crate::errors::AppError;

const fn default_prediction_years() -> usize {
    DEFAULT_PREDICTION_YEARS
}

const fn default_confidence_level() -> f64 {
    DEFAULT_CONFIDENCE_LEVEL
}

/// Forecasting model selectable by a prediction request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ForecastModel {
    /// Ordinary least squares extrapolation
    #[default]
    #[serde(alias = "linear_regression")]
    Linear,
    /// ARIMA(1,1,1)
    Arima,
    /// Point-wise average of linear and ARIMA
    Ensemble,
}

impl ForecastModel {
    /// Canonical lowercase name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Arima => "arima",
            Self::Ensemble => "ensemble",
        }
    }
}

impl fmt::Display for ForecastModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForecastModel {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "linear" | "linear_regression" => Ok(Self::Linear),
            "arima" => Ok(Self::Arima),
            "ensemble" => Ok(Self::Ensemble),
            other => Err(AppError::invalid_input(format!(
                "unknown forecast model '{other}', expected linear, arima or ensemble"
            ))),
        }
    }
}

/// Forecast one city/indicator series with a chosen model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    /// City to forecast
    pub city_id: CityId,
    /// Indicator to forecast
    pub indicator_id: IndicatorId,
    /// Model to run
    #[serde(default)]
    pub model_type: ForecastModel,
    /// Number of future years
    #[serde(default = "default_prediction_years")]
    pub prediction_years: usize,
    /// Confidence level of the band, in (0, 1)
    #[serde(default = "default_confidence_level")]
    pub confidence_level: f64,
}

/// Perturb a linear baseline by named percentage growth factors
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRequest {
    /// City to forecast
    pub city_id: CityId,
    /// Indicator to forecast
    pub indicator_id: IndicatorId,
    /// Scenario name to growth factor in percent
    pub scenarios: BTreeMap<String, f64>,
    /// Number of future years
    #[serde(default = "default_prediction_years")]
    pub prediction_years: usize,
}

/// Fit a linear trend to one series
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendAnalysisRequest {
    /// City to analyze
    pub city_id: CityId,
    /// Indicator to analyze
    pub indicator_id: IndicatorId,
    /// Optional year bounds
    #[serde(flatten)]
    pub range: YearRange,
}

/// Pairwise indicator correlation across cities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorrelationRequest {
    /// Cities whose paired observations are pooled
    pub city_ids: Vec<CityId>,
    /// Indicators compared pairwise in order
    pub indicator_ids: Vec<IndicatorId>,
    /// Optional year bounds
    #[serde(flatten)]
    pub range: YearRange,
}

/// Side-by-side indicator statistics for several cities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityComparisonRequest {
    /// Cities to compare
    pub cities: Vec<CityId>,
    /// Indicators to compare
    pub indicators: Vec<IndicatorId>,
    /// Optional year bounds
    #[serde(flatten)]
    pub range: YearRange,
}

/// Rankings for every year of an inclusive range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingHistoryRequest {
    /// Indicator to rank by
    pub indicator_id: IndicatorId,
    /// First year
    pub start_year: i32,
    /// Last year, inclusive
    pub end_year: i32,
}
