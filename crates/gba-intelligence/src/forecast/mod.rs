// ABOUTME: Forecast payload types, request parameters and the Forecaster seam shared by all models
// ABOUTME: Dispatches prediction requests to the linear, ARIMA or ensemble forecaster
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Forecasting
//!
//! Every forecaster consumes the present values of one series in year order
//! and produces a [`ForecastResult`]. Failures are returned as
//! [`AnalysisFailure`] values tagged with the labels and the model that ran.

/// ARIMA(1,1,1) estimation and forecasting
pub mod arima;
/// Point-wise average of the linear and ARIMA forecasts
pub mod ensemble;
/// Ordinary least squares extrapolation
pub mod linear;
/// Percentage perturbations of the linear baseline
pub mod scenario;

pub use arima::ArimaForecaster;
pub use ensemble::EnsembleForecaster;
pub use linear::LinearForecaster;
pub use scenario::{ScenarioResult, ScenarioSimulator};

use std::fmt;

use gba_core::constants::analysis::VALUE_DECIMALS;
use gba_core::models::{ForecastModel, PredictionRequest, YearRange};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::accessor::{load_observed_series, resolve_labels, ObservedSeries, SeriesAccessor, SeriesLabels};
use crate::config::IntelligenceConfig;
use crate::errors::{AnalysisError, AnalysisFailure, AnalysisResult};
use crate::statistical_analysis::round_to;

/// Model that produced a forecast payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelType {
    /// Ordinary least squares
    LinearRegression,
    /// ARIMA(1,1,1)
    Arima,
    /// Average of linear and ARIMA
    Ensemble,
    /// Linear baseline with percentage scenarios
    ScenarioSimulation,
}

impl ModelType {
    /// Wire name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LinearRegression => "linear_regression",
            Self::Arima => "arima",
            Self::Ensemble => "ensemble",
            Self::ScenarioSimulation => "scenario_simulation",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Horizon and confidence of a forecast
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastParams {
    /// Number of future years
    pub prediction_years: usize,
    /// Confidence level of the band, in (0, 1)
    pub confidence_level: f64,
}

impl ForecastParams {
    /// Parameters checked against the configured limits
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` for a zero or over-limit horizon, or a
    /// confidence level outside (0, 1)
    pub fn new(
        prediction_years: usize,
        confidence_level: f64,
        config: &IntelligenceConfig,
    ) -> Result<Self, AnalysisError> {
        if prediction_years == 0 || prediction_years > config.max_prediction_years {
            return Err(AnalysisError::InvalidParameter(format!(
                "prediction_years must be between 1 and {}, got {prediction_years}",
                config.max_prediction_years
            )));
        }
        if !(confidence_level > 0.0 && confidence_level < 1.0) {
            return Err(AnalysisError::InvalidParameter(format!(
                "confidence_level must be strictly between 0 and 1, got {confidence_level}"
            )));
        }
        Ok(Self {
            prediction_years,
            confidence_level,
        })
    }
}

/// Calendar years of the `steps` horizons following `last_year`
///
/// # Errors
///
/// Returns `InvalidParameter` when a horizon year does not fit in `i32`
pub fn horizon_years(last_year: i32, steps: usize) -> Result<Vec<i32>, AnalysisError> {
    (1..=steps)
        .map(|step| {
            i32::try_from(step)
                .ok()
                .and_then(|step| last_year.checked_add(step))
                .ok_or_else(|| {
                    AnalysisError::InvalidParameter(format!(
                        "a {steps}-year horizon after {last_year} overflows the calendar"
                    ))
                })
        })
        .collect()
}

/// One forecast horizon step
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Forecast year
    pub year: i32,
    /// Point forecast, 2 decimals
    pub predicted_value: f64,
    /// Lower band, 2 decimals
    pub confidence_lower: f64,
    /// Upper band, 2 decimals
    pub confidence_upper: f64,
    /// Linear component, ensemble only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lr_prediction: Option<f64>,
    /// ARIMA component, ensemble only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arima_prediction: Option<f64>,
}

impl ForecastPoint {
    /// Point from unrounded mean and band half-width
    #[must_use]
    pub fn from_band(year: i32, mean: f64, half_width: f64) -> Self {
        Self {
            year,
            predicted_value: round_to(mean, VALUE_DECIMALS),
            confidence_lower: round_to(mean - half_width, VALUE_DECIMALS),
            confidence_upper: round_to(mean + half_width, VALUE_DECIMALS),
            lr_prediction: None,
            arima_prediction: None,
        }
    }
}

/// Fit quality of the linear model against its training data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearAccuracy {
    /// Coefficient of determination
    pub r_squared: f64,
    /// Mean squared error
    pub mse: f64,
    /// Mean absolute error
    pub mae: f64,
}

/// Information criteria of the ARIMA fit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArimaAccuracy {
    /// Akaike information criterion
    pub aic: f64,
    /// Bayesian information criterion
    pub bic: f64,
}

/// Per-model accuracy nested inside the ensemble block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnsembleComponents {
    /// Linear component metrics
    pub linear_regression: LinearAccuracy,
    /// ARIMA component metrics
    pub arima: ArimaAccuracy,
}

/// Linear metrics promoted to the top level with both components nested
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnsembleAccuracy {
    /// Linear metrics at top level
    #[serde(flatten)]
    pub linear: LinearAccuracy,
    /// Both models' metrics
    pub components: EnsembleComponents,
}

/// Model-specific accuracy block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ForecastAccuracy {
    /// Ensemble, tried first so its nested components survive deserialization
    Ensemble(EnsembleAccuracy),
    /// Linear regression
    Linear(LinearAccuracy),
    /// ARIMA
    Arima(ArimaAccuracy),
}

/// ARIMA (p, d, q) order, serialized as a three-element array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArimaOrder(pub usize, pub usize, pub usize);

/// Forecast of one series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    /// City / indicator labels
    #[serde(flatten)]
    pub labels: SeriesLabels,
    /// Model that produced the forecast
    pub model_type: ModelType,
    /// ARIMA order, ARIMA only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<ArimaOrder>,
    /// Forecast steps, one per future year
    pub predictions: Vec<ForecastPoint>,
    /// Model-specific accuracy
    pub accuracy: ForecastAccuracy,
    /// Years the model was trained on
    pub training_years: Vec<i32>,
    /// Training values, 2 decimals
    pub training_values: Vec<f64>,
}

impl ForecastResult {
    /// Assemble a result echoing the training series
    #[must_use]
    pub fn new(
        model_type: ModelType,
        predictions: Vec<ForecastPoint>,
        accuracy: ForecastAccuracy,
        series: &ObservedSeries,
    ) -> Self {
        Self {
            labels: SeriesLabels::default(),
            model_type,
            order: None,
            predictions,
            accuracy,
            training_years: series.years.clone(),
            training_values: series
                .values
                .iter()
                .map(|v| round_to(*v, VALUE_DECIMALS))
                .collect(),
        }
    }
}

/// A forecasting model over a present-value series
pub trait Forecaster: Send + Sync {
    /// Model reported on success and on failure
    fn model_type(&self) -> ModelType;

    /// Forecast a series; labels are attached by [`Forecaster::forecast`]
    ///
    /// # Errors
    ///
    /// Returns the model's analysis error
    fn forecast_series(
        &self,
        series: &ObservedSeries,
        params: &ForecastParams,
    ) -> Result<ForecastResult, AnalysisError>;

    /// Forecast a series and tag the outcome with `labels`
    ///
    /// # Errors
    ///
    /// Returns the model's analysis error tagged with labels and model type
    fn forecast(
        &self,
        labels: SeriesLabels,
        series: &ObservedSeries,
        params: &ForecastParams,
    ) -> AnalysisResult<ForecastResult> {
        match self.forecast_series(series, params) {
            Ok(result) => Ok(ForecastResult { labels, ..result }),
            Err(error) => Err(AnalysisFailure::new(labels, error).with_model(self.model_type())),
        }
    }
}

/// Forecaster serving a requested model
#[must_use]
pub fn forecaster_for(model: ForecastModel) -> &'static dyn Forecaster {
    match model {
        ForecastModel::Linear => &LinearForecaster,
        ForecastModel::Arima => &ArimaForecaster,
        ForecastModel::Ensemble => &EnsembleForecaster,
    }
}

/// Forecast the full history of one city/indicator with the requested model
///
/// # Errors
///
/// Returns `InvalidParameter` for out-of-range parameters, `DataAccess` when the
/// accessor fails, or the selected model's failure
pub fn predict(
    accessor: &dyn SeriesAccessor,
    request: &PredictionRequest,
    config: &IntelligenceConfig,
) -> AnalysisResult<ForecastResult> {
    let forecaster = forecaster_for(request.model_type);
    let labels = resolve_labels(accessor, request.city_id, request.indicator_id);

    let params = ForecastParams::new(request.prediction_years, request.confidence_level, config)
        .map_err(|e| AnalysisFailure::new(labels.clone(), e).with_model(forecaster.model_type()))?;

    let series = load_observed_series(
        accessor,
        request.city_id,
        request.indicator_id,
        YearRange::unbounded(),
        &labels,
    )
    .map_err(|failure| failure.with_model(forecaster.model_type()))?;

    debug!(
        model = %forecaster.model_type(),
        points = series.len(),
        horizon = params.prediction_years,
        "Running forecast"
    );
    forecaster.forecast(labels, &series, &params)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_params_reject_zero_horizon_and_bad_confidence() {
        let config = IntelligenceConfig::default();
        assert!(ForecastParams::new(0, 0.95, &config).is_err());
        assert!(ForecastParams::new(51, 0.95, &config).is_err());
        assert!(ForecastParams::new(3, 1.5, &config).is_err());
        assert!(ForecastParams::new(3, 0.9, &config).is_ok());
    }

    #[test]
    fn test_horizon_years_follow_the_last_year() {
        assert_eq!(horizon_years(2023, 3).unwrap(), vec![2024, 2025, 2026]);
        assert_eq!(horizon_years(i32::MAX - 1, 1).unwrap(), vec![i32::MAX]);
        assert_eq!(
            horizon_years(i32::MAX - 1, 2).unwrap_err().kind(),
            "invalid_parameter"
        );
    }

    #[test]
    fn test_arima_order_serializes_as_array() {
        let json = serde_json::to_string(&ArimaOrder(1, 1, 1)).unwrap();
        assert_eq!(json, "[1,1,1]");
    }

    #[test]
    fn test_ensemble_accuracy_promotes_linear_fields() {
        let linear = LinearAccuracy {
            r_squared: 0.9,
            mse: 1.0,
            mae: 0.5,
        };
        let accuracy = ForecastAccuracy::Ensemble(EnsembleAccuracy {
            linear,
            components: EnsembleComponents {
                linear_regression: linear,
                arima: ArimaAccuracy { aic: 10.0, bic: 12.0 },
            },
        });

        let json = serde_json::to_value(accuracy).unwrap();
        assert_eq!(json["r_squared"], 0.9);
        assert_eq!(json["components"]["arima"]["aic"], 10.0);
        assert!(json.get("aic").is_none());

        let back: ForecastAccuracy = serde_json::from_value(json).unwrap();
        assert_eq!(back, accuracy);
    }
}
