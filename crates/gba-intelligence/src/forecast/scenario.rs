// ABOUTME: Scenario simulation scaling a linear baseline forecast by named percentage factors
// ABOUTME: Applies one multiplier per scenario uniformly to every horizon and both band edges
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeMap;

use gba_core::constants::analysis::VALUE_DECIMALS;
use gba_core::models::{ScenarioRequest, YearRange};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ForecastParams, ForecastPoint, Forecaster, LinearForecaster, ModelType};
use crate::accessor::{load_observed_series, resolve_labels, ObservedSeries, SeriesAccessor, SeriesLabels};
use crate::config::IntelligenceConfig;
use crate::errors::{AnalysisError, AnalysisFailure, AnalysisResult};
use crate::statistical_analysis::round_to;

/// Baseline forecast plus its scaled scenarios
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    /// City / indicator labels
    #[serde(flatten)]
    pub labels: SeriesLabels,
    /// Always `scenario_simulation`
    pub model_type: ModelType,
    /// Unmodified linear forecast
    pub base_prediction: Vec<ForecastPoint>,
    /// Scenario name to adjusted forecast
    pub scenarios: BTreeMap<String, Vec<ForecastPoint>>,
}

/// Percentage what-if simulator on top of [`LinearForecaster`]
pub struct ScenarioSimulator;

impl ScenarioSimulator {
    /// Run the baseline for the request's series and apply every scenario
    ///
    /// The baseline uses the configured default confidence level.
    ///
    /// # Errors
    ///
    /// Returns the baseline's failure unchanged, or `InvalidParameter` for an
    /// empty scenario name or a non-finite factor
    pub fn simulate(
        accessor: &dyn SeriesAccessor,
        request: &ScenarioRequest,
        config: &IntelligenceConfig,
    ) -> AnalysisResult<ScenarioResult> {
        let labels = resolve_labels(accessor, request.city_id, request.indicator_id);
        let params = ForecastParams::new(
            request.prediction_years,
            config.default_confidence_level,
            config,
        )
        .map_err(|e| {
            AnalysisFailure::new(labels.clone(), e).with_model(ModelType::ScenarioSimulation)
        })?;

        let series = load_observed_series(
            accessor,
            request.city_id,
            request.indicator_id,
            YearRange::unbounded(),
            &labels,
        )
        .map_err(|failure| failure.with_model(ModelType::ScenarioSimulation))?;

        Self::simulate_series(labels, &series, &request.scenarios, &params)
    }

    /// Apply scenarios to the linear forecast of an already-loaded series
    ///
    /// # Errors
    ///
    /// See [`ScenarioSimulator::simulate`]
    pub fn simulate_series(
        labels: SeriesLabels,
        series: &ObservedSeries,
        scenarios: &BTreeMap<String, f64>,
        params: &ForecastParams,
    ) -> AnalysisResult<ScenarioResult> {
        if let Err(error) = Self::validate(scenarios) {
            return Err(AnalysisFailure::new(labels, error).with_model(ModelType::ScenarioSimulation));
        }

        let baseline = LinearForecaster.forecast(labels, series, params)?;

        let adjusted = scenarios
            .iter()
            .map(|(name, &factor)| {
                debug!(scenario = %name, factor, "Applying scenario");
                (name.clone(), Self::apply(&baseline.predictions, factor))
            })
            .collect();

        Ok(ScenarioResult {
            labels: baseline.labels,
            model_type: ModelType::ScenarioSimulation,
            base_prediction: baseline.predictions,
            scenarios: adjusted,
        })
    }

    /// Scale every point and both bounds by `1 + factor / 100`
    #[must_use]
    pub fn apply(baseline: &[ForecastPoint], factor: f64) -> Vec<ForecastPoint> {
        let multiplier = 1.0 + factor / 100.0;
        let scale = |value: f64| round_to(value * multiplier, VALUE_DECIMALS);

        baseline
            .iter()
            .map(|point| ForecastPoint {
                year: point.year,
                predicted_value: scale(point.predicted_value),
                confidence_lower: scale(point.confidence_lower),
                confidence_upper: scale(point.confidence_upper),
                lr_prediction: None,
                arima_prediction: None,
            })
            .collect()
    }

    fn validate(scenarios: &BTreeMap<String, f64>) -> Result<(), AnalysisError> {
        for (name, factor) in scenarios {
            if name.trim().is_empty() {
                return Err(AnalysisError::InvalidParameter(
                    "scenario names must not be empty".into(),
                ));
            }
            if !factor.is_finite() {
                return Err(AnalysisError::InvalidParameter(format!(
                    "growth factor for scenario '{name}' must be finite"
                )));
            }
        }
        Ok(())
    }
}
