// ABOUTME: Ensemble forecaster averaging the linear and ARIMA forecasts step by step
// ABOUTME: Runs both models in parallel and falls back to whichever single model succeeded
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use gba_core::constants::analysis::VALUE_DECIMALS;
use tracing::warn;

use super::{
    ArimaAccuracy, ArimaForecaster, EnsembleAccuracy, EnsembleComponents, ForecastAccuracy,
    ForecastParams, ForecastPoint, ForecastResult, Forecaster, LinearAccuracy, LinearForecaster,
    ModelType,
};
use crate::accessor::ObservedSeries;
use crate::errors::AnalysisError;
use crate::statistical_analysis::round_to;

/// Equal-weight combination of [`LinearForecaster`] and [`ArimaForecaster`]
#[derive(Debug, Clone, Copy, Default)]
pub struct EnsembleForecaster;

impl EnsembleForecaster {
    /// Average two aligned forecasts, keeping each component's point forecast
    #[must_use]
    pub fn combine(linear: &[ForecastPoint], arima: &[ForecastPoint]) -> Vec<ForecastPoint> {
        let mean = |a: f64, b: f64| round_to((a + b) / 2.0, VALUE_DECIMALS);

        linear
            .iter()
            .zip(arima)
            .map(|(lr, ar)| ForecastPoint {
                year: lr.year,
                predicted_value: mean(lr.predicted_value, ar.predicted_value),
                confidence_lower: mean(lr.confidence_lower, ar.confidence_lower),
                confidence_upper: mean(lr.confidence_upper, ar.confidence_upper),
                lr_prediction: Some(lr.predicted_value),
                arima_prediction: Some(ar.predicted_value),
            })
            .collect()
    }

    fn merge_accuracy(linear: LinearAccuracy, arima: ArimaAccuracy) -> EnsembleAccuracy {
        EnsembleAccuracy {
            linear,
            components: EnsembleComponents {
                linear_regression: linear,
                arima,
            },
        }
    }
}

impl Forecaster for EnsembleForecaster {
    fn model_type(&self) -> ModelType {
        ModelType::Ensemble
    }

    fn forecast_series(
        &self,
        series: &ObservedSeries,
        params: &ForecastParams,
    ) -> Result<ForecastResult, AnalysisError> {
        let (linear, arima) = rayon::join(
            || LinearForecaster::fit(series, params),
            || ArimaForecaster::fit(series, params),
        );

        match (linear, arima) {
            (Ok((linear_points, linear_accuracy)), Ok((arima_points, arima_accuracy))) => {
                Ok(ForecastResult::new(
                    ModelType::Ensemble,
                    Self::combine(&linear_points, &arima_points),
                    ForecastAccuracy::Ensemble(Self::merge_accuracy(
                        linear_accuracy,
                        arima_accuracy,
                    )),
                    series,
                ))
            }
            (Ok((linear_points, linear_accuracy)), Err(arima_error)) => {
                warn!(error = %arima_error, "ARIMA component failed, returning linear forecast");
                Ok(ForecastResult::new(
                    ModelType::LinearRegression,
                    linear_points,
                    ForecastAccuracy::Linear(linear_accuracy),
                    series,
                ))
            }
            (Err(linear_error), Ok((arima_points, arima_accuracy))) => {
                warn!(error = %linear_error, "Linear component failed, returning ARIMA forecast");
                Ok(ArimaForecaster::assemble(series, arima_points, arima_accuracy))
            }
            (Err(linear_error), Err(arima_error)) => {
                warn!(
                    linear_error = %linear_error,
                    arima_error = %arima_error,
                    "Both ensemble components failed"
                );
                Err(AnalysisError::AllModelsFailed)
            }
        }
    }
}
