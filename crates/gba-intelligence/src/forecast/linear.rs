// ABOUTME: Linear regression forecaster extrapolating an OLS fit of value on year
// ABOUTME: Uses a constant residual-error band at the requested confidence level
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use gba_core::constants::analysis::COEFFICIENT_DECIMALS;
use tracing::debug;

use super::{
    horizon_years, ForecastAccuracy, ForecastParams, ForecastPoint, ForecastResult, Forecaster,
    LinearAccuracy, ModelType,
};
use crate::accessor::ObservedSeries;
use crate::errors::{AnalysisError, HistoryRequirement};
use crate::statistical_analysis::{round_to, StatisticalAnalyzer};

/// Ordinary least squares forecaster
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearForecaster;

impl LinearForecaster {
    /// Forecast points and training-fit accuracy
    ///
    /// # Errors
    ///
    /// Returns `InsufficientHistory` below five present points and
    /// `InvalidParameter` for a confidence level outside (0, 1)
    pub fn fit(
        series: &ObservedSeries,
        params: &ForecastParams,
    ) -> Result<(Vec<ForecastPoint>, LinearAccuracy), AnalysisError> {
        let requirement = HistoryRequirement::LinearForecast;
        if series.len() < requirement.minimum_points() {
            return Err(AnalysisError::insufficient(requirement, series.len()));
        }
        let Some(last_year) = series.last_year() else {
            return Err(AnalysisError::insufficient(requirement, 0));
        };

        let regression = StatisticalAnalyzer::linear_regression(&series.years_f64(), &series.values)?;
        let z = StatisticalAnalyzer::z_score(params.confidence_level)?;
        let half_width = z * regression.residual_std_error;

        debug!(
            slope = regression.slope,
            residual_std_error = regression.residual_std_error,
            z,
            "Fitted linear forecast model"
        );

        let predictions = horizon_years(last_year, params.prediction_years)?
            .into_iter()
            .map(|year| {
                ForecastPoint::from_band(year, regression.predict(f64::from(year)), half_width)
            })
            .collect();

        let accuracy = LinearAccuracy {
            r_squared: round_to(regression.r_squared, COEFFICIENT_DECIMALS),
            mse: round_to(regression.mse, COEFFICIENT_DECIMALS),
            mae: round_to(regression.mae, COEFFICIENT_DECIMALS),
        };

        Ok((predictions, accuracy))
    }
}

impl Forecaster for LinearForecaster {
    fn model_type(&self) -> ModelType {
        ModelType::LinearRegression
    }

    fn forecast_series(
        &self,
        series: &ObservedSeries,
        params: &ForecastParams,
    ) -> Result<ForecastResult, AnalysisError> {
        let (predictions, accuracy) = Self::fit(series, params)?;
        Ok(ForecastResult::new(
            ModelType::LinearRegression,
            predictions,
            ForecastAccuracy::Linear(accuracy),
            series,
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn params() -> ForecastParams {
        ForecastParams {
            prediction_years: 3,
            confidence_level: 0.95,
        }
    }

    #[test]
    fn test_exact_line_has_zero_width_band() {
        let series = ObservedSeries::new(
            (2015..2020).collect(),
            vec![10.0, 12.0, 14.0, 16.0, 18.0],
        );

        let (points, accuracy) = LinearForecaster::fit(&series, &params()).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[0].year, 2020);
        assert!((points[0].predicted_value - 20.0).abs() < 1e-9);
        assert!((points[2].predicted_value - 24.0).abs() < 1e-9);
        assert!((points[0].confidence_upper - points[0].confidence_lower).abs() < 1e-9);
        assert!((accuracy.r_squared - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_band_width_is_constant_across_horizon() {
        let series = ObservedSeries::new(
            (2010..2016).collect(),
            vec![10.0, 13.0, 13.5, 17.0, 18.0, 21.5],
        );

        let (points, _) = LinearForecaster::fit(&series, &params()).unwrap();
        let widths: Vec<f64> = points
            .iter()
            .map(|p| p.confidence_upper - p.confidence_lower)
            .collect();
        assert!(widths.windows(2).all(|w| (w[0] - w[1]).abs() <= 0.011));
        assert!(points
            .iter()
            .all(|p| p.confidence_lower <= p.predicted_value && p.predicted_value <= p.confidence_upper));
    }

    #[test]
    fn test_horizon_past_the_last_representable_year_is_rejected() {
        let series = ObservedSeries::new(
            ((i32::MAX - 4)..=i32::MAX).collect(),
            vec![10.0, 12.0, 14.0, 16.0, 18.0],
        );

        let err = LinearForecaster::fit(&series, &params()).unwrap_err();
        assert_eq!(err.kind(), "invalid_parameter");
    }

    #[test]
    fn test_four_points_are_insufficient() {
        let series = ObservedSeries::new((2015..2019).collect(), vec![1.0, 2.0, 3.0, 4.0]);
        let err = LinearForecaster::fit(&series, &params()).unwrap_err();
        assert_eq!(err.kind(), "insufficient_history");
    }
}
