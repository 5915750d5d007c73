// ABOUTME: ARIMA(1,1,1) forecaster fitted by exact Gaussian likelihood on first differences
// ABOUTME: Kalman-filter likelihood maximised with Nelder-Mead, psi-weight forecast variance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! ARIMA(1,1,1)
//!
//! The series is differenced once and an ARMA(1,1) without constant is fitted
//! to the differences `w`:
//!
//! ```text
//! w_t = phi * w_{t-1} + e_t + theta * e_{t-1},   e_t ~ N(0, sigma^2)
//! ```
//!
//! The exact likelihood comes from a Kalman filter over the state
//! `[w_t, theta * e_t]`, concentrated in `sigma^2`. `phi` and `theta` are
//! searched through `tanh` so the model stays stationary and invertible.
//! Observations are treated as evenly spaced regardless of year gaps.

use std::f64::consts::PI;

use gba_core::constants::analysis::COEFFICIENT_DECIMALS;
use tracing::{debug, warn};

use super::{
    horizon_years, ArimaAccuracy, ArimaOrder, ForecastAccuracy, ForecastParams, ForecastPoint, ForecastResult,
    Forecaster, ModelType,
};
use crate::accessor::ObservedSeries;
use crate::errors::{AnalysisError, HistoryRequirement};
use crate::optimization::{nelder_mead, NelderMeadConfig};
use crate::statistical_analysis::{round_to, StatisticalAnalyzer};

/// The only order this forecaster fits
pub const ARIMA_ORDER: ArimaOrder = ArimaOrder(1, 1, 1);

/// Free parameters counted by the information criteria: phi, theta, sigma^2
const ESTIMATED_PARAMS: f64 = 3.0;

/// Coefficients are kept strictly inside the unit circle
const COEFFICIENT_BOUND: f64 = 0.9999;

/// Search box in the unconstrained `atanh` space
const SEARCH_BOUND: f64 = 5.0;

/// Prediction-error variance below this is treated as a singular filter
const MIN_INNOVATION_VARIANCE: f64 = 1e-12;

const MAX_ITERATIONS: usize = 1000;

fn fit_failure(reason: impl Into<String>) -> AnalysisError {
    AnalysisError::ModelFitFailure {
        reason: reason.into(),
    }
}

fn constrain(unconstrained: f64) -> f64 {
    unconstrained.tanh().clamp(-COEFFICIENT_BOUND, COEFFICIENT_BOUND)
}

/// Sufficient statistics of one Kalman pass
#[derive(Debug, Clone, Copy, PartialEq)]
struct FilterPass {
    /// Sum of squared standardized innovations, `sum v^2 / F`
    weighted_sum_sq: f64,
    /// Sum of `ln F`
    sum_log_variance: f64,
    /// One-step prediction of the next difference
    next_difference: f64,
}

/// Kalman filter for ARMA(1,1) with unit innovation variance
fn kalman_filter(w: &[f64], phi: f64, theta: f64) -> Option<FilterPass> {
    let phi_sq = phi * phi;
    if phi_sq >= 1.0 {
        return None;
    }

    // Stationary initial covariance of [w_t, theta * e_t]
    let mut a = [0.0, 0.0];
    let mut p = [
        [(2.0 * phi).mul_add(theta, theta.mul_add(theta, 1.0)) / (1.0 - phi_sq), theta],
        [theta, theta * theta],
    ];

    let mut weighted_sum_sq = 0.0;
    let mut sum_log_variance = 0.0;

    for &observed in w {
        let innovation = observed - a[0];
        let variance = p[0][0];
        if !variance.is_finite() || variance < MIN_INNOVATION_VARIANCE {
            return None;
        }

        weighted_sum_sq += innovation * innovation / variance;
        sum_log_variance += variance.ln();

        let gain = [p[0][0] / variance, p[1][0] / variance];
        let updated = [gain[0].mul_add(innovation, a[0]), gain[1].mul_add(innovation, a[1])];
        let pu00 = p[0][0] - gain[0] * p[0][0];
        let pu01 = p[0][1] - gain[0] * p[0][1];
        let pu11 = p[1][1] - gain[1] * p[0][1];

        a = [phi.mul_add(updated[0], updated[1]), 0.0];
        p = [
            [phi.mul_add(phi * pu00, (2.0 * phi).mul_add(pu01, pu11)) + 1.0, theta],
            [theta, theta * theta],
        ];
    }

    Some(FilterPass {
        weighted_sum_sq,
        sum_log_variance,
        next_difference: a[0],
    })
}

/// Log-likelihood with `sigma^2` profiled out, plus the `sigma^2` estimate
fn concentrated_log_likelihood(w: &[f64], phi: f64, theta: f64) -> Option<(f64, f64, FilterPass)> {
    let pass = kalman_filter(w, phi, theta)?;
    let n = w.len() as f64;
    let sigma2 = pass.weighted_sum_sq / n;
    if !(sigma2.is_finite() && sigma2 > 0.0) {
        return None;
    }

    let log_likelihood =
        (-0.5 * n).mul_add((2.0 * PI).ln() + sigma2.ln() + 1.0, -0.5 * pass.sum_log_variance);
    log_likelihood
        .is_finite()
        .then_some((log_likelihood, sigma2, pass))
}

fn lag_one_autocorrelation(w: &[f64], mean: f64) -> f64 {
    let denominator: f64 = w.iter().map(|v| (v - mean).powi(2)).sum();
    if denominator <= 0.0 {
        return 0.0;
    }
    let numerator: f64 = w
        .windows(2)
        .map(|pair| (pair[1] - mean) * (pair[0] - mean))
        .sum();
    numerator / denominator
}

/// Estimated ARIMA(1,1,1) model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArimaFit {
    /// Autoregressive coefficient
    pub phi: f64,
    /// Moving-average coefficient
    pub theta: f64,
    /// Innovation variance
    pub sigma2: f64,
    /// Maximised log-likelihood
    pub log_likelihood: f64,
    /// Akaike information criterion
    pub aic: f64,
    /// Bayesian information criterion
    pub bic: f64,
    /// Differenced observations used
    pub nobs: usize,
    last_level: f64,
    next_difference: f64,
}

impl ArimaFit {
    /// Fit ARIMA(1,1,1) to `values` in order
    ///
    /// # Errors
    ///
    /// Returns `ModelFitFailure` when the differences are all zero, the
    /// likelihood cannot be evaluated, or the optimizer does not converge
    pub fn estimate(values: &[f64]) -> Result<Self, AnalysisError> {
        let Some(&last_level) = values.last() else {
            return Err(fit_failure("empty series"));
        };
        let w: Vec<f64> = values.windows(2).map(|pair| pair[1] - pair[0]).collect();
        if w.len() < 3 {
            return Err(fit_failure(format!(
                "too few observations after differencing ({})",
                w.len()
            )));
        }

        // No mean term: a steady nonzero difference is fitted with phi at its bound
        let m = w.len() as f64;
        let mean = w.iter().sum::<f64>() / m;
        let mean_sq = w.iter().map(|v| v * v).sum::<f64>() / m;
        if mean_sq <= f64::MIN_POSITIVE {
            return Err(fit_failure("differenced series is all zero, likelihood is singular"));
        }

        let start = [
            lag_one_autocorrelation(&w, mean).clamp(-0.9, 0.9).atanh(),
            0.0,
        ];
        let bounds = [(-SEARCH_BOUND, SEARCH_BOUND), (-SEARCH_BOUND, SEARCH_BOUND)];
        let config = NelderMeadConfig {
            max_iter: MAX_ITERATIONS,
            tolerance: 1e-8,
            ..Default::default()
        };

        let result = nelder_mead(
            |params| {
                concentrated_log_likelihood(&w, constrain(params[0]), constrain(params[1]))
                    .map_or(f64::INFINITY, |(ll, _, _)| -ll)
            },
            &start,
            Some(&bounds),
            config,
        );

        if !result.optimal_value.is_finite() {
            return Err(fit_failure("log-likelihood is not finite for any parameter value"));
        }
        if !result.converged {
            return Err(fit_failure(format!(
                "maximum likelihood optimization did not converge after {} iterations",
                result.iterations
            )));
        }

        let phi = constrain(result.optimal_point[0]);
        let theta = constrain(result.optimal_point[1]);
        let (log_likelihood, sigma2, pass) = concentrated_log_likelihood(&w, phi, theta)
            .ok_or_else(|| fit_failure("Kalman filter became singular at the optimum"))?;

        debug!(
            phi,
            theta,
            sigma2,
            log_likelihood,
            iterations = result.iterations,
            "Estimated ARIMA(1,1,1)"
        );

        Ok(Self {
            phi,
            theta,
            sigma2,
            log_likelihood,
            aic: (-2.0f64).mul_add(log_likelihood, 2.0 * ESTIMATED_PARAMS),
            bic: (-2.0f64).mul_add(log_likelihood, ESTIMATED_PARAMS * m.ln()),
            nobs: w.len(),
            last_level,
            next_difference: pass.next_difference,
        })
    }

    /// Level forecasts and their standard errors for `steps` horizons
    #[must_use]
    pub fn forecast(&self, steps: usize) -> Vec<(f64, f64)> {
        let mut forecasts = Vec::with_capacity(steps);
        let mut level = self.last_level;
        let mut difference = self.next_difference;

        let mut psi = 1.0;
        let mut cumulative_psi = 0.0;
        let mut variance_sum = 0.0;

        for step in 0..steps {
            level += difference;
            difference *= self.phi;

            cumulative_psi += psi;
            variance_sum += cumulative_psi * cumulative_psi;
            psi = if step == 0 {
                self.phi + self.theta
            } else {
                psi * self.phi
            };

            forecasts.push((level, (self.sigma2 * variance_sum).sqrt()));
        }

        forecasts
    }
}

/// ARIMA(1,1,1) forecaster with model-based confidence bands
#[derive(Debug, Clone, Copy, Default)]
pub struct ArimaForecaster;

impl ArimaForecaster {
    /// Forecast points and information criteria
    ///
    /// # Errors
    ///
    /// Returns `InsufficientHistory` below ten present points, `InvalidParameter`
    /// for a bad confidence level, or `ModelFitFailure`
    pub fn fit(
        series: &ObservedSeries,
        params: &ForecastParams,
    ) -> Result<(Vec<ForecastPoint>, ArimaAccuracy), AnalysisError> {
        let requirement = HistoryRequirement::ArimaForecast;
        if series.len() < requirement.minimum_points() {
            return Err(AnalysisError::insufficient(requirement, series.len()));
        }
        let Some(last_year) = series.last_year() else {
            return Err(AnalysisError::insufficient(requirement, 0));
        };
        let z = StatisticalAnalyzer::z_score(params.confidence_level)?;

        let years = horizon_years(last_year, params.prediction_years)?;

        let model = ArimaFit::estimate(&series.values).inspect_err(|e| {
            warn!(error = %e, points = series.len(), "ARIMA fit failed");
        })?;

        let predictions = model
            .forecast(params.prediction_years)
            .into_iter()
            .zip(years)
            .map(|((mean, std_error), year)| ForecastPoint::from_band(year, mean, z * std_error))
            .collect();

        let accuracy = ArimaAccuracy {
            aic: round_to(model.aic, COEFFICIENT_DECIMALS),
            bic: round_to(model.bic, COEFFICIENT_DECIMALS),
        };

        Ok((predictions, accuracy))
    }
}

impl ArimaForecaster {
    /// Result payload echoing the fitted order
    #[must_use]
    pub fn assemble(
        series: &ObservedSeries,
        predictions: Vec<ForecastPoint>,
        accuracy: ArimaAccuracy,
    ) -> ForecastResult {
        let mut result = ForecastResult::new(
            ModelType::Arima,
            predictions,
            ForecastAccuracy::Arima(accuracy),
            series,
        );
        result.order = Some(ARIMA_ORDER);
        result
    }
}

impl Forecaster for ArimaForecaster {
    fn model_type(&self) -> ModelType {
        ModelType::Arima
    }

    fn forecast_series(
        &self,
        series: &ObservedSeries,
        params: &ForecastParams,
    ) -> Result<ForecastResult, AnalysisError> {
        let (predictions, accuracy) = Self::fit(series, params)?;
        Ok(Self::assemble(series, predictions, accuracy))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn wavy_trend(n: usize) -> Vec<f64> {
        (0..n)
            .map(|t| {
                let t = t as f64;
                3.0f64.mul_add((1.3 * t).sin(), 5.0f64.mul_add(t, 100.0))
            })
            .collect()
    }

    #[test]
    fn test_white_noise_likelihood_matches_closed_form() {
        let w = [1.0, -2.0, 0.5, 1.5];
        let (ll, sigma2, pass) = concentrated_log_likelihood(&w, 0.0, 0.0).unwrap();

        let expected_sigma2 = w.iter().map(|v| v * v).sum::<f64>() / 4.0;
        let expected_ll = -0.5 * 4.0 * ((2.0 * PI).ln() + expected_sigma2.ln() + 1.0);
        assert!((sigma2 - expected_sigma2).abs() < 1e-12);
        assert!((ll - expected_ll).abs() < 1e-12);
        assert!(pass.next_difference.abs() < 1e-12);
    }

    #[test]
    fn test_ar1_first_innovation_uses_stationary_variance() {
        let pass = kalman_filter(&[1.0, 1.0, 1.0], 0.5, 0.0).unwrap();
        let expected = (1.0f64 / 0.75).ln();
        assert!((pass.sum_log_variance - expected).abs() < 1e-12);
        assert!((pass.next_difference - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_psi_weights_widen_band() {
        let fit = ArimaFit {
            phi: 0.5,
            theta: 0.2,
            sigma2: 4.0,
            log_likelihood: 0.0,
            aic: 0.0,
            bic: 0.0,
            nobs: 10,
            last_level: 100.0,
            next_difference: 2.0,
        };
        let forecasts = fit.forecast(3);

        assert!((forecasts[0].0 - 102.0).abs() < 1e-12);
        assert!((forecasts[1].0 - 103.0).abs() < 1e-12);
        assert!((forecasts[0].1 - 2.0).abs() < 1e-12);
        // Psi_1 = 1 + 0.7 = 1.7, var_2 = 4 * (1 + 1.7^2)
        assert!((forecasts[1].1 - (4.0f64 * 3.89).sqrt()).abs() < 1e-12);
        assert!(forecasts[2].1 > forecasts[1].1);
    }

    #[test]
    fn test_fits_wavy_trend() {
        let values = wavy_trend(15);
        let fit = ArimaFit::estimate(&values).unwrap();

        assert!(fit.phi.abs() < 1.0 && fit.theta.abs() < 1.0);
        assert!(fit.aic.is_finite() && fit.bic.is_finite());
        assert_eq!(fit.nobs, 14);
        assert!(fit.bic > fit.aic);
    }

    #[test]
    fn test_fits_exact_linear_trend() {
        let values: Vec<f64> = (0..12).map(|t| 5.0f64.mul_add(f64::from(t), 100.0)).collect();
        let fit = ArimaFit::estimate(&values).unwrap();

        assert!(fit.phi > 0.9);
        assert!(fit.sigma2 > 0.0 && fit.aic.is_finite());
        let forecasts = fit.forecast(2);
        assert!((forecasts[0].0 - 160.0).abs() < 0.5);
        assert!(forecasts[1].0 > forecasts[0].0);
    }

    #[test]
    fn test_constant_series_fails_to_fit() {
        let err = ArimaFit::estimate(&[7.0; 12]).unwrap_err();
        assert_eq!(err.kind(), "model_fit_failure");
        assert!(err.to_string().starts_with("ARIMA model fitting failed: "));
    }

    #[test]
    fn test_nine_points_are_insufficient() {
        let values = wavy_trend(9);
        let series = ObservedSeries::new((2010..2019).collect(), values);
        let params = ForecastParams {
            prediction_years: 3,
            confidence_level: 0.95,
        };
        let err = ArimaForecaster::fit(&series, &params).unwrap_err();
        assert_eq!(err.kind(), "insufficient_history");
    }
}
