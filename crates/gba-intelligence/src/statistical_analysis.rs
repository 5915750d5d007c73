// ABOUTME: Statistical primitives for indicator analysis: OLS fits, Pearson correlation and quantiles
// ABOUTME: Implements least squares, fit metrics, two-tailed significance and fixed-decimal rounding
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

use crate::errors::AnalysisError;

/// Ordinary least squares fit of one response on one predictor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionResult {
    /// Slope of the regression line
    pub slope: f64,
    /// Y-intercept of the regression line
    pub intercept: f64,
    /// Coefficient of determination against the training data
    pub r_squared: f64,
    /// Mean squared residual
    pub mse: f64,
    /// Mean absolute residual
    pub mae: f64,
    /// Square root of the mean squared residual
    pub residual_std_error: f64,
    /// Number of observations fitted
    pub sample_size: usize,
}

impl RegressionResult {
    /// Evaluate the fitted line at `x`
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.slope.mul_add(x, self.intercept)
    }
}

/// Pearson correlation with its two-tailed significance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationStats {
    /// Correlation coefficient in [-1, 1]
    pub coefficient: f64,
    /// Two-tailed p-value under the null of no linear association
    pub p_value: f64,
    /// Number of pairs
    pub sample_size: usize,
}

/// Stateless statistical routines shared by the analyzers and forecasters
pub struct StatisticalAnalyzer;

impl StatisticalAnalyzer {
    /// Least squares fit of `y` on `x`
    ///
    /// Sums are accumulated on values shifted by the first observation so that
    /// large abscissae such as calendar years do not cost precision, and a
    /// constant response yields a slope of exactly zero.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` when the inputs differ in length, hold fewer
    /// than two points, or `x` has no variance
    pub fn linear_regression(x: &[f64], y: &[f64]) -> Result<RegressionResult, AnalysisError> {
        if x.len() != y.len() {
            return Err(AnalysisError::InvalidParameter(format!(
                "regression inputs differ in length ({} vs {})",
                x.len(),
                y.len()
            )));
        }
        let (Some(&x0), Some(&y0)) = (x.first(), y.first()) else {
            return Err(AnalysisError::InvalidParameter(
                "regression needs at least two points".into(),
            ));
        };
        if x.len() < 2 {
            return Err(AnalysisError::InvalidParameter(
                "regression needs at least two points".into(),
            ));
        }

        let n = x.len() as f64;
        let dx: Vec<f64> = x.iter().map(|v| v - x0).collect();
        let dy: Vec<f64> = y.iter().map(|v| v - y0).collect();
        let mean_dx = dx.iter().sum::<f64>() / n;
        let mean_dy = dy.iter().sum::<f64>() / n;

        let (sxx, sxy, syy) = dx.iter().zip(&dy).fold((0.0, 0.0, 0.0), |acc, (a, b)| {
            let cx = a - mean_dx;
            let cy = b - mean_dy;
            (cx.mul_add(cx, acc.0), cx.mul_add(cy, acc.1), cy.mul_add(cy, acc.2))
        });

        if sxx <= 0.0 {
            return Err(AnalysisError::InvalidParameter(
                "regression predictor has zero variance".into(),
            ));
        }

        let slope = sxy / sxx;
        let intercept = slope.mul_add(-(x0 + mean_dx), y0 + mean_dy);

        let (sse, sae) = x.iter().zip(y).fold((0.0, 0.0), |acc, (&xi, &yi)| {
            let residual = yi - slope.mul_add(xi, intercept);
            (residual.mul_add(residual, acc.0), acc.1 + residual.abs())
        });

        let r_squared = if syy > 0.0 {
            1.0 - sse / syy
        } else if sse == 0.0 {
            1.0
        } else {
            0.0
        };
        let mse = sse / n;

        Ok(RegressionResult {
            slope,
            intercept,
            r_squared,
            mse,
            mae: sae / n,
            residual_std_error: mse.sqrt(),
            sample_size: x.len(),
        })
    }

    /// Pearson correlation of paired samples with a Student's t significance test
    ///
    /// Returns `None` when the lengths differ, fewer than three pairs exist, or
    /// either sample has zero variance.
    #[must_use]
    pub fn pearson_correlation(x: &[f64], y: &[f64]) -> Option<CorrelationStats> {
        if x.len() != y.len() || x.len() < 3 {
            return None;
        }

        let n = x.len() as f64;
        let mean_x = x.iter().sum::<f64>() / n;
        let mean_y = y.iter().sum::<f64>() / n;

        let (sxx, sxy, syy) = x.iter().zip(y).fold((0.0, 0.0, 0.0), |acc, (a, b)| {
            let cx = a - mean_x;
            let cy = b - mean_y;
            (cx.mul_add(cx, acc.0), cx.mul_add(cy, acc.1), cy.mul_add(cy, acc.2))
        });

        if sxx <= 0.0 || syy <= 0.0 {
            return None;
        }

        let coefficient = (sxy / (sxx * syy).sqrt()).clamp(-1.0, 1.0);
        let p_value = Self::correlation_p_value(coefficient, x.len())?;

        Some(CorrelationStats {
            coefficient,
            p_value,
            sample_size: x.len(),
        })
    }

    /// Two-tailed p-value of a correlation coefficient over `n` pairs
    fn correlation_p_value(r: f64, n: usize) -> Option<f64> {
        let df = n.checked_sub(2).filter(|&df| df > 0)? as f64;
        if r.abs() >= 1.0 {
            return Some(0.0);
        }

        let t = r * (df / r.mul_add(-r, 1.0)).sqrt();
        let dist = StudentsT::new(0.0, 1.0, df).ok()?;
        Some((2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0))
    }

    /// Standard normal quantile at probability `p`
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` when `p` is not strictly inside (0, 1)
    pub fn normal_quantile(p: f64) -> Result<f64, AnalysisError> {
        if !(p > 0.0 && p < 1.0) {
            return Err(AnalysisError::InvalidParameter(format!(
                "quantile probability {p} must be strictly between 0 and 1"
            )));
        }
        let normal = Normal::new(0.0, 1.0)
            .map_err(|e| AnalysisError::InvalidParameter(e.to_string()))?;
        Ok(normal.inverse_cdf(p))
    }

    /// Two-sided z-score for a confidence level, e.g. 0.95 gives about 1.96
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` when the level is not strictly inside (0, 1)
    pub fn z_score(confidence_level: f64) -> Result<f64, AnalysisError> {
        if !(confidence_level > 0.0 && confidence_level < 1.0) {
            return Err(AnalysisError::InvalidParameter(format!(
                "confidence_level {confidence_level} must be strictly between 0 and 1"
            )));
        }
        let alpha = 1.0 - confidence_level;
        Self::normal_quantile(1.0 - alpha / 2.0)
    }

    /// Percentage change from `first` to `last`, undefined for a zero base
    #[must_use]
    pub fn percent_change(first: f64, last: f64) -> Option<f64> {
        if first == 0.0 {
            None
        } else {
            Some((last - first) / first * 100.0)
        }
    }

    /// Arithmetic mean, `None` for an empty slice
    #[must_use]
    pub fn mean(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        }
    }
}

/// Round half away from zero to `decimals` places; negative zero collapses to zero
#[must_use]
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor + 0.0
}
