// ABOUTME: Pairwise Pearson correlation between indicators pooled across cities and years
// ABOUTME: Aligns series by exact year within each city and labels the strength of association
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use gba_core::constants::analysis::{
    COEFFICIENT_DECIMALS, MIN_CORRELATION_PAIRS, MODERATE_CORRELATION, STRONG_CORRELATION,
    WEAK_CORRELATION,
};
use gba_core::models::{CityId, CorrelationRequest, IndicatorId, YearRange};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::accessor::{indicator_entry, ObservedSeries, SeriesAccessor};
use crate::errors::{AnalysisError, AnalysisFailure, AnalysisResult};
use crate::statistical_analysis::{round_to, StatisticalAnalyzer};

/// Qualitative strength of |r|
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrelationStrength {
    /// |r| >= 0.8
    #[serde(rename = "strong")]
    Strong,
    /// |r| >= 0.6
    #[serde(rename = "moderate")]
    Moderate,
    /// |r| >= 0.4
    #[serde(rename = "weak")]
    Weak,
    /// Anything below
    #[serde(rename = "very weak")]
    VeryWeak,
}

impl CorrelationStrength {
    /// Classify a coefficient by its absolute value
    #[must_use]
    pub fn from_coefficient(coefficient: f64) -> Self {
        let magnitude = coefficient.abs();
        if magnitude >= STRONG_CORRELATION {
            Self::Strong
        } else if magnitude >= MODERATE_CORRELATION {
            Self::Moderate
        } else if magnitude >= WEAK_CORRELATION {
            Self::Weak
        } else {
            Self::VeryWeak
        }
    }
}

/// Correlation between two indicators
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationResult {
    /// First indicator name
    pub indicator_1: String,
    /// Second indicator name
    pub indicator_2: String,
    /// Pearson r, 4 decimals
    pub correlation: f64,
    /// Two-tailed p-value, 4 decimals
    pub p_value: f64,
    /// Label derived from the unrounded |r|
    pub strength: CorrelationStrength,
    /// Paired observations pooled across cities
    pub sample_size: usize,
}

/// Computes indicator-to-indicator correlations
pub struct CorrelationAnalyzer;

impl CorrelationAnalyzer {
    /// One entry per indicator pair `(i, j)`, `i < j`, that has enough paired data
    ///
    /// Pairs with an unknown indicator, fewer than three paired observations or
    /// a constant sample are left out of the list.
    ///
    /// # Errors
    ///
    /// Returns `DataAccess` when the accessor fails
    pub fn analyze(
        accessor: &dyn SeriesAccessor,
        request: &CorrelationRequest,
    ) -> AnalysisResult<Vec<CorrelationResult>> {
        let mut results = Vec::new();
        let indicators = &request.indicator_ids;

        for (i, &first_id) in indicators.iter().enumerate() {
            for &second_id in &indicators[i + 1..] {
                let (Some(first), Some(second)) = (
                    indicator_entry(accessor, first_id),
                    indicator_entry(accessor, second_id),
                ) else {
                    debug!(first_id, second_id, "Skipping pair with unknown indicator");
                    continue;
                };

                let (xs, ys) = Self::paired_sample(
                    accessor,
                    &request.city_ids,
                    (first_id, second_id),
                    request.range,
                )
                .map_err(AnalysisFailure::unlabeled)?;

                if let Some(result) =
                    Self::correlate(&first.indicator_name, &second.indicator_name, &xs, &ys)
                {
                    results.push(result);
                }
            }
        }

        Ok(results)
    }

    /// Year-matched value pairs for every city, concatenated in city order
    fn paired_sample(
        accessor: &dyn SeriesAccessor,
        city_ids: &[CityId],
        (first_id, second_id): (IndicatorId, IndicatorId),
        range: YearRange,
    ) -> Result<(Vec<f64>, Vec<f64>), AnalysisError> {
        let mut xs = Vec::new();
        let mut ys = Vec::new();

        for &city_id in city_ids {
            let first = ObservedSeries::from_points(&accessor.fetch_series(city_id, first_id, range)?);
            let second =
                ObservedSeries::from_points(&accessor.fetch_series(city_id, second_id, range)?);

            for (&year, &x) in first.years.iter().zip(&first.values) {
                if let Some(y) = second.value_at(year) {
                    xs.push(x);
                    ys.push(y);
                }
            }
        }

        Ok((xs, ys))
    }

    /// Correlate an already-paired sample; `None` when it must be left out
    #[must_use]
    pub fn correlate(
        indicator_1: &str,
        indicator_2: &str,
        xs: &[f64],
        ys: &[f64],
    ) -> Option<CorrelationResult> {
        if xs.len() < MIN_CORRELATION_PAIRS {
            debug!(
                indicator_1,
                indicator_2,
                pairs = xs.len(),
                "Too few paired observations for correlation"
            );
            return None;
        }

        let Some(stats) = StatisticalAnalyzer::pearson_correlation(xs, ys) else {
            warn!(
                indicator_1,
                indicator_2,
                pairs = xs.len(),
                "Dropping correlation pair with zero variance"
            );
            return None;
        };

        Some(CorrelationResult {
            indicator_1: indicator_1.to_owned(),
            indicator_2: indicator_2.to_owned(),
            correlation: round_to(stats.coefficient, COEFFICIENT_DECIMALS),
            p_value: round_to(stats.p_value, COEFFICIENT_DECIMALS),
            strength: CorrelationStrength::from_coefficient(stats.coefficient),
            sample_size: stats.sample_size,
        })
    }
}
