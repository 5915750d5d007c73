// ABOUTME: Year-over-year growth rate between two adjacent yearly rows of one series
// ABOUTME: Separates absent rows (incomplete data) from rows whose value is missing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::cmp::Ordering;

use gba_core::constants::analysis::VALUE_DECIMALS;
use gba_core::models::{CityId, IndicatorId, SeriesPoint};
use serde::{Deserialize, Serialize};

use crate::accessor::{resolve_labels, SeriesAccessor, SeriesLabels};
use crate::errors::{AnalysisError, AnalysisFailure, AnalysisResult};
use crate::statistical_analysis::round_to;

/// Sign of a growth rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrowthDirection {
    /// Positive change
    Up,
    /// Negative change
    Down,
    /// Exactly zero change
    Unchanged,
}

impl GrowthDirection {
    fn from_rate(rate: f64) -> Self {
        match rate.partial_cmp(&0.0) {
            Some(Ordering::Greater) => Self::Up,
            Some(Ordering::Less) => Self::Down,
            _ => Self::Unchanged,
        }
    }
}

/// Growth from `year - 1` to `year`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthRateResult {
    /// City / indicator labels
    #[serde(flatten)]
    pub labels: SeriesLabels,
    /// Requested year
    pub year: i32,
    /// Value in `year`
    pub current_value: f64,
    /// Value in `year - 1`
    pub previous_value: f64,
    /// Percent change, 2 decimals
    pub growth_rate: f64,
    /// Direction of the unrounded change
    pub trend: GrowthDirection,
}

fn previous_year(year: i32) -> Result<i32, AnalysisError> {
    year.checked_sub(1).ok_or_else(|| {
        AnalysisError::InvalidParameter(format!("year {year} has no previous year"))
    })
}

/// Year-over-year growth calculator
pub struct GrowthRateCalculator;

impl GrowthRateCalculator {
    /// Growth of one indicator for one city into `year`
    ///
    /// # Errors
    ///
    /// Returns `IncompleteData` when either row is absent, `MissingValue` when a
    /// row has no usable value or the previous value is zero, `InvalidParameter`
    /// for `i32::MIN`, and `DataAccess` when the accessor fails
    pub fn calculate(
        accessor: &dyn SeriesAccessor,
        city_id: CityId,
        indicator_id: IndicatorId,
        year: i32,
    ) -> AnalysisResult<GrowthRateResult> {
        let labels = resolve_labels(accessor, city_id, indicator_id);
        let fail = |labels: SeriesLabels, error| AnalysisFailure::new(labels, error).with_year(year);

        let previous_year = match previous_year(year) {
            Ok(previous_year) => previous_year,
            Err(error) => return Err(fail(labels, error)),
        };
        let rows = accessor
            .fetch_point(city_id, indicator_id, year)
            .and_then(|current| {
                accessor
                    .fetch_point(city_id, indicator_id, previous_year)
                    .map(|previous| (current, previous))
            });

        let (current, previous) = match rows {
            Ok(pair) => pair,
            Err(e) => return Err(fail(labels, AnalysisError::from(e))),
        };

        match Self::from_points(year, current, previous) {
            Ok((current_value, previous_value, rate)) => Ok(GrowthRateResult {
                labels,
                year,
                current_value,
                previous_value,
                growth_rate: round_to(rate, VALUE_DECIMALS),
                trend: GrowthDirection::from_rate(rate),
            }),
            Err(error) => Err(fail(labels, error)),
        }
    }

    /// Growth between two looked-up rows; returns (current, previous, rate)
    ///
    /// # Errors
    ///
    /// See [`GrowthRateCalculator::calculate`]
    pub fn from_points(
        year: i32,
        current: Option<SeriesPoint>,
        previous: Option<SeriesPoint>,
    ) -> Result<(f64, f64, f64), AnalysisError> {
        let previous_year = previous_year(year)?;
        let (Some(current), Some(previous)) = (current, previous) else {
            return Err(AnalysisError::IncompleteData {
                year,
                previous_year,
            });
        };

        let current_value = current
            .value
            .filter(|v| v.is_finite())
            .ok_or(AnalysisError::MissingValue { year })?;
        let previous_value = previous
            .value
            .filter(|v| v.is_finite() && *v != 0.0)
            .ok_or(AnalysisError::MissingValue {
                year: previous_year,
            })?;

        let rate = (current_value - previous_value) / previous_value * 100.0;
        Ok((current_value, previous_value, rate))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_row_is_incomplete() {
        let err = GrowthRateCalculator::from_points(2021, Some(SeriesPoint::present(2021, 5.0)), None)
            .unwrap_err();
        assert_eq!(err.kind(), "incomplete_data");
    }

    #[test]
    fn test_null_value_is_missing() {
        let err = GrowthRateCalculator::from_points(
            2021,
            Some(SeriesPoint::missing(2021)),
            Some(SeriesPoint::present(2020, 5.0)),
        )
        .unwrap_err();
        assert_eq!(err, AnalysisError::MissingValue { year: 2021 });
    }

    #[test]
    fn test_zero_previous_value_is_missing() {
        let err = GrowthRateCalculator::from_points(
            2021,
            Some(SeriesPoint::present(2021, 5.0)),
            Some(SeriesPoint::present(2020, 0.0)),
        )
        .unwrap_err();
        assert_eq!(err, AnalysisError::MissingValue { year: 2020 });
    }

    #[test]
    fn test_earliest_representable_year_has_no_predecessor() {
        let err = GrowthRateCalculator::from_points(i32::MIN, None, None).unwrap_err();
        assert_eq!(err.kind(), "invalid_parameter");
    }

    #[test]
    fn test_zero_current_value_is_present() {
        let (current, previous, rate) = GrowthRateCalculator::from_points(
            2021,
            Some(SeriesPoint::present(2021, 0.0)),
            Some(SeriesPoint::present(2020, 50.0)),
        )
        .unwrap();
        assert!(current.abs() < f64::EPSILON);
        assert!((previous - 50.0).abs() < f64::EPSILON);
        assert!((rate + 100.0).abs() < 1e-9);
    }
}
