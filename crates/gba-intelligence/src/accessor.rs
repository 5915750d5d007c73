// ABOUTME: Series Accessor seam between the analysis engine and whatever stores indicator data
// ABOUTME: Provides label resolution, present-value filtering and the raw time-series view
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Series Accessor
//!
//! The engine never owns indicator data. Every analysis receives a
//! `&dyn SeriesAccessor` and reads through it. Label lookups that fail or find
//! nothing degrade to empty strings; series fetch failures surface as
//! [`AnalysisError::DataAccess`](crate::errors::AnalysisError::DataAccess).

use gba_core::errors::AppResult;
use gba_core::models::{
    City, CityId, CityValue, Indicator, IndicatorId, SeriesPoint, YearRange,
};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{AnalysisError, AnalysisFailure, AnalysisResult};

/// Read-only access to yearly indicator values and the reference catalog
pub trait SeriesAccessor: Send + Sync {
    /// Rows for one city/indicator ordered by year, bounded inclusively; values may be missing
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read
    fn fetch_series(
        &self,
        city_id: CityId,
        indicator_id: IndicatorId,
        range: YearRange,
    ) -> AppResult<Vec<SeriesPoint>>;

    /// The single row for (city, indicator, year); `None` when no row exists
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read
    fn fetch_point(
        &self,
        city_id: CityId,
        indicator_id: IndicatorId,
        year: i32,
    ) -> AppResult<Option<SeriesPoint>>;

    /// Every city's row for (indicator, year), values possibly missing
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read
    fn rank_cities(&self, indicator_id: IndicatorId, year: i32) -> AppResult<Vec<CityValue>>;

    /// Catalog entry for a city
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read
    fn lookup_city(&self, city_id: CityId) -> AppResult<Option<City>>;

    /// Catalog entry for an indicator
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read
    fn lookup_indicator(&self, indicator_id: IndicatorId) -> AppResult<Option<Indicator>>;

    /// Catalog entry for an indicator by its short code
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be read
    fn find_indicator_by_code(&self, code: &str) -> AppResult<Option<Indicator>>;
}

/// Display labels attached to every analysis payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesLabels {
    /// City display name
    pub city: String,
    /// Indicator display name
    pub indicator: String,
    /// Indicator unit
    pub unit: String,
}

/// Display name of a city, empty when unknown
pub fn city_name(accessor: &dyn SeriesAccessor, city_id: CityId) -> String {
    match accessor.lookup_city(city_id) {
        Ok(Some(city)) => city.city_name,
        Ok(None) => String::new(),
        Err(e) => {
            warn!(city_id, error = %e, "City lookup failed, using empty label");
            String::new()
        }
    }
}

/// Indicator catalog entry, `None` when unknown or the lookup failed
pub fn indicator_entry(accessor: &dyn SeriesAccessor, indicator_id: IndicatorId) -> Option<Indicator> {
    match accessor.lookup_indicator(indicator_id) {
        Ok(found) => found,
        Err(e) => {
            warn!(indicator_id, error = %e, "Indicator lookup failed, using empty label");
            None
        }
    }
}

/// Resolve city/indicator labels, degrading to empty strings
pub fn resolve_labels(
    accessor: &dyn SeriesAccessor,
    city_id: CityId,
    indicator_id: IndicatorId,
) -> SeriesLabels {
    let (indicator, unit) = indicator_entry(accessor, indicator_id).map_or_else(
        || (String::new(), String::new()),
        |entry| (entry.indicator_name, entry.unit.unwrap_or_default()),
    );
    SeriesLabels {
        city: city_name(accessor, city_id),
        indicator,
        unit,
    }
}

/// Present values of one series, ordered by year
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservedSeries {
    /// Years with a present value
    pub years: Vec<i32>,
    /// Values aligned with `years`
    pub values: Vec<f64>,
}

impl ObservedSeries {
    /// Keep only points carrying a finite value
    #[must_use]
    pub fn from_points(points: &[SeriesPoint]) -> Self {
        let (years, values) = points
            .iter()
            .filter_map(|p| p.value.filter(|v| v.is_finite()).map(|v| (p.year, v)))
            .unzip();
        Self { years, values }
    }

    /// Build directly from aligned years and values
    #[must_use]
    pub fn new(years: Vec<i32>, values: Vec<f64>) -> Self {
        Self { years, values }
    }

    /// Number of present points
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no point is present
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Years as regression abscissae
    #[must_use]
    pub fn years_f64(&self) -> Vec<f64> {
        self.years.iter().map(|&y| f64::from(y)).collect()
    }

    /// Last observed year
    #[must_use]
    pub fn last_year(&self) -> Option<i32> {
        self.years.last().copied()
    }

    /// Value for `year` when present
    #[must_use]
    pub fn value_at(&self, year: i32) -> Option<f64> {
        self.years
            .iter()
            .position(|&y| y == year)
            .map(|idx| self.values[idx])
    }
}

/// Fetch a series and drop its missing values
///
/// # Errors
///
/// Returns a `DataAccess` failure tagged with `labels` when the accessor fails
pub fn load_observed_series(
    accessor: &dyn SeriesAccessor,
    city_id: CityId,
    indicator_id: IndicatorId,
    range: YearRange,
    labels: &SeriesLabels,
) -> AnalysisResult<ObservedSeries> {
    accessor
        .fetch_series(city_id, indicator_id, range)
        .map(|points| ObservedSeries::from_points(&points))
        .map_err(|e| AnalysisFailure::new(labels.clone(), AnalysisError::from(e)))
}

/// Raw series with catalog labels, missing values retained
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesView {
    /// City identifier
    pub city_id: CityId,
    /// City display name
    pub city_name: String,
    /// Indicator identifier
    pub indicator_id: IndicatorId,
    /// Indicator display name
    pub indicator_name: String,
    /// Indicator unit
    pub unit: String,
    /// Rows ordered by year
    pub data: Vec<SeriesPoint>,
}

/// Fetch the raw series for display
///
/// # Errors
///
/// Returns a `DataAccess` failure when the accessor fails
pub fn timeseries(
    accessor: &dyn SeriesAccessor,
    city_id: CityId,
    indicator_id: IndicatorId,
    range: YearRange,
) -> AnalysisResult<TimeSeriesView> {
    let labels = resolve_labels(accessor, city_id, indicator_id);
    let data = accessor
        .fetch_series(city_id, indicator_id, range)
        .map_err(|e| AnalysisFailure::new(labels.clone(), AnalysisError::from(e)))?;

    Ok(TimeSeriesView {
        city_id,
        city_name: labels.city,
        indicator_id,
        indicator_name: labels.indicator,
        unit: labels.unit,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observed_series_drops_missing_values_in_order() {
        let points = [
            SeriesPoint::present(2018, 10.0),
            SeriesPoint::missing(2019),
            SeriesPoint::present(2020, 0.0),
            SeriesPoint::present(2021, f64::NAN),
        ];
        let observed = ObservedSeries::from_points(&points);

        assert_eq!(observed.years, vec![2018, 2020]);
        assert_eq!(observed.values, vec![10.0, 0.0]);
        assert_eq!(observed.value_at(2020), Some(0.0));
        assert_eq!(observed.value_at(2019), None);
    }
}
