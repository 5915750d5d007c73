// ABOUTME: In-memory Series Accessor holding the city/indicator catalog and yearly values
// ABOUTME: Loads and validates a JSON dataset, then answers series, point and ranking queries
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::collections::BTreeMap;
use std::path::Path;

use gba_core::models::{
    City, CityId, CityValue, Dataset, Indicator, IndicatorId, SeriesPoint, YearRange,
};
use gba_intelligence::SeriesAccessor;
use tracing::{debug, info, warn};

use crate::errors::{AppError, AppResult};

/// Yearly values of one (city, indicator) series; `None` is a reported-but-null row
type YearValues = BTreeMap<i32, Option<f64>>;

/// Read-only store built once from a [`Dataset`]
///
/// The store never changes after construction, so it is shared across
/// blocking tasks behind an `Arc` without locking.
#[derive(Debug, Clone, Default)]
pub struct MemorySeriesStore {
    cities: BTreeMap<CityId, City>,
    indicators: BTreeMap<IndicatorId, Indicator>,
    values: BTreeMap<(CityId, IndicatorId), YearValues>,
}

impl MemorySeriesStore {
    /// Build a store from an in-memory dataset
    ///
    /// A repeated (city, indicator, year) row replaces the earlier one.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` when a catalog id is duplicated or a record
    /// references an unknown city or indicator
    pub fn from_dataset(dataset: Dataset) -> AppResult<Self> {
        let mut cities = BTreeMap::new();
        for city in dataset.cities {
            let city_id = city.city_id;
            if cities.insert(city_id, city).is_some() {
                return Err(AppError::invalid_input(format!(
                    "duplicate city_id {city_id} in dataset"
                )));
            }
        }

        let mut indicators = BTreeMap::new();
        for indicator in dataset.indicators {
            let indicator_id = indicator.indicator_id;
            if indicators.insert(indicator_id, indicator).is_some() {
                return Err(AppError::invalid_input(format!(
                    "duplicate indicator_id {indicator_id} in dataset"
                )));
            }
        }

        let mut values: BTreeMap<(CityId, IndicatorId), YearValues> = BTreeMap::new();
        let record_count = dataset.annual_data.len();
        for record in dataset.annual_data {
            if !cities.contains_key(&record.city_id) {
                return Err(AppError::invalid_input(format!(
                    "annual record for {} references unknown city_id {}",
                    record.year, record.city_id
                )));
            }
            if !indicators.contains_key(&record.indicator_id) {
                return Err(AppError::invalid_input(format!(
                    "annual record for {} references unknown indicator_id {}",
                    record.year, record.indicator_id
                )));
            }

            let series = values
                .entry((record.city_id, record.indicator_id))
                .or_default();
            if series.insert(record.year, record.value).is_some() {
                warn!(
                    city_id = record.city_id,
                    indicator_id = record.indicator_id,
                    year = record.year,
                    "Duplicate annual record, keeping the later row"
                );
            }
        }

        info!(
            cities = cities.len(),
            indicators = indicators.len(),
            records = record_count,
            series = values.len(),
            "Loaded series dataset"
        );

        Ok(Self {
            cities,
            indicators,
            values,
        })
    }

    /// Read and parse a JSON dataset file
    ///
    /// # Errors
    ///
    /// Returns `StorageError` when the file cannot be read, `SerializationError`
    /// when it is not a valid dataset, and the validation errors of
    /// [`MemorySeriesStore::from_dataset`]
    pub fn from_json_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Reading dataset file");

        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::storage(format!("failed to read dataset {}", path.display()))
                .with_resource_id(path.display().to_string())
                .with_source(e)
        })?;
        let dataset: Dataset = serde_json::from_str(&contents).map_err(|e| {
            AppError::serialization(format!("invalid dataset {}", path.display()))
                .with_resource_id(path.display().to_string())
                .with_source(e)
        })?;

        Self::from_dataset(dataset)
    }

    /// All cities ordered by id
    #[must_use]
    pub fn list_cities(&self) -> Vec<City> {
        self.cities.values().cloned().collect()
    }

    /// All indicators ordered by id
    #[must_use]
    pub fn list_indicators(&self) -> Vec<Indicator> {
        self.indicators.values().cloned().collect()
    }
}

impl SeriesAccessor for MemorySeriesStore {
    fn fetch_series(
        &self,
        city_id: CityId,
        indicator_id: IndicatorId,
        range: YearRange,
    ) -> AppResult<Vec<SeriesPoint>> {
        Ok(self
            .values
            .get(&(city_id, indicator_id))
            .map(|series| {
                series
                    .iter()
                    .filter(|(year, _)| range.contains(**year))
                    .map(|(&year, &value)| SeriesPoint { year, value })
                    .collect()
            })
            .unwrap_or_default())
    }

    fn fetch_point(
        &self,
        city_id: CityId,
        indicator_id: IndicatorId,
        year: i32,
    ) -> AppResult<Option<SeriesPoint>> {
        Ok(self
            .values
            .get(&(city_id, indicator_id))
            .and_then(|series| series.get(&year))
            .map(|&value| SeriesPoint { year, value }))
    }

    fn rank_cities(&self, indicator_id: IndicatorId, year: i32) -> AppResult<Vec<CityValue>> {
        let mut rows: Vec<CityValue> = self
            .cities
            .values()
            .filter_map(|city| {
                self.values
                    .get(&(city.city_id, indicator_id))
                    .and_then(|series| series.get(&year))
                    .map(|&value| CityValue {
                        city_id: city.city_id,
                        city_name: city.city_name.clone(),
                        value,
                    })
            })
            .collect();

        // Nulls sort last
        rows.sort_by(|a, b| match (a.value, b.value) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });
        Ok(rows)
    }

    fn lookup_city(&self, city_id: CityId) -> AppResult<Option<City>> {
        Ok(self.cities.get(&city_id).cloned())
    }

    fn lookup_indicator(&self, indicator_id: IndicatorId) -> AppResult<Option<Indicator>> {
        Ok(self.indicators.get(&indicator_id).cloned())
    }

    fn find_indicator_by_code(&self, code: &str) -> AppResult<Option<Indicator>> {
        Ok(self
            .indicators
            .values()
            .find(|indicator| indicator.indicator_code == code)
            .cloned())
    }
}
