// ABOUTME: Reference data models for cities, indicators and yearly indicator values
// ABOUTME: Shared between the in-memory store, the analysis engine and the CLI
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Core data models

/// Request payloads accepted by the analysis and prediction services
pub mod requests;

pub use requests::{
    CityComparisonRequest, CorrelationRequest, ForecastModel, PredictionRequest,
    RankingHistoryRequest, ScenarioRequest, TrendAnalysisRequest,
};

use serde::{Deserialize, Serialize};

/// Identifier of a city in the catalog
pub type CityId = i64;

/// Identifier of an indicator in the catalog
pub type IndicatorId = i64;

/// A city in the reference catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    /// Catalog identifier
    pub city_id: CityId,
    /// Display name
    pub city_name: String,
    /// Short code (e.g. `shenzhen`)
    pub city_code: String,
    /// Administrative type (e.g. municipality, SAR)
    pub city_type: String,
    /// Optional region grouping
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

/// An economic indicator in the reference catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indicator {
    /// Catalog identifier
    pub indicator_id: IndicatorId,
    /// Display name
    pub indicator_name: String,
    /// Short code (e.g. `gdp`)
    pub indicator_code: String,
    /// Unit of measure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Grouping category
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Free-form description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// One yearly value of one indicator for one city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualRecord {
    /// City the value belongs to
    pub city_id: CityId,
    /// Indicator the value measures
    pub indicator_id: IndicatorId,
    /// Calendar year
    pub year: i32,
    /// Observed value; `None` when the row exists but the value was not reported
    #[serde(default)]
    pub value: Option<f64>,
    /// Quality flag from the source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_quality: Option<String>,
    /// Source attribution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_source: Option<String>,
}

/// A (year, value) pair as returned by the data layer; the value may be absent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    /// Calendar year
    pub year: i32,
    /// Value, absent when not reported
    pub value: Option<f64>,
}

impl SeriesPoint {
    /// Create a point with a present value
    #[must_use]
    pub const fn present(year: i32, value: f64) -> Self {
        Self {
            year,
            value: Some(value),
        }
    }

    /// Create a point whose value is missing
    #[must_use]
    pub const fn missing(year: i32) -> Self {
        Self { year, value: None }
    }
}

/// A city's value for one (indicator, year), as returned by the ranking query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityValue {
    /// City identifier
    pub city_id: CityId,
    /// City display name
    pub city_name: String,
    /// Value, absent when not reported
    pub value: Option<f64>,
}

/// Inclusive, optionally open year bounds
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearRange {
    /// First year included, unbounded when `None`
    #[serde(default)]
    pub start_year: Option<i32>,
    /// Last year included, unbounded when `None`
    #[serde(default)]
    pub end_year: Option<i32>,
}

impl YearRange {
    /// Range with no bounds
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            start_year: None,
            end_year: None,
        }
    }

    /// Range between two optional bounds
    #[must_use]
    pub const fn new(start_year: Option<i32>, end_year: Option<i32>) -> Self {
        Self {
            start_year,
            end_year,
        }
    }

    /// Whether `year` falls inside the range
    #[must_use]
    pub fn contains(&self, year: i32) -> bool {
        self.start_year.is_none_or(|start| year >= start)
            && self.end_year.is_none_or(|end| year <= end)
    }
}

/// The JSON dataset format consumed by the in-memory store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    /// City catalog
    #[serde(default)]
    pub cities: Vec<City>,
    /// Indicator catalog
    #[serde(default)]
    pub indicators: Vec<Indicator>,
    /// Yearly values
    #[serde(default)]
    pub annual_data: Vec<AnnualRecord>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_year_range_bounds_are_inclusive() {
        let range = YearRange::new(Some(2010), Some(2012));
        assert!(!range.contains(2009));
        assert!(range.contains(2010));
        assert!(range.contains(2012));
        assert!(!range.contains(2013));
        assert!(YearRange::unbounded().contains(1900));
    }

    #[test]
    fn test_annual_record_value_defaults_to_missing() {
        let record: AnnualRecord =
            serde_json::from_str(r#"{"city_id":1,"indicator_id":2,"year":2020}"#).unwrap();
        assert_eq!(record.value, None);
    }
}
