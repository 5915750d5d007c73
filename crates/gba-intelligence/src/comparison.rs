// ABOUTME: Side-by-side indicator statistics for several cities and the regional yearly summary
// ABOUTME: Aggregates present values into averages, extremes, latest value and overall growth
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeMap;

use gba_core::constants::analysis::VALUE_DECIMALS;
use gba_core::constants::indicator_codes;
use gba_core::errors::AppResult;
use gba_core::models::{CityComparisonRequest, CityId, IndicatorId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::accessor::{ObservedSeries, SeriesAccessor};
use crate::errors::{AnalysisError, AnalysisFailure, AnalysisResult};
use crate::statistical_analysis::{round_to, StatisticalAnalyzer};

/// One city's values and summary statistics for one indicator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityComparison {
    /// City identifier
    pub city_id: CityId,
    /// City display name
    pub city_name: String,
    /// Every row in range, missing values kept as null
    pub values: BTreeMap<i32, Option<f64>>,
    /// Mean of present values, 2 decimals
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_value: Option<f64>,
    /// Smallest present value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    /// Largest present value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    /// Present value of the latest year
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_value: Option<f64>,
    /// Percent change first to last present value, 2 decimals
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub growth_rate: Option<f64>,
}

/// All compared cities for one indicator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorComparison {
    /// Indicator identifier
    pub indicator_id: IndicatorId,
    /// Indicator display name
    pub indicator_name: String,
    /// Indicator unit
    pub unit: String,
    /// One entry per known city, in request order
    pub cities: Vec<CityComparison>,
}

/// Regional totals for one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalSummary {
    /// Summarized year
    pub year: i32,
    /// Sum of GDP across cities
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_gdp: Option<f64>,
    /// Sum of population across cities
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_population: Option<f64>,
    /// Sum of total trade across cities
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_trade: Option<f64>,
}

/// Multi-city comparisons and regional aggregates
pub struct ComparisonAnalyzer;

impl ComparisonAnalyzer {
    /// Compare cities indicator by indicator; unknown ids are skipped
    ///
    /// # Errors
    ///
    /// Returns `DataAccess` when the accessor fails
    pub fn compare_cities(
        accessor: &dyn SeriesAccessor,
        request: &CityComparisonRequest,
    ) -> AnalysisResult<Vec<IndicatorComparison>> {
        Self::build_comparison(accessor, request)
            .map_err(|e| AnalysisFailure::unlabeled(AnalysisError::from(e)))
    }

    fn build_comparison(
        accessor: &dyn SeriesAccessor,
        request: &CityComparisonRequest,
    ) -> AppResult<Vec<IndicatorComparison>> {
        let mut results = Vec::with_capacity(request.indicators.len());

        for &indicator_id in &request.indicators {
            let Some(indicator) = accessor.lookup_indicator(indicator_id)? else {
                debug!(indicator_id, "Skipping unknown indicator in comparison");
                continue;
            };

            let mut cities = Vec::with_capacity(request.cities.len());
            for &city_id in &request.cities {
                let Some(city) = accessor.lookup_city(city_id)? else {
                    debug!(city_id, "Skipping unknown city in comparison");
                    continue;
                };

                let rows = accessor.fetch_series(city_id, indicator_id, request.range)?;
                let values = rows.iter().map(|p| (p.year, p.value)).collect();
                let present = ObservedSeries::from_points(&rows);

                cities.push(Self::summarize(city_id, city.city_name, values, &present));
            }

            results.push(IndicatorComparison {
                indicator_id,
                indicator_name: indicator.indicator_name,
                unit: indicator.unit.unwrap_or_default(),
                cities,
            });
        }

        Ok(results)
    }

    fn summarize(
        city_id: CityId,
        city_name: String,
        values: BTreeMap<i32, Option<f64>>,
        present: &ObservedSeries,
    ) -> CityComparison {
        let data = &present.values;
        let growth_rate = if data.len() >= 2 {
            data.first()
                .zip(data.last())
                .and_then(|(&first, &last)| StatisticalAnalyzer::percent_change(first, last))
                .map(|rate| round_to(rate, VALUE_DECIMALS))
        } else {
            None
        };

        CityComparison {
            city_id,
            city_name,
            values,
            avg_value: StatisticalAnalyzer::mean(data).map(|avg| round_to(avg, VALUE_DECIMALS)),
            min_value: data.iter().copied().reduce(f64::min),
            max_value: data.iter().copied().reduce(f64::max),
            latest_value: data.last().copied(),
            growth_rate,
        }
    }

    /// Regional totals of GDP, population and trade for `year`
    ///
    /// A total is absent when its indicator code is not in the catalog.
    ///
    /// # Errors
    ///
    /// Returns `DataAccess` when the accessor fails
    pub fn regional_summary(
        accessor: &dyn SeriesAccessor,
        year: i32,
    ) -> AnalysisResult<RegionalSummary> {
        Self::build_summary(accessor, year)
            .map_err(|e| AnalysisFailure::unlabeled(AnalysisError::from(e)).with_year(year))
    }

    fn build_summary(accessor: &dyn SeriesAccessor, year: i32) -> AppResult<RegionalSummary> {
        Ok(RegionalSummary {
            year,
            total_gdp: Self::regional_total(accessor, indicator_codes::GDP, year)?,
            total_population: Self::regional_total(accessor, indicator_codes::POPULATION, year)?,
            total_trade: Self::regional_total(accessor, indicator_codes::TOTAL_TRADE, year)?,
        })
    }

    fn regional_total(
        accessor: &dyn SeriesAccessor,
        code: &str,
        year: i32,
    ) -> AppResult<Option<f64>> {
        let Some(indicator) = accessor.find_indicator_by_code(code)? else {
            debug!(code, "Indicator code not in catalog, omitting total");
            return Ok(None);
        };
        let rows = accessor.rank_cities(indicator.indicator_id, year)?;
        Ok(Some(
            rows.iter()
                .filter_map(|row| row.value.filter(|v| v.is_finite()))
                .fold(0.0, |total, value| total + value),
        ))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_statistics_use_present_values_only() {
        let values = BTreeMap::from([(2019, Some(100.0)), (2020, None), (2021, Some(130.0))]);
        let present = ObservedSeries::new(vec![2019, 2021], vec![100.0, 130.0]);

        let summary = ComparisonAnalyzer::summarize(1, "A".into(), values, &present);
        assert_eq!(summary.avg_value, Some(115.0));
        assert_eq!(summary.min_value, Some(100.0));
        assert_eq!(summary.max_value, Some(130.0));
        assert_eq!(summary.latest_value, Some(130.0));
        assert_eq!(summary.growth_rate, Some(30.0));
    }

    #[test]
    fn test_no_present_values_leaves_statistics_absent() {
        let values = BTreeMap::from([(2020, None)]);
        let summary =
            ComparisonAnalyzer::summarize(1, "A".into(), values, &ObservedSeries::default());

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("avg_value").is_none());
        assert!(json.get("growth_rate").is_none());
        assert!(json["values"]["2020"].is_null());
    }
}
