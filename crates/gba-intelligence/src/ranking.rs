// ABOUTME: Cross-city ranking of one indicator per year and ranking history over a year range
// ABOUTME: Orders present values descending with ties broken by ascending city identifier
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeMap;

use gba_core::models::{CityId, CityValue, IndicatorId, RankingHistoryRequest};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::accessor::{indicator_entry, SeriesAccessor, SeriesLabels};
use crate::errors::{AnalysisError, AnalysisFailure, AnalysisResult};

/// One city's position for an (indicator, year)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityRanking {
    /// 1-based position
    pub rank: usize,
    /// City identifier
    pub city_id: CityId,
    /// City display name
    pub city_name: String,
    /// Ranked value
    pub value: f64,
}

/// Ranks cities by indicator value
pub struct RankingAggregator;

impl RankingAggregator {
    /// Ranking of every city with a value for (indicator, year)
    ///
    /// # Errors
    ///
    /// Returns `DataAccess` when the accessor fails
    pub fn rank(
        accessor: &dyn SeriesAccessor,
        indicator_id: IndicatorId,
        year: i32,
    ) -> AnalysisResult<Vec<CityRanking>> {
        accessor
            .rank_cities(indicator_id, year)
            .map(Self::rank_values)
            .map_err(|e| {
                AnalysisFailure::new(indicator_labels(accessor, indicator_id), AnalysisError::from(e))
                    .with_year(year)
            })
    }

    /// Rank raw rows: missing values dropped, descending by value, then by city id
    #[must_use]
    pub fn rank_values(rows: Vec<CityValue>) -> Vec<CityRanking> {
        let mut present: Vec<(CityId, String, f64)> = rows
            .into_iter()
            .filter_map(|row| {
                row.value
                    .filter(|v| v.is_finite())
                    .map(|value| (row.city_id, row.city_name, value))
            })
            .collect();

        present.sort_by(|a, b| b.2.total_cmp(&a.2).then_with(|| a.0.cmp(&b.0)));

        present
            .into_iter()
            .enumerate()
            .map(|(idx, (city_id, city_name, value))| CityRanking {
                rank: idx + 1,
                city_id,
                city_name,
                value,
            })
            .collect()
    }

    /// Independent ranking for every year of the inclusive range
    ///
    /// An inverted range yields an empty history.
    ///
    /// # Errors
    ///
    /// Returns `DataAccess` when the accessor fails for any year
    pub fn history(
        accessor: &dyn SeriesAccessor,
        request: &RankingHistoryRequest,
    ) -> AnalysisResult<BTreeMap<i32, Vec<CityRanking>>> {
        let mut history = BTreeMap::new();
        for year in request.start_year..=request.end_year {
            let ranking = Self::rank(accessor, request.indicator_id, year)?;
            debug!(year, cities = ranking.len(), "Ranked year");
            history.insert(year, ranking);
        }
        Ok(history)
    }
}

fn indicator_labels(accessor: &dyn SeriesAccessor, indicator_id: IndicatorId) -> SeriesLabels {
    indicator_entry(accessor, indicator_id)
        .map(|entry| SeriesLabels {
            city: String::new(),
            indicator: entry.indicator_name,
            unit: entry.unit.unwrap_or_default(),
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(city_id: CityId, name: &str, value: Option<f64>) -> CityValue {
        CityValue {
            city_id,
            city_name: name.into(),
            value,
        }
    }

    #[test]
    fn test_missing_values_are_excluded() {
        let ranking = RankingAggregator::rank_values(vec![
            row(1, "A", Some(300.0)),
            row(2, "B", Some(500.0)),
            row(3, "C", None),
        ]);

        let names: Vec<_> = ranking.iter().map(|r| (r.rank, r.city_name.as_str())).collect();
        assert_eq!(names, vec![(1, "B"), (2, "A")]);
    }

    #[test]
    fn test_ties_break_by_city_id() {
        let ranking = RankingAggregator::rank_values(vec![
            row(9, "Late", Some(10.0)),
            row(4, "Early", Some(10.0)),
            row(5, "Top", Some(20.0)),
        ]);

        let ids: Vec<_> = ranking.iter().map(|r| r.city_id).collect();
        assert_eq!(ids, vec![5, 4, 9]);
    }
}
