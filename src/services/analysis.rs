// ABOUTME: Analysis service exposing trend, growth, correlation, comparison and ranking requests
// ABOUTME: Each request runs the corresponding engine analyzer on the blocking pool
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeMap;
use std::sync::Arc;

use gba_core::models::{
    CityComparisonRequest, CityId, CorrelationRequest, IndicatorId, RankingHistoryRequest,
    TrendAnalysisRequest, YearRange,
};
use gba_intelligence::{
    timeseries, AnalysisResult, CityRanking, ComparisonAnalyzer, CorrelationAnalyzer,
    CorrelationResult, GrowthRateCalculator, GrowthRateResult, IndicatorComparison,
    RankingAggregator, RegionalSummary, SeriesAccessor, TimeSeriesView, TrendAnalyzer,
    TrendResult,
};

use super::{run_analysis, RequestInfo};
use crate::errors::AppResult;

/// Descriptive analytics over the shared series store
#[derive(Clone)]
pub struct AnalysisService {
    accessor: Arc<dyn SeriesAccessor>,
}

impl AnalysisService {
    /// Create a service over `accessor`
    #[must_use]
    pub fn new(accessor: Arc<dyn SeriesAccessor>) -> Self {
        Self { accessor }
    }

    /// Raw labelled series, missing values retained
    ///
    /// # Errors
    ///
    /// Returns an error if the blocking task fails
    pub async fn timeseries(
        &self,
        city_id: CityId,
        indicator_id: IndicatorId,
        range: YearRange,
    ) -> AppResult<AnalysisResult<TimeSeriesView>> {
        let request = RequestInfo::new("timeseries")
            .city(city_id)
            .indicator(indicator_id);
        run_analysis(&self.accessor, request, move |accessor| {
            timeseries(accessor, city_id, indicator_id, range)
        })
        .await
    }

    /// Linear trend of one series
    ///
    /// # Errors
    ///
    /// Returns an error if the blocking task fails
    pub async fn trend(&self, request: TrendAnalysisRequest) -> AppResult<AnalysisResult<TrendResult>> {
        let info = RequestInfo::new("trend")
            .city(request.city_id)
            .indicator(request.indicator_id);
        run_analysis(&self.accessor, info, move |accessor| {
            TrendAnalyzer::analyze(accessor, &request)
        })
        .await
    }

    /// Year-over-year growth into `year`
    ///
    /// # Errors
    ///
    /// Returns an error if the blocking task fails
    pub async fn growth_rate(
        &self,
        city_id: CityId,
        indicator_id: IndicatorId,
        year: i32,
    ) -> AppResult<AnalysisResult<GrowthRateResult>> {
        let request = RequestInfo::new("growth_rate")
            .city(city_id)
            .indicator(indicator_id);
        run_analysis(&self.accessor, request, move |accessor| {
            GrowthRateCalculator::calculate(accessor, city_id, indicator_id, year)
        })
        .await
    }

    /// Pairwise indicator correlations pooled across cities
    ///
    /// # Errors
    ///
    /// Returns an error if the blocking task fails
    pub async fn correlation(
        &self,
        request: CorrelationRequest,
    ) -> AppResult<AnalysisResult<Vec<CorrelationResult>>> {
        run_analysis(&self.accessor, RequestInfo::new("correlation"), move |accessor| {
            CorrelationAnalyzer::analyze(accessor, &request)
        })
        .await
    }

    /// Per-indicator statistics for several cities
    ///
    /// # Errors
    ///
    /// Returns an error if the blocking task fails
    pub async fn compare_cities(
        &self,
        request: CityComparisonRequest,
    ) -> AppResult<AnalysisResult<Vec<IndicatorComparison>>> {
        run_analysis(&self.accessor, RequestInfo::new("compare_cities"), move |accessor| {
            ComparisonAnalyzer::compare_cities(accessor, &request)
        })
        .await
    }

    /// Cities ranked by an indicator in one year
    ///
    /// # Errors
    ///
    /// Returns an error if the blocking task fails
    pub async fn rank(
        &self,
        indicator_id: IndicatorId,
        year: i32,
    ) -> AppResult<AnalysisResult<Vec<CityRanking>>> {
        let request = RequestInfo::new("ranking").indicator(indicator_id);
        run_analysis(&self.accessor, request, move |accessor| {
            RankingAggregator::rank(accessor, indicator_id, year)
        })
        .await
    }

    /// Rankings for every year of a range
    ///
    /// # Errors
    ///
    /// Returns an error if the blocking task fails
    pub async fn ranking_history(
        &self,
        request: RankingHistoryRequest,
    ) -> AppResult<AnalysisResult<BTreeMap<i32, Vec<CityRanking>>>> {
        let info = RequestInfo::new("ranking_history").indicator(request.indicator_id);
        run_analysis(&self.accessor, info, move |accessor| {
            RankingAggregator::history(accessor, &request)
        })
        .await
    }

    /// Regional GDP, population and trade totals for `year`
    ///
    /// # Errors
    ///
    /// Returns an error if the blocking task fails
    pub async fn regional_summary(&self, year: i32) -> AppResult<AnalysisResult<RegionalSummary>> {
        run_analysis(&self.accessor, RequestInfo::new("regional_summary"), move |accessor| {
            ComparisonAnalyzer::regional_summary(accessor, year)
        })
        .await
    }
}
