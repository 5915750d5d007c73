// ABOUTME: Integration tests for the async analysis and prediction services
// ABOUTME: Runs engine calls through the blocking pool and checks the rendered payloads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use std::collections::BTreeMap;
use std::sync::Arc;

use common::{linear_values, DatasetBuilder, GDP, GUANGZHOU, SHENZHEN, TOTAL_TRADE};
use gba_insight::models::{
    CityComparisonRequest, CorrelationRequest, ForecastModel, RankingHistoryRequest,
    TrendAnalysisRequest, YearRange,
};
use gba_insight::services::{AnalysisService, IntoPayload, PredictionService};
use gba_insight::store::MemorySeriesStore;
use gba_intelligence::{IntelligenceConfig, SeriesAccessor};

fn shared_store() -> Arc<MemorySeriesStore> {
    DatasetBuilder::new()
        .series(SHENZHEN, GDP, 2015, &linear_values(6, 100.0, 10.0))
        .series(SHENZHEN, TOTAL_TRADE, 2015, &[50.0, 52.0, 57.0, 55.0, 61.0, 66.0])
        .series(GUANGZHOU, GDP, 2015, &linear_values(6, 120.0, 8.0))
        .store()
}

fn accessor(store: Arc<MemorySeriesStore>) -> Arc<dyn SeriesAccessor> {
    store
}

#[tokio::test]
async fn test_analysis_service_round_trips_every_operation() {
    let service = AnalysisService::new(accessor(shared_store()));

    let timeseries = service
        .timeseries(SHENZHEN, GDP, YearRange::unbounded())
        .await
        .unwrap()
        .into_payload()
        .unwrap();
    assert_eq!(timeseries["city_name"], "Shenzhen");
    assert_eq!(timeseries["data"].as_array().unwrap().len(), 6);

    let trend = service
        .trend(TrendAnalysisRequest {
            city_id: SHENZHEN,
            indicator_id: GDP,
            range: YearRange::unbounded(),
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(trend.data_points, 6);

    let growth = service.growth_rate(GUANGZHOU, GDP, 2016).await.unwrap().unwrap();
    assert_eq!(growth.previous_value, 120.0);

    let correlation = service
        .correlation(CorrelationRequest {
            city_ids: vec![SHENZHEN],
            indicator_ids: vec![GDP, TOTAL_TRADE],
            range: YearRange::unbounded(),
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(correlation.len(), 1);

    let comparison = service
        .compare_cities(CityComparisonRequest {
            cities: vec![SHENZHEN, GUANGZHOU],
            indicators: vec![GDP],
            range: YearRange::unbounded(),
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(comparison[0].cities.len(), 2);

    let ranking = service.rank(GDP, 2020).await.unwrap().unwrap();
    assert_eq!(ranking[0].city_id, GUANGZHOU);

    let history = service
        .ranking_history(RankingHistoryRequest {
            indicator_id: GDP,
            start_year: 2015,
            end_year: 2016,
        })
        .await
        .unwrap()
        .unwrap();
    assert_eq!(history.len(), 2);

    let summary = service.regional_summary(2020).await.unwrap().unwrap();
    assert_eq!(summary.total_gdp, Some(310.0));
}

#[tokio::test]
async fn test_analysis_failure_stays_inside_the_payload() {
    let service = AnalysisService::new(accessor(shared_store()));

    let outcome = service.growth_rate(SHENZHEN, GDP, 2015).await.unwrap();
    let payload = outcome.into_payload().unwrap();

    assert_eq!(payload["error_kind"], "incomplete_data");
    assert_eq!(payload["year"], 2015);
    assert_eq!(payload["city"], "Shenzhen");
}

#[tokio::test]
async fn test_prediction_request_defaults_come_from_config() {
    let config = IntelligenceConfig {
        default_prediction_years: 2,
        default_confidence_level: 0.9,
        ..IntelligenceConfig::default()
    };
    let service = PredictionService::new(accessor(shared_store()), config);

    let request = service.request(SHENZHEN, GDP, ForecastModel::Linear, None, None);
    assert_eq!(request.prediction_years, 2);
    assert!((request.confidence_level - 0.9).abs() < f64::EPSILON);

    let explicit = service.request(SHENZHEN, GDP, ForecastModel::Arima, Some(7), Some(0.8));
    assert_eq!(explicit.prediction_years, 7);

    let forecast = service.predict(request).await.unwrap().unwrap();
    let years: Vec<i32> = forecast.predictions.iter().map(|p| p.year).collect();
    assert_eq!(years, vec![2021, 2022]);
}

#[tokio::test]
async fn test_prediction_service_scenarios_and_failures() {
    let service = PredictionService::new(accessor(shared_store()), IntelligenceConfig::default());

    let scenarios = BTreeMap::from([("optimistic".to_owned(), 10.0)]);
    let request = service.scenario_request(SHENZHEN, GDP, scenarios, None);
    assert_eq!(request.prediction_years, service.config().default_prediction_years);

    let simulated = service.simulate(request).await.unwrap().unwrap();
    assert_eq!(simulated.scenarios["optimistic"].len(), 3);

    // Six points is below the ARIMA minimum
    let arima = service
        .predict(service.request(SHENZHEN, GDP, ForecastModel::Arima, None, None))
        .await
        .unwrap();
    let payload = arima.into_payload().unwrap();
    assert_eq!(payload["model_type"], "arima");
    assert_eq!(payload["error_kind"], "insufficient_history");
}

#[tokio::test]
async fn test_concurrent_requests_share_the_store() {
    let service = PredictionService::new(accessor(shared_store()), IntelligenceConfig::default());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .predict(service.request(GUANGZHOU, GDP, ForecastModel::Ensemble, Some(1), None))
                    .await
                    .unwrap()
                    .unwrap()
            })
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }
    assert!(results.windows(2).all(|pair| pair[0] == pair[1]));
    assert!((results[0].predictions[0].predicted_value - 168.0).abs() < 1e-9);
}
