// ABOUTME: Integration tests for pairwise indicator correlation across cities
// ABOUTME: Covers year pairing, pooling, significance, strength labels and dropped pairs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{
    assert_close, DatasetBuilder, GDP, GUANGZHOU, INVESTMENT, POPULATION, SHENZHEN, TOTAL_TRADE,
};
use gba_insight::models::{CorrelationRequest, IndicatorId, YearRange};
use gba_intelligence::{CorrelationAnalyzer, CorrelationStrength};

fn request(city_ids: Vec<i64>, indicator_ids: Vec<IndicatorId>) -> CorrelationRequest {
    CorrelationRequest {
        city_ids,
        indicator_ids,
        range: YearRange::unbounded(),
    }
}

#[test]
fn test_known_coefficient_and_p_value() {
    let store = DatasetBuilder::new()
        .series(SHENZHEN, GDP, 2015, &[1.0, 2.0, 3.0, 4.0, 5.0])
        .series(SHENZHEN, TOTAL_TRADE, 2015, &[1.0, 2.0, 4.0, 3.0, 5.0])
        .store();

    let results =
        CorrelationAnalyzer::analyze(store.as_ref(), &request(vec![SHENZHEN], vec![GDP, TOTAL_TRADE]))
            .unwrap();

    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert_eq!(result.indicator_1, "GDP");
    assert_eq!(result.indicator_2, "Total Trade");
    assert_close(result.correlation, 0.9, 1e-9);
    assert_close(result.p_value, 0.0374, 1e-9);
    assert_eq!(result.strength, CorrelationStrength::Strong);
    assert_eq!(result.sample_size, 5);
}

#[test]
fn test_perfect_correlation_has_zero_p_value() {
    let gdp = [10.0, 20.0, 30.0, 40.0];
    let trade: Vec<f64> = gdp.iter().map(|v| 2.0f64.mul_add(*v, 1.0)).collect();
    let store = DatasetBuilder::new()
        .series(SHENZHEN, GDP, 2018, &gdp)
        .series(SHENZHEN, TOTAL_TRADE, 2018, &trade)
        .store();

    let results =
        CorrelationAnalyzer::analyze(store.as_ref(), &request(vec![SHENZHEN], vec![GDP, TOTAL_TRADE]))
            .unwrap();

    assert_close(results[0].correlation, 1.0, 1e-9);
    assert_close(results[0].p_value, 0.0, 1e-9);
}

#[test]
fn test_pairs_pool_across_cities_by_year() {
    let store = DatasetBuilder::new()
        .series(SHENZHEN, GDP, 2010, &[1.0, 2.0, 3.0, 4.0, 5.0])
        .series(SHENZHEN, POPULATION, 2012, &[7.0, 9.0, 8.0, 10.0, 12.0])
        .series(GUANGZHOU, GDP, 2020, &[10.0, 11.0])
        .series(GUANGZHOU, POPULATION, 2020, &[3.0, 1.0])
        .store();

    let results = CorrelationAnalyzer::analyze(
        store.as_ref(),
        &request(vec![SHENZHEN, GUANGZHOU], vec![GDP, POPULATION]),
    )
    .unwrap();

    // 2012..=2014 from Shenzhen plus 2020..=2021 from Guangzhou
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].sample_size, 5);
}

#[test]
fn test_undersized_pairs_are_omitted() {
    let store = DatasetBuilder::new()
        .series(SHENZHEN, GDP, 2018, &[1.0, 2.0])
        .series(SHENZHEN, TOTAL_TRADE, 2018, &[3.0, 5.0])
        .store();

    let results =
        CorrelationAnalyzer::analyze(store.as_ref(), &request(vec![SHENZHEN], vec![GDP, TOTAL_TRADE]))
            .unwrap();

    assert!(results.is_empty());
}

#[test]
fn test_constant_indicator_pair_is_dropped() {
    let store = DatasetBuilder::new()
        .series(SHENZHEN, GDP, 2018, &[1.0, 2.0, 3.0, 4.0])
        .series(SHENZHEN, INVESTMENT, 2018, &[5.0, 5.0, 5.0, 5.0])
        .series(SHENZHEN, TOTAL_TRADE, 2018, &[4.0, 3.0, 2.0, 1.0])
        .store();

    let results = CorrelationAnalyzer::analyze(
        store.as_ref(),
        &request(vec![SHENZHEN], vec![GDP, INVESTMENT, TOTAL_TRADE]),
    )
    .unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].indicator_1, "GDP");
    assert_eq!(results[0].indicator_2, "Total Trade");
    assert_close(results[0].correlation, -1.0, 1e-9);
    assert_eq!(results[0].strength, CorrelationStrength::Strong);
}

#[test]
fn test_pairs_follow_request_order() {
    let store = DatasetBuilder::new()
        .series(SHENZHEN, GDP, 2015, &[1.0, 2.0, 3.0, 4.0])
        .series(SHENZHEN, POPULATION, 2015, &[2.0, 1.0, 4.0, 3.0])
        .series(SHENZHEN, TOTAL_TRADE, 2015, &[1.0, 3.0, 2.0, 5.0])
        .store();

    let results = CorrelationAnalyzer::analyze(
        store.as_ref(),
        &request(vec![SHENZHEN], vec![TOTAL_TRADE, GDP, POPULATION]),
    )
    .unwrap();

    let pairs: Vec<(&str, &str)> = results
        .iter()
        .map(|r| (r.indicator_1.as_str(), r.indicator_2.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("Total Trade", "GDP"),
            ("Total Trade", "Population"),
            ("GDP", "Population"),
        ]
    );
}

#[test]
fn test_unknown_indicator_is_skipped() {
    let store = DatasetBuilder::new()
        .series(SHENZHEN, GDP, 2015, &[1.0, 2.0, 3.0])
        .store();

    let results =
        CorrelationAnalyzer::analyze(store.as_ref(), &request(vec![SHENZHEN], vec![GDP, 42]))
            .unwrap();

    assert!(results.is_empty());
}
