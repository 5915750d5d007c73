// ABOUTME: Integration tests for cross-city rankings and ranking history
// ABOUTME: Covers descending order, null exclusion, tie breaking and year-range iteration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{DatasetBuilder, GDP, GUANGZHOU, POPULATION, SHENZHEN, ZHUHAI};
use gba_insight::models::RankingHistoryRequest;
use gba_intelligence::RankingAggregator;

fn ranked_ids(store: &gba_insight::store::MemorySeriesStore, year: i32) -> Vec<i64> {
    RankingAggregator::rank(store, GDP, year)
        .unwrap()
        .iter()
        .map(|r| r.city_id)
        .collect()
}

#[test]
fn test_rank_orders_by_value_descending() {
    let store = DatasetBuilder::new()
        .point(SHENZHEN, GDP, 2020, Some(27_670.0))
        .point(GUANGZHOU, GDP, 2020, Some(25_019.0))
        .point(ZHUHAI, GDP, 2020, Some(3_482.0))
        .store();

    let ranking = RankingAggregator::rank(store.as_ref(), GDP, 2020).unwrap();

    assert_eq!(ranking.len(), 3);
    assert_eq!(ranking[0].rank, 1);
    assert_eq!(ranking[0].city_name, "Shenzhen");
    assert_eq!(ranking[2].rank, 3);
    assert_eq!(ranking[2].city_name, "Zhuhai");
}

#[test]
fn test_null_values_are_not_ranked() {
    let store = DatasetBuilder::new()
        .point(SHENZHEN, GDP, 2020, None)
        .point(GUANGZHOU, GDP, 2020, Some(25_019.0))
        .point(ZHUHAI, GDP, 2020, Some(3_482.0))
        .store();

    assert_eq!(ranked_ids(&store, 2020), vec![GUANGZHOU, ZHUHAI]);
}

#[test]
fn test_ties_keep_lower_city_id_first() {
    let store = DatasetBuilder::new()
        .point(ZHUHAI, GDP, 2020, Some(100.0))
        .point(GUANGZHOU, GDP, 2020, Some(100.0))
        .point(SHENZHEN, GDP, 2020, Some(50.0))
        .store();

    assert_eq!(ranked_ids(&store, 2020), vec![GUANGZHOU, ZHUHAI, SHENZHEN]);
}

#[test]
fn test_year_without_data_is_empty() {
    let store = DatasetBuilder::new()
        .point(SHENZHEN, POPULATION, 2020, Some(1_756.0))
        .store();

    assert!(ranked_ids(&store, 2020).is_empty());
}

#[test]
fn test_history_covers_every_year_inclusive() {
    let store = DatasetBuilder::new()
        .series(SHENZHEN, GDP, 2018, &[10.0, 30.0, 50.0])
        .series(GUANGZHOU, GDP, 2018, &[20.0, 25.0, 40.0])
        .store();

    let history = RankingAggregator::history(
        store.as_ref(),
        &RankingHistoryRequest {
            indicator_id: GDP,
            start_year: 2018,
            end_year: 2021,
        },
    )
    .unwrap();

    let years: Vec<i32> = history.keys().copied().collect();
    assert_eq!(years, vec![2018, 2019, 2020, 2021]);
    assert_eq!(history[&2018][0].city_id, GUANGZHOU);
    assert_eq!(history[&2019][0].city_id, SHENZHEN);
    assert!(history[&2021].is_empty());
}

#[test]
fn test_inverted_history_range_is_empty() {
    let store = DatasetBuilder::new()
        .series(SHENZHEN, GDP, 2018, &[10.0])
        .store();

    let history = RankingAggregator::history(
        store.as_ref(),
        &RankingHistoryRequest {
            indicator_id: GDP,
            start_year: 2022,
            end_year: 2018,
        },
    )
    .unwrap();

    assert!(history.is_empty());
}
