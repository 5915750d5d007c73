// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides logging setup, catalog fixtures and series builders for the in-memory store
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::cast_precision_loss
)]
//! Shared test utilities for `gba_insight`
//!
//! A standard catalog of three cities and four indicators, plus helpers that
//! turn value lists into annual records.

use std::sync::{Arc, Once};

use gba_insight::models::{AnnualRecord, City, CityId, Dataset, Indicator, IndicatorId};
use gba_insight::store::MemorySeriesStore;

static INIT_LOGGER: Once = Once::new();

pub const SHENZHEN: CityId = 1;
pub const GUANGZHOU: CityId = 2;
pub const ZHUHAI: CityId = 3;

pub const GDP: IndicatorId = 1;
pub const POPULATION: IndicatorId = 2;
pub const TOTAL_TRADE: IndicatorId = 3;
pub const INVESTMENT: IndicatorId = 4;

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

pub fn city(city_id: CityId, name: &str) -> City {
    City {
        city_id,
        city_name: name.to_owned(),
        city_code: name.to_lowercase(),
        city_type: "prefecture-level city".to_owned(),
        region: Some("Greater Bay Area".to_owned()),
    }
}

pub fn indicator(indicator_id: IndicatorId, name: &str, code: &str, unit: &str) -> Indicator {
    Indicator {
        indicator_id,
        indicator_name: name.to_owned(),
        indicator_code: code.to_owned(),
        unit: Some(unit.to_owned()),
        category: None,
        description: None,
    }
}

pub fn record(city_id: CityId, indicator_id: IndicatorId, year: i32, value: Option<f64>) -> AnnualRecord {
    AnnualRecord {
        city_id,
        indicator_id,
        year,
        value,
        data_quality: None,
        data_source: None,
    }
}

/// Catalog with no yearly values
pub fn catalog() -> Dataset {
    Dataset {
        cities: vec![
            city(SHENZHEN, "Shenzhen"),
            city(GUANGZHOU, "Guangzhou"),
            city(ZHUHAI, "Zhuhai"),
        ],
        indicators: vec![
            indicator(GDP, "GDP", "gdp", "100M CNY"),
            indicator(POPULATION, "Population", "population", "10K persons"),
            indicator(TOTAL_TRADE, "Total Trade", "total_trade", "100M CNY"),
            indicator(INVESTMENT, "Fixed Asset Investment", "fixed_asset_investment", "100M CNY"),
        ],
        annual_data: Vec::new(),
    }
}

/// Builder collecting series into a dataset
#[derive(Default)]
pub struct DatasetBuilder {
    records: Vec<AnnualRecord>,
}

impl DatasetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consecutive present values starting at `first_year`
    pub fn series(mut self, city_id: CityId, indicator_id: IndicatorId, first_year: i32, values: &[f64]) -> Self {
        for (year, &value) in (first_year..).zip(values) {
            self.records
                .push(record(city_id, indicator_id, year, Some(value)));
        }
        self
    }

    /// One row, possibly null
    pub fn point(mut self, city_id: CityId, indicator_id: IndicatorId, year: i32, value: Option<f64>) -> Self {
        self.records.push(record(city_id, indicator_id, year, value));
        self
    }

    pub fn dataset(self) -> Dataset {
        Dataset {
            annual_data: self.records,
            ..catalog()
        }
    }

    pub fn store(self) -> Arc<MemorySeriesStore> {
        init_test_logging();
        Arc::new(MemorySeriesStore::from_dataset(self.dataset()).unwrap())
    }
}

/// `intercept + slope * t` for `t = 0..n`
pub fn linear_values(n: usize, intercept: f64, slope: f64) -> Vec<f64> {
    (0..n).map(|t| slope.mul_add(t as f64, intercept)).collect()
}

/// `first * ratio^t` for `t = 0..n`
pub fn geometric_values(n: usize, first: f64, ratio: f64) -> Vec<f64> {
    std::iter::successors(Some(first), |value| Some(value * ratio))
        .take(n)
        .collect()
}

/// Upward trend with a deterministic oscillation, suitable for ARIMA fitting
pub fn wavy_trend(n: usize) -> Vec<f64> {
    (0..n)
        .map(|t| {
            let t = t as f64;
            3.0f64.mul_add((1.3 * t).sin(), 5.0f64.mul_add(t, 100.0))
        })
        .collect()
}

pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}
