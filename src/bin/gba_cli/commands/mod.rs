// ABOUTME: Command dispatch for gba-cli
// ABOUTME: Builds the services over the loaded dataset and maps each subcommand to one request
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use gba_insight::config::environment::InsightConfig;
use gba_insight::errors::{AnalysisResult, AppResult};
use gba_insight::models::{
    CityComparisonRequest, CorrelationRequest, RankingHistoryRequest, TrendAnalysisRequest,
};
use gba_insight::services::{AnalysisService, IntoPayload, PredictionService};
use gba_insight::store::MemorySeriesStore;
use serde::Serialize;
use serde_json::json;

use crate::Command;

/// Payload printed for one command
pub struct CommandOutput {
    pub payload: serde_json::Value,
    pub is_failure: bool,
}

impl CommandOutput {
    fn from_result<T: Serialize>(result: AnalysisResult<T>) -> AppResult<Self> {
        let is_failure = result.is_err();
        Ok(Self {
            payload: result.into_payload()?,
            is_failure,
        })
    }
}

/// Services over one loaded dataset
pub struct CommandContext {
    store: Arc<MemorySeriesStore>,
    analysis: AnalysisService,
    prediction: PredictionService,
}

impl CommandContext {
    /// Load the dataset and build the services
    pub fn load(dataset: &Path, config: &InsightConfig) -> AppResult<Self> {
        let store = Arc::new(MemorySeriesStore::from_json_file(dataset)?);
        Ok(Self {
            analysis: AnalysisService::new(store.clone()),
            prediction: PredictionService::new(store.clone(), config.intelligence.clone()),
            store,
        })
    }

    /// Run one subcommand
    pub async fn execute(&self, command: Command) -> AppResult<CommandOutput> {
        match command {
            Command::Catalog => Ok(CommandOutput {
                payload: json!({
                    "cities": self.store.list_cities(),
                    "indicators": self.store.list_indicators(),
                }),
                is_failure: false,
            }),
            Command::Timeseries { series, range } => CommandOutput::from_result(
                self.analysis
                    .timeseries(series.city, series.indicator, range.into())
                    .await?,
            ),
            Command::Trend { series, range } => CommandOutput::from_result(
                self.analysis
                    .trend(TrendAnalysisRequest {
                        city_id: series.city,
                        indicator_id: series.indicator,
                        range: range.into(),
                    })
                    .await?,
            ),
            Command::Growth { series, year } => CommandOutput::from_result(
                self.analysis
                    .growth_rate(series.city, series.indicator, year)
                    .await?,
            ),
            Command::Correlation {
                cities,
                indicators,
                range,
            } => CommandOutput::from_result(
                self.analysis
                    .correlation(CorrelationRequest {
                        city_ids: cities,
                        indicator_ids: indicators,
                        range: range.into(),
                    })
                    .await?,
            ),
            Command::Compare {
                cities,
                indicators,
                range,
            } => CommandOutput::from_result(
                self.analysis
                    .compare_cities(CityComparisonRequest {
                        cities,
                        indicators,
                        range: range.into(),
                    })
                    .await?,
            ),
            Command::Ranking { indicator, year } => {
                CommandOutput::from_result(self.analysis.rank(indicator, year).await?)
            }
            Command::RankingHistory {
                indicator,
                start_year,
                end_year,
            } => CommandOutput::from_result(
                self.analysis
                    .ranking_history(RankingHistoryRequest {
                        indicator_id: indicator,
                        start_year,
                        end_year,
                    })
                    .await?,
            ),
            Command::Summary { year } => {
                CommandOutput::from_result(self.analysis.regional_summary(year).await?)
            }
            Command::Predict {
                series,
                model,
                years,
                confidence,
            } => {
                let request =
                    self.prediction
                        .request(series.city, series.indicator, model, years, confidence);
                CommandOutput::from_result(self.prediction.predict(request).await?)
            }
            Command::Simulate {
                series,
                scenarios,
                years,
            } => {
                let scenarios: BTreeMap<String, f64> = scenarios.into_iter().collect();
                let request =
                    self.prediction
                        .scenario_request(series.city, series.indicator, scenarios, years);
                CommandOutput::from_result(self.prediction.simulate(request).await?)
            }
        }
    }
}
