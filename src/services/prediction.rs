// ABOUTME: Prediction service dispatching forecast and scenario requests to the engine
// ABOUTME: Holds the engine configuration applied to requests that omit forecast parameters
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::collections::BTreeMap;
use std::sync::Arc;

use gba_core::models::{CityId, ForecastModel, IndicatorId, PredictionRequest, ScenarioRequest};
use gba_intelligence::{
    predict, AnalysisResult, ForecastResult, IntelligenceConfig, ScenarioResult,
    ScenarioSimulator, SeriesAccessor,
};

use super::{run_analysis, RequestInfo};
use crate::errors::AppResult;

/// Forecasting over the shared series store
#[derive(Clone)]
pub struct PredictionService {
    accessor: Arc<dyn SeriesAccessor>,
    config: Arc<IntelligenceConfig>,
}

impl PredictionService {
    /// Create a service over `accessor` with the given forecast defaults
    #[must_use]
    pub fn new(accessor: Arc<dyn SeriesAccessor>, config: IntelligenceConfig) -> Self {
        Self {
            accessor,
            config: Arc::new(config),
        }
    }

    /// Forecast defaults in effect
    #[must_use]
    pub fn config(&self) -> &IntelligenceConfig {
        &self.config
    }

    /// Build a prediction request, filling omitted parameters from the configuration
    #[must_use]
    pub fn request(
        &self,
        city_id: CityId,
        indicator_id: IndicatorId,
        model_type: ForecastModel,
        prediction_years: Option<usize>,
        confidence_level: Option<f64>,
    ) -> PredictionRequest {
        PredictionRequest {
            city_id,
            indicator_id,
            model_type,
            prediction_years: prediction_years.unwrap_or(self.config.default_prediction_years),
            confidence_level: confidence_level.unwrap_or(self.config.default_confidence_level),
        }
    }

    /// Build a scenario request, filling an omitted horizon from the configuration
    #[must_use]
    pub fn scenario_request(
        &self,
        city_id: CityId,
        indicator_id: IndicatorId,
        scenarios: BTreeMap<String, f64>,
        prediction_years: Option<usize>,
    ) -> ScenarioRequest {
        ScenarioRequest {
            city_id,
            indicator_id,
            scenarios,
            prediction_years: prediction_years.unwrap_or(self.config.default_prediction_years),
        }
    }

    /// Forecast with the requested model
    ///
    /// # Errors
    ///
    /// Returns an error if the blocking task fails
    pub async fn predict(
        &self,
        request: PredictionRequest,
    ) -> AppResult<AnalysisResult<ForecastResult>> {
        let info = RequestInfo::new(match request.model_type {
            ForecastModel::Linear => "predict_linear",
            ForecastModel::Arima => "predict_arima",
            ForecastModel::Ensemble => "predict_ensemble",
        })
        .city(request.city_id)
        .indicator(request.indicator_id);

        let config = Arc::clone(&self.config);
        run_analysis(&self.accessor, info, move |accessor| {
            predict(accessor, &request, &config)
        })
        .await
    }

    /// Linear baseline scaled by each named growth factor
    ///
    /// # Errors
    ///
    /// Returns an error if the blocking task fails
    pub async fn simulate(
        &self,
        request: ScenarioRequest,
    ) -> AppResult<AnalysisResult<ScenarioResult>> {
        let info = RequestInfo::new("simulate_scenarios")
            .city(request.city_id)
            .indicator(request.indicator_id);

        let config = Arc::clone(&self.config);
        run_analysis(&self.accessor, info, move |accessor| {
            ScenarioSimulator::simulate(accessor, &request, &config)
        })
        .await
    }
}
