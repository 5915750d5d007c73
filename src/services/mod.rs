// ABOUTME: Async service layer running the synchronous analysis engine on tokio's blocking pool
// ABOUTME: Opens one tracing span per request and converts outcomes into JSON payloads
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Domain service layer
//!
//! Services hold a shared [`SeriesAccessor`] and expose one async method per
//! engine operation. Each call returns `AppResult<AnalysisResult<T>>`: the
//! outer error is an infrastructure failure (the blocking task died), the
//! inner one an analysis outcome that belongs in the response payload.

/// Trend, growth, correlation, comparison and ranking requests
pub mod analysis;

/// Forecast and scenario requests
pub mod prediction;

pub use analysis::AnalysisService;
pub use prediction::PredictionService;

use std::sync::Arc;
use std::time::Instant;

use gba_core::models::{CityId, IndicatorId};
use gba_intelligence::{AnalysisResult, SeriesAccessor};
use serde::Serialize;
use tokio::task;
use tracing::{field, info, info_span, Span};
use uuid::Uuid;

use crate::errors::{join_error, AppResult};

/// Identifying fields attached to a request span
#[derive(Debug, Clone, Copy)]
pub(crate) struct RequestInfo {
    pub operation: &'static str,
    pub city_id: Option<CityId>,
    pub indicator_id: Option<IndicatorId>,
}

impl RequestInfo {
    pub(crate) const fn new(operation: &'static str) -> Self {
        Self {
            operation,
            city_id: None,
            indicator_id: None,
        }
    }

    pub(crate) const fn city(mut self, city_id: CityId) -> Self {
        self.city_id = Some(city_id);
        self
    }

    pub(crate) const fn indicator(mut self, indicator_id: IndicatorId) -> Self {
        self.indicator_id = Some(indicator_id);
        self
    }

    fn span(&self, request_id: Uuid) -> Span {
        let span = info_span!(
            "request",
            request_id = %request_id,
            operation = self.operation,
            city_id = field::Empty,
            indicator_id = field::Empty,
        );
        if let Some(city_id) = self.city_id {
            span.record("city_id", city_id);
        }
        if let Some(indicator_id) = self.indicator_id {
            span.record("indicator_id", indicator_id);
        }
        span
    }
}

/// Run one engine call on the blocking pool inside a request span
pub(crate) async fn run_analysis<T, F>(
    accessor: &Arc<dyn SeriesAccessor>,
    request: RequestInfo,
    work: F,
) -> AppResult<AnalysisResult<T>>
where
    T: Send + 'static,
    F: FnOnce(&dyn SeriesAccessor) -> AnalysisResult<T> + Send + 'static,
{
    let request_id = Uuid::new_v4();
    let span = request.span(request_id);
    let accessor = Arc::clone(accessor);
    let task_span = span.clone();
    let started = Instant::now();

    let outcome = task::spawn_blocking(move || {
        let _guard = task_span.enter();
        work(accessor.as_ref())
    })
    .await
    .map_err(|e| join_error(request.operation, &e).with_request_id(request_id.to_string()))?;

    let elapsed_ms = started.elapsed().as_millis() as u64;
    span.in_scope(|| match &outcome {
        Ok(_) => info!(elapsed_ms, "Request completed"),
        Err(failure) => info!(
            elapsed_ms,
            error_kind = failure.kind(),
            error = %failure.error,
            "Request returned an analysis failure"
        ),
    });

    Ok(outcome)
}

/// Conversion of an analysis outcome into its JSON response payload
pub trait IntoPayload {
    /// Success structure, or the error payload with labels, `error` and `error_kind`
    ///
    /// # Errors
    ///
    /// Returns `SerializationError` if the payload cannot be represented as JSON
    fn into_payload(self) -> AppResult<serde_json::Value>;
}

impl<T: Serialize> IntoPayload for AnalysisResult<T> {
    fn into_payload(self) -> AppResult<serde_json::Value> {
        let value = match self {
            Ok(success) => serde_json::to_value(success)?,
            Err(failure) => serde_json::to_value(failure)?,
        };
        Ok(value)
    }
}
