// ABOUTME: Analysis outcome taxonomy carried as data instead of propagated as crashes
// ABOUTME: Pairs each AnalysisError with the labels resolved before the failure for payload rendering
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Analysis error taxonomy
//!
//! Every public analysis operation returns [`AnalysisResult`]. The failure side
//! is an [`AnalysisFailure`]: the labels that were resolved before the failure
//! plus an [`AnalysisError`] describing what went wrong. Serializing a failure
//! yields the error payload callers translate into a transport-level status.

use gba_core::constants::analysis::{
    MIN_ARIMA_POINTS, MIN_LINEAR_FORECAST_POINTS, MIN_TREND_POINTS,
};
use gba_core::errors::AppError;
use serde::ser::Serializer;
use serde::Serialize;
use thiserror::Error;

use crate::accessor::SeriesLabels;
use crate::forecast::ModelType;

/// Which analysis a minimum-history requirement belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryRequirement {
    /// Linear trend fit
    Trend,
    /// Linear regression forecast
    LinearForecast,
    /// ARIMA forecast
    ArimaForecast,
}

impl HistoryRequirement {
    /// Minimum number of present points
    #[must_use]
    pub const fn minimum_points(self) -> usize {
        match self {
            Self::Trend => MIN_TREND_POINTS,
            Self::LinearForecast => MIN_LINEAR_FORECAST_POINTS,
            Self::ArimaForecast => MIN_ARIMA_POINTS,
        }
    }
}

fn shortfall_message(requirement: &HistoryRequirement, available: &usize) -> String {
    let required = requirement.minimum_points();
    match requirement {
        HistoryRequirement::Trend => format!(
            "insufficient data for trend analysis, need at least {required} points (found {available})"
        ),
        HistoryRequirement::LinearForecast => format!(
            "insufficient history, need at least {required} years (found {available})"
        ),
        HistoryRequirement::ArimaForecast => format!(
            "insufficient history, need at least {required} years for ARIMA (found {available})"
        ),
    }
}

/// Non-fatal analysis failure kinds
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    /// Fewer present points than the analysis requires
    #[error("{}", shortfall_message(.requirement, .available))]
    InsufficientHistory {
        /// Analysis whose minimum was not met
        requirement: HistoryRequirement,
        /// Present points found
        available: usize,
    },

    /// One of the two adjacent-year rows does not exist
    #[error("incomplete data: rows for {previous_year} and {year} are both required")]
    IncompleteData {
        /// Requested year
        year: i32,
        /// The year before it
        previous_year: i32,
    },

    /// A required row exists but carries no usable value
    #[error("missing data: no usable value for {year}")]
    MissingValue {
        /// Year whose value is missing
        year: i32,
    },

    /// The ARIMA estimation failed; the reason is kept for diagnostics
    #[error("ARIMA model fitting failed: {reason}")]
    ModelFitFailure {
        /// Underlying solver or numerical failure
        reason: String,
    },

    /// Both ensemble components failed
    #[error("all models failed to predict")]
    AllModelsFailed,

    /// A request parameter is outside its domain
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// The series accessor itself failed
    #[error("data access failed: {0}")]
    DataAccess(String),
}

impl AnalysisError {
    /// Stable machine-readable code
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InsufficientHistory { .. } => "insufficient_history",
            Self::IncompleteData { .. } => "incomplete_data",
            Self::MissingValue { .. } => "missing_value",
            Self::ModelFitFailure { .. } => "model_fit_failure",
            Self::AllModelsFailed => "all_models_failed",
            Self::InvalidParameter(_) => "invalid_parameter",
            Self::DataAccess(_) => "data_access",
        }
    }

    /// Shortfall for the given analysis
    #[must_use]
    pub const fn insufficient(requirement: HistoryRequirement, available: usize) -> Self {
        Self::InsufficientHistory {
            requirement,
            available,
        }
    }
}

impl From<AppError> for AnalysisError {
    fn from(error: AppError) -> Self {
        Self::DataAccess(error.message)
    }
}

/// An [`AnalysisError`] together with the context resolved before it occurred
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisFailure {
    /// City / indicator labels, empty strings when unresolved
    pub labels: SeriesLabels,
    /// Model that was running, for forecast operations
    pub model_type: Option<ModelType>,
    /// Requested year, for year-specific operations
    pub year: Option<i32>,
    /// What went wrong
    pub error: AnalysisError,
}

impl AnalysisFailure {
    /// Failure with labels only
    #[must_use]
    pub const fn new(labels: SeriesLabels, error: AnalysisError) -> Self {
        Self {
            labels,
            model_type: None,
            year: None,
            error,
        }
    }

    /// Failure without any resolved labels
    #[must_use]
    pub fn unlabeled(error: AnalysisError) -> Self {
        Self::new(SeriesLabels::default(), error)
    }

    /// Attach the model that was running
    #[must_use]
    pub const fn with_model(mut self, model_type: ModelType) -> Self {
        self.model_type = Some(model_type);
        self
    }

    /// Attach the requested year
    #[must_use]
    pub const fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    /// Machine-readable code of the underlying error
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        self.error.kind()
    }
}

#[derive(Serialize)]
struct FailurePayload<'a> {
    city: &'a str,
    indicator: &'a str,
    #[serde(skip_serializing_if = "str::is_empty")]
    unit: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model_type: Option<ModelType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    year: Option<i32>,
    error: String,
    error_kind: &'static str,
}

impl Serialize for AnalysisFailure {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        FailurePayload {
            city: &self.labels.city,
            indicator: &self.labels.indicator,
            unit: &self.labels.unit,
            model_type: self.model_type,
            year: self.year,
            error: self.error.to_string(),
            error_kind: self.error.kind(),
        }
        .serialize(serializer)
    }
}

/// Result of every public analysis operation
pub type AnalysisResult<T> = Result<T, AnalysisFailure>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_shortfall_messages_name_the_minimum() {
        let linear = AnalysisError::insufficient(HistoryRequirement::LinearForecast, 4);
        assert_eq!(
            linear.to_string(),
            "insufficient history, need at least 5 years (found 4)"
        );

        let arima = AnalysisError::insufficient(HistoryRequirement::ArimaForecast, 9);
        assert!(arima.to_string().contains("10 years for ARIMA"));
    }

    #[test]
    fn test_failure_payload_carries_labels_and_error() {
        let labels = SeriesLabels {
            city: "Shenzhen".into(),
            indicator: "GDP".into(),
            unit: String::new(),
        };
        let failure = AnalysisFailure::new(labels, AnalysisError::AllModelsFailed)
            .with_model(ModelType::Ensemble);

        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["city"], "Shenzhen");
        assert_eq!(json["model_type"], "ensemble");
        assert_eq!(json["error"], "all models failed to predict");
        assert_eq!(json["error_kind"], "all_models_failed");
        assert!(json.get("unit").is_none());
        assert!(json.get("year").is_none());
    }
}
