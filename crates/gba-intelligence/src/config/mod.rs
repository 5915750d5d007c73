// ABOUTME: Forecast engine configuration with defaults and validation
// ABOUTME: Defines IntelligenceConfig and the ConfigError raised when values are out of range
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Engine configuration
//!
//! Minimum-history thresholds and correlation strength cut-offs are fixed
//! constants in [`gba_core::constants::analysis`]. Only the forecast defaults
//! applied to requests that omit them are configurable here.

use gba_core::constants::forecast::{
    DEFAULT_CONFIDENCE_LEVEL, DEFAULT_PREDICTION_YEARS, MAX_PREDICTION_YEARS,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Value outside acceptable range
    #[error("Invalid range: {0}")]
    InvalidRange(&'static str),

    /// Numeric value outside valid range for parameter
    #[error("Value out of range: {0}")]
    ValueOutOfRange(&'static str),
}

/// Forecast defaults and limits
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IntelligenceConfig {
    /// Horizon applied when a request omits one
    pub default_prediction_years: usize,
    /// Confidence level applied when a request omits one
    pub default_confidence_level: f64,
    /// Largest horizon a request may ask for
    pub max_prediction_years: usize,
}

impl Default for IntelligenceConfig {
    fn default() -> Self {
        Self {
            default_prediction_years: DEFAULT_PREDICTION_YEARS,
            default_confidence_level: DEFAULT_CONFIDENCE_LEVEL,
            max_prediction_years: MAX_PREDICTION_YEARS,
        }
    }
}

impl IntelligenceConfig {
    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_prediction_years == 0 {
            return Err(ConfigError::ValueOutOfRange(
                "max_prediction_years must be > 0",
            ));
        }

        if self.default_prediction_years == 0
            || self.default_prediction_years > self.max_prediction_years
        {
            return Err(ConfigError::InvalidRange(
                "default_prediction_years must be between 1 and max_prediction_years",
            ));
        }

        if !(self.default_confidence_level > 0.0 && self.default_confidence_level < 1.0) {
            return Err(ConfigError::ValueOutOfRange(
                "default_confidence_level must be strictly between 0 and 1",
            ));
        }

        Ok(())
    }
}
