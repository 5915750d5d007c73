// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Handles environment variables, deployment modes and engine overrides
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Environment-based configuration

use crate::constants::{defaults, env_config};
use anyhow::{Context, Result};
use gba_intelligence::config::IntelligenceConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;
use tracing::info;

/// Deployment environment
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    /// Local development
    #[default]
    Development,
    /// Production deployment
    Production,
    /// Automated tests
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
            Self::Testing => write!(f, "testing"),
        }
    }
}

/// Application configuration loaded from the environment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsightConfig {
    /// Dataset backing the in-memory store, if configured
    pub dataset_path: Option<PathBuf>,
    /// Engine forecast defaults
    pub intelligence: IntelligenceConfig,
    /// Size of tokio's blocking pool
    pub max_blocking_threads: usize,
    /// Deployment environment
    pub environment: Environment,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            dataset_path: None,
            intelligence: IntelligenceConfig::default(),
            max_blocking_threads: defaults::MAX_BLOCKING_THREADS,
            environment: Environment::default(),
        }
    }
}

impl InsightConfig {
    /// Load configuration from environment variables
    ///
    /// Absent variables fall back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error when a variable is set but cannot be parsed, or when the
    /// resulting engine configuration is invalid
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let engine_defaults = IntelligenceConfig::default();

        let intelligence = IntelligenceConfig {
            default_prediction_years: env_var_or(
                env_config::DEFAULT_PREDICTION_YEARS,
                &engine_defaults.default_prediction_years.to_string(),
            )
            .parse()
            .with_context(|| format!("Invalid {} value", env_config::DEFAULT_PREDICTION_YEARS))?,
            default_confidence_level: env_var_or(
                env_config::DEFAULT_CONFIDENCE_LEVEL,
                &engine_defaults.default_confidence_level.to_string(),
            )
            .parse()
            .with_context(|| format!("Invalid {} value", env_config::DEFAULT_CONFIDENCE_LEVEL))?,
            ..engine_defaults
        };
        intelligence
            .validate()
            .context("Invalid forecast defaults")?;

        let max_blocking_threads: usize = env_var_or(
            env_config::MAX_BLOCKING_THREADS,
            &defaults::MAX_BLOCKING_THREADS.to_string(),
        )
        .parse()
        .with_context(|| format!("Invalid {} value", env_config::MAX_BLOCKING_THREADS))?;
        if max_blocking_threads == 0 {
            anyhow::bail!("{} must be at least 1", env_config::MAX_BLOCKING_THREADS);
        }

        let dataset_path = env::var(env_config::DATASET_PATH)
            .ok()
            .filter(|path| !path.trim().is_empty())
            .map(PathBuf::from);
        if dataset_path.is_none() {
            info!(
                "{} not set, a dataset path must be supplied explicitly",
                env_config::DATASET_PATH
            );
        }

        let config = Self {
            dataset_path,
            intelligence,
            max_blocking_threads,
            environment: Environment::from_str_or_default(&env_var_or(
                env_config::ENVIRONMENT,
                "development",
            )),
        };

        config.log_summary();
        Ok(config)
    }

    /// Log the effective configuration
    pub fn log_summary(&self) {
        info!(
            environment = %self.environment,
            dataset = %self
                .dataset_path
                .as_ref()
                .map_or_else(|| "<unset>".to_owned(), |p| p.display().to_string()),
            default_prediction_years = self.intelligence.default_prediction_years,
            default_confidence_level = self.intelligence.default_confidence_level,
            max_prediction_years = self.intelligence.max_prediction_years,
            max_blocking_threads = self.max_blocking_threads,
            "Configuration loaded"
        );
    }

    /// Build a multi-threaded runtime sized by this configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the runtime cannot be created
    pub fn build_runtime(&self) -> Result<tokio::runtime::Runtime> {
        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .max_blocking_threads(self.max_blocking_threads)
            .thread_name("gba-worker")
            .build()
            .context("Failed to build tokio runtime")
    }
}

/// Read an environment variable, falling back to `default` when unset
fn env_var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_owned())
}
