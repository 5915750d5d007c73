// ABOUTME: Main library entry point for the GBA Insight analysis backend
// ABOUTME: Wires configuration, logging, the in-memory series store and async analysis services
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # GBA Insight
//!
//! Application layer of the regional economic indicator dashboard backend.
//! The numeric work lives in [`gba_intelligence`]; this crate supplies
//! everything around it:
//!
//! - **Config**: environment-driven settings and engine overrides
//! - **Logging**: structured `tracing` output in json, pretty or compact form
//! - **Store**: a [`SeriesAccessor`](gba_intelligence::SeriesAccessor) backed by a JSON dataset
//! - **Services**: async entry points that run the engine on tokio's blocking pool
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use gba_insight::config::environment::InsightConfig;
//! use gba_insight::services::{IntoPayload, PredictionService};
//! use gba_insight::store::MemorySeriesStore;
//! use gba_insight::models::ForecastModel;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = InsightConfig::from_env()?;
//!     let store = MemorySeriesStore::from_json_file("data/sample_dataset.json")?;
//!     let prediction = PredictionService::new(Arc::new(store), config.intelligence);
//!
//!     let request = prediction.request(1, 1, ForecastModel::Ensemble, Some(5), None);
//!     let forecast = prediction.predict(request).await?;
//!     println!("{}", serde_json::to_string_pretty(&forecast.into_payload()?)?);
//!     Ok(())
//! }
//! ```

/// Environment configuration
pub mod config;

/// Unified error handling re-exported from the core crate
pub mod errors;

/// Structured logging setup
pub mod logging;

/// Async request services over the analysis engine
pub mod services;

/// Series Accessor implementations
pub mod store;

pub use gba_core::constants;
pub use gba_core::models;
