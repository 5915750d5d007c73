// ABOUTME: Configuration management module for the application layer
// ABOUTME: Exposes environment-driven settings layered over the engine configuration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//! Configuration module for GBA Insight
//!
//! - **Environment**: dataset location, runtime sizing and deployment mode
//! - **Intelligence**: forecast defaults, re-exported from the engine crate

/// Environment and runtime configuration
pub mod environment;

pub use environment::{Environment, InsightConfig};
pub use gba_intelligence::config::{ConfigError, IntelligenceConfig};
