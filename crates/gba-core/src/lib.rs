// ABOUTME: Core types and constants for the GBA Insight regional indicator platform
// ABOUTME: Foundation crate with error handling, reference models, request types and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # GBA Core
//!
//! Foundation crate providing shared types and constants for the GBA Insight
//! platform. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode` and `AppResult`
//! - **constants**: Application-wide constants organized by domain
//! - **models**: City / indicator reference data, annual records and request types

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants and configuration values organized by domain
pub mod constants;

/// Reference data models and request payloads
pub mod models;
