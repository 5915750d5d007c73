// ABOUTME: Unified error handling for the application layer
// ABOUTME: Re-exports the core error types so callers depend on a single path
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Unified Error Handling
//!
//! Infrastructure failures (dataset loading, configuration, blocking-task
//! joins) are [`AppError`]s. Analysis outcomes travel separately as
//! [`AnalysisFailure`] inside a successful [`AppResult`].

pub use gba_core::errors::{AppError, AppResult, ErrorCode, ErrorContext};
pub use gba_intelligence::errors::{AnalysisError, AnalysisFailure, AnalysisResult};

use tokio::task::JoinError;

/// Convert a failed blocking task into an internal error
#[must_use]
pub fn join_error(operation: &str, error: &JoinError) -> AppError {
    if error.is_panic() {
        AppError::internal(format!("{operation} task panicked"))
    } else {
        AppError::internal(format!("{operation} task was cancelled"))
    }
}
