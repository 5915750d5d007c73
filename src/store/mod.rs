// ABOUTME: Series Accessor implementations backing the analysis engine
// ABOUTME: Currently an in-memory store loaded from a JSON dataset file
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

/// In-memory store loaded from a JSON dataset
pub mod memory;

pub use memory::MemorySeriesStore;
