// ABOUTME: Re-exports helper modules for gba-cli
// ABOUTME: Provides argument parsing and JSON output utilities
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub mod output;
