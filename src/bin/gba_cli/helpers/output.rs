// ABOUTME: Output formatting and argument parsing helpers for gba-cli
// ABOUTME: Prints JSON payloads to stdout and parses name=factor scenario arguments
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

use std::io::{self, Write};

use anyhow::Result;

/// Write a payload to stdout, compact or pretty
pub fn print_json(payload: &serde_json::Value, pretty: bool) -> Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(payload)?
    } else {
        serde_json::to_string(payload)?
    };

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{rendered}")?;
    stdout.flush()?;
    Ok(())
}

/// Parse `name=factor`, where factor is a percentage such as `10` or `-5.5`
pub fn parse_scenario(raw: &str) -> Result<(String, f64), String> {
    let (name, factor) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected name=factor, got '{raw}'"))?;

    let name = name.trim();
    if name.is_empty() {
        return Err("scenario name must not be empty".to_owned());
    }

    let factor: f64 = factor
        .trim()
        .parse()
        .map_err(|_| format!("growth factor for '{name}' must be a number, got '{factor}'"))?;

    Ok((name.to_owned(), factor))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scenario() {
        assert_eq!(
            parse_scenario("optimistic=10").unwrap(),
            ("optimistic".to_owned(), 10.0)
        );
        assert_eq!(
            parse_scenario(" pessimistic = -5.5 ").unwrap(),
            ("pessimistic".to_owned(), -5.5)
        );
        assert!(parse_scenario("no-separator").is_err());
        assert!(parse_scenario("=3").is_err());
        assert!(parse_scenario("flat=abc").is_err());
    }
}
