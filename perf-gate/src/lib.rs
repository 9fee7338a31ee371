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

//! # perf-gate
//!
//! `perf-gate` is a performance-regression gate for CI. Performance tests print
//! markers such as
//!
//! ```text
//! PERF_V2 metric=core.hoststate.join_ms p50=1.250 p95=3.500 unit=ms
//! ```
//!
//! into their result files. The gate scans those files, keeps the worst p50/p95 per
//! metric, compares them against a budget declaration and renders a markdown report.
//!
//! The pipeline is linear and single-threaded:
//!
//! 1. [`marker::MarkerExtractor`] yields [`marker::Observation`]s from raw text.
//! 2. [`aggregate::MetricAggregator`] reduces duplicates to a worst-case pair.
//! 3. [`evaluate::evaluate`] classifies each budgeted metric as ok, regression or missing.
//! 4. [`report::render_report`] produces the markdown document.
//!
//! [`run_gate`] wires these together with result discovery and report writing.
//!
//! ```
//! use perf_gate::aggregate::MetricAggregator;
//! use perf_gate::budget::BudgetTable;
//! use perf_gate::evaluate::{evaluate, MetricStatus};
//! use perf_gate::marker::MarkerExtractor;
//!
//! let budget = BudgetTable::parse(
//!     r#"{"metrics": {"latency_ms": {"p50_max": 10.0, "p95_max": 20.0}}}"#,
//! )
//! .unwrap();
//!
//! let extractor = MarkerExtractor::new();
//! let aggregator: MetricAggregator = extractor
//!     .extract("PERF_V2 metric=latency_ms p50=12,0 p95=19.0", "TEST-a.xml")
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//!
//! let evaluation = evaluate(&aggregator.into_metrics(), &budget);
//! assert_eq!(evaluation.rows[0].status, MetricStatus::Regression);
//! assert_eq!(evaluation.errors.len(), 1);
//! ```
//!
//! ## Logging
//!
//! Library code emits `tracing` events tagged with names from [`observability::events`]
//! and never installs a subscriber; the binary does that at process start.

pub mod aggregate;
pub mod budget;
pub mod discovery;
pub mod error;
pub mod evaluate;
mod gate;
pub mod marker;
pub mod observability;
pub mod report;

pub use error::{GateError, MarkerParseError, EXIT_INDETERMINATE};
pub use gate::{
    collect_metrics, run_gate, scan_result_file, GateInput, GateOutcome, DEFAULT_REPORT_PATH,
    EXIT_FAILED, EXIT_PASSED,
};
