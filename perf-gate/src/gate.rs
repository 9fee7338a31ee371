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

//! End-to-end gate run: budget, discovery, extraction, aggregation, evaluation, report.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::aggregate::{AggregatedMetric, MetricAggregator};
use crate::budget::load_budget;
use crate::discovery::DiscoveryPolicy;
use crate::error::GateError;
use crate::evaluate::{evaluate, Evaluation};
use crate::marker::{decode_permissive, MarkerExtractor};
use crate::observability::{events, fields};
use crate::report::{render_report, write_report, ReportContext, Verdict};

const COMPONENT: &str = "gate";

pub const EXIT_PASSED: u8 = 0;
pub const EXIT_FAILED: u8 = 1;

pub const DEFAULT_REPORT_PATH: &str = "build/reports/performance/perf-v2-report.md";

#[derive(Clone, Debug)]
pub struct GateInput {
    pub baseline: PathBuf,
    pub results_root: PathBuf,
    pub report_path: PathBuf,
    pub policy: DiscoveryPolicy,
}

impl GateInput {
    /// Input using the default discovery patterns. The default report path is relative
    /// and so resolves against the working directory, not `results_root`.
    pub fn new(baseline: impl Into<PathBuf>, results_root: impl Into<PathBuf>) -> Self {
        Self {
            baseline: baseline.into(),
            results_root: results_root.into(),
            report_path: PathBuf::from(DEFAULT_REPORT_PATH),
            policy: DiscoveryPolicy::default(),
        }
    }
}

/// A completed evaluation. Fatal conditions are reported as [`GateError`] instead.
#[derive(Clone, Debug)]
pub struct GateOutcome {
    pub context: ReportContext,
    pub result_files: Vec<PathBuf>,
    pub observed: BTreeMap<String, AggregatedMetric>,
    pub evaluation: Evaluation,
    pub report: String,
    pub report_path: PathBuf,
}

impl GateOutcome {
    pub fn verdict(&self) -> Verdict {
        Verdict::of(&self.evaluation)
    }

    pub fn exit_code(&self) -> u8 {
        match self.verdict() {
            Verdict::Passed => EXIT_PASSED,
            Verdict::Failed => EXIT_FAILED,
        }
    }
}

pub fn run_gate(input: &GateInput) -> Result<GateOutcome, GateError> {
    let budget = load_budget(&input.baseline)?;

    let result_files = input.policy.discover(&input.results_root)?;
    if result_files.is_empty() {
        return Err(GateError::NoResultFiles {
            root: input.results_root.clone(),
        });
    }

    let aggregator = collect_metrics(&result_files)?;
    if aggregator.is_empty() {
        return Err(GateError::NoObservations {
            file_count: result_files.len(),
        });
    }
    let observed = aggregator.into_metrics();

    let evaluation = evaluate(&observed, &budget);
    let context = ReportContext {
        baseline: fields::format_path(&input.baseline),
        results_files: result_files.len(),
    };
    let report = render_report(&context, &evaluation);
    write_report(&report, &input.report_path)?;

    let outcome = GateOutcome {
        context,
        result_files,
        observed,
        evaluation,
        report,
        report_path: input.report_path.clone(),
    };

    info!(
        event = events::GATE_VERDICT,
        component = COMPONENT,
        verdict = outcome.verdict().as_label(),
        count = outcome.evaluation.errors.len(),
        "performance gate finished"
    );
    Ok(outcome)
}

/// Scans every file in order and folds its markers into one aggregate.
pub fn collect_metrics(result_files: &[PathBuf]) -> Result<MetricAggregator, GateError> {
    let extractor = MarkerExtractor::new();
    let mut aggregator = MetricAggregator::new();
    for path in result_files {
        scan_result_file(path, &extractor, &mut aggregator)?;
    }
    Ok(aggregator)
}

/// Reads one result file and records its markers. Returns how many markers it held.
pub fn scan_result_file(
    path: &Path,
    extractor: &MarkerExtractor,
    aggregator: &mut MetricAggregator,
) -> Result<usize, GateError> {
    let bytes = fs::read(path).map_err(|source| GateError::ResultRead {
        path: path.to_path_buf(),
        source,
    })?;

    let (text, dropped) = decode_permissive(&bytes);
    let source_label = fields::format_path(path);
    if dropped > 0 {
        warn!(
            event = events::RESULT_FILE_UNDECODABLE_BYTES,
            component = COMPONENT,
            path = source_label.as_str(),
            count = dropped,
            "ignored undecodable bytes"
        );
    }

    let mut markers = 0;
    for observation in extractor.extract(&text, &source_label) {
        let observation = observation.map_err(|source| GateError::Marker {
            path: path.to_path_buf(),
            source,
        })?;
        aggregator.record(observation);
        markers += 1;
    }

    debug!(
        event = events::RESULT_FILE_SCANNED,
        component = COMPONENT,
        path = source_label.as_str(),
        count = markers,
        "scanned result file"
    );
    Ok(markers)
}
