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

use perf_gate::evaluate::MetricStatus;
use perf_gate::report::{parse_verdict, Verdict};
use perf_gate::{run_gate, GateInput, EXIT_PASSED};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

#[test]
fn checked_in_fixture_tree_passes_budget() {
    let report_dir = TempDir::new().expect("tempdir");
    let report_path = report_dir.path().join("reports/perf-v2-report.md");

    let mut input = GateInput::new(
        fixture_root().join("targets-v2.json"),
        fixture_root().join("results-tree"),
    );
    input.report_path = report_path.clone();

    let outcome = run_gate(&input).expect("fixture tree should evaluate");

    assert_eq!(outcome.exit_code(), EXIT_PASSED, "{:?}", outcome.evaluation.errors);
    assert_eq!(outcome.result_files.len(), 3);
    assert_eq!(outcome.evaluation.rows.len(), 4);
    assert!(outcome
        .evaluation
        .rows
        .iter()
        .all(|row| row.status == MetricStatus::Ok));

    let written = fs::read_to_string(&report_path).expect("report should be written");
    assert_eq!(written, outcome.report);
    assert_eq!(parse_verdict(&written), Some(Verdict::Passed));
}

#[test]
fn fixture_duplicates_reduce_to_worst_case() {
    let report_dir = TempDir::new().expect("tempdir");
    let mut input = GateInput::new(
        fixture_root().join("targets-v2.json"),
        fixture_root().join("results-tree"),
    );
    input.report_path = report_dir.path().join("report.md");

    let outcome = run_gate(&input).expect("fixture tree should evaluate");
    let invoke = &outcome.observed["runtime.adapter.invoke.per_invoke_micros"];
    assert_eq!(invoke.p50, 31.25);
    assert_eq!(invoke.p95, 97.15);
    assert!(invoke
        .source
        .ends_with("TEST-com.clockwork.runtime.RuntimeAdapterPerformanceTest.xml"));

    // Observed but not budgeted: kept in the aggregate, absent from the report.
    assert!(outcome.observed.contains_key("core.hoststate.spawn_ms"));
    assert!(!outcome.report.contains("core.hoststate.spawn_ms"));
}

#[test]
fn rerunning_fixture_tree_is_byte_identical() {
    let report_dir = TempDir::new().expect("tempdir");
    let mut input = GateInput::new(
        fixture_root().join("targets-v2.json"),
        fixture_root().join("results-tree"),
    );
    input.report_path = report_dir.path().join("report.md");

    let first = run_gate(&input).expect("first run");
    let second = run_gate(&input).expect("second run");
    assert_eq!(first.report, second.report);
}
