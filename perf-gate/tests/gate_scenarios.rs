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

use perf_gate::discovery::DiscoveryPolicy;
use perf_gate::evaluate::MetricStatus;
use perf_gate::report::{parse_verdict, Verdict};
use perf_gate::{run_gate, GateError, GateInput, EXIT_FAILED, EXIT_INDETERMINATE, EXIT_PASSED};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const LATENCY_BUDGET: &str = r#"{"metrics": {"latency_ms": {"p50_max": 10.0, "p95_max": 20.0}}}"#;
const RESULTS_DIR: &str = "clockwork-core/build/test-results/performanceTest";

struct Workspace {
    tempdir: TempDir,
}

impl Workspace {
    fn new(budget: &str) -> Self {
        let tempdir = TempDir::new().expect("tempdir");
        fs::write(tempdir.path().join("targets-v2.json"), budget).expect("write budget");
        Self { tempdir }
    }

    fn root(&self) -> &Path {
        self.tempdir.path()
    }

    fn write_result(&self, name: &str, body: &str) {
        let dir = self.root().join(RESULTS_DIR);
        fs::create_dir_all(&dir).expect("create results dir");
        fs::write(dir.join(name), body).expect("write result file");
    }

    fn input(&self) -> GateInput {
        let mut input = GateInput::new(self.root().join("targets-v2.json"), self.root());
        input.report_path = self.report_path();
        input
    }

    fn report_path(&self) -> std::path::PathBuf {
        self.root().join("build/reports/performance/perf-v2-report.md")
    }
}

#[test]
fn within_budget_passes_with_exit_zero() {
    let workspace = Workspace::new(LATENCY_BUDGET);
    workspace.write_result(
        "TEST-Latency.xml",
        "PERF_V2 metric=latency_ms p50=8.5 p95=19.0",
    );

    let outcome = run_gate(&workspace.input()).expect("gate should evaluate");
    assert_eq!(outcome.exit_code(), EXIT_PASSED);
    assert_eq!(outcome.evaluation.rows[0].status, MetricStatus::Ok);
    assert!(outcome.report.contains("## Result: PASSED"));
}

#[test]
fn comma_decimal_regresses_p50_only() {
    let workspace = Workspace::new(LATENCY_BUDGET);
    workspace.write_result(
        "TEST-Latency.xml",
        "PERF_V2 metric=latency_ms p50=12,0 p95=19.0",
    );

    let outcome = run_gate(&workspace.input()).expect("gate should evaluate");
    assert_eq!(outcome.exit_code(), EXIT_FAILED);
    assert_eq!(outcome.evaluation.errors.len(), 1);
    assert!(outcome.evaluation.errors[0].contains("p50 regression"));
    assert_eq!(outcome.observed["latency_ms"].p50, 12.0);

    let written = fs::read_to_string(workspace.report_path()).expect("report written on failure");
    assert_eq!(parse_verdict(&written), Some(Verdict::Failed));
    assert!(written.contains("- latency_ms p50 regression: observed=12.000 budget=10.000"));
}

#[test]
fn unobserved_budget_metric_is_missing_and_sorted_after_observed() {
    let workspace = Workspace::new(
        r#"{"metrics": {
            "throughput": {"p50_max": 1.0, "p95_max": 2.0},
            "latency_ms": {"p50_max": 10.0, "p95_max": 20.0}
        }}"#,
    );
    workspace.write_result(
        "TEST-Latency.xml",
        "PERF_V2 metric=latency_ms p50=8.5 p95=19.0",
    );

    let outcome = run_gate(&workspace.input()).expect("gate should evaluate");
    let rows = &outcome.evaluation.rows;
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].metric, "latency_ms");
    assert_eq!(rows[0].status, MetricStatus::Ok);
    assert_eq!(rows[1].metric, "throughput");
    assert_eq!(rows[1].status, MetricStatus::Missing);
    assert_eq!(
        outcome.evaluation.errors,
        vec!["Missing PERF_V2 metric: throughput".to_string()]
    );
    assert_eq!(outcome.exit_code(), EXIT_FAILED);
    assert!(outcome
        .report
        .contains("| `throughput` | - | 1.000 | - | 2.000 | missing |"));
}

#[test]
fn duplicates_across_files_use_maximum() {
    let workspace = Workspace::new(LATENCY_BUDGET);
    workspace.write_result("TEST-A.xml", "PERF_V2 metric=latency_ms p50=9.0 p95=12.0");
    workspace.write_result("TEST-B.xml", "PERF_V2 metric=latency_ms p50=4.0 p95=21.0");
    workspace.write_result("TEST-C.xml", "PERF_V2 metric=latency_ms p50=1.0 p95=1.0");

    let outcome = run_gate(&workspace.input()).expect("gate should evaluate");
    let latency = &outcome.observed["latency_ms"];
    assert_eq!((latency.p50, latency.p95), (9.0, 21.0));
    assert!(latency.source.ends_with("TEST-A.xml"));
    assert_eq!(
        outcome.evaluation.errors,
        vec!["latency_ms p95 regression: observed=21.000 budget=20.000".to_string()]
    );
}

#[test]
fn no_result_files_is_indeterminate_and_writes_no_report() {
    let workspace = Workspace::new(LATENCY_BUDGET);

    let err = run_gate(&workspace.input()).expect_err("no results must be fatal");
    assert!(matches!(err, GateError::NoResultFiles { .. }));
    assert_eq!(err.exit_code(), EXIT_INDETERMINATE);
    assert!(!workspace.report_path().exists());
}

#[test]
fn no_result_files_is_indeterminate_even_with_empty_budget() {
    let workspace = Workspace::new(r#"{"metrics": {}}"#);
    let err = run_gate(&workspace.input()).expect_err("no results must be fatal");
    assert_eq!(err.exit_code(), EXIT_INDETERMINATE);
}

#[test]
fn result_files_without_markers_are_fatal() {
    let workspace = Workspace::new(LATENCY_BUDGET);
    workspace.write_result("TEST-Empty.xml", "<testsuite tests=\"0\"/>");

    let err = run_gate(&workspace.input()).expect_err("empty aggregate must be fatal");
    assert!(matches!(err, GateError::NoObservations { file_count: 1 }));
    assert!(!workspace.report_path().exists());
}

#[test]
fn malformed_marker_number_aborts_run() {
    let workspace = Workspace::new(LATENCY_BUDGET);
    workspace.write_result("TEST-Bad.xml", "PERF_V2 metric=latency_ms p50=n/a p95=1");

    let err = run_gate(&workspace.input()).expect_err("malformed marker must be fatal");
    assert!(matches!(err, GateError::Marker { .. }));
    assert!(!workspace.report_path().exists());
}

#[test]
fn malformed_budget_aborts_before_discovery() {
    let workspace = Workspace::new(r#"{"budgets": {}}"#);
    workspace.write_result("TEST-A.xml", "PERF_V2 metric=latency_ms p50=1 p95=1");

    let err = run_gate(&workspace.input()).expect_err("budget without metrics key");
    assert!(matches!(err, GateError::BudgetParse { .. }));
    assert!(!workspace.report_path().exists());
}

#[test]
fn custom_patterns_replace_default_discovery() {
    let workspace = Workspace::new(LATENCY_BUDGET);
    let custom = workspace.root().join("out/perf");
    fs::create_dir_all(&custom).expect("create custom dir");
    fs::write(
        custom.join("run-1.log"),
        "PERF_V2 metric=latency_ms p50=1.0 p95=2.0",
    )
    .expect("write log");

    let mut input = workspace.input();
    input.policy = DiscoveryPolicy::new(["out/**/*.log"]).expect("valid pattern");

    let outcome = run_gate(&input).expect("gate should evaluate");
    assert_eq!(outcome.context.results_files, 1);
    assert_eq!(outcome.exit_code(), EXIT_PASSED);
}

#[test]
fn report_echoes_baseline_and_file_count() {
    let workspace = Workspace::new(LATENCY_BUDGET);
    workspace.write_result("TEST-A.xml", "PERF_V2 metric=latency_ms p50=1 p95=1");
    workspace.write_result("TEST-B.xml", "nothing to see");

    let outcome = run_gate(&workspace.input()).expect("gate should evaluate");
    let baseline = workspace.root().join("targets-v2.json");
    assert!(outcome
        .report
        .contains(&format!("- Baseline: `{}`", baseline.display())));
    assert!(outcome.report.contains("- Results files: 2"));
}
