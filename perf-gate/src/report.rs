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

//! Markdown report rendering and writing.

use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::GateError;
use crate::evaluate::{Evaluation, EvaluationRow};
use crate::observability::{events, fields};

const COMPONENT: &str = "report";

pub const REPORT_TITLE: &str = "# Performance Gate v2 Report";
pub const RESULT_PREFIX: &str = "## Result: ";
pub const ABSENT_VALUE: &str = "-";

const TABLE_HEADER: &str =
    "| Metric | Observed p50 | Budget p50 | Observed p95 | Budget p95 | Status |";
const TABLE_ALIGNMENT: &str = "|---|---:|---:|---:|---:|---|";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    Passed,
    Failed,
}

impl Verdict {
    pub fn of(evaluation: &Evaluation) -> Self {
        if evaluation.passed() {
            Self::Passed
        } else {
            Self::Failed
        }
    }

    pub fn as_label(self) -> &'static str {
        match self {
            Self::Passed => "PASSED",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Run metadata echoed at the top of the report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReportContext {
    pub baseline: String,
    pub results_files: usize,
}

/// Machine-readable counterpart of the markdown report.
#[derive(Clone, Debug, Serialize)]
pub struct GateSummary<'a> {
    pub verdict: Verdict,
    pub pass: bool,
    pub baseline: &'a str,
    pub results_files: usize,
    pub rows: &'a [EvaluationRow],
    pub errors: &'a [String],
}

pub fn render_report(context: &ReportContext, evaluation: &Evaluation) -> String {
    let verdict = Verdict::of(evaluation);
    let mut lines = vec![
        REPORT_TITLE.to_string(),
        String::new(),
        format!("- Baseline: `{}`", context.baseline),
        format!("- Results files: {}", context.results_files),
        String::new(),
        format!("{RESULT_PREFIX}{verdict}"),
        String::new(),
        TABLE_HEADER.to_string(),
        TABLE_ALIGNMENT.to_string(),
    ];
    lines.extend(evaluation.rows.iter().map(render_row));
    lines.push(String::new());

    if !evaluation.errors.is_empty() {
        lines.push("## Errors".to_string());
        lines.push(String::new());
        lines.extend(evaluation.errors.iter().map(|error| format!("- {error}")));
    }

    let mut document = lines.join("\n");
    document.push('\n');
    document
}

fn render_row(row: &EvaluationRow) -> String {
    format!(
        "| `{}` | {} | {:.3} | {} | {:.3} | {} |",
        row.metric,
        format_observed(row.observed_p50),
        row.budget_p50,
        format_observed(row.observed_p95),
        row.budget_p95,
        row.status
    )
}

fn format_observed(value: Option<f64>) -> String {
    value
        .map(|value| format!("{value:.3}"))
        .unwrap_or_else(|| ABSENT_VALUE.to_string())
}

/// Recovers the verdict from a rendered report's `## Result:` line.
pub fn parse_verdict(document: &str) -> Option<Verdict> {
    document
        .lines()
        .find_map(|line| line.strip_prefix(RESULT_PREFIX))
        .and_then(|label| match label.trim() {
            "PASSED" => Some(Verdict::Passed),
            "FAILED" => Some(Verdict::Failed),
            _ => None,
        })
}

pub fn render_json_summary(
    context: &ReportContext,
    evaluation: &Evaluation,
) -> Result<String, serde_json::Error> {
    let verdict = Verdict::of(evaluation);
    serde_json::to_string_pretty(&GateSummary {
        verdict,
        pass: verdict == Verdict::Passed,
        baseline: &context.baseline,
        results_files: context.results_files,
        rows: &evaluation.rows,
        errors: &evaluation.errors,
    })
}

/// Writes `document` to `report_path`, creating parent directories as needed.
pub fn write_report(document: &str, report_path: &Path) -> Result<(), GateError> {
    let write_err = |source| GateError::ReportWrite {
        path: report_path.to_path_buf(),
        source,
    };

    if let Some(parent) = report_path.parent() {
        fs::create_dir_all(parent).map_err(write_err)?;
    }
    fs::write(report_path, document).map_err(write_err)?;

    info!(
        event = events::REPORT_WRITTEN,
        component = COMPONENT,
        path = fields::format_path(report_path).as_str(),
        "wrote performance report"
    );
    Ok(())
}
