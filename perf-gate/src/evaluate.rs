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

//! Joins aggregated observations against the budget table.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

use crate::aggregate::AggregatedMetric;
use crate::budget::BudgetTable;
use crate::observability::events;

const COMPONENT: &str = "evaluate";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricStatus {
    Ok,
    Regression,
    Missing,
}

impl MetricStatus {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Ok => "ok",
            Self::Regression => "regression",
            Self::Missing => "missing",
        }
    }
}

impl fmt::Display for MetricStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// The two percentile bounds a metric is checked against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Bound {
    P50,
    P95,
}

impl Bound {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::P50 => "p50",
            Self::P95 => "p95",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EvaluationRow {
    pub metric: String,
    pub observed_p50: Option<f64>,
    pub budget_p50: f64,
    pub observed_p95: Option<f64>,
    pub budget_p95: f64,
    pub status: MetricStatus,
}

/// Rows sorted by metric name plus every violation in the order it was found.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Evaluation {
    pub rows: Vec<EvaluationRow>,
    pub errors: Vec<String>,
}

impl Evaluation {
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }
}

pub fn missing_metric_message(metric: &str) -> String {
    format!("Missing PERF_V2 metric: {metric}")
}

pub fn regression_message(metric: &str, bound: Bound, observed: f64, budget: f64) -> String {
    format!(
        "{metric} {} regression: observed={observed:.3} budget={budget:.3}",
        bound.as_label()
    )
}

/// Classifies every budgeted metric as ok, regression or missing.
///
/// The budget is authoritative: observed metrics it does not name are ignored.
/// Bounds are inclusive and p50/p95 are checked independently, so a metric can
/// contribute two error lines.
pub fn evaluate(
    observed: &BTreeMap<String, AggregatedMetric>,
    budget: &BudgetTable,
) -> Evaluation {
    let mut evaluation = Evaluation {
        rows: Vec::with_capacity(budget.len()),
        errors: Vec::new(),
    };

    for (metric, limits) in budget.iter() {
        let Some(actual) = observed.get(metric) else {
            warn!(
                event = events::METRIC_MISSING,
                component = COMPONENT,
                metric,
                "budgeted metric was not observed"
            );
            evaluation.errors.push(missing_metric_message(metric));
            evaluation.rows.push(EvaluationRow {
                metric: metric.to_string(),
                observed_p50: None,
                budget_p50: limits.p50_max,
                observed_p95: None,
                budget_p95: limits.p95_max,
                status: MetricStatus::Missing,
            });
            continue;
        };

        let mut status = MetricStatus::Ok;
        for (bound, value, limit) in [
            (Bound::P50, actual.p50, limits.p50_max),
            (Bound::P95, actual.p95, limits.p95_max),
        ] {
            if value > limit {
                status = MetricStatus::Regression;
                warn!(
                    event = events::METRIC_REGRESSION,
                    component = COMPONENT,
                    metric,
                    bound = bound.as_label(),
                    observed = value,
                    budget = limit,
                    source = actual.source.as_str(),
                    "metric exceeds budget"
                );
                evaluation
                    .errors
                    .push(regression_message(metric, bound, value, limit));
            }
        }

        if status == MetricStatus::Ok {
            debug!(
                event = events::METRIC_OK,
                component = COMPONENT,
                metric,
                "metric within budget"
            );
        }

        evaluation.rows.push(EvaluationRow {
            metric: metric.to_string(),
            observed_p50: Some(actual.p50),
            budget_p50: limits.p50_max,
            observed_p95: Some(actual.p95),
            budget_p95: limits.p95_max,
            status,
        });
    }

    for metric in observed
        .keys()
        .filter(|metric| !budget.metrics.contains_key(*metric))
    {
        debug!(
            event = events::METRIC_UNBUDGETED,
            component = COMPONENT,
            metric = metric.as_str(),
            "observed metric has no budget; ignored"
        );
    }

    evaluation
}
