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

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, trace};

use crate::marker::Observation;
use crate::observability::events;

const COMPONENT: &str = "aggregate";

/// Worst-case p50/p95 seen for one metric across every scanned file.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AggregatedMetric {
    pub p50: f64,
    pub p95: f64,
    /// File in which the metric was first seen. Later merges never change it.
    pub source: String,
}

/// Folds observations from any number of files into one entry per metric.
///
/// A metric may be emitted repeatedly (once per test repetition, or by several test
/// classes); the gate keeps the maximum of each percentile, never an average.
#[derive(Clone, Debug, Default)]
pub struct MetricAggregator {
    metrics: BTreeMap<String, AggregatedMetric>,
    observation_count: usize,
}

impl MetricAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, observation: Observation) {
        self.observation_count += 1;

        match self.metrics.get_mut(&observation.metric) {
            None => {
                trace!(
                    event = events::METRIC_OBSERVED,
                    component = COMPONENT,
                    metric = observation.metric.as_str(),
                    source = observation.source.as_str(),
                    p50 = observation.p50,
                    p95 = observation.p95,
                    "first observation"
                );
                self.metrics.insert(
                    observation.metric,
                    AggregatedMetric {
                        p50: observation.p50,
                        p95: observation.p95,
                        source: observation.source,
                    },
                );
            }
            Some(current) => {
                current.p50 = current.p50.max(observation.p50);
                current.p95 = current.p95.max(observation.p95);
                debug!(
                    event = events::METRIC_MERGED,
                    component = COMPONENT,
                    metric = observation.metric.as_str(),
                    source = observation.source.as_str(),
                    p50 = current.p50,
                    p95 = current.p95,
                    "merged duplicate observation, keeping worst case"
                );
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    pub fn observation_count(&self) -> usize {
        self.observation_count
    }

    pub fn get(&self, metric: &str) -> Option<&AggregatedMetric> {
        self.metrics.get(metric)
    }

    pub fn into_metrics(self) -> BTreeMap<String, AggregatedMetric> {
        self.metrics
    }
}

impl Extend<Observation> for MetricAggregator {
    fn extend<I: IntoIterator<Item = Observation>>(&mut self, iter: I) {
        for observation in iter {
            self.record(observation);
        }
    }
}

impl FromIterator<Observation> for MetricAggregator {
    fn from_iter<I: IntoIterator<Item = Observation>>(iter: I) -> Self {
        let mut aggregator = Self::new();
        aggregator.extend(iter);
        aggregator
    }
}
