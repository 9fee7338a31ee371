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

//! Budget declaration: `{ "metrics": { "<name>": { "p50_max": n, "p95_max": n } } }`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::info;

use crate::error::GateError;
use crate::observability::{events, fields};

const COMPONENT: &str = "budget";

/// Maximum acceptable percentiles for one metric. Comparison is inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetEntry {
    pub p50_max: f64,
    pub p95_max: f64,
}

/// The authoritative set of budgeted metrics, ordered by name.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetTable {
    pub metrics: BTreeMap<String, BudgetEntry>,
}

impl BudgetTable {
    pub fn parse(payload: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(payload)
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BudgetEntry)> {
        self.metrics.iter().map(|(name, entry)| (name.as_str(), entry))
    }
}

/// Reads and parses the budget file. Any failure here is fatal for the run.
pub fn load_budget(path: &Path) -> Result<BudgetTable, GateError> {
    let payload = fs::read_to_string(path).map_err(|source| GateError::BudgetRead {
        path: path.to_path_buf(),
        source,
    })?;
    let table = BudgetTable::parse(&payload).map_err(|source| GateError::BudgetParse {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        event = events::BUDGET_LOADED,
        component = COMPONENT,
        path = fields::format_path(path).as_str(),
        count = table.len(),
        "loaded performance budget"
    );
    Ok(table)
}
