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

//! Canonical structured event names used across `perf-gate`.

// Input loading events.
pub const BUDGET_LOADED: &str = "budget_loaded";
pub const DISCOVERY_DONE: &str = "discovery_done";
pub const DISCOVERY_ROOT_MISSING: &str = "discovery_root_missing";

// Extraction and aggregation events.
pub const RESULT_FILE_SCANNED: &str = "result_file_scanned";
pub const RESULT_FILE_UNDECODABLE_BYTES: &str = "result_file_undecodable_bytes";
pub const METRIC_OBSERVED: &str = "metric_observed";
pub const METRIC_MERGED: &str = "metric_merged";

// Evaluation events.
pub const METRIC_OK: &str = "metric_ok";
pub const METRIC_REGRESSION: &str = "metric_regression";
pub const METRIC_MISSING: &str = "metric_missing";
pub const METRIC_UNBUDGETED: &str = "metric_unbudgeted";

// Output events.
pub const REPORT_WRITTEN: &str = "report_written";
pub const GATE_VERDICT: &str = "gate_verdict";
