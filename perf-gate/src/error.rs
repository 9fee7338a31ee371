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

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Exit status for a run whose evaluation could not be completed.
pub const EXIT_INDETERMINATE: u8 = 2;

/// A marker line matched the `PERF_V2` grammar but one of its numbers did not parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field} value `{raw}` for metric `{metric}`")]
pub struct MarkerParseError {
    pub metric: String,
    pub field: &'static str,
    pub raw: String,
}

/// Fatal conditions that abort a gate run before a verdict is produced.
#[derive(Debug, Error)]
pub enum GateError {
    #[error("unable to read budget file `{}`: {source}", path.display())]
    BudgetRead { path: PathBuf, source: io::Error },

    #[error("unable to parse budget file `{}`: {source}", path.display())]
    BudgetParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid result pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("failed to walk results root `{}`: {source}", root.display())]
    Discovery {
        root: PathBuf,
        source: walkdir::Error,
    },

    #[error("no result files found under `{}`", root.display())]
    NoResultFiles { root: PathBuf },

    #[error("unable to read result file `{}`: {source}", path.display())]
    ResultRead { path: PathBuf, source: io::Error },

    #[error("malformed PERF_V2 marker in `{}`: {source}", path.display())]
    Marker {
        path: PathBuf,
        source: MarkerParseError,
    },

    #[error("no PERF_V2 markers found in {file_count} result file(s)")]
    NoObservations { file_count: usize },

    #[error("unable to write report `{}`: {source}", path.display())]
    ReportWrite { path: PathBuf, source: io::Error },
}

impl GateError {
    /// Process exit status for this failure. Every fatal condition is indeterminate.
    pub fn exit_code(&self) -> u8 {
        EXIT_INDETERMINATE
    }
}
