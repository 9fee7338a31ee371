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

mod config;

use crate::config::GateConfig;
use anyhow::{Context, Result};
use clap::Parser;
use perf_gate::discovery::{DiscoveryPolicy, DEFAULT_RESULT_PATTERNS};
use perf_gate::report::{render_json_summary, Verdict};
use perf_gate::{
    run_gate, GateError, GateInput, GateOutcome, DEFAULT_REPORT_PATH, EXIT_INDETERMINATE,
};
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "perf-gate")]
#[command(about = "Performance v2 regression gate over PERF_V2 test-result markers")]
struct Cli {
    /// Budget declaration, e.g. targets-v2.json
    #[arg(long, value_name = "FILE")]
    baseline: PathBuf,

    /// Root that result patterns are resolved against
    #[arg(long, default_value = ".")]
    results_root: PathBuf,

    /// Markdown report destination [default: build/reports/performance/perf-v2-report.md]
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Result-file pattern relative to the results root; repeat to add more
    #[arg(long = "pattern", value_name = "GLOB")]
    patterns: Vec<String>,

    /// json5 gate configuration
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Also write a JSON summary of the evaluation
    #[arg(long, value_name = "FILE")]
    json_summary: Option<PathBuf>,

    #[arg(short, long)]
    verbose: bool,
}

/// Flags merged over the optional config file, which is merged over built-in defaults.
#[derive(Debug, PartialEq)]
struct Settings {
    patterns: Vec<String>,
    report_path: PathBuf,
    json_summary_path: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(exit_code) => ExitCode::from(exit_code),
        Err(error) => {
            eprintln!("perf-gate: {error:#}");
            ExitCode::from(EXIT_INDETERMINATE)
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("perf_gate=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("perf_gate=error"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: Cli) -> Result<u8> {
    let config = match cli.config.as_deref() {
        Some(path) => GateConfig::load(path)?,
        None => GateConfig::default(),
    };
    let settings = resolve_settings(&cli, config);
    debug!(?settings, "resolved gate settings");

    let input = GateInput {
        baseline: absolutize(&cli.baseline)?,
        results_root: absolutize(&cli.results_root)?,
        report_path: absolutize(&settings.report_path)?,
        policy: DiscoveryPolicy::new(&settings.patterns)?,
    };

    let outcome = match run_gate(&input) {
        Ok(outcome) => outcome,
        Err(GateError::NoResultFiles { .. }) => {
            eprintln!("No performanceTest XML files found.");
            return Ok(EXIT_INDETERMINATE);
        }
        Err(err) => return Err(err.into()),
    };

    if let Some(summary_path) = settings.json_summary_path.as_deref() {
        write_json_summary(&outcome, &absolutize(summary_path)?)?;
    }

    print_console_summary(&outcome);
    Ok(outcome.exit_code())
}

fn resolve_settings(cli: &Cli, config: GateConfig) -> Settings {
    let patterns = if !cli.patterns.is_empty() {
        cli.patterns.clone()
    } else {
        config.result_patterns.unwrap_or_else(|| {
            DEFAULT_RESULT_PATTERNS
                .iter()
                .map(|pattern| pattern.to_string())
                .collect()
        })
    };

    Settings {
        patterns,
        report_path: cli
            .report
            .clone()
            .or(config.report_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_REPORT_PATH)),
        json_summary_path: cli.json_summary.clone().or(config.json_summary_path),
    }
}

/// Anchors a relative path at the working directory and drops `.` components.
fn absolutize(path: &Path) -> Result<PathBuf> {
    let anchored = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .context("unable to resolve current directory")?
            .join(path)
    };
    Ok(anchored
        .components()
        .filter(|component| !matches!(component, Component::CurDir))
        .collect())
}

fn write_json_summary(outcome: &GateOutcome, summary_path: &Path) -> Result<()> {
    let payload = render_json_summary(&outcome.context, &outcome.evaluation)
        .context("serialize gate summary")?;
    if let Some(parent) = summary_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("unable to create summary dir {}", parent.display()))?;
    }
    fs::write(summary_path, payload)
        .with_context(|| format!("unable to write gate summary {}", summary_path.display()))
}

fn print_console_summary(outcome: &GateOutcome) {
    match outcome.verdict() {
        Verdict::Passed => {
            println!("Performance gate v2 passed.");
        }
        Verdict::Failed => {
            eprintln!("Performance gate v2 failed:");
            for error in &outcome.evaluation.errors {
                eprintln!(" - {error}");
            }
        }
    }
    println!("Report: {}", outcome.report_path.display());
}
