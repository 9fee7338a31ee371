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

//! Result-file discovery over glob-style patterns relative to a results root.

use regex::Regex;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::error::GateError;
use crate::observability::{events, fields};

const COMPONENT: &str = "discovery";

pub const DEFAULT_RESULT_PATTERNS: [&str; 3] = [
    "clockwork-runtime/build/test-results/performanceTest/TEST-*.xml",
    "clockwork-core/build/test-results/performanceTest/TEST-*.xml",
    "clockwork-standalone/build/test-results/performanceTest/TEST-*.xml",
];

/// A compiled `/`-separated pattern.
///
/// `*` matches within one path segment, `?` matches one character of a segment and a
/// segment that is exactly `**` matches any number of directories. Symlinked files and
/// directories are followed.
#[derive(Clone, Debug)]
pub struct ResultPattern {
    raw: String,
    literal_prefix: PathBuf,
    max_depth: Option<usize>,
    matcher: Regex,
}

impl ResultPattern {
    pub fn new(raw: &str) -> Result<Self, GateError> {
        let invalid = |reason: &str| GateError::InvalidPattern {
            pattern: raw.to_string(),
            reason: reason.to_string(),
        };

        if raw.is_empty() {
            return Err(invalid("pattern is empty"));
        }
        if raw.starts_with('/') {
            return Err(invalid("pattern must be relative to the results root"));
        }

        let segments: Vec<&str> = raw.split('/').collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(invalid("pattern contains an empty path segment"));
        }
        if segments.iter().any(|segment| *segment == "." || *segment == "..") {
            return Err(invalid("pattern must not contain `.` or `..` segments"));
        }

        let last = segments.len() - 1;
        let mut expression = String::from("^");
        for (index, segment) in segments.iter().enumerate() {
            if *segment == "**" {
                expression.push_str(if index == last { ".*" } else { "(?:[^/]+/)*" });
                continue;
            }
            expression.push_str(&translate_segment(segment));
            if index != last {
                expression.push('/');
            }
        }
        expression.push('$');

        let matcher = Regex::new(&expression).map_err(|err| invalid(&err.to_string()))?;
        let literal_prefix = segments[..last]
            .iter()
            .take_while(|segment| !has_wildcard(segment))
            .collect::<PathBuf>();
        let max_depth = if segments.contains(&"**") {
            None
        } else {
            Some(segments.len() - literal_prefix.components().count())
        };

        Ok(Self {
            raw: raw.to_string(),
            literal_prefix,
            max_depth,
            matcher,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Walk depth below the literal prefix, `None` when a `**` segment makes it unbounded.
    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }

    /// Matches a root-relative path written with `/` separators.
    pub fn matches(&self, relative: &str) -> bool {
        self.matcher.is_match(relative)
    }

    fn collect_matches(&self, root: &Path) -> Result<Vec<PathBuf>, GateError> {
        let walk_root = root.join(&self.literal_prefix);
        if !walk_root.is_dir() {
            return Ok(Vec::new());
        }

        let mut walker = WalkDir::new(&walk_root).follow_links(true);
        if let Some(depth) = self.max_depth {
            walker = walker.max_depth(depth);
        }

        let mut matched = Vec::new();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if is_skippable_walk_error(&err) => continue,
                Err(source) => {
                    return Err(GateError::Discovery {
                        root: root.to_path_buf(),
                        source,
                    })
                }
            };
            if !entry.path().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            if self.matches(&to_slash_path(relative)) {
                matched.push(entry.into_path());
            }
        }

        matched.sort();
        Ok(matched)
    }
}

/// Ordered set of patterns used to find result files.
#[derive(Clone, Debug)]
pub struct DiscoveryPolicy {
    patterns: Vec<ResultPattern>,
}

impl DiscoveryPolicy {
    pub fn new<I, S>(patterns: I) -> Result<Self, GateError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|pattern| ResultPattern::new(pattern.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    pub fn patterns(&self) -> &[ResultPattern] {
        &self.patterns
    }

    /// Returns matching files: sorted within each pattern, patterns in declaration
    /// order, each file at most once.
    pub fn discover(&self, root: &Path) -> Result<Vec<PathBuf>, GateError> {
        if !root.is_dir() {
            warn!(
                event = events::DISCOVERY_ROOT_MISSING,
                component = COMPONENT,
                path = fields::format_path(root).as_str(),
                "results root is not a directory"
            );
            return Ok(Vec::new());
        }

        let mut seen = HashSet::new();
        let mut discovered = Vec::new();
        for pattern in &self.patterns {
            for path in pattern.collect_matches(root)? {
                if seen.insert(path.clone()) {
                    discovered.push(path);
                }
            }
        }

        info!(
            event = events::DISCOVERY_DONE,
            component = COMPONENT,
            path = fields::format_path(root).as_str(),
            count = discovered.len(),
            "discovered result files"
        );
        Ok(discovered)
    }
}

impl Default for DiscoveryPolicy {
    fn default() -> Self {
        Self {
            patterns: DEFAULT_RESULT_PATTERNS
                .iter()
                .filter_map(|pattern| ResultPattern::new(pattern).ok())
                .collect(),
        }
    }
}

// Symlink loops and dangling links are not result files.
fn is_skippable_walk_error(err: &walkdir::Error) -> bool {
    err.loop_ancestor().is_some()
        || err
            .io_error()
            .is_some_and(|io_err| io_err.kind() == io::ErrorKind::NotFound)
}

fn has_wildcard(segment: &str) -> bool {
    segment.contains(['*', '?'])
}

fn translate_segment(segment: &str) -> String {
    let mut translated = String::with_capacity(segment.len() * 2);
    for ch in segment.chars() {
        match ch {
            '*' => translated.push_str("[^/]*"),
            '?' => translated.push_str("[^/]"),
            other => translated.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    translated
}

fn to_slash_path(path: &Path) -> String {
    path.iter()
        .map(|component| component.to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
