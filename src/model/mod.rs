//! Canonical result model.
//!
//! Every decoded tool invocation becomes one [`CanonicalResult`], a tagged
//! variant per operation. Each variant carries the operation tag (as the
//! serde tag), a `success` flag mirroring the tool's exit classification,
//! its typed record collections and a derived summary.
//!
//! Records are semantically typed: closed vocabularies become enums
//! ([`ChangeKind`], [`Severity`], [`EntityAction`], [`TestStatus`]),
//! sizes become byte counts and timestamps become ISO-8601 strings.

pub mod container;
pub mod coverage;
pub mod git;
pub mod lint;
pub mod testing;

pub use container::*;
pub use coverage::*;
pub use git::*;
pub use lint::*;
pub use testing::*;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DigestError;

/// How much of a result's data was recoverable from the raw output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Completeness {
    /// Records were decoded and the summary is derived from them.
    #[default]
    Complete,
    /// Only a summary line was available; the record collection is omitted.
    HeaderOnly,
    /// Nothing could be decoded. Counts are zero because they are unknown.
    NoData,
}

impl Completeness {
    /// Whether this is the default (`complete`) state.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

/// Lint tool whose output is being decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LintSource {
    /// `eslint -f json` (single JSON document, numeric severities).
    #[default]
    Eslint,
    /// `cargo check|clippy --message-format=json` (JSON lines).
    Cargo,
    /// `shellcheck -f json1` (single JSON document, word levels).
    Shellcheck,
}

impl LintSource {
    /// Stable name used in operation tags.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Eslint => "eslint",
            Self::Cargo => "cargo",
            Self::Shellcheck => "shellcheck",
        }
    }
}

/// An operation the pipeline knows how to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// `git status --porcelain=v1 -b`.
    GitStatus,
    /// `git diff --numstat` with an optional `--shortstat` line.
    GitDiff,
    /// `docker compose up|down|start|stop|rm` progress output.
    Compose,
    /// `docker stats --no-stream --format '{{json .}}'`.
    ContainerStats,
    /// Jest/Vitest `--json` reporter output.
    TestRun,
    /// Linter diagnostics from the given source.
    Lint(LintSource),
    /// Istanbul `json-summary` coverage report.
    Coverage,
}

impl Operation {
    /// Every operation, in display order.
    pub const ALL: [Operation; 9] = [
        Self::GitStatus,
        Self::GitDiff,
        Self::Compose,
        Self::ContainerStats,
        Self::TestRun,
        Self::Lint(LintSource::Eslint),
        Self::Lint(LintSource::Cargo),
        Self::Lint(LintSource::Shellcheck),
        Self::Coverage,
    ];

    /// The serialized operation tag.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::GitStatus => "git_status",
            Self::GitDiff => "git_diff",
            Self::Compose => "compose",
            Self::ContainerStats => "container_stats",
            Self::TestRun => "test_run",
            Self::Lint(_) => "lint",
            Self::Coverage => "coverage",
        }
    }

    /// Short description for listings.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::GitStatus => "git status --porcelain=v1 -b",
            Self::GitDiff => "git diff --numstat [--shortstat]",
            Self::Compose => "docker compose up/down/start/stop/rm progress lines",
            Self::ContainerStats => "docker stats --no-stream --format '{{json .}}'",
            Self::TestRun => "jest/vitest --json reporter",
            Self::Lint(LintSource::Eslint) => "eslint -f json",
            Self::Lint(LintSource::Cargo) => "cargo check/clippy --message-format=json",
            Self::Lint(LintSource::Shellcheck) => "shellcheck -f json1",
            Self::Coverage => "istanbul json-summary",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lint(source) => write!(f, "lint:{}", source.name()),
            other => f.write_str(other.tag()),
        }
    }
}

impl FromStr for Operation {
    type Err = DigestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        let op = match normalized.as_str() {
            "git_status" | "status" => Self::GitStatus,
            "git_diff" | "diff" => Self::GitDiff,
            "compose" => Self::Compose,
            "container_stats" | "stats" => Self::ContainerStats,
            "test_run" | "test" | "jest" | "vitest" => Self::TestRun,
            "lint" | "lint:eslint" | "eslint" => Self::Lint(LintSource::Eslint),
            "lint:cargo" | "cargo" | "clippy" => Self::Lint(LintSource::Cargo),
            "lint:shellcheck" | "shellcheck" => Self::Lint(LintSource::Shellcheck),
            "coverage" => Self::Coverage,
            _ => {
                return Err(DigestError::UnknownOperation {
                    name: s.to_string(),
                })
            }
        };
        Ok(op)
    }
}

/// The fully decoded result of one tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum CanonicalResult {
    /// Working tree status.
    GitStatus(StatusResult),
    /// Per-file diff statistics.
    GitDiff(DiffResult),
    /// Compose lifecycle actions.
    Compose(ComposeResult),
    /// Container resource usage.
    ContainerStats(StatsResult),
    /// Test runner results.
    TestRun(TestRunResult),
    /// Lint diagnostics.
    Lint(LintResult),
    /// Coverage summary.
    Coverage(CoverageResult),
}

impl CanonicalResult {
    /// The serialized operation tag.
    #[must_use]
    pub const fn tag(&self) -> &'static str {
        match self {
            Self::GitStatus(_) => "git_status",
            Self::GitDiff(_) => "git_diff",
            Self::Compose(_) => "compose",
            Self::ContainerStats(_) => "container_stats",
            Self::TestRun(_) => "test_run",
            Self::Lint(_) => "lint",
            Self::Coverage(_) => "coverage",
        }
    }

    /// Whether the underlying tool reported success.
    #[must_use]
    pub const fn success(&self) -> bool {
        match self {
            Self::GitStatus(r) => r.success,
            Self::GitDiff(r) => r.success,
            Self::Compose(r) => r.success,
            Self::ContainerStats(r) => r.success,
            Self::TestRun(r) => r.success,
            Self::Lint(r) => r.success,
            Self::Coverage(r) => r.success,
        }
    }
}

/// Serde helper: skip `false` booleans.
pub(crate) fn is_false(value: &bool) -> bool {
    !*value
}
