//! Compact projections.
//!
//! A [`CompactProjection`] is a reduced view of a [`CanonicalResult`]. Each
//! operation has its own projection type listing exactly the fields kept:
//! the operation tag, the success flag, the whole summary, and a trimmed
//! detail list of the records worth acting on. Kept fields carry the
//! canonical field name and value unchanged; nothing is truncated or
//! derived. Empty detail lists are omitted.
//!
//! | Operation         | Detail kept                                      |
//! |-------------------|--------------------------------------------------|
//! | `git_status`      | conflicted paths                                 |
//! | `git_diff`        | none                                             |
//! | `compose`         | failed entities                                  |
//! | `container_stats` | per-container CPU and memory percentages         |
//! | `test_run`        | failed tests, suite errors                       |
//! | `lint`            | errors, or warnings when a failing run has none  |
//! | `coverage`        | files with line coverage below the floor         |

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::CompactConfig;
use crate::model::{
    CanonicalResult, Completeness, ComposeResult, ComposeSummary, CoverageMetric, CoverageResult,
    CoverageSummary, DiffResult, DiffSummary, EntityAction, EntityKind, LintResult, LintSource, LintSummary,
    Severity, StatsResult, StatsSummary, StatusResult, StatusSummary, SuiteError, TestRunResult, TestStatus,
    TestSummary,
};

/// The compact view of one result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "snake_case")]
pub enum CompactProjection {
    /// Working tree status.
    GitStatus(CompactStatus),
    /// Diff totals.
    GitDiff(CompactDiff),
    /// Compose lifecycle.
    Compose(CompactCompose),
    /// Container usage.
    ContainerStats(CompactStats),
    /// Test results.
    TestRun(CompactTestRun),
    /// Lint diagnostics.
    Lint(CompactLint),
    /// Coverage.
    Coverage(CompactCoverage),
}

impl CompactProjection {
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
            Self::GitStatus(c) => c.success,
            Self::GitDiff(c) => c.success,
            Self::Compose(c) => c.success,
            Self::ContainerStats(c) => c.success,
            Self::TestRun(c) => c.success,
            Self::Lint(c) => c.success,
            Self::Coverage(c) => c.success,
        }
    }
}

/// Compact git status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactStatus {
    /// Tool success flag.
    pub success: bool,
    /// Current branch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Commits ahead of upstream.
    pub ahead: u32,
    /// Commits behind upstream.
    pub behind: u32,
    /// Full summary.
    pub summary: StatusSummary,
    /// No changes of any kind.
    pub clean: bool,
    /// Unmerged paths.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<String>,
    /// Tool error text on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Compact diff: totals only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactDiff {
    /// Tool success flag.
    pub success: bool,
    /// How much data was recoverable.
    pub completeness: Completeness,
    /// Full summary.
    pub summary: DiffSummary,
    /// Tool error text on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Compact compose lifecycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactCompose {
    /// Tool success flag.
    pub success: bool,
    /// Full summary.
    pub summary: ComposeSummary,
    /// Failed entities only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entities: Vec<CompactEntity>,
    /// Tool error text on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A failed compose entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactEntity {
    /// Entity kind.
    pub kind: EntityKind,
    /// Entity name.
    pub name: String,
    /// Last lifecycle action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<EntityAction>,
    /// Always `true` here.
    pub failed: bool,
}

/// Compact container usage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactStats {
    /// Tool success flag.
    pub success: bool,
    /// How much data was recoverable.
    pub completeness: Completeness,
    /// Full summary.
    pub summary: StatsSummary,
    /// Every container.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub containers: Vec<CompactContainer>,
}

/// Per-container headline figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactContainer {
    /// Container id.
    pub id: String,
    /// Container name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// CPU usage percentage.
    pub cpu_percent: f64,
    /// Memory usage percentage.
    pub memory_percent: f64,
}

/// Compact test results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactTestRun {
    /// Tool success flag.
    pub success: bool,
    /// How much data was recoverable.
    pub completeness: Completeness,
    /// Full summary.
    pub summary: TestSummary,
    /// Failed tests only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tests: Vec<CompactTestCase>,
    /// Files that failed before running tests.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suite_errors: Vec<SuiteError>,
}

/// A failed test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactTestCase {
    /// Test name.
    pub name: String,
    /// Test file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Test outcome.
    pub status: TestStatus,
    /// Assertion failure text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_message: Option<String>,
}

/// Compact lint results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactLint {
    /// Tool success flag.
    pub success: bool,
    /// How much data was recoverable.
    pub completeness: Completeness,
    /// Lint tool.
    pub source: LintSource,
    /// Full summary.
    pub summary: LintSummary,
    /// Errors, or warnings of a failing warning-only run.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<CompactDiagnostic>,
}

/// A diagnostic worth acting on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactDiagnostic {
    /// File path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// 1-indexed line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// Severity.
    pub severity: Severity,
    /// Rule identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    /// Diagnostic text.
    pub message: String,
}

/// Compact coverage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactCoverage {
    /// Tool success flag.
    pub success: bool,
    /// How much data was recoverable.
    pub completeness: Completeness,
    /// Full summary.
    pub summary: CoverageSummary,
    /// Files under the coverage floor.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<CompactFileCoverage>,
}

/// A file below the coverage floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactFileCoverage {
    /// File path.
    pub path: String,
    /// Line coverage.
    pub lines: CoverageMetric,
}

/// Project a result with default thresholds.
#[must_use]
pub fn compact(result: &CanonicalResult) -> CompactProjection {
    compact_with(result, &CompactConfig::default())
}

/// Project a result.
#[must_use]
pub fn compact_with(result: &CanonicalResult, config: &CompactConfig) -> CompactProjection {
    let projection = match result {
        CanonicalResult::GitStatus(r) => CompactProjection::GitStatus(compact_status(r)),
        CanonicalResult::GitDiff(r) => CompactProjection::GitDiff(compact_diff(r)),
        CanonicalResult::Compose(r) => CompactProjection::Compose(compact_compose(r)),
        CanonicalResult::ContainerStats(r) => CompactProjection::ContainerStats(compact_stats(r)),
        CanonicalResult::TestRun(r) => CompactProjection::TestRun(compact_tests(r)),
        CanonicalResult::Lint(r) => CompactProjection::Lint(compact_lint(r)),
        CanonicalResult::Coverage(r) => CompactProjection::Coverage(compact_coverage(r, config.coverage_floor)),
    };
    trace!(operation = projection.tag(), "Compacted result");
    projection
}

fn compact_status(r: &StatusResult) -> CompactStatus {
    CompactStatus {
        success: r.success,
        branch: r.branch.clone(),
        ahead: r.ahead,
        behind: r.behind,
        summary: r.summary,
        clean: r.clean,
        conflicts: r.conflicts.clone(),
        error: r.error.clone(),
    }
}

fn compact_diff(r: &DiffResult) -> CompactDiff {
    CompactDiff {
        success: r.success,
        completeness: r.completeness,
        summary: r.summary,
        error: r.error.clone(),
    }
}

fn compact_compose(r: &ComposeResult) -> CompactCompose {
    CompactCompose {
        success: r.success,
        summary: r.summary,
        entities: r
            .entities
            .iter()
            .filter(|e| e.failed)
            .map(|e| CompactEntity {
                kind: e.kind,
                name: e.name.clone(),
                action: e.action,
                failed: e.failed,
            })
            .collect(),
        error: r.error.clone(),
    }
}

fn compact_stats(r: &StatsResult) -> CompactStats {
    CompactStats {
        success: r.success,
        completeness: r.completeness,
        summary: r.summary,
        containers: r
            .containers
            .iter()
            .map(|c| CompactContainer {
                id: c.id.clone(),
                name: c.name.clone(),
                cpu_percent: c.cpu_percent,
                memory_percent: c.memory_percent,
            })
            .collect(),
    }
}

fn compact_tests(r: &TestRunResult) -> CompactTestRun {
    let failed = r
        .tests
        .iter()
        .flatten()
        .filter(|t| t.status == TestStatus::Failed)
        .map(|t| CompactTestCase {
            name: t.name.clone(),
            file: t.file.clone(),
            status: t.status,
            failure_message: t.failure_message.clone(),
        })
        .collect();

    CompactTestRun {
        success: r.success,
        completeness: r.completeness,
        summary: r.summary,
        tests: failed,
        suite_errors: r.suite_errors.clone(),
    }
}

fn compact_lint(r: &LintResult) -> CompactLint {
    // A failing run with only warnings still needs something to act on.
    let wanted = if r.summary.errors == 0 && !r.success {
        Severity::Warning
    } else {
        Severity::Error
    };

    CompactLint {
        success: r.success,
        completeness: r.completeness,
        source: r.source,
        summary: r.summary,
        diagnostics: r
            .diagnostics
            .iter()
            .filter(|d| d.severity == wanted)
            .map(|d| CompactDiagnostic {
                file: d.file.clone(),
                line: d.line,
                severity: d.severity,
                rule: d.rule.clone(),
                message: d.message.clone(),
            })
            .collect(),
    }
}

fn compact_coverage(r: &CoverageResult, floor: f64) -> CompactCoverage {
    CompactCoverage {
        success: r.success,
        completeness: r.completeness,
        summary: r.summary,
        files: r
            .files
            .iter()
            .filter(|f| f.lines.pct.is_some_and(|pct| pct < floor))
            .map(|f| CompactFileCoverage {
                path: f.path.clone(),
                lines: f.lines,
            })
            .collect(),
    }
}
