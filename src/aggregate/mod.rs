//! Aggregation and invariant checking.
//!
//! Summaries are always derived from the decoded record collections. When a
//! tool prints its own redundant totals, [`reconcile`] keeps the derived
//! value and logs the discrepancy. Only when no records could be decoded
//! does a tool-reported summary become the value of record, and then the
//! collection is omitted rather than reported as an empty list.
//!
//! [`check_invariants`] verifies the arithmetic relationships between a
//! result's records and its summary. Decoders uphold them by construction;
//! the pipeline checks them again before compaction and logs any breach.

use std::collections::HashSet;

use thiserror::Error;
use tracing::warn;

use crate::model::{
    CanonicalResult, ComposeEntity, ComposeSummary, ContainerStats, CoverageMetric, Diagnostic,
    DiffFile, DiffSummary, EntityAction, FileCoverage, LintSummary, Severity, StatsSummary,
    StatusResult, StatusSummary, TestCase, TestStatus, TestSummary,
};

/// A broken relationship between records and summary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvariantViolation {
    /// A summary count differs from the number of matching records.
    #[error("{operation}: summary.{field} is {summary} but {records} records were decoded")]
    CountMismatch {
        /// Operation tag.
        operation: &'static str,
        /// Summary field name.
        field: &'static str,
        /// Count over records.
        records: u64,
        /// Value in the summary.
        summary: u64,
    },

    /// A summary total differs from the sum over records.
    #[error("{operation}: summary.{field} is {summary} but records sum to {records}")]
    SumMismatch {
        /// Operation tag.
        operation: &'static str,
        /// Summary field name.
        field: &'static str,
        /// Sum over records.
        records: u64,
        /// Value in the summary.
        summary: u64,
    },
}

/// Keep the derived value, logging when a tool-reported value disagrees.
pub fn reconcile(operation: &'static str, field: &'static str, derived: u64, reported: Option<u64>) -> u64 {
    if let Some(reported) = reported {
        if reported != derived {
            warn!(operation, field, derived, reported, "Reported summary disagrees with decoded records, using decoded value");
        }
    }
    derived
}

/// Derive status counts.
#[must_use]
pub fn summarize_status(result: &StatusResult) -> StatusSummary {
    let staged = result.staged.len();
    let unstaged = result.unstaged.len();
    let untracked = result.untracked.len();
    let conflicts = result.conflicts.len();
    StatusSummary {
        staged,
        unstaged,
        untracked,
        conflicts,
        total: staged.saturating_add(unstaged).saturating_add(untracked).saturating_add(conflicts),
    }
}

/// Derive diff totals.
#[must_use]
pub fn summarize_diff(files: &[DiffFile]) -> DiffSummary {
    DiffSummary {
        files_changed: files.len() as u64,
        total_additions: files.iter().fold(0u64, |acc, f| acc.saturating_add(f.additions)),
        total_deletions: files.iter().fold(0u64, |acc, f| acc.saturating_add(f.deletions)),
    }
}

/// Derive compose counts from final actions.
#[must_use]
pub fn summarize_compose(entities: &[ComposeEntity]) -> ComposeSummary {
    let mut summary = ComposeSummary {
        total: entities.len(),
        ..ComposeSummary::default()
    };
    for entity in entities {
        match entity.action {
            Some(EntityAction::Created) => summary.created += 1,
            Some(EntityAction::Started) => summary.started += 1,
            Some(EntityAction::Stopped) => summary.stopped += 1,
            Some(EntityAction::Removed) => summary.removed += 1,
            None => {}
        }
        if entity.failed {
            summary.failed += 1;
        }
    }
    summary
}

/// Derive container totals.
#[must_use]
pub fn summarize_stats(containers: &[ContainerStats]) -> StatsSummary {
    StatsSummary {
        containers: containers.len(),
        total_cpu_percent: round2(containers.iter().map(|c| c.cpu_percent).sum()),
        total_memory_bytes: containers.iter().fold(0u64, |acc, c| acc.saturating_add(c.memory_usage_bytes)),
    }
}

/// Derive test counts.
#[must_use]
pub fn summarize_tests(tests: &[TestCase]) -> TestSummary {
    let mut summary = TestSummary {
        total: tests.len() as u64,
        ..TestSummary::default()
    };
    for test in tests {
        match test.status {
            TestStatus::Passed => summary.passed += 1,
            TestStatus::Failed => summary.failed += 1,
            TestStatus::Skipped | TestStatus::Todo => summary.skipped += 1,
        }
    }
    summary
}

/// Derive lint counts.
#[must_use]
pub fn summarize_lint(diagnostics: &[Diagnostic]) -> LintSummary {
    let mut summary = LintSummary {
        total: diagnostics.len(),
        ..LintSummary::default()
    };
    let mut files = HashSet::new();
    for diagnostic in diagnostics {
        match diagnostic.severity {
            Severity::Error => summary.errors += 1,
            Severity::Warning => summary.warnings += 1,
            Severity::Info => summary.infos += 1,
        }
        if let Some(file) = &diagnostic.file {
            files.insert(file.as_str());
        }
    }
    summary.files = files.len();
    summary
}

/// Sum one coverage dimension across files, computing the percentage.
#[must_use]
pub fn sum_coverage<F>(files: &[FileCoverage], metric: F) -> CoverageMetric
where
    F: Fn(&FileCoverage) -> CoverageMetric,
{
    let (total, covered) = files
        .iter()
        .map(&metric)
        .fold((0u64, 0u64), |(t, c), m| (t.saturating_add(m.total), c.saturating_add(m.covered)));
    CoverageMetric {
        total,
        covered,
        pct: if total == 0 {
            None
        } else {
            Some(round2(covered as f64 / total as f64 * 100.0))
        },
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn check_count(
    violations: &mut Vec<InvariantViolation>,
    operation: &'static str,
    field: &'static str,
    records: u64,
    summary: u64,
) {
    if records != summary {
        violations.push(InvariantViolation::CountMismatch {
            operation,
            field,
            records,
            summary,
        });
    }
}

fn check_sum(
    violations: &mut Vec<InvariantViolation>,
    operation: &'static str,
    field: &'static str,
    records: u64,
    summary: u64,
) {
    if records != summary {
        violations.push(InvariantViolation::SumMismatch {
            operation,
            field,
            records,
            summary,
        });
    }
}

/// Check every record/summary relationship of a result.
///
/// Header-sourced summaries (record collection omitted) are exempt from the
/// count and sum checks.
#[must_use]
pub fn check_invariants(result: &CanonicalResult) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();
    let op = result.tag();
    let v = &mut violations;

    match result {
        CanonicalResult::GitStatus(r) => {
            let derived = summarize_status(r);
            check_count(v, op, "staged", derived.staged as u64, r.summary.staged as u64);
            check_count(v, op, "unstaged", derived.unstaged as u64, r.summary.unstaged as u64);
            check_count(v, op, "untracked", derived.untracked as u64, r.summary.untracked as u64);
            check_count(v, op, "conflicts", derived.conflicts as u64, r.summary.conflicts as u64);
            check_count(v, op, "total", derived.total as u64, r.summary.total as u64);
        }
        CanonicalResult::GitDiff(r) => {
            if let Some(files) = &r.files {
                let derived = summarize_diff(files);
                check_count(v, op, "files_changed", derived.files_changed, r.summary.files_changed);
                check_sum(v, op, "total_additions", derived.total_additions, r.summary.total_additions);
                check_sum(v, op, "total_deletions", derived.total_deletions, r.summary.total_deletions);
            }
        }
        CanonicalResult::Compose(r) => {
            let derived = summarize_compose(&r.entities);
            check_count(v, op, "total", derived.total as u64, r.summary.total as u64);
            check_count(v, op, "created", derived.created as u64, r.summary.created as u64);
            check_count(v, op, "started", derived.started as u64, r.summary.started as u64);
            check_count(v, op, "stopped", derived.stopped as u64, r.summary.stopped as u64);
            check_count(v, op, "removed", derived.removed as u64, r.summary.removed as u64);
            check_count(v, op, "failed", derived.failed as u64, r.summary.failed as u64);
        }
        CanonicalResult::ContainerStats(r) => {
            let derived = summarize_stats(&r.containers);
            check_count(v, op, "containers", derived.containers as u64, r.summary.containers as u64);
            check_sum(v, op, "total_memory_bytes", derived.total_memory_bytes, r.summary.total_memory_bytes);
        }
        CanonicalResult::TestRun(r) => {
            if let Some(tests) = &r.tests {
                let derived = summarize_tests(tests);
                check_count(v, op, "total", derived.total, r.summary.total);
                check_count(v, op, "passed", derived.passed, r.summary.passed);
                check_count(v, op, "failed", derived.failed, r.summary.failed);
                check_count(v, op, "skipped", derived.skipped, r.summary.skipped);
            }
        }
        CanonicalResult::Lint(r) => {
            let derived = summarize_lint(&r.diagnostics);
            check_count(v, op, "total", derived.total as u64, r.summary.total as u64);
            check_count(v, op, "errors", derived.errors as u64, r.summary.errors as u64);
            check_count(v, op, "warnings", derived.warnings as u64, r.summary.warnings as u64);
            check_count(v, op, "infos", derived.infos as u64, r.summary.infos as u64);
            check_count(v, op, "files", derived.files as u64, r.summary.files as u64);
        }
        CanonicalResult::Coverage(r) => {
            check_count(v, op, "files", r.files.len() as u64, r.summary.files as u64);
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChangeKind, DiffResult, Completeness};

    fn file(path: &str, additions: u64, deletions: u64) -> DiffFile {
        DiffFile {
            path: path.to_string(),
            old_path: None,
            status: ChangeKind::Modified,
            additions,
            deletions,
            binary: false,
        }
    }

    #[test]
    fn test_summarize_diff_sums_records() {
        let files = vec![file("a.rs", 5, 2), file("b.rs", 3, 0)];
        let summary = summarize_diff(&files);
        assert_eq!(summary.files_changed, 2);
        assert_eq!(summary.total_additions, 8);
        assert_eq!(summary.total_deletions, 2);
    }

    #[test]
    fn test_reconcile_prefers_derived() {
        assert_eq!(reconcile("git_diff", "files_changed", 3, Some(4)), 3);
        assert_eq!(reconcile("git_diff", "files_changed", 3, None), 3);
    }

    #[test]
    fn test_check_invariants_detects_sum_mismatch() {
        let files = vec![file("a.rs", 5, 2)];
        let mut summary = summarize_diff(&files);
        summary.total_additions = 6;
        let result = CanonicalResult::GitDiff(DiffResult {
            success: true,
            completeness: Completeness::Complete,
            files: Some(files),
            summary,
            error: None,
        });

        let violations = check_invariants(&result);
        assert_eq!(violations.len(), 1);
        assert!(matches!(
            violations[0],
            InvariantViolation::SumMismatch { field: "total_additions", records: 5, summary: 6, .. }
        ));
        assert!(violations[0].to_string().contains("total_additions"));
    }

    #[test]
    fn test_header_only_diff_is_exempt() {
        let result = CanonicalResult::GitDiff(DiffResult {
            success: true,
            completeness: Completeness::HeaderOnly,
            files: None,
            summary: DiffSummary {
                files_changed: 3,
                total_additions: 10,
                total_deletions: 2,
            },
            error: None,
        });
        assert!(check_invariants(&result).is_empty());
    }

    #[test]
    fn test_summarize_lint_counts_distinct_files() {
        let diag = |file: &str, severity| Diagnostic {
            file: Some(file.to_string()),
            line: Some(1),
            column: None,
            severity,
            rule: None,
            message: "m".to_string(),
        };
        let summary = summarize_lint(&[
            diag("a.ts", Severity::Error),
            diag("a.ts", Severity::Warning),
            diag("b.ts", Severity::Info),
        ]);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.warnings, 1);
        assert_eq!(summary.infos, 1);
        assert_eq!(summary.files, 2);
    }

    #[test]
    fn test_sum_coverage_computes_pct() {
        let metric = |total, covered| CoverageMetric { total, covered, pct: None };
        let files = vec![
            FileCoverage {
                path: "a.ts".to_string(),
                lines: metric(10, 5),
                statements: metric(0, 0),
                functions: metric(0, 0),
                branches: metric(0, 0),
            },
            FileCoverage {
                path: "b.ts".to_string(),
                lines: metric(10, 10),
                statements: metric(0, 0),
                functions: metric(0, 0),
                branches: metric(0, 0),
            },
        ];
        let lines = sum_coverage(&files, |f| f.lines);
        assert_eq!(lines.total, 20);
        assert_eq!(lines.covered, 15);
        assert_eq!(lines.pct, Some(75.0));
        assert_eq!(sum_coverage(&files, |f| f.branches).pct, None);
    }

    #[test]
    fn test_sums_saturate() {
        let files = vec![file("a.rs", u64::MAX, 1), file("b.rs", 1, u64::MAX)];
        let summary = summarize_diff(&files);
        assert_eq!(summary.total_additions, u64::MAX);
        assert_eq!(summary.total_deletions, u64::MAX);

        let result = CanonicalResult::GitDiff(DiffResult {
            success: true,
            completeness: Completeness::Complete,
            files: Some(files),
            summary,
            error: None,
        });
        assert!(check_invariants(&result).is_empty());

        let metric = |total, covered| CoverageMetric { total, covered, pct: None };
        let coverage = vec![
            FileCoverage {
                path: "a.ts".to_string(),
                lines: metric(u64::MAX, u64::MAX),
                statements: metric(0, 0),
                functions: metric(0, 0),
                branches: metric(0, 0),
            },
            FileCoverage {
                path: "b.ts".to_string(),
                lines: metric(2, 1),
                statements: metric(0, 0),
                functions: metric(0, 0),
                branches: metric(0, 0),
            },
        ];
        let lines = sum_coverage(&coverage, |f| f.lines);
        assert_eq!(lines.total, u64::MAX);
        assert_eq!(lines.covered, u64::MAX);
    }
}
