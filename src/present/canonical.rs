//! Renderers for canonical results.

use super::{
    branch_label, completeness_note, counts, error_lines, header, location, message_lines, metric,
    nonzero, pct, plural, LineBuilder, Present,
};
use crate::model::{
    CanonicalResult, ComposeEntity, ComposeResult, ComposeSummary, Completeness, ContainerStats,
    CoverageResult, DiffFile, DiffResult, DiffSummary, LintResult, StatsResult, StatusEntry,
    StatusResult, TestCase, TestRunResult, TestStatus, TestSummary,
};
use crate::model::{CoverageSummary, Diagnostic, LintSummary, StatsSummary, StatusSummary, SuiteError};
use crate::normalize::format_bytes;

impl Present for CanonicalResult {
    fn render(&self, out: &mut LineBuilder) {
        match self {
            Self::GitStatus(r) => r.render(out),
            Self::GitDiff(r) => r.render(out),
            Self::Compose(r) => r.render(out),
            Self::ContainerStats(r) => r.render(out),
            Self::TestRun(r) => r.render(out),
            Self::Lint(r) => r.render(out),
            Self::Coverage(r) => r.render(out),
        }
    }
}

pub(super) fn status_counts(summary: &StatusSummary) -> String {
    counts(
        &[
            nonzero(summary.staged, "staged", "staged"),
            nonzero(summary.unstaged, "unstaged", "unstaged"),
            nonzero(summary.untracked, "untracked", "untracked"),
            nonzero(summary.conflicts, "conflict", "conflicts"),
        ],
        "clean",
    )
}

fn status_entry(out: &mut LineBuilder, entry: &StatusEntry) {
    match &entry.old_path {
        Some(old) => out.line(format!("{} {old} -> {}", entry.status.as_str(), entry.path)),
        None => out.line(format!("{} {}", entry.status.as_str(), entry.path)),
    };
}

impl Present for StatusResult {
    fn render(&self, out: &mut LineBuilder) {
        let branch = branch_label(self.branch.as_deref(), self.ahead, self.behind);
        out.line(header(
            "git status",
            self.success,
            &format!("{branch}, {}", status_counts(&self.summary)),
        ));
        out.section("conflicts", &self.conflicts, |out, path| {
            out.line(path);
        });
        out.section("staged", &self.staged, status_entry);
        out.section("unstaged", &self.unstaged, status_entry);
        out.section("untracked", &self.untracked, |out, path| {
            out.line(path);
        });
        out.section("ignored", &self.ignored, |out, path| {
            out.line(path);
        });
        error_lines(out, self.error.as_deref());
    }
}

pub(super) fn diff_header(success: bool, completeness: Completeness, summary: &DiffSummary) -> String {
    let detail = if summary.files_changed == 0 && completeness != Completeness::NoData {
        "no changes".to_string()
    } else {
        format!(
            "{}, +{} -{}",
            plural(summary.files_changed, "file changed", "files changed"),
            summary.total_additions,
            summary.total_deletions
        )
    };
    header("git diff", success, &detail)
}

fn diff_file(out: &mut LineBuilder, file: &DiffFile) {
    let path = match &file.old_path {
        Some(old) => format!("{old} -> {}", file.path),
        None => file.path.clone(),
    };
    if file.binary {
        out.line(format!("binary {path}"));
    } else {
        out.line(format!("+{} -{} {path}", file.additions, file.deletions));
    }
}

impl Present for DiffResult {
    fn render(&self, out: &mut LineBuilder) {
        out.line(diff_header(self.success, self.completeness, &self.summary));
        if let Some(files) = &self.files {
            out.indented(|out| {
                for file in files {
                    diff_file(out, file);
                }
            });
        }
        completeness_note(out, self.completeness);
        error_lines(out, self.error.as_deref());
    }
}

pub(super) fn compose_header(success: bool, summary: &ComposeSummary) -> String {
    if summary.total == 0 {
        return header("compose", success, "no actions");
    }
    let breakdown = counts(
        &[
            nonzero(summary.created, "created", "created"),
            nonzero(summary.started, "started", "started"),
            nonzero(summary.stopped, "stopped", "stopped"),
            nonzero(summary.removed, "removed", "removed"),
            nonzero(summary.failed, "failed", "failed"),
        ],
        "",
    );
    let total = plural(summary.total, "entity", "entities");
    if breakdown.is_empty() {
        header("compose", success, &total)
    } else {
        header("compose", success, &format!("{total} ({breakdown})"))
    }
}

pub(super) fn entity_line(
    kind: &str,
    name: &str,
    action: Option<&str>,
    failed: bool,
) -> String {
    match (action, failed) {
        (Some(action), true) => format!("{kind} {name} {action}, failed"),
        (Some(action), false) => format!("{kind} {name} {action}"),
        (None, _) => format!("{kind} {name} failed"),
    }
}

fn compose_entity(out: &mut LineBuilder, entity: &ComposeEntity) {
    out.line(entity_line(
        entity.kind.as_str(),
        &entity.name,
        entity.action.map(|a| a.as_str()),
        entity.failed,
    ));
}

impl Present for ComposeResult {
    fn render(&self, out: &mut LineBuilder) {
        out.line(compose_header(self.success, &self.summary));
        out.indented(|out| {
            for entity in &self.entities {
                compose_entity(out, entity);
            }
        });
        error_lines(out, self.error.as_deref());
    }
}

pub(super) fn stats_header(success: bool, summary: &StatsSummary) -> String {
    if summary.containers == 0 {
        return header("container stats", success, "no containers");
    }
    header(
        "container stats",
        success,
        &format!(
            "{}, cpu {:.2}%, mem {}",
            plural(summary.containers, "container", "containers"),
            summary.total_cpu_percent,
            format_bytes(summary.total_memory_bytes)
        ),
    )
}

fn container(out: &mut LineBuilder, stats: &ContainerStats) {
    let name = stats.name.as_deref().unwrap_or(&stats.id);
    out.line(format!(
        "{name} cpu {:.2}% mem {} / {} ({:.2}%) pids {}",
        stats.cpu_percent,
        format_bytes(stats.memory_usage_bytes),
        format_bytes(stats.memory_limit_bytes),
        stats.memory_percent,
        stats.pids
    ));
}

impl Present for StatsResult {
    fn render(&self, out: &mut LineBuilder) {
        out.line(stats_header(self.success, &self.summary));
        out.indented(|out| {
            for stats in &self.containers {
                container(out, stats);
            }
        });
        completeness_note(out, self.completeness);
        error_lines(out, self.error.as_deref());
    }
}

pub(super) fn test_header(success: bool, summary: &TestSummary) -> String {
    if summary.total == 0 {
        return header("tests", success, "no tests");
    }
    let breakdown = counts(
        &[
            nonzero(summary.failed, "failed", "failed"),
            nonzero(summary.passed, "passed", "passed"),
            nonzero(summary.skipped, "skipped", "skipped"),
        ],
        "0 passed",
    );
    header("tests", success, &format!("{breakdown} ({} total)", summary.total))
}

pub(super) fn failed_test(out: &mut LineBuilder, name: &str, file: Option<&str>, message: Option<&str>) {
    match file {
        Some(file) => out.line(format!("{name} ({file})")),
        None => out.line(name),
    };
    if let Some(message) = message {
        message_lines(out, message);
    }
}

pub(super) fn suite_error(out: &mut LineBuilder, error: &SuiteError) {
    out.line(&error.file);
    message_lines(out, &error.message);
}

impl Present for TestRunResult {
    fn render(&self, out: &mut LineBuilder) {
        out.line(test_header(self.success, &self.summary));
        if let Some(tests) = &self.tests {
            let failures: Vec<&TestCase> = tests.iter().filter(|t| t.status == TestStatus::Failed).collect();
            out.section("failures", &failures, |out, test| {
                failed_test(out, &test.name, test.file.as_deref(), test.failure_message.as_deref());
            });
            let skipped: Vec<&TestCase> = tests
                .iter()
                .filter(|t| matches!(t.status, TestStatus::Skipped | TestStatus::Todo))
                .collect();
            out.section("skipped", &skipped, |out, test| {
                out.line(format!("{} {}", test.status.as_str(), test.name));
            });
        }
        out.section("suite errors", &self.suite_errors, suite_error);
        completeness_note(out, self.completeness);
    }
}

pub(super) fn lint_header(label: &str, success: bool, summary: &LintSummary) -> String {
    if summary.total == 0 {
        return header(label, success, "no issues found");
    }
    let breakdown = counts(
        &[
            nonzero(summary.errors, "error", "errors"),
            nonzero(summary.warnings, "warning", "warnings"),
            nonzero(summary.infos, "info", "infos"),
        ],
        "",
    );
    if summary.files == 0 {
        header(label, success, &breakdown)
    } else {
        header(
            label,
            success,
            &format!("{breakdown} in {}", plural(summary.files, "file", "files")),
        )
    }
}

pub(super) fn diagnostic_line(
    loc: &str,
    severity: &str,
    rule: Option<&str>,
    message: &str,
) -> String {
    let first = message.lines().next().unwrap_or_default().trim_end();
    match rule {
        Some(rule) => format!("{loc} {severity} [{rule}] {first}"),
        None => format!("{loc} {severity} {first}"),
    }
}

fn diagnostic(out: &mut LineBuilder, d: &Diagnostic) {
    out.line(diagnostic_line(
        &location(d.file.as_deref(), d.line, d.column),
        d.severity.as_str(),
        d.rule.as_deref(),
        &d.message,
    ));
}

impl Present for LintResult {
    fn render(&self, out: &mut LineBuilder) {
        out.line(lint_header(self.source.name(), self.success, &self.summary));
        out.indented(|out| {
            for d in &self.diagnostics {
                diagnostic(out, d);
            }
        });
        completeness_note(out, self.completeness);
    }
}

pub(super) fn coverage_header(success: bool, completeness: Completeness, summary: &CoverageSummary) -> String {
    if completeness == Completeness::NoData {
        return header("coverage", success, "no data");
    }
    header(
        "coverage",
        success,
        &format!(
            "lines {} across {}",
            metric(&summary.lines),
            plural(summary.files, "file", "files")
        ),
    )
}

impl Present for CoverageResult {
    fn render(&self, out: &mut LineBuilder) {
        out.line(coverage_header(self.success, self.completeness, &self.summary));
        if self.completeness == Completeness::Complete {
            let s = &self.summary;
            out.indented(|out| {
                out.line(format!(
                    "statements {}, functions {}, branches {}",
                    pct(s.statements.pct),
                    pct(s.functions.pct),
                    pct(s.branches.pct)
                ));
            });
        }
        out.section("files", &self.files, |out, file| {
            out.line(format!(
                "{} lines {} statements {} functions {} branches {}",
                file.path,
                pct(file.lines.pct),
                pct(file.statements.pct),
                pct(file.functions.pct),
                pct(file.branches.pct)
            ));
        });
        completeness_note(out, self.completeness);
    }
}
