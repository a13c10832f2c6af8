//! Renderers for compact projections.
//!
//! Headers are shared with the canonical renderers so both forms of the
//! same result open with the same line.

use super::canonical::{
    compose_header, coverage_header, diagnostic_line, diff_header, entity_line, failed_test,
    lint_header, stats_header, status_counts, suite_error, test_header,
};
use super::{branch_label, completeness_note, error_lines, header, location, metric, LineBuilder, Present};
use crate::compact::{
    CompactCompose, CompactCoverage, CompactDiff, CompactLint, CompactProjection, CompactStats,
    CompactStatus, CompactTestRun,
};

impl Present for CompactProjection {
    fn render(&self, out: &mut LineBuilder) {
        match self {
            Self::GitStatus(c) => c.render(out),
            Self::GitDiff(c) => c.render(out),
            Self::Compose(c) => c.render(out),
            Self::ContainerStats(c) => c.render(out),
            Self::TestRun(c) => c.render(out),
            Self::Lint(c) => c.render(out),
            Self::Coverage(c) => c.render(out),
        }
    }
}

impl Present for CompactStatus {
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
        error_lines(out, self.error.as_deref());
    }
}

impl Present for CompactDiff {
    fn render(&self, out: &mut LineBuilder) {
        out.line(diff_header(self.success, self.completeness, &self.summary));
        completeness_note(out, self.completeness);
        error_lines(out, self.error.as_deref());
    }
}

impl Present for CompactCompose {
    fn render(&self, out: &mut LineBuilder) {
        out.line(compose_header(self.success, &self.summary));
        out.section("failed", &self.entities, |out, entity| {
            out.line(entity_line(
                entity.kind.as_str(),
                &entity.name,
                entity.action.map(|a| a.as_str()),
                entity.failed,
            ));
        });
        error_lines(out, self.error.as_deref());
    }
}

impl Present for CompactStats {
    fn render(&self, out: &mut LineBuilder) {
        out.line(stats_header(self.success, &self.summary));
        out.indented(|out| {
            for c in &self.containers {
                let name = c.name.as_deref().unwrap_or(&c.id);
                out.line(format!(
                    "{name} cpu {:.2}% mem {:.2}%",
                    c.cpu_percent, c.memory_percent
                ));
            }
        });
        completeness_note(out, self.completeness);
    }
}

impl Present for CompactTestRun {
    fn render(&self, out: &mut LineBuilder) {
        out.line(test_header(self.success, &self.summary));
        out.section("failures", &self.tests, |out, test| {
            failed_test(out, &test.name, test.file.as_deref(), test.failure_message.as_deref());
        });
        out.section("suite errors", &self.suite_errors, suite_error);
        completeness_note(out, self.completeness);
    }
}

impl Present for CompactLint {
    fn render(&self, out: &mut LineBuilder) {
        out.line(lint_header(self.source.name(), self.success, &self.summary));
        out.indented(|out| {
            for d in &self.diagnostics {
                out.line(diagnostic_line(
                    &location(d.file.as_deref(), d.line, None),
                    d.severity.as_str(),
                    d.rule.as_deref(),
                    &d.message,
                ));
            }
        });
        completeness_note(out, self.completeness);
    }
}

impl Present for CompactCoverage {
    fn render(&self, out: &mut LineBuilder) {
        out.line(coverage_header(self.success, self.completeness, &self.summary));
        out.section("low coverage", &self.files, |out, file| {
            out.line(format!("{} lines {}", file.path, metric(&file.lines)));
        });
        completeness_note(out, self.completeness);
    }
}
