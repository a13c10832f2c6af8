//! Jest / Vitest `--json` report decoding.
//!
//! Reports list files under `testResults`. A detailed file carries
//! `assertionResults`; a summary-only file carries just its status. If any
//! file lacks per-test detail the run's header counts are used and the
//! test collection is omitted.

use serde::Deserialize;
use tracing::debug;

use super::lines::strip_ansi;
use super::{parse_document, RawOutput};
use crate::aggregate::{reconcile, summarize_tests};
use crate::classify::test_status_from_word;
use crate::model::{Completeness, SuiteError, TestCase, TestRunResult, TestSummary};
use crate::normalize::epoch_millis_to_canonical;

const OPERATION: &str = "test_run";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Report {
    #[serde(default)]
    num_total_tests: Option<u64>,
    #[serde(default)]
    num_passed_tests: Option<u64>,
    #[serde(default)]
    num_failed_tests: Option<u64>,
    #[serde(default)]
    num_pending_tests: Option<u64>,
    #[serde(default)]
    num_todo_tests: Option<u64>,
    #[serde(default)]
    start_time: Option<f64>,
    #[serde(default)]
    test_results: Vec<FileReport>,
}

impl Report {
    fn header(&self) -> TestSummary {
        TestSummary {
            total: self.num_total_tests.unwrap_or(0),
            passed: self.num_passed_tests.unwrap_or(0),
            failed: self.num_failed_tests.unwrap_or(0),
            skipped: self.num_pending_tests.unwrap_or(0).saturating_add(self.num_todo_tests.unwrap_or(0)),
        }
    }

    fn skipped_reported(&self) -> Option<u64> {
        match (self.num_pending_tests, self.num_todo_tests) {
            (None, None) => None,
            (pending, todo) => Some(pending.unwrap_or(0).saturating_add(todo.unwrap_or(0))),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FileReport {
    Detailed(DetailedFile),
    SummaryOnly(SummaryFile),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetailedFile {
    name: String,
    assertion_results: Vec<Assertion>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryFile {
    name: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Assertion {
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    title: String,
    #[serde(default)]
    ancestor_titles: Vec<String>,
    #[serde(default)]
    status: String,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    failure_messages: Vec<String>,
}

impl Assertion {
    fn into_case(self, file: &str) -> TestCase {
        let name = match self.full_name {
            Some(full) if !full.trim().is_empty() => full,
            _ => self
                .ancestor_titles
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(self.title.as_str()))
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
        };

        TestCase {
            name,
            file: Some(file.to_string()),
            status: test_status_from_word(&self.status),
            duration_seconds: self.duration.filter(|ms| ms.is_finite()).map(|ms| ms / 1000.0),
            failure_message: clean_message(&self.failure_messages.join("\n")),
        }
    }
}

fn clean_message(text: &str) -> Option<String> {
    let cleaned = strip_ansi(text);
    let trimmed = cleaned.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// A file that failed before any test ran.
fn suite_error(name: &str, status: Option<&str>, message: Option<&str>, had_tests: bool) -> Option<SuiteError> {
    let failed = status.is_some_and(|s| s.eq_ignore_ascii_case("failed"));
    if !failed || had_tests {
        return None;
    }
    Some(SuiteError {
        file: name.to_string(),
        message: message.and_then(clean_message).unwrap_or_default(),
    })
}

/// Decode a JSON test report.
#[must_use]
pub fn decode(raw: &RawOutput) -> TestRunResult {
    let Some(report) = parse_document::<Report>(&raw.stdout) else {
        return TestRunResult::no_data(raw.success());
    };

    let header = report.header();
    let started_at = report
        .start_time
        .filter(|t| t.is_finite())
        .and_then(|t| epoch_millis_to_canonical(t as i64));
    let skipped_reported = report.skipped_reported();
    let (num_total, num_passed, num_failed) =
        (report.num_total_tests, report.num_passed_tests, report.num_failed_tests);

    let mut tests = Vec::new();
    let mut suite_errors = Vec::new();
    let mut header_only = false;

    for file in report.test_results {
        match file {
            FileReport::Detailed(file) => {
                let had_tests = !file.assertion_results.is_empty();
                suite_errors.extend(suite_error(&file.name, file.status.as_deref(), file.message.as_deref(), had_tests));
                tests.extend(file.assertion_results.into_iter().map(|a| a.into_case(&file.name)));
            }
            FileReport::SummaryOnly(file) => {
                header_only = true;
                suite_errors.extend(suite_error(&file.name, file.status.as_deref(), file.message.as_deref(), false));
            }
        }
    }

    if header_only {
        debug!("Report lacks per-test detail, using header counts");
        return TestRunResult {
            success: raw.success(),
            completeness: Completeness::HeaderOnly,
            started_at,
            tests: None,
            suite_errors,
            summary: header,
        };
    }

    let derived = summarize_tests(&tests);
    let summary = TestSummary {
        total: reconcile(OPERATION, "total", derived.total, num_total),
        passed: reconcile(OPERATION, "passed", derived.passed, num_passed),
        failed: reconcile(OPERATION, "failed", derived.failed, num_failed),
        skipped: reconcile(OPERATION, "skipped", derived.skipped, skipped_reported),
    };

    TestRunResult {
        success: raw.success(),
        completeness: Completeness::Complete,
        started_at,
        tests: Some(tests),
        suite_errors,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TestStatus;
    use pretty_assertions::assert_eq;

    const DETAILED: &str = r#"{
      "numTotalTests": 3, "numPassedTests": 1, "numFailedTests": 1, "numPendingTests": 1, "numTodoTests": 0,
      "startTime": 1700000000000,
      "testResults": [{
        "name": "/repo/src/math.test.ts",
        "status": "failed",
        "message": "",
        "assertionResults": [
          {"ancestorTitles": ["math"], "fullName": "math adds", "title": "adds", "status": "passed", "duration": 4, "failureMessages": []},
          {"ancestorTitles": ["math"], "fullName": "math divides", "title": "divides", "status": "failed", "duration": 12,
           "failureMessages": ["\u001b[31mExpected 2\u001b[39m\n  at divide"]},
          {"ancestorTitles": ["math"], "fullName": "math rounds", "title": "rounds", "status": "pending", "duration": null, "failureMessages": []}
        ]
      }]
    }"#;

    #[test]
    fn test_detailed_report() {
        let result = decode(&RawOutput::new(DETAILED).with_exit_code(1));
        assert!(!result.success);
        assert!(result.completeness.is_complete());
        assert_eq!(result.started_at.as_deref(), Some("2023-11-14T22:13:20Z"));

        let tests = result.tests.as_ref().expect("tests decoded");
        assert_eq!(tests.len(), 3);
        assert_eq!(tests[0].name, "math adds");
        assert_eq!(tests[0].duration_seconds, Some(0.004));
        assert_eq!(tests[1].status, TestStatus::Failed);
        assert_eq!(tests[1].failure_message.as_deref(), Some("Expected 2\n  at divide"));
        assert_eq!(tests[2].status, TestStatus::Skipped);
        assert_eq!(tests[2].duration_seconds, None);

        assert_eq!(
            result.summary,
            TestSummary {
                total: 3,
                passed: 1,
                failed: 1,
                skipped: 1,
            }
        );
        assert!(result.suite_errors.is_empty());
    }

    #[test]
    fn test_summary_only_file_uses_header() {
        let report = r#"{
          "numTotalTests": 10, "numPassedTests": 9, "numFailedTests": 1, "numPendingTests": 0,
          "testResults": [{"name": "a.test.ts", "status": "passed"}]
        }"#;
        let result = decode(&RawOutput::new(report));
        assert_eq!(result.completeness, Completeness::HeaderOnly);
        assert_eq!(result.tests, None);
        assert_eq!(result.summary.total, 10);
        assert_eq!(result.summary.failed, 1);
    }

    #[test]
    fn test_suite_failed_to_run() {
        let report = r#"{
          "numTotalTests": 0,
          "testResults": [{"name": "broken.test.ts", "status": "failed",
            "message": "Test suite failed to run\n\nCannot find module './missing'",
            "assertionResults": []}]
        }"#;
        let result = decode(&RawOutput::new(report).with_exit_code(1));
        assert!(result.completeness.is_complete());
        assert_eq!(result.suite_errors.len(), 1);
        assert_eq!(result.suite_errors[0].file, "broken.test.ts");
        assert!(result.suite_errors[0].message.contains("Cannot find module"));
    }

    #[test]
    fn test_unparseable_report_is_no_data() {
        let result = decode(&RawOutput::new("FAIL src/a.test.ts\n  ● boom\n").with_exit_code(1));
        assert_eq!(result.completeness, Completeness::NoData);
        assert_eq!(result.tests, None);
        assert_eq!(result.summary, TestSummary::default());
        assert!(!result.success);
    }

    #[test]
    fn test_name_built_from_titles() {
        let report = r#"{"testResults": [{"name": "f.ts", "assertionResults": [
            {"ancestorTitles": ["outer", "inner"], "title": "works", "status": "passed"}]}]}"#;
        let result = decode(&RawOutput::new(report));
        assert_eq!(result.tests.expect("tests")[0].name, "outer inner works");
    }

    #[test]
    fn test_unknown_status_counts_as_skipped() {
        let report = r#"{"testResults": [{"name": "f.ts", "assertionResults": [
            {"title": "odd", "status": "focused"}]}]}"#;
        let result = decode(&RawOutput::new(report));
        assert_eq!(result.summary.skipped, 1);
        assert_eq!(result.summary.total, 1);
    }

    #[test]
    fn test_huge_header_counts_saturate() {
        let report = r#"{
          "numTotalTests": 1, "numPendingTests": 18446744073709551615, "numTodoTests": 1,
          "testResults": [{"name": "a.test.ts", "status": "passed"}]
        }"#;
        let result = decode(&RawOutput::new(report));
        assert_eq!(result.completeness, Completeness::HeaderOnly);
        assert_eq!(result.summary.skipped, u64::MAX);
    }
}
