//! Test runner results.

use serde::{Deserialize, Serialize};

use super::Completeness;

/// Canonical test case outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TestStatus {
    /// Test passed.
    Passed,
    /// Test failed.
    Failed,
    /// Test skipped, pending or disabled.
    Skipped,
    /// Test declared as todo.
    Todo,
}

impl TestStatus {
    /// Lowercase display name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
            Self::Todo => "todo",
        }
    }
}

/// One test case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    /// Full test name including ancestor titles.
    pub name: String,
    /// Test file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Outcome.
    pub status: TestStatus,
    /// Reported duration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,
    /// Failure messages joined with newlines, ANSI escapes removed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure_message: Option<String>,
}

/// A test file that failed before producing results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteError {
    /// Test file.
    pub file: String,
    /// Error message, ANSI escapes removed.
    pub message: String,
}

/// Test counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSummary {
    /// All tests.
    pub total: u64,
    /// Passed tests.
    pub passed: u64,
    /// Failed tests.
    pub failed: u64,
    /// Skipped, pending and todo tests.
    pub skipped: u64,
}

/// Result of a test run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestRunResult {
    /// Tool exit classification.
    pub success: bool,
    /// Whether per-test records were available.
    #[serde(default)]
    pub completeness: Completeness,
    /// Run start time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    /// Per-test records; omitted when only reporter totals were available.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tests: Option<Vec<TestCase>>,
    /// Files that failed to run.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub suite_errors: Vec<SuiteError>,
    /// Counts.
    pub summary: TestSummary,
}

impl TestRunResult {
    /// A run whose report could not be decoded.
    #[must_use]
    pub fn no_data(success: bool) -> Self {
        Self {
            success,
            completeness: Completeness::NoData,
            started_at: None,
            tests: None,
            suite_errors: Vec::new(),
            summary: TestSummary::default(),
        }
    }
}
