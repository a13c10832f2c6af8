//! Coverage summaries.

use serde::{Deserialize, Serialize};

use super::Completeness;

/// One coverage dimension (lines, statements, functions or branches).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageMetric {
    /// Coverable items.
    pub total: u64,
    /// Covered items.
    pub covered: u64,
    /// Percentage as reported; absent when the tool reports `Unknown`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pct: Option<f64>,
}

/// Coverage for one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileCoverage {
    /// File path as reported.
    pub path: String,
    /// Line coverage.
    pub lines: CoverageMetric,
    /// Statement coverage.
    pub statements: CoverageMetric,
    /// Function coverage.
    pub functions: CoverageMetric,
    /// Branch coverage.
    pub branches: CoverageMetric,
}

/// Totals across all files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CoverageSummary {
    /// Number of files in the report.
    pub files: usize,
    /// Line coverage.
    pub lines: CoverageMetric,
    /// Statement coverage.
    pub statements: CoverageMetric,
    /// Function coverage.
    pub functions: CoverageMetric,
    /// Branch coverage.
    pub branches: CoverageMetric,
}

/// Result of reading a coverage summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageResult {
    /// Tool exit classification.
    pub success: bool,
    /// `no_data` when the report could not be decoded.
    #[serde(default)]
    pub completeness: Completeness,
    /// Per-file coverage, sorted by path.
    pub files: Vec<FileCoverage>,
    /// Totals; taken from the report's own `total` entry when present.
    pub summary: CoverageSummary,
}
