//! Istanbul `coverage-summary.json` decoding.
//!
//! The document maps file paths to per-metric objects, plus a `total` key
//! for the whole run. `pct` is a number, or the string `"Unknown"` when
//! the metric has nothing to measure.

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::debug;

use super::{parse_document, RawOutput};
use crate::aggregate::sum_coverage;
use crate::model::{Completeness, CoverageMetric, CoverageResult, CoverageSummary, FileCoverage};

const TOTAL_KEY: &str = "total";

#[derive(Debug, Default, Deserialize)]
struct Entry {
    #[serde(default)]
    lines: Metric,
    #[serde(default)]
    statements: Metric,
    #[serde(default)]
    functions: Metric,
    #[serde(default)]
    branches: Metric,
}

#[derive(Debug, Default, Deserialize)]
struct Metric {
    #[serde(default)]
    total: u64,
    #[serde(default)]
    covered: u64,
    #[serde(default)]
    pct: Option<Pct>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Pct {
    Number(f64),
    Text(String),
}

impl From<Metric> for CoverageMetric {
    fn from(metric: Metric) -> Self {
        let pct = match metric.pct {
            Some(Pct::Number(pct)) if pct.is_finite() => Some(pct),
            Some(Pct::Text(text)) => text.trim().parse::<f64>().ok().filter(|p| p.is_finite()),
            _ => None,
        };
        Self {
            total: metric.total,
            covered: metric.covered,
            pct,
        }
    }
}

impl Entry {
    fn into_file(self, path: String) -> FileCoverage {
        FileCoverage {
            path,
            lines: self.lines.into(),
            statements: self.statements.into(),
            functions: self.functions.into(),
            branches: self.branches.into(),
        }
    }
}

/// Decode an Istanbul JSON summary.
#[must_use]
pub fn decode(raw: &RawOutput) -> CoverageResult {
    let Some(mut doc) = parse_document::<BTreeMap<String, Entry>>(&raw.stdout) else {
        return CoverageResult {
            success: raw.success(),
            completeness: Completeness::NoData,
            files: Vec::new(),
            summary: CoverageSummary::default(),
        };
    };

    let total = doc.remove(TOTAL_KEY);
    let files: Vec<FileCoverage> = doc
        .into_iter()
        .map(|(path, entry)| entry.into_file(path))
        .collect();

    let derived_lines = sum_coverage(&files, |f| f.lines);
    let summary = match total {
        Some(total) => {
            let total = total.into_file(String::new());
            if total.lines.total != derived_lines.total || total.lines.covered != derived_lines.covered {
                debug!(
                    reported = total.lines.total,
                    derived = derived_lines.total,
                    "Reported line totals differ from per-file sums, keeping reported totals"
                );
            }
            CoverageSummary {
                files: files.len(),
                lines: total.lines,
                statements: total.statements,
                functions: total.functions,
                branches: total.branches,
            }
        }
        None => CoverageSummary {
            files: files.len(),
            lines: derived_lines,
            statements: sum_coverage(&files, |f| f.statements),
            functions: sum_coverage(&files, |f| f.functions),
            branches: sum_coverage(&files, |f| f.branches),
        },
    };

    CoverageResult {
        success: raw.success(),
        completeness: Completeness::Complete,
        files,
        summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SUMMARY: &str = r#"{
      "total": {
        "lines": {"total": 20, "covered": 15, "skipped": 0, "pct": 75},
        "statements": {"total": 22, "covered": 16, "skipped": 0, "pct": 72.72},
        "functions": {"total": 4, "covered": 3, "skipped": 0, "pct": 75},
        "branches": {"total": 0, "covered": 0, "skipped": 0, "pct": "Unknown"}
      },
      "/repo/src/b.ts": {
        "lines": {"total": 10, "covered": 10, "skipped": 0, "pct": 100},
        "statements": {"total": 11, "covered": 11, "skipped": 0, "pct": 100},
        "functions": {"total": 2, "covered": 2, "skipped": 0, "pct": 100},
        "branches": {"total": 0, "covered": 0, "skipped": 0, "pct": "Unknown"}
      },
      "/repo/src/a.ts": {
        "lines": {"total": 10, "covered": 5, "skipped": 0, "pct": 50},
        "statements": {"total": 11, "covered": 5, "skipped": 0, "pct": 45.45},
        "functions": {"total": 2, "covered": 1, "skipped": 0, "pct": 50},
        "branches": {"total": 0, "covered": 0, "skipped": 0, "pct": "Unknown"}
      }
    }"#;

    #[test]
    fn test_summary_document() {
        let result = decode(&RawOutput::new(SUMMARY));
        assert!(result.completeness.is_complete());
        assert_eq!(result.files.len(), 2);
        assert_eq!(result.files[0].path, "/repo/src/a.ts");
        assert_eq!(result.files[0].lines.pct, Some(50.0));
        assert_eq!(result.files[0].branches.pct, None);

        assert_eq!(result.summary.files, 2);
        assert_eq!(result.summary.lines.total, 20);
        assert_eq!(result.summary.lines.pct, Some(75.0));
        assert_eq!(result.summary.statements.pct, Some(72.72));
        assert_eq!(result.summary.branches.pct, None);
    }

    #[test]
    fn test_missing_total_is_derived() {
        let doc = r#"{
          "a.ts": {"lines": {"total": 3, "covered": 1, "pct": 33.33}},
          "b.ts": {"lines": {"total": 1, "covered": 1, "pct": 100}}
        }"#;
        let result = decode(&RawOutput::new(doc));
        assert_eq!(result.summary.lines.total, 4);
        assert_eq!(result.summary.lines.covered, 2);
        assert_eq!(result.summary.lines.pct, Some(50.0));
        assert_eq!(result.summary.branches.pct, None);
    }

    #[test]
    fn test_unparseable_is_no_data() {
        let result = decode(&RawOutput::new("ERROR: Coverage for lines (42%) does not meet global threshold").with_exit_code(1));
        assert_eq!(result.completeness, Completeness::NoData);
        assert!(!result.success);
        assert!(result.files.is_empty());
    }
}
