//! Lint diagnostics.

use serde::{Deserialize, Serialize};

use super::{Completeness, LintSource};

/// Canonical three-level severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Must be fixed.
    Error,
    /// Should be looked at.
    Warning,
    /// Informational, hints and style.
    Info,
}

impl Severity {
    /// Lowercase display name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

/// One diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// File the diagnostic points at.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// 1-based line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// 1-based column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    /// Canonical severity.
    pub severity: Severity,
    /// Rule or lint code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    /// Diagnostic text.
    pub message: String,
}

/// Diagnostic counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LintSummary {
    /// All diagnostics.
    pub total: usize,
    /// Error-level diagnostics.
    pub errors: usize,
    /// Warning-level diagnostics.
    pub warnings: usize,
    /// Info-level diagnostics.
    pub infos: usize,
    /// Distinct files with at least one diagnostic.
    pub files: usize,
}

/// Result of a lint run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LintResult {
    /// Tool exit classification.
    pub success: bool,
    /// `no_data` when the report could not be decoded.
    #[serde(default)]
    pub completeness: Completeness,
    /// Tool that produced the diagnostics.
    pub source: LintSource,
    /// Diagnostics in report order.
    pub diagnostics: Vec<Diagnostic>,
    /// Derived counts.
    pub summary: LintSummary,
}
