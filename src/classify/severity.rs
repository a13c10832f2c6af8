//! Severity vocabularies.

use crate::model::Severity;

/// Map a word-based severity level to the canonical three levels.
///
/// `fatal`/`critical` fold into error; `hint`, `style`, `information`,
/// `note` and `help` fold into info. Anything unrecognized is a warning.
#[must_use]
pub fn severity_from_level(level: &str) -> Severity {
    let lower = level.trim().to_ascii_lowercase();
    match lower.as_str() {
        "error" | "err" | "fatal" | "critical" | "failure" => Severity::Error,
        "warning" | "warn" => Severity::Warning,
        "info" | "information" | "informational" | "hint" | "style" | "note" | "help" | "suggestion" => {
            Severity::Info
        }
        // rustc prefixes internal compiler errors, e.g. "error: internal compiler error"
        other if other.starts_with("error") => Severity::Error,
        _ => Severity::Warning,
    }
}

/// Map an ESLint-style numeric severity (0 off, 1 warn, 2 error).
///
/// Out-of-range values are warnings.
#[must_use]
pub fn severity_from_number(level: i64) -> Severity {
    match level {
        2 => Severity::Error,
        1 => Severity::Warning,
        0 => Severity::Info,
        _ => Severity::Warning,
    }
}
