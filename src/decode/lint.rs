//! Linter report decoding.
//!
//! | Source     | Shape                            | Severity vocabulary       |
//! |------------|----------------------------------|---------------------------|
//! | ESLint     | one JSON array of file results   | `2` / `1` / `0`           |
//! | Cargo      | one JSON object per line         | `error`, `warning`, `note`|
//! | ShellCheck | `json1` object or legacy array   | `error`, `warning`, `info`, `style` |

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, trace};

use super::{parse_document, JsonLinesDecoder, RawOutput};
use crate::aggregate::{reconcile, summarize_lint};
use crate::classify::{severity_from_level, severity_from_number};
use crate::model::{Completeness, Diagnostic, LintResult, LintSource, LintSummary, Severity};

/// Compiler epilogue messages that summarize rather than diagnose.
static CARGO_EPILOGUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:\d+ (?:warnings?|errors?)(?: and \d+ (?:warnings?|errors?))? emitted|aborting due to|Some errors have detailed explanations|For more information about)",
    )
    .expect("epilogue pattern is valid")
});

fn finish(raw: &RawOutput, source: LintSource, completeness: Completeness, diagnostics: Vec<Diagnostic>) -> LintResult {
    let summary = summarize_lint(&diagnostics);
    LintResult {
        success: raw.success(),
        completeness,
        source,
        diagnostics,
        summary,
    }
}

fn no_data(raw: &RawOutput, source: LintSource) -> LintResult {
    LintResult {
        success: raw.success(),
        completeness: Completeness::NoData,
        source,
        diagnostics: Vec::new(),
        summary: LintSummary::default(),
    }
}

/// Whether the stream has anything besides whitespace.
fn has_content(text: &str) -> bool {
    !text.trim().is_empty()
}

// ESLint ----------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EslintFile {
    file_path: String,
    #[serde(default)]
    messages: Vec<EslintMessage>,
    #[serde(default)]
    error_count: Option<u64>,
    #[serde(default)]
    warning_count: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EslintMessage {
    #[serde(default)]
    rule_id: Option<String>,
    #[serde(default)]
    severity: i64,
    #[serde(default)]
    fatal: bool,
    message: String,
    #[serde(default)]
    line: Option<u32>,
    #[serde(default)]
    column: Option<u32>,
}

/// Decode `eslint -f json` output.
#[must_use]
pub fn decode_eslint(raw: &RawOutput) -> LintResult {
    let source = LintSource::Eslint;
    if !has_content(&raw.stdout) {
        return finish(raw, source, Completeness::Complete, Vec::new());
    }
    let Some(files) = parse_document::<Vec<EslintFile>>(&raw.stdout) else {
        return no_data(raw, source);
    };

    let sum_reported = |count: fn(&EslintFile) -> Option<u64>| -> Option<u64> {
        files.iter().map(count).try_fold(0u64, |acc, c| c.and_then(|c| acc.checked_add(c)))
    };
    let errors_reported = sum_reported(|f| f.error_count);
    let warnings_reported = sum_reported(|f| f.warning_count);

    let diagnostics: Vec<Diagnostic> = files
        .iter()
        .flat_map(|file| {
            file.messages.iter().map(move |m| Diagnostic {
                file: Some(file.file_path.clone()),
                line: m.line,
                column: m.column,
                severity: if m.fatal { Severity::Error } else { severity_from_number(m.severity) },
                rule: m.rule_id.clone(),
                message: m.message.clone(),
            })
        })
        .collect();

    let result = finish(raw, source, Completeness::Complete, diagnostics);
    reconcile("lint", "errors", result.summary.errors as u64, errors_reported);
    reconcile("lint", "warnings", result.summary.warnings as u64, warnings_reported);
    result
}

// Cargo -----------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CargoLine {
    Message(CargoMessage),
    Other {
        #[allow(dead_code)]
        reason: String,
    },
}

#[derive(Debug, Deserialize)]
struct CargoMessage {
    reason: String,
    message: RustcDiagnostic,
}

#[derive(Debug, Deserialize)]
struct RustcDiagnostic {
    message: String,
    level: String,
    #[serde(default)]
    code: Option<RustcCode>,
    #[serde(default)]
    spans: Vec<RustcSpan>,
}

#[derive(Debug, Deserialize)]
struct RustcCode {
    code: String,
}

#[derive(Debug, Deserialize)]
struct RustcSpan {
    file_name: String,
    line_start: u32,
    column_start: u32,
    #[serde(default)]
    is_primary: bool,
}

impl RustcDiagnostic {
    fn is_epilogue(&self) -> bool {
        self.level == "failure-note" || CARGO_EPILOGUE.is_match(&self.message)
    }

    fn into_diagnostic(self) -> Diagnostic {
        let span = self
            .spans
            .iter()
            .find(|s| s.is_primary)
            .or_else(|| self.spans.first());
        Diagnostic {
            file: span.map(|s| s.file_name.clone()),
            line: span.map(|s| s.line_start),
            column: span.map(|s| s.column_start),
            severity: severity_from_level(&self.level),
            rule: self.code.map(|c| c.code),
            message: self.message,
        }
    }
}

/// Decode `cargo check|clippy --message-format=json` output.
#[must_use]
pub fn decode_cargo(raw: &RawOutput) -> LintResult {
    let source = LintSource::Cargo;
    let mut decoder = JsonLinesDecoder::new();
    let lines: Vec<CargoLine> = decoder.decode(&raw.stdout);
    let stats = decoder.stats();
    if stats.nothing_decoded() {
        if let Some(first) = stats.skipped.first() {
            debug!(line = first.line, error = %first.message, preview = %first.content_preview, "No cargo messages decoded");
        }
        return no_data(raw, source);
    }

    let diagnostics: Vec<Diagnostic> = lines
        .into_iter()
        .filter_map(|line| match line {
            CargoLine::Message(m) if m.reason == "compiler-message" => Some(m.message),
            _ => None,
        })
        .filter(|d| {
            let keep = !d.is_epilogue();
            if !keep {
                trace!(message = %d.message, "Skipping compiler epilogue");
            }
            keep
        })
        .map(RustcDiagnostic::into_diagnostic)
        .collect();

    debug!(diagnostics = diagnostics.len(), "Decoded compiler messages");
    finish(raw, source, Completeness::Complete, diagnostics)
}

// ShellCheck ------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ShellcheckReport {
    Json1 { comments: Vec<ShellcheckComment> },
    Legacy(Vec<ShellcheckComment>),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ShellcheckComment {
    file: String,
    line: u32,
    column: u32,
    level: String,
    code: u64,
    message: String,
}

/// Decode `shellcheck -f json1` (or legacy `-f json`) output.
#[must_use]
pub fn decode_shellcheck(raw: &RawOutput) -> LintResult {
    let source = LintSource::Shellcheck;
    if !has_content(&raw.stdout) {
        return finish(raw, source, Completeness::Complete, Vec::new());
    }
    let Some(report) = parse_document::<ShellcheckReport>(&raw.stdout) else {
        return no_data(raw, source);
    };

    let comments = match report {
        ShellcheckReport::Json1 { comments } | ShellcheckReport::Legacy(comments) => comments,
    };
    let diagnostics = comments
        .into_iter()
        .map(|c| Diagnostic {
            file: Some(c.file),
            line: Some(c.line),
            column: Some(c.column),
            severity: severity_from_level(&c.level),
            rule: Some(format!("SC{}", c.code)),
            message: c.message,
        })
        .collect();

    finish(raw, source, Completeness::Complete, diagnostics)
}
