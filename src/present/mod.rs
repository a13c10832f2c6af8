//! Deterministic text rendering.
//!
//! Every result renders as a one-line header carrying the success state and
//! top-level counts, followed by zero or more detail sections. Sections with
//! nothing in them are left out, so a clean run is a single line.
//!
//! Renderers write into an explicit [`LineBuilder`] passed down the call
//! chain.
//!
//! # Example
//!
//! ```rust
//! use tool_digest::model::{CanonicalResult, DiffResult};
//! use tool_digest::present::Present;
//!
//! let result = CanonicalResult::GitDiff(DiffResult::empty(true));
//! assert_eq!(result.present(), "git diff ok: no changes");
//! ```

mod canonical;
mod compact;

use std::fmt::Display;

use crate::model::{Completeness, CoverageMetric};

const INDENT: &str = "  ";

/// Accumulates output lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuilder {
    lines: Vec<String>,
    depth: usize,
}

impl LineBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a line at the current indentation.
    pub fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        let text = text.as_ref();
        let mut line = INDENT.repeat(self.depth);
        line.push_str(text);
        self.lines.push(line);
        self
    }

    /// Append a section title and render its items one level deeper.
    ///
    /// Nothing is written when `items` is empty.
    pub fn section<T, F>(&mut self, title: &str, items: &[T], mut render: F) -> &mut Self
    where
        F: FnMut(&mut Self, &T),
    {
        if items.is_empty() {
            return self;
        }
        self.line(format!("{title}:"));
        self.depth += 1;
        for item in items {
            render(self, item);
        }
        self.depth -= 1;
        self
    }

    /// Render a closure one level deeper.
    pub fn indented<F: FnOnce(&mut Self)>(&mut self, render: F) -> &mut Self {
        self.depth += 1;
        render(self);
        self.depth -= 1;
        self
    }

    /// Join the lines with newlines. No trailing newline.
    #[must_use]
    pub fn finish(self) -> String {
        self.lines.join("\n")
    }
}

/// Text rendering for canonical results and compact projections.
pub trait Present {
    /// Write this value into `out`.
    fn render(&self, out: &mut LineBuilder);

    /// Render to a string.
    fn present(&self) -> String {
        let mut out = LineBuilder::new();
        self.render(&mut out);
        out.finish()
    }
}

/// `"1 file"`, `"3 files"`.
pub fn plural<N>(count: N, one: &str, many: &str) -> String
where
    N: Display + PartialEq + From<u8>,
{
    let noun = if count == N::from(1) { one } else { many };
    format!("{count} {noun}")
}

pub(crate) fn state(success: bool) -> &'static str {
    if success {
        "ok"
    } else {
        "failed"
    }
}

/// `"{label} ok: {detail}"`.
pub(crate) fn header(label: &str, success: bool, detail: &str) -> String {
    format!("{label} {}: {detail}", state(success))
}

/// Joins the non-empty parts with `", "`, or returns `fallback`.
pub(crate) fn counts(parts: &[Option<String>], fallback: &str) -> String {
    let present: Vec<&str> = parts.iter().flatten().map(String::as_str).collect();
    if present.is_empty() {
        fallback.to_string()
    } else {
        present.join(", ")
    }
}

/// Some(`plural(...)`) when `count` is non-zero.
pub(crate) fn nonzero<N>(count: N, one: &str, many: &str) -> Option<String>
where
    N: Display + PartialEq + From<u8>,
{
    (count != N::from(0)).then(|| plural(count, one, many))
}

pub(crate) fn completeness_note(out: &mut LineBuilder, completeness: Completeness) {
    match completeness {
        Completeness::Complete => {}
        Completeness::HeaderOnly => {
            out.line("(summary line only; per-item details unavailable)");
        }
        Completeness::NoData => {
            out.line("(no recognizable output)");
        }
    }
}

pub(crate) fn error_lines(out: &mut LineBuilder, error: Option<&str>) {
    let Some(error) = error else { return };
    let mut lines = error.lines().filter(|l| !l.trim().is_empty());
    if let Some(first) = lines.next() {
        out.line(format!("error: {first}"));
        out.indented(|out| {
            for rest in lines {
                out.line(rest.trim_end());
            }
        });
    }
}

/// Multi-line messages, one level deeper, blank lines dropped.
pub(crate) fn message_lines(out: &mut LineBuilder, message: &str) {
    out.indented(|out| {
        for line in message.lines().map(str::trim).filter(|l| !l.is_empty()) {
            out.line(line);
        }
    });
}

pub(crate) fn pct(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |p| format!("{p:.2}%"))
}

pub(crate) fn metric(metric: &CoverageMetric) -> String {
    format!("{} ({}/{})", pct(metric.pct), metric.covered, metric.total)
}

pub(crate) fn location(file: Option<&str>, line: Option<u32>, column: Option<u32>) -> String {
    let mut loc = file.unwrap_or("<unknown>").to_string();
    if let Some(line) = line {
        loc.push_str(&format!(":{line}"));
        if let Some(column) = column {
            loc.push_str(&format!(":{column}"));
        }
    }
    loc
}

pub(crate) fn branch_label(branch: Option<&str>, ahead: u32, behind: u32) -> String {
    let mut label = branch.unwrap_or("(no branch)").to_string();
    let tracking = counts(
        &[
            (ahead > 0).then(|| format!("ahead {ahead}")),
            (behind > 0).then(|| format!("behind {behind}")),
        ],
        "",
    );
    if !tracking.is_empty() {
        label.push_str(&format!(" [{tracking}]"));
    }
    label
}
