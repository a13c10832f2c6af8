//! `git diff --numstat` / `--shortstat` decoding.
//!
//! Numstat rows give per-file counts; binary files print `-` for both.
//! When only the shortstat summary line is available the result is
//! header-sourced: file records are omitted rather than fabricated.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, trace};

use super::lines::{content_lines, expand_numstat_rename, unquote_path};
use super::RawOutput;
use crate::aggregate::{reconcile, summarize_diff};
use crate::model::{ChangeKind, Completeness, DiffFile, DiffResult, DiffSummary};

const OPERATION: &str = "git_diff";

static NUMSTAT_ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+|-)\t(\d+|-)\t(.+)$").expect("numstat pattern is valid"));

static SHORTSTAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(\d+) files? changed(?:, (\d+) insertions?\(\+\))?(?:, (\d+) deletions?\(-\))?\s*$")
        .expect("shortstat pattern is valid")
});

/// Decode numstat rows, a shortstat line, or both.
#[must_use]
pub fn decode(raw: &RawOutput) -> DiffResult {
    let mut files = Vec::new();
    let mut header: Option<DiffSummary> = None;
    let mut unrecognized = 0usize;

    for line in content_lines(&raw.stdout) {
        if let Some(file) = parse_numstat_row(line) {
            files.push(file);
        } else if let Some(summary) = parse_shortstat(line) {
            header = Some(summary);
        } else {
            unrecognized += 1;
            trace!(line, "Not a numstat row, skipping");
        }
    }

    let mut result = DiffResult::empty(raw.success());
    result.error = raw.error_text();

    if !files.is_empty() {
        let derived = summarize_diff(&files);
        result.summary = DiffSummary {
            files_changed: reconcile(OPERATION, "files_changed", derived.files_changed, header.map(|h| h.files_changed)),
            total_additions: reconcile(OPERATION, "total_additions", derived.total_additions, header.map(|h| h.total_additions)),
            total_deletions: reconcile(OPERATION, "total_deletions", derived.total_deletions, header.map(|h| h.total_deletions)),
        };
        result.files = Some(files);
    } else if let Some(summary) = header {
        debug!("Only a shortstat summary is available");
        result.completeness = Completeness::HeaderOnly;
        result.files = None;
        result.summary = summary;
    } else if unrecognized > 0 {
        result.completeness = Completeness::NoData;
        result.files = None;
    }

    result
}

fn parse_numstat_row(line: &str) -> Option<DiffFile> {
    let caps = NUMSTAT_ROW.captures(line)?;
    let binary = &caps[1] == "-" && &caps[2] == "-";
    let additions = caps[1].parse().unwrap_or(0);
    let deletions = caps[2].parse().unwrap_or(0);

    let target = &caps[3];
    let (path, old_path, status) = match expand_numstat_rename(target) {
        Some((old, new)) => (new, Some(old), ChangeKind::Renamed),
        None => (unquote_path(target), None, ChangeKind::Modified),
    };

    Some(DiffFile {
        path,
        old_path,
        status,
        additions,
        deletions,
        binary,
    })
}

fn parse_shortstat(line: &str) -> Option<DiffSummary> {
    let caps = SHORTSTAT.captures(line)?;
    let count = |idx: usize| {
        caps.get(idx)
            .and_then(|m| m.as_str().parse().ok())
            .unwrap_or(0)
    };
    Some(DiffSummary {
        files_changed: count(1),
        total_additions: count(2),
        total_deletions: count(3),
    })
}
