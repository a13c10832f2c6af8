//! `git status --porcelain=v1 -b` decoding.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

use super::lines::{content_lines, split_arrow_rename, unquote_path};
use super::RawOutput;
use crate::aggregate::summarize_status;
use crate::classify::{classify_status_code, StatusPair};
use crate::model::{ChangeKind, StatusEntry, StatusResult, StatusSummary};

static BRANCH_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^## (?:No commits yet on |Initial commit on )?(?P<branch>.+?)(?:\.\.\.(?P<upstream>\S+))?(?: \[(?P<track>[^\]]*)\])?$",
    )
    .expect("branch header pattern is valid")
});

static AHEAD: Lazy<Regex> = Lazy::new(|| Regex::new(r"ahead (\d+)").expect("ahead pattern is valid"));
static BEHIND: Lazy<Regex> = Lazy::new(|| Regex::new(r"behind (\d+)").expect("behind pattern is valid"));

const DETACHED_BRANCH: &str = "HEAD (no branch)";

/// Decode porcelain v1 status output.
#[must_use]
pub fn decode(raw: &RawOutput) -> StatusResult {
    let mut result = StatusResult {
        success: raw.success(),
        branch: None,
        upstream: None,
        ahead: 0,
        behind: 0,
        detached: false,
        staged: Vec::new(),
        unstaged: Vec::new(),
        untracked: Vec::new(),
        conflicts: Vec::new(),
        ignored: Vec::new(),
        summary: StatusSummary::default(),
        clean: true,
        error: raw.error_text(),
    };

    for line in content_lines(&raw.stdout) {
        if line.starts_with("## ") {
            parse_branch_header(line, &mut result);
            continue;
        }
        if !parse_entry(line, &mut result) {
            trace!(line, "Not a status entry, skipping");
        }
    }

    result.summary = summarize_status(&result);
    result.clean = result.summary.total == 0;
    result
}

fn parse_branch_header(line: &str, result: &mut StatusResult) {
    let Some(caps) = BRANCH_HEADER.captures(line) else {
        trace!(line, "Unrecognized branch header");
        return;
    };

    let branch = &caps["branch"];
    if branch == DETACHED_BRANCH {
        result.detached = true;
    } else {
        result.branch = Some(branch.to_string());
    }
    result.upstream = caps.name("upstream").map(|m| m.as_str().to_string());

    if let Some(track) = caps.name("track").map(|m| m.as_str()) {
        result.ahead = AHEAD
            .captures(track)
            .and_then(|c| c[1].parse().ok())
            .unwrap_or(0);
        result.behind = BEHIND
            .captures(track)
            .and_then(|c| c[1].parse().ok())
            .unwrap_or(0);
    }
}

/// Route one `XY PATH` line. Returns `false` when the line is not an entry.
fn parse_entry(line: &str, result: &mut StatusResult) -> bool {
    let (Some(code), Some(rest)) = (line.get(..2), line.get(3..)) else {
        return false;
    };
    if line.as_bytes().get(2) != Some(&b' ') || rest.is_empty() {
        return false;
    }

    let pair = classify_status_code(code);
    let is_rename = |kind: Option<ChangeKind>| matches!(kind, Some(ChangeKind::Renamed | ChangeKind::Copied));
    let (old_path, path) = if is_rename(pair.index) || is_rename(pair.worktree) {
        split_arrow_rename(rest)
    } else {
        (None, unquote_path(rest))
    };

    route(pair, path, old_path, result);
    true
}

fn route(pair: StatusPair, path: String, old_path: Option<String>, result: &mut StatusResult) {
    if pair.conflict {
        result.conflicts.push(path);
        return;
    }
    if pair.untracked {
        result.untracked.push(path);
        return;
    }
    if pair.ignored {
        result.ignored.push(path);
        return;
    }

    let entry = |status: ChangeKind| StatusEntry {
        path: path.clone(),
        status,
        old_path: matches!(status, ChangeKind::Renamed | ChangeKind::Copied)
            .then(|| old_path.clone())
            .flatten(),
    };

    if let Some(kind) = pair.index {
        result.staged.push(entry(kind));
    }
    if let Some(kind) = pair.worktree {
        result.unstaged.push(entry(kind));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn status(stdout: &str) -> StatusResult {
        decode(&RawOutput::new(stdout))
    }

    #[test]
    fn test_clean_repository() {
        let result = status("## main...origin/main\n");
        assert!(result.success);
        assert!(result.clean);
        assert_eq!(result.branch.as_deref(), Some("main"));
        assert_eq!(result.upstream.as_deref(), Some("origin/main"));
        assert_eq!(result.summary.total, 0);
    }

    #[test]
    fn test_ahead_behind() {
        let result = status("## feature/x...origin/feature/x [ahead 2, behind 3]\n");
        assert_eq!(result.branch.as_deref(), Some("feature/x"));
        assert_eq!(result.ahead, 2);
        assert_eq!(result.behind, 3);

        let gone = status("## topic...origin/topic [gone]\n");
        assert_eq!(gone.ahead, 0);
        assert_eq!(gone.upstream.as_deref(), Some("origin/topic"));
    }

    #[test]
    fn test_detached_and_unborn() {
        let detached = status("## HEAD (no branch)\n M a.rs\n");
        assert!(detached.detached);
        assert_eq!(detached.branch, None);

        let unborn = status("## No commits yet on main\n?? README.md\n");
        assert_eq!(unborn.branch.as_deref(), Some("main"));
        assert_eq!(unborn.untracked, vec!["README.md"]);
    }

    #[test]
    fn test_both_sides_recorded() {
        let result = status("## main\nMM src/lib.rs\nA  new.rs\n D gone.rs\n");
        assert_eq!(result.staged.len(), 2);
        assert_eq!(result.unstaged.len(), 2);
        assert_eq!(result.staged[0].status, ChangeKind::Modified);
        assert_eq!(result.staged[1].status, ChangeKind::Added);
        assert_eq!(result.unstaged[1].status, ChangeKind::Deleted);
        assert_eq!(result.summary.total, 4);
        assert!(!result.clean);
    }

    #[test]
    fn test_conflicts_exclusive() {
        let result = status("UU both.rs\nAA added.rs\nDU deleted-by-us.rs\n");
        assert_eq!(result.conflicts, vec!["both.rs", "added.rs", "deleted-by-us.rs"]);
        assert!(result.staged.is_empty());
        assert!(result.unstaged.is_empty());
    }

    #[test]
    fn test_both_deleted_is_staged_deletion() {
        let result = status("DD removed.rs\n");
        assert!(result.conflicts.is_empty());
        assert_eq!(result.staged.len(), 1);
        assert_eq!(result.staged[0].status, ChangeKind::Deleted);
        assert!(result.unstaged.is_empty());
    }

    #[test]
    fn test_rename_and_quoted_paths() {
        let result = status("R  old.rs -> new.rs\n?? \"with space.txt\"\n");
        assert_eq!(
            result.staged[0],
            StatusEntry {
                path: "new.rs".into(),
                status: ChangeKind::Renamed,
                old_path: Some("old.rs".into()),
            }
        );
        assert_eq!(result.untracked, vec!["with space.txt"]);
    }

    #[test]
    fn test_ignored_not_counted() {
        let result = status("!! target/\n");
        assert_eq!(result.ignored, vec!["target/"]);
        assert!(result.clean);
    }

    #[test]
    fn test_failure_keeps_stderr() {
        let raw = RawOutput::new("")
            .with_stderr("fatal: not a git repository (or any of the parent directories): .git\n")
            .with_exit_code(128);
        let result = decode(&raw);
        assert!(!result.success);
        assert!(result.error.as_deref().is_some_and(|e| e.starts_with("fatal:")));
        assert!(result.clean);
    }

    #[test]
    fn test_noise_lines_skipped() {
        let result = status("warning: something odd\n## main\n M a.rs\n");
        assert_eq!(result.unstaged.len(), 1);
    }

    #[test]
    fn test_short_octal_escape_before_multibyte() {
        let result = status("?? \"\\12é\"\n");
        assert_eq!(result.untracked, vec!["\né"]);
    }
}
