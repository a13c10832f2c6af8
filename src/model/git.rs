//! Git status and diff results.

use serde::{Deserialize, Serialize};

use super::{is_false, Completeness};

/// Canonical kind of change for a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    /// Newly added path.
    Added,
    /// Content or mode changed.
    Modified,
    /// Path removed.
    Deleted,
    /// Path moved (old path recorded separately).
    Renamed,
    /// Path copied (source path recorded separately).
    Copied,
    /// Unresolved merge state.
    Conflict,
}

impl ChangeKind {
    /// Lowercase display name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Deleted => "deleted",
            Self::Renamed => "renamed",
            Self::Copied => "copied",
            Self::Conflict => "conflict",
        }
    }
}

/// One path in the index or work tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    /// Current path.
    pub path: String,
    /// Kind of change on this side.
    pub status: ChangeKind,
    /// Source path for renames and copies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_path: Option<String>,
}

/// Derived counts for a status result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    /// Index-side changes.
    pub staged: usize,
    /// Work-tree-side changes.
    pub unstaged: usize,
    /// Untracked paths.
    pub untracked: usize,
    /// Unmerged paths.
    pub conflicts: usize,
    /// Sum of the above.
    pub total: usize,
}

/// Result of `git status --porcelain=v1 -b`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResult {
    /// Tool exit classification.
    pub success: bool,
    /// Current branch; absent when detached.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Tracking branch, when configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream: Option<String>,
    /// Commits ahead of upstream.
    #[serde(default)]
    pub ahead: u32,
    /// Commits behind upstream.
    #[serde(default)]
    pub behind: u32,
    /// HEAD is detached.
    #[serde(default, skip_serializing_if = "is_false")]
    pub detached: bool,
    /// Changes recorded in the index.
    pub staged: Vec<StatusEntry>,
    /// Changes in the work tree not yet staged.
    pub unstaged: Vec<StatusEntry>,
    /// Untracked paths.
    pub untracked: Vec<String>,
    /// Paths with unresolved merge conflicts.
    pub conflicts: Vec<String>,
    /// Ignored paths (only reported with `--ignored`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignored: Vec<String>,
    /// Derived counts.
    pub summary: StatusSummary,
    /// No staged, unstaged, untracked or conflicting paths.
    pub clean: bool,
    /// Tool error output on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One file in a numstat diff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffFile {
    /// Current path.
    pub path: String,
    /// Previous path for renames.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_path: Option<String>,
    /// Renamed or modified.
    pub status: ChangeKind,
    /// Added lines (0 for binary files).
    pub additions: u64,
    /// Deleted lines (0 for binary files).
    pub deletions: u64,
    /// Binary file; line counts are unavailable.
    #[serde(default, skip_serializing_if = "is_false")]
    pub binary: bool,
}

/// Diff totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffSummary {
    /// Number of files changed.
    pub files_changed: u64,
    /// Total added lines.
    pub total_additions: u64,
    /// Total deleted lines.
    pub total_deletions: u64,
}

/// Result of `git diff --numstat`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffResult {
    /// Tool exit classification.
    pub success: bool,
    /// Whether the file list was available.
    #[serde(default)]
    pub completeness: Completeness,
    /// Per-file statistics; omitted when only a `--shortstat` line was present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<DiffFile>>,
    /// Totals.
    pub summary: DiffSummary,
    /// Tool error output on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DiffResult {
    /// A diff with no changed files.
    #[must_use]
    pub fn empty(success: bool) -> Self {
        Self {
            success,
            completeness: Completeness::Complete,
            files: Some(Vec::new()),
            summary: DiffSummary::default(),
            error: None,
        }
    }
}
