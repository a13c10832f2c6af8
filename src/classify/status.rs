//! Two-letter porcelain status codes.
//!
//! `X` is the index side and `Y` the work tree side. Unmerged states are
//! any pair containing `U`, plus `AA` (both added). `DD` (both deleted)
//! is deliberately *not* treated as a conflict: it is reported as a staged
//! deletion only. Whether that asymmetry is intended upstream is still an
//! open question, so it is preserved as observed.

use crate::model::ChangeKind;

/// Classification of one `XY` status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusPair {
    /// Change recorded in the index.
    pub index: Option<ChangeKind>,
    /// Change in the work tree.
    pub worktree: Option<ChangeKind>,
    /// Unresolved merge state; `index`/`worktree` are empty when set.
    pub conflict: bool,
    /// `??` untracked path.
    pub untracked: bool,
    /// `!!` ignored path.
    pub ignored: bool,
}

impl StatusPair {
    /// Collapse to a single kind: conflict, then the index side, then the
    /// work tree side.
    #[must_use]
    pub fn kind(&self) -> ChangeKind {
        if self.conflict {
            return ChangeKind::Conflict;
        }
        if self.untracked {
            return ChangeKind::Added;
        }
        self.index.or(self.worktree).unwrap_or(ChangeKind::Modified)
    }
}

/// Map a single status letter. Blank and `.` mean "unchanged".
///
/// Unknown letters map to [`ChangeKind::Modified`].
#[must_use]
pub fn classify_status_char(c: char) -> Option<ChangeKind> {
    match c {
        ' ' | '.' => None,
        'A' => Some(ChangeKind::Added),
        'M' | 'T' => Some(ChangeKind::Modified),
        'D' => Some(ChangeKind::Deleted),
        'R' => Some(ChangeKind::Renamed),
        'C' => Some(ChangeKind::Copied),
        'U' => Some(ChangeKind::Conflict),
        _ => Some(ChangeKind::Modified),
    }
}

/// Whether an `XY` pair denotes an unmerged path.
#[must_use]
pub fn is_conflict_pair(x: char, y: char) -> bool {
    x == 'U' || y == 'U' || (x == 'A' && y == 'A')
}

/// Classify a two-character porcelain status code.
#[must_use]
pub fn classify_status_code(code: &str) -> StatusPair {
    let mut chars = code.chars();
    let x = chars.next().unwrap_or(' ');
    let y = chars.next().unwrap_or(' ');

    match (x, y) {
        ('?', '?') => StatusPair {
            untracked: true,
            ..StatusPair::default()
        },
        ('!', '!') => StatusPair {
            ignored: true,
            ..StatusPair::default()
        },
        _ if is_conflict_pair(x, y) => StatusPair {
            conflict: true,
            ..StatusPair::default()
        },
        ('D', 'D') => StatusPair {
            index: Some(ChangeKind::Deleted),
            ..StatusPair::default()
        },
        _ => StatusPair {
            index: classify_status_char(x),
            worktree: classify_status_char(y),
            ..StatusPair::default()
        },
    }
}
