//! Record decoders.
//!
//! Each adapter turns one tool's captured output into a typed result. Three
//! decoding strategies recur:
//!
//! - **Porcelain text** ([`git_status`], [`git_diff`], [`compose`]):
//!   line-oriented tokenization of status prefixes and delimited fields.
//! - **Single JSON document** ([`test_run`], ESLint and ShellCheck in
//!   [`lint`], [`coverage`]): one parse of the whole output; failure yields
//!   a result marked [`Completeness::NoData`](crate::model::Completeness).
//! - **JSON lines** ([`container_stats`], Cargo in [`lint`]): each line
//!   parsed independently by [`JsonLinesDecoder`]; bad lines are skipped.
//!
//! Decoders are pure functions of [`RawOutput`] and never fail. The exit
//! code stays the authoritative success signal.
//!
//! # Example
//!
//! ```rust
//! use tool_digest::decode::{decode, RawOutput};
//! use tool_digest::model::{CanonicalResult, Operation};
//!
//! let raw = RawOutput::new("## main\nAA both-added.ts\n");
//! let CanonicalResult::GitStatus(status) = decode(Operation::GitStatus, &raw) else {
//!     unreachable!()
//! };
//! assert_eq!(status.conflicts, vec!["both-added.ts".to_string()]);
//! assert!(status.staged.is_empty());
//! ```

pub mod compose;
pub mod container_stats;
pub mod coverage;
pub mod git_diff;
pub mod git_status;
mod json;
mod jsonl;
pub mod lines;
pub mod lint;
pub mod test_run;

pub use json::parse_document;
pub use jsonl::*;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::model::{CanonicalResult, LintSource, Operation};

/// Captured output of one tool invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawOutput {
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    #[serde(default)]
    pub stderr: String,
    /// Process exit code.
    #[serde(default)]
    pub exit_code: i32,
}

impl RawOutput {
    /// Output of a successful invocation.
    #[must_use]
    pub fn new(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: 0,
        }
    }

    /// Set captured standard error.
    #[must_use]
    pub fn with_stderr(mut self, stderr: impl Into<String>) -> Self {
        self.stderr = stderr.into();
        self
    }

    /// Set the exit code.
    #[must_use]
    pub fn with_exit_code(mut self, exit_code: i32) -> Self {
        self.exit_code = exit_code;
        self
    }

    /// The tool's own success classification.
    #[must_use]
    pub const fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Trimmed standard error when the tool failed and printed something.
    #[must_use]
    pub fn error_text(&self) -> Option<String> {
        if self.success() {
            return None;
        }
        let trimmed = lines::strip_ansi(self.stderr.trim());
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.into_owned())
        }
    }

    /// Size of the raw output an agent would otherwise read.
    #[must_use]
    pub fn footprint(&self) -> usize {
        self.stdout.len() + self.stderr.len()
    }
}

/// Decode raw output for an operation.
#[instrument(skip(raw), fields(stdout_len = raw.stdout.len(), exit_code = raw.exit_code))]
pub fn decode(operation: Operation, raw: &RawOutput) -> CanonicalResult {
    let result = match operation {
        Operation::GitStatus => CanonicalResult::GitStatus(git_status::decode(raw)),
        Operation::GitDiff => CanonicalResult::GitDiff(git_diff::decode(raw)),
        Operation::Compose => CanonicalResult::Compose(compose::decode(raw)),
        Operation::ContainerStats => CanonicalResult::ContainerStats(container_stats::decode(raw)),
        Operation::TestRun => CanonicalResult::TestRun(test_run::decode(raw)),
        Operation::Lint(LintSource::Eslint) => CanonicalResult::Lint(lint::decode_eslint(raw)),
        Operation::Lint(LintSource::Cargo) => CanonicalResult::Lint(lint::decode_cargo(raw)),
        Operation::Lint(LintSource::Shellcheck) => CanonicalResult::Lint(lint::decode_shellcheck(raw)),
        Operation::Coverage => CanonicalResult::Coverage(coverage::decode(raw)),
    };
    debug!(operation = result.tag(), success = result.success(), "Decoded tool output");
    result
}
