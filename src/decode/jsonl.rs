//! Line-delimited JSON decoding.
//!
//! Every non-empty line is parsed independently. Lines that are not valid
//! JSON, or that lack the fields of the target type, are skipped and
//! counted; decoding never stops early.
//!
//! ```rust
//! use serde::Deserialize;
//! use tool_digest::decode::JsonLinesDecoder;
//!
//! #[derive(Deserialize)]
//! struct Row {
//!     name: String,
//! }
//!
//! let mut decoder = JsonLinesDecoder::new();
//! let rows: Vec<Row> = decoder.decode("{\"name\":\"a\"}\nnot json\n{\"name\":\"b\"}\n");
//!
//! assert_eq!(rows.len(), 2);
//! assert_eq!(decoder.stats().lines_skipped, 1);
//! ```

use serde::de::DeserializeOwned;
use tracing::{debug, instrument, trace};

use crate::util::truncate_preview;

/// Skipped lines retained in [`LineStats::skipped`].
const MAX_RECORDED_SKIPS: usize = 100;

/// Preview length of a skipped line.
const PREVIEW_LEN: usize = 100;

/// Lenient decoder for line-delimited JSON.
#[derive(Debug, Default)]
pub struct JsonLinesDecoder {
    stats: LineStats,
}

/// Statistics about one decoding pass.
#[derive(Debug, Clone, Default)]
pub struct LineStats {
    /// Total lines processed.
    pub lines_processed: usize,
    /// Lines decoded into records.
    pub records_decoded: usize,
    /// Malformed or unrecognized lines.
    pub lines_skipped: usize,
    /// Blank lines.
    pub empty_lines: usize,
    /// First skipped lines, with context.
    pub skipped: Vec<SkippedLine>,
}

impl LineStats {
    /// Whether there was content but none of it decoded.
    #[must_use]
    pub fn nothing_decoded(&self) -> bool {
        self.records_decoded == 0 && self.lines_skipped > 0
    }
}

/// A skipped line with context.
#[derive(Debug, Clone)]
pub struct SkippedLine {
    /// 1-indexed line number.
    pub line: usize,
    /// Decoder error message.
    pub message: String,
    /// Original line content (truncated).
    pub content_preview: String,
}

impl JsonLinesDecoder {
    /// Create a new decoder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Statistics of the last [`decode`](Self::decode) call.
    #[must_use]
    pub fn stats(&self) -> &LineStats {
        &self.stats
    }

    /// Decode every line of `text` that parses as `T`.
    #[instrument(skip_all, level = "debug", fields(len = text.len()))]
    pub fn decode<T: DeserializeOwned>(&mut self, text: &str) -> Vec<T> {
        let mut records = Vec::new();
        self.stats = LineStats::default();

        for (idx, line) in text.lines().enumerate() {
            let line_num = idx + 1;
            self.stats.lines_processed += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                self.stats.empty_lines += 1;
                continue;
            }

            match serde_json::from_str::<T>(trimmed) {
                Ok(record) => {
                    self.stats.records_decoded += 1;
                    records.push(record);
                }
                Err(e) => {
                    self.stats.lines_skipped += 1;
                    if self.stats.skipped.len() < MAX_RECORDED_SKIPS {
                        self.stats.skipped.push(SkippedLine {
                            line: line_num,
                            message: e.to_string(),
                            content_preview: truncate_preview(trimmed, PREVIEW_LEN),
                        });
                    }
                    trace!(line = line_num, error = %e, "Undecodable line, skipping");
                }
            }
        }

        debug!(
            records = records.len(),
            lines = self.stats.lines_processed,
            skipped = self.stats.lines_skipped,
            "Line decoding complete"
        );
        records
    }
}
