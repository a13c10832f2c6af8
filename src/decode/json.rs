//! Single-document JSON decoding.

use serde::de::DeserializeOwned;
use tracing::{trace, warn};

use crate::util::truncate_preview;

/// Parse the whole of `text` as one JSON document.
///
/// Reporters sometimes print a banner or warning before the document, so
/// when the full text does not parse the span from the first `{` or `[`
/// to the last `}` or `]` is tried. Returns `None` for blank or
/// undecodable input.
#[must_use]
pub fn parse_document<T: DeserializeOwned>(text: &str) -> Option<T> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let first_error = match serde_json::from_str::<T>(trimmed) {
        Ok(doc) => return Some(doc),
        Err(e) => e,
    };

    if let (Some(start), Some(end)) = (
        trimmed.find(['{', '['].as_slice()),
        trimmed.rfind(['}', ']'].as_slice()),
    ) {
        if start > 0 && start < end {
            match serde_json::from_str::<T>(&trimmed[start..=end]) {
                Ok(doc) => {
                    trace!(skipped_prefix = start, "Parsed document after leading noise");
                    return Some(doc);
                }
                Err(e) => trace!(error = %e, "Embedded document did not parse"),
            }
        }
    }

    warn!(
        error = %first_error,
        preview = %truncate_preview(trimmed, 80),
        "Output is not a decodable document"
    );
    None
}
