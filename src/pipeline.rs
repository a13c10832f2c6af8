//! End-to-end pipeline: decode, check, compact, select, present.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::aggregate::check_invariants;
use crate::compact::compact_with;
use crate::config::{CompactConfig, Config};
use crate::decode::{decode, RawOutput};
use crate::error::Result;
use crate::model::{CanonicalResult, Operation};
use crate::select::{OutputSelector, Representation};

/// Final output of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    /// Operation name, e.g. `git_status` or `lint:cargo`.
    pub operation: String,
    /// Which representation was chosen.
    pub representation: Representation,
    /// The chosen representation as JSON.
    pub structured: serde_json::Value,
    /// Human-readable rendering of the same representation.
    pub text: String,
}

/// Stateless pipeline configured once and reused across invocations.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    selector: OutputSelector,
    compact: CompactConfig,
}

impl Pipeline {
    /// Create a pipeline from configuration.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            selector: OutputSelector::from(&config.selector),
            compact: config.compact.clone(),
        }
    }

    /// Override the selector.
    #[must_use]
    pub fn with_selector(mut self, selector: OutputSelector) -> Self {
        self.selector = selector;
        self
    }

    /// Decode and check one invocation without compacting.
    #[instrument(skip(self, raw), fields(op = %operation))]
    pub fn canonical(&self, operation: Operation, raw: &RawOutput) -> CanonicalResult {
        let result = decode(operation, raw);
        for violation in check_invariants(&result) {
            warn!(%violation, "Invariant violated");
        }
        result
    }

    /// Run the full pipeline.
    ///
    /// Only serialization can fail; decoding never does.
    #[instrument(skip(self, raw), fields(op = %operation, bytes = raw.footprint()))]
    pub fn run(&self, operation: Operation, raw: &RawOutput, force_full: bool) -> Result<Payload> {
        let canonical = self.canonical(operation, raw);
        let projection = compact_with(&canonical, &self.compact);

        let raw_size = Some(raw.footprint()).filter(|&n| n > 0);
        let selected = self.selector.select(&canonical, &projection, raw_size, force_full);

        let payload = Payload {
            operation: operation.to_string(),
            representation: selected.representation(),
            structured: selected.to_value()?,
            text: selected.present(),
        };
        debug!(
            representation = payload.representation.as_str(),
            success = canonical.success(),
            "Pipeline complete"
        );
        Ok(payload)
    }
}
