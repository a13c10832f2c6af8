//! Dual-output selection.
//!
//! Chooses between the compact projection and the full canonical result:
//!
//! 1. forced full → full
//! 2. no raw output captured → compact
//! 3. compact size ≤ `max_ratio` × raw size → compact
//! 4. otherwise → full
//!
//! Sizes are serialized JSON byte lengths. Selection is stateless.
//!
//! The `max_ratio` bound holds only when compact is chosen. When the compact
//! projection is over budget the full result is returned unchanged, even
//! though it is larger still. Callers that need a hard size cap must enforce
//! it themselves.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::compact::CompactProjection;
use crate::config::{SelectorConfig, DEFAULT_MAX_RATIO};
use crate::error::{DigestError, Result};
use crate::model::CanonicalResult;
use crate::present::Present;

/// Which representation was emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Representation {
    /// The compact projection.
    #[default]
    Compact,
    /// The full canonical result.
    Full,
}

impl Representation {
    /// Lowercase name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Compact => "compact",
            Self::Full => "full",
        }
    }
}

/// The chosen output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Selected<'a> {
    /// Compact projection won.
    Compact(&'a CompactProjection),
    /// Full result was forced or the projection was not small enough.
    Full(&'a CanonicalResult),
}

impl Selected<'_> {
    /// Which representation this is.
    #[must_use]
    pub const fn representation(&self) -> Representation {
        match self {
            Self::Compact(_) => Representation::Compact,
            Self::Full(_) => Representation::Full,
        }
    }

    /// Structured form of the chosen output.
    pub fn to_value(&self) -> Result<serde_json::Value> {
        let value = match self {
            Self::Compact(c) => serde_json::to_value(c),
            Self::Full(r) => serde_json::to_value(r),
        };
        value.map_err(|source| DigestError::SerializationError {
            context: format!("Failed to serialize {} output", self.representation().as_str()),
            source,
        })
    }

    /// Text form of the chosen output.
    #[must_use]
    pub fn present(&self) -> String {
        match self {
            Self::Compact(c) => c.present(),
            Self::Full(r) => r.present(),
        }
    }
}

/// Serialized JSON size of a value, in bytes.
fn json_size<T: Serialize>(value: &T) -> usize {
    serde_json::to_vec(value).map_or(usize::MAX, |bytes| bytes.len())
}

/// Stateless compact/full selector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputSelector {
    max_ratio: f64,
}

impl Default for OutputSelector {
    fn default() -> Self {
        Self {
            max_ratio: DEFAULT_MAX_RATIO,
        }
    }
}

impl From<&SelectorConfig> for OutputSelector {
    fn from(config: &SelectorConfig) -> Self {
        Self::new().with_max_ratio(config.max_ratio)
    }
}

impl OutputSelector {
    /// Selector with the default ratio.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the compact/raw size ratio. Negative or non-finite values are
    /// ignored.
    #[must_use]
    pub fn with_max_ratio(mut self, max_ratio: f64) -> Self {
        if max_ratio.is_finite() && max_ratio >= 0.0 {
            self.max_ratio = max_ratio;
        }
        self
    }

    /// Configured ratio.
    #[must_use]
    pub const fn max_ratio(&self) -> f64 {
        self.max_ratio
    }

    /// Choose the output. `raw_size` is `None` when no raw output was
    /// captured.
    pub fn select<'a>(
        &self,
        canonical: &'a CanonicalResult,
        compact: &'a CompactProjection,
        raw_size: Option<usize>,
        force_full: bool,
    ) -> Selected<'a> {
        if force_full {
            debug!("Full output forced");
            return Selected::Full(canonical);
        }
        let Some(raw_size) = raw_size.filter(|&size| size > 0) else {
            debug!("No raw output captured, using compact form");
            return Selected::Compact(compact);
        };

        let compact_size = json_size(compact);
        let budget = self.max_ratio * raw_size as f64;
        let selected = if (compact_size as f64) <= budget {
            Selected::Compact(compact)
        } else {
            Selected::Full(canonical)
        };
        debug!(
            compact_size,
            raw_size,
            max_ratio = self.max_ratio,
            representation = selected.representation().as_str(),
            "Selected output"
        );
        selected
    }
}

/// Choose between compact and full output with the default ratio.
pub fn select_output<'a>(
    canonical: &'a CanonicalResult,
    compact: &'a CompactProjection,
    raw_size: Option<usize>,
    force_full: bool,
) -> Selected<'a> {
    OutputSelector::default().select(canonical, compact, raw_size, force_full)
}
