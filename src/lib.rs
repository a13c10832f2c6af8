//! tool-digest: normalize raw command-line tool output into typed results.
//!
//! Developer tools print semi-structured, version-drifting output: status
//! tables, progress lines, JSON documents, JSON lines. This crate decodes
//! that output into a canonical typed result per operation, checks the
//! arithmetic relationships between records and summaries, derives a
//! smaller compact projection, and picks whichever representation is
//! cheaper to hand to a consumer with a tight context budget.
//!
//! # Quick Start
//!
//! ```rust
//! use tool_digest::prelude::*;
//!
//! let raw = RawOutput::new("## main\nAA both-added.ts\n");
//! let payload = Pipeline::default().run(Operation::GitStatus, &raw, false)?;
//!
//! assert_eq!(payload.structured["conflicts"][0], "both-added.ts");
//! println!("{}", payload.text);
//! # Ok::<(), tool_digest::DigestError>(())
//! ```
//!
//! # Architecture
//!
//! - [`normalize`]: Sizes, percentages, durations and timestamps
//! - [`classify`]: Tool vocabularies mapped to closed enums
//! - [`decode`]: Per-operation adapters from raw output to [`CanonicalResult`]
//! - [`aggregate`]: Summary derivation and invariant checks
//! - [`compact`]: Per-operation compact projections
//! - [`select`]: Compact versus full selection by size
//! - [`present`]: Deterministic text rendering
//! - [`pipeline`]: All of the above behind one call
//! - [`cli`]: Command-line interface
//! - [`config`]: Configuration management
//! - [`error`]: Error types and handling
//!
//! Decoders never fail. Unparseable output yields an explicitly empty
//! result; errors are reserved for caller mistakes, configuration and I/O.

#![doc(html_root_url = "https://docs.rs/tool-digest/0.1.0")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod aggregate;
pub mod classify;
pub mod cli;
pub mod compact;
pub mod config;
pub mod decode;
pub mod error;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod present;
pub mod select;
pub mod util;

// Re-export commonly used types at the crate root
pub use compact::{compact, CompactProjection};
pub use decode::{decode, RawOutput};
pub use error::{DigestError, Result};
pub use model::{CanonicalResult, Operation};
pub use pipeline::{Payload, Pipeline};
pub use present::Present;
pub use select::{select_output, Representation, Selected};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::compact::{compact, CompactProjection};
    pub use crate::config::Config;
    pub use crate::decode::{decode, RawOutput};
    pub use crate::error::{DigestError, Result};
    pub use crate::model::{CanonicalResult, Completeness, LintSource, Operation};
    pub use crate::pipeline::{Payload, Pipeline};
    pub use crate::present::Present;
    pub use crate::select::{select_output, OutputSelector, Representation, Selected};
}
