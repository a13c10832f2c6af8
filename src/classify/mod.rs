//! Semantic classifiers.
//!
//! Table-driven mappings from tool-specific vocabulary to the canonical
//! enums in [`crate::model`]. Every classifier is total: inputs outside
//! the table fall through to the most conservative canonical value
//! instead of failing.
//!
//! | Classifier | Source vocabulary | Canonical set |
//! |------------|-------------------|---------------|
//! | [`classify_status_code`] | two-letter porcelain `XY` codes | [`ChangeKind`](crate::model::ChangeKind) per side |
//! | [`severity_from_level`], [`severity_from_number`] | `error`/`fatal`/`hint`/`style`/…, ESLint 0/1/2 | [`Severity`](crate::model::Severity) |
//! | [`classify_action`] | compose action words | [`EntityAction`](crate::model::EntityAction) |
//! | [`test_status_from_word`] | reporter status words | [`TestStatus`](crate::model::TestStatus) |

mod action;
mod outcome;
mod severity;
mod status;

pub use action::*;
pub use outcome::*;
pub use severity::*;
pub use status::*;
