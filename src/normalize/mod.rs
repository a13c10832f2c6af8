//! Scalar normalizers.
//!
//! Pure, total conversions from the textual scalars tools print into
//! canonical values:
//! - Byte sizes with decimal (`kB`, `MB`) or binary (`KiB`, `MiB`) suffixes
//! - Durations (`1.5s`, `150ms`, `1m30s`, `00:01:30`)
//! - Timestamps in the various shapes tools emit, normalized to ISO-8601
//!
//! None of these functions fail. Unparseable input maps to `0` (sizes,
//! durations, percentages) or is returned unchanged (timestamps); callers
//! that must tell "unknown" from "zero" inspect the raw string themselves.
//!
//! # Example
//!
//! ```rust
//! use tool_digest::normalize::{size_pair, size_to_bytes, timestamp_to_canonical};
//!
//! assert_eq!(size_to_bytes("1.5kB"), 1500);
//! assert_eq!(size_pair("150MiB / 1GiB"), (157_286_400, 1_073_741_824));
//! assert_eq!(
//!     timestamp_to_canonical("2024-01-15 10:30:00 +0100"),
//!     "2024-01-15T10:30:00+01:00"
//! );
//! ```

mod size;
mod time;

pub use size::*;
pub use time::*;
