//! Property-based tests for the decoding pipeline.
//!
//! Uses proptest to feed decoders arbitrary and structured input, checking
//! that they never panic and that their results stay self-consistent.

use proptest::prelude::*;
use tool_digest::aggregate::check_invariants;
use tool_digest::compact::compact;
use tool_digest::decode::{decode, RawOutput};
use tool_digest::model::{CanonicalResult, Operation};
use tool_digest::normalize::{size_to_bytes, timestamp_to_canonical};
use tool_digest::present::Present;
use tool_digest::select::{select_output, Representation};

fn any_operation() -> impl Strategy<Value = Operation> {
    prop::sample::select(Operation::ALL.to_vec())
}

/// One porcelain status line with a two-letter code.
fn status_line() -> impl Strategy<Value = String> {
    let code = prop::sample::select(vec![
        "M ", " M", "MM", "A ", "AM", "D ", " D", "R ", "C ", "UU", "AA", "DD", "AU", "UD", "??", "!!", "T ",
    ]);
    (code, "[a-z]{1,8}(/[a-z]{1,8}){0,2}\\.[a-z]{1,3}").prop_map(|(code, path)| {
        if code.starts_with('R') || code.starts_with('C') {
            format!("{code} old_{path} -> {path}")
        } else {
            format!("{code} {path}")
        }
    })
}

/// One numstat row.
fn numstat_row() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("-".to_string()), (0u32..5000).prop_map(|n| n.to_string())],
        prop_oneof![Just("-".to_string()), (0u32..5000).prop_map(|n| n.to_string())],
        "[a-z]{1,8}/[a-z]{1,8}\\.[a-z]{2}",
        any::<bool>(),
    )
        .prop_map(|(add, del, path, renamed)| {
            if renamed {
                format!("{add}\t{del}\told_{path} => {path}")
            } else {
                format!("{add}\t{del}\t{path}")
            }
        })
}

fn compact_fits(result: &CanonicalResult) -> bool {
    let full = serde_json::to_string(result).map(|s| s.len()).unwrap_or(0);
    let small = serde_json::to_string(&compact(result)).map(|s| s.len()).unwrap_or(usize::MAX);
    small <= full
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// No decoder panics on arbitrary text, and every result renders.
    #[test]
    fn decoders_never_panic(
        op in any_operation(),
        stdout in ".{0,400}",
        stderr in ".{0,100}",
        exit_code in -2i32..256,
    ) {
        let raw = RawOutput::new(stdout).with_stderr(stderr).with_exit_code(exit_code);
        let result = decode(op, &raw);
        prop_assert_eq!(result.success(), exit_code == 0);
        let _ = result.present();
        let _ = compact(&result).present();
    }

    /// Arbitrary bytes, lossily decoded, never panic either.
    #[test]
    fn decoders_survive_arbitrary_bytes(
        op in any_operation(),
        bytes in prop::collection::vec(any::<u8>(), 0..2000),
    ) {
        let raw = RawOutput::new(String::from_utf8_lossy(&bytes));
        let _ = decode(op, &raw);
    }

    /// Decoded status output always satisfies its invariants.
    #[test]
    fn status_invariants_hold(lines in prop::collection::vec(status_line(), 0..40)) {
        let stdout = format!("## main...origin/main\n{}", lines.join("\n"));
        let result = decode(Operation::GitStatus, &RawOutput::new(stdout));
        prop_assert!(check_invariants(&result).is_empty());
        let CanonicalResult::GitStatus(status) = &result else {
            return Err(TestCaseError::fail("expected git status"));
        };
        prop_assert_eq!(status.clean, status.summary.total == 0);
        prop_assert!(compact_fits(&result));
    }

    /// Diff totals always equal the per-file sums.
    #[test]
    fn diff_invariants_hold(rows in prop::collection::vec(numstat_row(), 0..40)) {
        let result = decode(Operation::GitDiff, &RawOutput::new(rows.join("\n")));
        prop_assert!(check_invariants(&result).is_empty());
        let CanonicalResult::GitDiff(diff) = &result else {
            return Err(TestCaseError::fail("expected git diff"));
        };
        prop_assert_eq!(diff.summary.files_changed, rows.len() as u64);
        prop_assert!(compact_fits(&result));
    }

    /// Canonical timestamps are a fixed point of the normalizer.
    #[test]
    fn timestamp_normalization_is_idempotent(
        secs in 0i64..4_102_444_800,
        offset_minutes in -720i32..=840,
    ) {
        let offset = chrono::FixedOffset::east_opt(offset_minutes * 60).unwrap();
        let Some(utc) = chrono::DateTime::from_timestamp(secs, 0) else {
            return Ok(());
        };
        let local = utc.with_timezone(&offset).to_rfc3339();
        let once = timestamp_to_canonical(&local);
        prop_assert_eq!(timestamp_to_canonical(&once), once);
    }

    /// Arbitrary strings also reach a fixed point after one pass.
    #[test]
    fn timestamp_fixed_point_on_garbage(text in ".{0,40}") {
        let once = timestamp_to_canonical(&text);
        prop_assert_eq!(timestamp_to_canonical(&once), once);
    }

    /// Sizes never panic and placeholders are zero.
    #[test]
    fn size_parsing_total(text in "[0-9.]{0,6}[ ]?(B|kB|KB|KiB|MB|MiB|GB|GiB|TB|TiB)?") {
        let _ = size_to_bytes(&text);
    }

    /// When compact is chosen, it fits the ratio budget.
    #[test]
    fn selector_bound_on_compact_branch(
        lines in prop::collection::vec(status_line(), 0..40),
        raw_size in 0usize..4000,
    ) {
        let stdout = format!("## main\n{}", lines.join("\n"));
        let result = decode(Operation::GitStatus, &RawOutput::new(stdout));
        let projection = compact(&result);
        let selected = select_output(&result, &projection, Some(raw_size), false);

        if selected.representation() == Representation::Compact && raw_size > 0 {
            let size = serde_json::to_string(&projection).unwrap().len();
            prop_assert!(size <= raw_size);
        }
        prop_assert_eq!(
            select_output(&result, &projection, Some(raw_size), true).representation(),
            Representation::Full
        );
    }
}
