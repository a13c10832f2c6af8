//! Test reporter status words.

use crate::model::TestStatus;

/// Map a reporter status word to a test outcome.
///
/// Unknown words map to [`TestStatus::Skipped`]: the case is neither
/// claimed as passing nor as failing. The run's exit code still decides
/// overall success.
#[must_use]
pub fn test_status_from_word(word: &str) -> TestStatus {
    match word.trim().to_ascii_lowercase().as_str() {
        "passed" | "pass" | "ok" => TestStatus::Passed,
        "failed" | "fail" | "error" | "broken" => TestStatus::Failed,
        "todo" => TestStatus::Todo,
        _ => TestStatus::Skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("passed", TestStatus::Passed)]
    #[case("failed", TestStatus::Failed)]
    #[case("pending", TestStatus::Skipped)]
    #[case("skipped", TestStatus::Skipped)]
    #[case("disabled", TestStatus::Skipped)]
    #[case("todo", TestStatus::Todo)]
    #[case("focused", TestStatus::Skipped)]
    fn test_status_words(#[case] word: &str, #[case] expected: TestStatus) {
        assert_eq!(test_status_from_word(word), expected);
    }
}
