//! Helpers for porcelain-style text.
//!
//! Paths in git output are C-quoted when they contain special characters
//! (`"caf\303\251 menu.txt"`), renames are printed as `old -> new`
//! (status) or `old => new` / `dir/{old => new}/file` (numstat).

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

static ANSI_ESCAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").expect("ANSI pattern is valid"));

/// Remove ANSI color escapes.
#[must_use]
pub fn strip_ansi(text: &str) -> Cow<'_, str> {
    ANSI_ESCAPE.replace_all(text, "")
}

/// Decode a C-quoted path. Unquoted input is returned as-is.
#[must_use]
pub fn unquote_path(text: &str) -> String {
    let Some(inner) = text
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return text.to_string();
    };

    let bytes = inner.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b != b'\\' || i + 1 >= bytes.len() {
            out.push(b);
            i += 1;
            continue;
        }

        let next = bytes[i + 1];
        match next {
            b'0'..=b'7' => {
                let end = (i + 4).min(bytes.len());
                let digits: Vec<u8> = bytes[i + 1..end]
                    .iter()
                    .take_while(|d| (b'0'..=b'7').contains(*d))
                    .map(|d| d - b'0')
                    .collect();
                let value = digits.iter().fold(0u16, |acc, d| acc * 8 + u16::from(*d));
                out.push(u8::try_from(value).unwrap_or(b'?'));
                i += 1 + digits.len();
            }
            _ => {
                out.push(match next {
                    b'n' => b'\n',
                    b't' => b'\t',
                    b'r' => b'\r',
                    b'a' => 0x07,
                    b'b' => 0x08,
                    b'f' => 0x0c,
                    b'v' => 0x0b,
                    other => other,
                });
                i += 2;
            }
        }
    }

    String::from_utf8_lossy(&out).into_owned()
}

/// Split a leading C-quoted token from `text`, returning the decoded token
/// and the remainder after the closing quote.
fn take_quoted(text: &str) -> Option<(String, &str)> {
    if !text.starts_with('"') {
        return None;
    }
    let mut escaped = false;
    for (idx, ch) in text.char_indices().skip(1) {
        match ch {
            '\\' if !escaped => escaped = true,
            '"' if !escaped => {
                let token = &text[..=idx];
                return Some((unquote_path(token), &text[idx + 1..]));
            }
            _ => escaped = false,
        }
    }
    None
}

/// Split a status-style rename `old -> new` into `(Some(old), new)`.
///
/// Either side may be quoted. Text without an arrow is `(None, path)`.
#[must_use]
pub fn split_arrow_rename(text: &str) -> (Option<String>, String) {
    if let Some((first, rest)) = take_quoted(text) {
        return match rest.strip_prefix(" -> ") {
            Some(second) => (Some(first), unquote_path(second)),
            None => (None, first),
        };
    }

    match text.split_once(" -> ") {
        Some((old, new)) => (Some(old.to_string()), unquote_path(new)),
        None => (None, unquote_path(text)),
    }
}

fn join_rename(prefix: &str, middle: &str, suffix: &str) -> String {
    if middle.is_empty() {
        let suffix = if prefix.is_empty() || prefix.ends_with('/') {
            suffix.strip_prefix('/').unwrap_or(suffix)
        } else {
            suffix
        };
        format!("{prefix}{suffix}")
    } else {
        format!("{prefix}{middle}{suffix}")
    }
}

/// Expand a numstat rename (`old => new` or `pre/{old => new}/post`) into
/// `(old, new)`. Returns `None` for plain paths.
#[must_use]
pub fn expand_numstat_rename(path: &str) -> Option<(String, String)> {
    if let (Some(open), Some(close)) = (path.find('{'), path.rfind('}')) {
        if open < close {
            let inner = &path[open + 1..close];
            if let Some((old, new)) = inner.split_once(" => ") {
                let prefix = &path[..open];
                let suffix = &path[close + 1..];
                return Some((
                    join_rename(prefix, old, suffix),
                    join_rename(prefix, new, suffix),
                ));
            }
        }
    }

    path.split_once(" => ")
        .map(|(old, new)| (unquote_path(old), unquote_path(new)))
}

/// Non-empty, trimmed lines of `text`.
pub fn content_lines(text: &str) -> impl Iterator<Item = &str> {
    text.lines().map(str::trim_end).filter(|line| !line.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("plain.txt", "plain.txt")]
    #[case("\"with space.txt\"", "with space.txt")]
    #[case("\"tab\\there\"", "tab\there")]
    #[case("\"quote\\\"d\"", "quote\"d")]
    #[case("\"caf\\303\\251.txt\"", "café.txt")]
    #[case("\"back\\\\slash\"", "back\\slash")]
    #[case("\"\\12é\"", "\né")]
    #[case("\"\\1é\"", "\u{1}é")]
    #[case("\"bad\\777\"", "bad?")]
    fn test_unquote_path(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(unquote_path(input), expected);
    }

    #[test]
    fn test_split_arrow_rename_plain() {
        assert_eq!(
            split_arrow_rename("old.ts -> new.ts"),
            (Some("old.ts".to_string()), "new.ts".to_string())
        );
        assert_eq!(split_arrow_rename("file.ts"), (None, "file.ts".to_string()));
    }

    #[test]
    fn test_split_arrow_rename_quoted() {
        assert_eq!(
            split_arrow_rename("\"old name.ts\" -> \"new name.ts\""),
            (Some("old name.ts".to_string()), "new name.ts".to_string())
        );
        assert_eq!(
            split_arrow_rename("\"a -> b.txt\""),
            (None, "a -> b.txt".to_string())
        );
    }

    #[rstest]
    #[case("old.ts => new.ts", "old.ts", "new.ts")]
    #[case("src/{a => b}/file.ts", "src/a/file.ts", "src/b/file.ts")]
    #[case("src/{ => sub}/file.ts", "src/file.ts", "src/sub/file.ts")]
    #[case("{lib => src}/mod.rs", "lib/mod.rs", "src/mod.rs")]
    #[case("docs/{old.md => new.md}", "docs/old.md", "docs/new.md")]
    fn test_expand_numstat_rename(#[case] input: &str, #[case] old: &str, #[case] new: &str) {
        assert_eq!(
            expand_numstat_rename(input),
            Some((old.to_string(), new.to_string()))
        );
    }

    #[test]
    fn test_expand_numstat_rename_plain_path() {
        assert_eq!(expand_numstat_rename("src/{weird}.rs"), None);
        assert_eq!(expand_numstat_rename("src/lib.rs"), None);
    }

    #[test]
    fn test_strip_ansi() {
        assert_eq!(strip_ansi("\x1b[31mred\x1b[39m text"), "red text");
    }
}
