//! Shared helpers: atomic file writes and preview truncation.

use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{DigestError, Result};

/// Atomically write content to a file.
///
/// The content goes to a temporary file in the target's directory, is
/// flushed, and is then renamed over the target. On failure the original
/// file (if any) is left untouched. Missing parent directories are created.
///
/// # Errors
///
/// Returns [`DigestError::IoError`] if the parent directory cannot be
/// determined or created, or if writing or renaming fails.
///
/// # Example
///
/// ```rust,no_run
/// use tool_digest::util::atomic_write;
///
/// atomic_write("config.toml", b"[selector]\nmax_ratio = 0.5\n").unwrap();
/// ```
pub fn atomic_write(path: impl AsRef<Path>, content: &[u8]) -> Result<()> {
    let path = path.as_ref();

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        Some(_) => Path::new("."),
        None => {
            return Err(DigestError::io(
                format!("Cannot determine parent directory for: {}", path.display()),
                io::Error::new(io::ErrorKind::InvalidInput, "No parent directory"),
            ))
        }
    };

    if !parent.exists() {
        std::fs::create_dir_all(parent)
            .map_err(|e| DigestError::io(format!("Failed to create directory: {}", parent.display()), e))?;
    }

    // Same directory keeps the rename on one filesystem.
    let mut temp_file = NamedTempFile::new_in(parent).map_err(|e| {
        DigestError::io(format!("Failed to create temporary file in: {}", parent.display()), e)
    })?;

    temp_file
        .write_all(content)
        .and_then(|()| temp_file.flush())
        .map_err(|e| DigestError::io(format!("Failed to write temporary file for: {}", path.display()), e))?;

    temp_file
        .persist(path)
        .map_err(|e| DigestError::io(format!("Failed to atomically write file: {}", path.display()), e.error))?;

    Ok(())
}

/// Truncate a string for preview display, appending `...` when cut.
///
/// Cuts on a character boundary at or before `max_len` bytes.
#[must_use]
pub fn truncate_preview(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_atomic_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        atomic_write(&path, b"max_ratio = 0.5").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "max_ratio = 0.5");
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("tool-digest").join("config.toml");

        atomic_write(&path, b"").unwrap();

        assert!(path.exists());
    }

    #[test]
    fn test_atomic_write_replaces_existing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "old").unwrap();

        atomic_write(&path, b"new").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "new");
    }

    #[test]
    fn test_truncate_preview() {
        assert_eq!(truncate_preview("short", 10), "short");
        assert_eq!(truncate_preview("abcdefghij", 4), "abcd...");
        // 'é' is two bytes; never split it.
        assert_eq!(truncate_preview("aé", 2), "a...");
    }
}
