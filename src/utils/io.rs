//! File I/O primitives with consistent error handling.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;

/// Read file contents with standardized error handling.
///
/// Wraps `fs::read_to_string` with consistent `Error::internal_io` formatting.
pub fn read_file(path: &Path, operation: &str) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}

/// Create a directory and all missing parents.
///
/// Succeeds when the directory already exists.
pub fn ensure_dir(path: &Path, operation: &str) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| {
        Error::internal_io(
            format!("{} ({})", e, path.display()),
            Some(operation.to_string()),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn read_file_succeeds_for_existing_file() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "test content").unwrap();

        let content = read_file(temp.path(), "test read").unwrap();
        assert!(content.contains("test content"));
    }

    #[test]
    fn read_file_returns_error_for_missing_file() {
        let err = read_file(Path::new("/nonexistent/path.txt"), "test read").unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
        assert!(err.message.starts_with("test read: "));
    }

    #[test]
    fn ensure_dir_creates_nested_parents() {
        let dir = tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("c");

        ensure_dir(&nested, "create nested").unwrap();
        assert!(nested.is_dir());

        // Existing directory is fine
        ensure_dir(&nested, "create nested").unwrap();
    }

    #[test]
    fn ensure_dir_fails_when_a_file_is_in_the_way() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();

        let err = ensure_dir(&blocker.join("child"), "creating app dir").unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
        assert!(err.message.starts_with("creating app dir: "));
    }
}
