// src/testgen/file.rs

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;
use tracing::debug;

/* ============================================================
   Public API
   ============================================================ */

/// Write `contents` to `path`, replacing any existing file.
///
/// The bytes go to a sibling temp file first and are renamed into place,
/// so a failed write never leaves a truncated test file behind.
pub fn write_test_file(path: &Path, contents: &str) -> io::Result<()> {
    let parent = ensure_parent_dir(path)?;

    let mut tmp = NamedTempFile::new_in(parent)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;

    debug!(path = %path.display(), bytes = contents.len(), "wrote test file");
    Ok(())
}

/* ============================================================
   Helpers
   ============================================================ */

fn ensure_parent_dir(path: &Path) -> io::Result<&Path> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent)?;
            Ok(parent)
        }
        _ => Ok(Path::new(".")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_missing_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a/b/widget.test.ts");

        write_test_file(&path, "describe();\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "describe();\n");
    }

    #[test]
    fn overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("test_auth.py");
        fs::write(&path, "old contents that are much longer than the new ones\n").unwrap();

        write_test_file(&path, "new\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
    }

    #[test]
    fn leaves_no_temp_files_behind() {
        let dir = TempDir::new().unwrap();
        write_test_file(&dir.path().join("x.test.js"), "x").unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("x.test.js")]);
    }

    #[test]
    fn parent_that_is_a_file_fails() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();

        assert!(write_test_file(&blocker.join("t.test.ts"), "x").is_err());
    }
}
