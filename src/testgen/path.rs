//! testgen/path.rs
//!
//! Where a generated test file goes, by framework naming convention.

use std::path::{Path, PathBuf};

use crate::detectors::framework::TestFramework;

/// Extensions kept as-is in `<stem>.test.<ext>`.
const SCRIPT_EXTENSIONS: &[&str] = &["ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs"];

/// Used when the source extension is not a script extension.
const FALLBACK_EXTENSION: &str = "ts";

/* ============================================================
   Public API
   ============================================================ */

pub fn resolve_test_path(source: &Path, framework: TestFramework) -> PathBuf {
    let dir = source.parent().unwrap_or_else(|| Path::new(""));
    let stem = module_stem(source);

    match framework {
        TestFramework::Pytest => dir.join(format!("test_{stem}.py")),
        TestFramework::Jest | TestFramework::Vitest => {
            let ext = source
                .extension()
                .and_then(|e| e.to_str())
                .filter(|e| SCRIPT_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
                .unwrap_or(FALLBACK_EXTENSION);
            dir.join(format!("{stem}.test.{ext}"))
        }
    }
}

/// File name without its extension; what test files import the subject as.
pub fn module_stem(source: &Path) -> String {
    source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "module".to_string())
}
