//! detectors/framework.rs
//!
//! Test framework detection based on project configuration.

use std::fmt;
use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::detectors::language::LanguageFamily;

#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestFramework {
    Jest,
    Vitest,
    Pytest,
}

impl TestFramework {
    /// Chosen for curly-brace projects that carry no signal at all.
    pub const DEFAULT: TestFramework = TestFramework::Jest;

    pub fn family(self) -> LanguageFamily {
        match self {
            TestFramework::Jest | TestFramework::Vitest => LanguageFamily::CurlyBrace,
            TestFramework::Pytest => LanguageFamily::Indentation,
        }
    }
}

/// Why a framework was picked.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum DetectionReason {
    IndentationFamily,
    ConfigFile(&'static str),
    ManifestDependency(&'static str),
    Default,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Detection {
    pub framework: TestFramework,
    pub reason: DetectionReason,
}

const VITEST_CONFIGS: &[&str] = &[
    "vitest.config.ts",
    "vitest.config.js",
    "vitest.config.mts",
    "vitest.config.mjs",
    "vitest.config.cts",
    "vitest.config.cjs",
];

const JEST_CONFIGS: &[&str] = &[
    "jest.config.ts",
    "jest.config.js",
    "jest.config.mjs",
    "jest.config.cjs",
    "jest.config.json",
];

/* ============================================================
   Public API
   ============================================================ */

pub fn detect_framework(root: &Path, family: LanguageFamily) -> TestFramework {
    let detection = detect_framework_with_reason(root, family);
    info!(framework = %detection.framework, reason = %detection.reason, "framework detected");
    detection.framework
}

pub fn detect_framework_with_reason(root: &Path, family: LanguageFamily) -> Detection {
    if family == LanguageFamily::Indentation {
        return Detection {
            framework: TestFramework::Pytest,
            reason: DetectionReason::IndentationFamily,
        };
    }

    // Config files outrank the manifest; vitest before jest
    for (framework, configs) in [
        (TestFramework::Vitest, VITEST_CONFIGS),
        (TestFramework::Jest, JEST_CONFIGS),
    ] {
        if let Some(name) = configs.iter().copied().find(|c| exists(root, c)) {
            return Detection {
                framework,
                reason: DetectionReason::ConfigFile(name),
            };
        }
    }

    if let Some(manifest) = read_manifest(root) {
        for (framework, key) in [(TestFramework::Vitest, "vitest"), (TestFramework::Jest, "jest")] {
            if declares_dependency(&manifest, key) {
                return Detection {
                    framework,
                    reason: DetectionReason::ManifestDependency(key),
                };
            }
        }
    }

    Detection {
        framework: TestFramework::DEFAULT,
        reason: DetectionReason::Default,
    }
}

/* ============================================================
   Helpers
   ============================================================ */

#[inline]
fn exists(root: &Path, file: &str) -> bool {
    root.join(file).is_file()
}

fn read_manifest(root: &Path) -> Option<Value> {
    let pkg = root.join("package.json");
    let contents = std::fs::read_to_string(&pkg).ok()?;

    match serde_json::from_str(&contents) {
        Ok(v) => Some(v),
        Err(e) => {
            debug!(path = %pkg.display(), error = %e, "ignoring unparsable manifest");
            None
        }
    }
}

fn declares_dependency(manifest: &Value, key: &str) -> bool {
    ["devDependencies", "dependencies"]
        .iter()
        .any(|table| manifest.get(table).and_then(|t| t.get(key)).is_some_and(truthy))
}

/// `null`, `false`, `0` and `""` do not declare anything.
fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl fmt::Display for TestFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TestFramework::Jest => "jest",
            TestFramework::Vitest => "vitest",
            TestFramework::Pytest => "pytest",
        };
        f.write_str(s)
    }
}

impl fmt::Display for DetectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionReason::IndentationFamily => f.write_str("indentation-family source"),
            DetectionReason::ConfigFile(name) => write!(f, "found {name}"),
            DetectionReason::ManifestDependency(key) => {
                write!(f, "package.json declares {key}")
            }
            DetectionReason::Default => f.write_str("no signal, using default"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn project(files: &[(&str, &str)]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for (name, body) in files {
            fs::write(dir.path().join(name), body).unwrap();
        }
        dir
    }

    #[test]
    fn indentation_family_is_always_pytest() {
        let dir = project(&[("vitest.config.ts", "")]);
        let d = detect_framework_with_reason(dir.path(), LanguageFamily::Indentation);
        assert_eq!(d.framework, TestFramework::Pytest);
        assert_eq!(d.reason, DetectionReason::IndentationFamily);
    }

    #[test]
    fn vitest_config_beats_jest_config() {
        let dir = project(&[("jest.config.js", ""), ("vitest.config.mts", "")]);
        let d = detect_framework_with_reason(dir.path(), LanguageFamily::CurlyBrace);
        assert_eq!(d.framework, TestFramework::Vitest);
        assert_eq!(d.reason, DetectionReason::ConfigFile("vitest.config.mts"));
    }

    #[test]
    fn jest_config_beats_manifest() {
        let dir = project(&[
            ("jest.config.ts", ""),
            ("package.json", r#"{"devDependencies": {"vitest": "^1.0.0"}}"#),
        ]);
        assert_eq!(
            detect_framework(dir.path(), LanguageFamily::CurlyBrace),
            TestFramework::Jest
        );
    }

    #[test]
    fn manifest_prefers_vitest_over_jest() {
        let dir = project(&[(
            "package.json",
            r#"{"dependencies": {"jest": "29"}, "devDependencies": {"vitest": "1"}}"#,
        )]);
        let d = detect_framework_with_reason(dir.path(), LanguageFamily::CurlyBrace);
        assert_eq!(d.framework, TestFramework::Vitest);
        assert_eq!(d.reason, DetectionReason::ManifestDependency("vitest"));
    }

    #[test]
    fn manifest_jest_dependency() {
        let dir = project(&[("package.json", r#"{"dependencies": {"jest": "29"}}"#)]);
        assert_eq!(
            detect_framework(dir.path(), LanguageFamily::CurlyBrace),
            TestFramework::Jest
        );
    }

    #[test]
    fn dependency_mentioned_elsewhere_is_not_a_signal() {
        let dir = project(&[(
            "package.json",
            r#"{"scripts": {"test": "vitest run"}, "dependencies": {}}"#,
        )]);
        let d = detect_framework_with_reason(dir.path(), LanguageFamily::CurlyBrace);
        assert_eq!(d.reason, DetectionReason::Default);
    }

    #[test]
    fn empty_dependency_values_are_not_a_signal() {
        let dir = project(&[(
            "package.json",
            r#"{"devDependencies": {"vitest": null, "jest": ""}, "dependencies": {"jest": false}}"#,
        )]);
        let d = detect_framework_with_reason(dir.path(), LanguageFamily::CurlyBrace);
        assert_eq!(d.reason, DetectionReason::Default);

        let dir = project(&[(
            "package.json",
            r#"{"devDependencies": {"vitest": ""}, "dependencies": {"jest": "29"}}"#,
        )]);
        let d = detect_framework_with_reason(dir.path(), LanguageFamily::CurlyBrace);
        assert_eq!(d.reason, DetectionReason::ManifestDependency("jest"));
    }

    #[test]
    fn unparsable_manifest_falls_through_to_default() {
        let dir = project(&[("package.json", "{ not json")]);
        let d = detect_framework_with_reason(dir.path(), LanguageFamily::CurlyBrace);
        assert_eq!(d.framework, TestFramework::DEFAULT);
        assert_eq!(d.reason, DetectionReason::Default);
    }

    #[test]
    fn empty_project_defaults_to_jest() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            detect_framework(dir.path(), LanguageFamily::CurlyBrace),
            TestFramework::Jest
        );
    }
}
