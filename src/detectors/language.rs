//! detectors/language.rs
//!
//! Language detection based on a source file's extension.

use std::fmt;
use std::path::Path;

use serde::Serialize;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    TypeScript,
    JavaScript,
    Python,
}

/// How a language delimits its blocks.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LanguageFamily {
    /// `{ ... }` blocks, `function` / `class` / `async` keywords.
    CurlyBrace,
    /// colon + indentation blocks, `def` / `class` keywords.
    Indentation,
}

impl Language {
    /// Used for any extension we do not recognise.
    pub const DEFAULT: Language = Language::TypeScript;

    pub fn family(self) -> LanguageFamily {
        match self {
            Language::TypeScript | Language::JavaScript => LanguageFamily::CurlyBrace,
            Language::Python => LanguageFamily::Indentation,
        }
    }

    fn from_extension(ext: &str) -> Option<Language> {
        match ext {
            "ts" | "tsx" | "mts" | "cts" => Some(Language::TypeScript),
            "js" | "jsx" | "mjs" | "cjs" => Some(Language::JavaScript),
            "py" | "pyi" => Some(Language::Python),
            _ => None,
        }
    }
}

/* ============================================================
   Public API
   ============================================================ */

pub fn detect_language(path: &Path) -> Language {
    path.extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .and_then(|ext| Language::from_extension(&ext))
        .unwrap_or(Language::DEFAULT)
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Language::TypeScript => "typescript",
            Language::JavaScript => "javascript",
            Language::Python => "python",
        };
        f.write_str(s)
    }
}

impl fmt::Display for LanguageFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LanguageFamily::CurlyBrace => "curly-brace",
            LanguageFamily::Indentation => "indentation",
        };
        f.write_str(s)
    }
}
