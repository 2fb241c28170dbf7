//! analyzer/mod.rs
//!
//! Structural extraction: which functions and classes a file declares.
//!
//! This is pattern matching over masked source, not a parser. It aims for
//! useful recall when scaffolding tests and never fails on odd syntax;
//! anything it does not recognise is simply left out of the model.

pub mod lexer;
mod python;
mod script;

use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::detectors::language::{detect_language, Language, LanguageFamily};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionInfo {
    pub name: String,
    /// Raw parameter text, one entry per parameter.
    pub params: Vec<String>,
    /// Raw annotation, or the family's "unknown" sentinel.
    pub return_type: String,
    pub is_async: bool,
    pub is_exported: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassInfo {
    pub name: String,
    /// Declared methods, constructor excluded.
    pub methods: Vec<FunctionInfo>,
    pub is_exported: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeAnalysis {
    pub language: Language,
    /// Top-level functions in source order. Duplicate names are kept.
    pub functions: Vec<FunctionInfo>,
    pub classes: Vec<ClassInfo>,
    pub imports: Vec<String>,
    /// Exported names, de-duplicated, in first-seen order.
    pub exports: Vec<String>,
}

/// What a family-specific extractor hands back.
#[derive(Debug, Default)]
struct Extracted {
    functions: Vec<FunctionInfo>,
    classes: Vec<ClassInfo>,
    imports: Vec<String>,
}

impl CodeAnalysis {
    fn assemble(language: Language, extracted: Extracted) -> Self {
        let mut exports: Vec<String> = Vec::new();

        let exported = extracted
            .functions
            .iter()
            .filter(|f| f.is_exported)
            .map(|f| &f.name)
            .chain(
                extracted
                    .classes
                    .iter()
                    .filter(|c| c.is_exported)
                    .map(|c| &c.name),
            );

        for name in exported {
            if !exports.contains(name) {
                exports.push(name.clone());
            }
        }

        Self {
            language,
            functions: extracted.functions,
            classes: extracted.classes,
            imports: extracted.imports,
            exports,
        }
    }

    pub fn family(&self) -> LanguageFamily {
        self.language.family()
    }

    pub fn exported_functions(&self) -> impl Iterator<Item = &FunctionInfo> {
        self.functions.iter().filter(|f| f.is_exported)
    }

    pub fn exported_classes(&self) -> impl Iterator<Item = &ClassInfo> {
        self.classes.iter().filter(|c| c.is_exported)
    }
}

/* ============================================================
   Public API
   ============================================================ */

pub fn analyze_source(content: &str, language: Language) -> CodeAnalysis {
    let extracted = match language.family() {
        LanguageFamily::CurlyBrace => script::extract(content),
        LanguageFamily::Indentation => python::extract(content),
    };

    let analysis = CodeAnalysis::assemble(language, extracted);
    debug!(
        %language,
        functions = analysis.functions.len(),
        classes = analysis.classes.len(),
        imports = analysis.imports.len(),
        "extracted structure"
    );
    analysis
}

pub fn analyze_file(path: &Path) -> Result<CodeAnalysis> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::ReadSource {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(analyze_source(&content, detect_language(path)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn func(name: &str, exported: bool) -> FunctionInfo {
        FunctionInfo {
            name: name.into(),
            params: vec![],
            return_type: "void".into(),
            is_async: false,
            is_exported: exported,
        }
    }

    #[test]
    fn exports_follow_functions_then_classes_without_duplicates() {
        let extracted = Extracted {
            functions: vec![func("a", true), func("hidden", false), func("a", true)],
            classes: vec![ClassInfo {
                name: "Widget".into(),
                methods: vec![],
                is_exported: true,
            }],
            imports: vec![],
        };

        let analysis = CodeAnalysis::assemble(Language::TypeScript, extracted);
        assert_eq!(analysis.exports, vec!["a", "Widget"]);
        assert_eq!(analysis.functions.len(), 3);
    }

    #[test]
    fn every_export_has_an_exported_declaration() {
        let src = "export function a() {}\nfunction b() {}\nexport class C { m() {} }\nexport const d = () => 1;";
        let analysis = analyze_source(src, Language::TypeScript);

        for name in &analysis.exports {
            let declared = analysis.exported_functions().any(|f| &f.name == name)
                || analysis.exported_classes().any(|c| &c.name == name);
            assert!(declared, "{name} has no exported declaration");
        }
        assert_eq!(analysis.exports, vec!["a", "d", "C"]);
    }

    #[test]
    fn extraction_is_deterministic() {
        let src = "import x from 'x';\nexport async function f(a, b) {}\nexport class K { async run() {} }";
        assert_eq!(
            analyze_source(src, Language::TypeScript),
            analyze_source(src, Language::TypeScript)
        );

        let py = "import os\ndef f(a):\n    pass\nclass K:\n    pass\n";
        assert_eq!(
            analyze_source(py, Language::Python),
            analyze_source(py, Language::Python)
        );
    }

    #[test]
    fn analyze_file_reports_unreadable_paths() {
        let err = analyze_file(Path::new("/definitely/not/here.ts")).unwrap_err();
        assert!(matches!(err, Error::ReadSource { .. }));
    }
}
