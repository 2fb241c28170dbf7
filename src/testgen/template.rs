//! testgen/template.rs
//!
//! Renders a test skeleton from a `CodeAnalysis`.
//!
//! Every test body holds commented guidance for a human to fill in,
//! never real assertions.

use std::collections::HashSet;
use std::path::Path;

use crate::analyzer::{ClassInfo, CodeAnalysis, FunctionInfo};
use crate::config::Coverage;
use crate::detectors::framework::TestFramework;
use crate::testgen::{jest, pytest};

/// Everything a framework renderer needs.
pub struct RenderContext<'a> {
    pub analysis: &'a CodeAnalysis,
    /// Subject module as imported from the test file.
    pub module: String,
    pub coverage: Coverage,
}

/* ============================================================
   Public API
   ============================================================ */

pub fn render(
    analysis: &CodeAnalysis,
    source: &Path,
    framework: TestFramework,
    coverage: Coverage,
) -> String {
    let ctx = RenderContext {
        analysis,
        module: crate::testgen::path::module_stem(source),
        coverage,
    };

    match framework {
        TestFramework::Jest | TestFramework::Vitest => jest::render(&ctx, framework),
        TestFramework::Pytest => pytest::render(&ctx),
    }
}

/* ============================================================
   Shared helpers
   ============================================================ */

/// What gets a top-level test group, in render order, titled by name.
pub fn test_subjects(analysis: &CodeAnalysis) -> (Vec<&FunctionInfo>, Vec<&ClassInfo>) {
    test_subjects_by(analysis, str::to_owned, str::to_owned)
}

/// Exported functions come first, then exported classes. A subject whose
/// rendered title has already been used is skipped, so every title
/// appears once.
pub fn test_subjects_by<'a>(
    analysis: &'a CodeAnalysis,
    function_title: impl Fn(&str) -> String,
    class_title: impl Fn(&str) -> String,
) -> (Vec<&'a FunctionInfo>, Vec<&'a ClassInfo>) {
    let mut seen = HashSet::new();

    let functions = analysis
        .exported_functions()
        .filter(|f| seen.insert(function_title(&f.name)))
        .collect();
    let classes = analysis
        .exported_classes()
        .filter(|c| seen.insert(class_title(&c.name)))
        .collect();

    (functions, classes)
}

/// One placeholder per captured parameter, comma separated.
pub fn placeholder_args(f: &FunctionInfo, token: &str) -> String {
    vec![token; f.params.len()].join(", ")
}

pub fn await_prefix(f: &FunctionInfo) -> &'static str {
    if f.is_async {
        "await "
    } else {
        ""
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::analyze_source;
    use crate::detectors::language::Language;

    #[test]
    fn subjects_are_unique_by_name() {
        let analysis = analyze_source(
            "export function a() {}\nexport function a() {}\nexport class a {}\nexport class B {}",
            Language::TypeScript,
        );
        let (functions, classes) = test_subjects(&analysis);
        assert_eq!(functions.len(), 1);
        assert_eq!(classes.len(), 1);
        assert_eq!(classes[0].name, "B");
    }

    #[test]
    fn placeholders_match_param_count() {
        let analysis = analyze_source("export async function f(a, b, c) {}", Language::JavaScript);
        let f = &analysis.functions[0];
        assert_eq!(placeholder_args(f, "/* arg */"), "/* arg */, /* arg */, /* arg */");
        assert_eq!(await_prefix(f), "await ");
    }

    #[test]
    fn rendering_is_pure() {
        let analysis = analyze_source("export function add(a, b) { return a + b; }", Language::TypeScript);
        let src = Path::new("src/math.ts");
        let first = render(&analysis, src, TestFramework::Jest, Coverage::default());
        let second = render(&analysis, src, TestFramework::Jest, Coverage::default());
        assert_eq!(first, second);
    }

    #[test]
    fn exported_function_title_appears_once() {
        let analysis = analyze_source(
            "export function add(a, b) { return a + b; }\nexport function add(a) { return a; }",
            Language::TypeScript,
        );
        let js = render(&analysis, Path::new("math.ts"), TestFramework::Vitest, Coverage::default());
        assert_eq!(js.matches("\ndescribe('add', () => {").count(), 1);

        let py = analyze_source("def add(a, b):\n    return a + b\n", Language::Python);
        let out = render(&py, Path::new("math.py"), TestFramework::Pytest, Coverage::default());
        assert_eq!(out.matches("\nclass TestAdd:").count(), 1);
    }
}
