//! analyzer/script.rs
//!
//! Extraction for block-delimited sources (TypeScript / JavaScript).

use lazy_static::lazy_static;
use regex::Regex;

use super::lexer::{
    brace_depths, in_code, mask_script, matching_delimiter, preceded_by, split_top_level,
};
use super::{ClassInfo, Extracted, FunctionInfo};

/// Return type recorded for declarations without an annotation.
const VOID: &str = "void";
/// Return type recorded for arrow bindings without an annotation.
const UNKNOWN: &str = "unknown";

/// How far back the export keyword may sit before a declaration.
const EXPORT_WINDOW: usize = 10;

/// Names that look like `name(...) {` inside a class body but are not methods.
const NOT_METHODS: &[&str] = &[
    "constructor", "if", "for", "while", "switch", "catch", "with", "function", "return",
    "super", "do", "else", "await", "typeof", "new",
];

lazy_static! {
    static ref IMPORT: Regex = Regex::new(concat!(
        r#"(?:\bimport\s+(?:type\s+)?(?:[\w$]+\s*,\s*)?(?:\{[^}]*\}|\*\s*as\s+[\w$]+|[\w$]+)\s+from\s*"#,
        r#"|\bexport\s+(?:type\s+)?(?:\{[^}]*\}|\*(?:\s*as\s+[\w$]+)?)\s*from\s*"#,
        r#"|\bimport\s*"#,
        r#"|\brequire\s*\(\s*)['"]([^'"\n]+)['"]"#,
    ))
    .unwrap_or_else(|e| panic!("regex: {e}"));

    static ref FUNCTION: Regex = Regex::new(
        r"\b(?:default\s+)?(async\s+)?function(?:\s*\*\s*|\s+)([\w$]+)\s*(?:<[^>(]*>)?\s*\("
    )
    .unwrap_or_else(|e| panic!("regex: {e}"));

    static ref ARROW: Regex = Regex::new(
        r"\b(?:const|let)\s+([\w$]+)\s*(?::[^=]+)?=\s*(async\s*)?\("
    )
    .unwrap_or_else(|e| panic!("regex: {e}"));

    static ref CLASS: Regex = Regex::new(
        r"\b(?:default\s+)?(?:abstract\s+)?class\s+([\w$]+)(?:\s*<[^>{]*>)?(?:\s+extends\s+[^{]+?)?(?:\s+implements\s+[^{]+)?\s*\{"
    )
    .unwrap_or_else(|e| panic!("regex: {e}"));

    static ref METHOD: Regex = Regex::new(
        r"(async\s+)?(?:\*\s*)?(#?[\w$]+)\s*(?:<[^>(]*>)?\s*\("
    )
    .unwrap_or_else(|e| panic!("regex: {e}"));

    /// What may follow a parameter list of a declaration with a body.
    static ref BLOCK_TAIL: Regex = Regex::new(r"^\s*(?::\s*([^{;]+?))?\s*\{")
        .unwrap_or_else(|e| panic!("regex: {e}"));

    /// What may follow the parameter list of an arrow binding.
    static ref ARROW_TAIL: Regex = Regex::new(r"^\s*(?::\s*([^=;{]+?))?\s*=>")
        .unwrap_or_else(|e| panic!("regex: {e}"));
}

/// Source and its masked twin, with block depth per byte.
struct Source<'a> {
    text: &'a str,
    masked: String,
    depths: Vec<u32>,
}

impl<'a> Source<'a> {
    fn new(text: &'a str) -> Self {
        let masked = mask_script(text);
        let depths = brace_depths(&masked);
        Self {
            text,
            masked,
            depths,
        }
    }

    fn depth(&self, pos: usize) -> u32 {
        self.depths.get(pos).copied().unwrap_or(0)
    }

    fn exported(&self, pos: usize) -> bool {
        preceded_by(&self.masked, pos, EXPORT_WINDOW, "export")
    }

    /// Parameter list opening at `open`: (raw params, index of closing paren).
    fn params(&self, open: usize) -> Option<(Vec<String>, usize)> {
        let close = matching_delimiter(&self.masked, open, b'(', b')')?;
        let params = split_top_level(&self.text[open + 1..close], &self.masked[open + 1..close])
            .into_iter()
            .map(str::to_owned)
            .collect();
        Some((params, close))
    }

    /// Match `tail` right after `pos` and return the trimmed annotation, if any.
    /// A blank annotation counts as none.
    fn tail(&self, tail: &Regex, pos: usize) -> Option<Option<String>> {
        let caps = tail.captures(&self.masked[pos..])?;
        Some(
            caps.get(1)
                .map(|m| self.text[pos + m.start()..pos + m.end()].trim())
                .filter(|t| !t.is_empty())
                .map(str::to_owned),
        )
    }
}

/* ============================================================
   Public entry
   ============================================================ */

pub(super) fn extract(content: &str) -> Extracted {
    let src = Source::new(content);

    let mut functions = declared_functions(&src);
    functions.extend(arrow_functions(&src));
    functions.sort_by_key(|(pos, _)| *pos);

    Extracted {
        functions: functions.into_iter().map(|(_, f)| f).collect(),
        classes: classes(&src),
        imports: imports(&src),
    }
}

/* ============================================================
   Imports
   ============================================================ */

fn imports(src: &Source) -> Vec<String> {
    IMPORT
        .captures_iter(src.text)
        .filter(|c| c.get(0).is_some_and(|m| in_code(src.text, &src.masked, m.start())))
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_owned()))
        .collect()
}

/* ============================================================
   Functions
   ============================================================ */

fn declared_functions(src: &Source) -> Vec<(usize, FunctionInfo)> {
    let mut out = Vec::new();

    for caps in FUNCTION.captures_iter(&src.masked) {
        let Some(whole) = caps.get(0) else { continue };
        if src.depth(whole.start()) != 0 {
            continue;
        }

        let open = whole.end() - 1;
        let Some((params, close)) = src.params(open) else {
            continue;
        };
        // Overload signatures and `declare` stubs have no body
        let Some(return_type) = src.tail(&BLOCK_TAIL, close + 1) else {
            continue;
        };

        out.push((
            whole.start(),
            FunctionInfo {
                name: caps[2].to_owned(),
                params,
                return_type: return_type.unwrap_or_else(|| VOID.into()),
                is_async: caps.get(1).is_some(),
                is_exported: src.exported(whole.start()),
            },
        ));
    }

    out
}

/// `const name = (...) => ...` bindings.
///
/// Parameters are not recorded for this form; `params` is always empty.
fn arrow_functions(src: &Source) -> Vec<(usize, FunctionInfo)> {
    let mut out = Vec::new();

    for caps in ARROW.captures_iter(&src.masked) {
        let Some(whole) = caps.get(0) else { continue };
        if src.depth(whole.start()) != 0 {
            continue;
        }

        let open = whole.end() - 1;
        let Some(close) = matching_delimiter(&src.masked, open, b'(', b')') else {
            continue;
        };
        let Some(return_type) = src.tail(&ARROW_TAIL, close + 1) else {
            continue;
        };

        out.push((
            whole.start(),
            FunctionInfo {
                name: caps[1].to_owned(),
                params: Vec::new(),
                return_type: return_type.unwrap_or_else(|| UNKNOWN.into()),
                is_async: caps.get(2).is_some(),
                is_exported: src.exported(whole.start()),
            },
        ));
    }

    out
}

/* ============================================================
   Classes
   ============================================================ */

fn classes(src: &Source) -> Vec<ClassInfo> {
    let mut out = Vec::new();

    for caps in CLASS.captures_iter(&src.masked) {
        let Some(whole) = caps.get(0) else { continue };
        if src.depth(whole.start()) != 0 {
            continue;
        }

        let open = whole.end() - 1;
        // Unterminated bodies run to end of input
        let close = matching_delimiter(&src.masked, open, b'{', b'}').unwrap_or(src.masked.len());

        out.push(ClassInfo {
            name: caps[1].to_owned(),
            methods: methods(src, open, close),
            is_exported: src.exported(whole.start()),
        });
    }

    out
}

fn methods(src: &Source, open: usize, close: usize) -> Vec<FunctionInfo> {
    let body_start = open + 1;
    let member_depth = src.depth(open) + 1;
    let mut out = Vec::new();

    for caps in METHOD.captures_iter(&src.masked[body_start..close]) {
        let Some(whole) = caps.get(0) else { continue };
        let at = body_start + whole.start();
        if src.depth(at) != member_depth {
            continue;
        }

        let name = &caps[2];
        if NOT_METHODS.contains(&name) {
            continue;
        }

        let paren = body_start + whole.end() - 1;
        let Some((params, end)) = src.params(paren) else {
            continue;
        };
        if end >= close {
            continue;
        }
        let Some(return_type) = src.tail(&BLOCK_TAIL, end + 1) else {
            continue;
        };

        out.push(FunctionInfo {
            name: name.to_owned(),
            params,
            return_type: return_type.unwrap_or_else(|| VOID.into()),
            is_async: caps.get(1).is_some(),
            is_exported: true,
        });
    }

    out
}
