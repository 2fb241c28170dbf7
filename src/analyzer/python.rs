//! analyzer/python.rs
//!
//! Extraction for indentation-scoped sources (Python).
//!
//! Only column-zero `def` / `class` lines are considered. Class bodies are
//! not scanned for methods, so every `ClassInfo` produced here has an
//! empty method list.

use lazy_static::lazy_static;
use regex::Regex;

use super::lexer::{mask_python, matching_delimiter, split_top_level};
use super::{ClassInfo, Extracted, FunctionInfo};

/// Return type recorded when a `def` has no `->` annotation.
const NONE: &str = "None";

lazy_static! {
    static ref IMPORT: Regex = Regex::new(
        r"(?m)^[ \t]*(?:from[ \t]+([\w.]+)[ \t]+import\b|import[ \t]+([^\n;]+))"
    )
    .unwrap_or_else(|e| panic!("regex: {e}"));

    static ref FUNCTION: Regex = Regex::new(r"(?m)^(async[ \t]+)?def[ \t]+(\w+)[ \t]*\(")
        .unwrap_or_else(|e| panic!("regex: {e}"));

    static ref CLASS: Regex = Regex::new(r"(?m)^class[ \t]+(\w+)[ \t]*(?:\([^)]*\))?[ \t]*:")
        .unwrap_or_else(|e| panic!("regex: {e}"));

    static ref DEF_TAIL: Regex = Regex::new(r"^\s*(?:->\s*([^:]+?))?\s*:")
        .unwrap_or_else(|e| panic!("regex: {e}"));
}

/* ============================================================
   Public entry
   ============================================================ */

pub(super) fn extract(content: &str) -> Extracted {
    let masked = mask_python(content);

    Extracted {
        functions: functions(content, &masked),
        classes: classes(&masked),
        imports: imports(&masked),
    }
}

fn is_exported(name: &str) -> bool {
    !name.starts_with('_')
}

/* ============================================================
   Imports
   ============================================================ */

fn imports(masked: &str) -> Vec<String> {
    let mut out = Vec::new();

    for caps in IMPORT.captures_iter(masked) {
        if let Some(module) = caps.get(1) {
            out.push(module.as_str().to_owned());
            continue;
        }

        // `import a.b, c as d` names several modules
        if let Some(list) = caps.get(2) {
            out.extend(
                list.as_str()
                    .split(',')
                    .filter_map(|m| m.split_whitespace().next())
                    .map(str::to_owned),
            );
        }
    }

    out
}

/* ============================================================
   Functions
   ============================================================ */

fn functions(src: &str, masked: &str) -> Vec<FunctionInfo> {
    let mut out = Vec::new();

    for caps in FUNCTION.captures_iter(masked) {
        let Some(whole) = caps.get(0) else { continue };

        let open = whole.end() - 1;
        let Some(close) = matching_delimiter(masked, open, b'(', b')') else {
            continue;
        };
        let Some(tail) = DEF_TAIL.captures(&masked[close + 1..]) else {
            continue;
        };

        let params = split_top_level(&src[open + 1..close], &masked[open + 1..close])
            .into_iter()
            .filter_map(|p| p.split(':').next())
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(str::to_owned)
            .collect();

        let return_type = tail
            .get(1)
            .map(|m| src[close + 1 + m.start()..close + 1 + m.end()].trim().to_owned())
            .unwrap_or_else(|| NONE.into());

        let name = caps[2].to_owned();
        out.push(FunctionInfo {
            is_exported: is_exported(&name),
            name,
            params,
            return_type,
            is_async: caps.get(1).is_some(),
        });
    }

    out
}

/* ============================================================
   Classes
   ============================================================ */

fn classes(masked: &str) -> Vec<ClassInfo> {
    CLASS
        .captures_iter(masked)
        .map(|caps| {
            let name = caps[1].to_owned();
            ClassInfo {
                is_exported: is_exported(&name),
                name,
                methods: Vec::new(),
            }
        })
        .collect()
}
