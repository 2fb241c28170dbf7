//! analyzer/lexer.rs
//!
//! Byte-level helpers shared by the extractors.
//!
//! Masking replaces the contents of string literals and comments with
//! spaces. The masked text has exactly the same byte length as the input,
//! so any offset found in it can be used to slice the input.

/* ============================================================
   Masking
   ============================================================ */

#[derive(Clone, Copy)]
enum ScriptState {
    Code,
    LineComment,
    BlockComment,
    Quoted(u8),
    Template,
    Regex { in_class: bool },
}

/// Words after which a `/` starts a regex literal rather than a division.
const REGEX_KEYWORDS: &[&str] = &[
    "return", "typeof", "instanceof", "in", "of", "new", "delete", "void", "throw", "case", "do",
    "else", "yield", "await",
];

/// Mask comments and literals of block-delimited (JS/TS) source.
pub fn mask_script(src: &str) -> String {
    let bytes = src.as_bytes();
    let mut out = bytes.to_vec();
    let mut state = ScriptState::Code;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        let next = bytes.get(i + 1).copied();

        match state {
            ScriptState::Code => match (b, next) {
                (b'/', Some(b'/')) => {
                    blank(&mut out, i, 2);
                    state = ScriptState::LineComment;
                    i += 1;
                }
                (b'/', Some(b'*')) => {
                    blank(&mut out, i, 2);
                    state = ScriptState::BlockComment;
                    i += 1;
                }
                (b'/', _) if regex_allowed(&out[..i]) => {
                    state = ScriptState::Regex { in_class: false };
                }
                (b'\'' | b'"', _) => state = ScriptState::Quoted(b),
                (b'`', _) => state = ScriptState::Template,
                _ => {}
            },
            ScriptState::LineComment => {
                if b == b'\n' {
                    state = ScriptState::Code;
                } else {
                    blank(&mut out, i, 1);
                }
            }
            ScriptState::BlockComment => {
                if b == b'*' && next == Some(b'/') {
                    blank(&mut out, i, 2);
                    state = ScriptState::Code;
                    i += 1;
                } else if b != b'\n' {
                    blank(&mut out, i, 1);
                }
            }
            ScriptState::Quoted(q) => {
                if b == b'\\' {
                    blank(&mut out, i, 2);
                    i += 1;
                } else if b == q {
                    state = ScriptState::Code;
                } else if b == b'\n' {
                    // unterminated literal
                    state = ScriptState::Code;
                } else {
                    blank(&mut out, i, 1);
                }
            }
            ScriptState::Template => {
                if b == b'\\' {
                    blank(&mut out, i, 2);
                    i += 1;
                } else if b == b'`' {
                    state = ScriptState::Code;
                } else if b != b'\n' {
                    blank(&mut out, i, 1);
                }
            }
            ScriptState::Regex { in_class } => match b {
                b'\\' => {
                    blank(&mut out, i, 2);
                    i += 1;
                }
                // unterminated literal
                b'\n' => state = ScriptState::Code,
                b'/' if !in_class => state = ScriptState::Code,
                b'[' => {
                    blank(&mut out, i, 1);
                    state = ScriptState::Regex { in_class: true };
                }
                b']' => {
                    blank(&mut out, i, 1);
                    state = ScriptState::Regex { in_class: false };
                }
                _ => blank(&mut out, i, 1),
            },
        }

        i += 1;
    }

    into_string(out)
}

/// Whether a `/` following the already-masked `before` opens a regex.
///
/// Division follows an operand: an identifier, a number, a literal or a
/// closing `)` / `]`. Keywords such as `return` are not operands. `</`
/// is a JSX closing tag.
fn regex_allowed(before: &[u8]) -> bool {
    let Some(end) = before.iter().rposition(|b| !b.is_ascii_whitespace()) else {
        return true;
    };
    let code = &before[..=end];
    let last = code[end];

    if is_ident_byte(last) {
        let start = code
            .iter()
            .rposition(|&b| !is_ident_byte(b))
            .map_or(0, |p| p + 1);
        let word = &code[start..];
        return REGEX_KEYWORDS.iter().any(|k| k.as_bytes() == word);
    }

    !matches!(last, b')' | b']' | b'\'' | b'"' | b'`' | b'<')
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

#[derive(Clone, Copy)]
enum PythonState {
    Code,
    Comment,
    Quoted(u8),
    TripleQuoted(u8),
}

/// Mask comments and string literals (including docstrings) of Python source.
pub fn mask_python(src: &str) -> String {
    let bytes = src.as_bytes();
    let mut out = bytes.to_vec();
    let mut state = PythonState::Code;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];

        match state {
            PythonState::Code => match b {
                b'#' => {
                    blank(&mut out, i, 1);
                    state = PythonState::Comment;
                }
                b'\'' | b'"' => {
                    if bytes[i..].starts_with(&[b, b, b]) {
                        state = PythonState::TripleQuoted(b);
                        i += 2;
                    } else {
                        state = PythonState::Quoted(b);
                    }
                }
                _ => {}
            },
            PythonState::Comment => {
                if b == b'\n' {
                    state = PythonState::Code;
                } else {
                    blank(&mut out, i, 1);
                }
            }
            PythonState::Quoted(q) => {
                if b == b'\\' {
                    blank(&mut out, i, 2);
                    i += 1;
                } else if b == q || b == b'\n' {
                    state = PythonState::Code;
                } else {
                    blank(&mut out, i, 1);
                }
            }
            PythonState::TripleQuoted(q) => {
                if b == b'\\' {
                    blank(&mut out, i, 2);
                    i += 1;
                } else if bytes[i..].starts_with(&[q, q, q]) {
                    state = PythonState::Code;
                    i += 2;
                } else if b != b'\n' {
                    blank(&mut out, i, 1);
                }
            }
        }

        i += 1;
    }

    into_string(out)
}

fn blank(out: &mut [u8], at: usize, len: usize) {
    let end = (at + len).min(out.len());
    for b in &mut out[at..end] {
        if *b != b'\n' {
            *b = b' ';
        }
    }
}

fn into_string(bytes: Vec<u8>) -> String {
    // masking only ever touches whole characters
    String::from_utf8(bytes)
        .unwrap_or_else(|e| String::from_utf8_lossy(e.as_bytes()).into_owned())
}

/// True when `pos` in `src` was not blanked out by masking.
pub fn in_code(src: &str, masked: &str, pos: usize) -> bool {
    src.as_bytes().get(pos) == masked.as_bytes().get(pos)
}

/* ============================================================
   Delimiters
   ============================================================ */

/// Index of the delimiter closing the one at `open_at`.
///
/// Nested pairs are counted, so `{ a { b } c }` closes at the last brace.
/// Returns `None` when the input ends first.
pub fn matching_delimiter(masked: &str, open_at: usize, open: u8, close: u8) -> Option<usize> {
    let bytes = masked.as_bytes();
    if bytes.get(open_at) != Some(&open) {
        return None;
    }

    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(open_at) {
        if b == open {
            depth += 1;
        } else if b == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }

    None
}

/// Brace depth in effect at every byte offset.
///
/// The opening brace itself sits at the outer depth; the byte after it is
/// one level deeper. Stray closing braces never drive depth below zero.
pub fn brace_depths(masked: &str) -> Vec<u32> {
    let mut depths = Vec::with_capacity(masked.len());
    let mut depth = 0u32;

    for &b in masked.as_bytes() {
        if b == b'}' {
            depth = depth.saturating_sub(1);
        }
        depths.push(depth);
        if b == b'{' {
            depth += 1;
        }
    }

    depths
}

/// Split a parameter list on commas that are not nested in brackets.
///
/// `masked` must be the masked form of `src`, so commas inside string
/// defaults do not split. Entries are trimmed; empty entries are dropped.
pub fn split_top_level<'a>(src: &'a str, masked: &str) -> Vec<&'a str> {
    let bytes = masked.as_bytes();
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;

    for (i, &b) in bytes.iter().enumerate() {
        match b {
            b'(' | b'[' | b'{' | b'<' => depth += 1,
            // `=>` is an arrow, not a closing angle bracket
            b'>' if i > 0 && bytes[i - 1] == b'=' => {}
            b')' | b']' | b'}' | b'>' => depth -= 1,
            b',' if depth <= 0 => {
                parts.push(&src[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&src[start..]);

    parts
        .into_iter()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect()
}

/// Whether the `window` bytes before `pos` contain `needle`.
pub fn preceded_by(masked: &str, pos: usize, window: usize, needle: &str) -> bool {
    let bytes = masked.as_bytes();
    let lo = pos.saturating_sub(window);
    let hi = pos.min(bytes.len());
    bytes[lo..hi]
        .windows(needle.len())
        .any(|w| w == needle.as_bytes())
}
