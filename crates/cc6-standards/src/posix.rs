//! POSIX regular expression conversion.
//!
//! CMOR CV tables are written with POSIX regular expressions: bracket classes
//! like `[[:digit:]]` and escaped interval quantifiers like `\{1,\}`. Both are
//! rewritten into `regex` syntax before a pattern is compiled.

/// POSIX bracket classes and their ASCII replacements.
const POSIX_CLASSES: &[(&str, &str)] = &[
    ("[[:alnum:]]", "[a-zA-Z0-9]"),
    ("[[:alpha:]]", "[a-zA-Z]"),
    ("[[:digit:]]", r"\d"),
    ("[[:xdigit:]]", "[0-9a-fA-F]"),
    ("[[:lower:]]", "[a-z]"),
    ("[[:upper:]]", "[A-Z]"),
    ("[[:blank:]]", r"[ \t]"),
    ("[[:space:]]", r"\s"),
    ("[[:punct:]]", r"[!-/:-@\[-`{-~]"),
    ("[[:word:]]", r"\w"),
];

/// Convert a POSIX CV pattern into `regex` syntax.
pub fn convert_posix_regex(pattern: &str) -> String {
    let mut converted = pattern.to_string();
    for (posix, ascii) in POSIX_CLASSES {
        converted = converted.replace(posix, ascii);
    }
    unescape_quantifiers(&converted)
}

/// `\{` and `\}` become plain braces; other escapes are kept.
fn unescape_quantifiers(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some(brace @ ('{' | '}')) => out.push(brace),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
