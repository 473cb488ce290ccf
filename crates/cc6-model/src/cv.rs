//! Controlled Vocabulary (CV) model.
//!
//! A CV maps global attribute names to the values they may take. The JSON
//! tables carry no type tags, so every entry is classified once at load time
//! into one of the [`CvEntry`] shapes:
//!
//! | JSON value                          | shape                      |
//! |-------------------------------------|----------------------------|
//! | string                              | [`CvEntry::Regex`]         |
//! | list                                | [`CvEntry::Enumeration`]   |
//! | object of strings                   | [`CvEntry::KeyedValue`]    |
//! | object of objects                   | [`CvEntry::KeyedNested`]   |
//! | number / bool (nested payload only) | [`CvEntry::Literal`]       |
//!
//! ## Example: `source_id`
//!
//! ```text
//! "source_id": {
//!     "REMO2020": { "institution_id": ["GERICS"], "license": "..." }
//! }
//! ```
//!
//! A file with `source_id = "REMO2020"` matches at the first level and its
//! `institution_id` is then compared against `["GERICS"]` at the second.

use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;

/// A CV regular expression, compiled once.
///
/// Patterns always match the whole value and use ASCII semantics for
/// `\d`, `\w` and `\s`. A pattern that fails to compile is kept together
/// with the compiler message so the comparison can report it instead of
/// aborting the run.
#[derive(Debug, Clone)]
pub struct CvPattern {
    source: String,
    compiled: Result<Regex, String>,
}

impl CvPattern {
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let anchored = format!(r"\A(?:{})\z", ascii_classes(&source));
        let compiled = Regex::new(&anchored).map_err(|error| error.to_string());
        Self { source, compiled }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn is_valid(&self) -> bool {
        self.compiled.is_ok()
    }

    /// Full match of `value`, or the compile error for an invalid pattern.
    pub fn full_match(&self, value: &str) -> Result<bool, &str> {
        match &self.compiled {
            Ok(regex) => Ok(regex.is_match(value)),
            Err(reason) => Err(reason),
        }
    }

    /// Full match of `value`; invalid patterns never match.
    pub fn matches(&self, value: &str) -> bool {
        self.full_match(value).unwrap_or(false)
    }
}

impl PartialEq for CvPattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

/// Rewrite Perl shorthand classes to their ASCII equivalents.
fn ascii_classes(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len());
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('d') => out.push_str("[0-9]"),
            Some('D') => out.push_str("[^0-9]"),
            Some('w') => out.push_str("[0-9A-Za-z_]"),
            Some('W') => out.push_str("[^0-9A-Za-z_]"),
            Some('s') => out.push_str(r"[\t\n\x0B\x0C\r ]"),
            Some('S') => out.push_str(r"[^\t\n\x0B\x0C\r ]"),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// One element of an enumeration: matched literally first, then as a pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct EnumItem {
    pub literal: String,
    pub pattern: CvPattern,
}

impl EnumItem {
    pub fn new(literal: impl Into<String>) -> Self {
        let literal = literal.into();
        let pattern = CvPattern::new(literal.clone());
        Self { literal, pattern }
    }
}

/// A classified CV entry.
#[derive(Debug, Clone, PartialEq)]
pub enum CvEntry {
    /// The value must fully match the pattern.
    Regex(CvPattern),
    /// The value must be a member, or match one of the members as a pattern.
    Enumeration(Vec<EnumItem>),
    /// The value must be a key; the payload is a free-form description.
    KeyedValue(BTreeMap<String, String>),
    /// The value must be a key; the payload constrains dependent attributes.
    KeyedNested(BTreeMap<String, BTreeMap<String, CvEntry>>),
    /// The value's string form must equal the literal.
    Literal(String),
}

impl CvEntry {
    pub fn regex(pattern: impl Into<String>) -> Self {
        Self::Regex(CvPattern::new(pattern))
    }

    pub fn enumeration<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enumeration(items.into_iter().map(EnumItem::new).collect())
    }

    pub fn keyed_value<I, K, V>(items: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::KeyedValue(
            items
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    pub fn shape(&self) -> CvShape {
        match self {
            Self::Regex(_) => CvShape::Regex,
            Self::Enumeration(_) => CvShape::Enumeration,
            Self::KeyedValue(_) => CvShape::KeyedValue,
            Self::KeyedNested(_) => CvShape::KeyedNested,
            Self::Literal(_) => CvShape::Literal,
        }
    }

    /// Literal members of an enumeration (empty for other shapes).
    pub fn literals(&self) -> Vec<&str> {
        match self {
            Self::Enumeration(items) => items.iter().map(|item| item.literal.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}

/// Shape tag of a [`CvEntry`], used in traces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CvShape {
    Regex,
    Enumeration,
    KeyedValue,
    KeyedNested,
    Literal,
}

impl CvShape {
    pub fn as_str(&self) -> &'static str {
        match self {
            CvShape::Regex => "regex",
            CvShape::Enumeration => "enumeration",
            CvShape::KeyedValue => "keyed-value",
            CvShape::KeyedNested => "keyed-nested",
            CvShape::Literal => "literal",
        }
    }
}

impl fmt::Display for CvShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key listing the attributes every file must carry.
pub const REQUIRED_GLOBAL_ATTRIBUTES_KEY: &str = "required_global_attributes";

/// Key of the DRS templates (passed through, not interpreted).
pub const DRS_KEY: &str = "DRS";

/// The classified vocabulary. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ControlledVocabulary {
    entries: BTreeMap<String, CvEntry>,
}

impl ControlledVocabulary {
    pub fn new(entries: BTreeMap<String, CvEntry>) -> Self {
        Self { entries }
    }

    pub fn get(&self, attribute: &str) -> Option<&CvEntry> {
        self.entries.get(attribute)
    }

    pub fn contains(&self, attribute: &str) -> bool {
        self.entries.contains_key(attribute)
    }

    pub fn attributes(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Names listed under `required_global_attributes`, in table order.
    pub fn required_global_attributes(&self) -> Vec<&str> {
        self.get(REQUIRED_GLOBAL_ATTRIBUTES_KEY)
            .map(CvEntry::literals)
            .unwrap_or_default()
    }

    pub fn drs(&self) -> Option<&CvEntry> {
        self.get(DRS_KEY)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, CvEntry)> for ControlledVocabulary {
    fn from_iter<I: IntoIterator<Item = (String, CvEntry)>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_is_anchored() {
        let pattern = CvPattern::new("v[0-9]+");
        assert!(pattern.matches("v1"));
        assert!(!pattern.matches("v1-r1"));
        assert!(!pattern.matches("xv1"));
    }

    #[test]
    fn shorthand_classes_are_ascii_only() {
        let pattern = CvPattern::new(r"\d+");
        assert!(pattern.matches("2024"));
        // Arabic-Indic digits are Unicode digits but not ASCII ones.
        assert!(!pattern.matches("\u{0662}\u{0660}"));
    }

    #[test]
    fn invalid_pattern_reports_reason() {
        let pattern = CvPattern::new("(unclosed");
        assert!(!pattern.is_valid());
        assert!(pattern.full_match("unclosed").is_err());
        assert!(!pattern.matches("(unclosed"));
    }

    #[test]
    fn required_attributes_come_from_enumeration() {
        let cv: ControlledVocabulary = [(
            REQUIRED_GLOBAL_ATTRIBUTES_KEY.to_string(),
            CvEntry::enumeration(["project_id", "domain_id"]),
        )]
        .into_iter()
        .collect();
        assert_eq!(cv.required_global_attributes(), vec!["project_id", "domain_id"]);
    }
}
