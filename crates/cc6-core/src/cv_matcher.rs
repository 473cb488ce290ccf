//! Comparison of one observed value against one CV entry.

use std::borrow::Cow;
use std::collections::BTreeMap;

use cc6_model::{AttributeValue, CvEntry};

use crate::trace::TraceOutcome;

/// Result of [`match_entry`].
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome<'cv> {
    Match,
    /// The value is a key of a keyed-nested entry; the payload constrains
    /// dependent attributes.
    MatchWithDependents(&'cv BTreeMap<String, CvEntry>),
    Mismatch,
    /// The CV pattern does not compile.
    InvalidPattern { pattern: &'cv str, reason: &'cv str },
}

impl MatchOutcome<'_> {
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match | Self::MatchWithDependents(_))
    }

    /// Dependent attribute names to compare next.
    pub fn nested_keys(&self) -> Vec<&str> {
        match self {
            Self::MatchWithDependents(payload) => payload.keys().map(String::as_str).collect(),
            _ => Vec::new(),
        }
    }

    pub fn trace_outcome(&self) -> TraceOutcome {
        match self {
            Self::Match | Self::MatchWithDependents(_) => TraceOutcome::Match,
            Self::Mismatch => TraceOutcome::Mismatch,
            Self::InvalidPattern { .. } => TraceOutcome::InvalidPattern,
        }
    }
}

/// String form used for every comparison.
pub fn observed_text(value: &AttributeValue) -> Cow<'_, str> {
    match value {
        AttributeValue::Text(text) => Cow::Borrowed(text),
        other => Cow::Owned(other.to_string()),
    }
}

/// Compare `observed` against `entry`.
///
/// Enumeration members are tried literally first and then as patterns; a
/// member that is not a valid pattern can only match literally.
pub fn match_entry<'cv>(entry: &'cv CvEntry, observed: &AttributeValue) -> MatchOutcome<'cv> {
    let text = observed_text(observed);
    let value = text.as_ref();
    match entry {
        CvEntry::Regex(pattern) => match pattern.full_match(value) {
            Ok(true) => MatchOutcome::Match,
            Ok(false) => MatchOutcome::Mismatch,
            Err(reason) => MatchOutcome::InvalidPattern {
                pattern: pattern.source(),
                reason,
            },
        },
        CvEntry::Enumeration(items) => {
            let matched = items.iter().any(|item| item.literal == value)
                || items.iter().any(|item| item.pattern.matches(value));
            outcome(matched)
        }
        CvEntry::KeyedValue(values) => outcome(values.contains_key(value)),
        CvEntry::KeyedNested(payloads) => match payloads.get(value) {
            Some(payload) => MatchOutcome::MatchWithDependents(payload),
            None => MatchOutcome::Mismatch,
        },
        CvEntry::Literal(literal) => outcome(literal == value),
    }
}

fn outcome(matched: bool) -> MatchOutcome<'static> {
    if matched {
        MatchOutcome::Match
    } else {
        MatchOutcome::Mismatch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn regex_requires_full_match() {
        let entry = CvEntry::regex("v[0-9]+");
        assert!(match_entry(&entry, &"v2".into()).is_match());
        assert!(!match_entry(&entry, &"v2-beta".into()).is_match());
    }

    #[test]
    fn enumeration_accepts_literals_and_patterns() {
        let entry = CvEntry::enumeration(["model-output", "r[0-9]+"]);
        assert!(match_entry(&entry, &"model-output".into()).is_match());
        assert!(match_entry(&entry, &"r12".into()).is_match());
        assert_eq!(match_entry(&entry, &"obs".into()), MatchOutcome::Mismatch);
    }

    #[test]
    fn enumeration_member_with_invalid_pattern_matches_literally() {
        let entry = CvEntry::enumeration(["a(b"]);
        assert!(match_entry(&entry, &"a(b".into()).is_match());
        assert_eq!(match_entry(&entry, &"ab".into()), MatchOutcome::Mismatch);
    }

    #[test]
    fn keyed_value_checks_keys_only() {
        let entry = CvEntry::keyed_value([("mon", "monthly mean samples")]);
        assert!(match_entry(&entry, &"mon".into()).is_match());
        assert!(!match_entry(&entry, &"monthly mean samples".into()).is_match());
        assert!(match_entry(&entry, &"mon".into()).nested_keys().is_empty());
    }

    #[test]
    fn keyed_nested_returns_dependents() {
        let entry = CvEntry::KeyedNested(BTreeMap::from([(
            "REMO2020".to_string(),
            BTreeMap::from([
                ("institution_id".to_string(), CvEntry::enumeration(["GERICS"])),
                ("min_years".to_string(), CvEntry::Literal("30".to_string())),
            ]),
        )]));
        let outcome = match_entry(&entry, &"REMO2020".into());
        assert_eq!(outcome.nested_keys(), vec!["institution_id", "min_years"]);
        assert_eq!(match_entry(&entry, &"RACMO".into()), MatchOutcome::Mismatch);
    }

    #[test]
    fn literal_compares_string_forms() {
        let entry = CvEntry::Literal("30".to_string());
        assert!(match_entry(&entry, &AttributeValue::Integer(30)).is_match());
        assert!(match_entry(&entry, &"30".into()).is_match());
        assert!(!match_entry(&entry, &AttributeValue::Float(30.0)).is_match());
    }

    #[test]
    fn invalid_regex_is_reported() {
        let entry = CvEntry::regex("(unclosed");
        match match_entry(&entry, &"x".into()) {
            MatchOutcome::InvalidPattern { pattern, reason } => {
                assert_eq!(pattern, "(unclosed");
                assert!(!reason.is_empty());
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
