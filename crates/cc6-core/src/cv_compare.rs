//! Comparison of a set of observed attributes against the CV.
//!
//! Every observed attribute that is a top-level CV key is matched (level 1).
//! When the CV entry is keyed-nested, the matched payload names dependent
//! attributes; those present in the observed set are matched against the
//! payload (level 2). A third level is a configuration error.

use std::collections::BTreeMap;

use cc6_model::{AttributeMap, AttributeValue, ConfigurationError, ControlledVocabulary, CvEntry};

use crate::cv_matcher::{MatchOutcome, match_entry, observed_text};
use crate::trace::{CvTraceEvent, TraceSink, TracingSink};

/// One failed comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub attribute: String,
    /// 1 for attributes, 2 for dependents.
    pub level: u8,
    pub message: String,
}

/// Result of a comparison run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comparison {
    /// Every attribute that was compared, with whether it complied.
    pub checked: BTreeMap<String, bool>,
    /// Failures in observed order.
    pub findings: Vec<Finding>,
}

impl Comparison {
    pub fn is_compliant(&self) -> bool {
        self.checked.values().all(|ok| *ok)
    }

    pub fn failed(&self) -> impl Iterator<Item = &str> {
        self.checked
            .iter()
            .filter(|(_, ok)| !**ok)
            .map(|(name, _)| name.as_str())
    }

    pub fn passed_count(&self) -> usize {
        self.checked.values().filter(|ok| **ok).count()
    }

    pub fn messages(&self) -> Vec<String> {
        self.findings
            .iter()
            .map(|finding| finding.message.clone())
            .collect()
    }

    /// Keep only the attributes accepted by `keep`.
    #[must_use]
    pub fn restricted(&self, keep: impl Fn(&str) -> bool) -> Self {
        Self {
            checked: self
                .checked
                .iter()
                .filter(|(name, _)| keep(name))
                .map(|(name, ok)| (name.clone(), *ok))
                .collect(),
            findings: self
                .findings
                .iter()
                .filter(|finding| keep(&finding.attribute))
                .cloned()
                .collect(),
        }
    }

    fn mark(&mut self, name: &str, ok: bool) {
        let slot = self.checked.entry(name.to_string()).or_insert(true);
        *slot &= ok;
    }

    fn push(&mut self, attribute: &str, level: u8, message: String) {
        if self
            .findings
            .iter()
            .any(|finding| finding.attribute == attribute && finding.message == message)
        {
            return;
        }
        self.findings.push(Finding {
            attribute: attribute.to_string(),
            level,
            message,
        });
    }
}

/// Drives [`match_entry`] over observed attributes.
#[derive(Debug, Clone, Copy)]
pub struct CvComparator<'cv> {
    cv: &'cv ControlledVocabulary,
}

impl<'cv> CvComparator<'cv> {
    pub fn new(cv: &'cv ControlledVocabulary) -> Self {
        Self { cv }
    }

    /// Compare with events sent to `tracing`.
    pub fn compare(
        &self,
        observed: &AttributeMap,
        prefix: &str,
    ) -> Result<Comparison, ConfigurationError> {
        self.compare_traced(observed, prefix, &mut TracingSink)
    }

    pub fn compare_traced(
        &self,
        observed: &AttributeMap,
        prefix: &str,
        sink: &mut dyn TraceSink,
    ) -> Result<Comparison, ConfigurationError> {
        let mut comparison = Comparison::default();

        for (name, value) in observed.iter() {
            let Some(entry) = self.cv.get(name) else {
                continue;
            };
            let outcome = match_entry(entry, value);
            record(sink, name, 1, entry, &outcome);
            comparison.mark(name, outcome.is_match());

            match outcome {
                MatchOutcome::Match => {}
                MatchOutcome::MatchWithDependents(payload) => {
                    let parent = format!("{name}.{}", observed_text(value));
                    compare_dependents(&mut comparison, observed, payload, &parent, prefix, sink)?;
                }
                MatchOutcome::Mismatch => {
                    comparison.push(name, 1, non_compliance(prefix, name, value));
                }
                MatchOutcome::InvalidPattern { pattern, reason } => {
                    comparison.push(name, 1, invalid_pattern(prefix, name, pattern, reason));
                }
            }
        }

        Ok(comparison)
    }
}

fn compare_dependents(
    comparison: &mut Comparison,
    observed: &AttributeMap,
    payload: &BTreeMap<String, CvEntry>,
    parent: &str,
    prefix: &str,
    sink: &mut dyn TraceSink,
) -> Result<(), ConfigurationError> {
    for (name, value) in observed.iter() {
        let Some(entry) = payload.get(name) else {
            continue;
        };
        let outcome = match_entry(entry, value);
        record(sink, name, 2, entry, &outcome);
        comparison.mark(name, outcome.is_match());

        match outcome {
            MatchOutcome::Match => {}
            MatchOutcome::MatchWithDependents(_) => {
                return Err(ConfigurationError::NestingTooDeep {
                    path: format!("{parent}.{name}"),
                });
            }
            MatchOutcome::Mismatch => comparison.push(name, 2, non_compliance(prefix, name, value)),
            MatchOutcome::InvalidPattern { pattern, reason } => {
                comparison.push(name, 2, invalid_pattern(prefix, name, pattern, reason));
            }
        }
    }
    Ok(())
}

fn record(sink: &mut dyn TraceSink, name: &str, level: u8, entry: &CvEntry, outcome: &MatchOutcome<'_>) {
    sink.record(CvTraceEvent {
        attribute: name.to_string(),
        level,
        shape: entry.shape(),
        outcome: outcome.trace_outcome(),
    });
}

fn non_compliance(prefix: &str, name: &str, value: &AttributeValue) -> String {
    format!(
        "{prefix}'{name}' does not comply with the CV: '{}'.",
        value.display_or_unset()
    )
}

fn invalid_pattern(prefix: &str, name: &str, pattern: &str, reason: &str) -> String {
    format!(
        "{prefix}'{name}' could not be checked against the CV: invalid pattern '{pattern}' ({reason})."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::{TraceCollector, TraceOutcome};
    use cc6_model::CvShape;

    fn cv() -> ControlledVocabulary {
        [
            (
                "frequency".to_string(),
                CvEntry::keyed_value([("mon", "monthly"), ("day", "daily")]),
            ),
            ("product".to_string(), CvEntry::enumeration(["model-output"])),
            (
                "source_id".to_string(),
                CvEntry::KeyedNested(BTreeMap::from([(
                    "REMO2020".to_string(),
                    BTreeMap::from([
                        ("institution_id".to_string(), CvEntry::enumeration(["GERICS"])),
                        ("version_realization".to_string(), CvEntry::regex("v[0-9]+")),
                    ]),
                )])),
            ),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn attributes_outside_the_cv_are_not_checked() {
        let observed = AttributeMap::new().with("comment", "anything").with("frequency", "mon");
        let cv = cv();
        let result = CvComparator::new(&cv).compare(&observed, "").unwrap();
        assert_eq!(result.checked.len(), 1);
        assert!(result.is_compliant());
        assert!(result.findings.is_empty());
    }

    #[test]
    fn mismatch_message_uses_prefix_and_unset() {
        let observed = AttributeMap::new().with("frequency", "3hr").with("product", "");
        let cv = cv();
        let result = CvComparator::new(&cv)
            .compare(&observed, "Global attribute ")
            .unwrap();
        assert_eq!(
            result.messages(),
            vec![
                "Global attribute 'frequency' does not comply with the CV: '3hr'.",
                "Global attribute 'product' does not comply with the CV: 'unset'.",
            ]
        );
        assert_eq!(result.failed().collect::<Vec<_>>(), vec!["frequency", "product"]);
    }

    #[test]
    fn dependents_are_compared_at_second_level() {
        let observed = AttributeMap::new()
            .with("source_id", "REMO2020")
            .with("version_realization", "v1-r1")
            .with("institution_id", "GERICS");
        let cv = cv();
        let mut collector = TraceCollector::default();
        let result = CvComparator::new(&cv)
            .compare_traced(&observed, "", &mut collector)
            .unwrap();

        assert_eq!(
            result.messages(),
            vec!["'version_realization' does not comply with the CV: 'v1-r1'."]
        );
        assert_eq!(result.findings[0].level, 2);
        assert_eq!(result.checked.get("institution_id"), Some(&true));
        assert_eq!(
            collector
                .events
                .iter()
                .map(|e| (e.attribute.as_str(), e.level, e.shape, e.outcome))
                .collect::<Vec<_>>(),
            vec![
                ("source_id", 1, CvShape::KeyedNested, TraceOutcome::Match),
                ("version_realization", 2, CvShape::Regex, TraceOutcome::Mismatch),
                ("institution_id", 2, CvShape::Enumeration, TraceOutcome::Match),
            ]
        );
    }

    #[test]
    fn third_level_is_fatal() {
        let cv: ControlledVocabulary = [(
            "source_id".to_string(),
            CvEntry::KeyedNested(BTreeMap::from([(
                "A".to_string(),
                BTreeMap::from([(
                    "driving_source_id".to_string(),
                    CvEntry::KeyedNested(BTreeMap::from([("B".to_string(), BTreeMap::new())])),
                )]),
            )])),
        )]
        .into_iter()
        .collect();
        let observed = AttributeMap::new()
            .with("source_id", "A")
            .with("driving_source_id", "B");
        assert_eq!(
            CvComparator::new(&cv).compare(&observed, ""),
            Err(ConfigurationError::NestingTooDeep {
                path: "source_id.A.driving_source_id".to_string()
            })
        );
    }

    #[test]
    fn invalid_pattern_does_not_abort() {
        let cv: ControlledVocabulary = [
            ("mip_era".to_string(), CvEntry::regex("CMIP[")),
            ("product".to_string(), CvEntry::enumeration(["model-output"])),
        ]
        .into_iter()
        .collect();
        let observed = AttributeMap::new()
            .with("mip_era", "CMIP6")
            .with("product", "model-output");
        let result = CvComparator::new(&cv).compare(&observed, "").unwrap();
        assert_eq!(result.checked.get("product"), Some(&true));
        assert_eq!(result.checked.get("mip_era"), Some(&false));
        assert_eq!(result.findings.len(), 1);
        assert!(result.findings[0].message.starts_with(
            "'mip_era' could not be checked against the CV: invalid pattern 'CMIP['"
        ));
    }

    #[test]
    fn restriction_splits_checked_and_findings() {
        let observed = AttributeMap::new()
            .with("frequency", "3hr")
            .with("product", "model-output");
        let cv = cv();
        let result = CvComparator::new(&cv).compare(&observed, "").unwrap();
        let required = result.restricted(|name| name == "product");
        assert_eq!(required.checked.len(), 1);
        assert!(required.findings.is_empty());
        assert_eq!(required.passed_count(), 1);
        let other = result.restricted(|name| name != "product");
        assert_eq!(other.failed().collect::<Vec<_>>(), vec!["frequency"]);
        assert_eq!(other.findings.len(), 1);
    }
}
