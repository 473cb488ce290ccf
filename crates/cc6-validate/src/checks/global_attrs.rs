//! Global attribute checks: presence of the required ones, then CV
//! compliance of required and other attributes.

use cc6_core::{Comparison, CvComparator};
use cc6_model::{
    CheckLevel, CheckResult, CheckerOptions, ConfigurationError, ControlledVocabulary,
};

use crate::dataset::Dataset;

pub(crate) const REQUIRED_NAME: &str = "Required global attributes.";
pub(crate) const REQUIRED_CV_NAME: &str = "Required global attributes (CV).";
pub(crate) const OTHER_CV_NAME: &str = "Global attributes (CV).";

const REQUIRED_PREFIX: &str = "Required global attribute ";
const OTHER_PREFIX: &str = "Global attribute ";

/// Every attribute listed under `required_global_attributes` is present.
pub(crate) fn check_presence(ds: &dyn Dataset, cv: &ControlledVocabulary) -> CheckResult {
    let required = cv.required_global_attributes();
    let missing: Vec<String> = required
        .iter()
        .filter(|attr| ds.global_attribute(attr).is_none())
        .map(|attr| format!("Required global attribute '{attr}' is missing."))
        .collect();
    let out_of = count(required.len());
    CheckResult::new(
        CheckLevel::High,
        out_of - count(missing.len()),
        out_of,
        REQUIRED_NAME,
        missing,
    )
}

/// Required attributes comply with the CV.
pub(crate) fn check_required_cv(
    ds: &dyn Dataset,
    cv: &ControlledVocabulary,
    options: &CheckerOptions,
) -> CheckResult {
    let required = cv.required_global_attributes();
    match compare(ds, cv, options, REQUIRED_PREFIX) {
        Ok(comparison) => scored(
            CheckLevel::High,
            REQUIRED_CV_NAME,
            &comparison.restricted(|name| required.contains(&name)),
        ),
        Err(error) => unusable_cv(CheckLevel::High, REQUIRED_CV_NAME, &error),
    }
}

/// Any other attribute governed by the CV complies with it.
pub(crate) fn check_other_cv(
    ds: &dyn Dataset,
    cv: &ControlledVocabulary,
    options: &CheckerOptions,
) -> CheckResult {
    let required = cv.required_global_attributes();
    match compare(ds, cv, options, OTHER_PREFIX) {
        Ok(comparison) => scored(
            CheckLevel::Medium,
            OTHER_CV_NAME,
            &comparison.restricted(|name| !required.contains(&name)),
        ),
        Err(error) => unusable_cv(CheckLevel::Medium, OTHER_CV_NAME, &error),
    }
}

/// A CV the comparator cannot walk fails the check instead of the file.
fn unusable_cv(level: CheckLevel, name: &str, error: &ConfigurationError) -> CheckResult {
    tracing::error!(check = name, %error, "CV comparison failed");
    CheckResult::fail(level, 1, name, vec![error.to_string()])
}

/// Compare all global attributes except the hard-checked ones.
fn compare(
    ds: &dyn Dataset,
    cv: &ControlledVocabulary,
    options: &CheckerOptions,
    prefix: &str,
) -> Result<Comparison, ConfigurationError> {
    let observed = ds
        .global_attributes()
        .filtered(|name| !options.is_hard_check(name));
    CvComparator::new(cv).compare(&observed, prefix)
}

fn scored(level: CheckLevel, name: &str, comparison: &Comparison) -> CheckResult {
    CheckResult::new(
        level,
        count(comparison.passed_count()),
        count(comparison.checked.len()),
        name,
        comparison.messages(),
    )
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
