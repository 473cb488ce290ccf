//! Present variables.
//!
//! A file carries exactly one requested variable. Everything else must be a
//! coordinate, grid variable or formula term known to the tables, the bounds
//! of one of those, or the grid mapping of the requested variable.

use std::collections::BTreeSet;

use cc6_model::{CheckLevel, CheckResult};
use cc6_standards::TableSet;

use super::join;
use crate::context::FileContext;
use crate::dataset::Dataset;

pub(crate) const NAME: &str = "Present variables";

pub(crate) fn check(ds: &dyn Dataset, ctx: &FileContext, tables: &TableSet) -> CheckResult {
    let mut score = 0;
    let mut messages = Vec::new();

    // 1. Exactly one requested variable
    match ctx.varnames.len() {
        1 => score += 1,
        0 => messages.push("No requested variable could be identified in the file.".to_string()),
        _ => messages.push(format!(
            "More than one variable present in file: {}. Only the first one will be checked.",
            join(&ctx.varnames)
        )),
    }

    // 2. No unknown variables
    let mut allowed: BTreeSet<&str> = tables.auxiliary_out_names();
    let bounds: Vec<&str> = ds
        .variable_names()
        .into_iter()
        .filter(|name| allowed.contains(name))
        .filter_map(|name| ds.variable(name))
        .filter_map(|var| var.attribute_str("bounds"))
        .collect();
    allowed.extend(bounds);
    if let Some(grid_mapping) = ctx
        .main_variable()
        .and_then(|name| ds.variable(name))
        .and_then(|var| var.attribute_str("grid_mapping"))
    {
        allowed.insert(grid_mapping);
    }

    let unknown: Vec<&str> = ds
        .variable_names()
        .into_iter()
        .filter(|name| !allowed.contains(name) && !ctx.varnames.iter().any(|var| var == name))
        .collect();
    if unknown.is_empty() {
        score += 1;
    } else {
        messages.push(format!(
            "(Coordinate) variable(s) {} is/are not part of the CV.",
            join(&unknown)
        ));
    }

    CheckResult::new(CheckLevel::High, score, 2, NAME, messages)
}
