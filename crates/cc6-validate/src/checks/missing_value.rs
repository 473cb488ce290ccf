use cc6_model::{AttributeValue, CheckLevel, CheckResult};
use cc6_standards::TableSet;

use crate::context::FileContext;
use crate::dataset::Dataset;

pub(crate) const NAME: &str = "Missing values";

const FILL_ATTRIBUTES: [&str; 2] = ["_FillValue", "missing_value"];

/// Relative tolerance for comparing float32 fill values with the table's.
const RELATIVE_TOLERANCE: f64 = 1e-6;

/// `_FillValue` and `missing_value` equal the table header's `missing_value`.
pub(crate) fn check(ds: &dyn Dataset, ctx: &FileContext, tables: &TableSet) -> CheckResult {
    let out_of = FILL_ATTRIBUTES.len() as u32;
    let Some((name, var)) = ctx
        .main_variable()
        .and_then(|name| ds.variable(name).map(|var| (name, var)))
    else {
        return CheckResult::pass(CheckLevel::High, out_of, NAME);
    };
    let expected = tables
        .table(&ctx.table_id)
        .and_then(|table| table.header.missing_value.as_ref());
    let Some((expected, target)) =
        expected.and_then(|expected| expected.as_f64().map(|target| (expected, target)))
    else {
        return CheckResult::fail(
            CheckLevel::High,
            out_of,
            NAME,
            vec![format!(
                "Cannot determine the missing_value of table '{}' for variable '{name}'.",
                ctx.table_id
            )],
        );
    };

    let mut score = 0;
    let mut messages = Vec::new();
    for attr in FILL_ATTRIBUTES {
        match var.attribute(attr) {
            None => messages.push(format!(
                "The variable attribute '{name}:{attr}' is not set (expected '{expected}')."
            )),
            Some(value) if !matches_target(value, target) => messages.push(format!(
                "The variable attribute '{name}:{attr}' differs from the table's missing_value ('{expected}'): '{}'.",
                value.display_or_unset()
            )),
            Some(_) => score += 1,
        }
    }
    CheckResult::new(CheckLevel::High, score, out_of, NAME, messages)
}

fn matches_target(value: &AttributeValue, target: f64) -> bool {
    value
        .as_f64()
        .is_some_and(|observed| (observed - target).abs() <= RELATIVE_TOLERANCE * target.abs())
}
