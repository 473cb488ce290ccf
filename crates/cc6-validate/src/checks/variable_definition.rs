use cc6_model::{CheckLevel, CheckResult};
use cc6_standards::TableSet;

use crate::context::FileContext;
use crate::dataset::Dataset;

pub(crate) const NAME: &str = "Variable definition";

const DEFINING_ATTRIBUTES: [&str; 3] = ["standard_name", "long_name", "units"];

/// `standard_name`, `long_name` and `units` of the main variable match its
/// table entry.
pub(crate) fn check(ds: &dyn Dataset, ctx: &FileContext, tables: &TableSet) -> CheckResult {
    let out_of = DEFINING_ATTRIBUTES.len() as u32;
    let Some((name, var)) = ctx
        .main_variable()
        .and_then(|name| ds.variable(name).map(|var| (name, var)))
    else {
        return CheckResult::pass(CheckLevel::High, out_of, NAME);
    };
    let Some(entry) = tables.variable_entry(&ctx.table_id, name) else {
        return CheckResult::fail(
            CheckLevel::High,
            out_of,
            NAME,
            vec![format!(
                "Variable '{name}' is not requested by table '{}'.",
                ctx.table_id
            )],
        );
    };

    let expected = [
        entry.standard_name.as_deref(),
        entry.long_name.as_deref(),
        entry.units.as_deref(),
    ];
    let mut score = 0;
    let mut messages = Vec::new();
    for (attr, expected) in DEFINING_ATTRIBUTES.iter().zip(expected) {
        let observed = var.attribute_str(attr);
        match expected {
            Some(expected) if observed.map(str::trim) != Some(expected.trim()) => {
                messages.push(format!(
                    "The variable attribute '{name}:{attr}' does not comply with the table ('{expected}'): '{}'.",
                    observed.unwrap_or("unset")
                ));
            }
            _ => score += 1,
        }
    }
    CheckResult::new(CheckLevel::High, score, out_of, NAME, messages)
}
