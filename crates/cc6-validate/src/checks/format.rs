use cc6_model::{CheckLevel, CheckResult, CheckerOptions};

use crate::dataset::Dataset;

pub(crate) const NAME: &str = "File format";

/// Data model and disk format must match the options.
pub(crate) fn check(ds: &dyn Dataset, options: &CheckerOptions) -> CheckResult {
    let model = options.expected_data_model.as_str();
    let disk = options.expected_disk_format.as_str();
    if ds.data_model() == model && ds.disk_format() == disk {
        return CheckResult::pass(CheckLevel::High, 1, NAME);
    }
    CheckResult::fail(
        CheckLevel::High,
        1,
        NAME,
        vec![format!(
            "File format differs from expectation ({model}/{disk}): '{}/{}'.",
            ds.data_model(),
            ds.disk_format()
        )],
    )
}
