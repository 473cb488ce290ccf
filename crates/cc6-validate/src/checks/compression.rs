use cc6_model::{CheckLevel, CheckResult};

use crate::context::FileContext;
use crate::dataset::{Compression, Dataset};

pub(crate) const NAME: &str = "Compression";

const RECOMMENDED_LEVEL: u8 = 1;

/// Deflate level 1 with shuffle on the main variable.
pub(crate) fn check(ds: &dyn Dataset, ctx: &FileContext) -> CheckResult {
    let Some(var) = ctx.main_variable().and_then(|name| ds.variable(name)) else {
        return CheckResult::pass(CheckLevel::Medium, 1, NAME);
    };
    // No filter information means an uncompressed variable.
    let filters = var.compression.unwrap_or_default();
    if filters == (Compression { complevel: RECOMMENDED_LEVEL, shuffle: true }) {
        return CheckResult::pass(CheckLevel::Medium, 1, NAME);
    }

    let mut messages = vec![
        "It is recommended that data should be compressed with a 'deflate level' of '1' and enabled 'shuffle' option."
            .to_string(),
    ];
    if filters.complevel < RECOMMENDED_LEVEL {
        messages.push(" The data is uncompressed.".to_string());
    } else if filters.complevel > RECOMMENDED_LEVEL {
        messages.push(
            " The data is compressed with a higher 'deflate level' than recommended, this can lead to performance issues when accessing the data."
                .to_string(),
        );
    }
    if !filters.shuffle {
        messages.push(" The 'shuffle' option is disabled.".to_string());
    }
    CheckResult::fail(CheckLevel::Medium, 1, NAME, messages)
}
