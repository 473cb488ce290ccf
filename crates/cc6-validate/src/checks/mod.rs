//! Check functions.
//!
//! Each module scores one aspect of a file and returns a [`CheckResult`]
//! with diagnostics. Missing or unusable metadata lowers the score; only
//! an inconsistent CV is an error.
//!
//! [`CheckResult`]: cc6_model::CheckResult

pub(crate) mod compression;
pub(crate) mod format;
pub(crate) mod global_attrs;
pub(crate) mod missing_value;
pub(crate) mod time;
pub(crate) mod variable;
pub(crate) mod variable_definition;

/// `a, b, c` rendering used in diagnostics.
pub(crate) fn join<S: AsRef<str>>(items: &[S]) -> String {
    let mut out = String::new();
    for (idx, item) in items.iter().enumerate() {
        if idx > 0 {
            out.push_str(", ");
        }
        out.push_str(item.as_ref());
    }
    out
}
