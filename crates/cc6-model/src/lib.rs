pub mod attribute;
pub mod cv;
pub mod error;
pub mod frequency;
pub mod options;
pub mod result;
pub mod table;

pub use attribute::{AttributeMap, AttributeValue};
pub use cv::{ControlledVocabulary, CvEntry, CvPattern, CvShape, EnumItem};
pub use error::{ConfigurationError, Result};
pub use frequency::{FrequencyTolerance, is_time_invariant, tolerance_for};
pub use options::CheckerOptions;
pub use result::{CheckLevel, CheckResult, FileReport};
pub use table::{CoordinateTable, OutNameEntry, TableHeader, VariableEntry, VariableTable};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_report_totals() {
        let report = FileReport {
            file_name: "tas.nc".to_string(),
            results: vec![
                CheckResult::pass(CheckLevel::High, 1, "File format"),
                CheckResult::new(
                    CheckLevel::Medium,
                    0,
                    1,
                    "Compression",
                    vec!["The data is uncompressed.".to_string()],
                ),
            ],
        };
        assert_eq!(report.score(), 1);
        assert_eq!(report.out_of(), 2);
        assert!(report.has_failures());
        assert_eq!(report.failures_at_least(CheckLevel::High).count(), 0);
    }
}
