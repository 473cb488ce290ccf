//! Configuration options for a check run.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Data model expected for CORDEX-CMIP6 output.
pub const DEFAULT_DATA_MODEL: &str = "NETCDF4_CLASSIC";

/// Disk format expected for CORDEX-CMIP6 output.
pub const DEFAULT_DISK_FORMAT: &str = "HDF5";

/// Global attributes checked by dedicated logic rather than the CV.
///
/// `creation_date` and `tracking_id` are free-form (timestamp, UUID) and have
/// no vocabulary of their own.
pub const DEFAULT_HARD_CHECKS: &[&str] = &["creation_date", "tracking_id"];

/// Options controlling the checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerOptions {
    /// Directory holding the `CORDEX-CMIP6_*.json` tables.
    ///
    /// When unset the `CORDEXCMIP6TABLESPATH` environment variable is used.
    pub tables_path: Option<PathBuf>,

    /// Global attributes excluded from the generic CV comparison.
    pub global_attrs_hard_checks: Vec<String>,

    pub expected_data_model: String,

    pub expected_disk_format: String,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        Self {
            tables_path: None,
            global_attrs_hard_checks: DEFAULT_HARD_CHECKS
                .iter()
                .map(|name| (*name).to_string())
                .collect(),
            expected_data_model: DEFAULT_DATA_MODEL.to_string(),
            expected_disk_format: DEFAULT_DISK_FORMAT.to_string(),
        }
    }
}

impl CheckerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_tables_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.tables_path = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_hard_checks<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.global_attrs_hard_checks = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_hard_check(&self, attribute: &str) -> bool {
        self.global_attrs_hard_checks
            .iter()
            .any(|name| name == attribute)
    }
}
