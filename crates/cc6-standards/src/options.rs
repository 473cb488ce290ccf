#![deny(unsafe_code)]

use std::path::{Path, PathBuf};

use cc6_model::CheckerOptions;

use crate::error::StandardsError;
use crate::paths::tables_root;

/// Read checker options from a TOML file.
///
/// ```toml
/// tables_path = "/data/cordex-cmip6-cmor-tables/Tables"
/// global_attrs_hard_checks = ["creation_date", "tracking_id"]
/// ```
pub fn load_options(path: &Path) -> Result<CheckerOptions, StandardsError> {
    let contents = std::fs::read_to_string(path).map_err(|e| StandardsError::io(path, e))?;
    parse_options(&contents).map_err(|e| StandardsError::Toml {
        path: path.to_path_buf(),
        source: e,
    })
}

pub fn parse_options(contents: &str) -> Result<CheckerOptions, toml::de::Error> {
    toml::from_str(contents)
}

/// Tables directory for the given options.
pub fn resolve_tables_root(options: &CheckerOptions) -> PathBuf {
    tables_root(options.tables_path.as_deref())
}
