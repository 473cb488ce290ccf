//! Table directory path resolution.

use std::path::{Path, PathBuf};

/// Environment variable pointing at the CMOR `Tables` directory.
pub const TABLES_ENV_VAR: &str = "CORDEXCMIP6TABLESPATH";

/// Prefix shared by every table file name.
pub const TABLE_FILE_PREFIX: &str = "CORDEX-CMIP6_";

/// Get the tables directory.
///
/// Resolution order:
/// 1. the explicitly configured path
/// 2. `CORDEXCMIP6TABLESPATH` environment variable
/// 3. the current directory
pub fn tables_root(configured: Option<&Path>) -> PathBuf {
    if let Some(path) = configured {
        return path.to_path_buf();
    }
    if let Ok(root) = std::env::var(TABLES_ENV_VAR) {
        return PathBuf::from(root);
    }
    PathBuf::from("./")
}

/// File name of a table, e.g. `CORDEX-CMIP6_mon.json`.
pub fn table_file_name(table: &str) -> String {
    format!("{TABLE_FILE_PREFIX}{table}.json")
}

/// Path of a table below `root`.
pub fn table_path(root: &Path, table: &str) -> PathBuf {
    root.join(table_file_name(table))
}
