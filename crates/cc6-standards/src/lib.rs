#![deny(unsafe_code)]

pub mod classify;
pub mod error;
pub mod hash;
pub mod options;
pub mod paths;
pub mod posix;
pub mod registry;

pub use crate::classify::{classify_cv, classify_entry};
pub use crate::error::StandardsError;
pub use crate::options::{load_options, parse_options, resolve_tables_root};
pub use crate::paths::{TABLES_ENV_VAR, tables_root};
pub use crate::posix::convert_posix_regex;
pub use crate::registry::{TableFingerprint, TableSet, VARIABLE_TABLES};
