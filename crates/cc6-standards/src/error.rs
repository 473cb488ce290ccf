#![deny(unsafe_code)]

use std::path::PathBuf;

use cc6_model::ConfigurationError;

#[derive(Debug, thiserror::Error)]
pub enum StandardsError {
    #[error(
        "could not find or open '{path}'; make sure the environment variable \
         'CORDEXCMIP6TABLESPATH' is set and points to the Tables subdirectory \
         of the cordex-cmip6-cmor-tables repository: {source}"
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse JSON table {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to parse TOML options {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid table {path}: {source}")]
    Configuration {
        path: PathBuf,
        #[source]
        source: ConfigurationError,
    },
}

impl StandardsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn configuration(path: impl Into<PathBuf>, source: ConfigurationError) -> Self {
        Self::Configuration {
            path: path.into(),
            source,
        }
    }
}
