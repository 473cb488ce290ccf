use thiserror::Error;

/// Fatal problems with the loaded CV or CMOR tables.
///
/// These abort a check run before any per-file check executes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("CV entry '{path}' has an unsupported shape: {found}")]
    UnsupportedShape { path: String, found: String },

    #[error("CV entry '{path}' mixes string and mapping payloads")]
    MixedKeyedPayload { path: String },

    #[error("CV entry '{path}' nests deeper than two comparison levels")]
    NestingTooDeep { path: String },

    #[error("table '{table}' is missing the required key '{key}'")]
    MissingTableKey { table: String, key: String },

    #[error("table '{table}' declares table_id '{found}', expected '{expected}'")]
    TableNaming {
        table: String,
        expected: String,
        found: String,
    },

    #[error("malformed table '{table}': {message}")]
    MalformedTable { table: String, message: String },
}

pub type Result<T> = std::result::Result<T, ConfigurationError>;
