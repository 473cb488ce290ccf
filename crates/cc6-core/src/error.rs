use thiserror::Error;

/// Recoverable problems with a file's time coordinate.
///
/// Check functions turn these into diagnostics with a zero score.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TimeError {
    #[error("'time' variable has no 'units' attribute.")]
    MissingUnits,

    #[error("'time' variable has no 'calendar' attribute.")]
    MissingCalendar,

    #[error("Unsupported calendar '{0}'.")]
    UnknownCalendar(String),

    #[error("Cannot interpret time units '{0}'.")]
    InvalidUnits(String),

    #[error("Invalid reference date {year:04}-{month:02}-{day:02} for calendar '{calendar}'.")]
    InvalidReferenceDate {
        calendar: String,
        year: i64,
        month: u32,
        day: u32,
    },

    #[error("Cannot decode time value '{0}'.")]
    InvalidValue(f64),

    #[error("Frequency '{0}' not supported.")]
    UnsupportedFrequency(String),

    #[error("Cannot interpret cell_methods '{0}'.")]
    UninterpretableCellMethods(String),

    #[error("Coordinate variable 'time' has no values.")]
    EmptyAxis,

    #[error("Coordinate variable 'time' has no bounds.")]
    MissingBounds,
}
