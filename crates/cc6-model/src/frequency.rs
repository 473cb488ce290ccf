//! Frequency tolerance table.
//!
//! Each sampling frequency has a window of acceptable real-world step
//! lengths. A step outside `[min, max]` is a discontinuity.

const MINUTE: f64 = 60.0;
const HOUR: f64 = 60.0 * MINUTE;
const DAY: f64 = 24.0 * HOUR;

/// Frequencies that have no time axis to check.
pub const FIXED_FREQUENCY: &str = "fx";

/// Placeholder used when the frequency could not be determined.
pub const UNKNOWN_FREQUENCY: &str = "unknown";

/// Acceptable step lengths for one frequency, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyTolerance {
    pub min_seconds: f64,
    pub max_seconds: f64,
    pub nominal_seconds: f64,
}

impl FrequencyTolerance {
    const fn new(min_seconds: f64, max_seconds: f64, nominal_seconds: f64) -> Self {
        Self {
            min_seconds,
            max_seconds,
            nominal_seconds,
        }
    }

    /// True if `seconds` lies within `[min, max]`.
    pub fn contains(&self, seconds: f64) -> bool {
        seconds >= self.min_seconds && seconds <= self.max_seconds
    }
}

/// All known frequencies.
pub const FREQUENCY_TOLERANCES: &[(&str, FrequencyTolerance)] = &[
    ("1hr", FrequencyTolerance::new(0.9 * HOUR, 1.1 * HOUR, HOUR)),
    ("3hr", FrequencyTolerance::new(2.9 * HOUR, 3.1 * HOUR, 3.0 * HOUR)),
    ("6hr", FrequencyTolerance::new(5.9 * HOUR, 6.1 * HOUR, 6.0 * HOUR)),
    ("day", FrequencyTolerance::new(0.9 * DAY, 1.1 * DAY, DAY)),
    ("mon", FrequencyTolerance::new(27.5 * DAY, 31.5 * DAY, 31.0 * DAY)),
    ("yr", FrequencyTolerance::new(359.9 * DAY, 366.1 * DAY, 360.0 * DAY)),
];

/// Tolerance window for a frequency label.
pub fn tolerance_for(frequency: &str) -> Option<FrequencyTolerance> {
    FREQUENCY_TOLERANCES
        .iter()
        .find(|(label, _)| *label == frequency)
        .map(|(_, tolerance)| *tolerance)
}

/// `fx` and `unknown` are treated as compliant by the time checks.
pub fn is_time_invariant(frequency: &str) -> bool {
    frequency == FIXED_FREQUENCY || frequency == UNKNOWN_FREQUENCY
}
