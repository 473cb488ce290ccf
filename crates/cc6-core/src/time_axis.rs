//! Continuity of a time coordinate.

use cc6_model::frequency::UNKNOWN_FREQUENCY;
use cc6_model::{is_time_invariant, tolerance_for};

use crate::calendar::{
    CalendarClock, CfDateTime, SECONDS_PER_DAY, SECONDS_PER_HOUR, SECONDS_PER_MINUTE, TimeEncoding,
};
use crate::error::TimeError;

/// Raw time coordinate as read from a file.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeAxis<'a> {
    pub values: &'a [f64],
    pub units: Option<&'a str>,
    pub calendar: Option<&'a str>,
}

impl<'a> TimeAxis<'a> {
    pub fn new(values: &'a [f64], units: Option<&'a str>, calendar: Option<&'a str>) -> Self {
        Self {
            values,
            units,
            calendar,
        }
    }

    pub fn encoding(&self) -> Result<TimeEncoding, TimeError> {
        TimeEncoding::resolve(self.units, self.calendar)
    }
}

/// A step whose length falls outside the frequency's tolerance window.
#[derive(Debug, Clone, PartialEq)]
pub struct Discontinuity {
    /// 0-based index of the earlier sample.
    pub index: usize,
    pub timestamp: CfDateTime,
    pub delta_seconds: f64,
}

/// Find every discontinuity along `axis`.
///
/// `fx` and `unknown` frequencies have nothing to check. A single sample is
/// continuous.
pub fn check_continuity<C: CalendarClock + ?Sized>(
    clock: &C,
    axis: &TimeAxis<'_>,
    frequency: &str,
) -> Result<Vec<Discontinuity>, TimeError> {
    if is_time_invariant(frequency) {
        if frequency == UNKNOWN_FREQUENCY {
            tracing::warn!("frequency is unknown, skipping time continuity check");
        }
        return Ok(Vec::new());
    }
    let tolerance =
        tolerance_for(frequency).ok_or_else(|| TimeError::UnsupportedFrequency(frequency.to_string()))?;
    let encoding = axis.encoding()?;
    if axis.values.is_empty() {
        return Err(TimeError::EmptyAxis);
    }

    let times = clock.decode_all(axis.values, &encoding)?;
    // The last sample has no successor; it gets the frequency minimum.
    let deltas = times
        .windows(2)
        .map(|pair| clock.subtract(&pair[1], &pair[0]))
        .chain(std::iter::once(tolerance.min_seconds));

    let discontinuities = times
        .iter()
        .zip(deltas)
        .enumerate()
        .filter(|(_, (_, delta))| !tolerance.contains(*delta))
        .map(|(index, (timestamp, delta_seconds))| Discontinuity {
            index,
            timestamp: *timestamp,
            delta_seconds,
        })
        .collect::<Vec<_>>();

    tracing::debug!(
        frequency,
        samples = times.len(),
        discontinuities = discontinuities.len(),
        "checked time continuity"
    );
    Ok(discontinuities)
}

/// Human readable duration: days above a day, hours above an hour,
/// minutes above 50 seconds, seconds otherwise.
pub fn format_delta(seconds: f64) -> String {
    let magnitude = seconds.abs();
    let (value, unit) = if magnitude > SECONDS_PER_DAY {
        (seconds / SECONDS_PER_DAY, "days")
    } else if magnitude > SECONDS_PER_HOUR {
        (seconds / SECONDS_PER_HOUR, "hours")
    } else if magnitude > 50.0 {
        (seconds / SECONDS_PER_MINUTE, "minutes")
    } else {
        (seconds, "seconds")
    };
    format!("{} {unit}", trim_number(value))
}

fn trim_number(value: f64) -> String {
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}
