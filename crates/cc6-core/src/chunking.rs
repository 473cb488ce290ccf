//! Expected time span of a single file.
//!
//! CORDEX-CMIP6 archives split time series into fixed chunks: ten years for
//! monthly data, five for daily and one for hourly. The first and last
//! timestep of a file must sit at the start and end of its chunk, shifted by
//! half a step for time means.

use std::sync::LazyLock;

use regex::Regex;

use cc6_model::frequency::UNKNOWN_FREQUENCY;
use cc6_model::{FrequencyTolerance, is_time_invariant, tolerance_for};

use crate::calendar::{Calendar, CalendarClock, CfDateTime, SECONDS_PER_HOUR};
use crate::error::TimeError;
use crate::time_axis::TimeAxis;

static POINT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"time: point").expect("valid regex"));
static STATISTIC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"time: (maximum|minimum|mean|sum)").expect("valid regex"));

/// Years per file for each chunked frequency.
pub const CHUNK_YEARS: &[(&str, i64)] = &[("mon", 10), ("day", 5), ("1hr", 1)];

pub fn chunk_years(frequency: &str) -> Option<i64> {
    CHUNK_YEARS
        .iter()
        .find(|(label, _)| *label == frequency)
        .map(|(_, years)| *years)
}

/// First and last timestep compared with the expected chunk.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkReport {
    pub years: i64,
    pub first: CfDateTime,
    pub last: CfDateTime,
    pub expected_start: CfDateTime,
    pub expected_end: CfDateTime,
}

impl ChunkReport {
    pub fn first_matches(&self) -> bool {
        self.first.same_instant(&self.expected_start)
    }

    pub fn last_matches(&self) -> bool {
        self.last.same_instant(&self.expected_end)
    }
}

/// Compare the span of `axis` with the expected chunk.
///
/// Returns `None` for `fx` and `unknown`, which have no chunks.
pub fn check_chunking<C: CalendarClock + ?Sized>(
    clock: &C,
    axis: &TimeAxis<'_>,
    frequency: &str,
    cell_methods: &str,
) -> Result<Option<ChunkReport>, TimeError> {
    if is_time_invariant(frequency) {
        if frequency == UNKNOWN_FREQUENCY {
            tracing::warn!("frequency is unknown, skipping file chunking check");
        }
        return Ok(None);
    }
    let unsupported = || TimeError::UnsupportedFrequency(frequency.to_string());
    let years = chunk_years(frequency).ok_or_else(unsupported)?;
    let tolerance = tolerance_for(frequency).ok_or_else(unsupported)?;

    let encoding = axis.encoding()?;
    let (Some(first_raw), Some(last_raw)) = (axis.values.first(), axis.values.last()) else {
        return Err(TimeError::EmptyAxis);
    };
    let first = clock.decode(*first_raw, &encoding.units, encoding.calendar)?;
    let last = clock.decode(*last_raw, &encoding.units, encoding.calendar)?;

    let calendar = encoding.calendar;
    let year_start = |year: i64| {
        CfDateTime::from_ymd_hms(calendar, year, 1, 1, 0, 0, 0.0).ok_or(TimeError::InvalidReferenceDate {
            calendar: calendar.to_string(),
            year,
            month: 1,
            day: 1,
        })
    };
    let start = year_start(first.year())?;
    let end = year_start(first.year() + years)?;

    let (start_shift, end_shift) = chunk_shifts(&tolerance, calendar, frequency, cell_methods)?;
    let overflow = || TimeError::InvalidValue(*last_raw);
    let expected_start = start.add_seconds(start_shift).ok_or_else(overflow)?;
    let expected_end = end.add_seconds(-end_shift).ok_or_else(overflow)?;

    Ok(Some(ChunkReport {
        years,
        first,
        last,
        expected_start,
        expected_end,
    }))
}

/// Seconds added to the chunk start and removed from the chunk end.
fn chunk_shifts(
    tolerance: &FrequencyTolerance,
    calendar: Calendar,
    frequency: &str,
    cell_methods: &str,
) -> Result<(f64, f64), TimeError> {
    let offset = if calendar == Calendar::Day360 && frequency == "mon" {
        12.0 * SECONDS_PER_HOUR
    } else {
        0.0
    };
    let nominal = tolerance.nominal_seconds;
    if POINT_RE.is_match(cell_methods) {
        Ok((0.0, nominal - 2.0 * offset))
    } else if STATISTIC_RE.is_match(cell_methods) {
        let half = nominal / 2.0 - offset;
        Ok((half, half))
    } else {
        Err(TimeError::UninterpretableCellMethods(cell_methods.to_string()))
    }
}

/// Explanation appended to chunking diagnostics.
pub fn chunk_expectation(years: i64, frequency: &str) -> String {
    let lead = if years > 1 {
        "Unless for the last file of a timeseries "
    } else {
        ""
    };
    let noun = if years == 1 { " is" } else { "s are" };
    format!(
        "{lead}'{years}' full simulation year{noun} expected in the data file for frequency '{frequency}'."
    )
}
