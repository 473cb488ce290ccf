//! Time coordinate checks: continuity, bounds and file chunking.

use cc6_core::chunking::chunk_years;
use cc6_core::{
    BoundsArray, BoundsReport, CalendarClock, TimeAxis, TimeError, check_bounds, check_chunking,
    check_continuity, chunk_expectation, format_delta,
};
use cc6_model::{CheckLevel, CheckResult, is_time_invariant};

use super::join;
use crate::context::FileContext;
use crate::dataset::{Dataset, Variable};

pub(crate) const CONTINUITY_NAME: &str = "Time continuity";
pub(crate) const BOUNDS_NAME: &str = "Time bounds";
pub(crate) const CHUNKING_NAME: &str = "File chunking.";

const TIME_NOT_FOUND: &str = "Coordinate variable 'time' not found in file.";

const BOUNDS_CATEGORIES: u32 = 5;

fn axis(time: &Variable) -> TimeAxis<'_> {
    TimeAxis::new(
        time.values.as_deref().unwrap_or_default(),
        time.attribute_str("units"),
        time.attribute_str("calendar"),
    )
}

pub(crate) fn check_continuity_of<C: CalendarClock + ?Sized>(
    clock: &C,
    ds: &dyn Dataset,
    ctx: &FileContext,
) -> CheckResult {
    let level = CheckLevel::High;
    let frequency = ctx.frequency.as_str();
    if is_time_invariant(frequency) {
        tracing::debug!(frequency, "no time axis expected");
        return CheckResult::pass(level, 1, CONTINUITY_NAME);
    }
    let Some(time) = ds.time_variable() else {
        return CheckResult::fail(level, 1, CONTINUITY_NAME, vec![TIME_NOT_FOUND.to_string()]);
    };

    match check_continuity(clock, &axis(time), frequency) {
        Ok(gaps) if gaps.is_empty() => CheckResult::pass(level, 1, CONTINUITY_NAME),
        Ok(gaps) => {
            let messages = gaps
                .iter()
                .map(|gap| {
                    format!(
                        "Discontinuity in time axis (frequency: '{frequency}') at index {} ('{}'): delta-t {} from next timestep!",
                        gap.index,
                        gap.timestamp,
                        format_delta(gap.delta_seconds)
                    )
                })
                .collect();
            CheckResult::fail(level, 1, CONTINUITY_NAME, messages)
        }
        Err(error) => time_error(level, 1, CONTINUITY_NAME, &error),
    }
}

/// One point each for shape, overlap, centering, monotonicity and interval
/// length.
pub(crate) fn check_bounds_of<C: CalendarClock + ?Sized>(
    clock: &C,
    ds: &dyn Dataset,
    ctx: &FileContext,
) -> CheckResult {
    let level = CheckLevel::High;
    let frequency = ctx.frequency.as_str();
    if is_time_invariant(frequency) {
        return CheckResult::pass(level, BOUNDS_CATEGORIES, BOUNDS_NAME);
    }
    let Some(time) = ds.time_variable() else {
        return CheckResult::fail(
            level,
            BOUNDS_CATEGORIES,
            BOUNDS_NAME,
            vec![TIME_NOT_FOUND.to_string()],
        );
    };
    let bounds = time
        .attribute_str("bounds")
        .and_then(|name| ds.variable(name))
        .map(|var| {
            BoundsArray::new(
                var.shape.clone(),
                var.values.clone().unwrap_or_default(),
            )
        });

    match check_bounds(clock, &axis(time), bounds.as_ref(), frequency, &ctx.cell_methods) {
        Ok(report) => bounds_result(&report, frequency),
        Err(error) => time_error(level, BOUNDS_CATEGORIES, BOUNDS_NAME, &error),
    }
}

fn bounds_result(report: &BoundsReport, frequency: &str) -> CheckResult {
    let level = CheckLevel::High;
    if let Some(shape_error) = &report.shape_error {
        return CheckResult::fail(level, BOUNDS_CATEGORIES, BOUNDS_NAME, vec![shape_error.clone()]);
    }

    let mut messages = Vec::new();
    let mut score = 1;

    for overlap in &report.overlaps {
        messages.push(format!(
            "Time bounds of timesteps {} and {} do not connect: upper bound '{}', next lower bound '{}'.",
            overlap.index, overlap.next_index, overlap.end, overlap.next_start
        ));
    }
    if report.non_centered.is_empty() {
        score += 1;
    } else {
        messages.push(format!(
            "Time values are not centered within their bounds at index(es): {}.",
            join(&indices(&report.non_centered))
        ));
    }
    if report.non_monotonic.is_empty() {
        score += 1;
    } else {
        messages.push(format!(
            "Time bounds are not strictly increasing at index(es): {}.",
            join(&indices(&report.non_monotonic))
        ));
    }
    for interval in &report.out_of_tolerance {
        messages.push(format!(
            "Time bounds interval at index {} ('{}') spans {}, which is outside the tolerance for frequency '{frequency}'.",
            interval.index,
            interval.start,
            format_delta(interval.delta_seconds)
        ));
    }
    if !report.undecodable.is_empty() {
        messages.push(format!(
            "Time bounds could not be decoded at index(es): {}.",
            join(&indices(&report.undecodable))
        ));
    }
    score += u32::from(report.overlaps.is_empty())
        + u32::from(report.out_of_tolerance.is_empty() && report.undecodable.is_empty());

    CheckResult::new(level, score, BOUNDS_CATEGORIES, BOUNDS_NAME, messages)
}

fn indices(values: &[usize]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

/// First and last timestep sit at the edges of the expected file chunk.
pub(crate) fn check_chunking_of<C: CalendarClock + ?Sized>(
    clock: &C,
    ds: &dyn Dataset,
    ctx: &FileContext,
) -> CheckResult {
    let level = CheckLevel::Medium;
    let frequency = ctx.frequency.as_str();
    if is_time_invariant(frequency) {
        return CheckResult::pass(level, 1, CHUNKING_NAME);
    }
    if chunk_years(frequency).is_none() {
        let error = TimeError::UnsupportedFrequency(frequency.to_string());
        return time_error(level, 1, CHUNKING_NAME, &error);
    }
    let Some(time) = ds.time_variable() else {
        return CheckResult::fail(level, 1, CHUNKING_NAME, vec![TIME_NOT_FOUND.to_string()]);
    };

    let mut messages = Vec::new();
    if time.attribute_str("calendar").is_none() {
        messages.push(TimeError::MissingCalendar.to_string());
    }
    if time.attribute_str("units").is_none() {
        messages.push(TimeError::MissingUnits.to_string());
    }
    if !messages.is_empty() {
        return CheckResult::fail(level, 1, CHUNKING_NAME, messages);
    }

    let report = match check_chunking(clock, &axis(time), frequency, &ctx.cell_methods) {
        Ok(Some(report)) => report,
        Ok(None) => return CheckResult::pass(level, 1, CHUNKING_NAME),
        Err(error) => return time_error(level, 1, CHUNKING_NAME, &error),
    };

    let expectation = chunk_expectation(report.years, frequency);
    if !report.first_matches() {
        messages.push(format!(
            "The first timestep differs from expectation ('{}'): '{}'. {expectation}",
            report.expected_start, report.first
        ));
    }
    if !report.last_matches() {
        messages.push(format!(
            "The last timestep differs from expectation ('{}'): '{}'. {expectation}",
            report.expected_end, report.last
        ));
    }
    if messages.is_empty() {
        CheckResult::pass(level, 1, CHUNKING_NAME)
    } else {
        CheckResult::fail(level, 1, CHUNKING_NAME, messages)
    }
}

fn time_error(level: CheckLevel, out_of: u32, name: &str, error: &TimeError) -> CheckResult {
    tracing::debug!(check = name, %error, "time check could not run");
    CheckResult::fail(level, out_of, name, vec![error.to_string()])
}
