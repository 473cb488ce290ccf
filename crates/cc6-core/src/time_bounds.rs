//! Validation of `time_bnds`.
//!
//! Checks run in order: shape, overlap, centering, monotonicity and interval
//! length. A shape violation stops the analysis since the remaining checks
//! index into the array.

use std::cmp::Ordering;

use cc6_model::{is_time_invariant, tolerance_for};

use crate::calendar::{CalendarClock, CfDateTime, TimeEncoding};
use crate::error::TimeError;
use crate::time_axis::TimeAxis;

/// Bounds of a time coordinate, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundsArray {
    shape: Vec<usize>,
    values: Vec<f64>,
}

impl BoundsArray {
    pub fn new(shape: Vec<usize>, values: Vec<f64>) -> Self {
        Self { shape, values }
    }

    /// An `N x 2` array from explicit pairs.
    pub fn from_pairs(pairs: &[[f64; 2]]) -> Self {
        Self {
            shape: vec![pairs.len(), 2],
            values: pairs.iter().flatten().copied().collect(),
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    fn pair(&self, index: usize) -> (f64, f64) {
        (self.values[2 * index], self.values[2 * index + 1])
    }

    fn is_pairs_of(&self, len: usize) -> bool {
        self.shape.len() == 2
            && self.shape[0] == len
            && self.shape[1] == 2
            && self.values.len() == 2 * len
    }
}

/// Two neighbouring cells that overlap or leave a gap.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundsOverlap {
    pub index: usize,
    pub next_index: usize,
    /// Decoded upper bound of `index`.
    pub end: CfDateTime,
    /// Decoded lower bound of `next_index`.
    pub next_start: CfDateTime,
}

/// A cell whose interval length is outside the tolerance window.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundsInterval {
    pub index: usize,
    pub start: CfDateTime,
    pub delta_seconds: f64,
}

/// Findings of [`check_bounds`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundsReport {
    /// Set when the analysis was skipped (`time: point`, `fx`, `unknown`).
    pub skipped: bool,
    pub shape_error: Option<String>,
    pub overlaps: Vec<BoundsOverlap>,
    /// Indices whose time value is not the midpoint of its bounds.
    pub non_centered: Vec<usize>,
    /// Indices whose upper bound is not above the lower bound.
    pub non_monotonic: Vec<usize>,
    pub out_of_tolerance: Vec<BoundsInterval>,
    /// Indices whose bounds could not be decoded.
    pub undecodable: Vec<usize>,
}

impl BoundsReport {
    pub fn is_compliant(&self) -> bool {
        self.shape_error.is_none()
            && self.overlaps.is_empty()
            && self.non_centered.is_empty()
            && self.non_monotonic.is_empty()
            && self.out_of_tolerance.is_empty()
            && self.undecodable.is_empty()
    }

    fn skipped() -> Self {
        Self {
            skipped: true,
            ..Self::default()
        }
    }
}

/// Validate the bounds of `axis`.
///
/// Overlap and centering compare raw values exactly; the interval check uses
/// decoded, calendar-aware seconds.
pub fn check_bounds<C: CalendarClock + ?Sized>(
    clock: &C,
    axis: &TimeAxis<'_>,
    bounds: Option<&BoundsArray>,
    frequency: &str,
    cell_methods: &str,
) -> Result<BoundsReport, TimeError> {
    if cell_methods.contains("time: point") || is_time_invariant(frequency) {
        return Ok(BoundsReport::skipped());
    }
    let tolerance = tolerance_for(frequency)
        .ok_or_else(|| TimeError::UnsupportedFrequency(frequency.to_string()))?;
    let bounds = bounds.ok_or(TimeError::MissingBounds)?;
    let encoding = axis.encoding()?;
    let values = axis.values;
    if values.is_empty() {
        return Err(TimeError::EmptyAxis);
    }

    let mut report = BoundsReport::default();
    if !bounds.is_pairs_of(values.len()) {
        report.shape_error = Some(format!(
            "Time bounds have shape {:?}, expected [{}, 2].",
            bounds.shape(),
            values.len()
        ));
        return Ok(report);
    }

    // A cell whose bounds cannot be decoded (NaN fill values) is reported on
    // its own and left out of the overlap and interval checks.
    let mut cells = Vec::with_capacity(values.len());
    for index in 0..values.len() {
        let (lower, upper) = bounds.pair(index);
        let cell = match (
            decode_cell(clock, &encoding, lower)?,
            decode_cell(clock, &encoding, upper)?,
        ) {
            (Some(start), Some(end)) => Some((start, end)),
            _ => {
                report.undecodable.push(index);
                None
            }
        };
        cells.push(cell);
    }

    for index in 0..values.len().saturating_sub(1) {
        let (_, end) = bounds.pair(index);
        let (next_start, _) = bounds.pair(index + 1);
        if next_start == end {
            continue;
        }
        if let (Some((_, end)), Some((next_start, _))) = (cells[index], cells[index + 1]) {
            report.overlaps.push(BoundsOverlap {
                index,
                next_index: index + 1,
                end,
                next_start,
            });
        }
    }

    for (index, time) in values.iter().enumerate() {
        let (lower, upper) = bounds.pair(index);
        if *time != (lower + upper) / 2.0 {
            report.non_centered.push(index);
        }
        if upper.partial_cmp(&lower) != Some(Ordering::Greater) {
            report.non_monotonic.push(index);
        }
        let Some((start, end)) = cells[index] else {
            continue;
        };
        let delta_seconds = clock.subtract(&end, &start);
        if !tolerance.contains(delta_seconds) {
            report.out_of_tolerance.push(BoundsInterval {
                index,
                start,
                delta_seconds,
            });
        }
    }

    Ok(report)
}

/// `None` for a value that cannot be decoded; units and calendar errors
/// still abort.
fn decode_cell<C: CalendarClock + ?Sized>(
    clock: &C,
    encoding: &TimeEncoding,
    raw: f64,
) -> Result<Option<CfDateTime>, TimeError> {
    match clock.decode(raw, &encoding.units, encoding.calendar) {
        Ok(time) => Ok(Some(time)),
        Err(TimeError::InvalidValue(_)) => Ok(None),
        Err(error) => Err(error),
    }
}
