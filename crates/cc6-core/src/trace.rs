//! Structured trace events for CV comparisons.

use std::fmt;

use cc6_model::CvShape;

/// Outcome of one matcher call, as traced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraceOutcome {
    Match,
    Mismatch,
    InvalidPattern,
}

impl TraceOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            TraceOutcome::Match => "match",
            TraceOutcome::Mismatch => "mismatch",
            TraceOutcome::InvalidPattern => "invalid-pattern",
        }
    }
}

impl fmt::Display for TraceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One comparison of an attribute against a CV entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CvTraceEvent {
    pub attribute: String,
    /// 1 for attributes, 2 for dependents of a keyed-nested entry.
    pub level: u8,
    pub shape: CvShape,
    pub outcome: TraceOutcome,
}

/// Receiver of comparison events.
pub trait TraceSink {
    fn record(&mut self, event: CvTraceEvent);
}

/// Forwards events to `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn record(&mut self, event: CvTraceEvent) {
        tracing::debug!(
            attribute = %event.attribute,
            level = event.level,
            shape = %event.shape,
            outcome = %event.outcome,
            "cv comparison"
        );
    }
}

/// Keeps every event in memory.
#[derive(Debug, Clone, Default)]
pub struct TraceCollector {
    pub events: Vec<CvTraceEvent>,
}

impl TraceSink for TraceCollector {
    fn record(&mut self, event: CvTraceEvent) {
        self.events.push(event);
    }
}
