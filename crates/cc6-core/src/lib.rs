#![deny(unsafe_code)]

pub mod calendar;
pub mod chunking;
pub mod cv_compare;
pub mod cv_matcher;
pub mod error;
pub mod geo;
pub mod time_axis;
pub mod time_bounds;
pub mod trace;

pub use calendar::{Calendar, CalendarClock, CfClock, CfDateTime, TimeEncoding, TimeUnits};
pub use chunking::{ChunkReport, check_chunking, chunk_expectation};
pub use cv_compare::{Comparison, CvComparator, Finding};
pub use cv_matcher::{MatchOutcome, match_entry};
pub use error::TimeError;
pub use geo::{convert_lon_180, convert_lon_360, crosses_anti_meridian, crosses_zero_meridian};
pub use time_axis::{Discontinuity, TimeAxis, check_continuity, format_delta};
pub use time_bounds::{BoundsArray, BoundsReport, check_bounds};
pub use trace::{CvTraceEvent, TraceCollector, TraceOutcome, TraceSink, TracingSink};
