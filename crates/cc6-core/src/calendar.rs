//! CF calendars and numeric time decoding.
//!
//! Time coordinates in CF files are numbers relative to a reference date
//! (`"days since 1949-12-01 00:00:00"`) in one of several calendars. Decoding
//! turns them into [`CfDateTime`] values whose differences are real seconds
//! in that calendar, so a 360-day February is 30 days long and a `noleap`
//! year never has a 29th of February.
//!
//! # Supported calendars
//!
//! | CF name(s)                  | variant                          |
//! |-----------------------------|----------------------------------|
//! | `standard`, `gregorian`     | [`Calendar::Standard`]           |
//! | `proleptic_gregorian`       | [`Calendar::ProlepticGregorian`] |
//! | `julian`                    | [`Calendar::Julian`]             |
//! | `noleap`, `365_day`         | [`Calendar::NoLeap`]             |
//! | `all_leap`, `366_day`       | [`Calendar::AllLeap`]            |
//! | `360_day`                   | [`Calendar::Day360`]             |
//!
//! The standard calendar is Julian before 1582-10-15 and Gregorian from then
//! on; the ten days in between do not exist.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

use crate::error::TimeError;

pub const SECONDS_PER_MINUTE: f64 = 60.0;
pub const SECONDS_PER_HOUR: f64 = 3_600.0;
pub const SECONDS_PER_DAY: f64 = 86_400.0;

const MICROS_PER_SECOND: i64 = 1_000_000;
const MICROS_PER_DAY: i64 = 86_400 * MICROS_PER_SECOND;

/// Julian day number of chrono's day 0 (0000-12-31, proleptic Gregorian).
const CE_EPOCH_JDN: i64 = 1_721_425;

/// Julian day number of 1582-10-15, the first Gregorian day.
const GREGORIAN_SWITCH_JDN: i64 = 2_299_161;

const NOLEAP_CUMULATIVE: [i64; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];
const ALL_LEAP_CUMULATIVE: [i64; 12] = [0, 31, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335];

/// A CF calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Calendar {
    /// Mixed Julian/Gregorian.
    Standard,
    ProlepticGregorian,
    Julian,
    /// 365 days every year.
    NoLeap,
    /// 366 days every year.
    AllLeap,
    /// Twelve 30-day months.
    Day360,
}

impl Calendar {
    /// Canonical CF name.
    pub fn as_str(self) -> &'static str {
        match self {
            Calendar::Standard => "standard",
            Calendar::ProlepticGregorian => "proleptic_gregorian",
            Calendar::Julian => "julian",
            Calendar::NoLeap => "noleap",
            Calendar::AllLeap => "all_leap",
            Calendar::Day360 => "360_day",
        }
    }

    fn is_leap_year(self, year: i64) -> bool {
        let julian = year.rem_euclid(4) == 0;
        let gregorian = julian && (year.rem_euclid(100) != 0 || year.rem_euclid(400) == 0);
        match self {
            Calendar::Standard if year < 1582 => julian,
            Calendar::Standard | Calendar::ProlepticGregorian => gregorian,
            Calendar::Julian => julian,
            Calendar::NoLeap | Calendar::Day360 => false,
            Calendar::AllLeap => true,
        }
    }

    /// Number of days in a month, `None` for an invalid month.
    pub fn days_in_month(self, year: i64, month: u32) -> Option<u32> {
        if !(1..=12).contains(&month) {
            return None;
        }
        if self == Calendar::Day360 {
            return Some(30);
        }
        Some(match month {
            2 if self.is_leap_year(year) => 29,
            2 => 28,
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        })
    }

    /// Day count of a date. Counts are only comparable within one calendar.
    fn day_number(self, year: i64, month: u32, day: u32) -> Option<i64> {
        let days_in_month = self.days_in_month(year, month)?;
        if day == 0 || day > days_in_month {
            return None;
        }
        let month_index = (month - 1) as usize;
        let day_offset = i64::from(day) - 1;
        match self {
            Calendar::Day360 => Some(year * 360 + i64::from(month - 1) * 30 + day_offset),
            Calendar::NoLeap => Some(year * 365 + NOLEAP_CUMULATIVE[month_index] + day_offset),
            Calendar::AllLeap => Some(year * 366 + ALL_LEAP_CUMULATIVE[month_index] + day_offset),
            Calendar::Julian => Some(julian_to_jdn(year, month, day)),
            Calendar::ProlepticGregorian => gregorian_to_jdn(year, month, day),
            Calendar::Standard => {
                if (year, month, day) >= (1582, 10, 15) {
                    gregorian_to_jdn(year, month, day)
                } else if (year, month, day) >= (1582, 10, 5) {
                    None
                } else {
                    Some(julian_to_jdn(year, month, day))
                }
            }
        }
    }

    /// Inverse of [`Calendar::day_number`].
    fn ymd(self, day_number: i64) -> Option<(i64, u32, u32)> {
        match self {
            Calendar::Day360 => {
                let year = day_number.div_euclid(360);
                let day_of_year = day_number.rem_euclid(360);
                Some((year, (day_of_year / 30) as u32 + 1, (day_of_year % 30) as u32 + 1))
            }
            Calendar::NoLeap => Some(fixed_year_ymd(day_number, 365, &NOLEAP_CUMULATIVE)),
            Calendar::AllLeap => Some(fixed_year_ymd(day_number, 366, &ALL_LEAP_CUMULATIVE)),
            Calendar::Julian => Some(jdn_to_julian(day_number)),
            Calendar::ProlepticGregorian => jdn_to_gregorian(day_number),
            Calendar::Standard => {
                if day_number >= GREGORIAN_SWITCH_JDN {
                    jdn_to_gregorian(day_number)
                } else {
                    Some(jdn_to_julian(day_number))
                }
            }
        }
    }
}

impl fmt::Display for Calendar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Calendar {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "gregorian" => Ok(Calendar::Standard),
            "proleptic_gregorian" => Ok(Calendar::ProlepticGregorian),
            "julian" => Ok(Calendar::Julian),
            "noleap" | "365_day" => Ok(Calendar::NoLeap),
            "all_leap" | "366_day" => Ok(Calendar::AllLeap),
            "360_day" => Ok(Calendar::Day360),
            _ => Err(TimeError::UnknownCalendar(s.to_string())),
        }
    }
}

fn fixed_year_ymd(day_number: i64, year_length: i64, cumulative: &[i64; 12]) -> (i64, u32, u32) {
    let year = day_number.div_euclid(year_length);
    let day_of_year = day_number.rem_euclid(year_length);
    let month_index = cumulative
        .iter()
        .rposition(|start| *start <= day_of_year)
        .unwrap_or(0);
    let day = day_of_year - cumulative[month_index] + 1;
    (year, month_index as u32 + 1, day as u32)
}

fn julian_to_jdn(year: i64, month: u32, day: u32) -> i64 {
    let a = i64::from((14 - month) / 12);
    let y = year + 4800 - a;
    let m = i64::from(month) + 12 * a - 3;
    i64::from(day) + (153 * m + 2) / 5 + 365 * y + y.div_euclid(4) - 32_083
}

fn jdn_to_julian(jdn: i64) -> (i64, u32, u32) {
    let c = jdn + 32_082;
    let d = (4 * c + 3).div_euclid(1461);
    let e = c - (1461 * d).div_euclid(4);
    let m = (5 * e + 2).div_euclid(153);
    let day = e - (153 * m + 2).div_euclid(5) + 1;
    let month = m + 3 - 12 * (m / 10);
    let year = d - 4800 + m / 10;
    (year, month as u32, day as u32)
}

fn gregorian_to_jdn(year: i64, month: u32, day: u32) -> Option<i64> {
    let date = NaiveDate::from_ymd_opt(i32::try_from(year).ok()?, month, day)?;
    Some(i64::from(date.num_days_from_ce()) + CE_EPOCH_JDN)
}

fn jdn_to_gregorian(jdn: i64) -> Option<(i64, u32, u32)> {
    let days = i32::try_from(jdn - CE_EPOCH_JDN).ok()?;
    let date = NaiveDate::from_num_days_from_ce_opt(days)?;
    Some((i64::from(date.year()), date.month(), date.day()))
}

/// A decoded instant in a CF calendar, with microsecond resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CfDateTime {
    calendar: Calendar,
    day_number: i64,
    micros_of_day: i64,
}

impl CfDateTime {
    /// Build an instant from calendar fields; `None` if the date does not
    /// exist in `calendar`.
    pub fn from_ymd_hms(
        calendar: Calendar,
        year: i64,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: f64,
    ) -> Option<Self> {
        if hour > 23 || minute > 59 || !(0.0..60.0).contains(&second) {
            return None;
        }
        let day_number = calendar.day_number(year, month, day)?;
        let micros_of_day = (i64::from(hour) * 3_600 + i64::from(minute) * 60) * MICROS_PER_SECOND
            + (second * MICROS_PER_SECOND as f64).round() as i64;
        Some(Self {
            calendar,
            day_number,
            micros_of_day,
        })
    }

    /// Shift by `seconds`, rounded to whole microseconds.
    pub fn add_seconds(self, seconds: f64) -> Option<Self> {
        let delta = (seconds * MICROS_PER_SECOND as f64).round();
        if !delta.is_finite() || delta.abs() >= 9.0e18 {
            return None;
        }
        let total = self.micros_of_day.checked_add(delta as i64)?;
        let day_number = self
            .day_number
            .checked_add(total.div_euclid(MICROS_PER_DAY))?;
        let shifted = Self {
            calendar: self.calendar,
            day_number,
            micros_of_day: total.rem_euclid(MICROS_PER_DAY),
        };
        shifted.ymd().map(|_| shifted)
    }

    pub fn calendar(&self) -> Calendar {
        self.calendar
    }

    /// Year, month and day in the instant's calendar.
    pub fn ymd(&self) -> Option<(i64, u32, u32)> {
        self.calendar.ymd(self.day_number)
    }

    pub fn year(&self) -> i64 {
        self.ymd().map_or(0, |(year, _, _)| year)
    }

    /// Seconds from `earlier` to `self`.
    pub fn seconds_since(&self, earlier: &CfDateTime) -> f64 {
        let days = (self.day_number - earlier.day_number) as f64;
        let micros = (self.micros_of_day - earlier.micros_of_day) as f64;
        days * SECONDS_PER_DAY + micros / MICROS_PER_SECOND as f64
    }

    pub fn same_instant(&self, other: &CfDateTime) -> bool {
        self.day_number == other.day_number && self.micros_of_day == other.micros_of_day
    }
}

impl fmt::Display for CfDateTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seconds = self.micros_of_day / MICROS_PER_SECOND;
        let fraction = self.micros_of_day % MICROS_PER_SECOND;
        match self.ymd() {
            Some((year, month, day)) => write!(f, "{year:04}-{month:02}-{day:02}")?,
            None => write!(f, "day {}", self.day_number)?,
        }
        write!(
            f,
            " {:02}:{:02}:{:02}",
            seconds / 3_600,
            (seconds % 3_600) / 60,
            seconds % 60
        )?;
        if fraction != 0 {
            write!(f, ".{fraction:06}")?;
        }
        Ok(())
    }
}

static UNITS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^\s*([A-Za-z]+)\s+since\s+([+-]?\d{1,6})-(\d{1,2})-(\d{1,2})(?:(?:T|\s+)(\d{1,2}):(\d{1,2})(?::(\d{1,2}(?:\.\d*)?))?)?\s*(Z|UTC|[+-]\d{1,2}(?::?\d{2})?)?\s*$",
    )
    .expect("valid units regex")
});

/// Parsed `"<unit> since <reference>"` string.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeUnits {
    pub seconds_per_unit: f64,
    pub year: i64,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: f64,
    /// Offset of the reference time from UTC.
    pub utc_offset_minutes: i64,
}

impl TimeUnits {
    /// Parse CF time units. Calendar months and years are rejected since
    /// their length is not fixed.
    pub fn parse(units: &str) -> Result<Self, TimeError> {
        let invalid = || TimeError::InvalidUnits(units.to_string());
        let caps = UNITS_RE.captures(units).ok_or_else(invalid)?;

        let seconds_per_unit = match caps[1].to_ascii_lowercase().as_str() {
            "seconds" | "second" | "secs" | "sec" | "s" => 1.0,
            "minutes" | "minute" | "mins" | "min" => SECONDS_PER_MINUTE,
            "hours" | "hour" | "hrs" | "hr" | "h" => SECONDS_PER_HOUR,
            "days" | "day" | "d" => SECONDS_PER_DAY,
            _ => return Err(invalid()),
        };
        let number = |idx: usize| caps.get(idx).map(|m| m.as_str());
        let year = number(2).and_then(|v| v.parse().ok()).ok_or_else(invalid)?;
        let month = number(3).and_then(|v| v.parse().ok()).ok_or_else(invalid)?;
        let day = number(4).and_then(|v| v.parse().ok()).ok_or_else(invalid)?;
        let hour = number(5).map_or(Some(0), |v| v.parse().ok()).ok_or_else(invalid)?;
        let minute = number(6).map_or(Some(0), |v| v.parse().ok()).ok_or_else(invalid)?;
        let second = number(7)
            .map_or(Some(0.0), |v| v.parse().ok())
            .ok_or_else(invalid)?;
        let utc_offset_minutes = number(8).map_or(Some(0), parse_utc_offset).ok_or_else(invalid)?;

        Ok(Self {
            seconds_per_unit,
            year,
            month,
            day,
            hour,
            minute,
            second,
            utc_offset_minutes,
        })
    }

    /// Reference instant in `calendar`, shifted to UTC.
    pub fn reference(&self, calendar: Calendar) -> Result<CfDateTime, TimeError> {
        let invalid = || TimeError::InvalidReferenceDate {
            calendar: calendar.to_string(),
            year: self.year,
            month: self.month,
            day: self.day,
        };
        let local = CfDateTime::from_ymd_hms(
            calendar,
            self.year,
            self.month,
            self.day,
            self.hour,
            self.minute,
            self.second,
        )
        .ok_or_else(invalid)?;
        local
            .add_seconds(-(self.utc_offset_minutes as f64) * SECONDS_PER_MINUTE)
            .ok_or_else(invalid)
    }
}

fn parse_utc_offset(raw: &str) -> Option<i64> {
    if raw == "Z" || raw == "UTC" {
        return Some(0);
    }
    let (sign, digits) = match raw.split_at(1) {
        ("-", rest) => (-1, rest),
        (_, rest) => (1, rest),
    };
    let digits = digits.replace(':', "");
    let (hours, minutes) = if digits.len() > 2 {
        digits.split_at(digits.len() - 2)
    } else {
        (digits.as_str(), "0")
    };
    Some(sign * (hours.parse::<i64>().ok()? * 60 + minutes.parse::<i64>().ok()?))
}

/// Units and calendar of a time coordinate, resolved from attribute text.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeEncoding {
    pub units: TimeUnits,
    pub calendar: Calendar,
}

impl TimeEncoding {
    pub fn resolve(units: Option<&str>, calendar: Option<&str>) -> Result<Self, TimeError> {
        let units = units.filter(|u| !u.trim().is_empty()).ok_or(TimeError::MissingUnits)?;
        let calendar = calendar
            .filter(|c| !c.trim().is_empty())
            .ok_or(TimeError::MissingCalendar)?;
        Ok(Self {
            units: TimeUnits::parse(units)?,
            calendar: calendar.parse()?,
        })
    }
}

/// Calendar arithmetic used by the time checks.
pub trait CalendarClock {
    /// Decode one raw coordinate value.
    fn decode(
        &self,
        raw: f64,
        units: &TimeUnits,
        calendar: Calendar,
    ) -> Result<CfDateTime, TimeError>;

    /// Seconds from `earlier` to `later`.
    fn subtract(&self, later: &CfDateTime, earlier: &CfDateTime) -> f64;

    fn decode_all(
        &self,
        values: &[f64],
        encoding: &TimeEncoding,
    ) -> Result<Vec<CfDateTime>, TimeError> {
        values
            .iter()
            .map(|raw| self.decode(*raw, &encoding.units, encoding.calendar))
            .collect()
    }
}

/// Default clock implementing the CF calendars above.
#[derive(Debug, Clone, Copy, Default)]
pub struct CfClock;

impl CalendarClock for CfClock {
    fn decode(
        &self,
        raw: f64,
        units: &TimeUnits,
        calendar: Calendar,
    ) -> Result<CfDateTime, TimeError> {
        let reference = units.reference(calendar)?;
        reference
            .add_seconds(raw * units.seconds_per_unit)
            .ok_or(TimeError::InvalidValue(raw))
    }

    fn subtract(&self, later: &CfDateTime, earlier: &CfDateTime) -> f64 {
        later.seconds_since(earlier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(raw: f64, units: &str, calendar: Calendar) -> CfDateTime {
        CfClock
            .decode(raw, &TimeUnits::parse(units).unwrap(), calendar)
            .unwrap()
    }

    #[test]
    fn calendar_aliases() {
        assert_eq!("gregorian".parse::<Calendar>().unwrap(), Calendar::Standard);
        assert_eq!("365_day".parse::<Calendar>().unwrap(), Calendar::NoLeap);
        assert_eq!("366_day".parse::<Calendar>().unwrap(), Calendar::AllLeap);
        assert_eq!(" 360_DAY ".parse::<Calendar>().unwrap(), Calendar::Day360);
        assert!(matches!(
            "none".parse::<Calendar>(),
            Err(TimeError::UnknownCalendar(_))
        ));
    }

    #[test]
    fn parses_common_unit_strings() {
        let units = TimeUnits::parse("days since 1949-12-01 00:00:00").unwrap();
        assert_eq!(units.seconds_per_unit, SECONDS_PER_DAY);
        assert_eq!((units.year, units.month, units.day), (1949, 12, 1));

        let units = TimeUnits::parse("hours since 2000-1-1").unwrap();
        assert_eq!(units.seconds_per_unit, SECONDS_PER_HOUR);
        assert_eq!(units.hour, 0);

        let units = TimeUnits::parse("seconds since 1970-01-01T00:00:00Z").unwrap();
        assert_eq!(units.utc_offset_minutes, 0);

        let units = TimeUnits::parse("minutes since 2000-01-01 06:30 +01:00").unwrap();
        assert_eq!(units.utc_offset_minutes, 60);
    }

    #[test]
    fn rejects_calendar_months() {
        assert!(matches!(
            TimeUnits::parse("months since 2000-01-01"),
            Err(TimeError::InvalidUnits(_))
        ));
        assert!(TimeUnits::parse("days after 2000-01-01").is_err());
    }

    #[test]
    fn day360_february_has_thirty_days() {
        let t = decode(59.0, "days since 2000-01-01", Calendar::Day360);
        assert_eq!(t.to_string(), "2000-02-30 00:00:00");
    }

    #[test]
    fn noleap_skips_leap_day() {
        let t = decode(59.0, "days since 2000-01-01", Calendar::NoLeap);
        assert_eq!(t.to_string(), "2000-03-01 00:00:00");
        let t = decode(59.0, "days since 2000-01-01", Calendar::ProlepticGregorian);
        assert_eq!(t.to_string(), "2000-02-29 00:00:00");
        let t = decode(60.0, "days since 2000-01-01", Calendar::AllLeap);
        assert_eq!(t.to_string(), "2000-03-01 00:00:00");
    }

    #[test]
    fn julian_and_gregorian_diverge_in_1900() {
        let julian = decode(59.0, "days since 1900-01-01", Calendar::Julian);
        assert_eq!(julian.to_string(), "1900-02-29 00:00:00");
        let standard = decode(59.0, "days since 1900-01-01", Calendar::Standard);
        assert_eq!(standard.to_string(), "1900-03-01 00:00:00");
    }

    #[test]
    fn standard_calendar_skips_ten_days_in_1582() {
        let t = decode(1.0, "days since 1582-10-04", Calendar::Standard);
        assert_eq!(t.to_string(), "1582-10-15 00:00:00");
        assert!(
            TimeUnits::parse("days since 1582-10-10")
                .unwrap()
                .reference(Calendar::Standard)
                .is_err()
        );
    }

    #[test]
    fn fractional_values_and_offsets() {
        let t = decode(0.5, "days since 2000-01-01", Calendar::Standard);
        assert_eq!(t.to_string(), "2000-01-01 12:00:00");
        let t = decode(1.5, "seconds since 2000-01-01", Calendar::Standard);
        assert_eq!(t.to_string(), "2000-01-01 00:00:01.500000");
        let t = decode(-1.0, "hours since 2000-01-01", Calendar::Standard);
        assert_eq!(t.to_string(), "1999-12-31 23:00:00");
        let t = decode(0.0, "hours since 2000-01-01 01:00 +01:00", Calendar::Standard);
        assert_eq!(t.to_string(), "2000-01-01 00:00:00");
    }

    #[test]
    fn subtraction_is_calendar_aware() {
        let units = TimeUnits::parse("days since 2001-02-01").unwrap();
        for (calendar, expected_days) in [
            (Calendar::Day360, 30.0),
            (Calendar::NoLeap, 28.0),
            (Calendar::AllLeap, 29.0),
        ] {
            let feb = CfDateTime::from_ymd_hms(calendar, 2001, 2, 1, 0, 0, 0.0).unwrap();
            let mar = CfDateTime::from_ymd_hms(calendar, 2001, 3, 1, 0, 0, 0.0).unwrap();
            assert_eq!(CfClock.subtract(&mar, &feb), expected_days * SECONDS_PER_DAY);
            assert!(units.reference(calendar).unwrap().same_instant(&feb));
        }
    }

    #[test]
    fn non_finite_values_do_not_decode() {
        let units = TimeUnits::parse("days since 2000-01-01").unwrap();
        assert!(matches!(
            CfClock.decode(f64::NAN, &units, Calendar::Standard),
            Err(TimeError::InvalidValue(value)) if value.is_nan()
        ));
        assert!(CfClock.decode(f64::INFINITY, &units, Calendar::Standard).is_err());
    }

    #[test]
    fn resolve_reports_missing_metadata_first() {
        assert_eq!(
            TimeEncoding::resolve(None, Some("standard")),
            Err(TimeError::MissingUnits)
        );
        assert_eq!(
            TimeEncoding::resolve(Some("days since 2000-01-01"), Some("")),
            Err(TimeError::MissingCalendar)
        );
        assert!(TimeEncoding::resolve(Some("days since 2000-01-01"), Some("360_day")).is_ok());
    }
}
