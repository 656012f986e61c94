//! Julian Date conversions for naive UTC instants.

use chrono::{DateTime, NaiveDateTime};

use crate::error::CalendarError;

/// Julian Date of J2000.0 (2000-01-01 12:00 UT).
pub const J2000_JD: f64 = 2_451_545.0;

/// Julian Date of the Unix epoch (1970-01-01 00:00 UT).
pub const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Julian centuries per day.
pub const DAYS_PER_CENTURY: f64 = 36_525.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Julian Date of a UTC instant.
pub fn jd_from_utc(utc: NaiveDateTime) -> f64 {
    UNIX_EPOCH_JD + utc.and_utc().timestamp_millis() as f64 / 1000.0 / SECONDS_PER_DAY
}

/// UTC instant of a Julian Date, to the nearest second.
pub fn utc_from_jd(jd: f64) -> Result<NaiveDateTime, CalendarError> {
    let seconds = ((jd - UNIX_EPOCH_JD) * SECONDS_PER_DAY).round() as i64;
    DateTime::from_timestamp(seconds, 0)
        .map(|d| d.naive_utc())
        .ok_or(CalendarError::DateOverflow)
}

/// Julian centuries since J2000.0.
pub fn centuries_since_j2000(jd: f64) -> f64 {
    (jd - J2000_JD) / DAYS_PER_CENTURY
}
