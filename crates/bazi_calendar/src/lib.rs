//! Civil date to BaZi pillars and luck cycles.
//!
//! This crate provides:
//! - The [`CalendarOracle`] trait the engine consumes
//! - Julian Date conversions and a low-precision solar theory
//! - [`SolarTermCalendar`], a built-in oracle using solar terms

pub mod error;
pub mod julian;
pub mod oracle;
pub mod sexagenary;
pub mod solar;

pub use error::CalendarError;
pub use julian::{J2000_JD, jd_from_utc, utc_from_jd};
pub use oracle::{CalendarOracle, RawLuckCycle, RawPillars, RawYear, Sex};
pub use sexagenary::{
    DEFAULT_CYCLE_COUNT, DEFAULT_UTC_OFFSET_HOURS, LuckStart, NatalGanZhi, SolarTermCalendar,
    day_cycle_index,
};
pub use solar::{apparent_solar_longitude_deg, lichun, next_jie, prev_jie};
