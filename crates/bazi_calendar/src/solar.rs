//! Apparent solar longitude and solar-term instants.
//!
//! Low-precision solar theory (about 0.01° over 1600–2400), accurate to a few
//! minutes for term instants. Terms are solved by Newton iteration using the
//! mean solar motion as the derivative.

use crate::error::CalendarError;
use crate::julian::centuries_since_j2000;

/// Mean solar motion in degrees per day.
const MEAN_MOTION_DEG_PER_DAY: f64 = 0.985_647_36;

/// Newton step size below which the solution is accepted (~0.01 s).
const CONVERGENCE_DAYS: f64 = 1e-7;

const MAX_ITERATIONS: u32 = 50;

/// Longitude of 立春, start of the sexagenary year.
pub const LICHUN_DEG: f64 = 315.0;

/// The twelve jié (month-opening terms) sit at 15° + k·30°.
const JIE_OFFSET_DEG: f64 = 15.0;

fn normalize_360(deg: f64) -> f64 {
    deg.rem_euclid(360.0)
}

fn normalize_180(deg: f64) -> f64 {
    (deg + 180.0).rem_euclid(360.0) - 180.0
}

/// Apparent geocentric ecliptic longitude of the Sun, degrees in [0, 360).
pub fn apparent_solar_longitude_deg(jd: f64) -> f64 {
    let t = centuries_since_j2000(jd);
    let l0 = 280.466_46 + 36_000.769_83 * t + 0.000_303_2 * t * t;
    let m = (357.529_11 + 35_999.050_29 * t - 0.000_153_7 * t * t).to_radians();
    let c = (1.914_602 - 0.004_817 * t - 0.000_014 * t * t) * m.sin()
        + (0.019_993 - 0.000_101 * t) * (2.0 * m).sin()
        + 0.000_289 * (3.0 * m).sin();
    let omega = (125.04 - 1_934.136 * t).to_radians();
    normalize_360(l0 + c - 0.005_69 - 0.004_78 * omega.sin())
}

/// Julian Date at which the Sun reaches `target_deg`, starting near `jd_guess`.
///
/// The guess must lie within half a year of the wanted crossing.
pub fn solve_solar_longitude(target_deg: f64, jd_guess: f64) -> Result<f64, CalendarError> {
    let mut jd = jd_guess;
    for i in 0..MAX_ITERATIONS {
        let step = normalize_180(apparent_solar_longitude_deg(jd) - target_deg)
            / MEAN_MOTION_DEG_PER_DAY;
        jd -= step;
        tracing::trace!(target_deg, iteration = i, jd, step, "solar term iteration");
        if step.abs() < CONVERGENCE_DAYS {
            return Ok(jd);
        }
    }
    Err(CalendarError::NoConvergence { target_deg })
}

/// First jié strictly after `jd`.
pub fn next_jie(jd: f64) -> Result<f64, CalendarError> {
    let lon = apparent_solar_longitude_deg(jd);
    let target = ((lon - JIE_OFFSET_DEG) / 30.0).floor() * 30.0 + 30.0 + JIE_OFFSET_DEG;
    let guess = jd + normalize_360(target - lon) / MEAN_MOTION_DEG_PER_DAY;
    solve_solar_longitude(normalize_360(target), guess)
}

/// Last jié at or before `jd`.
pub fn prev_jie(jd: f64) -> Result<f64, CalendarError> {
    let lon = apparent_solar_longitude_deg(jd);
    let target = ((lon - JIE_OFFSET_DEG) / 30.0).floor() * 30.0 + JIE_OFFSET_DEG;
    let guess = jd - normalize_360(lon - target) / MEAN_MOTION_DEG_PER_DAY;
    solve_solar_longitude(normalize_360(target), guess)
}

/// 立春 of a Gregorian year, as a UT Julian Date.
pub fn lichun(year: i32) -> Result<f64, CalendarError> {
    // 4 February 0h UT is always within a day or two of the term.
    let guess = crate::julian::jd_from_utc(
        chrono::NaiveDate::from_ymd_opt(year, 2, 4)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or(CalendarError::DateOverflow)?,
    );
    solve_solar_longitude(LICHUN_DEG, guess)
}
