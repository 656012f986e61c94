//! Error types for calendar conversion.

use thiserror::Error;

/// Errors from converting a civil instant into pillars or luck cycles.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum CalendarError {
    /// Year outside the range the solar theory is trusted for.
    #[error("year {year} outside supported range {min}..={max}")]
    OutOfRange { year: i32, min: i32, max: i32 },
    /// Newton iteration on the solar longitude did not settle.
    #[error("solar term {target_deg}° did not converge")]
    NoConvergence { target_deg: f64 },
    /// UTC offset outside ±14 hours.
    #[error("invalid UTC offset: {0} h")]
    InvalidOffset(f64),
    /// Date arithmetic left the representable range.
    #[error("date arithmetic overflow")]
    DateOverflow,
}
