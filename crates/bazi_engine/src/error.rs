//! Error types for the analysis pipeline.

use bazi_base::ChartError;
use bazi_calendar::CalendarError;
use thiserror::Error;

/// Errors from running a natal or luck analysis.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum EngineError {
    /// The oracle returned natal pillars that do not parse.
    #[error("invalid natal chart: {0}")]
    Chart(#[from] ChartError),
    /// The oracle could not produce pillars or cycles.
    #[error("calendar: {0}")]
    Calendar(#[from] CalendarError),
}
