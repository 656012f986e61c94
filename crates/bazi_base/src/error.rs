//! Error types for chart construction.

use thiserror::Error;

/// Errors raised while validating chart input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ChartError {
    /// Character is not one of the ten heavenly stems.
    #[error("invalid stem: {0}")]
    InvalidStem(char),
    /// Character is not one of the twelve earthly branches.
    #[error("invalid branch: {0}")]
    InvalidBranch(char),
    /// Text is not a valid two-character stem-branch pair.
    #[error("malformed stem-branch pair: {0:?}")]
    MalformedGanZhi(String),
}
