//! The calendar seam: whatever turns a civil birth instant into raw pillars
//! and luck cycles.
//!
//! Records carry stem-branch text exactly as an almanac would print it; the
//! engine validates them into typed pillars.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::CalendarError;

/// Sex of the native; decides the luck-cycle direction together with the
/// year stem polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

/// The four natal pillars as stem-branch text, e.g. `"丙戌"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPillars {
    pub year: String,
    pub month: String,
    pub day: String,
    pub hour: String,
}

/// One flowing year inside a luck cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawYear {
    pub ganzhi: String,
    pub year: i32,
    /// Virtual (East Asian) age: 1 in the birth year.
    pub age: i32,
}

/// One ten-year luck cycle. The leading placeholder before the first real
/// cycle has a blank `ganzhi`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLuckCycle {
    pub ganzhi: String,
    pub start_year: i32,
    pub start_age: i32,
    pub years: Vec<RawYear>,
}

impl RawLuckCycle {
    pub fn is_placeholder(&self) -> bool {
        self.ganzhi.trim().is_empty()
    }
}

/// Source of natal pillars and luck cycles.
pub trait CalendarOracle {
    /// Four natal pillars for a local civil birth instant.
    fn natal_pillars(&self, birth: NaiveDateTime) -> Result<RawPillars, CalendarError>;

    /// Luck cycles in chronological order, placeholder first.
    fn luck_cycles(
        &self,
        birth: NaiveDateTime,
        sex: Sex,
    ) -> Result<Vec<RawLuckCycle>, CalendarError>;
}
