//! TOML configuration for the BaZi tools.
//!
//! Every field has a default, so an empty file (or no file) is valid:
//!
//! ```toml
//! [calendar]
//! utc_offset_hours = 8.0
//! [luck]
//! max_cycles = 8
//! [scoring]
//! useful_pattern_discount = false
//! [log]
//! level = "warn"
//! ```
//!
//! Rule tables are fixed domain data and are not configurable.

pub mod error;

use std::fs;
use std::path::Path;

use bazi_calendar::{CalendarError, DEFAULT_UTC_OFFSET_HOURS, SolarTermCalendar};
use bazi_engine::{DEFAULT_MAX_CYCLES, LuckOptions, ScoringOptions};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub use error::ConfigError;

/// Largest accepted distance from UTC, in hours.
pub const MAX_UTC_OFFSET_HOURS: f64 = 14.0;
/// Largest accepted luck-cycle horizon.
pub const MAX_CYCLES_LIMIT: usize = 20;
/// Accepted `log.level` values.
pub const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

fn default_utc_offset_hours() -> f64 {
    DEFAULT_UTC_OFFSET_HOURS
}

fn default_max_cycles() -> usize {
    DEFAULT_MAX_CYCLES
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CalendarSection {
    /// Offset of the birth-place civil time from UTC.
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: f64,
}

impl Default for CalendarSection {
    fn default() -> Self {
        Self {
            utc_offset_hours: default_utc_offset_hours(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LuckSection {
    /// Leading oracle cycles to examine, placeholder included.
    #[serde(default = "default_max_cycles")]
    pub max_cycles: usize,
}

impl Default for LuckSection {
    fn default() -> Self {
        Self {
            max_cycles: default_max_cycles(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringSection {
    #[serde(default)]
    pub useful_pattern_discount: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogSection {
    /// Used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BaziConfig {
    #[serde(default)]
    pub calendar: CalendarSection,
    #[serde(default)]
    pub luck: LuckSection,
    #[serde(default)]
    pub scoring: ScoringSection,
    #[serde(default)]
    pub log: LogSection,
}

impl BaziConfig {
    /// Read and validate a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Read from `path` when given and present, else fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) if p.exists() => Self::load(p),
            Some(p) => {
                warn!(path = %p.display(), "config file not found, using defaults");
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let offset = self.calendar.utc_offset_hours;
        if !offset.is_finite() || offset.abs() > MAX_UTC_OFFSET_HOURS {
            return Err(ConfigError::Invalid {
                field: "calendar.utc_offset_hours",
                reason: format!("{offset} is outside ±{MAX_UTC_OFFSET_HOURS}"),
            });
        }
        let cycles = self.luck.max_cycles;
        if !(1..=MAX_CYCLES_LIMIT).contains(&cycles) {
            return Err(ConfigError::Invalid {
                field: "luck.max_cycles",
                reason: format!("{cycles} is outside 1..={MAX_CYCLES_LIMIT}"),
            });
        }
        let level = self.log.level.trim().to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::Invalid {
                field: "log.level",
                reason: format!("unknown level {:?}", self.log.level),
            });
        }
        Ok(())
    }

    /// Engine options for a luck analysis.
    pub fn luck_options(&self) -> LuckOptions {
        LuckOptions {
            max_cycles: self.luck.max_cycles,
            scoring: ScoringOptions {
                useful_pattern_discount: self.scoring.useful_pattern_discount,
            },
        }
    }

    /// Built-in calendar at the configured offset.
    pub fn calendar(&self) -> Result<SolarTermCalendar, CalendarError> {
        SolarTermCalendar::new(self.calendar.utc_offset_hours)
    }
}
