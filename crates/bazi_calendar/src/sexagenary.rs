//! Built-in solar-term calendar.
//!
//! Year pillars change at 立春, month pillars at each jié, day pillars at
//! local midnight. Luck cycles start after the classical conversion of the
//! distance to the nearest jié: 3 days to a year, 1 day to 4 months and one
//! double-hour to 10 days.

use chrono::{Datelike, Days, Months, NaiveDate, NaiveDateTime, TimeDelta, Timelike};

use bazi_base::{Branch, GanZhi, Stem};

use crate::error::CalendarError;
use crate::julian::{jd_from_utc, utc_from_jd};
use crate::oracle::{CalendarOracle, RawLuckCycle, RawPillars, RawYear, Sex};
use crate::solar::{LICHUN_DEG, apparent_solar_longitude_deg, lichun, next_jie, prev_jie};

/// China Standard Time.
pub const DEFAULT_UTC_OFFSET_HOURS: f64 = 8.0;

/// Cycles produced per birth, placeholder included.
pub const DEFAULT_CYCLE_COUNT: usize = 10;

/// Supported civil years for the solar theory.
pub const MIN_YEAR: i32 = 1600;
pub const MAX_YEAR: i32 = 2400;

/// Largest accepted UTC offset magnitude.
pub const MAX_UTC_OFFSET_HOURS: f64 = 14.0;

/// Jiazi index of 2000-01-01 (戊午).
const DAY_INDEX_2000_01_01: i64 = 54;

/// `num_days_from_ce` of 2000-01-01.
const CE_DAYS_2000_01_01: i64 = 730_120;

/// Four natal pillars in typed form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NatalGanZhi {
    pub year: GanZhi,
    pub month: GanZhi,
    pub day: GanZhi,
    pub hour: GanZhi,
}

/// When the first real luck cycle begins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LuckStart {
    /// Cycles advance through the jiazi when true, retreat otherwise.
    pub forward: bool,
    pub years: u32,
    pub months: u32,
    pub days: u32,
    /// Local civil instant the first cycle starts.
    pub start: NaiveDateTime,
}

/// Sexagenary calendar driven by apparent solar longitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarTermCalendar {
    utc_offset_hours: f64,
    cycle_count: usize,
}

impl Default for SolarTermCalendar {
    fn default() -> Self {
        Self {
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
            cycle_count: DEFAULT_CYCLE_COUNT,
        }
    }
}

impl SolarTermCalendar {
    /// Calendar for civil times at a fixed offset from UTC.
    pub fn new(utc_offset_hours: f64) -> Result<Self, CalendarError> {
        if !utc_offset_hours.is_finite() || utc_offset_hours.abs() > MAX_UTC_OFFSET_HOURS {
            return Err(CalendarError::InvalidOffset(utc_offset_hours));
        }
        Ok(Self {
            utc_offset_hours,
            ..Self::default()
        })
    }

    /// Number of cycles to produce, placeholder included.
    pub fn with_cycle_count(mut self, cycle_count: usize) -> Self {
        self.cycle_count = cycle_count;
        self
    }

    pub fn utc_offset_hours(&self) -> f64 {
        self.utc_offset_hours
    }

    fn offset(&self) -> Result<TimeDelta, CalendarError> {
        TimeDelta::try_milliseconds((self.utc_offset_hours * 3_600_000.0).round() as i64)
            .ok_or(CalendarError::DateOverflow)
    }

    fn to_utc(&self, local: NaiveDateTime) -> Result<NaiveDateTime, CalendarError> {
        local
            .checked_sub_signed(self.offset()?)
            .ok_or(CalendarError::DateOverflow)
    }

    fn to_local(&self, utc: NaiveDateTime) -> Result<NaiveDateTime, CalendarError> {
        utc.checked_add_signed(self.offset()?)
            .ok_or(CalendarError::DateOverflow)
    }

    fn check_range(local: NaiveDateTime) -> Result<(), CalendarError> {
        let year = local.year();
        if (MIN_YEAR..=MAX_YEAR).contains(&year) {
            Ok(())
        } else {
            Err(CalendarError::OutOfRange {
                year,
                min: MIN_YEAR,
                max: MAX_YEAR,
            })
        }
    }

    /// Typed natal pillars for a local civil instant.
    pub fn natal_ganzhi(&self, birth: NaiveDateTime) -> Result<NatalGanZhi, CalendarError> {
        Self::check_range(birth)?;
        let jd = jd_from_utc(self.to_utc(birth)?);

        let mut sexagenary_year = birth.year();
        if jd < lichun(sexagenary_year)? {
            sexagenary_year -= 1;
        }
        let year = GanZhi::from_cycle_index(i64::from(sexagenary_year) - 4);

        let lon = apparent_solar_longitude_deg(jd);
        let month_offset = ((lon - LICHUN_DEG).rem_euclid(360.0) / 30.0).floor() as i64;
        let month = GanZhi::new(
            Stem::from_index(2 * i64::from(year.stem.index()) + 2 + month_offset),
            Branch::from_index(month_offset + 2),
        );

        let day_index = day_cycle_index(birth.date());
        let day = GanZhi::from_cycle_index(day_index);

        let hour_branch = Branch::from_index(i64::from((birth.hour() + 1) / 2));
        // From 23:00 the hour stem follows the next day.
        let stem_day = if birth.hour() == 23 {
            GanZhi::from_cycle_index(day_index + 1).stem
        } else {
            day.stem
        };
        let hour = GanZhi::new(
            Stem::from_index(2 * i64::from(stem_day.index()) + i64::from(hour_branch.index())),
            hour_branch,
        );

        Ok(NatalGanZhi {
            year,
            month,
            day,
            hour,
        })
    }

    /// Direction and start instant of the first luck cycle.
    pub fn luck_start(&self, birth: NaiveDateTime, sex: Sex) -> Result<LuckStart, CalendarError> {
        let natal = self.natal_ganzhi(birth)?;
        let forward = natal.year.stem.is_yang() == (sex == Sex::Male);

        let jd = jd_from_utc(self.to_utc(birth)?);
        let (from, to) = if forward {
            (birth, self.to_local(utc_from_jd(next_jie(jd)?)?)?)
        } else {
            (self.to_local(utc_from_jd(prev_jie(jd)?)?)?, birth)
        };

        let mut day_diff = (to.date() - from.date()).num_days();
        let mut hour_diff = i64::from(double_hour_index(to)) - i64::from(double_hour_index(from));
        if hour_diff < 0 {
            hour_diff += 12;
            day_diff -= 1;
        }
        let month_from_hours = hour_diff * 10 / 30;
        let total_months = day_diff * 4 + month_from_hours;
        let days = hour_diff * 10 - month_from_hours * 30;
        let years = total_months / 12;
        let months = total_months % 12;

        let start = u32::try_from(total_months)
            .ok()
            .and_then(|m| birth.checked_add_months(Months::new(m)))
            .and_then(|d| d.checked_add_days(Days::new(days.unsigned_abs())))
            .ok_or(CalendarError::DateOverflow)?;

        tracing::debug!(
            forward,
            years,
            months,
            days,
            %start,
            "luck start"
        );

        Ok(LuckStart {
            forward,
            years: years as u32,
            months: months as u32,
            days: days as u32,
            start,
        })
    }
}

/// Jiazi index of a civil date's day pillar.
pub fn day_cycle_index(date: NaiveDate) -> i64 {
    i64::from(date.num_days_from_ce()) - CE_DAYS_2000_01_01 + DAY_INDEX_2000_01_01
}

/// Double-hour index used for the luck-start offset; 23:00 counts as the
/// last double-hour of the day.
fn double_hour_index(t: NaiveDateTime) -> u32 {
    if t.hour() == 23 {
        11
    } else {
        ((t.hour() + 1) / 2) % 12
    }
}

fn years_of(first_year: i32, first_age: i32, count: i32) -> Vec<RawYear> {
    (0..count)
        .map(|k| RawYear {
            ganzhi: GanZhi::from_cycle_index(i64::from(first_year + k) - 4).to_string(),
            year: first_year + k,
            age: first_age + k,
        })
        .collect()
}

impl CalendarOracle for SolarTermCalendar {
    fn natal_pillars(&self, birth: NaiveDateTime) -> Result<RawPillars, CalendarError> {
        let n = self.natal_ganzhi(birth)?;
        Ok(RawPillars {
            year: n.year.to_string(),
            month: n.month.to_string(),
            day: n.day.to_string(),
            hour: n.hour.to_string(),
        })
    }

    fn luck_cycles(
        &self,
        birth: NaiveDateTime,
        sex: Sex,
    ) -> Result<Vec<RawLuckCycle>, CalendarError> {
        let natal = self.natal_ganzhi(birth)?;
        let start = self.luck_start(birth, sex)?;
        let birth_year = birth.year();
        let first_year = start.start.year();
        let month_index = i64::from(natal.month.cycle_index());

        let mut cycles = Vec::with_capacity(self.cycle_count);
        if self.cycle_count > 0 {
            cycles.push(RawLuckCycle {
                ganzhi: String::new(),
                start_year: birth_year,
                start_age: 1,
                years: years_of(birth_year, 1, first_year - birth_year),
            });
        }
        for i in 1..self.cycle_count {
            let step = i as i64;
            let index = if start.forward {
                month_index + step
            } else {
                month_index - step
            };
            let start_year = first_year + 10 * (i as i32 - 1);
            let start_age = start_year - birth_year + 1;
            cycles.push(RawLuckCycle {
                ganzhi: GanZhi::from_cycle_index(index).to_string(),
                start_year,
                start_age,
                years: years_of(start_year, start_age, 10),
            });
        }
        Ok(cycles)
    }
}
