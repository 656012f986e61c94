//! Luck-cycle and year orchestration.
//!
//! Pulls raw cycles from a [`CalendarOracle`], validates the stem-branch
//! text, scores each real cycle and every year inside it, and reports where
//! the cycle branch switches between useful and not useful.

use bazi_base::{Chart, Element, GanZhi};
use bazi_calendar::{CalendarOracle, RawLuckCycle, RawPillars, Sex};
use chrono::NaiveDateTime;
use tracing::{debug, trace};

use crate::cycle::{analyze_cycle, summarize_years};
use crate::error::EngineError;
use crate::luck_types::{LuckAnalysis, LuckGroup, LuckOptions, TurningPoint};
use crate::scoring::{NatalBasis, score_year};

/// Validate the oracle's natal pillars into a chart.
pub fn chart_from_raw(raw: &RawPillars) -> Result<Chart, EngineError> {
    Ok(Chart::parse(&raw.year, &raw.month, &raw.day, &raw.hour)?)
}

/// Full luck timeline for a birth instant.
pub fn analyze_luck<O: CalendarOracle + ?Sized>(
    oracle: &O,
    birth: NaiveDateTime,
    sex: Sex,
    useful: &[Element],
    options: &LuckOptions,
) -> Result<LuckAnalysis, EngineError> {
    let chart = chart_from_raw(&oracle.natal_pillars(birth)?)?;
    let cycles = oracle.luck_cycles(birth, sex)?;
    Ok(luck_from_cycles(chart, &cycles, useful, options))
}

/// Score already-fetched oracle cycles against a chart.
///
/// Only the first `options.max_cycles` entries are looked at, placeholder
/// included. Blank or malformed stem-branch text is skipped.
pub fn luck_from_cycles(
    chart: Chart,
    cycles: &[RawLuckCycle],
    useful: &[Element],
    options: &LuckOptions,
) -> LuckAnalysis {
    let basis = NatalBasis::new(chart, useful, options.scoring);

    let mut groups: Vec<LuckGroup> = Vec::new();
    for (index, raw) in cycles.iter().enumerate().take(options.max_cycles) {
        let Some(gz) = parse_flow(&raw.ganzhi) else {
            trace!(index, start_year = raw.start_year, "skipping cycle without stem-branch");
            continue;
        };

        let mut cycle = analyze_cycle(&basis, index, gz, raw.start_year, raw.start_age);
        let years: Vec<_> = raw
            .years
            .iter()
            .filter_map(|y| match parse_flow(&y.ganzhi) {
                Some(year_gz) => Some(score_year(&basis, &cycle, y.year, y.age, year_gz)),
                None => {
                    trace!(year = y.year, "skipping year without stem-branch");
                    None
                }
            })
            .collect();
        summarize_years(&mut cycle, &years);

        debug!(
            index,
            ganzhi = %gz,
            years = years.len(),
            average_year_risk = cycle.average_year_risk,
            "luck cycle done"
        );
        groups.push(LuckGroup { cycle, years });
    }
    groups.sort_by_key(|g| g.cycle.start_year);

    let turning_points = turning_points(&groups);
    LuckAnalysis {
        groups,
        turning_points,
    }
}

/// Points where the cycle branch's usefulness flips, at the later cycle's
/// start year.
pub fn turning_points(groups: &[LuckGroup]) -> Vec<TurningPoint> {
    groups
        .windows(2)
        .filter(|w| w[0].cycle.branch_is_useful != w[1].cycle.branch_is_useful)
        .map(|w| TurningPoint {
            year: w[1].cycle.start_year,
            cycle_index: w[1].cycle.index,
            ganzhi: w[1].cycle.ganzhi(),
            from_useful: w[0].cycle.branch_is_useful,
            to_useful: w[1].cycle.branch_is_useful,
        })
        .collect()
}

fn parse_flow(text: &str) -> Option<GanZhi> {
    match GanZhi::parse_optional(text) {
        Ok(gz) => gz,
        Err(err) => {
            trace!(%err, "unparseable stem-branch");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazi_calendar::RawYear;

    fn raw_cycle(ganzhi: &str, start_year: i32, years: &[(&str, i32)]) -> RawLuckCycle {
        RawLuckCycle {
            ganzhi: ganzhi.to_string(),
            start_year,
            start_age: 1,
            years: years
                .iter()
                .enumerate()
                .map(|(i, &(gz, year))| RawYear {
                    ganzhi: gz.to_string(),
                    year,
                    age: i as i32 + 1,
                })
                .collect(),
        }
    }

    fn chart_b() -> Chart {
        Chart::parse("丙戌", "辛丑", "壬戌", "丙午").unwrap()
    }

    #[test]
    fn blank_and_malformed_entries_are_skipped() {
        let cycles = [
            raw_cycle("", 2007, &[("丁亥", 2007)]),
            raw_cycle("壬寅", 2009, &[("己丑", 2009), ("  ", 2010), ("甲丑", 2011)]),
            raw_cycle("xx", 2019, &[("己亥", 2019)]),
        ];
        let luck = luck_from_cycles(chart_b(), &cycles, &[], &LuckOptions::default());
        assert_eq!(luck.groups.len(), 1);
        assert_eq!(luck.groups[0].cycle.index, 1);
        assert_eq!(luck.groups[0].years.len(), 1);
        assert_eq!(luck.groups[0].years[0].year, 2009);
    }

    #[test]
    fn horizon_counts_placeholder() {
        let cycles = [
            raw_cycle("", 2007, &[]),
            raw_cycle("壬寅", 2009, &[]),
            raw_cycle("癸卯", 2019, &[]),
        ];
        let options = LuckOptions {
            max_cycles: 2,
            ..LuckOptions::default()
        };
        let luck = luck_from_cycles(chart_b(), &cycles, &[], &options);
        assert_eq!(luck.groups.len(), 1);
    }

    #[test]
    fn groups_sorted_and_turning_points() {
        let cycles = [
            raw_cycle("甲辰", 2029, &[]),
            raw_cycle("壬寅", 2009, &[]),
            raw_cycle("癸卯", 2019, &[]),
        ];
        let luck = luck_from_cycles(chart_b(), &cycles, &[Element::Earth], &LuckOptions::default());
        let starts: Vec<i32> = luck.groups.iter().map(|g| g.cycle.start_year).collect();
        assert_eq!(starts, [2009, 2019, 2029]);

        // 寅 and 卯 are wood, 辰 is earth.
        assert_eq!(luck.turning_points.len(), 1);
        let tp = luck.turning_points[0];
        assert_eq!(tp.year, 2029);
        assert!(!tp.from_useful && tp.to_useful);
    }
}
