//! Properties of the luck timeline that hold for any birth instant.

use bazi_base::Role;
use bazi_calendar::{CalendarError, CalendarOracle, RawLuckCycle, RawPillars, Sex, SolarTermCalendar};
use bazi_engine::{EngineError, LuckOptions, analyze_complete, analyze_luck};
use chrono::{NaiveDate, NaiveDateTime};

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

/// Same input, byte-identical output.
#[test]
fn analysis_is_idempotent() {
    let cal = SolarTermCalendar::default();
    let options = LuckOptions::default();
    let birth = at(2007, 1, 28, 12);

    let first = analyze_complete(&cal, birth, Sex::Female, &options).unwrap();
    let second = analyze_complete(&cal, birth, Sex::Female, &options).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

/// The placeholder counts toward the horizon and never becomes a group.
#[test]
fn horizon_and_placeholder() {
    let cal = SolarTermCalendar::default();
    let birth = at(2005, 9, 20, 10);
    let options = LuckOptions {
        max_cycles: 4,
        ..LuckOptions::default()
    };
    let luck = analyze_luck(&cal, birth, Sex::Male, &[], &options).unwrap();
    assert_eq!(luck.groups.len(), 3);
    assert!(luck.groups.iter().all(|g| g.cycle.index >= 1));
    assert!(luck.groups.iter().all(|g| g.years.len() == 10));
    assert!(
        luck.groups
            .windows(2)
            .all(|w| w[0].cycle.start_year < w[1].cycle.start_year)
    );
}

/// Harmony events are explanatory and never move the totals.
#[test]
fn harmonies_never_score() {
    let cal = SolarTermCalendar::default();
    let luck = analyze_luck(
        &cal,
        at(2005, 9, 20, 10),
        Sex::Male,
        &[],
        &LuckOptions::default(),
    )
    .unwrap();
    for year in luck.groups.iter().flat_map(|g| g.years.iter()) {
        let scored: f64 = year
            .all_events
            .iter()
            .filter(|e| e.kind() != "harmony")
            .map(|e| e.risk_percent())
            .sum();
        assert_eq!(scored, year.total_risk);
        assert!(
            year.events_of("harmony")
                .all(|e| e.role() == Role::Explain && e.risk_percent() == 0.0)
        );
    }
}

/// Half labels only appear below 25 %; 40 % and up flags risk management.
#[test]
fn labels_follow_totals() {
    let cal = SolarTermCalendar::default();
    let analysis = analyze_complete(&cal, at(2007, 1, 28, 12), Sex::Male, &LuckOptions::default())
        .unwrap();
    for year in analysis.luck.groups.iter().flat_map(|g| g.years.iter()) {
        assert_eq!(year.half_labels.is_some(), year.total_risk < 25.0);
        assert_eq!(year.risk_management, year.total_risk >= 40.0);
        let json = serde_json::to_value(year).unwrap();
        assert_eq!(json.get("half_labels").is_some(), year.total_risk < 25.0);
    }
}

struct BrokenOracle;

impl CalendarOracle for BrokenOracle {
    fn natal_pillars(&self, _birth: NaiveDateTime) -> Result<RawPillars, CalendarError> {
        Ok(RawPillars {
            year: "甲丑".to_string(),
            month: "丙寅".to_string(),
            day: "戊辰".to_string(),
            hour: "庚午".to_string(),
        })
    }

    fn luck_cycles(
        &self,
        _birth: NaiveDateTime,
        _sex: Sex,
    ) -> Result<Vec<RawLuckCycle>, CalendarError> {
        Err(CalendarError::DateOverflow)
    }
}

/// Invalid natal text from an oracle is a chart error.
#[test]
fn oracle_errors_propagate() {
    let err = analyze_complete(&BrokenOracle, at(2000, 1, 1, 0), Sex::Male, &LuckOptions::default())
        .unwrap_err();
    assert!(matches!(err, EngineError::Chart(_)));
}
