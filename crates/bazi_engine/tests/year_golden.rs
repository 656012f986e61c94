//! Golden year scores for reference charts, end to end through the
//! built-in solar-term calendar (UTC+8).

use bazi_base::{Chart, Element, GanZhi, Layer, PunishmentKind};
use bazi_calendar::{Sex, SolarTermCalendar};
use bazi_engine::{
    CompleteAnalysis, Event, LuckOptions, NatalBasis, ScoringOptions, YearLabel, YearRecord,
    analyze_complete, analyze_cycle, score_year,
};
use chrono::{NaiveDate, NaiveDateTime};

fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

fn complete(birth: NaiveDateTime) -> CompleteAnalysis {
    analyze_complete(
        &SolarTermCalendar::default(),
        birth,
        Sex::Male,
        &LuckOptions::default(),
    )
    .unwrap()
}

fn year_of(analysis: &CompleteAnalysis, year: i32) -> &YearRecord {
    analysis.luck.year(year).unwrap()
}

fn risk_of(year: &YearRecord, kind: &str) -> f64 {
    year.events_of(kind).map(Event::risk_percent).sum()
}

/// 1981-09-15 10:00 falls on a 丙申 day: 酉酉 in year and month is one
/// self-punishment at the flat rate, and the 申 day punishes the 巳 hour.
#[test]
fn scenario_a_1981_natal_punishments() {
    let a = complete(at(1981, 9, 15, 10));
    assert_eq!(a.natal.chart.to_string(), "辛酉 丁酉 丙申 癸巳");

    let punishments = &a.natal.conflicts.punishments;
    let self_punishments: Vec<_> = punishments
        .iter()
        .filter(|p| p.kind == PunishmentKind::SelfPunishment)
        .collect();
    assert_eq!(self_punishments.len(), 1);
    assert_eq!(self_punishments[0].risk_percent, 5.0);

    let normal: Vec<_> = punishments
        .iter()
        .filter(|p| p.kind == PunishmentKind::Normal)
        .collect();
    assert_eq!(normal.len(), 1);
    assert_eq!(normal[0].flow.branch.to_char(), '申');
    assert_eq!(normal[0].target_branch.to_char(), '巳');
    assert_eq!(a.natal.punishment_risk_percent, 10.0);
}

/// 2005-09-20 10:00: 乙酉 乙酉 丁未 乙巳, luck cycles run backward.
#[test]
fn scenario_a_cycles() {
    let a = complete(at(2005, 9, 20, 10));
    assert_eq!(a.natal.chart.to_string(), "乙酉 乙酉 丁未 乙巳");
    let cycles: Vec<(String, i32, i32)> = a
        .luck
        .groups
        .iter()
        .take(3)
        .map(|g| (g.cycle.ganzhi().to_string(), g.cycle.start_year, g.cycle.start_age))
        .collect();
    assert_eq!(
        cycles,
        [
            ("甲申".to_string(), 2009, 5),
            ("癸未".to_string(), 2019, 15),
            ("壬午".to_string(), 2029, 25),
        ]
    );
}

/// 辛丑 in the 癸未 cycle: clash on the day 未 (10 + tomb 5 + day stem 20),
/// cycle clash (10 + tomb 5), 丑 inside 巳酉丑 for +15.
#[test]
fn scenario_a_2021() {
    let a = complete(at(2005, 9, 20, 10));
    let y = year_of(&a, 2021);
    assert_eq!(y.age, 17);
    assert_eq!(y.ganzhi(), GanZhi::parse("辛丑").unwrap());

    assert_eq!(y.clashes_vs_natal.len(), 1);
    let clash = &y.clashes_vs_natal[0];
    assert_eq!(clash.base_power_percent, 10.0);
    assert_eq!(clash.tomb_bonus_percent, 5.0);
    assert_eq!(clash.stem_clash_bonus_percent, 20.0);
    assert_eq!(clash.risk_percent, 35.0);

    // 丑 punishes 未 as well, but the clash wins.
    assert!(y.punishments_vs_natal.is_empty());

    assert_eq!(y.clashes_vs_cycle.len(), 1);
    assert_eq!(y.clashes_vs_cycle[0].risk_percent, 15.0);
    assert_eq!(risk_of(y, "group_clash_bonus"), 15.0);
    assert_eq!(risk_of(y, "line_fortune"), 0.0);

    assert_eq!(y.stem_side_risk, 0.0);
    assert_eq!(y.total_risk, 65.0);
    assert_eq!(y.year_label, YearLabel::InauspiciousAllYear);
    assert!(y.risk_management);
    assert!(y.half_labels.is_none());
}

/// 癸丑 in the 壬午 cycle: 丑 sits in 巳酉丑 and 未 in 巳午未.
#[test]
fn scenario_a_2033_both_sides_grouped() {
    let a = complete(at(2005, 9, 20, 10));
    let y = year_of(&a, 2033);
    assert_eq!(y.clashes_vs_natal[0].risk_percent, 35.0);
    assert!(y.clashes_vs_cycle.is_empty());
    assert_eq!(risk_of(y, "group_clash_bonus"), 35.0);
    assert_eq!(y.total_risk, 70.0);
}

/// 2007-01-28 12:00 male: 辛丑 at age 15 in the 癸卯 cycle.
#[test]
fn scenario_b_2021() {
    let b = complete(at(2007, 1, 28, 12));
    assert_eq!(b.natal.chart.to_string(), "丙戌 辛丑 壬戌 丙午");
    assert_eq!(b.natal.punishment_risk_percent, 12.0);

    let y = year_of(&b, 2021);
    assert_eq!(y.age, 15);
    assert!(y.clashes_vs_natal.is_empty());
    assert!(y.clashes_vs_cycle.is_empty());

    // 丑 punishes both 戌 pillars.
    assert_eq!(y.punishments_vs_natal.len(), 2);
    assert!(y.punishments_vs_natal.iter().all(|p| p.kind == PunishmentKind::Tomb));
    assert_eq!(risk_of(y, "punishment"), 12.0);

    // Both natal tomb punishments are woken at half strength.
    let woken = y
        .events_of("static_punishment_activation")
        .find_map(|e| match e {
            Event::StaticPunishmentActivation(s) => Some(s),
            _ => None,
        })
        .unwrap();
    assert_eq!(woken.natal_punishments.len(), 2);
    assert!(woken.cycle_punishments.is_empty());
    assert_eq!(woken.risk_percent, 6.0);

    // Year 丑 (正官) against cycle 卯 (伤官), repeating the cycle's 卯/丑 pair.
    assert_eq!(risk_of(y, "pattern"), 15.0);
    assert_eq!(risk_of(y, "pattern_static_activation"), 10.0);

    assert_eq!(risk_of(y, "line_fortune"), 0.0);
    assert_eq!(y.branch_side_risk, 43.0);
    assert_eq!(y.total_risk, 43.0);
}

/// Two qualifying clash pairs in one year still earn a single bonus.
#[test]
fn group_bonus_applied_once() {
    let chart = Chart::parse("丁巳", "丙午", "丁酉", "乙未").unwrap();
    let basis = NatalBasis::new(chart, &[], ScoringOptions::default());
    let cycle = analyze_cycle(&basis, 3, GanZhi::parse("辛未").unwrap(), 2030, 24);
    let y = score_year(&basis, &cycle, 2033, 27, GanZhi::parse("癸丑").unwrap());

    // Year vs natal 未 and year vs cycle 未 both have both sides grouped.
    assert_eq!(y.clashes_vs_natal.len(), 1);
    assert_eq!(y.clashes_vs_cycle.len(), 1);
    assert_eq!(y.events_of("group_clash_bonus").count(), 1);
    assert_eq!(risk_of(&y, "group_clash_bonus"), 35.0);
    assert_eq!(y.total_risk, 20.0 + 15.0 + 35.0);
}

/// With the discount on, a pattern whose 伤官 carries a useful element
/// weighs 10 instead of 15.
#[test]
fn useful_pattern_discount() {
    let chart = Chart::parse("丙戌", "辛丑", "壬戌", "丙午").unwrap();
    let cycle_gz = GanZhi::parse("癸卯").unwrap();
    let year_gz = GanZhi::parse("辛丑").unwrap();

    let plain = NatalBasis::new(chart, &[Element::Wood], ScoringOptions::default());
    let cycle = analyze_cycle(&plain, 2, cycle_gz, 2019, 13);
    assert_eq!(score_year(&plain, &cycle, 2021, 15, year_gz).total_risk, 43.0);

    let discounted = NatalBasis::new(
        chart,
        &[Element::Wood],
        ScoringOptions {
            useful_pattern_discount: true,
        },
    );
    let cycle = analyze_cycle(&discounted, 2, cycle_gz, 2019, 13);
    let y = score_year(&discounted, &cycle, 2021, 15, year_gz);
    assert_eq!(risk_of(&y, "pattern"), 10.0);
    assert_eq!(y.total_risk, 38.0);
}

/// Sides add up to the total and harmonies add nothing.
#[test]
fn sides_sum_to_total() {
    let a = complete(at(2005, 9, 20, 10));
    for y in a.luck.groups.iter().flat_map(|g| g.years.iter()) {
        assert_eq!(y.stem_side_risk + y.branch_side_risk, y.total_risk);
        let stem: f64 = y
            .all_events
            .iter()
            .filter(|e| e.side() == Layer::Stem)
            .map(Event::risk_percent)
            .sum();
        assert_eq!(stem, y.stem_side_risk);
        assert!(
            y.harmonies_vs_natal
                .iter()
                .all(|h| h.risk_percent == 0.0)
        );
    }
}
