//! Branch relation rules: clash/punishment exclusivity, self-punishment
//! dedup and stem-clash weighting.

use bazi_base::{
    Branch, Chart, Flow, GanZhi, PillarPosition, PunishmentKind, detect_branch_clash,
    detect_branch_punishments, detect_natal_clashes_and_punishments, detect_natal_stem_clashes,
    without_clash_overlap,
};

fn chart(y: &str, m: &str, d: &str, h: &str) -> Chart {
    Chart::parse(y, m, d, h).unwrap()
}

/// 寅 against 申 both clashes and punishes; only the clash counts.
#[test]
fn clash_wins_over_punishment() {
    let c = chart("庚申", "辛巳", "甲子", "丙寅");
    let flow = Flow::year(2022, GanZhi::parse("壬寅").unwrap());

    let clash = detect_branch_clash(&c, flow).unwrap();
    assert_eq!(clash.target_branch, Branch::Shen);

    let all = detect_branch_punishments(&c, flow);
    assert_eq!(all.len(), 2);
    let kept = without_clash_overlap(all, Some(&clash));
    assert_eq!(kept.len(), 1);
    assert_eq!(kept[0].target_branch, Branch::Si);
    assert_eq!(kept[0].target.pillar, PillarPosition::Month);
}

/// Natal pairs that clash are never also reported as punishments.
#[test]
fn natal_clash_pair_skips_punishment() {
    let natal = detect_natal_clashes_and_punishments(&chart("庚申", "辛巳", "甲子", "丙寅"));
    assert_eq!(natal.clashes.len(), 1);
    assert_eq!(natal.clashes[0].base_power_percent, 15.0);
    let targets: Vec<_> = natal.punishments.iter().map(|p| p.target.pillar).collect();
    assert_eq!(targets, vec![PillarPosition::Month, PillarPosition::Hour]);
    assert_eq!(natal.punishment_risk(), 10.0);
}

/// Three 午 branches still make one self-punishment.
#[test]
fn self_punishment_once_for_three_repeats() {
    let natal = detect_natal_clashes_and_punishments(&chart("甲午", "庚午", "丙午", "戊子"));
    let selfp: Vec<_> = natal
        .punishments
        .iter()
        .filter(|p| p.kind == PunishmentKind::SelfPunishment)
        .collect();
    assert_eq!(selfp.len(), 1);
    assert_eq!(selfp[0].target.pillar, PillarPosition::Month);
}

#[test]
fn self_punishment_once_for_four_repeats() {
    let natal = detect_natal_clashes_and_punishments(&chart("甲午", "庚午", "丙午", "甲午"));
    assert_eq!(natal.punishments.len(), 1);
    assert_eq!(natal.punishment_risk(), 5.0);
}

/// Different self-punishing branches are kept separately.
#[test]
fn self_punishment_per_branch() {
    let natal = detect_natal_clashes_and_punishments(&chart("甲辰", "庚辰", "癸酉", "辛酉"));
    assert_eq!(natal.punishments.len(), 2);
}

/// 庚子 hits 午 in year and day; only the day stem clash scores, doubled.
#[test]
fn day_pillar_stem_clash_doubles() {
    let c = chart("甲午", "壬申", "甲午", "丙寅");
    let ev = detect_branch_clash(&c, Flow::year(2020, GanZhi::parse("庚子").unwrap())).unwrap();
    assert_eq!(ev.base_power_percent, 20.0);
    assert_eq!(ev.tomb_bonus_percent, 0.0);
    assert_eq!(ev.stem_clash_hits.len(), 2);
    assert_eq!(ev.stem_clash_bonus_percent, 20.0);
    assert_eq!(ev.risk_percent, 40.0);
}

/// A flow without a stem never earns a stem-clash bonus.
#[test]
fn stemless_flow_has_no_stem_bonus() {
    let c = chart("甲午", "壬申", "甲午", "丙寅");
    let ev = detect_branch_clash(&c, Flow::natal(PillarPosition::Month, Branch::Zi)).unwrap();
    assert!(ev.stem_clash_hits.is_empty());
    assert_eq!(ev.risk_percent, 20.0);
}

#[test]
fn natal_stem_and_branch_clash() {
    let events = detect_natal_stem_clashes(&chart("甲子", "丙寅", "戊辰", "庚午"));
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].first, PillarPosition::Year);
    assert_eq!(events[0].second, PillarPosition::Hour);
    assert_eq!(events[0].risk_percent, 10.0);
}
