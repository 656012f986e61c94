//! Year risk scoring.
//!
//! A year is scored against the natal chart and its luck cycle in a fixed
//! order: clash, punishments, cycle-vs-year clash, static activations,
//! patterns, group-clash bonus, then line fortune on top of the base
//! events. Each event's risk lands on the stem half or the branch half;
//! the year total is the uncapped sum.

use bazi_base::tables::{
    CLASH_RISK_CAP, CYCLE_YEAR_CLASH_BASE, CYCLE_YEAR_STEM_CLASH_BONUS,
    GROUP_CLASH_BONUS_BOTH_SIDES, GROUP_CLASH_BONUS_ONE_SIDE, LINE_FORTUNE_BONUS,
    LINE_FORTUNE_THRESHOLD, PATTERN_CLASH_OVERLAP_BONUS, STATIC_ACTIVATION_FACTOR,
    STATIC_PATTERN_RISK, TOMB_CLASH_BONUS, is_clash, is_tomb_clash, punishment_kind,
};
use bazi_base::{
    Branch, Chart, ClashEvent, Element, Flow, FlowSource, GanZhi, Layer, PatternEvent, PatternGroup,
    PatternType, PillarPosition, PositionSource, PunishmentEvent, Role, complete_groups,
    detect_branch_clash, detect_branch_punishments, detect_flow_harmonies,
    detect_natal_clashes_and_punishments, detect_natal_patterns, detect_year_patterns,
    element::mutually_overcoming, without_clash_overlap,
};
use tracing::debug;

use crate::event::{
    ActivatedPair, ClashPartner, ClashTrigger, CycleYearClashEvent, Event, GroupClashBonusEvent,
    LineFortuneEvent, NatalClashActivationEvent, PatternActivationEvent,
    StaticClashActivationEvent, StaticPunishmentActivationEvent, StructureSource, side_risk,
};
use crate::labels::{HalfLabels, half_label, year_verdict};
use crate::luck_types::{CycleRecord, ScoringOptions, YearRecord};

/// Year risk at or below which a year with a useful element is good.
pub const GOOD_YEAR_THRESHOLD: f64 = 15.0;

const PATTERN_TYPES: [PatternType; 2] = [PatternType::HurtOfficer, PatternType::PianyinEatgod];
const LAYERS: [Layer; 2] = [Layer::Stem, Layer::Branch];

// ---------------------------------------------------------------------------
// Natal basis
// ---------------------------------------------------------------------------

/// Natal facts shared by every cycle and year of one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct NatalBasis {
    pub chart: Chart,
    pub useful: Vec<Element>,
    pub natal_clashes: Vec<ClashEvent>,
    pub natal_punishments: Vec<PunishmentEvent>,
    pub natal_patterns: Vec<PatternGroup>,
    pub options: ScoringOptions,
}

impl NatalBasis {
    pub fn new(chart: Chart, useful: &[Element], options: ScoringOptions) -> Self {
        let conflicts = detect_natal_clashes_and_punishments(&chart);
        Self {
            chart,
            useful: useful.to_vec(),
            natal_clashes: conflicts.clashes,
            natal_punishments: conflicts.punishments,
            natal_patterns: detect_natal_patterns(&chart),
            options,
        }
    }

    pub fn is_useful(&self, element: Element) -> bool {
        self.useful.contains(&element)
    }
}

// ---------------------------------------------------------------------------
// Year pipeline
// ---------------------------------------------------------------------------

/// Score one year of a luck cycle.
pub fn score_year(
    basis: &NatalBasis,
    cycle: &CycleRecord,
    year: i32,
    age: i32,
    gz: GanZhi,
) -> YearRecord {
    let chart = &basis.chart;
    let flow = Flow::year(year, gz);
    let cycle_gz = cycle.ganzhi();

    let mut clash = detect_branch_clash(chart, flow);
    let year_punishments = detect_branch_punishments(chart, flow);
    let cycle_clash = detect_cycle_year_clash(cycle_gz, gz);

    let static_clash =
        static_clash_activation(cycle.clash(), clash.as_ref(), cycle_clash.is_some());
    let static_punishment =
        static_punishment_activation(basis, cycle, gz.branch, &year_punishments);
    let natal_clash = natal_clash_activation(basis, gz.branch);

    let useful = basis
        .options
        .useful_pattern_discount
        .then_some(basis.useful.as_slice());
    let mut patterns = detect_year_patterns(chart, Some(cycle_gz), gz, useful);
    if let Some(c) = clash.as_mut() {
        patterns.retain(|p| {
            if overlaps_clash(p, PositionSource::Year, c) {
                c.add_pattern_bonus(PATTERN_CLASH_OVERLAP_BONUS);
                false
            } else {
                true
            }
        });
    }

    let punishments = without_clash_overlap(year_punishments, clash.as_ref());
    let activations = pattern_activations(basis, cycle, &patterns);
    let group_bonus =
        group_clash_bonus(chart, cycle_gz.branch, gz.branch, clash.as_ref(), cycle_clash.as_ref());
    let harmonies = detect_flow_harmonies(chart, flow);

    let mut events: Vec<Event> = Vec::new();
    events.extend(clash.iter().cloned().map(Event::BranchClash));
    events.extend(cycle_clash.map(Event::CycleYearClash));
    events.extend(punishments.iter().cloned().map(Event::Punishment));
    events.extend(patterns.into_iter().map(Event::Pattern));
    events.extend(activations.into_iter().map(Event::PatternStaticActivation));
    events.extend(static_clash.map(Event::StaticClashActivation));
    events.extend(static_punishment.map(Event::StaticPunishmentActivation));
    events.extend(natal_clash.into_iter().map(Event::NatalClashActivation));
    events.extend(group_bonus.map(Event::GroupClashBonus));
    if let Some(lf) = line_fortune(age, &events) {
        events.push(Event::LineFortune(lf));
    }
    events.extend(harmonies.iter().cloned().map(Event::Harmony));

    let stem_side_risk = side_risk(&events, Layer::Stem);
    let branch_side_risk = side_risk(&events, Layer::Branch);
    let total_risk = stem_side_risk + branch_side_risk;

    let stem_is_useful = basis.is_useful(gz.stem.element());
    let branch_is_useful = basis.is_useful(gz.branch.element());
    let verdict = year_verdict(
        total_risk,
        HalfLabels {
            first_half: half_label(stem_side_risk, stem_is_useful),
            second_half: half_label(branch_side_risk, branch_is_useful),
        },
    );

    debug!(
        year,
        age,
        ganzhi = %gz,
        stem_side_risk,
        branch_side_risk,
        total_risk,
        events = events.len(),
        "scored year"
    );

    YearRecord {
        year,
        age,
        stem: gz.stem,
        branch: gz.branch,
        stem_element: gz.stem.element(),
        branch_element: gz.branch.element(),
        stem_is_useful,
        branch_is_useful,
        stem_side_risk,
        branch_side_risk,
        total_risk,
        half_labels: verdict.half_labels,
        year_label: verdict.label,
        risk_management: verdict.risk_management,
        is_good: (stem_is_useful || branch_is_useful) && total_risk <= GOOD_YEAR_THRESHOLD,
        all_events: events,
        clashes_vs_natal: clash.into_iter().collect(),
        clashes_vs_cycle: cycle_clash.into_iter().collect(),
        punishments_vs_natal: punishments,
        harmonies_vs_natal: harmonies,
    }
}

/// Whether a branch pattern of `flow` duplicates the flow's clash: its
/// other position is a natal pillar the clash hits.
pub(crate) fn overlaps_clash(
    pattern: &PatternEvent,
    flow: PositionSource,
    clash: &ClashEvent,
) -> bool {
    pattern.layer == Layer::Branch
        && pattern
            .pair
            .other_than(flow)
            .and_then(|o| o.natal_pillar())
            .is_some_and(|p| clash.hits(p))
}

// ---------------------------------------------------------------------------
// Cycle vs year
// ---------------------------------------------------------------------------

/// The year branch clashing the cycle branch: 10, +5 for a tomb pair, +10
/// when the two stems overcome one another.
pub fn detect_cycle_year_clash(cycle: GanZhi, year: GanZhi) -> Option<CycleYearClashEvent> {
    if !is_clash(cycle.branch, year.branch) {
        return None;
    }
    let tomb_bonus_percent = if is_tomb_clash(cycle.branch, year.branch) {
        TOMB_CLASH_BONUS
    } else {
        0.0
    };
    let stem_clash_bonus_percent =
        if mutually_overcoming(cycle.stem.element(), year.stem.element()) {
            CYCLE_YEAR_STEM_CLASH_BONUS
        } else {
            0.0
        };
    let risk_percent = (CYCLE_YEAR_CLASH_BASE + tomb_bonus_percent + stem_clash_bonus_percent)
        .min(CLASH_RISK_CAP);

    Some(CycleYearClashEvent {
        cycle_stem: cycle.stem,
        cycle_branch: cycle.branch,
        year_stem: year.stem,
        year_branch: year.branch,
        base_power_percent: CYCLE_YEAR_CLASH_BASE,
        tomb_bonus_percent,
        stem_clash_bonus_percent,
        risk_percent,
        role: Role::Base,
    })
}

// ---------------------------------------------------------------------------
// Static activation
// ---------------------------------------------------------------------------

/// The cycle's own clash, woken when the year clashes the same target or
/// clashes the cycle.
pub fn static_clash_activation(
    cycle_clash: Option<&ClashEvent>,
    year_clash: Option<&ClashEvent>,
    year_clashes_cycle: bool,
) -> Option<StaticClashActivationEvent> {
    let cc = cycle_clash?;
    let trigger = if year_clash.is_some_and(|y| y.target_branch == cc.target_branch) {
        ClashTrigger::SameTarget
    } else if year_clashes_cycle {
        ClashTrigger::YearClashesCycle
    } else {
        return None;
    };

    let base_power_percent: f64 = cc
        .targets
        .iter()
        .map(|t| t.position_weight + cc.tomb_bonus_percent)
        .sum();
    let risk_percent =
        (base_power_percent + cc.stem_clash_bonus_percent) * STATIC_ACTIVATION_FACTOR;

    Some(StaticClashActivationEvent {
        cycle_branch: cc.flow.branch,
        target_branch: cc.target_branch,
        targets: cc.targets.iter().map(|t| t.pillar).collect(),
        trigger,
        base_power_percent,
        stem_clash_bonus_percent: cc.stem_clash_bonus_percent,
        factor: STATIC_ACTIVATION_FACTOR,
        risk_percent,
        role: Role::Activation,
    })
}

/// Cycle and natal punishments woken by the year.
///
/// A cycle punishment wakes when the year punishes the same branch, or when
/// the year punishes the cycle branch itself (all of them then, even when
/// the two branches also clash). A natal
/// punishment wakes when the year branch is one side of it and the year
/// also punishes the other side.
pub fn static_punishment_activation(
    basis: &NatalBasis,
    cycle: &CycleRecord,
    year_branch: Branch,
    year_punishments: &[PunishmentEvent],
) -> Option<StaticPunishmentActivationEvent> {
    let targets: Vec<Branch> = year_punishments.iter().map(|p| p.target_branch).collect();
    let hits_cycle = punishment_kind(year_branch, cycle.branch).is_some();

    let cycle_punishments: Vec<PunishmentEvent> = cycle
        .punishments
        .iter()
        .filter(|p| hits_cycle || targets.contains(&p.target_branch))
        .cloned()
        .collect();
    let natal_punishments: Vec<PunishmentEvent> = basis
        .natal_punishments
        .iter()
        .filter(|p| {
            (year_branch == p.flow.branch && targets.contains(&p.target_branch))
                || (year_branch == p.target_branch && targets.contains(&p.flow.branch))
        })
        .cloned()
        .collect();
    if cycle_punishments.is_empty() && natal_punishments.is_empty() {
        return None;
    }

    let risk_percent = cycle_punishments
        .iter()
        .chain(&natal_punishments)
        .map(|p| p.risk_percent * STATIC_ACTIVATION_FACTOR)
        .sum();

    Some(StaticPunishmentActivationEvent {
        cycle_punishments,
        natal_punishments,
        factor: STATIC_ACTIVATION_FACTOR,
        risk_percent,
        role: Role::Activation,
    })
}

/// Clashes inside the natal chart woken by a year branch equal to one of
/// their two sides, each at half its natal risk.
pub fn natal_clash_activation(
    basis: &NatalBasis,
    year_branch: Branch,
) -> Vec<NatalClashActivationEvent> {
    basis
        .natal_clashes
        .iter()
        .filter(|c| year_branch == c.flow.branch || year_branch == c.target_branch)
        .map(|c| {
            let source = match c.flow.source {
                FlowSource::Natal { pillar } => Some(pillar),
                _ => None,
            };
            NatalClashActivationEvent {
                year_branch,
                natal_branch: c.flow.branch,
                target_branch: c.target_branch,
                pillars: source
                    .into_iter()
                    .chain(c.targets.iter().map(|t| t.pillar))
                    .collect(),
                natal_risk_percent: c.risk_percent,
                factor: STATIC_ACTIVATION_FACTOR,
                risk_percent: c.risk_percent * STATIC_ACTIVATION_FACTOR,
                role: Role::Activation,
            }
        })
        .collect()
}

/// Natal and cycle pattern pairs repeated by a year pattern of the same
/// type and layer: 10 % per pair, one event per (type, layer).
pub fn pattern_activations(
    basis: &NatalBasis,
    cycle: &CycleRecord,
    year_patterns: &[PatternEvent],
) -> Vec<PatternActivationEvent> {
    let mut out = Vec::new();
    for pattern in PATTERN_TYPES {
        for layer in LAYERS {
            let keys: Vec<[char; 2]> = year_patterns
                .iter()
                .filter(|e| e.pattern == pattern && e.layer == layer)
                .map(|e| e.pair.characters())
                .collect();
            if keys.is_empty() {
                continue;
            }

            let sources = [
                (StructureSource::Natal, &basis.natal_patterns),
                (StructureSource::Cycle, &cycle.pattern_groups),
            ];
            let mut activated = Vec::new();
            for (source, groups) in sources {
                let pairs = groups
                    .iter()
                    .filter(|g| g.pattern == pattern)
                    .flat_map(|g| &g.pairs);
                for pair in pairs {
                    if pair.layer() == layer && keys.contains(&pair.characters()) {
                        activated.push(ActivatedPair {
                            source,
                            pair: *pair,
                        });
                    }
                }
            }
            if activated.is_empty() {
                continue;
            }

            out.push(PatternActivationEvent {
                pattern,
                layer,
                risk_percent: STATIC_PATTERN_RISK * activated.len() as f64,
                activated,
                role: Role::Activation,
            });
        }
    }
    out
}

// ---------------------------------------------------------------------------
// Group-clash bonus
// ---------------------------------------------------------------------------

/// Bonus for a year clash whose sides belong to complete groups formed by
/// natal, cycle and year branches.
///
/// Each clash pair (year vs natal target, year vs cycle) is tiered: one side
/// in a group +15, both +35. Only the highest tier is applied, once.
pub fn group_clash_bonus(
    chart: &Chart,
    cycle_branch: Branch,
    year_branch: Branch,
    year_clash: Option<&ClashEvent>,
    cycle_clash: Option<&CycleYearClashEvent>,
) -> Option<GroupClashBonusEvent> {
    let mut pairs: Vec<(Branch, ClashPartner)> = Vec::new();
    if let Some(c) = year_clash {
        let pillars = c.targets.iter().map(|t| t.pillar).collect();
        pairs.push((c.target_branch, ClashPartner::Natal { pillars }));
    }
    if cycle_clash.is_some() {
        pairs.push((cycle_branch, ClashPartner::Cycle));
    }
    if pairs.is_empty() {
        return None;
    }

    let groups = complete_groups(chart, Some(cycle_branch), Some(year_branch));
    let in_group = |b: Branch| groups.iter().any(|g| g.contains(b));
    let year_in_group = in_group(year_branch);

    let (risk_percent, partner_branch, partner, partner_in_group) = pairs
        .into_iter()
        .filter_map(|(b, partner)| {
            let partner_in_group = in_group(b);
            let bonus = match (year_in_group, partner_in_group) {
                (true, true) => GROUP_CLASH_BONUS_BOTH_SIDES,
                (true, false) | (false, true) => GROUP_CLASH_BONUS_ONE_SIDE,
                (false, false) => return None,
            };
            Some((bonus, b, partner, partner_in_group))
        })
        .reduce(|best, next| if next.0 > best.0 { next } else { best })?;

    let groups = groups
        .into_iter()
        .filter(|g| g.contains(year_branch) || g.contains(partner_branch))
        .collect();

    Some(GroupClashBonusEvent {
        year_branch,
        partner_branch,
        partner,
        year_in_group,
        partner_in_group,
        groups,
        risk_percent,
        role: Role::Bonus,
    })
}

// ---------------------------------------------------------------------------
// Line fortune
// ---------------------------------------------------------------------------

/// Palace ruling a virtual age: year to 16, month to 32, day to 48, then hour.
pub const fn active_palace(age: i32) -> PillarPosition {
    match age {
        ..=16 => PillarPosition::Year,
        17..=32 => PillarPosition::Month,
        33..=48 => PillarPosition::Day,
        _ => PillarPosition::Hour,
    }
}

/// +6 once when a base event of at least 10 % hits the active palace.
///
/// The first qualifying event in `events` decides the side.
pub fn line_fortune(age: i32, events: &[Event]) -> Option<LineFortuneEvent> {
    let pillar = active_palace(age);
    let trigger = events.iter().find(|e| {
        e.role() == Role::Base && e.risk_percent() >= LINE_FORTUNE_THRESHOLD && e.hits(pillar)
    })?;

    Some(LineFortuneEvent {
        age,
        pillar,
        palace: pillar.palace(),
        trigger: trigger.kind(),
        trigger_risk_percent: trigger.risk_percent(),
        side: trigger.side(),
        risk_percent: LINE_FORTUNE_BONUS,
        role: Role::Bonus,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazi_base::{PunishmentKind, detect_branch_clash};

    use crate::cycle::analyze_cycle;

    fn gz(s: &str) -> GanZhi {
        GanZhi::parse(s).unwrap()
    }

    fn chart_a() -> Chart {
        Chart::parse("乙酉", "乙酉", "丁未", "乙巳").unwrap()
    }

    #[test]
    fn palace_by_age() {
        assert_eq!(active_palace(1), PillarPosition::Year);
        assert_eq!(active_palace(16), PillarPosition::Year);
        assert_eq!(active_palace(17), PillarPosition::Month);
        assert_eq!(active_palace(32), PillarPosition::Month);
        assert_eq!(active_palace(33), PillarPosition::Day);
        assert_eq!(active_palace(48), PillarPosition::Day);
        assert_eq!(active_palace(49), PillarPosition::Hour);
    }

    /// 癸卯 clashes both 酉 pillars of chart A (year and month).
    fn month_clash(risk: f64) -> Event {
        let mut c = detect_branch_clash(&chart_a(), Flow::year(2023, gz("癸卯"))).unwrap();
        assert!(c.hits(PillarPosition::Month));
        c.risk_percent = risk;
        Event::BranchClash(c)
    }

    #[test]
    fn line_fortune_threshold_is_inclusive() {
        assert!(line_fortune(20, &[month_clash(9.9)]).is_none());

        let lf = line_fortune(20, &[month_clash(10.0)]).unwrap();
        assert_eq!(lf.pillar, PillarPosition::Month);
        assert_eq!(lf.risk_percent, LINE_FORTUNE_BONUS);
        assert_eq!(lf.side, Layer::Branch);
        assert_eq!(lf.trigger, "branch_clash");
    }

    #[test]
    fn line_fortune_needs_active_palace() {
        // Age 40 rules the day pillar, which 卯 does not hit.
        assert!(line_fortune(40, &[month_clash(50.0)]).is_none());
    }

    #[test]
    fn line_fortune_applies_once() {
        let events = [month_clash(10.0), month_clash(30.0)];
        let lf = line_fortune(20, &events).unwrap();
        assert_eq!(lf.trigger_risk_percent, 10.0);
    }

    #[test]
    fn cycle_year_clash_tiers() {
        // 未 vs 丑: tomb pair; 癸 water and 辛 metal do not overcome.
        let c = detect_cycle_year_clash(gz("癸未"), gz("辛丑")).unwrap();
        assert_eq!(c.tomb_bonus_percent, TOMB_CLASH_BONUS);
        assert_eq!(c.stem_clash_bonus_percent, 0.0);
        assert_eq!(c.risk_percent, 15.0);

        // 午 vs 子 with 丙 fire against 壬 water.
        let c = detect_cycle_year_clash(gz("丙午"), gz("壬子")).unwrap();
        assert_eq!(c.risk_percent, 20.0);

        assert!(detect_cycle_year_clash(gz("甲子"), gz("乙丑")).is_none());
    }

    #[test]
    fn static_clash_needs_cycle_clash() {
        let chart = chart_a();
        let year = detect_branch_clash(&chart, Flow::year(2021, gz("辛丑")));
        assert!(static_clash_activation(None, year.as_ref(), true).is_none());
    }

    #[test]
    fn static_clash_same_target_is_half() {
        let chart = chart_a();
        // Cycle 己卯 and year 癸卯 both clash the 酉 pair.
        let cycle = detect_branch_clash(&chart, Flow::cycle(2, gz("己卯"))).unwrap();
        let year = detect_branch_clash(&chart, Flow::year(2023, gz("癸卯")));
        let ev = static_clash_activation(Some(&cycle), year.as_ref(), false).unwrap();
        assert_eq!(ev.trigger, ClashTrigger::SameTarget);
        // (10 + 35) weights; 己 earth vs 乙 wood overcomes on the month only.
        assert_eq!(ev.base_power_percent, 45.0);
        assert_eq!(ev.stem_clash_bonus_percent, 10.0);
        assert_eq!(ev.risk_percent, 27.5);
        assert_eq!(ev.role, Role::Activation);
    }

    #[test]
    fn group_bonus_needs_a_group() {
        // 丁巳 丙午 丁酉 乙未 with year 丁丑: 丑 clashes 未, cycle 甲寅 adds nothing.
        let chart = Chart::parse("丁巳", "丙午", "丁酉", "乙未").unwrap();
        let clash = detect_branch_clash(&chart, Flow::year(2000, gz("丁丑"))).unwrap();
        let ev = group_clash_bonus(&chart, Branch::Yin, Branch::Chou, Some(&clash), None).unwrap();
        // 巳酉丑 holds 丑, 巳午未 holds 未.
        assert!(ev.year_in_group && ev.partner_in_group);
        assert_eq!(ev.risk_percent, GROUP_CLASH_BONUS_BOTH_SIDES);

        let plain = Chart::parse("甲子", "甲子", "甲子", "甲子").unwrap();
        let clash = detect_branch_clash(&plain, Flow::year(2000, gz("庚午"))).unwrap();
        assert!(group_clash_bonus(&plain, Branch::Mao, Branch::Wu, Some(&clash), None).is_none());
    }

    #[test]
    fn year_clashing_cycle_wakes_cycle_punishments() {
        // Cycle 甲寅 punishes the 巳 hour; year 庚申 both clashes and punishes 寅.
        let chart = Chart::parse("甲子", "丙子", "戊辰", "己巳").unwrap();
        let basis = NatalBasis::new(chart, &[], ScoringOptions::default());
        let cycle = analyze_cycle(&basis, 1, gz("甲寅"), 2010, 5);
        assert_eq!(cycle.punishments.len(), 1);

        let ev = static_punishment_activation(&basis, &cycle, Branch::Shen, &[]).unwrap();
        assert_eq!(ev.cycle_punishments.len(), 1);
        assert!(ev.natal_punishments.is_empty());
        assert_eq!(ev.risk_percent, 2.5);
    }

    /// 甲子 庚午 丙寅 戊戌: the 子 year pillar clashes the 午 month (35 %).
    fn natal_clash_basis() -> NatalBasis {
        let chart = Chart::parse("甲子", "庚午", "丙寅", "戊戌").unwrap();
        NatalBasis::new(chart, &[], ScoringOptions::default())
    }

    #[test]
    fn natal_clash_woken_by_either_side() {
        let basis = natal_clash_basis();
        assert_eq!(basis.natal_clashes.len(), 1);

        for branch in [Branch::Zi, Branch::Wu] {
            let woken = natal_clash_activation(&basis, branch);
            assert_eq!(woken.len(), 1);
            let ev = &woken[0];
            assert_eq!(ev.pillars, [PillarPosition::Year, PillarPosition::Month]);
            assert_eq!(ev.natal_risk_percent, 35.0);
            assert_eq!(ev.risk_percent, 17.5);
            assert_eq!(ev.role, Role::Activation);
        }
        assert!(natal_clash_activation(&basis, Branch::Yin).is_empty());
    }

    #[test]
    fn natal_clash_activation_is_scored() {
        let basis = natal_clash_basis();
        let cycle = analyze_cycle(&basis, 1, gz("辛未"), 2020, 5);
        let year = score_year(&basis, &cycle, 2026, 11, gz("丙午"));
        let woken: Vec<_> = year.events_of("natal_clash_activation").collect();
        assert_eq!(woken.len(), 1);
        assert_eq!(woken[0].risk_percent(), 17.5);
        assert_eq!(woken[0].side(), Layer::Branch);
        assert_eq!(
            year.total_risk,
            year.all_events.iter().map(Event::risk_percent).sum::<f64>()
        );

        let quiet = score_year(&basis, &cycle, 2024, 9, gz("甲辰"));
        assert_eq!(quiet.events_of("natal_clash_activation").count(), 0);
    }

    #[test]
    fn basis_collects_natal_punishments() {
        let chart = Chart::parse("丙戌", "辛丑", "壬戌", "丙午").unwrap();
        let basis = NatalBasis::new(chart, &[], ScoringOptions::default());
        assert_eq!(basis.natal_punishments.len(), 2);
        assert!(
            basis
                .natal_punishments
                .iter()
                .all(|p| p.kind == PunishmentKind::Tomb)
        );
    }
}
