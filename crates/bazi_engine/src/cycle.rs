//! Luck-cycle scoring.
//!
//! A cycle is scored like a year against the natal chart alone: its clash,
//! punishments and patterns. Patterns weigh 15 %, or 25 % when the cycle
//! branch pairs with the natal month branch.

use bazi_base::tables::{CYCLE_PATTERN_RISK, CYCLE_PATTERN_RISK_MONTH, PATTERN_CLASH_OVERLAP_BONUS};
use bazi_base::{
    Flow, GanZhi, Layer, PatternEvent, PillarPosition, PositionSource, Role, detect_branch_clash,
    detect_branch_punishments, detect_cycle_patterns, detect_flow_harmonies,
    without_clash_overlap,
};
use tracing::debug;

use crate::labels::{CYCLE_GOOD_THRESHOLD, cycle_label};
use crate::luck_types::{CycleRecord, YearRecord};
use crate::scoring::{GOOD_YEAR_THRESHOLD, NatalBasis, overlaps_clash};

/// Score a luck cycle against the chart. Year averages are filled in by
/// [`summarize_years`].
pub fn analyze_cycle(
    basis: &NatalBasis,
    index: usize,
    gz: GanZhi,
    start_year: i32,
    start_age: i32,
) -> CycleRecord {
    let chart = &basis.chart;
    let flow = Flow::cycle(index, gz);

    let mut clash = detect_branch_clash(chart, flow);
    let punishments = without_clash_overlap(detect_branch_punishments(chart, flow), clash.as_ref());
    let pattern_groups = detect_cycle_patterns(chart, gz);

    let mut patterns = Vec::new();
    for group in &pattern_groups {
        for pair in &group.pairs {
            let Some(other) = pair.other_than(PositionSource::Cycle) else {
                continue;
            };
            let risk_percent = match pair.layer() {
                Layer::Branch if other.natal_pillar() == Some(PillarPosition::Month) => {
                    CYCLE_PATTERN_RISK_MONTH
                }
                _ => CYCLE_PATTERN_RISK,
            };
            let event = PatternEvent {
                pattern: group.pattern,
                layer: pair.layer(),
                pair: *pair,
                risk_percent,
                role: Role::Base,
            };
            let merged = clash
                .as_mut()
                .filter(|c| overlaps_clash(&event, PositionSource::Cycle, c));
            match merged {
                Some(c) => c.add_pattern_bonus(PATTERN_CLASH_OVERLAP_BONUS),
                None => patterns.push(event),
            }
        }
    }

    let harmonies = detect_flow_harmonies(chart, flow);

    let layer_risk = |layer: Layer| -> f64 {
        patterns
            .iter()
            .filter(|p| p.layer == layer)
            .map(|p| p.risk_percent)
            .sum()
    };
    let risk_stem = layer_risk(Layer::Stem);
    let risk_branch = clash.as_ref().map_or(0.0, |c| c.risk_percent)
        + punishments.iter().map(|p| p.risk_percent).sum::<f64>()
        + layer_risk(Layer::Branch);
    let risk_total = risk_stem + risk_branch;

    let stem_is_useful = basis.is_useful(gz.stem.element());
    let branch_is_useful = basis.is_useful(gz.branch.element());
    let label = cycle_label(branch_is_useful, risk_total);

    debug!(
        index,
        ganzhi = %gz,
        start_year,
        risk_stem,
        risk_branch,
        label = label.name(),
        "scored luck cycle"
    );

    CycleRecord {
        index,
        stem: gz.stem,
        branch: gz.branch,
        stem_element: gz.stem.element(),
        branch_element: gz.branch.element(),
        start_year,
        start_age,
        stem_is_useful,
        branch_is_useful,
        overall_good: branch_is_useful,
        natal_clash_events: clash.into_iter().collect(),
        punishments,
        patterns,
        harmonies,
        risk_stem,
        risk_branch,
        risk_total,
        label,
        very_good: stem_is_useful && branch_is_useful && risk_total < CYCLE_GOOD_THRESHOLD,
        average_year_risk: 0.0,
        is_good_simple: false,
        pattern_groups,
    }
}

/// Fill the year-derived fields of a cycle.
pub fn summarize_years(cycle: &mut CycleRecord, years: &[YearRecord]) {
    cycle.average_year_risk = if years.is_empty() {
        0.0
    } else {
        years.iter().map(|y| y.total_risk).sum::<f64>() / years.len() as f64
    };
    cycle.is_good_simple = (cycle.stem_is_useful || cycle.branch_is_useful)
        && cycle.average_year_risk <= GOOD_YEAR_THRESHOLD;
}
