//! Day-master strength from weighted element relations.

use serde::Serialize;

use crate::chart::{ALL_PILLARS, Chart};
use crate::tables::Relation;

/// Strength of the day master.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DayMasterStrength {
    /// Net weighted score (support minus drain).
    pub raw_score: f64,
    /// Overall strength, 0 (all against) to 100 (all supporting).
    pub strength_percent: f64,
    pub support_score: f64,
    pub drain_score: f64,
    /// Share of supporting contributions.
    pub support_percent: f64,
    /// Share of draining contributions.
    pub drain_percent: f64,
}

/// Compute day-master strength over the eight weighted slots.
///
/// Each non-zero slot contributes `weight × coefficient(day element, slot
/// element)`. A chart with no contributions reports 50 for every percentage.
pub fn day_master_strength(chart: &Chart) -> DayMasterStrength {
    let day_element = chart.day_master().element();

    let slots = ALL_PILLARS.iter().flat_map(|&p| {
        [
            (p.stem_weight(), chart.stem(p).element()),
            (p.branch_weight(), chart.branch(p).element()),
        ]
    });

    let mut net = 0.0;
    let mut support = 0.0;
    let mut drain = 0.0;
    let mut total = 0.0;
    for (weight, element) in slots {
        if weight == 0.0 {
            continue;
        }
        let contrib = weight * Relation::between(day_element, element).coefficient();
        net += contrib;
        if contrib > 0.0 {
            support += contrib;
        } else {
            drain -= contrib;
        }
        total += contrib.abs();
    }

    let (strength_percent, support_percent, drain_percent) = if total == 0.0 {
        (50.0, 50.0, 50.0)
    } else {
        (
            (net + total) / (2.0 * total) * 100.0,
            support / total * 100.0,
            drain / total * 100.0,
        )
    };

    DayMasterStrength {
        raw_score: net,
        strength_percent: strength_percent.clamp(0.0, 100.0),
        support_score: support,
        drain_score: drain,
        support_percent: support_percent.clamp(0.0, 100.0),
        drain_percent: drain_percent.clamp(0.0, 100.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weak_water_chart() {
        let chart = Chart::parse("丙戌", "辛丑", "壬戌", "丙午").unwrap();
        let s = day_master_strength(&chart);
        // net = 8 - 8 - 8 - 10 - 35 - 10 - 12 = -75, total = 91
        assert!((s.raw_score + 75.0).abs() < 1e-9);
        assert!((s.strength_percent - 16.0 / 182.0 * 100.0).abs() < 1e-9);
        assert!((s.support_percent + s.drain_percent - 100.0).abs() < 1e-9);
    }

    #[test]
    fn all_supporting_chart_is_full_strength() {
        let chart = Chart::parse("壬子", "壬子", "壬子", "壬子").unwrap();
        let s = day_master_strength(&chart);
        assert_eq!(s.strength_percent, 100.0);
        assert_eq!(s.drain_percent, 0.0);
    }

    #[test]
    fn all_draining_chart_is_zero_strength() {
        // 戊 earth overcomes 壬 water everywhere except the day stem.
        let chart = Chart::parse("戊辰", "戊戌", "壬辰", "戊戌").unwrap();
        let s = day_master_strength(&chart);
        assert_eq!(s.strength_percent, 0.0);
        assert_eq!(s.support_percent, 0.0);
    }

    #[test]
    fn values_are_bounded() {
        let chart = Chart::parse("乙酉", "乙酉", "丁未", "乙巳").unwrap();
        let s = day_master_strength(&chart);
        for v in [s.strength_percent, s.support_percent, s.drain_percent] {
            assert!((0.0..=100.0).contains(&v));
        }
    }
}
