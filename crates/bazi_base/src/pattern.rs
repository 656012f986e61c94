//! Ten-god pattern pairs: hurting officer meets direct officer (伤官见官) and
//! hanging resource steals the food (枭神夺食).
//!
//! Positions are collected per layer: stems, and branches through their main
//! stem. Pairs never cross layers.

use serde::Serialize;

use crate::chart::{ALL_PILLARS, Chart, Layer, PillarPosition};
use crate::element::Element;
use crate::flow::Role;
use crate::ganzhi::GanZhi;
use crate::tables::{YEAR_PATTERN_RISK, YEAR_PATTERN_RISK_USEFUL};
use crate::ten_god::{TenGod, branch_ten_god, ten_god};

/// Pattern relation between two ten gods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    /// 伤官 + 正官
    HurtOfficer,
    /// 偏印 + 食神
    PianyinEatgod,
}

impl PatternType {
    /// The member whose element may soften the pattern when useful.
    pub const fn aggressor(self) -> TenGod {
        match self {
            Self::HurtOfficer => TenGod::HurtingOfficer,
            Self::PianyinEatgod => TenGod::IndirectResource,
        }
    }
}

/// Pattern formed by two ten gods, if any. Order does not matter.
pub fn pattern_between(a: TenGod, b: TenGod) -> Option<PatternType> {
    use TenGod::*;
    match (a, b) {
        (HurtingOfficer, DirectOfficer) | (DirectOfficer, HurtingOfficer) => {
            Some(PatternType::HurtOfficer)
        }
        (IndirectResource, EatingGod) | (EatingGod, IndirectResource) => {
            Some(PatternType::PianyinEatgod)
        }
        _ => None,
    }
}

/// Where a pattern position comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum PositionSource {
    Natal { pillar: PillarPosition },
    Cycle,
    Year,
}

/// One stem or branch taking part in a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PatternPosition {
    #[serde(flatten)]
    pub source: PositionSource,
    pub layer: Layer,
    pub character: char,
    /// Element of the stem, or of the branch's main stem.
    pub element: Element,
    pub ten_god: TenGod,
}

impl PatternPosition {
    pub const fn natal_pillar(&self) -> Option<PillarPosition> {
        match self.source {
            PositionSource::Natal { pillar } => Some(pillar),
            _ => None,
        }
    }
}

/// Two positions of the same layer forming a pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PatternPair {
    pub first: PatternPosition,
    pub second: PatternPosition,
}

impl PatternPair {
    pub const fn layer(&self) -> Layer {
        self.first.layer
    }

    /// Both characters in sorted order; identifies the pair independent of source.
    pub fn characters(&self) -> [char; 2] {
        let (a, b) = (self.first.character, self.second.character);
        if a <= b { [a, b] } else { [b, a] }
    }

    pub fn involves(&self, source: PositionSource) -> bool {
        self.first.source == source || self.second.source == source
    }

    /// The position that is not `source`, when the pair involves it.
    pub fn other_than(&self, source: PositionSource) -> Option<&PatternPosition> {
        if self.first.source == source {
            Some(&self.second)
        } else if self.second.source == source {
            Some(&self.first)
        } else {
            None
        }
    }

    pub fn hits(&self, pillar: PillarPosition) -> bool {
        self.first.natal_pillar() == Some(pillar) || self.second.natal_pillar() == Some(pillar)
    }
}

/// Pairs of one pattern type.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternGroup {
    pub pattern: PatternType,
    pub pairs: Vec<PatternPair>,
}

/// A pattern formed by the year, scored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PatternEvent {
    pub pattern: PatternType,
    pub layer: Layer,
    #[serde(flatten)]
    pub pair: PatternPair,
    pub risk_percent: f64,
    pub role: Role,
}

// ---------------------------------------------------------------------------
// Position collection
// ---------------------------------------------------------------------------

/// Stem-layer and branch-layer positions: the natal pillars, then the
/// cycle, then the year. The day stem is the day master itself and never
/// takes part in a pattern.
pub fn collect_positions(
    chart: &Chart,
    cycle: Option<GanZhi>,
    year: Option<GanZhi>,
) -> (Vec<PatternPosition>, Vec<PatternPosition>) {
    let day = chart.day_master();
    let stem_pos = |source, gz: GanZhi| PatternPosition {
        source,
        layer: Layer::Stem,
        character: gz.stem.to_char(),
        element: gz.stem.element(),
        ten_god: ten_god(day, gz.stem),
    };
    let branch_pos = |source, gz: GanZhi| PatternPosition {
        source,
        layer: Layer::Branch,
        character: gz.branch.to_char(),
        element: gz.branch.element(),
        ten_god: branch_ten_god(day, gz.branch),
    };

    let mut flows: Vec<(PositionSource, GanZhi)> = ALL_PILLARS
        .iter()
        .map(|&p| (PositionSource::Natal { pillar: p }, chart.pillar(p)))
        .collect();
    if let Some(gz) = cycle {
        flows.push((PositionSource::Cycle, gz));
    }
    if let Some(gz) = year {
        flows.push((PositionSource::Year, gz));
    }

    let day_stem = PositionSource::Natal {
        pillar: PillarPosition::Day,
    };
    let stems = flows
        .iter()
        .filter(|&&(s, _)| s != day_stem)
        .map(|&(s, gz)| stem_pos(s, gz))
        .collect();
    let branches = flows.iter().map(|&(s, gz)| branch_pos(s, gz)).collect();
    (stems, branches)
}

fn pairs_within(
    positions: &[PatternPosition],
    keep: impl Fn(&PatternPosition, &PatternPosition) -> bool,
) -> Vec<(PatternType, PatternPair)> {
    let mut out = Vec::new();
    for (i, a) in positions.iter().enumerate() {
        for b in &positions[i + 1..] {
            if !keep(a, b) {
                continue;
            }
            if let Some(t) = pattern_between(a.ten_god, b.ten_god) {
                out.push((
                    t,
                    PatternPair {
                        first: *a,
                        second: *b,
                    },
                ));
            }
        }
    }
    out
}

fn group_by_type(found: Vec<(PatternType, PatternPair)>) -> Vec<PatternGroup> {
    let mut groups: Vec<PatternGroup> = Vec::new();
    for (pattern, pair) in found {
        match groups.iter_mut().find(|g| g.pattern == pattern) {
            Some(g) => g.pairs.push(pair),
            None => groups.push(PatternGroup {
                pattern,
                pairs: vec![pair],
            }),
        }
    }
    groups
}

// ---------------------------------------------------------------------------
// Detection
// ---------------------------------------------------------------------------

/// Natal patterns, grouped by type. Not scored.
pub fn detect_natal_patterns(chart: &Chart) -> Vec<PatternGroup> {
    let (stems, branches) = collect_positions(chart, None, None);
    let mut found = pairs_within(&stems, |_, _| true);
    found.extend(pairs_within(&branches, |_, _| true));
    group_by_type(found)
}

/// Patterns with at least one position from the luck cycle.
pub fn detect_cycle_patterns(chart: &Chart, cycle: GanZhi) -> Vec<PatternGroup> {
    let (stems, branches) = collect_positions(chart, Some(cycle), None);
    let with_cycle = |a: &PatternPosition, b: &PatternPosition| {
        a.source == PositionSource::Cycle || b.source == PositionSource::Cycle
    };
    let mut found = pairs_within(&stems, with_cycle);
    found.extend(pairs_within(&branches, with_cycle));
    group_by_type(found)
}

/// Patterns formed by the year against natal and cycle positions of the
/// same layer, 15 % each.
///
/// With `useful` given, a pattern whose aggressor (伤官 or 偏印) carries a
/// useful element is scored at 10 % instead.
pub fn detect_year_patterns(
    chart: &Chart,
    cycle: Option<GanZhi>,
    year: GanZhi,
    useful: Option<&[Element]>,
) -> Vec<PatternEvent> {
    let (stems, branches) = collect_positions(chart, cycle, Some(year));
    let mut events = Vec::new();
    for layer in [&stems, &branches] {
        let Some(year_pos) = layer.iter().find(|p| p.source == PositionSource::Year) else {
            continue;
        };
        for other in layer.iter().filter(|p| p.source != PositionSource::Year) {
            let Some(pattern) = pattern_between(year_pos.ten_god, other.ten_god) else {
                continue;
            };
            let aggressor = if year_pos.ten_god == pattern.aggressor() {
                year_pos
            } else {
                other
            };
            let softened = useful.is_some_and(|u| u.contains(&aggressor.element));
            events.push(PatternEvent {
                pattern,
                layer: year_pos.layer,
                pair: PatternPair {
                    first: *year_pos,
                    second: *other,
                },
                risk_percent: if softened {
                    YEAR_PATTERN_RISK_USEFUL
                } else {
                    YEAR_PATTERN_RISK
                },
                role: Role::Base,
            });
        }
    }
    events
}
