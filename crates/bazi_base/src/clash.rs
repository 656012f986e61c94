//! Branch clashes (chong) and the stem-clash-meets-branch-clash coincidence.

use serde::Serialize;

use crate::chart::{Chart, PillarPosition};
use crate::element::mutually_overcoming;
use crate::flow::{Flow, Role};
use crate::ganzhi::{Branch, Stem};
use crate::tables::{
    CLASH_RISK_CAP, NATAL_STEM_CLASH_RISK, STEM_CLASH_BONUS, TOMB_CLASH_BONUS, is_clash,
    is_tomb_clash,
};
use crate::ten_god::{TenGod, branch_ten_god};

/// Impact band of a clash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Impact {
    Minor,
    Moderate,
    Major,
}

impl Impact {
    /// Minor up to 15 %, moderate up to 30 %, major above.
    pub fn from_risk(risk_percent: f64) -> Self {
        if risk_percent <= 15.0 {
            Self::Minor
        } else if risk_percent <= 30.0 {
            Self::Moderate
        } else {
            Self::Major
        }
    }

    pub const fn suggestion(self) -> Suggestion {
        match self {
            Self::Minor => Suggestion::Normal,
            Self::Moderate => Suggestion::BeCareful,
            Self::Major => Suggestion::StrongWarning,
        }
    }
}

/// Advice level derived from [`Impact`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Suggestion {
    Normal,
    BeCareful,
    StrongWarning,
}

/// A natal pillar hit by a flowing branch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PillarHit {
    pub pillar: PillarPosition,
    pub palace: &'static str,
    pub position_weight: f64,
    pub branch_main_stem: Stem,
    pub ten_god: TenGod,
}

impl PillarHit {
    pub fn new(chart: &Chart, pillar: PillarPosition) -> Self {
        let branch = chart.branch(pillar);
        Self {
            pillar,
            palace: pillar.palace(),
            position_weight: pillar.branch_weight(),
            branch_main_stem: branch.main_stem(),
            ten_god: branch_ten_god(chart.day_master(), branch),
        }
    }
}

/// A pillar where the flow stem and the pillar stem also overcome one another.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StemClashHit {
    pub pillar: PillarPosition,
    pub flow_stem: Stem,
    pub target_stem: Stem,
    pub bonus_percent: f64,
}

/// A flowing branch clashing one or more natal pillars.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClashEvent {
    pub flow: Flow,
    pub target_branch: Branch,
    /// Sum of the hit pillars' branch weights.
    pub base_power_percent: f64,
    pub tomb_bonus_percent: f64,
    pub stem_clash_bonus_percent: f64,
    pub stem_clash_hits: Vec<StemClashHit>,
    /// Added when a branch ten-god pattern coincides with this clash.
    pub pattern_bonus_percent: f64,
    pub risk_percent: f64,
    pub impact: Impact,
    pub suggestion: Suggestion,
    pub targets: Vec<PillarHit>,
    pub flow_ten_god: TenGod,
    pub target_ten_god: TenGod,
    pub role: Role,
}

impl ClashEvent {
    pub fn hits(&self, pillar: PillarPosition) -> bool {
        self.targets.iter().any(|t| t.pillar == pillar)
    }

    /// Merge a coinciding branch pattern into this clash.
    pub fn add_pattern_bonus(&mut self, bonus: f64) {
        self.pattern_bonus_percent += bonus;
        self.risk_percent = (self.risk_percent + bonus).min(CLASH_RISK_CAP);
        self.impact = Impact::from_risk(self.risk_percent);
        self.suggestion = self.impact.suggestion();
    }
}

/// Stem-clash bonus for a hit pillar: year none, day double, others single.
pub const fn stem_clash_bonus(pillar: PillarPosition) -> f64 {
    match pillar {
        PillarPosition::Year => 0.0,
        PillarPosition::Day => 2.0 * STEM_CLASH_BONUS,
        PillarPosition::Month | PillarPosition::Hour => STEM_CLASH_BONUS,
    }
}

/// Detect whether `flow` clashes the chart.
///
/// Every pillar holding the clash partner is a target. Returns `None` when
/// the partner does not appear in the chart.
pub fn detect_branch_clash(chart: &Chart, flow: Flow) -> Option<ClashEvent> {
    let target_branch = flow.branch.clash_partner();
    let pillars = chart.pillars_with_branch(target_branch);
    if pillars.is_empty() {
        return None;
    }

    let targets: Vec<PillarHit> = pillars.iter().map(|&p| PillarHit::new(chart, p)).collect();
    let base_power_percent: f64 = targets.iter().map(|t| t.position_weight).sum();
    let tomb_bonus_percent = if is_tomb_clash(flow.branch, target_branch) {
        TOMB_CLASH_BONUS
    } else {
        0.0
    };

    let stem_clash_hits: Vec<StemClashHit> = match flow.stem {
        Some(flow_stem) => pillars
            .iter()
            .filter(|&&p| mutually_overcoming(flow_stem.element(), chart.stem(p).element()))
            .map(|&p| StemClashHit {
                pillar: p,
                flow_stem,
                target_stem: chart.stem(p),
                bonus_percent: stem_clash_bonus(p),
            })
            .collect(),
        None => Vec::new(),
    };
    let stem_clash_bonus_percent: f64 = stem_clash_hits.iter().map(|h| h.bonus_percent).sum();

    let risk_percent =
        (base_power_percent + tomb_bonus_percent + stem_clash_bonus_percent).min(CLASH_RISK_CAP);
    let impact = Impact::from_risk(risk_percent);
    let day = chart.day_master();

    Some(ClashEvent {
        flow,
        target_branch,
        base_power_percent,
        tomb_bonus_percent,
        stem_clash_bonus_percent,
        stem_clash_hits,
        pattern_bonus_percent: 0.0,
        risk_percent,
        impact,
        suggestion: impact.suggestion(),
        targets,
        flow_ten_god: branch_ten_god(day, flow.branch),
        target_ten_god: branch_ten_god(day, target_branch),
        role: Role::Base,
    })
}

/// Clashes between natal pillars, one per clashing pillar pair.
///
/// Each is evaluated as the first pillar's branch acting on the chart, without
/// a stem, so the event lists every pillar holding the partner.
pub fn detect_natal_clashes(chart: &Chart) -> Vec<ClashEvent> {
    Chart::pillar_pairs()
        .filter(|&(p1, p2)| is_clash(chart.branch(p1), chart.branch(p2)))
        .filter_map(|(p1, _)| detect_branch_clash(chart, Flow::natal(p1, chart.branch(p1))))
        .collect()
}

/// A natal pillar pair whose branches clash and whose stems overcome one another.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NatalStemClashEvent {
    pub first: PillarPosition,
    pub second: PillarPosition,
    pub first_stem: Stem,
    pub first_branch: Branch,
    pub second_stem: Stem,
    pub second_branch: Branch,
    pub risk_percent: f64,
}

/// Stem-clash-meets-branch-clash pairs inside the natal chart, fixed 10 % each.
pub fn detect_natal_stem_clashes(chart: &Chart) -> Vec<NatalStemClashEvent> {
    Chart::pillar_pairs()
        .filter(|&(p1, p2)| {
            is_clash(chart.branch(p1), chart.branch(p2))
                && mutually_overcoming(chart.stem(p1).element(), chart.stem(p2).element())
        })
        .map(|(p1, p2)| NatalStemClashEvent {
            first: p1,
            second: p2,
            first_stem: chart.stem(p1),
            first_branch: chart.branch(p1),
            second_stem: chart.stem(p2),
            second_branch: chart.branch(p2),
            risk_percent: NATAL_STEM_CLASH_RISK,
        })
        .collect()
}
