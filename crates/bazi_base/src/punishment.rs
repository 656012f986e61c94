//! Branch punishments (xing) and the natal conflict summary.

use serde::Serialize;

use crate::chart::{Chart, PillarPosition};
use crate::clash::{ClashEvent, PillarHit, detect_natal_clashes};
use crate::flow::{Flow, Role};
use crate::ganzhi::Branch;
use crate::tables::{PunishmentKind, is_clash, punishment_kind, punishment_targets};
use crate::ten_god::{TenGod, branch_ten_god};

/// One punishment against a single pillar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PunishmentEvent {
    pub flow: Flow,
    pub target_branch: Branch,
    pub kind: PunishmentKind,
    /// Weight of the punished pillar(s); shown only, not scored.
    pub base_power_percent: f64,
    /// Flat by kind; never multiplied by the number of pillars.
    pub risk_percent: f64,
    pub target: PillarHit,
    pub flow_ten_god: TenGod,
    pub target_ten_god: TenGod,
    pub role: Role,
}

impl PunishmentEvent {
    pub fn hits(&self, pillar: PillarPosition) -> bool {
        self.target.pillar == pillar
    }
}

/// Punishments of the chart by a flowing branch, one event per punished pillar.
pub fn detect_branch_punishments(chart: &Chart, flow: Flow) -> Vec<PunishmentEvent> {
    let day = chart.day_master();
    punishment_targets(flow.branch)
        .into_iter()
        .flat_map(|(target_branch, kind)| {
            chart
                .pillars_with_branch(target_branch)
                .into_iter()
                .map(move |pillar| PunishmentEvent {
                    flow,
                    target_branch,
                    kind,
                    base_power_percent: pillar.branch_weight(),
                    risk_percent: kind.risk_percent(),
                    target: PillarHit::new(chart, pillar),
                    flow_ten_god: branch_ten_god(day, flow.branch),
                    target_ten_god: branch_ten_god(day, target_branch),
                    role: Role::Base,
                })
        })
        .collect()
}

/// Drop punishments that land on the same branch as a clash of the same flow.
///
/// A pair that both clashes and punishes counts only as a clash.
pub fn without_clash_overlap(
    punishments: Vec<PunishmentEvent>,
    clash: Option<&ClashEvent>,
) -> Vec<PunishmentEvent> {
    match clash {
        Some(c) => punishments
            .into_iter()
            .filter(|p| p.target_branch != c.target_branch)
            .collect(),
        None => punishments,
    }
}

/// Clashes and punishments inside the natal chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NatalConflicts {
    pub clashes: Vec<ClashEvent>,
    pub punishments: Vec<PunishmentEvent>,
}

impl NatalConflicts {
    pub fn punishment_risk(&self) -> f64 {
        self.punishments.iter().map(|p| p.risk_percent).sum()
    }
}

/// Natal-internal clashes and punishments.
///
/// Pairs that also clash are skipped. Self-punishment is kept once per
/// branch: all qualifying pairs are collected, then only the first pair of
/// each repeated branch survives.
pub fn detect_natal_clashes_and_punishments(chart: &Chart) -> NatalConflicts {
    let day = chart.day_master();

    let qualifying: Vec<(PillarPosition, PillarPosition, PunishmentKind)> = Chart::pillar_pairs()
        .filter_map(|(p1, p2)| {
            let (b1, b2) = (chart.branch(p1), chart.branch(p2));
            if is_clash(b1, b2) {
                return None;
            }
            punishment_kind(b1, b2).map(|k| (p1, p2, k))
        })
        .collect();

    let punishments = qualifying
        .iter()
        .enumerate()
        .filter(|&(i, &(p1, _, kind))| {
            kind != PunishmentKind::SelfPunishment
                || !qualifying[..i].iter().any(|&(q1, _, k)| {
                    k == PunishmentKind::SelfPunishment && chart.branch(q1) == chart.branch(p1)
                })
        })
        .map(|(_, &(p1, p2, kind))| {
            let (b1, b2) = (chart.branch(p1), chart.branch(p2));
            PunishmentEvent {
                flow: Flow::natal(p1, b1),
                target_branch: b2,
                kind,
                base_power_percent: p1.branch_weight() + p2.branch_weight(),
                risk_percent: kind.risk_percent(),
                target: PillarHit::new(chart, p2),
                flow_ten_god: branch_ten_god(day, b1),
                target_ten_god: branch_ten_god(day, b2),
                role: Role::Base,
            }
        })
        .collect();

    NatalConflicts {
        clashes: detect_natal_clashes(chart),
        punishments,
    }
}
