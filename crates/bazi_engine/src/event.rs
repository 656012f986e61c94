//! Tagged event model for a scored year.
//!
//! Detector output from `bazi_base` is wrapped as-is; the year-level
//! combinations (cycle-vs-year clash, static activations, group bonus,
//! line fortune) are defined here.

use bazi_base::{
    Branch, ClashEvent, CompleteGroup, HarmonyEvent, Layer, NatalStemClashEvent, PatternEvent,
    PatternPair, PatternType, PillarPosition, PunishmentEvent, Role, Stem,
};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Year-level event payloads
// ---------------------------------------------------------------------------

/// The year branch clashes the luck-cycle branch. No natal pillar is hit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CycleYearClashEvent {
    pub cycle_stem: Stem,
    pub cycle_branch: Branch,
    pub year_stem: Stem,
    pub year_branch: Branch,
    pub base_power_percent: f64,
    pub tomb_bonus_percent: f64,
    /// Present when the two stems overcome one another.
    pub stem_clash_bonus_percent: f64,
    pub risk_percent: f64,
    pub role: Role,
}

/// Why a static cycle clash was woken by the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClashTrigger {
    /// The year clashes the same natal branch as the cycle.
    SameTarget,
    /// The year clashes the cycle branch itself.
    YearClashesCycle,
}

/// The cycle's clash on the chart, re-activated at half strength.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaticClashActivationEvent {
    pub cycle_branch: Branch,
    pub target_branch: Branch,
    pub targets: Vec<PillarPosition>,
    pub trigger: ClashTrigger,
    /// Σ (weight + tomb bonus) over the cycle clash targets.
    pub base_power_percent: f64,
    pub stem_clash_bonus_percent: f64,
    pub factor: f64,
    pub risk_percent: f64,
    pub role: Role,
}

/// Cycle and natal punishments re-activated by the year at half strength.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaticPunishmentActivationEvent {
    pub cycle_punishments: Vec<PunishmentEvent>,
    pub natal_punishments: Vec<PunishmentEvent>,
    pub factor: f64,
    pub risk_percent: f64,
    pub role: Role,
}

/// A clash inside the natal chart woken by the year repeating one of its
/// branches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NatalClashActivationEvent {
    pub year_branch: Branch,
    pub natal_branch: Branch,
    pub target_branch: Branch,
    /// Source pillar first, then the clashed pillars.
    pub pillars: Vec<PillarPosition>,
    pub natal_risk_percent: f64,
    pub factor: f64,
    pub risk_percent: f64,
    pub role: Role,
}

/// Where an activated pattern pair lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StructureSource {
    Natal,
    Cycle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ActivatedPair {
    pub source: StructureSource,
    #[serde(flatten)]
    pub pair: PatternPair,
}

/// Natal or cycle pattern pairs repeated by the year's own patterns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternActivationEvent {
    pub pattern: PatternType,
    pub layer: Layer,
    pub activated: Vec<ActivatedPair>,
    pub risk_percent: f64,
    pub role: Role,
}

/// The non-year side of a year clash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "side", rename_all = "snake_case")]
pub enum ClashPartner {
    Natal { pillars: Vec<PillarPosition> },
    Cycle,
}

/// A year clash whose branches sit inside complete three-harmony or
/// three-meeting groups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupClashBonusEvent {
    pub year_branch: Branch,
    pub partner_branch: Branch,
    pub partner: ClashPartner,
    pub year_in_group: bool,
    pub partner_in_group: bool,
    pub groups: Vec<CompleteGroup>,
    pub risk_percent: f64,
    pub role: Role,
}

/// Extra risk when a base event strikes the palace ruling the current age.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineFortuneEvent {
    pub age: i32,
    pub pillar: PillarPosition,
    pub palace: &'static str,
    /// Event type of the first qualifying base event.
    pub trigger: &'static str,
    pub trigger_risk_percent: f64,
    pub side: Layer,
    pub risk_percent: f64,
    pub role: Role,
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// Every event a year (or the natal chart) can carry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    BranchClash(ClashEvent),
    CycleYearClash(CycleYearClashEvent),
    Punishment(PunishmentEvent),
    Pattern(PatternEvent),
    PatternStaticActivation(PatternActivationEvent),
    StaticClashActivation(StaticClashActivationEvent),
    StaticPunishmentActivation(StaticPunishmentActivationEvent),
    NatalClashActivation(NatalClashActivationEvent),
    GroupClashBonus(GroupClashBonusEvent),
    LineFortune(LineFortuneEvent),
    Harmony(HarmonyEvent),
    NatalStemClash(NatalStemClashEvent),
}

impl Event {
    /// Serialized type tag.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::BranchClash(_) => "branch_clash",
            Self::CycleYearClash(_) => "cycle_year_clash",
            Self::Punishment(_) => "punishment",
            Self::Pattern(_) => "pattern",
            Self::PatternStaticActivation(_) => "pattern_static_activation",
            Self::StaticClashActivation(_) => "static_clash_activation",
            Self::StaticPunishmentActivation(_) => "static_punishment_activation",
            Self::NatalClashActivation(_) => "natal_clash_activation",
            Self::GroupClashBonus(_) => "group_clash_bonus",
            Self::LineFortune(_) => "line_fortune",
            Self::Harmony(_) => "harmony",
            Self::NatalStemClash(_) => "natal_stem_clash",
        }
    }

    pub const fn role(&self) -> Role {
        match self {
            Self::BranchClash(e) => e.role,
            Self::CycleYearClash(e) => e.role,
            Self::Punishment(e) => e.role,
            Self::Pattern(e) => e.role,
            Self::PatternStaticActivation(e) => e.role,
            Self::StaticClashActivation(e) => e.role,
            Self::StaticPunishmentActivation(e) => e.role,
            Self::NatalClashActivation(e) => e.role,
            Self::GroupClashBonus(e) => e.role,
            Self::LineFortune(e) => e.role,
            Self::Harmony(e) => e.role,
            Self::NatalStemClash(_) => Role::Base,
        }
    }

    pub const fn risk_percent(&self) -> f64 {
        match self {
            Self::BranchClash(e) => e.risk_percent,
            Self::CycleYearClash(e) => e.risk_percent,
            Self::Punishment(e) => e.risk_percent,
            Self::Pattern(e) => e.risk_percent,
            Self::PatternStaticActivation(e) => e.risk_percent,
            Self::StaticClashActivation(e) => e.risk_percent,
            Self::StaticPunishmentActivation(e) => e.risk_percent,
            Self::NatalClashActivation(e) => e.risk_percent,
            Self::GroupClashBonus(e) => e.risk_percent,
            Self::LineFortune(e) => e.risk_percent,
            Self::Harmony(e) => e.risk_percent,
            Self::NatalStemClash(e) => e.risk_percent,
        }
    }

    /// Half of the year the risk is booked to.
    ///
    /// Patterns follow their layer; line fortune follows its trigger; the
    /// rest are branch events.
    pub const fn side(&self) -> Layer {
        match self {
            Self::Pattern(e) => e.layer,
            Self::PatternStaticActivation(e) => e.layer,
            Self::LineFortune(e) => e.side,
            _ => Layer::Branch,
        }
    }

    /// Whether the event strikes the given natal pillar.
    pub fn hits(&self, pillar: PillarPosition) -> bool {
        match self {
            Self::BranchClash(e) => e.hits(pillar),
            Self::Punishment(e) => e.hits(pillar),
            Self::Pattern(e) => e.pair.hits(pillar),
            _ => false,
        }
    }
}

/// Sum of `risk_percent` over events booked to `side`. Uncapped.
pub fn side_risk(events: &[Event], side: Layer) -> f64 {
    events
        .iter()
        .filter(|e| e.side() == side)
        .map(Event::risk_percent)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazi_base::{Chart, Flow, GanZhi, detect_branch_clash, detect_flow_harmonies};

    fn chart_a() -> Chart {
        Chart::parse("乙酉", "乙酉", "丁未", "乙巳").unwrap()
    }

    #[test]
    fn clash_is_branch_side_base() {
        let flow = Flow::year(2021, GanZhi::parse("辛丑").unwrap());
        let ev = Event::BranchClash(detect_branch_clash(&chart_a(), flow).unwrap());
        assert_eq!(ev.kind(), "branch_clash");
        assert_eq!(ev.role(), Role::Base);
        assert_eq!(ev.side(), Layer::Branch);
        assert!(ev.hits(PillarPosition::Day));
        assert!(!ev.hits(PillarPosition::Year));
    }

    #[test]
    fn harmonies_book_nothing() {
        let flow = Flow::year(2021, GanZhi::parse("辛丑").unwrap());
        let events: Vec<Event> = detect_flow_harmonies(&chart_a(), flow)
            .into_iter()
            .map(Event::Harmony)
            .collect();
        assert!(!events.is_empty());
        assert!(events.iter().all(|e| e.role() == Role::Explain));
        assert_eq!(side_risk(&events, Layer::Branch), 0.0);
        assert_eq!(side_risk(&events, Layer::Stem), 0.0);
    }
}
