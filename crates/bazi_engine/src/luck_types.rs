//! Types for luck-cycle and year analysis.

use bazi_base::{
    Branch, ClashEvent, Element, GanZhi, HarmonyEvent, PatternEvent, PatternGroup,
    PunishmentEvent, Stem,
};
use serde::Serialize;

use crate::event::{CycleYearClashEvent, Event};
use crate::labels::{CycleLabel, HalfLabels, YearLabel};

/// Default number of oracle cycles examined, placeholder included.
pub const DEFAULT_MAX_CYCLES: usize = 8;

/// Optional scoring switches. Rule tables themselves are fixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoringOptions {
    /// Score a year pattern at 10 % instead of 15 % when its 伤官 / 偏印
    /// element is useful.
    pub useful_pattern_discount: bool,
}

/// Horizon and scoring options for a luck analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LuckOptions {
    /// Leading oracle cycles to examine, placeholder included.
    pub max_cycles: usize,
    pub scoring: ScoringOptions,
}

impl Default for LuckOptions {
    fn default() -> Self {
        Self {
            max_cycles: DEFAULT_MAX_CYCLES,
            scoring: ScoringOptions::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Cycle
// ---------------------------------------------------------------------------

/// One scored ten-year luck cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleRecord {
    /// Position in the oracle's cycle list (placeholder is 0).
    pub index: usize,
    pub stem: Stem,
    pub branch: Branch,
    pub stem_element: Element,
    pub branch_element: Element,
    pub start_year: i32,
    pub start_age: i32,
    pub stem_is_useful: bool,
    pub branch_is_useful: bool,
    /// Branch-led: good exactly when the branch element is useful.
    pub overall_good: bool,
    /// Zero or one clash of the cycle branch on the chart.
    pub natal_clash_events: Vec<ClashEvent>,
    pub punishments: Vec<PunishmentEvent>,
    /// Scored cycle patterns; those merged into the clash are not listed.
    pub patterns: Vec<PatternEvent>,
    pub harmonies: Vec<HarmonyEvent>,
    pub risk_stem: f64,
    pub risk_branch: f64,
    pub risk_total: f64,
    pub label: CycleLabel,
    pub very_good: bool,
    pub average_year_risk: f64,
    pub is_good_simple: bool,
    /// Every cycle pattern pair, merged ones included; matched against
    /// year patterns for static activation.
    #[serde(skip)]
    pub pattern_groups: Vec<PatternGroup>,
}

impl CycleRecord {
    pub const fn ganzhi(&self) -> GanZhi {
        GanZhi::new(self.stem, self.branch)
    }

    pub fn clash(&self) -> Option<&ClashEvent> {
        self.natal_clash_events.first()
    }
}

// ---------------------------------------------------------------------------
// Year
// ---------------------------------------------------------------------------

/// One scored calendar year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearRecord {
    pub year: i32,
    /// Virtual age.
    pub age: i32,
    pub stem: Stem,
    pub branch: Branch,
    pub stem_element: Element,
    pub branch_element: Element,
    pub stem_is_useful: bool,
    pub branch_is_useful: bool,
    pub stem_side_risk: f64,
    pub branch_side_risk: f64,
    /// Uncapped sum of both sides.
    pub total_risk: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub half_labels: Option<HalfLabels>,
    pub year_label: YearLabel,
    pub risk_management: bool,
    pub is_good: bool,
    pub all_events: Vec<Event>,
    pub clashes_vs_natal: Vec<ClashEvent>,
    pub clashes_vs_cycle: Vec<CycleYearClashEvent>,
    pub punishments_vs_natal: Vec<PunishmentEvent>,
    pub harmonies_vs_natal: Vec<HarmonyEvent>,
}

impl YearRecord {
    pub const fn ganzhi(&self) -> GanZhi {
        GanZhi::new(self.stem, self.branch)
    }

    /// Events of one type tag, in scoring order.
    pub fn events_of(&self, kind: &str) -> impl Iterator<Item = &Event> {
        self.all_events.iter().filter(move |e| e.kind() == kind)
    }
}

// ---------------------------------------------------------------------------
// Timeline
// ---------------------------------------------------------------------------

/// A cycle with its scored years.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LuckGroup {
    pub cycle: CycleRecord,
    pub years: Vec<YearRecord>,
}

/// A change of cycle-branch usefulness between consecutive cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TurningPoint {
    /// Start year of the later cycle.
    pub year: i32,
    pub cycle_index: usize,
    pub ganzhi: GanZhi,
    pub from_useful: bool,
    pub to_useful: bool,
}

/// Luck cycles in start-year order and the turning points between them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LuckAnalysis {
    pub groups: Vec<LuckGroup>,
    pub turning_points: Vec<TurningPoint>,
}

impl LuckAnalysis {
    /// Scored year by calendar year.
    pub fn year(&self, year: i32) -> Option<&YearRecord> {
        self.groups
            .iter()
            .flat_map(|g| g.years.iter())
            .find(|y| y.year == year)
    }
}
