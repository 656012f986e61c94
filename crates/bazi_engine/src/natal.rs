//! Natal analysis and the combined natal + luck entry point.

use bazi_base::{
    Chart, DayMasterStrength, Element, HarmonyEvent, NatalConflicts, NatalStemClashEvent,
    PatternGroup, Stem, StemPattern, TenGodCategory, Trait, UsefulElements, category_percentages,
    day_master_strength, detect_natal_clashes_and_punishments, detect_natal_harmonies,
    detect_natal_patterns, detect_natal_stem_clashes, dominant_traits,
    global_element_distribution, select_useful_elements, stem_pattern_summary,
};
use bazi_calendar::{CalendarOracle, Sex};
use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;

use crate::error::EngineError;
use crate::event::Event;
use crate::luck::{analyze_luck, chart_from_raw};
use crate::luck_types::{LuckAnalysis, LuckOptions};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ElementShare {
    pub element: Element,
    pub percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryShare {
    pub category: TenGodCategory,
    pub percent: f64,
}

/// Everything derived from the four pillars alone.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NatalAnalysis {
    pub chart: Chart,
    pub day_master: Stem,
    pub strength: DayMasterStrength,
    pub element_distribution: Vec<ElementShare>,
    pub category_percentages: Vec<CategoryShare>,
    pub useful: UsefulElements,
    pub stem_patterns: Vec<StemPattern>,
    pub traits: Vec<Trait>,
    pub patterns: Vec<PatternGroup>,
    pub conflicts: NatalConflicts,
    /// Flat sum of natal punishments.
    pub punishment_risk_percent: f64,
    pub stem_clashes: Vec<NatalStemClashEvent>,
    pub harmonies: Vec<HarmonyEvent>,
}

impl NatalAnalysis {
    /// Natal clashes, punishments, stem clashes and harmonies as tagged events.
    pub fn events(&self) -> Vec<Event> {
        let clashes = self.conflicts.clashes.iter().cloned().map(Event::BranchClash);
        let punishments = self.conflicts.punishments.iter().cloned().map(Event::Punishment);
        let stem_clashes = self.stem_clashes.iter().copied().map(Event::NatalStemClash);
        let harmonies = self.harmonies.iter().cloned().map(Event::Harmony);
        clashes
            .chain(punishments)
            .chain(stem_clashes)
            .chain(harmonies)
            .collect()
    }
}

/// Analyze a chart without any flowing cycle or year.
pub fn analyze_natal(chart: &Chart) -> NatalAnalysis {
    let strength = day_master_strength(chart);
    let distribution = global_element_distribution(chart);
    let categories = category_percentages(chart);
    let useful = select_useful_elements(chart, &strength, &distribution, &categories);
    let conflicts = detect_natal_clashes_and_punishments(chart);

    debug!(
        chart = %chart,
        strength = strength.strength_percent,
        useful = ?useful.final_elements,
        "natal analysis"
    );

    NatalAnalysis {
        chart: *chart,
        day_master: chart.day_master(),
        strength,
        element_distribution: distribution
            .iter()
            .map(|&(element, percent)| ElementShare { element, percent })
            .collect(),
        category_percentages: categories
            .iter()
            .map(|&(category, percent)| CategoryShare { category, percent })
            .collect(),
        useful,
        stem_patterns: stem_pattern_summary(chart),
        traits: dominant_traits(chart),
        patterns: detect_natal_patterns(chart),
        punishment_risk_percent: conflicts.punishment_risk(),
        conflicts,
        stem_clashes: detect_natal_stem_clashes(chart),
        harmonies: detect_natal_harmonies(chart),
    }
}

/// Natal analysis and luck timeline for one birth.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompleteAnalysis {
    pub birth: NaiveDateTime,
    pub sex: Sex,
    pub natal: NatalAnalysis,
    pub luck: LuckAnalysis,
}

/// Natal analysis, then the luck timeline scored with its final useful
/// elements.
pub fn analyze_complete<O: CalendarOracle + ?Sized>(
    oracle: &O,
    birth: NaiveDateTime,
    sex: Sex,
    options: &LuckOptions,
) -> Result<CompleteAnalysis, EngineError> {
    let chart = chart_from_raw(&oracle.natal_pillars(birth)?)?;
    let natal = analyze_natal(&chart);
    let luck = analyze_luck(oracle, birth, sex, &natal.useful.final_elements, options)?;
    Ok(CompleteAnalysis {
        birth,
        sex,
        natal,
        luck,
    })
}
