//! Ten-god (shishen) classification relative to the day master.
//!
//! Branches are classified through their main stem only; hidden stems are
//! not modelled.

use serde::Serialize;

use crate::chart::{ALL_PILLARS, Chart, PillarPosition};
use crate::ganzhi::{Branch, Stem};
use crate::tables::Relation;

/// The ten gods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TenGod {
    /// 比肩
    Peer,
    /// 劫财
    Rival,
    /// 食神
    EatingGod,
    /// 伤官
    HurtingOfficer,
    /// 偏印
    IndirectResource,
    /// 正印
    DirectResource,
    /// 偏财
    IndirectWealth,
    /// 正财
    DirectWealth,
    /// 七杀
    SevenKillings,
    /// 正官
    DirectOfficer,
}

impl TenGod {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Peer => "比肩",
            Self::Rival => "劫财",
            Self::EatingGod => "食神",
            Self::HurtingOfficer => "伤官",
            Self::IndirectResource => "偏印",
            Self::DirectResource => "正印",
            Self::IndirectWealth => "偏财",
            Self::DirectWealth => "正财",
            Self::SevenKillings => "七杀",
            Self::DirectOfficer => "正官",
        }
    }

    pub const fn category(self) -> TenGodCategory {
        match self {
            Self::Peer | Self::Rival => TenGodCategory::Companion,
            Self::EatingGod | Self::HurtingOfficer => TenGodCategory::Output,
            Self::IndirectResource | Self::DirectResource => TenGodCategory::Resource,
            Self::IndirectWealth | Self::DirectWealth => TenGodCategory::Wealth,
            Self::SevenKillings | Self::DirectOfficer => TenGodCategory::Officer,
        }
    }
}

impl std::fmt::Display for TenGod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for TenGod {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// The five ten-god categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TenGodCategory {
    /// 比劫
    Companion,
    /// 财星
    Wealth,
    /// 食伤
    Output,
    /// 官杀
    Officer,
    /// 印星
    Resource,
}

/// Categories in display order.
pub const ALL_CATEGORIES: [TenGodCategory; 5] = [
    TenGodCategory::Companion,
    TenGodCategory::Wealth,
    TenGodCategory::Output,
    TenGodCategory::Officer,
    TenGodCategory::Resource,
];

impl TenGodCategory {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Companion => "比劫",
            Self::Wealth => "财星",
            Self::Output => "食伤",
            Self::Officer => "官杀",
            Self::Resource => "印星",
        }
    }

    /// The two member gods (direct first for resource, wealth and officer).
    pub const fn members(self) -> [TenGod; 2] {
        match self {
            Self::Resource => [TenGod::DirectResource, TenGod::IndirectResource],
            Self::Wealth => [TenGod::DirectWealth, TenGod::IndirectWealth],
            Self::Officer => [TenGod::DirectOfficer, TenGod::SevenKillings],
            Self::Output => [TenGod::EatingGod, TenGod::HurtingOfficer],
            Self::Companion => [TenGod::Peer, TenGod::Rival],
        }
    }
}

impl std::fmt::Display for TenGodCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for TenGodCategory {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Ten god of `other` relative to the day stem `day`.
pub fn ten_god(day: Stem, other: Stem) -> TenGod {
    let same_polarity = day.is_yang() == other.is_yang();
    let pick = |same: TenGod, differ: TenGod| if same_polarity { same } else { differ };
    match Relation::between(day.element(), other.element()) {
        Relation::Same => pick(TenGod::Peer, TenGod::Rival),
        Relation::Output => pick(TenGod::EatingGod, TenGod::HurtingOfficer),
        Relation::Resource => pick(TenGod::IndirectResource, TenGod::DirectResource),
        Relation::Wealth => pick(TenGod::IndirectWealth, TenGod::DirectWealth),
        Relation::Officer => pick(TenGod::SevenKillings, TenGod::DirectOfficer),
    }
}

/// Ten god of a branch, through its main stem.
pub fn branch_ten_god(day: Stem, branch: Branch) -> TenGod {
    ten_god(day, branch.main_stem())
}

// ---------------------------------------------------------------------------
// Chart summaries
// ---------------------------------------------------------------------------

/// Weighted share (percent) of each category across all eight chart slots.
///
/// Slots with zero weight (the day stem) are skipped. Values sum to 100.
pub fn category_percentages(chart: &Chart) -> Vec<(TenGodCategory, f64)> {
    let day = chart.day_master();
    let mut raw = [0.0_f64; 5];
    for pos in ALL_PILLARS {
        let w = pos.stem_weight();
        if w > 0.0 {
            raw[category_slot(ten_god(day, chart.stem(pos)).category())] += w;
        }
        let w = pos.branch_weight();
        if w > 0.0 {
            raw[category_slot(branch_ten_god(day, chart.branch(pos)).category())] += w;
        }
    }
    let total: f64 = raw.iter().sum();
    let total = if total > 0.0 { total } else { 1.0 };
    ALL_CATEGORIES
        .iter()
        .map(|&c| (c, raw[category_slot(c)] / total * 100.0))
        .collect()
}

/// Percent of one category from a [`category_percentages`] result.
pub fn category_percent(shares: &[(TenGodCategory, f64)], category: TenGodCategory) -> f64 {
    shares
        .iter()
        .find(|(c, _)| *c == category)
        .map_or(0.0, |(_, p)| *p)
}

fn category_slot(c: TenGodCategory) -> usize {
    match c {
        TenGodCategory::Companion => 0,
        TenGodCategory::Wealth => 1,
        TenGodCategory::Output => 2,
        TenGodCategory::Officer => 3,
        TenGodCategory::Resource => 4,
    }
}

/// A stem with its ten god.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StemGod {
    pub pillar: PillarPosition,
    pub stem: Stem,
    pub ten_god: TenGod,
}

/// A category that appears on two or more of the four stems.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StemPattern {
    pub category: TenGodCategory,
    pub members: Vec<StemGod>,
}

/// Categories repeated across the four stems (day stem included, as 比肩).
pub fn stem_pattern_summary(chart: &Chart) -> Vec<StemPattern> {
    let day = chart.day_master();
    let mut out: Vec<StemPattern> = Vec::new();
    for (pos, gz) in chart.iter() {
        let god = ten_god(day, gz.stem);
        let member = StemGod {
            pillar: pos,
            stem: gz.stem,
            ten_god: god,
        };
        match out.iter_mut().find(|p| p.category == god.category()) {
            Some(p) => p.members.push(member),
            None => out.push(StemPattern {
                category: god.category(),
                members: vec![member],
            }),
        }
    }
    out.retain(|p| p.members.len() >= 2);
    out
}

// ---------------------------------------------------------------------------
// Dominant traits
// ---------------------------------------------------------------------------

/// Share of one ten god inside a [`Trait`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraitDetail {
    pub ten_god: TenGod,
    pub percent: f64,
    /// How many of the year, month and hour stems show this god.
    pub stems_visible_count: u32,
    pub stems_percent: f64,
    pub branches_percent: f64,
}

/// Weighted presence of one category in the natal chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trait {
    pub category: TenGodCategory,
    pub total_percent: f64,
    /// "纯偏印", "官杀混杂", ...
    pub mix_label: String,
    pub detail: Vec<TraitDetail>,
}

/// Dominant character traits from the year, month and hour stems plus the
/// four branch main stems, sorted by share (descending).
///
/// Percentages are rounded to one decimal.
pub fn dominant_traits(chart: &Chart) -> Vec<Trait> {
    const ORDER: [TenGodCategory; 5] = [
        TenGodCategory::Resource,
        TenGodCategory::Wealth,
        TenGodCategory::Officer,
        TenGodCategory::Output,
        TenGodCategory::Companion,
    ];

    let day = chart.day_master();
    // (god, weight, from_stem)
    let mut slots: Vec<(TenGod, f64, bool)> = Vec::with_capacity(7);
    for pos in [PillarPosition::Year, PillarPosition::Month, PillarPosition::Hour] {
        let w = pos.stem_weight();
        if w > 0.0 {
            slots.push((ten_god(day, chart.stem(pos)), w, true));
        }
    }
    for pos in ALL_PILLARS {
        let w = pos.branch_weight();
        if w > 0.0 {
            slots.push((branch_ten_god(day, chart.branch(pos)), w, false));
        }
    }

    let total: f64 = slots.iter().map(|s| s.1).sum();
    if total <= 0.0 {
        return Vec::new();
    }
    let pct = |w: f64| round1(w / total * 100.0);

    let mut traits: Vec<Trait> = ORDER
        .iter()
        .filter_map(|&cat| {
            let cat_w: f64 = slots
                .iter()
                .filter(|s| s.0.category() == cat)
                .map(|s| s.1)
                .sum();
            if cat_w <= 0.0 {
                return None;
            }
            let detail: Vec<TraitDetail> = cat
                .members()
                .iter()
                .map(|&god| {
                    let stem_w: f64 = slots.iter().filter(|s| s.0 == god && s.2).map(|s| s.1).sum();
                    let branch_w: f64 =
                        slots.iter().filter(|s| s.0 == god && !s.2).map(|s| s.1).sum();
                    TraitDetail {
                        ten_god: god,
                        percent: pct(stem_w + branch_w),
                        stems_visible_count: slots.iter().filter(|s| s.0 == god && s.2).count()
                            as u32,
                        stems_percent: pct(stem_w),
                        branches_percent: pct(branch_w),
                    }
                })
                .collect();
            let present: Vec<TenGod> = cat
                .members()
                .into_iter()
                .filter(|&g| slots.iter().any(|s| s.0 == g))
                .collect();
            Some(Trait {
                category: cat,
                total_percent: pct(cat_w),
                mix_label: mix_label(cat, &present),
                detail,
            })
        })
        .collect();

    // Stable sort keeps the fixed category order on ties.
    traits.sort_by(|a, b| b.total_percent.total_cmp(&a.total_percent));
    traits
}

fn mix_label(cat: TenGodCategory, present: &[TenGod]) -> String {
    match present {
        [only] => format!("纯{only}"),
        [] => cat.name().to_string(),
        _ => match cat {
            TenGodCategory::Resource => "正偏印混杂".to_string(),
            TenGodCategory::Wealth => "正偏财混杂".to_string(),
            _ => format!("{cat}混杂"),
        },
    }
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}
