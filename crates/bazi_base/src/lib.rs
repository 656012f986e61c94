//! Core BaZi (Four Pillars) chart model and relation detection.
//!
//! This crate holds the pure, calendar-free part of the engine:
//! - Heavenly stems, earthly branches and the sexagenary cycle
//! - Ten-god classification, day-master strength and useful elements
//! - Branch clashes, punishments, harmonies and ten-god patterns
//!
//! Scoring of years and luck cycles lives in `bazi_engine`; converting
//! civil dates into pillars lives in `bazi_calendar`.

pub mod chart;
pub mod clash;
pub mod element;
pub mod error;
pub mod flow;
pub mod ganzhi;
pub mod harmony;
pub mod pattern;
pub mod punishment;
pub mod strength;
pub mod tables;
pub mod ten_god;
pub mod useful;

pub use chart::{ALL_PILLARS, Chart, Layer, PillarPosition};
pub use clash::{
    ClashEvent, Impact, NatalStemClashEvent, PillarHit, StemClashHit, Suggestion,
    detect_branch_clash, detect_natal_clashes, detect_natal_stem_clashes,
};
pub use element::{ALL_ELEMENTS, Element};
pub use error::ChartError;
pub use flow::{Flow, FlowSource, Role};
pub use ganzhi::{ALL_BRANCHES, ALL_STEMS, Branch, GanZhi, Polarity, Stem};
pub use harmony::{
    CompleteGroup, GroupKind, GroupMember, GroupSource, HarmonyEvent, HarmonyKind,
    HarmonyTarget, complete_groups, detect_flow_harmonies, detect_natal_harmonies,
};
pub use pattern::{
    PatternEvent, PatternGroup, PatternPair, PatternPosition, PatternType, PositionSource,
    detect_cycle_patterns, detect_natal_patterns, detect_year_patterns,
};
pub use punishment::{
    NatalConflicts, PunishmentEvent, detect_branch_punishments,
    detect_natal_clashes_and_punishments, without_clash_overlap,
};
pub use strength::{DayMasterStrength, day_master_strength};
pub use tables::PunishmentKind;
pub use ten_god::{
    ALL_CATEGORIES, StemPattern, TenGod, TenGodCategory, Trait, TraitDetail, branch_ten_god,
    category_percentages, dominant_traits, stem_pattern_summary, ten_god,
};
pub use useful::{
    SpecialRule, UsefulElements, UsefulExplain, UsefulToken, global_element_distribution,
    select_useful_elements,
};
