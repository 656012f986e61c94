//! Risk scoring and luck-timeline orchestration for BaZi charts.
//!
//! This crate provides:
//! - A tagged [`Event`] model wrapping the `bazi_base` detectors
//! - Year scoring: overlap, static activation, group-clash bonus, line fortune
//! - Luck-cycle scoring and labels
//! - [`analyze_luck`], [`analyze_natal`] and [`analyze_complete`]

pub mod cycle;
pub mod error;
pub mod event;
pub mod labels;
pub mod luck;
pub mod luck_types;
pub mod natal;
pub mod scoring;

pub use cycle::{analyze_cycle, summarize_years};
pub use error::EngineError;
pub use event::{
    ActivatedPair, ClashPartner, ClashTrigger, CycleYearClashEvent, Event, GroupClashBonusEvent,
    LineFortuneEvent, NatalClashActivationEvent, PatternActivationEvent,
    StaticClashActivationEvent, StaticPunishmentActivationEvent, StructureSource, side_risk,
};
pub use labels::{
    CycleLabel, HalfLabel, HalfLabels, YearLabel, YearVerdict, cycle_label, half_label,
    year_verdict,
};
pub use luck::{analyze_luck, chart_from_raw, luck_from_cycles, turning_points};
pub use luck_types::{
    CycleRecord, DEFAULT_MAX_CYCLES, LuckAnalysis, LuckGroup, LuckOptions, ScoringOptions,
    TurningPoint, YearRecord,
};
pub use natal::{
    CategoryShare, CompleteAnalysis, ElementShare, NatalAnalysis, analyze_complete, analyze_natal,
};
pub use scoring::{
    NatalBasis, active_palace, detect_cycle_year_clash, group_clash_bonus, line_fortune,
    natal_clash_activation, pattern_activations, score_year, static_clash_activation,
    static_punishment_activation,
};
