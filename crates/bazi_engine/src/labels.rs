//! Verdict labels for half-years, years and luck cycles.

use serde::Serialize;

/// Year risk at or above which the whole year is flagged.
pub const YEAR_SEVERE_THRESHOLD: f64 = 40.0;
/// Year risk at or above which the year is notable and halves are not labelled.
pub const YEAR_NOTABLE_THRESHOLD: f64 = 25.0;
/// Half risk at or below which the half is calm.
pub const HALF_CALM_THRESHOLD: f64 = 10.0;
/// Half risk below which the half only fluctuates.
pub const HALF_FLUCTUATION_THRESHOLD: f64 = 20.0;
/// Cycle risk below which a useful-branch cycle is good.
pub const CYCLE_GOOD_THRESHOLD: f64 = 30.0;
/// Cycle risk up to which a non-useful-branch cycle is average.
pub const CYCLE_AVERAGE_THRESHOLD: f64 = 15.0;

// ---------------------------------------------------------------------------
// Half-year
// ---------------------------------------------------------------------------

/// Verdict for one half of a year (stem half first, branch half second).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HalfLabel {
    Favorable,
    Neutral,
    MinorFluctuation,
    Inauspicious,
}

impl HalfLabel {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Favorable => "好运",
            Self::Neutral => "一般",
            Self::MinorFluctuation => "有小波动",
            Self::Inauspicious => "凶（有困难或意外）",
        }
    }
}

/// Half label from the side's risk and whether that half's element is useful.
pub fn half_label(risk_percent: f64, useful: bool) -> HalfLabel {
    if risk_percent <= HALF_CALM_THRESHOLD {
        if useful {
            HalfLabel::Favorable
        } else {
            HalfLabel::Neutral
        }
    } else if risk_percent < HALF_FLUCTUATION_THRESHOLD {
        HalfLabel::MinorFluctuation
    } else {
        HalfLabel::Inauspicious
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HalfLabels {
    pub first_half: HalfLabel,
    pub second_half: HalfLabel,
}

// ---------------------------------------------------------------------------
// Year
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum YearLabel {
    InauspiciousAllYear,
    NotableButSurmountable,
    Favorable,
    Inauspicious,
    Mixed,
}

impl YearLabel {
    pub const fn name(self) -> &'static str {
        match self {
            Self::InauspiciousAllYear => "全年不利",
            Self::NotableButSurmountable => "有明显变动但可克服",
            Self::Favorable => "好运",
            Self::Inauspicious => "凶",
            Self::Mixed => "好坏参半",
        }
    }
}

/// A year's verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearVerdict {
    pub label: YearLabel,
    /// Only present below the notable threshold.
    pub half_labels: Option<HalfLabels>,
    pub risk_management: bool,
}

/// Label a year from its total and the two half labels.
pub fn year_verdict(total_risk: f64, halves: HalfLabels) -> YearVerdict {
    if total_risk >= YEAR_SEVERE_THRESHOLD {
        return YearVerdict {
            label: YearLabel::InauspiciousAllYear,
            half_labels: None,
            risk_management: true,
        };
    }
    if total_risk >= YEAR_NOTABLE_THRESHOLD {
        return YearVerdict {
            label: YearLabel::NotableButSurmountable,
            half_labels: None,
            risk_management: false,
        };
    }
    let label = match (halves.first_half, halves.second_half) {
        (HalfLabel::Favorable, HalfLabel::Favorable) => YearLabel::Favorable,
        (HalfLabel::Inauspicious, HalfLabel::Inauspicious) => YearLabel::Inauspicious,
        _ => YearLabel::Mixed,
    };
    YearVerdict {
        label,
        half_labels: Some(halves),
        risk_management: false,
    }
}

// ---------------------------------------------------------------------------
// Luck cycle
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleLabel {
    Good,
    /// Useful branch, but too much movement.
    BadOverheated,
    Average,
    AverageWithChange,
    Bad,
}

impl CycleLabel {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Good => "好运",
            Self::BadOverheated => "坏运（用神过旺/变动过大）",
            Self::Average => "一般",
            Self::AverageWithChange => "一般（有变动）",
            Self::Bad => "坏运",
        }
    }
}

/// Cycle label, led by whether the cycle branch is useful.
pub fn cycle_label(branch_useful: bool, total_risk: f64) -> CycleLabel {
    if branch_useful {
        if total_risk < CYCLE_GOOD_THRESHOLD {
            CycleLabel::Good
        } else {
            CycleLabel::BadOverheated
        }
    } else if total_risk <= CYCLE_AVERAGE_THRESHOLD {
        CycleLabel::Average
    } else if total_risk <= CYCLE_GOOD_THRESHOLD {
        CycleLabel::AverageWithChange
    } else {
        CycleLabel::Bad
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn halves(first: HalfLabel, second: HalfLabel) -> HalfLabels {
        HalfLabels {
            first_half: first,
            second_half: second,
        }
    }

    #[test]
    fn half_boundaries() {
        assert_eq!(half_label(10.0, true), HalfLabel::Favorable);
        assert_eq!(half_label(10.0, false), HalfLabel::Neutral);
        assert_eq!(half_label(10.5, true), HalfLabel::MinorFluctuation);
        assert_eq!(half_label(19.9, false), HalfLabel::MinorFluctuation);
        assert_eq!(half_label(20.0, true), HalfLabel::Inauspicious);
    }

    #[test]
    fn severe_year_flags_risk_management() {
        let v = year_verdict(40.0, halves(HalfLabel::Favorable, HalfLabel::Favorable));
        assert_eq!(v.label, YearLabel::InauspiciousAllYear);
        assert!(v.risk_management);
        assert!(v.half_labels.is_none());
    }

    #[test]
    fn notable_year_drops_halves() {
        let v = year_verdict(25.0, halves(HalfLabel::Neutral, HalfLabel::Inauspicious));
        assert_eq!(v.label, YearLabel::NotableButSurmountable);
        assert!(!v.risk_management);
        assert!(v.half_labels.is_none());
    }

    #[test]
    fn calm_year_combines_halves() {
        let fav = year_verdict(0.0, halves(HalfLabel::Favorable, HalfLabel::Favorable));
        assert_eq!(fav.label, YearLabel::Favorable);
        assert!(fav.half_labels.is_some());

        let mixed = year_verdict(12.0, halves(HalfLabel::Favorable, HalfLabel::MinorFluctuation));
        assert_eq!(mixed.label, YearLabel::Mixed);

        let neutral = year_verdict(0.0, halves(HalfLabel::Neutral, HalfLabel::Favorable));
        assert_eq!(neutral.label, YearLabel::Mixed);
    }

    #[test]
    fn cycle_label_is_branch_led() {
        assert_eq!(cycle_label(true, 29.0), CycleLabel::Good);
        assert_eq!(cycle_label(true, 30.0), CycleLabel::BadOverheated);
        assert_eq!(cycle_label(false, 15.0), CycleLabel::Average);
        assert_eq!(cycle_label(false, 30.0), CycleLabel::AverageWithChange);
        assert_eq!(cycle_label(false, 30.5), CycleLabel::Bad);
    }
}
