//! Fixed rule tables: position weights, relation coefficients, harmony
//! groups, clash and punishment pairs, and the flat risk constants.
//!
//! These are domain data, not user policy. Nothing here is configurable.

use serde::Serialize;

use crate::element::Element;
use crate::ganzhi::Branch;

// ---------------------------------------------------------------------------
// Position weights (percent)
// ---------------------------------------------------------------------------

/// Stem weights in year, month, day, hour order. The day stem is the day master.
pub const STEM_WEIGHTS: [f64; 4] = [10.0, 10.0, 0.0, 10.0];

/// Branch weights in year, month, day, hour order.
pub const BRANCH_WEIGHTS: [f64; 4] = [10.0, 35.0, 10.0, 15.0];

// ---------------------------------------------------------------------------
// Day-master relations
// ---------------------------------------------------------------------------

/// How another element relates to the day master's element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    /// Same element.
    Same,
    /// Generates the day master.
    Resource,
    /// Generated by the day master.
    Output,
    /// Overcome by the day master.
    Wealth,
    /// Overcomes the day master.
    Officer,
}

impl Relation {
    pub fn between(day: Element, other: Element) -> Self {
        if other == day {
            Self::Same
        } else if other.generates() == day {
            Self::Resource
        } else if day.generates() == other {
            Self::Output
        } else if day.overcomes() == other {
            Self::Wealth
        } else {
            Self::Officer
        }
    }

    /// Signed contribution to day-master strength.
    pub const fn coefficient(self) -> f64 {
        match self {
            Self::Same => 1.0,
            Self::Resource => 0.8,
            Self::Output => -0.6,
            Self::Wealth => -0.8,
            Self::Officer => -1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Clash
// ---------------------------------------------------------------------------

/// Extra risk when two storehouse branches clash (辰戌, 丑未).
pub const TOMB_CLASH_BONUS: f64 = 5.0;

/// Stem-clash bonus unit. Day pillar takes twice this, year pillar none.
pub const STEM_CLASH_BONUS: f64 = 10.0;

/// Fixed risk of a natal pillar pair whose stems and branches both clash.
pub const NATAL_STEM_CLASH_RISK: f64 = 10.0;

/// Base risk of a luck-cycle branch clashing the year branch.
pub const CYCLE_YEAR_CLASH_BASE: f64 = 10.0;

/// Extra risk when the cycle and year stems also overcome one another.
pub const CYCLE_YEAR_STEM_CLASH_BONUS: f64 = 10.0;

/// Clash risk cap per event.
pub const CLASH_RISK_CAP: f64 = 100.0;

/// True for the two storehouse clashes 辰戌 and 丑未 (either order).
pub const fn is_tomb_clash(a: Branch, b: Branch) -> bool {
    matches!(
        (a, b),
        (Branch::Chen, Branch::Xu)
            | (Branch::Xu, Branch::Chen)
            | (Branch::Chou, Branch::Wei)
            | (Branch::Wei, Branch::Chou)
    )
}

pub const fn is_clash(a: Branch, b: Branch) -> bool {
    a.clash_partner() as u8 == b as u8
}

// ---------------------------------------------------------------------------
// Punishment
// ---------------------------------------------------------------------------

/// Punishment category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PunishmentKind {
    /// 子卯, 寅巳, 巳申, 申寅.
    Normal,
    /// 丑戌, 戌未, 未丑.
    Tomb,
    /// 辰辰, 午午, 酉酉, 亥亥.
    SelfPunishment,
}

impl PunishmentKind {
    /// Flat risk of one punishment event.
    pub const fn risk_percent(self) -> f64 {
        match self {
            Self::Normal => 5.0,
            Self::Tomb => 6.0,
            Self::SelfPunishment => 5.0,
        }
    }
}

/// Punishment category between two branches, if any. Symmetric.
///
/// 辰未 is not a punishment.
pub const fn punishment_kind(a: Branch, b: Branch) -> Option<PunishmentKind> {
    use Branch::*;
    match (a, b) {
        (Zi, Mao) | (Mao, Zi) | (Yin, Si) | (Si, Yin) | (Si, Shen) | (Shen, Si) | (Shen, Yin)
        | (Yin, Shen) => Some(PunishmentKind::Normal),
        (Chou, Xu) | (Xu, Chou) | (Xu, Wei) | (Wei, Xu) | (Wei, Chou) | (Chou, Wei) => {
            Some(PunishmentKind::Tomb)
        }
        (Chen, Chen) | (Wu, Wu) | (You, You) | (Hai, Hai) => Some(PunishmentKind::SelfPunishment),
        _ => None,
    }
}

/// Every branch punished by `flow`, with the category, in branch order.
pub fn punishment_targets(flow: Branch) -> Vec<(Branch, PunishmentKind)> {
    crate::ganzhi::ALL_BRANCHES
        .into_iter()
        .filter_map(|t| punishment_kind(flow, t).map(|k| (t, k)))
        .collect()
}

// ---------------------------------------------------------------------------
// Harmony
// ---------------------------------------------------------------------------

/// Six-harmony partner: 子丑, 寅亥, 卯戌, 辰酉, 巳申, 午未.
pub const fn six_harmony_partner(b: Branch) -> Branch {
    use Branch::*;
    match b {
        Zi => Chou,
        Chou => Zi,
        Yin => Hai,
        Hai => Yin,
        Mao => Xu,
        Xu => Mao,
        Chen => You,
        You => Chen,
        Si => Shen,
        Shen => Si,
        Wu => Wei,
        Wei => Wu,
    }
}

/// A fixed three-branch grouping with the element it forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BranchGroup {
    /// Members in canonical order. For three-harmony groups the center is `members[1]`.
    pub members: [Branch; 3],
    pub element: Element,
}

impl BranchGroup {
    pub const fn center(&self) -> Branch {
        self.members[1]
    }

    pub fn contains(&self, b: Branch) -> bool {
        self.members.contains(&b)
    }

    /// Members as a string, e.g. "申子辰".
    pub fn label(&self) -> String {
        self.members.iter().map(|b| b.to_char()).collect()
    }
}

/// Three-harmony groups (edge, center, edge).
pub const THREE_HARMONY_GROUPS: [BranchGroup; 4] = [
    BranchGroup {
        members: [Branch::Shen, Branch::Zi, Branch::Chen],
        element: Element::Water,
    },
    BranchGroup {
        members: [Branch::Hai, Branch::Mao, Branch::Wei],
        element: Element::Wood,
    },
    BranchGroup {
        members: [Branch::Yin, Branch::Wu, Branch::Xu],
        element: Element::Fire,
    },
    BranchGroup {
        members: [Branch::Si, Branch::You, Branch::Chou],
        element: Element::Metal,
    },
];

/// Seasonal three-meeting groups.
pub const THREE_MEETING_GROUPS: [BranchGroup; 4] = [
    BranchGroup {
        members: [Branch::Yin, Branch::Mao, Branch::Chen],
        element: Element::Wood,
    },
    BranchGroup {
        members: [Branch::Si, Branch::Wu, Branch::Wei],
        element: Element::Fire,
    },
    BranchGroup {
        members: [Branch::Shen, Branch::You, Branch::Xu],
        element: Element::Metal,
    },
    BranchGroup {
        members: [Branch::Hai, Branch::Zi, Branch::Chou],
        element: Element::Water,
    },
];

// ---------------------------------------------------------------------------
// Patterns, activation and bonuses
// ---------------------------------------------------------------------------

/// Risk of a ten-god pattern formed by the year.
pub const YEAR_PATTERN_RISK: f64 = 15.0;

/// Year pattern risk when the pattern's element is useful (optional discount).
pub const YEAR_PATTERN_RISK_USEFUL: f64 = 10.0;

/// Risk of a ten-god pattern formed by the luck cycle.
pub const CYCLE_PATTERN_RISK: f64 = 15.0;

/// Cycle branch-layer pattern risk when it pairs with the natal month branch.
pub const CYCLE_PATTERN_RISK_MONTH: f64 = 25.0;

/// Extra clash risk when a branch pattern coincides with the clash.
pub const PATTERN_CLASH_OVERLAP_BONUS: f64 = 10.0;

/// Risk per natal or cycle pattern re-activated by the year.
pub const STATIC_PATTERN_RISK: f64 = 10.0;

/// Share of the original risk carried by a static activation.
pub const STATIC_ACTIVATION_FACTOR: f64 = 0.5;

/// Clash bonus when one side belongs to a complete three-harmony or meeting group.
pub const GROUP_CLASH_BONUS_ONE_SIDE: f64 = 15.0;

/// Clash bonus when both sides belong to complete groups.
pub const GROUP_CLASH_BONUS_BOTH_SIDES: f64 = 35.0;

/// Line-fortune bonus.
pub const LINE_FORTUNE_BONUS: f64 = 6.0;

/// Minimum base-event risk that triggers the line-fortune bonus.
pub const LINE_FORTUNE_THRESHOLD: f64 = 10.0;
