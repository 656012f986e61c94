//! Heavenly stems, earthly branches and the sexagenary (jiazi) cycle.
//!
//! Stem indices run 甲=0 .. 癸=9, branch indices 子=0 .. 亥=11. A stem-branch
//! pair is only valid when both indices share parity, which gives the 60
//! combinations of the cycle (index 0 = 甲子).

use serde::{Serialize, Serializer};

use crate::element::Element;
use crate::error::ChartError;

/// Yin/yang polarity of a stem or branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Yang,
    Yin,
}

// ---------------------------------------------------------------------------
// Stems
// ---------------------------------------------------------------------------

/// The ten heavenly stems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stem {
    Jia,
    Yi,
    Bing,
    Ding,
    Wu,
    Ji,
    Geng,
    Xin,
    Ren,
    Gui,
}

/// All 10 stems in order (index 0 = 甲).
pub const ALL_STEMS: [Stem; 10] = [
    Stem::Jia,
    Stem::Yi,
    Stem::Bing,
    Stem::Ding,
    Stem::Wu,
    Stem::Ji,
    Stem::Geng,
    Stem::Xin,
    Stem::Ren,
    Stem::Gui,
];

const STEM_CHARS: [char; 10] = ['甲', '乙', '丙', '丁', '戊', '己', '庚', '辛', '壬', '癸'];

impl Stem {
    /// 0-based index (甲 = 0).
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Stem from an index, wrapping modulo 10.
    pub const fn from_index(i: i64) -> Self {
        ALL_STEMS[i.rem_euclid(10) as usize]
    }

    /// Chinese character.
    pub const fn to_char(self) -> char {
        STEM_CHARS[self as usize]
    }

    pub fn from_char(c: char) -> Option<Self> {
        STEM_CHARS.iter().position(|&s| s == c).map(|i| ALL_STEMS[i])
    }

    pub const fn element(self) -> Element {
        match self {
            Self::Jia | Self::Yi => Element::Wood,
            Self::Bing | Self::Ding => Element::Fire,
            Self::Wu | Self::Ji => Element::Earth,
            Self::Geng | Self::Xin => Element::Metal,
            Self::Ren | Self::Gui => Element::Water,
        }
    }

    pub const fn polarity(self) -> Polarity {
        if self.index() % 2 == 0 {
            Polarity::Yang
        } else {
            Polarity::Yin
        }
    }

    pub const fn is_yang(self) -> bool {
        self.index() % 2 == 0
    }
}

impl std::fmt::Display for Stem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl Serialize for Stem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.to_char())
    }
}

impl TryFrom<char> for Stem {
    type Error = ChartError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Self::from_char(c).ok_or(ChartError::InvalidStem(c))
    }
}

// ---------------------------------------------------------------------------
// Branches
// ---------------------------------------------------------------------------

/// The twelve earthly branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Branch {
    Zi,
    Chou,
    Yin,
    Mao,
    Chen,
    Si,
    Wu,
    Wei,
    Shen,
    You,
    Xu,
    Hai,
}

/// All 12 branches in order (index 0 = 子).
pub const ALL_BRANCHES: [Branch; 12] = [
    Branch::Zi,
    Branch::Chou,
    Branch::Yin,
    Branch::Mao,
    Branch::Chen,
    Branch::Si,
    Branch::Wu,
    Branch::Wei,
    Branch::Shen,
    Branch::You,
    Branch::Xu,
    Branch::Hai,
];

const BRANCH_CHARS: [char; 12] = [
    '子', '丑', '寅', '卯', '辰', '巳', '午', '未', '申', '酉', '戌', '亥',
];

impl Branch {
    /// 0-based index (子 = 0).
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Branch from an index, wrapping modulo 12.
    pub const fn from_index(i: i64) -> Self {
        ALL_BRANCHES[i.rem_euclid(12) as usize]
    }

    pub const fn to_char(self) -> char {
        BRANCH_CHARS[self as usize]
    }

    pub fn from_char(c: char) -> Option<Self> {
        BRANCH_CHARS
            .iter()
            .position(|&b| b == c)
            .map(|i| ALL_BRANCHES[i])
    }

    /// The main (principal) stem held by this branch.
    pub const fn main_stem(self) -> Stem {
        match self {
            Self::Zi => Stem::Gui,
            Self::Chou => Stem::Ji,
            Self::Yin => Stem::Jia,
            Self::Mao => Stem::Yi,
            Self::Chen => Stem::Wu,
            Self::Si => Stem::Bing,
            Self::Wu => Stem::Ding,
            Self::Wei => Stem::Ji,
            Self::Shen => Stem::Geng,
            Self::You => Stem::Xin,
            Self::Xu => Stem::Wu,
            Self::Hai => Stem::Ren,
        }
    }

    /// Element of the branch. Always equal to the element of its main stem.
    pub const fn element(self) -> Element {
        self.main_stem().element()
    }

    /// The branch six positions away.
    pub const fn clash_partner(self) -> Self {
        Self::from_index(self.index() as i64 + 6)
    }
}

impl std::fmt::Display for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl Serialize for Branch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.to_char())
    }
}

impl TryFrom<char> for Branch {
    type Error = ChartError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Self::from_char(c).ok_or(ChartError::InvalidBranch(c))
    }
}

// ---------------------------------------------------------------------------
// Stem-branch pairs
// ---------------------------------------------------------------------------

/// A stem-branch pair, one position of the sexagenary cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GanZhi {
    pub stem: Stem,
    pub branch: Branch,
}

impl GanZhi {
    pub const fn new(stem: Stem, branch: Branch) -> Self {
        Self { stem, branch }
    }

    /// Pair at position `i` of the 60 cycle (wraps; 0 = 甲子).
    pub const fn from_cycle_index(i: i64) -> Self {
        let i = i.rem_euclid(60);
        Self {
            stem: Stem::from_index(i),
            branch: Branch::from_index(i),
        }
    }

    /// Position in the 60 cycle.
    pub const fn cycle_index(self) -> u8 {
        let s = self.stem.index() as i64;
        let b = self.branch.index() as i64;
        // Chinese remainder: i ≡ s (mod 10), i ≡ b (mod 12).
        ((6 * s - 5 * b).rem_euclid(60)) as u8
    }

    /// Parse a two-character stem-branch string such as "甲子".
    ///
    /// Mixed-parity pairs (for example "甲丑") are rejected.
    pub fn parse(text: &str) -> Result<Self, ChartError> {
        let mut chars = text.trim().chars();
        let (Some(s), Some(b), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(ChartError::MalformedGanZhi(text.to_string()));
        };
        let stem = Stem::try_from(s)?;
        let branch = Branch::try_from(b)?;
        if stem.index() % 2 != branch.index() % 2 {
            return Err(ChartError::MalformedGanZhi(text.to_string()));
        }
        Ok(Self { stem, branch })
    }

    /// Parse a possibly blank stem-branch string; blank input yields `None`.
    pub fn parse_optional(text: &str) -> Result<Option<Self>, ChartError> {
        if text.trim().is_empty() {
            Ok(None)
        } else {
            Self::parse(text).map(Some)
        }
    }
}

impl std::fmt::Display for GanZhi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.stem, self.branch)
    }
}

impl Serialize for GanZhi {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
