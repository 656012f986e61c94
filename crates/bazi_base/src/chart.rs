//! Four-pillar chart model.

use serde::Serialize;

use crate::error::ChartError;
use crate::ganzhi::{Branch, GanZhi, Stem};
use crate::tables::{BRANCH_WEIGHTS, STEM_WEIGHTS};

/// One of the four pillars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PillarPosition {
    Year,
    Month,
    Day,
    Hour,
}

/// All 4 pillars in chart order.
pub const ALL_PILLARS: [PillarPosition; 4] = [
    PillarPosition::Year,
    PillarPosition::Month,
    PillarPosition::Day,
    PillarPosition::Hour,
];

impl PillarPosition {
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Lowercase English key ("year", "month", ...).
    pub const fn key(self) -> &'static str {
        match self {
            Self::Year => "year",
            Self::Month => "month",
            Self::Day => "day",
            Self::Hour => "hour",
        }
    }

    /// Life palace represented by the pillar.
    pub const fn palace(self) -> &'static str {
        match self {
            Self::Year => "祖上宫",
            Self::Month => "婚姻宫",
            Self::Day => "夫妻宫",
            Self::Hour => "事业家庭宫",
        }
    }

    /// Position weight (percent) of the stem slot.
    pub const fn stem_weight(self) -> f64 {
        STEM_WEIGHTS[self as usize]
    }

    /// Position weight (percent) of the branch slot.
    pub const fn branch_weight(self) -> f64 {
        BRANCH_WEIGHTS[self as usize]
    }
}

/// Stem row or branch row of the chart.
///
/// Also used to attribute risk to the stem half or branch half of a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    Stem,
    Branch,
}

/// The four pillars of a birth chart. Immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chart {
    pillars: [GanZhi; 4],
}

impl Chart {
    pub const fn new(year: GanZhi, month: GanZhi, day: GanZhi, hour: GanZhi) -> Self {
        Self {
            pillars: [year, month, day, hour],
        }
    }

    /// Build from four stem-branch strings in year, month, day, hour order.
    pub fn parse(year: &str, month: &str, day: &str, hour: &str) -> Result<Self, ChartError> {
        Ok(Self::new(
            GanZhi::parse(year)?,
            GanZhi::parse(month)?,
            GanZhi::parse(day)?,
            GanZhi::parse(hour)?,
        ))
    }

    pub const fn pillar(&self, pos: PillarPosition) -> GanZhi {
        self.pillars[pos as usize]
    }

    pub const fn stem(&self, pos: PillarPosition) -> Stem {
        self.pillars[pos as usize].stem
    }

    pub const fn branch(&self, pos: PillarPosition) -> Branch {
        self.pillars[pos as usize].branch
    }

    /// The day stem.
    pub const fn day_master(&self) -> Stem {
        self.pillars[PillarPosition::Day as usize].stem
    }

    /// Pillars in chart order with their positions.
    pub fn iter(&self) -> impl Iterator<Item = (PillarPosition, GanZhi)> + '_ {
        ALL_PILLARS.iter().map(|&p| (p, self.pillar(p)))
    }

    /// Positions whose branch equals `branch`, in chart order.
    pub fn pillars_with_branch(&self, branch: Branch) -> Vec<PillarPosition> {
        ALL_PILLARS
            .into_iter()
            .filter(|&p| self.branch(p) == branch)
            .collect()
    }

    pub fn has_branch(&self, branch: Branch) -> bool {
        self.pillars.iter().any(|gz| gz.branch == branch)
    }

    /// Unordered pillar pairs (i < j) in chart order.
    pub fn pillar_pairs() -> impl Iterator<Item = (PillarPosition, PillarPosition)> {
        (0..4).flat_map(|i| ((i + 1)..4).map(move |j| (ALL_PILLARS[i], ALL_PILLARS[j])))
    }
}

impl std::fmt::Display for Chart {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let [y, m, d, h] = self.pillars;
        write!(f, "{y} {m} {d} {h}")
    }
}

#[derive(Serialize)]
struct ChartRecord {
    year: GanZhi,
    month: GanZhi,
    day: GanZhi,
    hour: GanZhi,
}

impl Serialize for Chart {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let [year, month, day, hour] = self.pillars;
        ChartRecord {
            year,
            month,
            day,
            hour,
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_access() {
        let chart = Chart::parse("丙戌", "辛丑", "壬戌", "丙午").unwrap();
        assert_eq!(chart.day_master(), Stem::Ren);
        assert_eq!(chart.branch(PillarPosition::Month), Branch::Chou);
        assert_eq!(chart.to_string(), "丙戌 辛丑 壬戌 丙午");
    }

    #[test]
    fn parse_rejects_invalid() {
        assert_eq!(
            Chart::parse("丙戌", "辛丑", "壬?", "丙午"),
            Err(ChartError::InvalidBranch('?'))
        );
    }

    #[test]
    fn pillars_with_branch_in_order() {
        let chart = Chart::parse("丙戌", "辛丑", "壬戌", "丙午").unwrap();
        assert_eq!(
            chart.pillars_with_branch(Branch::Xu),
            vec![PillarPosition::Year, PillarPosition::Day]
        );
        assert!(chart.pillars_with_branch(Branch::Zi).is_empty());
    }

    #[test]
    fn six_pillar_pairs() {
        let pairs: Vec<_> = Chart::pillar_pairs().collect();
        assert_eq!(pairs.len(), 6);
        assert_eq!(pairs[0], (PillarPosition::Year, PillarPosition::Month));
        assert_eq!(pairs[5], (PillarPosition::Day, PillarPosition::Hour));
    }

    #[test]
    fn weights_sum_to_one_hundred() {
        let total: f64 = ALL_PILLARS
            .iter()
            .map(|p| p.stem_weight() + p.branch_weight())
            .sum();
        assert!((total - 100.0).abs() < 1e-9);
    }
}
