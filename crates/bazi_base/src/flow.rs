//! Flowing units (luck cycle, year) and event roles shared by the detectors.

use serde::Serialize;

use crate::chart::PillarPosition;
use crate::ganzhi::{Branch, GanZhi, Stem};

/// Where a flowing branch comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FlowSource {
    /// A branch of the natal chart acting against the rest of the chart.
    Natal { pillar: PillarPosition },
    /// A ten-year luck cycle.
    Cycle { index: usize },
    /// A calendar year.
    Year { year: i32 },
}

/// A flowing stem-branch acting on the natal chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Flow {
    pub source: FlowSource,
    /// Only used for the stem-clash bonus; natal flows carry none.
    pub stem: Option<Stem>,
    pub branch: Branch,
}

impl Flow {
    pub const fn natal(pillar: PillarPosition, branch: Branch) -> Self {
        Self {
            source: FlowSource::Natal { pillar },
            stem: None,
            branch,
        }
    }

    pub const fn cycle(index: usize, gz: GanZhi) -> Self {
        Self {
            source: FlowSource::Cycle { index },
            stem: Some(gz.stem),
            branch: gz.branch,
        }
    }

    pub const fn year(year: i32, gz: GanZhi) -> Self {
        Self {
            source: FlowSource::Year { year },
            stem: Some(gz.stem),
            branch: gz.branch,
        }
    }

    pub const fn is_natal(&self) -> bool {
        matches!(self.source, FlowSource::Natal { .. })
    }
}

/// How an event takes part in scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Scored directly; eligible to trigger the line-fortune bonus.
    Base,
    /// Descriptive only, never scored.
    Explain,
    /// A natal or cycle structure re-activated by the year.
    Activation,
    /// A year-level bonus layered on top of base events.
    Bonus,
}
