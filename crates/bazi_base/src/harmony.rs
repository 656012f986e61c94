//! Branch harmonies: six-harmony, three-harmony (full and half) and
//! three-meeting. Purely descriptive; every event carries zero risk.

use serde::Serialize;

use crate::chart::{ALL_PILLARS, Chart, PillarPosition};
use crate::element::Element;
use crate::flow::{Flow, Role};
use crate::ganzhi::Branch;
use crate::tables::{BranchGroup, THREE_HARMONY_GROUPS, THREE_MEETING_GROUPS, six_harmony_partner};
use crate::ten_god::{TenGod, branch_ten_god};

/// Kind of harmony.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HarmonyKind {
    /// 六合
    SixHarmony,
    /// 三合
    ThreeHarmony,
    /// 半合
    HalfHarmony,
    /// 三会
    ThreeMeeting,
}

/// A natal pillar taking part in a harmony.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HarmonyTarget {
    pub pillar: PillarPosition,
    pub palace: &'static str,
    pub branch: Branch,
    pub position_weight: f64,
    pub ten_god: TenGod,
}

impl HarmonyTarget {
    fn new(chart: &Chart, pillar: PillarPosition) -> Self {
        let branch = chart.branch(pillar);
        Self {
            pillar,
            palace: pillar.palace(),
            branch,
            position_weight: pillar.branch_weight(),
            ten_god: branch_ten_god(chart.day_master(), branch),
        }
    }
}

/// One harmony grouping.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HarmonyEvent {
    pub kind: HarmonyKind,
    /// `None` for natal-internal harmonies.
    pub flow: Option<Flow>,
    /// Element formed by a three-harmony or meeting group.
    pub element: Option<Element>,
    /// Fixed members of the group (both branches for a six-harmony).
    pub members: Vec<Branch>,
    /// Branches that actually formed this grouping.
    pub matched: Vec<Branch>,
    pub targets: Vec<HarmonyTarget>,
    pub role: Role,
    pub risk_percent: f64,
}

impl HarmonyEvent {
    fn new(
        kind: HarmonyKind,
        flow: Option<Flow>,
        element: Option<Element>,
        members: Vec<Branch>,
        matched: Vec<Branch>,
        targets: Vec<HarmonyTarget>,
    ) -> Self {
        Self {
            kind,
            flow,
            element,
            members,
            matched,
            targets,
            role: Role::Explain,
            risk_percent: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Natal
// ---------------------------------------------------------------------------

/// Harmonies inside the natal chart, each physical grouping reported once.
pub fn detect_natal_harmonies(chart: &Chart) -> Vec<HarmonyEvent> {
    let mut events = Vec::new();

    let mut seen_six: Vec<(Branch, Branch)> = Vec::new();
    for (p1, p2) in Chart::pillar_pairs() {
        let (b1, b2) = (chart.branch(p1), chart.branch(p2));
        if six_harmony_partner(b1) != b2 {
            continue;
        }
        let key = if b1 <= b2 { (b1, b2) } else { (b2, b1) };
        if seen_six.contains(&key) {
            continue;
        }
        seen_six.push(key);
        events.push(HarmonyEvent::new(
            HarmonyKind::SixHarmony,
            None,
            None,
            vec![b1, b2],
            vec![b1, b2],
            vec![HarmonyTarget::new(chart, p1), HarmonyTarget::new(chart, p2)],
        ));
    }

    for group in &THREE_HARMONY_GROUPS {
        let found: Vec<PillarPosition> = ALL_PILLARS
            .into_iter()
            .filter(|&p| group.contains(chart.branch(p)))
            .collect();

        if distinct_count(chart, &found) == 3 {
            events.push(HarmonyEvent::new(
                HarmonyKind::ThreeHarmony,
                None,
                Some(group.element),
                group.members.to_vec(),
                found.iter().map(|&p| chart.branch(p)).collect(),
                found.iter().map(|&p| HarmonyTarget::new(chart, p)).collect(),
            ));
        }

        let [left, center, right] = group.members;
        for (a, b) in [(left, center), (center, right)] {
            for &p1 in found.iter().filter(|&&p| chart.branch(p) == a) {
                for &p2 in found.iter().filter(|&&p| chart.branch(p) == b) {
                    if p1 == p2 {
                        continue;
                    }
                    events.push(HarmonyEvent::new(
                        HarmonyKind::HalfHarmony,
                        None,
                        Some(group.element),
                        group.members.to_vec(),
                        vec![a, b],
                        vec![HarmonyTarget::new(chart, p1), HarmonyTarget::new(chart, p2)],
                    ));
                }
            }
        }
    }

    for group in &THREE_MEETING_GROUPS {
        let found: Vec<PillarPosition> = ALL_PILLARS
            .into_iter()
            .filter(|&p| group.contains(chart.branch(p)))
            .collect();
        if distinct_count(chart, &found) == 3 {
            events.push(HarmonyEvent::new(
                HarmonyKind::ThreeMeeting,
                None,
                Some(group.element),
                group.members.to_vec(),
                found.iter().map(|&p| chart.branch(p)).collect(),
                found.iter().map(|&p| HarmonyTarget::new(chart, p)).collect(),
            ));
        }
    }

    events
}

fn distinct_count(chart: &Chart, pillars: &[PillarPosition]) -> usize {
    let mut seen: Vec<Branch> = pillars.iter().map(|&p| chart.branch(p)).collect();
    seen.sort();
    seen.dedup();
    seen.len()
}

// ---------------------------------------------------------------------------
// Flow against natal
// ---------------------------------------------------------------------------

/// Harmonies formed by a flowing branch with the natal chart.
///
/// Six-harmony and half-harmony are reported once per natal pillar. Full
/// three-harmony and three-meeting cite the first pillar of each member.
pub fn detect_flow_harmonies(chart: &Chart, flow: Flow) -> Vec<HarmonyEvent> {
    let fb = flow.branch;
    let mut events = Vec::new();

    let partner = six_harmony_partner(fb);
    for p in chart.pillars_with_branch(partner) {
        events.push(HarmonyEvent::new(
            HarmonyKind::SixHarmony,
            Some(flow),
            None,
            vec![fb, partner],
            vec![fb, partner],
            vec![HarmonyTarget::new(chart, p)],
        ));
    }

    if let Some(group) = THREE_HARMONY_GROUPS.iter().find(|g| g.contains(fb)) {
        let others = other_members_in_chart(chart, group, fb);
        if let Some(full) = full_group_event(chart, flow, group, &others, HarmonyKind::ThreeHarmony) {
            events.push(full);
        }

        let [left, center, right] = group.members;
        let in_chart = |b: Branch| others.iter().any(|(ob, _)| *ob == b);
        let partner = if fb == left && in_chart(center) {
            Some(center)
        } else if fb == center && in_chart(left) {
            Some(left)
        } else if fb == center && in_chart(right) {
            Some(right)
        } else if fb == right && in_chart(center) {
            Some(center)
        } else {
            None
        };
        if let Some(other) = partner {
            for p in chart.pillars_with_branch(other) {
                events.push(HarmonyEvent::new(
                    HarmonyKind::HalfHarmony,
                    Some(flow),
                    Some(group.element),
                    group.members.to_vec(),
                    vec![fb, other],
                    vec![HarmonyTarget::new(chart, p)],
                ));
            }
        }
    }

    if let Some(group) = THREE_MEETING_GROUPS.iter().find(|g| g.contains(fb)) {
        let others = other_members_in_chart(chart, group, fb);
        if let Some(full) = full_group_event(chart, flow, group, &others, HarmonyKind::ThreeMeeting) {
            events.push(full);
        }
    }

    events
}

/// Group members other than `flow_branch` present in the chart, with the
/// first pillar holding each, in chart order of first appearance.
fn other_members_in_chart(
    chart: &Chart,
    group: &BranchGroup,
    flow_branch: Branch,
) -> Vec<(Branch, PillarPosition)> {
    let mut out: Vec<(Branch, PillarPosition)> = Vec::new();
    for (p, gz) in chart.iter() {
        if gz.branch != flow_branch
            && group.contains(gz.branch)
            && !out.iter().any(|(b, _)| *b == gz.branch)
        {
            out.push((gz.branch, p));
        }
    }
    out
}

fn full_group_event(
    chart: &Chart,
    flow: Flow,
    group: &BranchGroup,
    others: &[(Branch, PillarPosition)],
    kind: HarmonyKind,
) -> Option<HarmonyEvent> {
    if others.len() != 2 {
        return None;
    }
    let mut matched = vec![flow.branch];
    matched.extend(others.iter().map(|(b, _)| *b));
    Some(HarmonyEvent::new(
        kind,
        Some(flow),
        Some(group.element),
        group.members.to_vec(),
        matched,
        others.iter().map(|&(_, p)| HarmonyTarget::new(chart, p)).collect(),
    ))
}

// ---------------------------------------------------------------------------
// Complete groups across natal, cycle and year
// ---------------------------------------------------------------------------

/// Kind of complete grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupKind {
    ThreeHarmony,
    ThreeMeeting,
}

/// Where a member of a complete group comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum GroupSource {
    Natal { pillar: PillarPosition },
    Cycle,
    Year,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GroupMember {
    pub branch: Branch,
    #[serde(flatten)]
    pub source: GroupSource,
}

/// A three-harmony or three-meeting group with all three branches present.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompleteGroup {
    pub kind: GroupKind,
    pub element: Element,
    pub members: [Branch; 3],
    /// Every occurrence of every member, in group order.
    pub sources: Vec<GroupMember>,
}

impl CompleteGroup {
    pub fn contains(&self, b: Branch) -> bool {
        self.members.contains(&b)
    }
}

/// Complete groups formed by the natal branches plus an optional cycle branch
/// and an optional year branch.
pub fn complete_groups(
    chart: &Chart,
    cycle: Option<Branch>,
    year: Option<Branch>,
) -> Vec<CompleteGroup> {
    let kinds = THREE_HARMONY_GROUPS
        .iter()
        .map(|g| (GroupKind::ThreeHarmony, g))
        .chain(THREE_MEETING_GROUPS.iter().map(|g| (GroupKind::ThreeMeeting, g)));

    kinds
        .filter_map(|(kind, group)| {
            let mut sources = Vec::new();
            for &member in &group.members {
                for (p, gz) in chart.iter() {
                    if gz.branch == member {
                        sources.push(GroupMember {
                            branch: member,
                            source: GroupSource::Natal { pillar: p },
                        });
                    }
                }
                if cycle == Some(member) {
                    sources.push(GroupMember {
                        branch: member,
                        source: GroupSource::Cycle,
                    });
                }
                if year == Some(member) {
                    sources.push(GroupMember {
                        branch: member,
                        source: GroupSource::Year,
                    });
                }
            }
            let complete = group
                .members
                .iter()
                .all(|m| sources.iter().any(|s| s.branch == *m));
            complete.then(|| CompleteGroup {
                kind,
                element: group.element,
                members: group.members,
                sources,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ganzhi::GanZhi;

    fn chart_a() -> Chart {
        Chart::parse("乙酉", "乙酉", "丁未", "乙巳").unwrap()
    }

    #[test]
    fn natal_half_harmony_per_pillar() {
        let events = detect_natal_harmonies(&chart_a());
        let half: Vec<_> = events
            .iter()
            .filter(|e| e.kind == HarmonyKind::HalfHarmony)
            .collect();
        assert_eq!(half.len(), 2);
        let mut pairs: Vec<_> = half
            .iter()
            .map(|e| (e.targets[0].pillar, e.targets[1].pillar))
            .collect();
        pairs.sort();
        assert_eq!(
            pairs,
            vec![
                (PillarPosition::Year, PillarPosition::Hour),
                (PillarPosition::Month, PillarPosition::Hour)
            ]
        );
    }

    #[test]
    fn natal_six_harmony_deduped() {
        let chart = Chart::parse("甲辰", "癸酉", "甲辰", "癸酉").unwrap();
        let six: Vec<_> = detect_natal_harmonies(&chart)
            .into_iter()
            .filter(|e| e.kind == HarmonyKind::SixHarmony)
            .collect();
        assert_eq!(six.len(), 1);
    }

    #[test]
    fn flow_six_harmony_per_pillar() {
        let flow = Flow::year(2024, GanZhi::parse("甲辰").unwrap());
        let six: Vec<_> = detect_flow_harmonies(&chart_a(), flow)
            .into_iter()
            .filter(|e| e.kind == HarmonyKind::SixHarmony)
            .collect();
        assert_eq!(six.len(), 2);
        assert_eq!(six[0].targets[0].pillar, PillarPosition::Year);
        assert_eq!(six[1].targets[0].pillar, PillarPosition::Month);
    }

    #[test]
    fn flow_center_half_harmony() {
        // Year 巳 is an edge; natal 酉 (center) sits in year and month.
        let flow = Flow::year(2025, GanZhi::parse("乙巳").unwrap());
        let half: Vec<_> = detect_flow_harmonies(&chart_a(), flow)
            .into_iter()
            .filter(|e| e.kind == HarmonyKind::HalfHarmony)
            .collect();
        assert_eq!(half.len(), 2);
        assert!(half.iter().all(|e| e.matched == vec![Branch::Si, Branch::You]));
    }

    #[test]
    fn flow_three_meeting() {
        let flow = Flow::year(2026, GanZhi::parse("丙午").unwrap());
        let events = detect_flow_harmonies(&chart_a(), flow);
        let meeting = events
            .iter()
            .find(|e| e.kind == HarmonyKind::ThreeMeeting)
            .unwrap();
        assert_eq!(meeting.element, Some(Element::Fire));
        assert_eq!(meeting.targets.len(), 2);
        assert!(events.iter().any(|e| e.kind == HarmonyKind::SixHarmony));
    }

    #[test]
    fn harmonies_carry_no_risk() {
        let flow = Flow::year(2026, GanZhi::parse("丙午").unwrap());
        let all = detect_natal_harmonies(&chart_a())
            .into_iter()
            .chain(detect_flow_harmonies(&chart_a(), flow));
        for e in all {
            assert_eq!(e.risk_percent, 0.0);
            assert_eq!(e.role, Role::Explain);
        }
    }

    #[test]
    fn complete_groups_track_sources() {
        let groups = complete_groups(&chart_a(), Some(Branch::Wei), Some(Branch::Chou));
        assert_eq!(groups.len(), 1);
        let metal = &groups[0];
        assert_eq!(metal.kind, GroupKind::ThreeHarmony);
        assert_eq!(metal.element, Element::Metal);
        // 巳 hour, 酉 year, 酉 month, 丑 year flow.
        assert_eq!(metal.sources.len(), 4);
        assert!(metal.sources.iter().any(|s| s.source == GroupSource::Year));

        let groups = complete_groups(&chart_a(), Some(Branch::Wu), Some(Branch::Chou));
        assert_eq!(groups.len(), 2);
        assert!(groups.iter().any(|g| g.kind == GroupKind::ThreeMeeting));
    }
}
