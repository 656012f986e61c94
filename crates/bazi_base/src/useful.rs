//! Useful-element (yongshen) selection.
//!
//! A fixed decision table keyed on the day stem and its strength picks a base
//! pair of elements. Two special rules may then append one element each. The
//! explanation is always computed against the final set.

use serde::Serialize;

use crate::chart::{ALL_PILLARS, Chart, PillarPosition};
use crate::element::{ALL_ELEMENTS, Element};
use crate::ganzhi::{ALL_STEMS, Stem};
use crate::strength::DayMasterStrength;
use crate::ten_god::{TenGod, TenGodCategory, branch_ten_god, category_percent, ten_god};

/// Share of officer/killings above which the special rules apply.
const HEAVY_OFFICER_PERCENT: f64 = 40.0;

/// Global element distribution: each of the eight characters counts once.
///
/// Returned in generating order, values in percent.
pub fn global_element_distribution(chart: &Chart) -> [(Element, f64); 5] {
    let mut counts = [0u32; 5];
    for (_, gz) in chart.iter() {
        counts[gz.stem.element().index() as usize] += 1;
        counts[gz.branch.element().index() as usize] += 1;
    }
    ALL_ELEMENTS.map(|e| (e, counts[e.index() as usize] as f64 / 8.0 * 100.0))
}

fn element_percent(dist: &[(Element, f64); 5], element: Element) -> f64 {
    dist[element.index() as usize].1
}

/// Adjustment applied on top of the base decision table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialRule {
    /// Weak 壬/癸 under heavy officer pressure: add wood.
    WeakWaterHeavyGuanshaAddWood,
    /// Weak 甲/乙 under heavy metal pressure with a water-wood base: add fire.
    WeakWoodHeavyMetalAddFire,
}

impl SpecialRule {
    pub const fn id(self) -> &'static str {
        match self {
            Self::WeakWaterHeavyGuanshaAddWood => "weak_water_heavy_guansha_add_wood",
            Self::WeakWoodHeavyMetalAddFire => "weak_wood_heavy_metal_add_fire",
        }
    }
}

/// Where a useful element sits in the chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UsefulToken {
    pub pillar: PillarPosition,
    pub layer: crate::chart::Layer,
    pub character: char,
    pub ten_god: TenGod,
}

/// Ten gods and categories carried by one useful element.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsefulExplain {
    pub element: Element,
    pub ten_gods: Vec<TenGod>,
    pub categories: Vec<TenGodCategory>,
    /// Chart positions holding the element; empty when only theoretical.
    pub tokens: Vec<UsefulToken>,
}

/// Result of useful-element selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsefulElements {
    /// Decision-table result before special rules.
    pub base: Vec<Element>,
    /// Base plus any element appended by a special rule.
    pub final_elements: Vec<Element>,
    pub special_rules: Vec<SpecialRule>,
    pub explain: Vec<UsefulExplain>,
}

impl UsefulElements {
    pub fn contains(&self, element: Element) -> bool {
        self.final_elements.contains(&element)
    }
}

/// Base decision table.
pub fn base_useful_elements(
    day: Stem,
    strength_percent: f64,
    distribution: &[(Element, f64); 5],
) -> Vec<Element> {
    use Element::*;
    let pair = match day {
        Stem::Jia | Stem::Yi => {
            if strength_percent >= 50.0 {
                [Fire, Earth]
            } else {
                [Water, Wood]
            }
        }
        Stem::Bing | Stem::Ding => {
            if strength_percent >= 50.0 {
                [Metal, Water]
            } else {
                [Wood, Fire]
            }
        }
        Stem::Wu | Stem::Ji => {
            if strength_percent >= 50.0 {
                [Metal, Water]
            } else {
                [Fire, Earth]
            }
        }
        Stem::Geng => {
            if strength_percent >= 25.0 {
                [Wood, Fire]
            } else {
                [Earth, Metal]
            }
        }
        Stem::Xin => {
            if element_percent(distribution, Water) > 70.0 {
                [Wood, Fire]
            } else if strength_percent >= 20.0 {
                [Water, Wood]
            } else {
                [Earth, Metal]
            }
        }
        Stem::Ren | Stem::Gui => {
            if strength_percent >= 50.0 {
                [Wood, Fire]
            } else {
                [Metal, Water]
            }
        }
    };
    pair.to_vec()
}

/// Select useful elements, apply the special rules and explain the result.
pub fn select_useful_elements(
    chart: &Chart,
    strength: &DayMasterStrength,
    distribution: &[(Element, f64); 5],
    categories: &[(TenGodCategory, f64)],
) -> UsefulElements {
    let day = chart.day_master();
    let base = base_useful_elements(day, strength.strength_percent, distribution);
    let officer = category_percent(categories, TenGodCategory::Officer);

    let mut final_elements = base.clone();
    let mut special_rules = Vec::new();

    if matches!(day, Stem::Ren | Stem::Gui)
        && strength.strength_percent < 50.0
        && officer >= HEAVY_OFFICER_PERCENT
    {
        if !final_elements.contains(&Element::Wood) {
            final_elements.push(Element::Wood);
        }
        special_rules.push(SpecialRule::WeakWaterHeavyGuanshaAddWood);
    }

    let water_wood = base.len() == 2 && base.contains(&Element::Water) && base.contains(&Element::Wood);
    if matches!(day, Stem::Jia | Stem::Yi)
        && strength.support_percent < 50.0
        && officer >= HEAVY_OFFICER_PERCENT
        && water_wood
    {
        if !final_elements.contains(&Element::Fire) {
            final_elements.push(Element::Fire);
        }
        special_rules.push(SpecialRule::WeakWoodHeavyMetalAddFire);
    }

    let explain = explain_useful(chart, &final_elements);
    UsefulElements {
        base,
        final_elements,
        special_rules,
        explain,
    }
}

/// Ten gods carried by each useful element.
///
/// Looks at the year, month and hour stems and all four branch main stems. An
/// element absent from the chart falls back to its two theoretical stems.
pub fn explain_useful(chart: &Chart, useful: &[Element]) -> Vec<UsefulExplain> {
    use crate::chart::Layer;

    let day = chart.day_master();
    useful
        .iter()
        .map(|&element| {
            let mut tokens = Vec::new();
            for pos in [PillarPosition::Year, PillarPosition::Month, PillarPosition::Hour] {
                let stem = chart.stem(pos);
                if stem.element() == element {
                    tokens.push(UsefulToken {
                        pillar: pos,
                        layer: Layer::Stem,
                        character: stem.to_char(),
                        ten_god: ten_god(day, stem),
                    });
                }
            }
            for pos in ALL_PILLARS {
                let branch = chart.branch(pos);
                if branch.element() == element {
                    tokens.push(UsefulToken {
                        pillar: pos,
                        layer: Layer::Branch,
                        character: branch.to_char(),
                        ten_god: branch_ten_god(day, branch),
                    });
                }
            }

            let mut ten_gods: Vec<TenGod> = if tokens.is_empty() {
                ALL_STEMS
                    .iter()
                    .filter(|s| s.element() == element)
                    .map(|&s| ten_god(day, s))
                    .collect()
            } else {
                tokens.iter().map(|t| t.ten_god).collect()
            };
            ten_gods.sort_by_key(|g| g.name());
            ten_gods.dedup();
            let mut categories: Vec<TenGodCategory> = ten_gods.iter().map(|g| g.category()).collect();
            categories.sort_by_key(|c| c.name());
            categories.dedup();

            UsefulExplain {
                element,
                ten_gods,
                categories,
                tokens,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strength::day_master_strength;
    use crate::ten_god::category_percentages;

    fn select(chart: &Chart) -> UsefulElements {
        let strength = day_master_strength(chart);
        let dist = global_element_distribution(chart);
        let cats = category_percentages(chart);
        select_useful_elements(chart, &strength, &dist, &cats)
    }

    #[test]
    fn distribution_sums_to_one_hundred() {
        let chart = Chart::parse("乙酉", "乙酉", "丁未", "乙巳").unwrap();
        let dist = global_element_distribution(&chart);
        let total: f64 = dist.iter().map(|(_, p)| p).sum();
        assert!((total - 100.0).abs() < 1e-9);
        assert_eq!(element_percent(&dist, Element::Wood), 37.5);
    }

    #[test]
    fn weak_water_adds_wood() {
        let chart = Chart::parse("丙戌", "辛丑", "壬戌", "丙午").unwrap();
        let useful = select(&chart);
        assert_eq!(useful.base, vec![Element::Metal, Element::Water]);
        assert_eq!(
            useful.final_elements,
            vec![Element::Metal, Element::Water, Element::Wood]
        );
        assert_eq!(useful.special_rules, vec![SpecialRule::WeakWaterHeavyGuanshaAddWood]);

        // Wood is absent from the chart, so its explanation is theoretical.
        let wood = useful.explain.iter().find(|e| e.element == Element::Wood).unwrap();
        assert!(wood.tokens.is_empty());
        assert_eq!(wood.ten_gods.len(), 2);
        assert_eq!(wood.categories, vec![TenGodCategory::Output]);
    }

    #[test]
    fn xin_water_override() {
        let dist = [
            (Element::Wood, 0.0),
            (Element::Fire, 0.0),
            (Element::Earth, 0.0),
            (Element::Metal, 25.0),
            (Element::Water, 75.0),
        ];
        assert_eq!(
            base_useful_elements(Stem::Xin, 90.0, &dist),
            vec![Element::Wood, Element::Fire]
        );
        let dry = [
            (Element::Wood, 20.0),
            (Element::Fire, 20.0),
            (Element::Earth, 20.0),
            (Element::Metal, 20.0),
            (Element::Water, 20.0),
        ];
        assert_eq!(
            base_useful_elements(Stem::Xin, 20.0, &dry),
            vec![Element::Water, Element::Wood]
        );
        assert_eq!(
            base_useful_elements(Stem::Xin, 19.9, &dry),
            vec![Element::Earth, Element::Metal]
        );
    }

    #[test]
    fn geng_threshold_is_twenty_five() {
        let dist = global_element_distribution(&Chart::parse("庚申", "庚申", "庚申", "庚申").unwrap());
        assert_eq!(base_useful_elements(Stem::Geng, 25.0, &dist), vec![Element::Wood, Element::Fire]);
        assert_eq!(base_useful_elements(Stem::Geng, 24.9, &dist), vec![Element::Earth, Element::Metal]);
    }

    #[test]
    fn explain_uses_chart_tokens() {
        let chart = Chart::parse("乙酉", "乙酉", "丁未", "乙巳").unwrap();
        let explain = explain_useful(&chart, &[Element::Wood]);
        assert_eq!(explain[0].tokens.len(), 3);
        assert_eq!(explain[0].ten_gods, vec![TenGod::IndirectResource]);
    }
}
