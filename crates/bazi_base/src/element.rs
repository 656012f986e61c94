//! The five elements (wuxing) and their generating / overcoming cycles.

use serde::Serialize;

/// One of the five elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    Wood,
    Fire,
    Earth,
    Metal,
    Water,
}

/// All 5 elements in generating order (index 0 = Wood).
pub const ALL_ELEMENTS: [Element; 5] = [
    Element::Wood,
    Element::Fire,
    Element::Earth,
    Element::Metal,
    Element::Water,
];

impl Element {
    /// 0-based index in generating order.
    pub const fn index(self) -> u8 {
        match self {
            Self::Wood => 0,
            Self::Fire => 1,
            Self::Earth => 2,
            Self::Metal => 3,
            Self::Water => 4,
        }
    }

    /// Single-character Chinese name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Wood => "木",
            Self::Fire => "火",
            Self::Earth => "土",
            Self::Metal => "金",
            Self::Water => "水",
        }
    }

    /// Parse a single-character element name.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '木' => Some(Self::Wood),
            '火' => Some(Self::Fire),
            '土' => Some(Self::Earth),
            '金' => Some(Self::Metal),
            '水' => Some(Self::Water),
            _ => None,
        }
    }

    /// The element this one generates (wood -> fire -> earth -> metal -> water -> wood).
    pub const fn generates(self) -> Self {
        ALL_ELEMENTS[((self.index() + 1) % 5) as usize]
    }

    /// The element this one overcomes (wood -> earth -> water -> fire -> metal -> wood).
    pub const fn overcomes(self) -> Self {
        ALL_ELEMENTS[((self.index() + 2) % 5) as usize]
    }

    /// The element that generates this one.
    pub const fn generated_by(self) -> Self {
        ALL_ELEMENTS[((self.index() + 4) % 5) as usize]
    }

    /// The element that overcomes this one.
    pub const fn overcome_by(self) -> Self {
        ALL_ELEMENTS[((self.index() + 3) % 5) as usize]
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// True if either element overcomes the other.
pub const fn mutually_overcoming(a: Element, b: Element) -> bool {
    a.overcomes().index() == b.index() || b.overcomes().index() == a.index()
}
