use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorTag {
    Green,
    Blue,
    Yellow,
    Red,
}

impl ColorTag {
    pub const fn as_str(self) -> &'static str {
        match self {
            ColorTag::Green => "green",
            ColorTag::Blue => "blue",
            ColorTag::Yellow => "yellow",
            ColorTag::Red => "red",
        }
    }
}

/// Qualitative reading of an interview percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Appreciation {
    Excellent,
    Good,
    Average,
    Insufficient,
}

impl Appreciation {
    pub const fn label(self) -> &'static str {
        match self {
            Appreciation::Excellent => "Excellent",
            Appreciation::Good => "Bon",
            Appreciation::Average => "Moyen",
            Appreciation::Insufficient => "Insuffisant",
        }
    }

    pub const fn color(self) -> ColorTag {
        match self {
            Appreciation::Excellent => ColorTag::Green,
            Appreciation::Good => ColorTag::Blue,
            Appreciation::Average => ColorTag::Yellow,
            Appreciation::Insufficient => ColorTag::Red,
        }
    }
}

/// Inclusive lower bounds, checked top-down.
const TIER_THRESHOLDS: [(u8, Appreciation); 4] = [
    (80, Appreciation::Excellent),
    (60, Appreciation::Good),
    (50, Appreciation::Average),
    (0, Appreciation::Insufficient),
];

/// Map a percentage onto its appreciation tier. The first threshold reached wins.
pub fn appreciation_tier(percentage: u8) -> Appreciation {
    TIER_THRESHOLDS
        .iter()
        .find(|(floor, _)| percentage >= *floor)
        .map(|(_, tier)| *tier)
        .unwrap_or(Appreciation::Insufficient)
}
