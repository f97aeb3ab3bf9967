use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// Ordinal password quality. Ordering follows the numeric level.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StrengthLevel {
    #[default]
    Weak = 0,
    Fair = 1,
    Good = 2,
    Strong = 3,
}

/// Indicator colour for a strength level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum StrengthColor {
    Red,
    Yellow,
    Blue,
    Green,
}

impl StrengthLevel {
    /// Number of indicator segments: one for weak up to four for strong.
    #[must_use]
    pub const fn segments(self) -> usize {
        self as usize + 1
    }

    #[must_use]
    pub const fn color(self) -> StrengthColor {
        match self {
            Self::Weak => StrengthColor::Red,
            Self::Fair => StrengthColor::Yellow,
            Self::Good => StrengthColor::Blue,
            Self::Strong => StrengthColor::Green,
        }
    }

    /// Only the strongest level stretches the indicator across the full width.
    #[must_use]
    pub const fn fills_width(self) -> bool {
        matches!(self, Self::Strong)
    }
}

impl TryFrom<u8> for StrengthLevel {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, u8> {
        match value {
            0 => Ok(Self::Weak),
            1 => Ok(Self::Fair),
            2 => Ok(Self::Good),
            3 => Ok(Self::Strong),
            other => Err(other),
        }
    }
}
