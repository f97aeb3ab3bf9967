//! Password strength classification.
//!
//! The level is the highest tier whose minimum class diversity and minimum length
//! both hold. Diversity counts the classes present among lowercase, uppercase,
//! digits and ASCII punctuation. Length is measured in Unicode scalar values.
//!
//! Appending a character never lowers either measure, so the classifier is
//! monotonic in both directions the form cares about.

use bitflags::bitflags;
use regform_domain::StrengthLevel;

bitflags! {
    /// Character classes found in a password.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CharClasses: u8 {
        const LOWER = 1 << 0;
        const UPPER = 1 << 1;
        const DIGIT = 1 << 2;
        const SYMBOL = 1 << 3;
    }
}

impl CharClasses {
    #[must_use]
    pub fn of(c: char) -> Self {
        if c.is_ascii_lowercase() {
            Self::LOWER
        } else if c.is_ascii_uppercase() {
            Self::UPPER
        } else if c.is_ascii_digit() {
            Self::DIGIT
        } else if c.is_ascii_punctuation() {
            Self::SYMBOL
        } else {
            Self::empty()
        }
    }

    /// Number of distinct classes present.
    #[must_use]
    pub const fn diversity(self) -> u32 {
        self.bits().count_ones()
    }
}

#[derive(Debug, Clone, Copy)]
struct Tier {
    level: StrengthLevel,
    min_diversity: u32,
    min_length: usize,
}

// Ascending; the last satisfied tier wins.
const TIERS: [Tier; 4] = [
    Tier { level: StrengthLevel::Weak, min_diversity: 0, min_length: 0 },
    Tier { level: StrengthLevel::Fair, min_diversity: 2, min_length: 6 },
    Tier { level: StrengthLevel::Good, min_diversity: 4, min_length: 8 },
    Tier { level: StrengthLevel::Strong, min_diversity: 4, min_length: 10 },
];

/// Breakdown of a classified password.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StrengthReport {
    pub level: StrengthLevel,
    pub length: usize,
    pub classes: CharClasses,
}

impl StrengthReport {
    #[must_use]
    pub const fn diversity(&self) -> u32 {
        self.classes.diversity()
    }
}

/// Classifies `password` and reports what the level was derived from.
#[must_use]
pub fn analyze(password: &str) -> StrengthReport {
    let (length, classes) = password
        .chars()
        .fold((0, CharClasses::empty()), |(len, classes), c| (len + 1, classes | CharClasses::of(c)));

    let level = TIERS
        .iter()
        .rev()
        .find(|tier| classes.diversity() >= tier.min_diversity && length >= tier.min_length)
        .map_or(StrengthLevel::Weak, |tier| tier.level);

    StrengthReport { level, length, classes }
}

/// Maps a password to its [`StrengthLevel`]. Total and pure; `""` is [`StrengthLevel::Weak`].
#[must_use]
pub fn classify(password: &str) -> StrengthLevel {
    analyze(password).level
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_empty_password_is_weak() {
        let report = analyze("");
        assert_eq!(report.level, StrengthLevel::Weak);
        assert_eq!(report.length, 0);
        assert!(report.classes.is_empty());
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(classify("abcdef"), StrengthLevel::Weak);
        assert_eq!(classify("abcde1"), StrengthLevel::Fair);
        assert_eq!(classify("Abcd1!"), StrengthLevel::Fair);
        assert_eq!(classify("Abcde1!x"), StrengthLevel::Good);
        assert_eq!(classify("Abcdef1!"), StrengthLevel::Good);
        assert_eq!(classify("Abcdefg1!x"), StrengthLevel::Strong);
        assert_eq!(classify("ABCDEFGHIJKL"), StrengthLevel::Weak);
    }

    #[test]
    fn test_length_counts_scalar_values() {
        let report = analyze("Pässwörd1!");
        assert_eq!(report.length, 10);
        assert_eq!(report.level, StrengthLevel::Strong);
    }

    #[test]
    fn test_non_ascii_letters_add_no_class() {
        assert_eq!(analyze("ééé").classes, CharClasses::empty());
        assert_eq!(CharClasses::of('_'), CharClasses::SYMBOL);
        assert_eq!(CharClasses::of(' '), CharClasses::empty());
    }

    fn class_char() -> impl Strategy<Value = char> {
        prop_oneof![
            prop::char::range('A', 'Z'),
            prop::char::range('0', '9'),
            prop::sample::select(vec!['!', '@', '#', '$', '%', '^', '&', '*', '-', '_']),
        ]
    }

    proptest! {
        #[test]
        fn prop_appending_a_class_char_never_lowers_level(p in ".{0,24}", c in class_char()) {
            let longer = format!("{p}{c}");
            prop_assert!(classify(&longer) >= classify(&p));
        }

        #[test]
        fn prop_shortening_never_raises_level(p in ".{1,24}") {
            let mut shorter = p.clone();
            shorter.pop();
            prop_assert!(classify(&shorter) <= classify(&p));
        }

        #[test]
        fn prop_classify_is_pure(p in ".{0,32}") {
            prop_assert_eq!(classify(&p), classify(&p));
        }
    }
}
