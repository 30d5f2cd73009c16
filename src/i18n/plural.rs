//! Plural rules: map a count to the category key of a pluralized entry.
//!
//! A rule returns an ordered list of candidate categories. The first
//! candidate present in the catalog node wins, which lets a locale degrade
//! gracefully (e.g. English `0` prefers `zero` but accepts `other`).

use std::fmt;
use std::str::FromStr;

/// Plural category keys recognized in catalog nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    /// All categories in CLDR order.
    pub const ALL: [PluralCategory; 6] = [
        PluralCategory::Zero,
        PluralCategory::One,
        PluralCategory::Two,
        PluralCategory::Few,
        PluralCategory::Many,
        PluralCategory::Other,
    ];

    /// The key used for this category in a catalog node.
    pub fn as_str(&self) -> &'static str {
        match self {
            PluralCategory::Zero => "zero",
            PluralCategory::One => "one",
            PluralCategory::Two => "two",
            PluralCategory::Few => "few",
            PluralCategory::Many => "many",
            PluralCategory::Other => "other",
        }
    }
}

impl fmt::Display for PluralCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PluralCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PluralCategory::ALL
            .iter()
            .copied()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| format!("Unknown plural category: '{}'", s))
    }
}

/// A per-locale plural rule.
#[derive(Clone, Copy)]
pub enum PluralRule {
    /// `0` prefers `zero` then `other`, `1` is `one`, everything else `other`.
    English,
    /// `one` for endings in 1, `few` for endings 2-9 (integers outside
    /// 11-19 in both cases), `other` for the rest.
    Lithuanian,
    /// No plural distinction.
    Chinese,
    /// Caller-provided rule.
    Custom(fn(f64) -> Vec<PluralCategory>),
}

impl fmt::Debug for PluralRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluralRule::English => f.write_str("English"),
            PluralRule::Lithuanian => f.write_str("Lithuanian"),
            PluralRule::Chinese => f.write_str("Chinese"),
            PluralRule::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl PluralRule {
    /// Pick the rule for a locale code by its primary language subtag.
    ///
    /// Unknown languages use the English rule.
    pub fn for_locale(code: &str) -> PluralRule {
        let language = code
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();

        match language.as_str() {
            "lt" => PluralRule::Lithuanian,
            "zh" | "ja" | "ko" => PluralRule::Chinese,
            _ => PluralRule::English,
        }
    }

    /// Candidate categories for a count, most specific first.
    ///
    /// The sign of `count` is ignored. The returned list is never empty.
    pub fn categorize(&self, count: f64) -> Vec<PluralCategory> {
        let n = count.abs();

        match self {
            PluralRule::English => {
                if n == 0.0 {
                    vec![PluralCategory::Zero, PluralCategory::Other]
                } else if n == 1.0 {
                    vec![PluralCategory::One]
                } else {
                    vec![PluralCategory::Other]
                }
            }
            PluralRule::Lithuanian => vec![lithuanian(n)],
            PluralRule::Chinese => vec![PluralCategory::Other],
            PluralRule::Custom(rule) => {
                let categories = rule(n);
                if categories.is_empty() {
                    vec![PluralCategory::Other]
                } else {
                    categories
                }
            }
        }
    }
}

fn lithuanian(n: f64) -> PluralCategory {
    if n.fract() != 0.0 || !n.is_finite() {
        return PluralCategory::Other;
    }

    let mod10 = n % 10.0;
    let mod100 = n % 100.0;
    let teen = (11.0..=19.0).contains(&mod100);

    if mod10 == 1.0 && !teen {
        PluralCategory::One
    } else if (2.0..=9.0).contains(&mod10) && !teen {
        PluralCategory::Few
    } else {
        PluralCategory::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ==================== Category Tests ====================

    #[test]
    fn test_category_round_trips_through_str() {
        for category in PluralCategory::ALL {
            assert_eq!(category.as_str().parse::<PluralCategory>(), Ok(category));
        }
    }

    #[test]
    fn test_category_from_str_unknown() {
        let result = "several".parse::<PluralCategory>();
        assert!(result.unwrap_err().contains("Unknown"));
    }

    #[test]
    fn test_category_display() {
        assert_eq!(PluralCategory::Few.to_string(), "few");
    }

    // ==================== Lithuanian Rule Tests ====================

    #[test]
    fn test_lithuanian_one() {
        let rule = PluralRule::Lithuanian;
        assert_eq!(rule.categorize(1.0), vec![PluralCategory::One]);
        assert_eq!(rule.categorize(21.0), vec![PluralCategory::One]);
        assert_eq!(rule.categorize(101.0), vec![PluralCategory::One]);
    }

    #[test]
    fn test_lithuanian_teens_are_other() {
        let rule = PluralRule::Lithuanian;
        for n in 11..=19 {
            assert_eq!(rule.categorize(n as f64), vec![PluralCategory::Other], "n = {}", n);
        }
        assert_eq!(rule.categorize(111.0), vec![PluralCategory::Other]);
    }

    #[test]
    fn test_lithuanian_few() {
        let rule = PluralRule::Lithuanian;
        assert_eq!(rule.categorize(2.0), vec![PluralCategory::Few]);
        assert_eq!(rule.categorize(9.0), vec![PluralCategory::Few]);
        assert_eq!(rule.categorize(22.0), vec![PluralCategory::Few]);
    }

    #[test]
    fn test_lithuanian_other() {
        let rule = PluralRule::Lithuanian;
        assert_eq!(rule.categorize(0.0), vec![PluralCategory::Other]);
        assert_eq!(rule.categorize(10.0), vec![PluralCategory::Other]);
        assert_eq!(rule.categorize(20.0), vec![PluralCategory::Other]);
        assert_eq!(rule.categorize(1.5), vec![PluralCategory::Other]);
    }

    #[test]
    fn test_lithuanian_ignores_sign() {
        assert_eq!(PluralRule::Lithuanian.categorize(-21.0), vec![PluralCategory::One]);
    }

    // ==================== English / Chinese Rule Tests ====================

    #[test]
    fn test_english_zero_degrades_to_other() {
        assert_eq!(
            PluralRule::English.categorize(0.0),
            vec![PluralCategory::Zero, PluralCategory::Other]
        );
    }

    #[test]
    fn test_english_one_and_other() {
        assert_eq!(PluralRule::English.categorize(1.0), vec![PluralCategory::One]);
        assert_eq!(PluralRule::English.categorize(2.0), vec![PluralCategory::Other]);
        assert_eq!(PluralRule::English.categorize(1.5), vec![PluralCategory::Other]);
    }

    #[test]
    fn test_chinese_always_other() {
        assert_eq!(PluralRule::Chinese.categorize(1.0), vec![PluralCategory::Other]);
    }

    #[test]
    fn test_custom_rule_empty_result_falls_back_to_other() {
        let rule = PluralRule::Custom(|_| Vec::new());
        assert_eq!(rule.categorize(3.0), vec![PluralCategory::Other]);
    }

    // ==================== for_locale Tests ====================

    #[test]
    fn test_for_locale() {
        assert!(matches!(PluralRule::for_locale("lt"), PluralRule::Lithuanian));
        assert!(matches!(PluralRule::for_locale("zh_CN"), PluralRule::Chinese));
        assert!(matches!(PluralRule::for_locale("en-US"), PluralRule::English));
        assert!(matches!(PluralRule::for_locale(""), PluralRule::English));
    }

    proptest! {
        #[test]
        fn categorize_is_never_empty(n in any::<i64>()) {
            for rule in [PluralRule::English, PluralRule::Lithuanian, PluralRule::Chinese] {
                prop_assert!(!rule.categorize(n as f64).is_empty());
            }
        }

        #[test]
        fn lithuanian_category_depends_on_last_two_digits(n in 0u32..1_000_000) {
            let rule = PluralRule::Lithuanian;
            prop_assert_eq!(rule.categorize(n as f64), rule.categorize((n % 100 + 100) as f64));
        }
    }
}
