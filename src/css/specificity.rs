//! 4-tuple specificity calculation and comparison.
//!
//! ```text
//! (inline, id_count, class_count, type_count)
//! ```
//!
//! Fields are ordered so that the derived `Ord` (lexicographic) gives the
//! cascade order: inline entries beat any selector, then more ids, then more
//! classes, then more type selectors.

use crate::css::model::{Selector, SimpleSelector};

/// Cascade weight of a rule or computed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Specificity {
    /// 1 for values set directly on the node (intrinsic sizes), 0 for rules.
    pub inline: u8,
    /// Number of `#id` parts.
    pub id_count: u16,
    /// Number of `.class` parts.
    pub class_count: u16,
    /// Number of tag parts.
    pub type_count: u16,
}

impl Specificity {
    /// Weight of an inline entry. Outranks every selector.
    pub const INLINE: Specificity = Specificity {
        inline: 1,
        id_count: 0,
        class_count: 0,
        type_count: 0,
    };

    pub fn new(id_count: u16, class_count: u16, type_count: u16) -> Self {
        Self {
            inline: 0,
            id_count,
            class_count,
            type_count,
        }
    }

    /// Count the parts of a selector by kind.
    pub fn from_selector(selector: &Selector) -> Self {
        let mut spec = Self::default();
        for part in &selector.parts {
            match part {
                SimpleSelector::Id(_) => spec.id_count += 1,
                SimpleSelector::Class(_) => spec.class_count += 1,
                SimpleSelector::Type(_) => spec.type_count += 1,
            }
        }
        spec
    }

    pub fn is_inline(&self) -> bool {
        self.inline > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::parser::parse_selector;

    fn spec(selector: &str) -> Specificity {
        Specificity::from_selector(&parse_selector(selector).unwrap())
    }

    #[test]
    fn test_counts_by_kind() {
        assert_eq!(spec("div"), Specificity::new(0, 0, 1));
        assert_eq!(spec(".a"), Specificity::new(0, 1, 0));
        assert_eq!(spec("#x"), Specificity::new(1, 0, 0));
        assert_eq!(spec("div .a #x .b"), Specificity::new(1, 2, 1));
    }

    #[test]
    fn test_id_beats_many_classes() {
        assert!(spec("#x") > spec(".a .b .c .d"));
    }

    #[test]
    fn test_class_beats_types() {
        assert!(spec(".a") > spec("div div div"));
    }

    #[test]
    fn test_inline_beats_everything() {
        assert!(Specificity::INLINE > spec("#a #b .c div"));
        assert!(Specificity::INLINE.is_inline());
        assert!(!spec("#a").is_inline());
    }

    #[test]
    fn test_equal_specificity() {
        assert_eq!(spec(".a div"), spec("div .b"));
    }
}
