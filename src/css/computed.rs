//! Computed style: the cascade's output for one node.
//!
//! Each property keeps its winning value together with the specificity that
//! wrote it. Values stay as text; typed readers (`length`, `flex`, ...) parse
//! on demand so the cascade never rejects a value it does not understand.

use std::collections::BTreeMap;

use crate::css::properties::parse_length;
use crate::css::specificity::Specificity;

/// One cascaded property value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleEntry {
    pub value: String,
    pub specificity: Specificity,
}

/// Property name → winning entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputedStyle {
    entries: BTreeMap<String, StyleEntry>,
}

impl ComputedStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every entry, inline ones included.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Cascade one declaration into the style.
    ///
    /// The value is written when the property is unset or `specificity` is at
    /// least the stored one, so a later rule wins a tie. Returns whether the
    /// value was written.
    pub fn apply(&mut self, property: &str, value: &str, specificity: Specificity) -> bool {
        if let Some(entry) = self.entries.get_mut(property) {
            if specificity < entry.specificity {
                return false;
            }
            entry.value.clear();
            entry.value.push_str(value);
            entry.specificity = specificity;
        } else {
            self.entries.insert(
                property.to_string(),
                StyleEntry {
                    value: value.to_string(),
                    specificity,
                },
            );
        }
        true
    }

    /// Write an inline entry, which outranks every selector rule.
    pub fn set_inline(&mut self, property: &str, value: &str) {
        self.apply(property, value, Specificity::INLINE);
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.entries.get(property).map(|e| e.value.as_str())
    }

    pub fn entry(&self, property: &str) -> Option<&StyleEntry> {
        self.entries.get(property)
    }

    pub fn contains(&self, property: &str) -> bool {
        self.entries.contains_key(property)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &StyleEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // -- typed readers ------------------------------------------------------

    /// Leading number of a property; 0 when missing or not numeric.
    pub fn length(&self, property: &str) -> f32 {
        self.get(property).map_or(0.0, parse_length)
    }

    /// Uniform margin applied on every side.
    pub fn margin(&self) -> f32 {
        self.length("margin")
    }

    /// Uniform padding applied on every side.
    pub fn padding(&self) -> f32 {
        self.length("padding")
    }

    /// Width of `border`, read from its first token (`1px solid gray` → 1).
    pub fn border_width(&self) -> f32 {
        self.get("border")
            .and_then(|v| v.split_whitespace().next())
            .map_or(0.0, parse_length)
    }

    /// `margin + border + padding`, the inset on each side of the content.
    pub fn inset(&self) -> f32 {
        self.margin() + self.border_width() + self.padding()
    }

    /// The `flex` factor, or `None` when the property is absent.
    pub fn flex(&self) -> Option<f32> {
        self.get("flex").map(parse_length)
    }

    /// The `order` key used to sort siblings; 0 when absent.
    pub fn order(&self) -> f32 {
        self.length("order")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_later_tie_wins() {
        let mut style = ComputedStyle::new();
        let spec = Specificity::new(0, 1, 0);
        assert!(style.apply("color", "red", spec));
        assert!(style.apply("color", "blue", spec));
        assert_eq!(style.get("color"), Some("blue"));
    }

    #[test]
    fn test_apply_lower_specificity_loses() {
        let mut style = ComputedStyle::new();
        style.apply("width", "10px", Specificity::new(1, 0, 0));
        assert!(!style.apply("width", "99px", Specificity::new(0, 5, 5)));
        assert_eq!(style.get("width"), Some("10px"));
        assert_eq!(
            style.entry("width").map(|e| e.specificity),
            Some(Specificity::new(1, 0, 0))
        );
    }

    #[test]
    fn test_inline_outranks_rules() {
        let mut style = ComputedStyle::new();
        style.set_inline("width", "40px");
        assert!(!style.apply("width", "10px", Specificity::new(3, 0, 0)));
        assert_eq!(style.length("width"), 40.0);
    }

    #[test]
    fn test_clear_removes_all() {
        let mut style = ComputedStyle::new();
        style.set_inline("height", "1px");
        style.apply("color", "red", Specificity::default());
        assert_eq!(style.len(), 2);
        style.clear();
        assert!(style.is_empty());
    }

    #[test]
    fn test_typed_readers() {
        let mut style = ComputedStyle::new();
        let s = Specificity::default();
        style.apply("margin", "5px", s);
        style.apply("padding", "3", s);
        style.apply("border", "2px dotted gray", s);
        style.apply("flex", "2", s);
        style.apply("order", "-1", s);
        style.apply("width", "auto", s);

        assert_eq!(style.margin(), 5.0);
        assert_eq!(style.padding(), 3.0);
        assert_eq!(style.border_width(), 2.0);
        assert_eq!(style.inset(), 10.0);
        assert_eq!(style.flex(), Some(2.0));
        assert_eq!(style.order(), -1.0);
        assert_eq!(style.length("width"), 0.0);
        assert_eq!(style.length("height"), 0.0);
    }

    #[test]
    fn test_absent_flex_is_none() {
        let style = ComputedStyle::new();
        assert_eq!(style.flex(), None);
        assert_eq!(style.border_width(), 0.0);
    }
}
