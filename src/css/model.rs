//! Selector and rule model.
//!
//! ```text
//! RuleSource  ──load──▶  StyleRule { selector, declarations, specificity }
//!   (JSON or CSS text)              │
//!                                   └─ Selector(Vec<SimpleSelector>)
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;

use crate::css::specificity::Specificity;

// ---------------------------------------------------------------------------
// Selectors
// ---------------------------------------------------------------------------

/// One simple selector. Compounds like `div.card` are not supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleSelector {
    /// `#name`: the node's `id` prop equals `name`.
    Id(String),
    /// `.name`: `name` is one of the whitespace-separated `class` tokens.
    Class(String),
    /// `name`: the node's tag equals `name`.
    Type(String),
}

impl fmt::Display for SimpleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimpleSelector::Id(name) => write!(f, "#{name}"),
            SimpleSelector::Class(name) => write!(f, ".{name}"),
            SimpleSelector::Type(name) => write!(f, "{name}"),
        }
    }
}

/// A chain of simple selectors, written left (outermost) to right (target).
///
/// The rightmost part must match the node itself, the one before it the
/// node's immediate parent, and so on up the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub parts: Vec<SimpleSelector>,
}

impl Selector {
    /// The parts ordered from target outward.
    pub fn target_first(&self) -> impl Iterator<Item = &SimpleSelector> {
        self.parts.iter().rev()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{part}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// A single `property: value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
}

/// A validated rule with its specificity precomputed.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    pub selector: Selector,
    pub declarations: Vec<Declaration>,
    pub specificity: Specificity,
    /// Index among the accepted rules of the stylesheet.
    pub source_order: usize,
}

/// An unvalidated rule as it arrives from a component definition.
///
/// ```json
/// { "selector": "#main .row", "declaration": { "width": "100px", "flex": 1 } }
/// ```
///
/// Declaration values may be strings or numbers; numbers are kept as their
/// decimal text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RuleSource {
    pub selector: String,
    #[serde(alias = "declarations", default)]
    pub declaration: BTreeMap<String, serde_json::Value>,
}

impl RuleSource {
    /// A rule with string declarations.
    pub fn new<'a>(
        selector: impl Into<String>,
        declarations: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        Self {
            selector: selector.into(),
            declaration: declarations
                .into_iter()
                .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
                .collect(),
        }
    }
}

/// Text form of a JSON scalar as used by props and declarations.
///
/// Strings are taken verbatim, numbers print in decimal, booleans as
/// `true`/`false`. Null, arrays and objects have no text form.
pub(crate) fn scalar_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
