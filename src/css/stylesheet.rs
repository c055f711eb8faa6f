//! Stylesheet: rule loading and cascade resolution against the tree.
//!
//! Loading is fail-soft. Each malformed rule yields one [`RuleError`] and is
//! dropped; the rest load in source order. Resolution walks rules in
//! load order and lets a later rule win a specificity tie.

use crate::css::computed::ComputedStyle;
use crate::css::model::{scalar_text, Declaration, RuleSource, Selector, SimpleSelector, StyleRule};
use crate::css::parser::{parse_selector, parse_stylesheet, ParseError, SelectorError};
use crate::css::specificity::Specificity;
use crate::dom::node::{NodeData, NodeId};
use crate::dom::tree::Dom;

/// Why a single rule was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuleError {
    #[error("invalid selector `{selector}`: {source}")]
    Selector {
        selector: String,
        #[source]
        source: SelectorError,
    },
    #[error("invalid declaration `{property}` in `{selector}`: {reason}")]
    Declaration {
        selector: String,
        property: String,
        reason: String,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
}

/// An ordered set of validated rules.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stylesheet {
    rules: Vec<StyleRule>,
}

impl Stylesheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load rule records, keeping every valid one.
    pub fn load(sources: &[RuleSource]) -> (Self, Vec<RuleError>) {
        let mut sheet = Self::new();
        let mut errors = Vec::new();
        for source in sources {
            if let Err(err) = sheet.push(source) {
                tracing::warn!(%err, "rejected style rule");
                errors.push(err);
            }
        }
        (sheet, errors)
    }

    /// Parse stylesheet text and load the rules that survive.
    pub fn from_css(css: &str) -> (Self, Vec<RuleError>) {
        let (sources, parse_errors) = parse_stylesheet(css);
        let (sheet, mut errors) = Self::load(&sources);
        errors.extend(parse_errors.into_iter().map(RuleError::from));
        (sheet, errors)
    }

    /// Validate one rule record and append it.
    pub fn push(&mut self, source: &RuleSource) -> Result<(), RuleError> {
        let selector = parse_selector(&source.selector).map_err(|err| RuleError::Selector {
            selector: source.selector.clone(),
            source: err,
        })?;

        let mut declarations = Vec::with_capacity(source.declaration.len());
        for (property, raw) in &source.declaration {
            let reject = |reason: &str| RuleError::Declaration {
                selector: source.selector.clone(),
                property: property.clone(),
                reason: reason.to_string(),
            };
            let property = property.trim();
            if property.is_empty() {
                return Err(reject("empty property name"));
            }
            let value = scalar_text(raw).ok_or_else(|| reject("value is not a string or number"))?;
            let value = value.trim();
            if value.is_empty() {
                return Err(reject("empty value"));
            }
            declarations.push(Declaration {
                property: property.to_string(),
                value: value.to_string(),
            });
        }

        let specificity = Specificity::from_selector(&selector);
        self.rules.push(StyleRule {
            selector,
            declarations,
            specificity,
            source_order: self.rules.len(),
        });
        Ok(())
    }

    pub fn rules(&self) -> &[StyleRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Compute the style of one node from scratch.
    pub fn compute(&self, node: NodeId, dom: &Dom) -> ComputedStyle {
        let mut style = ComputedStyle::new();
        for rule in &self.rules {
            if !matches_selector(&rule.selector, node, dom) {
                continue;
            }
            tracing::trace!(?node, selector = %rule.selector, "rule matched");
            for decl in &rule.declarations {
                style.apply(&decl.property, &decl.value, rule.specificity);
            }
        }
        style
    }

    /// Clear and recompute the computed style of one node.
    pub fn resolve(&self, node: NodeId, dom: &mut Dom) {
        let style = self.compute(node, dom);
        if let Some(data) = dom.get_mut(node) {
            data.style = style;
        }
    }

    /// Resolve `root` and every descendant.
    pub fn resolve_tree(&self, root: NodeId, dom: &mut Dom) {
        let _span = tracing::debug_span!("cascade", rules = self.rules.len()).entered();
        for node in dom.walk_depth_first(root) {
            self.resolve(node, dom);
        }
    }
}

/// Whether `selector` matches `node` through its immediate parent chain.
///
/// The target-most part is tested against the node, the next against its
/// parent, and so on. The chain ends at the tree root or at a component
/// boundary, whichever comes first.
pub fn matches_selector(selector: &Selector, node: NodeId, dom: &Dom) -> bool {
    let mut current = dom.get(node).map(|data| (node, data));
    for part in selector.target_first() {
        let Some((id, data)) = current else {
            return false;
        };
        if !matches_simple(part, data) {
            return false;
        }
        current = if data.boundary {
            None
        } else {
            dom.parent(id).and_then(|p| dom.get(p).map(|d| (p, d)))
        };
    }
    true
}

fn matches_simple(part: &SimpleSelector, node: &NodeData) -> bool {
    match part {
        SimpleSelector::Id(name) => node.has_id(name),
        SimpleSelector::Class(name) => node.has_class(name),
        SimpleSelector::Type(name) => node.tag == *name,
    }
}
