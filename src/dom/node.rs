//! Node types: NodeId, ScopeId, NodeData.

use std::collections::BTreeMap;

use slotmap::new_key_type;

use crate::css::computed::ComputedStyle;
use crate::geometry::{Dimension, LayoutBox, Size};
use crate::reactive::Value;
use crate::widget::WidgetKind;

new_key_type! {
    /// Unique identifier for a DOM node. Copy, lightweight (u64).
    pub struct NodeId;
}

/// Index of the component instance a node belongs to.
///
/// Each scope has its own rule set and store. Scope 0 is the root component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub usize);

/// Data associated with a single DOM node.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Tag identifier (`div`, `text`, or a component name).
    pub tag: String,
    /// Widget kind derived from `tag`.
    pub kind: WidgetKind,
    /// Props as written in the template, placeholders intact.
    pub raw_props: BTreeMap<String, String>,
    /// Props after placeholder substitution.
    pub props: BTreeMap<String, Value>,
    /// Cascade output for the current pass.
    pub style: ComputedStyle,
    /// Absolute geometry from the last layout pass.
    pub layout: LayoutBox,
    /// Size layout starts from when the style declares neither width nor
    /// height.
    pub fallback_size: Size,
    /// Extent taken from content in the current layout pass, if any.
    pub(crate) content_axis: Option<Dimension>,
    pub scope: ScopeId,
    /// Root of a mounted component instance. Selector matching does not climb
    /// past it.
    pub boundary: bool,
    /// Store path written back by two-way input, if the `value` prop is bound.
    pub bind: Option<String>,
}

impl NodeData {
    pub fn new(tag: impl Into<String>) -> Self {
        let tag = tag.into();
        Self {
            kind: WidgetKind::from_tag(&tag),
            tag,
            raw_props: BTreeMap::new(),
            props: BTreeMap::new(),
            style: ComputedStyle::new(),
            layout: LayoutBox::default(),
            fallback_size: Size::ZERO,
            content_axis: None,
            scope: ScopeId::default(),
            boundary: false,
            bind: None,
        }
    }

    /// Set a literal prop (builder).
    pub fn with_prop(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        self.props.insert(name.to_string(), Value::Text(value.clone()));
        self.raw_props.insert(name.to_string(), value);
        self
    }

    /// Set the `id` prop (builder).
    pub fn with_id(self, id: &str) -> Self {
        self.with_prop("id", id)
    }

    /// Set the `class` prop (builder).
    pub fn with_class(self, class: &str) -> Self {
        self.with_prop("class", class)
    }

    /// Set the scope (builder).
    pub fn in_scope(mut self, scope: ScopeId) -> Self {
        self.scope = scope;
        self
    }

    /// Overwrite a resolved prop.
    pub fn set_prop(&mut self, name: &str, value: Value) {
        self.props.insert(name.to_string(), value);
    }

    pub fn prop(&self, name: &str) -> Option<&Value> {
        self.props.get(name)
    }

    /// Resolved prop as text. Non-text values use their display form.
    pub fn prop_text(&self, name: &str) -> Option<String> {
        self.props.get(name).map(|v| match v {
            Value::Text(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Whether the `id` prop equals `id`.
    pub fn has_id(&self, id: &str) -> bool {
        match self.props.get("id") {
            Some(Value::Text(s)) => s == id,
            Some(Value::Null) | None => false,
            Some(other) => other.to_string() == id,
        }
    }

    /// Whether `class` is one of the whitespace-separated `class` tokens.
    pub fn has_class(&self, class: &str) -> bool {
        match self.props.get("class") {
            Some(Value::Text(s)) => s.split_whitespace().any(|c| c == class),
            Some(Value::List(items)) => items.iter().any(|v| v.as_str() == Some(class)),
            _ => false,
        }
    }
}
