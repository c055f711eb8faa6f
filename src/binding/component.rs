//! Component definitions and the registry they are mounted from.
//!
//! ```json
//! {
//!   "main": {
//!     "style": [ { "selector": "template", "declaration": { "flex-direction": "column" } } ],
//!     "template": { "tagName": "template", "children": [ { "tagName": "card" } ] },
//!     "script": { "data": { "title": "hello" } }
//!   },
//!   "card": { ... }
//! }
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::css::model::RuleSource;
use crate::dom::template::NodeTemplate;

/// Script section of a component. Only `data` is read.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ScriptSource {
    #[serde(default)]
    pub data: serde_json::Value,
}

/// One named component: a tree description, its rules and initial data.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ComponentDefinition {
    pub template: NodeTemplate,
    #[serde(default)]
    pub style: Vec<RuleSource>,
    #[serde(default)]
    pub script: ScriptSource,
}

impl ComponentDefinition {
    pub fn new(template: NodeTemplate) -> Self {
        Self {
            template,
            style: Vec::new(),
            script: ScriptSource::default(),
        }
    }

    /// Set the rules (builder).
    pub fn with_style(mut self, style: Vec<RuleSource>) -> Self {
        self.style = style;
        self
    }

    /// Set the initial data (builder).
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.script.data = data;
        self
    }
}

/// Components by tag name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct ComponentRegistry {
    components: BTreeMap<String, ComponentDefinition>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a registry from a JSON object of named definitions.
    pub fn from_json(json: &serde_json::Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(json)
    }

    /// Register a component (builder).
    pub fn with(mut self, name: impl Into<String>, definition: ComponentDefinition) -> Self {
        self.insert(name, definition);
        self
    }

    /// Register a component, replacing any previous one with the same name.
    pub fn insert(&mut self, name: impl Into<String>, definition: ComponentDefinition) {
        self.components.insert(name.into(), definition);
    }

    pub fn get(&self, name: &str) -> Option<&ComponentDefinition> {
        self.components.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.components.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.components.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}
