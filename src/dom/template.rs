//! Tree descriptions and building them into the arena.
//!
//! ```json
//! { "tagName": "div", "props": { "class": "row" }, "children": [ ... ] }
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::css::model::scalar_text;
use crate::dom::node::{NodeData, NodeId, ScopeId};
use crate::dom::tree::Dom;
use crate::reactive::Value;

/// Errors from building a tree description.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("node at {path} has an empty tag")]
    EmptyTag { path: String },
    #[error("prop `{prop}` of <{tag}> is not a string, number or boolean")]
    InvalidProp { tag: String, prop: String },
}

/// One node of a tree description.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NodeTemplate {
    #[serde(rename = "tagName", alias = "tag")]
    pub tag_name: String,
    #[serde(default)]
    pub props: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub children: Vec<NodeTemplate>,
}

impl NodeTemplate {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            props: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Add a prop (builder).
    pub fn prop(mut self, name: &str, value: impl Into<String>) -> Self {
        self.props
            .insert(name.to_string(), serde_json::Value::String(value.into()));
        self
    }

    /// Add a child (builder).
    pub fn child(mut self, child: NodeTemplate) -> Self {
        self.children.push(child);
        self
    }

    /// Check the whole description without building anything.
    pub fn validate(&self) -> Result<(), TreeError> {
        self.validate_at("0")
    }

    fn validate_at(&self, path: &str) -> Result<(), TreeError> {
        if self.tag_name.trim().is_empty() {
            return Err(TreeError::EmptyTag {
                path: path.to_string(),
            });
        }
        for (name, value) in &self.props {
            if scalar_text(value).is_none() {
                return Err(TreeError::InvalidProp {
                    tag: self.tag_name.clone(),
                    prop: name.clone(),
                });
            }
        }
        for (i, child) in self.children.iter().enumerate() {
            child.validate_at(&format!("{path}.{i}"))?;
        }
        Ok(())
    }

    /// Node data for this template alone, props taken literally.
    fn node_data(&self, scope: ScopeId) -> NodeData {
        let mut data = NodeData::new(self.tag_name.trim()).in_scope(scope);
        for (name, value) in &self.props {
            if let Some(text) = scalar_text(value) {
                data.props.insert(name.clone(), Value::Text(text.clone()));
                data.raw_props.insert(name.clone(), text);
            }
        }
        data
    }
}

impl Dom {
    /// Build `template` as a new detached subtree tagged with `scope`.
    ///
    /// The first subtree built into an empty tree becomes its root.
    pub fn build(&mut self, template: &NodeTemplate, scope: ScopeId) -> Result<NodeId, TreeError> {
        template.validate()?;
        let root = self.insert(template.node_data(scope));
        let mut stack: Vec<(NodeId, &NodeTemplate)> = vec![(root, template)];
        while let Some((parent, tpl)) = stack.pop() {
            for child in &tpl.children {
                let id = self.insert_child(parent, child.node_data(scope));
                stack.push((id, child));
            }
        }
        Ok(root)
    }
}
