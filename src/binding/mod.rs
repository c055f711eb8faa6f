//! Binding orchestrator: placeholders, components, scenes.
//!
//! - [`Placeholder`]: `{ expr }` inside a raw prop value.
//! - [`ComponentRegistry`]: named templates with their rules and data.
//! - [`Scene`]: a mounted tree whose bound props track their stores.

pub mod placeholder;
pub mod groups;
pub mod component;
pub mod scene;

pub use component::{ComponentDefinition, ComponentRegistry, ScriptSource};
pub use groups::BindingGroups;
pub use placeholder::{substitute, PathEvaluator, Placeholder, PlaceholderEvaluator};
pub use scene::{Scene, SceneBuilder, SceneConfig, SceneError};
