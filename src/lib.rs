//! # loom-ui
//!
//! The reactive core of a declarative widget toolkit: state lives in a
//! fine-grained reactive store, a CSS-like cascade resolves styles per node,
//! and a flexbox engine turns those styles into absolute boxes. Drawing and
//! input handling are left to the host.
//!
//! ## Core Systems
//!
//! - **[`reactive`]**: Store of tracked cells, observables, tracked callbacks
//! - **[`css`]**: Selector and stylesheet parsing, specificity, cascade, flex properties
//! - **[`dom`]**: Slotmap-backed node arena, tree descriptions, queries
//! - **[`layout`]**: Flexbox layout: lines, main/cross placement, recursion
//! - **[`widget`]**: Widget kinds and the intrinsic sizing hook
//! - **[`binding`]**: Placeholders, components, and mounted scenes
//! - **[`geometry`]**: Size, edges, layout boxes
//!
//! ```ignore
//! use loom_ui::{ComponentRegistry, Scene, SceneConfig, Size};
//!
//! let registry = ComponentRegistry::from_json(&components)?;
//! let scene = Scene::builder(registry)
//!     .with_config(SceneConfig::new().with_viewport(Size::new(800.0, 600.0)))
//!     .mount()?;
//! for node in scene.with_dom(|dom| dom.walk_depth_first(scene.root())) {
//!     draw(scene.layout_box(node), scene.computed_style(node));
//! }
//! ```

// Foundation
pub mod geometry;

// Core systems
pub mod reactive;
pub mod css;
pub mod dom;
pub mod layout;

// Widget seam
pub mod widget;

// Orchestration
pub mod binding;

pub use binding::{ComponentDefinition, ComponentRegistry, Scene, SceneBuilder, SceneConfig, SceneError};
pub use css::{ComputedStyle, RuleSource, Stylesheet};
pub use dom::{Dom, NodeData, NodeId, NodeTemplate, ScopeId};
pub use geometry::{LayoutBox, Size};
pub use layout::LayoutEngine;
pub use reactive::{Observable, Store, Trigger, Value};
pub use widget::{DefaultMetrics, IntrinsicSize, WidgetKind};
