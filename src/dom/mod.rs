//! Node arena: slotmap-backed widget tree, tree descriptions, queries.

pub mod node;
pub mod tree;
pub mod query;
pub mod template;

pub use node::{NodeData, NodeId, ScopeId};
pub use template::{NodeTemplate, TreeError};
pub use tree::Dom;
