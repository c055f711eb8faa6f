//! The node arena: structure edits and traversal.

use slotmap::{SecondaryMap, SlotMap};

use super::node::{NodeData, NodeId};

/// Widget tree stored in a slotmap arena.
///
/// Links live beside the node data: `links` holds each node's ordered
/// children, `parents` the reverse edge. Child order is template order;
/// layout sorts its own copy by `order`. Component instances are built as
/// detached subtrees and spliced in with [`Dom::replace`].
#[derive(Debug, Default)]
pub struct Dom {
    pub(crate) nodes: SlotMap<NodeId, NodeData>,
    links: SecondaryMap<NodeId, Vec<NodeId>>,
    parents: SecondaryMap<NodeId, NodeId>,
    root: Option<NodeId>,
}

impl Dom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a detached node. The first node added to an empty tree is its root.
    pub fn insert(&mut self, data: NodeData) -> NodeId {
        let id = self.nodes.insert(data);
        self.links.insert(id, Vec::new());
        self.root.get_or_insert(id);
        id
    }

    /// Append a node under `parent`. A missing parent leaves it detached.
    pub fn insert_child(&mut self, parent: NodeId, data: NodeData) -> NodeId {
        let id = self.nodes.insert(data);
        self.links.insert(id, Vec::new());
        if let Some(siblings) = self.links.get_mut(parent) {
            siblings.push(id);
            self.parents.insert(id, parent);
        }
        id
    }

    /// Drop `id` together with its subtree and return its data.
    pub fn remove(&mut self, id: NodeId) -> Option<NodeData> {
        if let Some(parent) = self.parents.get(id).copied() {
            if let Some(siblings) = self.links.get_mut(parent) {
                siblings.retain(|&child| child != id);
            }
        }
        self.drop_subtree(id)
    }

    /// Splice the detached node `new` into the slot of `old`, then drop `old`
    /// with its subtree.
    ///
    /// If `old` was the root, `new` becomes the root. Returns `false` and
    /// leaves the tree untouched when either node is missing or `new` is
    /// already attached.
    pub fn replace(&mut self, old: NodeId, new: NodeId) -> bool {
        if !self.contains(old) || !self.contains(new) || self.parents.contains_key(new) {
            return false;
        }
        if let Some(parent) = self.parents.get(old).copied() {
            if let Some(slot) = self
                .links
                .get_mut(parent)
                .and_then(|siblings| siblings.iter_mut().find(|child| **child == old))
            {
                *slot = new;
            }
            self.parents.insert(new, parent);
        }
        let was_root = self.root == Some(old);
        self.drop_subtree(old);
        if was_root {
            self.root = Some(new);
        }
        true
    }

    /// Remove `id` and its descendants from every map. The parent's child
    /// list is left to the caller.
    fn drop_subtree(&mut self, id: NodeId) -> Option<NodeData> {
        let data = self.nodes.remove(id)?;
        if self.root == Some(id) {
            self.root = None;
        }
        self.parents.remove(id);
        let mut pending = self.links.remove(id).unwrap_or_default();
        while let Some(current) = pending.pop() {
            self.nodes.remove(current);
            self.parents.remove(current);
            if let Some(kids) = self.links.remove(current) {
                pending.extend(kids);
            }
        }
        Some(data)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.parents.get(id).copied()
    }

    /// Ordered children; empty for leaves and unknown ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.links.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Parent chain of `id`, nearest first, excluding `id`.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        std::iter::successors(self.parent(id), |&p| self.parent(p)).collect()
    }

    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.nodes.get_mut(id)
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Document order (pre-order) from `start`. Cascade, binding collection
    /// and layout all visit nodes in this order.
    pub fn walk_depth_first(&self, start: NodeId) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![start];
        while let Some(current) = stack.pop() {
            if self.contains(current) {
                order.push(current);
                stack.extend(self.children(current).iter().rev().copied());
            }
        }
        order
    }
}
