//! Binding groups: widgets that share one bound path.
//!
//! Radio buttons bound to the same path form a group; selecting one writes
//! its option to the path, and every member re-evaluates. The registry lives
//! on the scene, so separate scenes never share groups.

use std::collections::BTreeMap;

use crate::dom::node::{NodeId, ScopeId};

/// Group members keyed by scope and bound path, in registration order.
#[derive(Debug, Clone, Default)]
pub struct BindingGroups {
    groups: BTreeMap<(ScopeId, String), Vec<NodeId>>,
}

impl BindingGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `node` to the group for `(scope, path)`. Re-registering is a no-op.
    pub fn register(&mut self, scope: ScopeId, path: &str, node: NodeId) {
        let members = self.groups.entry((scope, path.to_string())).or_default();
        if !members.contains(&node) {
            members.push(node);
        }
    }

    pub fn members(&self, scope: ScopeId, path: &str) -> &[NodeId] {
        self.groups
            .get(&(scope, path.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// The group `node` belongs to, if any.
    pub fn group_of(&self, node: NodeId) -> Option<(ScopeId, &str)> {
        self.groups
            .iter()
            .find(|(_, members)| members.contains(&node))
            .map(|((scope, path), _)| (*scope, path.as_str()))
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn clear(&mut self) {
        self.groups.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn ids(n: usize) -> Vec<NodeId> {
        let mut map: SlotMap<NodeId, ()> = SlotMap::with_key();
        (0..n).map(|_| map.insert(())).collect()
    }

    #[test]
    fn test_register_and_members() {
        let n = ids(3);
        let mut groups = BindingGroups::new();
        groups.register(ScopeId(0), "choice", n[0]);
        groups.register(ScopeId(0), "choice", n[1]);
        groups.register(ScopeId(0), "choice", n[0]);
        groups.register(ScopeId(0), "other", n[2]);
        assert_eq!(groups.members(ScopeId(0), "choice"), &[n[0], n[1]]);
        assert_eq!(groups.len(), 2);
    }

    #[test]
    fn test_scopes_are_separate() {
        let n = ids(2);
        let mut groups = BindingGroups::new();
        groups.register(ScopeId(0), "choice", n[0]);
        groups.register(ScopeId(1), "choice", n[1]);
        assert_eq!(groups.members(ScopeId(1), "choice"), &[n[1]]);
        assert_eq!(groups.group_of(n[1]), Some((ScopeId(1), "choice")));
    }

    #[test]
    fn test_missing_group_is_empty() {
        let groups = BindingGroups::new();
        assert!(groups.members(ScopeId(0), "x").is_empty());
        assert!(groups.is_empty());
    }

    #[test]
    fn test_clear_drops_all() {
        let n = ids(1);
        let mut groups = BindingGroups::new();
        groups.register(ScopeId(0), "a", n[0]);
        groups.clear();
        assert_eq!(groups.group_of(n[0]), None);
    }
}
