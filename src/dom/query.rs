//! Tree queries: by id, class, tag; point hit-testing.
//!
//! Queries walk the tree from the root in document order, so detached or
//! replaced nodes never show up.

use super::node::{NodeData, NodeId};
use super::tree::Dom;

impl Dom {
    /// First node in document order whose `id` prop equals `id`.
    pub fn query_by_id(&self, id: &str) -> Option<NodeId> {
        self.iter_tree().find(|(_, data)| data.has_id(id)).map(|(n, _)| n)
    }

    /// All nodes carrying the given class token.
    pub fn query_by_class(&self, class: &str) -> Vec<NodeId> {
        self.query_all(|data| data.has_class(class))
    }

    /// All nodes with the given tag.
    pub fn query_by_tag(&self, tag: &str) -> Vec<NodeId> {
        self.query_all(|data| data.tag == tag)
    }

    /// All nodes matching an arbitrary predicate.
    pub fn query_all(&self, predicate: impl Fn(&NodeData) -> bool) -> Vec<NodeId> {
        self.iter_tree()
            .filter(|(_, data)| predicate(data))
            .map(|(node_id, _)| node_id)
            .collect()
    }

    /// Deepest node whose layout box contains the point.
    ///
    /// Later siblings win over earlier ones when boxes overlap.
    pub fn hit_test(&self, x: f32, y: f32) -> Option<NodeId> {
        let mut current = self.root()?;
        if !self.get(current)?.layout.contains(x, y) {
            return None;
        }
        loop {
            let next = self
                .children(current)
                .iter()
                .rev()
                .copied()
                .find(|&child| self.get(child).is_some_and(|n| n.layout.contains(x, y)));
            match next {
                Some(child) => current = child,
                None => return Some(current),
            }
        }
    }

    fn iter_tree(&self) -> impl Iterator<Item = (NodeId, &NodeData)> {
        self.root()
            .map(|root| self.walk_depth_first(root))
            .unwrap_or_default()
            .into_iter()
            .filter_map(move |id| self.get(id).map(|data| (id, data)))
    }
}

#[cfg(test)]
mod tests {
    use crate::dom::node::NodeData;
    use crate::dom::tree::Dom;
    use crate::geometry::LayoutBox;

    /// ```text
    ///       root (template #root)
    ///      /    \
    ///    a       b
    ///  (div      (div
    ///   #sidebar  #main
    ///   .nav)     .content)
    ///   / \
    ///  c   d
    /// (button  (button
    ///  #save    #cancel
    ///  .btn)    .btn danger)
    /// ```
    fn build_query_tree() -> Dom {
        let mut dom = Dom::new();
        let root = dom.insert(NodeData::new("template").with_id("root"));
        let a = dom.insert_child(root, NodeData::new("div").with_id("sidebar").with_class("nav"));
        dom.insert_child(root, NodeData::new("div").with_id("main").with_class("content"));
        dom.insert_child(a, NodeData::new("button").with_id("save").with_class("btn"));
        dom.insert_child(a, NodeData::new("button").with_id("cancel").with_class("btn danger"));
        dom
    }

    #[test]
    fn test_query_by_id() {
        let dom = build_query_tree();
        let save = dom.query_by_id("save").unwrap();
        assert_eq!(dom.get(save).unwrap().tag, "button");
        assert!(dom.query_by_id("nope").is_none());
    }

    #[test]
    fn test_query_by_class_document_order() {
        let dom = build_query_tree();
        let btns = dom.query_by_class("btn");
        assert_eq!(btns, vec![dom.query_by_id("save").unwrap(), dom.query_by_id("cancel").unwrap()]);
        assert_eq!(dom.query_by_class("danger").len(), 1);
    }

    #[test]
    fn test_query_by_tag() {
        let dom = build_query_tree();
        assert_eq!(dom.query_by_tag("div").len(), 2);
        assert_eq!(dom.query_by_tag("template").len(), 1);
    }

    #[test]
    fn test_queries_skip_removed_nodes() {
        let mut dom = build_query_tree();
        let sidebar = dom.query_by_id("sidebar").unwrap();
        dom.remove(sidebar);
        assert!(dom.query_by_class("btn").is_empty());
    }

    #[test]
    fn test_hit_test_finds_deepest() {
        let mut dom = build_query_tree();
        let set = |dom: &mut Dom, id: &str, b: LayoutBox| {
            let node = dom.query_by_id(id).unwrap();
            dom.get_mut(node).unwrap().layout = b;
        };
        set(&mut dom, "root", LayoutBox::new(0.0, 0.0, 200.0, 100.0));
        set(&mut dom, "sidebar", LayoutBox::new(0.0, 0.0, 50.0, 100.0));
        set(&mut dom, "main", LayoutBox::new(50.0, 0.0, 150.0, 100.0));
        set(&mut dom, "save", LayoutBox::new(0.0, 0.0, 50.0, 20.0));

        assert_eq!(dom.hit_test(10.0, 10.0), dom.query_by_id("save"));
        assert_eq!(dom.hit_test(10.0, 50.0), dom.query_by_id("sidebar"));
        assert_eq!(dom.hit_test(120.0, 50.0), dom.query_by_id("main"));
        assert_eq!(dom.hit_test(500.0, 50.0), None);
    }
}
