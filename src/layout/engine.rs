//! Flexbox layout over the node tree.
//!
//! [`LayoutEngine::compute`] sizes the root from its style, then lays out each
//! container top-down:
//!
//! 1. size every child from its style (falling back to its `fallback_size`),
//!    measuring the cross extent of unsized child containers from their content,
//! 2. sort the children by `order` (stable),
//! 3. split them into lines along the main axis,
//! 4. place each line's items on the main axis (flex shares, `justify-content`,
//!    or uniform compression on overflow),
//! 5. size the container's cross axis from its lines if it has none or took
//!    it from content,
//! 6. place lines with `align-content` and items with `align-self`; stretched
//!    items fill their line when unsized or content-sized on that axis,
//! 7. recurse into every child.
//!
//! Boxes include the node's own margin on both sides. A child's box, once
//! placed by its parent, is not re-derived when the engine recurses into it.
//! Every pass starts from style and `fallback_size` alone, so repeating a pass
//! on an unchanged tree gives the same boxes. Layout never fails; missing
//! numbers read as 0.

use std::cmp::Ordering;

use crate::css::properties::{align_self, AlignContent, AlignItems, Distribution, FlexContainer};
use crate::dom::node::{NodeData, NodeId};
use crate::dom::tree::Dom;
use crate::geometry::{Dimension, LayoutBox, Size};

use super::axis::Ruler;
use super::line::{split_lines, FlexItem, FlexLine};

/// Runs full-tree layout passes.
#[derive(Debug, Default)]
pub struct LayoutEngine {
    passes: u64,
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of passes run so far.
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Lay out `root` and its whole subtree.
    ///
    /// The root is anchored at the origin and sized from its `width`/`height`
    /// plus twice its margin.
    pub fn compute(&mut self, dom: &mut Dom, root: NodeId) {
        self.passes += 1;
        let _span = tracing::debug_span!("layout", pass = self.passes).entered();

        let Some(node) = dom.get_mut(root) else {
            return;
        };
        let margin = node.style.margin();
        node.layout = LayoutBox::new(
            0.0,
            0.0,
            node.style.length("width") + 2.0 * margin,
            node.style.length("height") + 2.0 * margin,
        );
        node.content_axis = None;
        layout_container(dom, root);
    }
}

/// One-shot layout of `root`.
pub fn compute_layout(dom: &mut Dom, root: NodeId) {
    LayoutEngine::new().compute(dom, root);
}

/// Size a child before its parent places it.
fn setup_child_box(dom: &mut Dom, id: NodeId) {
    let (size, content_axis) = base_size(dom, id);
    if let Some(node) = dom.get_mut(id) {
        node.layout.width = size.width;
        node.layout.height = size.height;
        node.content_axis = content_axis;
    }
}

/// Starting size of a node before its parent places it.
///
/// Style `width`/`height` plus twice the margin win; a node whose style
/// declares neither starts from its `fallback_size`. A container still
/// lacking a cross extent takes it from its content, and the axis measured
/// that way is returned alongside.
fn base_size(dom: &Dom, id: NodeId) -> (Size, Option<Dimension>) {
    let Some(node) = dom.get(id) else {
        return (Size::ZERO, None);
    };
    let margin = node.style.margin();
    let width = node.style.length("width") + 2.0 * margin;
    let height = node.style.length("height") + 2.0 * margin;
    let mut size = if width == 0.0 && height == 0.0 {
        node.fallback_size
    } else {
        Size::new(width, height)
    };
    if dom.children(id).is_empty() {
        return (size, None);
    }

    let config = FlexContainer::from_style(&node.style);
    let cross = Ruler::new(config.direction, config.wrap).cross.size;
    if size.get(cross) != 0.0 {
        return (size, None);
    }
    let extent = content_extent(dom, id, cross);
    if extent == 0.0 {
        return (size, None);
    }
    size.set(cross, extent);
    (size, Some(cross))
}

/// Extent a container needs along `cross` to hold its children on one line.
fn content_extent(dom: &Dom, id: NodeId, cross: Dimension) -> f32 {
    let Some(node) = dom.get(id) else {
        return 0.0;
    };
    let tallest = dom
        .children(id)
        .iter()
        .map(|&child| base_size(dom, child).0.get(cross))
        .fold(0.0, f32::max);
    tallest + 2.0 * node.style.inset()
}

fn layout_container(dom: &mut Dom, id: NodeId) {
    let children = dom.children(id).to_vec();
    if children.is_empty() {
        return;
    }
    let Some(node) = dom.get(id) else {
        return;
    };
    let config = FlexContainer::from_style(&node.style);
    let inset = node.style.inset();
    let container = node.layout;
    let ruler = Ruler::new(config.direction, config.wrap);

    for &child in &children {
        setup_child_box(dom, child);
    }

    let mut keyed: Vec<(f32, FlexItem)> = children
        .iter()
        .filter_map(|&child| {
            let style = &dom.get(child)?.style;
            Some((
                style.order(),
                FlexItem {
                    id: child,
                    flex: style.flex(),
                    align: align_self(style, config.align_items),
                },
            ))
        })
        .collect();
    keyed.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
    let items: Vec<FlexItem> = keyed.into_iter().map(|(_, item)| item).collect();

    let inner_main = container.extent(ruler.main.size) - 2.0 * inset;
    let lines = split_lines(dom, &items, &ruler, config.wrap, inner_main);
    tracing::trace!(?id, lines = lines.len(), inner_main, "container split");

    let main_base = ruler.main.base(&container, inset);
    for line in &lines {
        place_main(dom, line, &ruler, config.justify_content, main_base, inner_main);
    }
    place_cross(dom, id, &lines, &ruler, config.align_content, inset);

    for &child in &children {
        layout_container(dom, child);
    }
}

/// Main-axis sizes and positions for one line.
fn place_main(
    dom: &mut Dom,
    line: &FlexLine,
    ruler: &Ruler,
    justify: Distribution,
    base: f32,
    inner_main: f32,
) {
    let axis = ruler.main;
    let mut cursor = base;

    if line.main_space >= 0.0 {
        let flex_total: f32 = line.items.iter().filter_map(|item| item.flex).sum();
        let (lead, gap) = if flex_total > 0.0 {
            (0.0, 0.0)
        } else {
            justify.offsets(line.main_space, line.items.len())
        };
        cursor += axis.sign * lead;
        for item in &line.items {
            let Some(node) = dom.get_mut(item.id) else {
                continue;
            };
            let extent = match item.flex {
                Some(flex) if flex_total > 0.0 => {
                    release_content_axis(node, axis.size);
                    flex / flex_total * line.main_space
                }
                _ => node.layout.extent(axis.size),
            };
            axis.place(&mut node.layout, cursor, extent);
            cursor += axis.sign * (extent + gap);
        }
    } else {
        // Compress every non-flex item by the same ratio; flex items collapse.
        let demand = inner_main - line.main_space;
        let scale = if demand > 0.0 {
            (inner_main / demand).max(0.0)
        } else {
            0.0
        };
        for item in &line.items {
            let Some(node) = dom.get_mut(item.id) else {
                continue;
            };
            let extent = match item.flex {
                Some(_) => 0.0,
                None => node.layout.extent(axis.size) * scale,
            };
            release_content_axis(node, axis.size);
            axis.place(&mut node.layout, cursor, extent);
            cursor += axis.sign * extent;
        }
    }
}

/// The parent decided this extent; the node must not re-derive it from
/// content when laid out itself.
pub(super) fn release_content_axis(node: &mut NodeData, dimension: Dimension) {
    if node.content_axis == Some(dimension) {
        node.content_axis = None;
    }
}

/// Cross-axis sizing of the container, then line and item placement.
fn place_cross(
    dom: &mut Dom,
    id: NodeId,
    lines: &[FlexLine],
    ruler: &Ruler,
    align_content: AlignContent,
    inset: f32,
) {
    let axis = ruler.cross;
    let lines_cross: f32 = lines.iter().map(|line| line.cross_space).sum();

    let container = {
        let Some(node) = dom.get_mut(id) else {
            return;
        };
        if node.content_axis == Some(axis.size) || node.layout.extent(axis.size) == 0.0 {
            let extent = lines_cross + 2.0 * inset;
            node.layout.set_extent(axis.size, extent);
            match axis.size {
                Dimension::Width => node.layout.right = node.layout.left + extent,
                Dimension::Height => node.layout.bottom = node.layout.top + extent,
            }
            tracing::trace!(?id, extent, "cross size from content");
        }
        node.layout
    };

    let free = container.extent(axis.size) - 2.0 * inset - lines_cross;
    let count = lines.len();
    let (lead, gap, share) = match align_content {
        AlignContent::Stretch if count > 0 => (0.0, 0.0, free / count as f32),
        AlignContent::Stretch => (0.0, 0.0, 0.0),
        AlignContent::Distribute(d) => {
            let (lead, gap) = d.offsets(free, count);
            (lead, gap, 0.0)
        }
    };

    let mut cursor = axis.base(&container, inset) + axis.sign * lead;
    for line in lines {
        let line_cross = line.cross_space + share;
        for item in &line.items {
            let Some(node) = dom.get_mut(item.id) else {
                continue;
            };
            let mut extent = node.layout.extent(axis.size);
            let start = match item.align {
                AlignItems::Stretch => {
                    if extent == 0.0 || node.content_axis == Some(axis.size) {
                        extent = line_cross;
                        release_content_axis(node, axis.size);
                    }
                    cursor
                }
                AlignItems::FlexStart => cursor,
                AlignItems::FlexEnd => cursor + axis.sign * (line_cross - extent),
                AlignItems::Center => cursor + axis.sign * (line_cross - extent) / 2.0,
            };
            axis.place(&mut node.layout, start, extent);
        }
        cursor += axis.sign * (line_cross + gap);
    }
}
