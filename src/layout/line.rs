//! Flex lines: splitting a container's children along the main axis.

use crate::css::properties::{AlignItems, FlexWrap};
use crate::dom::node::NodeId;
use crate::dom::tree::Dom;
use crate::layout::axis::Ruler;
use crate::layout::engine::release_content_axis;

/// A child as the line splitter sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlexItem {
    pub id: NodeId,
    /// `flex` factor if declared.
    pub flex: Option<f32>,
    /// Effective `align-self`.
    pub align: AlignItems,
}

/// One line of a container, rebuilt on every pass.
#[derive(Debug, Clone, PartialEq)]
pub struct FlexLine {
    pub items: Vec<FlexItem>,
    /// Main-axis space left after the non-flex items. Negative on overflow.
    pub main_space: f32,
    /// Largest cross extent among the items.
    pub cross_space: f32,
}

impl FlexLine {
    fn new(main_space: f32) -> Self {
        Self {
            items: Vec::new(),
            main_space,
            cross_space: 0.0,
        }
    }
}

/// Split `items` (already in `order`) into lines.
///
/// Flex items always join the current line without consuming space. Under
/// `nowrap` every item lands on one line. Otherwise an item wider than the
/// container is first clamped to `inner_main`, and a new line starts when the
/// item no longer fits.
pub fn split_lines(
    dom: &mut Dom,
    items: &[FlexItem],
    ruler: &Ruler,
    wrap: FlexWrap,
    inner_main: f32,
) -> Vec<FlexLine> {
    let mut lines = vec![FlexLine::new(inner_main)];

    for &item in items {
        let Some(node) = dom.get_mut(item.id) else {
            continue;
        };
        let mut main = node.layout.extent(ruler.main.size);

        if item.flex.is_none() && wrap != FlexWrap::NoWrap {
            if main > inner_main {
                main = inner_main;
                node.layout.set_extent(ruler.main.size, main);
                release_content_axis(node, ruler.main.size);
            }
            let fits = lines.last().is_some_and(|line| line.main_space >= main);
            if !fits {
                lines.push(FlexLine::new(inner_main));
            }
        }

        let cross = node.layout.extent(ruler.cross.size);
        if let Some(line) = lines.last_mut() {
            if item.flex.is_none() {
                line.main_space -= main;
            }
            line.cross_space = line.cross_space.max(cross);
            line.items.push(item);
        }
    }

    lines.retain(|line| !line.items.is_empty());
    lines
}
