//! Axis mapping: flex direction and wrap → box edges and signs.
//!
//! A [`Ruler`] names, for one container, which extent is the main axis, which
//! edge items start from, and which way they advance (`sign` is +1 toward
//! right/bottom, -1 toward left/top).
//!
//! ```text
//! direction        main    start   sign      cross   start   sign
//! row              width   left    +1        height  top     +1
//! row-reverse      width   right   -1        height  top     +1
//! column           height  top     +1        width   left    +1
//! column-reverse   height  bottom  -1        width   left    +1
//! wrap-reverse flips the cross start to the opposite edge with sign -1.
//! ```

use crate::css::properties::{FlexDirection, FlexWrap};
use crate::geometry::{Dimension, Edge, LayoutBox};

/// One axis of a container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Axis {
    pub size: Dimension,
    pub start: Edge,
    pub end: Edge,
    pub sign: f32,
}

impl Axis {
    fn forward(size: Dimension) -> Self {
        let (start, end) = match size {
            Dimension::Width => (Edge::Left, Edge::Right),
            Dimension::Height => (Edge::Top, Edge::Bottom),
        };
        Self {
            size,
            start,
            end,
            sign: 1.0,
        }
    }

    fn reversed(self) -> Self {
        Self {
            start: self.end,
            end: self.start,
            sign: -self.sign,
            ..self
        }
    }

    /// Coordinate where the first item starts: the container's start edge
    /// moved inward by `inset`.
    pub fn base(&self, container: &LayoutBox, inset: f32) -> f32 {
        container.edge(self.start) + self.sign * inset
    }

    /// Place `item` so it occupies `[start, start + sign * extent]` on this
    /// axis. Both edges and the extent are written.
    pub fn place(&self, item: &mut LayoutBox, start: f32, extent: f32) {
        item.set_extent(self.size, extent);
        item.set_edge(self.start, start);
        item.set_edge(self.end, start + self.sign * extent);
    }
}

/// Main and cross axes of one container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ruler {
    pub main: Axis,
    pub cross: Axis,
}

impl Ruler {
    pub fn new(direction: FlexDirection, wrap: FlexWrap) -> Self {
        let (main_size, cross_size) = if direction.is_row() {
            (Dimension::Width, Dimension::Height)
        } else {
            (Dimension::Height, Dimension::Width)
        };
        let mut main = Axis::forward(main_size);
        if direction.is_reverse() {
            main = main.reversed();
        }
        let mut cross = Axis::forward(cross_size);
        if wrap == FlexWrap::WrapReverse {
            cross = cross.reversed();
        }
        Self { main, cross }
    }
}
