//! Core geometry types: Size, Edge, Dimension, LayoutBox.
//!
//! Layout works in fractional surface units (`f32`). A [`LayoutBox`] stores all
//! four absolute edges plus width and height so the layout engine can address
//! any side by name when it maps the main/cross axes onto the box.

use std::ops::{Add, Sub};

// ---------------------------------------------------------------------------
// Size
// ---------------------------------------------------------------------------

/// A 2D size in surface units (width x height).
#[derive(Copy, Clone, Debug, Default, PartialEq, serde::Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// A zero-sized size.
    pub const ZERO: Size = Size { width: 0.0, height: 0.0 };

    /// Create a new size.
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether both dimensions are zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }

    /// Read one dimension.
    #[inline]
    pub fn get(self, dimension: Dimension) -> f32 {
        match dimension {
            Dimension::Width => self.width,
            Dimension::Height => self.height,
        }
    }

    /// Write one dimension.
    #[inline]
    pub fn set(&mut self, dimension: Dimension, value: f32) {
        match dimension {
            Dimension::Width => self.width = value,
            Dimension::Height => self.height = value,
        }
    }
}

impl Add for Size {
    type Output = Size;
    #[inline]
    fn add(self, rhs: Size) -> Size {
        Size { width: self.width + rhs.width, height: self.height + rhs.height }
    }
}

impl Sub for Size {
    type Output = Size;
    #[inline]
    fn sub(self, rhs: Size) -> Size {
        Size { width: self.width - rhs.width, height: self.height - rhs.height }
    }
}

// ---------------------------------------------------------------------------
// Edge / Dimension
// ---------------------------------------------------------------------------

/// One side of a box.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    Left,
    Top,
    Right,
    Bottom,
}

impl Edge {
    /// The side facing this one.
    #[inline]
    pub const fn opposite(self) -> Edge {
        match self {
            Edge::Left => Edge::Right,
            Edge::Right => Edge::Left,
            Edge::Top => Edge::Bottom,
            Edge::Bottom => Edge::Top,
        }
    }
}

/// One extent of a box.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Dimension {
    Width,
    Height,
}

impl Dimension {
    /// The perpendicular extent.
    #[inline]
    pub const fn cross(self) -> Dimension {
        match self {
            Dimension::Width => Dimension::Height,
            Dimension::Height => Dimension::Width,
        }
    }
}

// ---------------------------------------------------------------------------
// LayoutBox
// ---------------------------------------------------------------------------

/// Absolute geometry of one node, border-box semantics.
///
/// `width`/`height` include border and padding (and, for this engine, the
/// node's own margin on both sides). After a layout pass
/// `right - left == width` and `bottom - top == height` for every placed node.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LayoutBox {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub width: f32,
    pub height: f32,
}

impl LayoutBox {
    /// A box anchored at `(left, top)` with the given size.
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            right: left + width,
            bottom: top + height,
            width,
            height,
        }
    }

    /// Read one edge coordinate.
    #[inline]
    pub fn edge(&self, edge: Edge) -> f32 {
        match edge {
            Edge::Left => self.left,
            Edge::Top => self.top,
            Edge::Right => self.right,
            Edge::Bottom => self.bottom,
        }
    }

    /// Overwrite one edge coordinate.
    #[inline]
    pub fn set_edge(&mut self, edge: Edge, value: f32) {
        match edge {
            Edge::Left => self.left = value,
            Edge::Top => self.top = value,
            Edge::Right => self.right = value,
            Edge::Bottom => self.bottom = value,
        }
    }

    /// Read one extent.
    #[inline]
    pub fn extent(&self, dimension: Dimension) -> f32 {
        match dimension {
            Dimension::Width => self.width,
            Dimension::Height => self.height,
        }
    }

    /// Overwrite one extent. Edges are left untouched.
    #[inline]
    pub fn set_extent(&mut self, dimension: Dimension, value: f32) {
        match dimension {
            Dimension::Width => self.width = value,
            Dimension::Height => self.height = value,
        }
    }

    /// Width and height as a [`Size`].
    #[inline]
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Whether the point lies inside the box, edges inclusive.
    ///
    /// This is the hit-test the gesture layer performs against final boxes.
    #[inline]
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
    }
}
