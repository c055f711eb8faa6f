//! Layout engine: flex lines, axis mapping, full-tree passes.

pub mod axis;
pub mod line;
pub mod engine;

pub use axis::{Axis, Ruler};
pub use engine::{compute_layout, LayoutEngine};
pub use line::{FlexItem, FlexLine};
