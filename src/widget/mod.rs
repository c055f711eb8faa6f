//! Widget seam: kinds dispatched from tags and the intrinsic sizing hook.

pub mod kind;
pub mod measure;

pub use kind::WidgetKind;
pub use measure::{DefaultMetrics, IntrinsicSize, NoMeasure};
