//! Intrinsic sizing hook.
//!
//! After every cascade the scene asks an [`IntrinsicSize`] implementation for
//! each node's content size. A returned size is written into the node's
//! computed style as inline `width`/`height` entries, so it outranks any rule.

use crate::dom::NodeData;
use crate::geometry::Size;
use crate::widget::kind::WidgetKind;

/// Content measurement supplied by the widget catalog.
pub trait IntrinsicSize {
    /// Content size of `node`, or `None` to keep the cascaded size.
    ///
    /// `node.style` already holds the cascade result for this pass.
    fn intrinsic_size(&self, node: &NodeData) -> Option<Size>;
}

impl<F> IntrinsicSize for F
where
    F: Fn(&NodeData) -> Option<Size>,
{
    fn intrinsic_size(&self, node: &NodeData) -> Option<Size> {
        self(node)
    }
}

/// Measures nothing; every node keeps its cascaded size.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMeasure;

impl IntrinsicSize for NoMeasure {
    fn intrinsic_size(&self, _node: &NodeData) -> Option<Size> {
        None
    }
}

/// Built-in metrics for the stock widget kinds.
///
/// Text is measured with a fixed advance per character, a fraction of the
/// font size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DefaultMetrics {
    /// Character advance as a fraction of the font size.
    pub advance: f32,
    /// Font size used for widget labels.
    pub label_font_size: f32,
    /// Font size of `text` nodes without a `font-size` declaration.
    pub text_font_size: f32,
}

impl Default for DefaultMetrics {
    fn default() -> Self {
        Self {
            advance: 0.5,
            label_font_size: 14.0,
            text_font_size: 16.0,
        }
    }
}

impl DefaultMetrics {
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        text.chars().count() as f32 * font_size * self.advance
    }

    fn label_width(&self, node: &NodeData) -> f32 {
        let label = node.prop_text("label").unwrap_or_default();
        self.text_width(&label, self.label_font_size)
    }

    /// Cascaded width if declared, else `fallback`.
    fn declared_width(node: &NodeData, fallback: f32) -> f32 {
        if node.style.contains("width") {
            node.style.length("width")
        } else {
            fallback
        }
    }
}

impl IntrinsicSize for DefaultMetrics {
    fn intrinsic_size(&self, node: &NodeData) -> Option<Size> {
        if node.kind.is_container() {
            return None;
        }
        let size = match node.kind {
            WidgetKind::Text => {
                let font_size = match node.style.get("font-size") {
                    Some(_) => node.style.length("font-size"),
                    None => self.text_font_size,
                };
                let content = node.prop_text("content").unwrap_or_default();
                Size::new(self.text_width(&content, font_size), font_size)
            }
            WidgetKind::Button => {
                let label = self.label_width(node);
                let width = if label >= 58.0 { label + 42.0 } else { 100.0 };
                Size::new(width, 40.0)
            }
            WidgetKind::Checkbox => Size::new(24.0 + self.label_width(node), 14.0),
            WidgetKind::Radio => Size::new(26.0 + self.label_width(node), 16.0),
            WidgetKind::Switch => Size::new(40.0, 20.0),
            WidgetKind::Slider => Size::new(Self::declared_width(node, 300.0), 20.0),
            WidgetKind::Input => Size::new(Self::declared_width(node, 180.0), 40.0),
            WidgetKind::Select => Size::new(240.0, 40.0),
            WidgetKind::Color => Size::new(40.0, 40.0),
            WidgetKind::Template
            | WidgetKind::Div
            | WidgetKind::Image
            | WidgetKind::Custom(_) => return None,
        };
        Some(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::css::specificity::Specificity;
    use crate::reactive::Value;

    fn node(tag: &str, props: &[(&str, &str)]) -> NodeData {
        let mut node = NodeData::new(tag);
        for (k, v) in props {
            node.set_prop(k, Value::from(*v));
        }
        node
    }

    #[test]
    fn test_closure_hook() {
        let hook = |node: &NodeData| (node.tag == "x").then_some(Size::new(1.0, 2.0));
        assert_eq!(hook.intrinsic_size(&node("x", &[])), Some(Size::new(1.0, 2.0)));
        assert_eq!(hook.intrinsic_size(&node("y", &[])), None);
    }

    #[test]
    fn test_no_measure() {
        assert_eq!(NoMeasure.intrinsic_size(&node("button", &[])), None);
    }

    #[test]
    fn test_text_uses_font_size() {
        let metrics = DefaultMetrics::default();
        let mut text = node("text", &[("content", "abcd")]);
        assert_eq!(metrics.intrinsic_size(&text), Some(Size::new(32.0, 16.0)));

        text.style.apply("font-size", "20px", Specificity::default());
        assert_eq!(metrics.intrinsic_size(&text), Some(Size::new(40.0, 20.0)));
    }

    #[test]
    fn test_button_grows_with_long_label() {
        let metrics = DefaultMetrics::default();
        assert_eq!(
            metrics.intrinsic_size(&node("button", &[("label", "ok")])),
            Some(Size::new(100.0, 40.0))
        );
        // 10 chars * 14 * 0.5 = 70
        assert_eq!(
            metrics.intrinsic_size(&node("button", &[("label", "0123456789")])),
            Some(Size::new(112.0, 40.0))
        );
    }

    #[test]
    fn test_input_keeps_declared_width() {
        let metrics = DefaultMetrics::default();
        let mut input = node("input", &[]);
        assert_eq!(metrics.intrinsic_size(&input), Some(Size::new(180.0, 40.0)));
        input.style.apply("width", "260px", Specificity::default());
        assert_eq!(metrics.intrinsic_size(&input), Some(Size::new(260.0, 40.0)));
    }

    #[test]
    fn test_containers_are_not_measured() {
        let metrics = DefaultMetrics::default();
        assert_eq!(metrics.intrinsic_size(&node("div", &[])), None);
        assert_eq!(metrics.intrinsic_size(&node("image", &[])), None);
        assert_eq!(metrics.intrinsic_size(&node("card", &[])), None);
    }
}
