//! Widget kinds dispatched from a node's tag.

use std::fmt;

/// What a node is, derived from its tag.
///
/// The core never draws; the kind only decides which nodes measure
/// themselves, bind two-way, or join a binding group.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Template,
    Div,
    Text,
    Button,
    Image,
    Input,
    Checkbox,
    Radio,
    Switch,
    Slider,
    Select,
    Color,
    /// Any other tag. May name a registered component.
    Custom(String),
}

impl WidgetKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "template" => Self::Template,
            "div" => Self::Div,
            "text" => Self::Text,
            "button" => Self::Button,
            "image" => Self::Image,
            "input" => Self::Input,
            "checkbox" => Self::Checkbox,
            "radio" => Self::Radio,
            "switch" => Self::Switch,
            "slider" => Self::Slider,
            "select" => Self::Select,
            "color" => Self::Color,
            other => Self::Custom(other.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            Self::Template => "template",
            Self::Div => "div",
            Self::Text => "text",
            Self::Button => "button",
            Self::Image => "image",
            Self::Input => "input",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::Switch => "switch",
            Self::Slider => "slider",
            Self::Select => "select",
            Self::Color => "color",
            Self::Custom(tag) => tag,
        }
    }

    /// Kinds whose `value` prop writes user input back to the store.
    pub fn binds_two_way(&self) -> bool {
        matches!(
            self,
            Self::Input
                | Self::Checkbox
                | Self::Radio
                | Self::Switch
                | Self::Slider
                | Self::Select
                | Self::Color
        )
    }

    /// Kinds whose members sharing a bound path form one exclusive group.
    pub fn forms_group(&self) -> bool {
        matches!(self, Self::Radio)
    }

    /// Plain containers never size themselves from content.
    pub fn is_container(&self) -> bool {
        matches!(self, Self::Template | Self::Div | Self::Custom(_))
    }
}

impl fmt::Display for WidgetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tag_builtins() {
        assert_eq!(WidgetKind::from_tag("div"), WidgetKind::Div);
        assert_eq!(WidgetKind::from_tag("radio"), WidgetKind::Radio);
        assert_eq!(WidgetKind::from_tag("template"), WidgetKind::Template);
    }

    #[test]
    fn test_from_tag_custom() {
        let kind = WidgetKind::from_tag("todo-item");
        assert_eq!(kind, WidgetKind::Custom("todo-item".into()));
        assert_eq!(kind.tag(), "todo-item");
        assert!(kind.is_container());
    }

    #[test]
    fn test_tag_round_trip() {
        for tag in ["text", "button", "image", "input", "switch", "slider", "select", "color"] {
            assert_eq!(WidgetKind::from_tag(tag).to_string(), tag);
        }
    }

    #[test]
    fn test_metadata() {
        assert!(WidgetKind::Radio.forms_group());
        assert!(!WidgetKind::Checkbox.forms_group());
        assert!(WidgetKind::Input.binds_two_way());
        assert!(!WidgetKind::Text.binds_two_way());
        assert!(!WidgetKind::Button.is_container());
    }
}
