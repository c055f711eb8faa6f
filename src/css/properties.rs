//! Property parsing: declaration text → typed flex values.
//!
//! Every reader is total. A missing property takes its default; a present
//! but unrecognised alignment value degrades to `flex-start`.

use crate::css::computed::ComputedStyle;

/// Parse the leading number of a length such as `12px`, `-3.5em` or `40`.
///
/// The unit suffix is ignored. Returns 0 when there is no leading number.
pub fn parse_length(value: &str) -> f32 {
    let value = value.trim_start();
    let bytes = value.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }
    if end == digits_start || &value[digits_start..end] == "." {
        return 0.0;
    }
    value[..end].parse().unwrap_or(0.0)
}

/// Text form of a length written back as an inline entry.
pub fn format_length(value: f32) -> String {
    format!("{value}px")
}

// ---------------------------------------------------------------------------
// Flex enums
// ---------------------------------------------------------------------------

/// `flex-direction`. Default: `row`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlexDirection {
    #[default]
    Row,
    RowReverse,
    Column,
    ColumnReverse,
}

impl FlexDirection {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "row" => Some(Self::Row),
            "row-reverse" => Some(Self::RowReverse),
            "column" => Some(Self::Column),
            "column-reverse" => Some(Self::ColumnReverse),
            _ => None,
        }
    }

    pub fn is_row(self) -> bool {
        matches!(self, Self::Row | Self::RowReverse)
    }

    pub fn is_reverse(self) -> bool {
        matches!(self, Self::RowReverse | Self::ColumnReverse)
    }
}

/// `flex-wrap`. Default: `nowrap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlexWrap {
    #[default]
    NoWrap,
    Wrap,
    WrapReverse,
}

impl FlexWrap {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "nowrap" => Some(Self::NoWrap),
            "wrap" => Some(Self::Wrap),
            "wrap-reverse" => Some(Self::WrapReverse),
            _ => None,
        }
    }
}

/// How free space is spread along an axis.
///
/// Shared by `justify-content` (main axis, items) and `align-content`
/// (cross axis, lines).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Distribution {
    #[default]
    FlexStart,
    FlexEnd,
    Center,
    SpaceBetween,
    SpaceAround,
}

impl Distribution {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "flex-start" => Some(Self::FlexStart),
            "flex-end" => Some(Self::FlexEnd),
            "center" => Some(Self::Center),
            "space-between" => Some(Self::SpaceBetween),
            "space-around" => Some(Self::SpaceAround),
            _ => None,
        }
    }

    /// Leading offset and gap between `count` items sharing `free` space.
    ///
    /// `space-between` with fewer than two items places like `flex-start`.
    pub fn offsets(self, free: f32, count: usize) -> (f32, f32) {
        match self {
            Self::FlexStart => (0.0, 0.0),
            Self::FlexEnd => (free, 0.0),
            Self::Center => (free / 2.0, 0.0),
            Self::SpaceBetween if count > 1 => (0.0, free / (count - 1) as f32),
            Self::SpaceBetween => (0.0, 0.0),
            Self::SpaceAround if count > 0 => {
                let step = free / count as f32;
                (step / 2.0, step)
            }
            Self::SpaceAround => (0.0, 0.0),
        }
    }
}

/// `justify-content`. Default: `flex-start`.
pub type JustifyContent = Distribution;

/// `align-content`. Default: `stretch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignContent {
    #[default]
    Stretch,
    Distribute(Distribution),
}

impl AlignContent {
    pub fn parse(value: &str) -> Option<Self> {
        if value.trim() == "stretch" {
            return Some(Self::Stretch);
        }
        Distribution::parse(value).map(Self::Distribute)
    }
}

/// `align-items` / `align-self`. Default: `stretch`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlignItems {
    #[default]
    Stretch,
    FlexStart,
    FlexEnd,
    Center,
}

impl AlignItems {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "stretch" => Some(Self::Stretch),
            "flex-start" => Some(Self::FlexStart),
            "flex-end" => Some(Self::FlexEnd),
            "center" => Some(Self::Center),
            _ => None,
        }
    }
}

/// Read an enum property: default when absent, `fallback` when unrecognised.
fn read<T: Default + Copy>(
    style: &ComputedStyle,
    property: &str,
    parse: fn(&str) -> Option<T>,
    fallback: T,
) -> T {
    match style.get(property) {
        None => T::default(),
        Some(value) => parse(value).unwrap_or_else(|| {
            tracing::trace!(property, value, "unrecognised value");
            fallback
        }),
    }
}

// ---------------------------------------------------------------------------
// FlexContainer
// ---------------------------------------------------------------------------

/// Container-level flex settings of one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FlexContainer {
    pub direction: FlexDirection,
    pub wrap: FlexWrap,
    pub justify_content: JustifyContent,
    pub align_items: AlignItems,
    pub align_content: AlignContent,
}

impl FlexContainer {
    /// Read the container settings, letting `flex-flow` override direction
    /// and wrap token by token.
    pub fn from_style(style: &ComputedStyle) -> Self {
        let mut config = Self {
            direction: read(style, "flex-direction", FlexDirection::parse, FlexDirection::Row),
            wrap: read(style, "flex-wrap", FlexWrap::parse, FlexWrap::NoWrap),
            justify_content: read(
                style,
                "justify-content",
                Distribution::parse,
                Distribution::FlexStart,
            ),
            align_items: read(style, "align-items", AlignItems::parse, AlignItems::FlexStart),
            align_content: read(
                style,
                "align-content",
                AlignContent::parse,
                AlignContent::Distribute(Distribution::FlexStart),
            ),
        };
        if let Some(flow) = style.get("flex-flow") {
            let mut tokens = flow.split_whitespace();
            config.direction = tokens
                .next()
                .and_then(FlexDirection::parse)
                .unwrap_or_default();
            config.wrap = tokens.next().and_then(FlexWrap::parse).unwrap_or_default();
        }
        config
    }
}

/// `align-self` of a child, falling back to the container's `align-items`.
pub fn align_self(style: &ComputedStyle, container: AlignItems) -> AlignItems {
    match style.get("align-self") {
        None => container,
        Some(value) => AlignItems::parse(value).unwrap_or(AlignItems::FlexStart),
    }
}
