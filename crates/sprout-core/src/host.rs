//! The host design tool's node tree, as exported over JSON.
//!
//! These types mirror the host's scene graph closely and are treated as
//! read-only input. Field names follow the host's camelCase export; any
//! scalar may carry the `"mixed"` sentinel where the host allows it.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::paint::{ScaleMode, Transform2D, IDENTITY_TRANSFORM};
use crate::text::{
    FontName, LetterSpacing, LineHeight, TextAlignHorizontal, TextAlignVertical, TextAutoResize,
    TextCase, TextDecoration,
};
use crate::types::{visible_by_default, BlendMode, Color, Effect, LayoutAlign, Mixed, StrokeAlign};

/// Node kind tag as reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HostKind {
    Rectangle,
    Ellipse,
    Line,
    Vector,
    Star,
    Polygon,
    Frame,
    Component,
    ComponentSet,
    Instance,
    Section,
    Group,
    Text,
    BooleanOperation,
    /// Anything the converter does not understand (slices, stickies, widgets, ...)
    Other(String),
}

impl HostKind {
    pub fn as_str(&self) -> &str {
        match self {
            HostKind::Rectangle => "RECTANGLE",
            HostKind::Ellipse => "ELLIPSE",
            HostKind::Line => "LINE",
            HostKind::Vector => "VECTOR",
            HostKind::Star => "STAR",
            HostKind::Polygon => "POLYGON",
            HostKind::Frame => "FRAME",
            HostKind::Component => "COMPONENT",
            HostKind::ComponentSet => "COMPONENT_SET",
            HostKind::Instance => "INSTANCE",
            HostKind::Section => "SECTION",
            HostKind::Group => "GROUP",
            HostKind::Text => "TEXT",
            HostKind::BooleanOperation => "BOOLEAN_OPERATION",
            HostKind::Other(name) => name,
        }
    }
}

impl From<String> for HostKind {
    fn from(s: String) -> Self {
        match s.as_str() {
            "RECTANGLE" => HostKind::Rectangle,
            "ELLIPSE" => HostKind::Ellipse,
            "LINE" => HostKind::Line,
            "VECTOR" => HostKind::Vector,
            "STAR" => HostKind::Star,
            "POLYGON" => HostKind::Polygon,
            "FRAME" => HostKind::Frame,
            "COMPONENT" => HostKind::Component,
            "COMPONENT_SET" => HostKind::ComponentSet,
            "INSTANCE" => HostKind::Instance,
            "SECTION" => HostKind::Section,
            "GROUP" => HostKind::Group,
            "TEXT" => HostKind::Text,
            "BOOLEAN_OPERATION" => HostKind::BooleanOperation,
            _ => HostKind::Other(s),
        }
    }
}

impl From<HostKind> for String {
    fn from(kind: HostKind) -> Self {
        kind.as_str().to_string()
    }
}

/// Auto-layout mode declared on a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HostLayoutMode {
    #[default]
    None,
    Horizontal,
    Vertical,
}

/// Sizing along one of the auto-layout axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HostSizingMode {
    #[default]
    Fixed,
    Auto,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HostPrimaryAlign {
    #[default]
    Min,
    Center,
    Max,
    SpaceBetween,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HostCounterAlign {
    #[default]
    Min,
    Center,
    Max,
    Baseline,
}

/// A gradient stop as exported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HostGradientStop {
    pub position: f64,
    pub color: Color,
}

fn full_opacity() -> f64 {
    1.0
}

fn identity_transform() -> Transform2D {
    IDENTITY_TRANSFORM
}

/// A paint as exported by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HostPaint {
    Solid {
        color: Color,
        #[serde(default = "full_opacity")]
        opacity: f64,
        #[serde(default = "visible_by_default")]
        visible: bool,
    },
    #[serde(rename_all = "camelCase")]
    GradientLinear {
        gradient_stops: Vec<HostGradientStop>,
        #[serde(default = "identity_transform")]
        gradient_transform: Transform2D,
        #[serde(default = "full_opacity")]
        opacity: f64,
        #[serde(default = "visible_by_default")]
        visible: bool,
    },
    #[serde(rename_all = "camelCase")]
    GradientRadial {
        gradient_stops: Vec<HostGradientStop>,
        #[serde(default = "identity_transform")]
        gradient_transform: Transform2D,
        #[serde(default = "full_opacity")]
        opacity: f64,
        #[serde(default = "visible_by_default")]
        visible: bool,
    },
    #[serde(rename_all = "camelCase")]
    GradientAngular {
        gradient_stops: Vec<HostGradientStop>,
        #[serde(default = "identity_transform")]
        gradient_transform: Transform2D,
        #[serde(default = "full_opacity")]
        opacity: f64,
        #[serde(default = "visible_by_default")]
        visible: bool,
    },
    #[serde(rename_all = "camelCase")]
    Image {
        #[serde(default)]
        image_hash: Option<String>,
        #[serde(default)]
        scale_mode: ScaleMode,
        #[serde(default = "full_opacity")]
        opacity: f64,
        #[serde(default = "visible_by_default")]
        visible: bool,
    },
    /// Diamond gradients, video, emoji and future paint kinds
    #[serde(other)]
    Unsupported,
}

impl HostPaint {
    pub fn is_visible(&self) -> bool {
        match self {
            HostPaint::Solid { visible, .. }
            | HostPaint::GradientLinear { visible, .. }
            | HostPaint::GradientRadial { visible, .. }
            | HostPaint::GradientAngular { visible, .. }
            | HostPaint::Image { visible, .. } => *visible,
            HostPaint::Unsupported => true,
        }
    }
}

/// A styled range of a text node, as returned by the host's run introspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostTextSegment {
    pub characters: String,
    #[serde(default)]
    pub font_name: FontName,
    #[serde(default = "regular_weight")]
    pub font_weight: u16,
    pub font_size: f64,
    #[serde(default)]
    pub line_height: LineHeight,
    #[serde(default)]
    pub letter_spacing: LetterSpacing,
    #[serde(default)]
    pub text_decoration: TextDecoration,
    #[serde(default)]
    pub text_case: TextCase,
    #[serde(default)]
    pub fills: Vec<HostPaint>,
}

fn regular_weight() -> u16 {
    400
}

/// One node of the host's scene graph.
///
/// Coordinates are relative to the parent node. Children are listed in
/// bottom-to-top paint order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostNode {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: HostKind,

    // Geometry
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub rotation: f64,

    // Appearance
    #[serde(default = "visible_by_default")]
    pub visible: bool,
    #[serde(default = "full_opacity")]
    pub opacity: f64,
    #[serde(default)]
    pub blend_mode: BlendMode,
    #[serde(default)]
    pub fills: Mixed<Vec<HostPaint>>,
    #[serde(default)]
    pub strokes: Vec<HostPaint>,
    #[serde(default)]
    pub stroke_weight: Mixed<f64>,
    #[serde(default)]
    pub stroke_align: StrokeAlign,
    #[serde(default)]
    pub corner_radius: Mixed<f64>,
    #[serde(default)]
    pub top_left_radius: Option<f64>,
    #[serde(default)]
    pub top_right_radius: Option<f64>,
    #[serde(default)]
    pub bottom_right_radius: Option<f64>,
    #[serde(default)]
    pub bottom_left_radius: Option<f64>,
    #[serde(default)]
    pub effects: Vec<Effect>,

    // Participation in the parent's auto-layout
    #[serde(default)]
    pub layout_grow: f64,
    #[serde(default)]
    pub layout_align: LayoutAlign,

    // Frame auto-layout
    #[serde(default)]
    pub layout_mode: Option<HostLayoutMode>,
    #[serde(default)]
    pub primary_axis_sizing_mode: HostSizingMode,
    #[serde(default)]
    pub counter_axis_sizing_mode: HostSizingMode,
    #[serde(default)]
    pub primary_axis_align_items: HostPrimaryAlign,
    #[serde(default)]
    pub counter_axis_align_items: HostCounterAlign,
    #[serde(default)]
    pub padding_left: f64,
    #[serde(default)]
    pub padding_right: f64,
    #[serde(default)]
    pub padding_top: f64,
    #[serde(default)]
    pub padding_bottom: f64,
    #[serde(default)]
    pub item_spacing: f64,
    #[serde(default)]
    pub clips_content: bool,

    // Text
    #[serde(default)]
    pub characters: Option<String>,
    #[serde(default)]
    pub font_size: Mixed<f64>,
    #[serde(default)]
    pub font_name: Mixed<FontName>,
    #[serde(default)]
    pub text_align_horizontal: TextAlignHorizontal,
    #[serde(default)]
    pub text_align_vertical: TextAlignVertical,
    #[serde(default)]
    pub text_auto_resize: TextAutoResize,
    #[serde(default)]
    pub styled_segments: Vec<HostTextSegment>,

    #[serde(default)]
    pub children: Vec<HostNode>,

    /// Every other property the host exported, in export order
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl HostNode {
    /// Parse a selection (a JSON array of top-level nodes, or a single node).
    pub fn selection_from_json(json: &str) -> Result<Vec<HostNode>, serde_json::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Selection {
            Many(Vec<HostNode>),
            One(Box<HostNode>),
        }

        Ok(match serde_json::from_str(json)? {
            Selection::Many(nodes) => nodes,
            Selection::One(node) => vec![*node],
        })
    }
}
