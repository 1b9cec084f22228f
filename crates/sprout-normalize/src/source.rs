//! Read access to a design tree, whichever side of normalization it comes from.
//!
//! The host's exported tree and an already normalized tree both implement
//! [`SourceNode`], which is what lets normalization run on its own output.

use sprout_core::{
    CornerRadii, Geometry, GradientPaint, GradientStop, HostCounterAlign, HostGradientStop,
    HostKind, HostLayoutMode, HostNode, HostPaint, HostPrimaryAlign, HostSizingMode,
    HostTextSegment, ImagePlaceholder, Mixed, NodeId, Paint, TextContent, TextRun, Transform2D,
};
use sprout_layout::{
    Alignment, ContainerLayout, Distribution, Flow, FlowOrigin, NodeIndex, NodeKind, NodeProps,
    NormalizedNode, NormalizedTree, Padding, ShapeKind, SizingMode,
};

use crate::context::WarningSink;

/// What a source node is, from the normalizer's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceKind {
    Rectangle,
    Ellipse,
    Line,
    Shape(ShapeKind),
    /// Frame-like node with its own coordinate space
    Container,
    Group,
    Text,
    BooleanOperation,
    /// Kind name of something the converter does not handle
    Unsupported(String),
}

impl SourceKind {
    pub fn label(&self) -> &str {
        match self {
            SourceKind::Rectangle => "rectangle",
            SourceKind::Ellipse => "ellipse",
            SourceKind::Line => "line",
            SourceKind::Shape(ShapeKind::Vector) => "vector",
            SourceKind::Shape(ShapeKind::Star) => "star",
            SourceKind::Shape(ShapeKind::Polygon) => "polygon",
            SourceKind::Container => "container",
            SourceKind::Group => "group",
            SourceKind::Text => "text",
            SourceKind::BooleanOperation => "boolean operation",
            SourceKind::Unsupported(name) => name,
        }
    }
}

/// A node that can be snapshotted.
pub trait SourceNode: Sized {
    fn id(&self) -> &str;

    fn name(&self) -> &str;

    fn kind(&self) -> SourceKind;

    /// Position, size, and rotation relative to the parent.
    fn geometry(&self) -> Geometry;

    fn is_visible(&self) -> bool;

    fn clips_content(&self) -> bool;

    /// The flow the node declares for its children, if any.
    ///
    /// `None` means the children are free-form and inference may run.
    fn declared_layout(&self) -> Option<ContainerLayout>;

    /// Text content and styled runs, for text nodes.
    fn text(&self, warnings: &mut WarningSink) -> Option<TextContent>;

    /// Shared properties with self-contained paints.
    ///
    /// Layout bounds are left for the cloner to compute.
    fn properties(&self, warnings: &mut WarningSink) -> NodeProps;

    /// Children in paint order.
    fn child_nodes(&self) -> Vec<Self>;
}

// ============================================================================
// Host input
// ============================================================================

impl<'a> SourceNode for &'a HostNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> SourceKind {
        match &self.kind {
            HostKind::Rectangle => SourceKind::Rectangle,
            HostKind::Ellipse => SourceKind::Ellipse,
            HostKind::Line => SourceKind::Line,
            HostKind::Vector => SourceKind::Shape(ShapeKind::Vector),
            HostKind::Star => SourceKind::Shape(ShapeKind::Star),
            HostKind::Polygon => SourceKind::Shape(ShapeKind::Polygon),
            HostKind::Frame
            | HostKind::Component
            | HostKind::ComponentSet
            | HostKind::Instance
            | HostKind::Section => SourceKind::Container,
            HostKind::Group => SourceKind::Group,
            HostKind::Text => SourceKind::Text,
            HostKind::BooleanOperation => SourceKind::BooleanOperation,
            HostKind::Other(name) => SourceKind::Unsupported(name.clone()),
        }
    }

    fn geometry(&self) -> Geometry {
        Geometry::new(self.x, self.y, self.width, self.height).with_rotation(self.rotation)
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn clips_content(&self) -> bool {
        self.clips_content
    }

    fn declared_layout(&self) -> Option<ContainerLayout> {
        let flow = match self.layout_mode? {
            HostLayoutMode::None => return None,
            HostLayoutMode::Horizontal => Flow::Row,
            HostLayoutMode::Vertical => Flow::Column,
        };

        let primary = sizing_mode(self.primary_axis_sizing_mode);
        let counter = sizing_mode(self.counter_axis_sizing_mode);
        let (horizontal_sizing, vertical_sizing) = match flow {
            Flow::Column => (counter, primary),
            _ => (primary, counter),
        };

        Some(ContainerLayout {
            flow,
            origin: FlowOrigin::Explicit,
            horizontal_sizing,
            vertical_sizing,
            padding: Padding {
                top: self.padding_top,
                right: self.padding_right,
                bottom: self.padding_bottom,
                left: self.padding_left,
            },
            item_spacing: self.item_spacing,
            distribution: match self.primary_axis_align_items {
                HostPrimaryAlign::Min => Distribution::Start,
                HostPrimaryAlign::Center => Distribution::Center,
                HostPrimaryAlign::Max => Distribution::End,
                HostPrimaryAlign::SpaceBetween => Distribution::SpaceBetween,
            },
            alignment: match self.counter_axis_align_items {
                HostCounterAlign::Min => Alignment::Start,
                HostCounterAlign::Center => Alignment::Center,
                HostCounterAlign::Max => Alignment::End,
                HostCounterAlign::Baseline => Alignment::Baseline,
            },
            clips_content: self.clips_content,
        })
    }

    fn text(&self, warnings: &mut WarningSink) -> Option<TextContent> {
        if self.kind != HostKind::Text {
            return None;
        }

        let characters = self.characters.clone().unwrap_or_default();
        let runs = if self.styled_segments.is_empty() {
            synthesize_run(self, &characters, warnings).into_iter().collect()
        } else {
            self.styled_segments
                .iter()
                .map(|segment| convert_segment(segment, warnings))
                .collect()
        };

        Some(TextContent {
            characters,
            font_size: self.font_size,
            font: self.font_name.clone(),
            align_horizontal: self.text_align_horizontal,
            align_vertical: self.text_align_vertical,
            auto_resize: self.text_auto_resize,
            runs,
        })
    }

    fn properties(&self, warnings: &mut WarningSink) -> NodeProps {
        let fills = match &self.fills {
            Mixed::Known(paints) => convert_paints(paints, warnings),
            // Per-character fills live on the text runs
            Mixed::Indeterminate => Vec::new(),
        };

        NodeProps {
            id: NodeId::from(self.id.as_str()),
            name: self.name.clone(),
            geometry: SourceNode::geometry(self),
            bounds: Default::default(),
            visible: self.visible,
            opacity: self.opacity.clamp(0.0, 1.0),
            blend_mode: self.blend_mode,
            fills,
            strokes: convert_paints(&self.strokes, warnings),
            stroke_weight: self.stroke_weight,
            stroke_align: self.stroke_align,
            corner_radii: corner_radii(self),
            effects: self.effects.iter().copied().filter(|e| e.is_visible()).collect(),
            layout_grow: self.layout_grow,
            layout_align: self.layout_align,
            properties: self.extra.clone(),
        }
    }

    fn child_nodes(&self) -> Vec<Self> {
        let node: &'a HostNode = self;
        node.children.iter().collect()
    }
}

fn sizing_mode(mode: HostSizingMode) -> SizingMode {
    match mode {
        HostSizingMode::Fixed => SizingMode::Fixed,
        HostSizingMode::Auto => SizingMode::Hug,
    }
}

/// Per-corner radii win over the shorthand; missing corners fall back to it.
fn corner_radii(node: &HostNode) -> CornerRadii {
    let uniform = node.corner_radius.known().copied().unwrap_or(0.0);
    let corners = [
        node.top_left_radius,
        node.top_right_radius,
        node.bottom_right_radius,
        node.bottom_left_radius,
    ];
    if corners.iter().all(Option::is_none) {
        return CornerRadii::Uniform(uniform);
    }
    let [tl, tr, br, bl] = corners.map(|c| c.unwrap_or(uniform));
    CornerRadii::from_corners(tl, tr, br, bl)
}

/// Convert host paints, dropping invisible ones and warning about unknown kinds.
pub fn convert_paints(paints: &[HostPaint], warnings: &mut WarningSink) -> Vec<Paint> {
    paints
        .iter()
        .filter(|paint| paint.is_visible())
        .filter_map(|paint| convert_paint(paint, warnings))
        .collect()
}

fn gradient(stops: &[HostGradientStop], transform: Transform2D, opacity: f64) -> GradientPaint {
    GradientPaint {
        stops: stops
            .iter()
            .map(|s| GradientStop { position: s.position, color: s.color })
            .collect(),
        transform,
        opacity,
    }
}

fn convert_paint(paint: &HostPaint, warnings: &mut WarningSink) -> Option<Paint> {
    Some(match paint {
        HostPaint::Solid { color, opacity, .. } => Paint::Solid {
            color: *color,
            opacity: *opacity,
        },
        HostPaint::GradientLinear { gradient_stops, gradient_transform, opacity, .. } => {
            Paint::LinearGradient(gradient(gradient_stops, *gradient_transform, *opacity))
        }
        HostPaint::GradientRadial { gradient_stops, gradient_transform, opacity, .. } => {
            Paint::RadialGradient(gradient(gradient_stops, *gradient_transform, *opacity))
        }
        HostPaint::GradientAngular { gradient_stops, gradient_transform, opacity, .. } => {
            Paint::AngularGradient(gradient(gradient_stops, *gradient_transform, *opacity))
        }
        HostPaint::Image { image_hash, scale_mode, opacity, .. } => Paint::Image(ImagePlaceholder {
            image_ref: image_hash.clone(),
            scale_mode: *scale_mode,
            opacity: *opacity,
        }),
        HostPaint::Unsupported => {
            warnings.warn("Unsupported paint kind dropped");
            return None;
        }
    })
}

fn convert_segment(segment: &HostTextSegment, warnings: &mut WarningSink) -> TextRun {
    TextRun {
        characters: segment.characters.clone(),
        font: segment.font_name.clone(),
        font_weight: segment.font_weight,
        font_size: segment.font_size,
        line_height: segment.line_height,
        letter_spacing: segment.letter_spacing,
        decoration: segment.text_decoration,
        case: segment.text_case,
        fills: convert_paints(&segment.fills, warnings),
    }
}

/// Fallback font size when a text node reports neither segments nor a uniform size.
const FALLBACK_FONT_SIZE: f64 = 12.0;

/// One run covering the whole node, built from node-level styling.
fn synthesize_run(
    node: &HostNode,
    characters: &str,
    warnings: &mut WarningSink,
) -> Option<TextRun> {
    if characters.is_empty() {
        return None;
    }

    if node.font_size.is_indeterminate() || node.font_name.is_indeterminate() {
        warnings.warn(format!(
            "Text '{}' at ({}, {}) has mixed styles but no styled segments; using defaults",
            node.name, node.x, node.y
        ));
    }

    let fills = match &node.fills {
        Mixed::Known(paints) => convert_paints(paints, warnings),
        Mixed::Indeterminate => Vec::new(),
    };

    Some(TextRun {
        characters: characters.to_string(),
        font: node.font_name.known().cloned().unwrap_or_default(),
        font_weight: 400,
        font_size: node
            .font_size
            .known()
            .copied()
            .filter(|size| *size > 0.0)
            .unwrap_or(FALLBACK_FONT_SIZE),
        line_height: Default::default(),
        letter_spacing: Default::default(),
        decoration: Default::default(),
        case: Default::default(),
        fills,
    })
}

// ============================================================================
// Normalized trees
// ============================================================================

/// A node of an existing [`NormalizedTree`], viewed as normalization input.
#[derive(Debug, Clone, Copy)]
pub struct TreeNode<'a> {
    tree: &'a NormalizedTree,
    node: &'a NormalizedNode,
}

impl<'a> TreeNode<'a> {
    pub fn new(tree: &'a NormalizedTree, index: NodeIndex) -> Option<Self> {
        tree.get(index).map(|node| Self { tree, node })
    }

    /// The roots of a tree, in order.
    pub fn roots(tree: &'a NormalizedTree) -> Vec<Self> {
        tree.roots()
            .iter()
            .filter_map(|&index| Self::new(tree, index))
            .collect()
    }
}

impl<'a> SourceNode for TreeNode<'a> {
    fn id(&self) -> &str {
        self.node.id().as_str()
    }

    fn name(&self) -> &str {
        self.node.name()
    }

    fn kind(&self) -> SourceKind {
        match &self.node.kind {
            NodeKind::Rectangle => SourceKind::Rectangle,
            NodeKind::Ellipse => SourceKind::Ellipse,
            NodeKind::Line => SourceKind::Line,
            NodeKind::Shape(shape) => SourceKind::Shape(*shape),
            NodeKind::Group => SourceKind::Group,
            NodeKind::Container(_) => SourceKind::Container,
            NodeKind::Text(_) => SourceKind::Text,
            NodeKind::BooleanPlaceholder => SourceKind::BooleanOperation,
        }
    }

    fn geometry(&self) -> Geometry {
        *self.node.geometry()
    }

    fn is_visible(&self) -> bool {
        self.node.props.visible
    }

    fn clips_content(&self) -> bool {
        self.node.layout().is_some_and(|l| l.clips_content)
    }

    fn declared_layout(&self) -> Option<ContainerLayout> {
        self.node.layout().cloned()
    }

    fn text(&self, _warnings: &mut WarningSink) -> Option<TextContent> {
        self.node.text_content().cloned()
    }

    fn properties(&self, _warnings: &mut WarningSink) -> NodeProps {
        self.node.props.clone()
    }

    fn child_nodes(&self) -> Vec<Self> {
        let (tree, node) = (self.tree, self.node);
        node.children
            .iter()
            .filter_map(|&index| TreeNode::new(tree, index))
            .collect()
    }
}
