//! Normalized tree data structures.
//!
//! The normalized tree is an arena of detached node snapshots. Children are
//! owned index lists; the parent link is a plain index used for lookups only.

use indexmap::IndexMap;
use sprout_core::{
    Axis, BlendMode, CornerRadii, Effect, Geometry, LayoutAlign, LayoutError, Mixed, NodeId, Paint,
    StrokeAlign, TextContent,
};

use crate::inference::{Alignment, Distribution, Flow, Padding};

/// Index of a node within a [`NormalizedTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub usize);

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    /// Position relative to parent
    pub x: f64,
    pub y: f64,
    /// Size of the box
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    /// Create bounds with position and size.
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Get the right edge (x + width).
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Get the bottom edge (y + height).
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Start coordinate along an axis.
    pub fn start(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// End coordinate along an axis.
    pub fn end(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.right(),
            Axis::Vertical => self.bottom(),
        }
    }

    /// Extent along an axis.
    pub fn extent(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Check whether `other` lies within these bounds, allowing `tolerance` on every edge.
    pub fn contains_bounds(&self, other: &Bounds, tolerance: f64) -> bool {
        other.x >= self.x - tolerance
            && other.y >= self.y - tolerance
            && other.right() <= self.right() + tolerance
            && other.bottom() <= self.bottom() + tolerance
    }

    /// Compute union (bounding box) with another bounds.
    pub fn union(&self, other: &Bounds) -> Bounds {
        let x1 = self.x.min(other.x);
        let y1 = self.y.min(other.y);
        let x2 = self.right().max(other.right());
        let y2 = self.bottom().max(other.bottom());
        Bounds::new(x1, y1, x2 - x1, y2 - y1)
    }

    /// Same size, shifted by `(dx, dy)`.
    pub fn translate(&self, dx: f64, dy: f64) -> Bounds {
        Bounds::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

/// Geometric flavour of a flattened vector shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Vector,
    Star,
    Polygon,
}

/// Sizing behaviour of a flow container on one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizingMode {
    #[default]
    Fixed,
    /// Shrink-wrap the children
    Hug,
}

/// Whether a container's flow came from the host or from inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowOrigin {
    #[default]
    Explicit,
    Inferred,
}

/// Layout facts of a frame-like container.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContainerLayout {
    /// Row, column, or free-form children
    pub flow: Flow,
    pub origin: FlowOrigin,
    pub horizontal_sizing: SizingMode,
    pub vertical_sizing: SizingMode,
    pub padding: Padding,
    /// Gap between consecutive flow children
    pub item_spacing: f64,
    /// Main-axis distribution
    pub distribution: Distribution,
    /// Cross-axis alignment
    pub alignment: Alignment,
    pub clips_content: bool,
}

impl ContainerLayout {
    /// Free-form container with children at absolute offsets.
    pub fn free_form(clips_content: bool) -> Self {
        Self {
            clips_content,
            ..Default::default()
        }
    }

    pub fn sizing(&self, axis: Axis) -> SizingMode {
        match axis {
            Axis::Horizontal => self.horizontal_sizing,
            Axis::Vertical => self.vertical_sizing,
        }
    }

    pub fn set_sizing(&mut self, axis: Axis, mode: SizingMode) {
        match axis {
            Axis::Horizontal => self.horizontal_sizing = mode,
            Axis::Vertical => self.vertical_sizing = mode,
        }
    }
}

/// Variant-specific part of a normalized node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Rectangle,
    Ellipse,
    Line,
    Shape(ShapeKind),
    Group,
    Container(ContainerLayout),
    Text(TextContent),
    /// Boolean-operation result rendered as a rectangle with an image placeholder
    BooleanPlaceholder,
}

impl NodeKind {
    /// Short name used in logs and warnings.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Rectangle => "rectangle",
            NodeKind::Ellipse => "ellipse",
            NodeKind::Line => "line",
            NodeKind::Shape(ShapeKind::Vector) => "vector",
            NodeKind::Shape(ShapeKind::Star) => "star",
            NodeKind::Shape(ShapeKind::Polygon) => "polygon",
            NodeKind::Group => "group",
            NodeKind::Container(_) => "container",
            NodeKind::Text(_) => "text",
            NodeKind::BooleanPlaceholder => "boolean placeholder",
        }
    }
}

/// Properties shared by every node variant.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeProps {
    pub id: NodeId,
    pub name: String,
    pub geometry: Geometry,
    /// Axis-aligned box enclosing the rotated node, relative to the parent
    pub bounds: Bounds,
    pub visible: bool,
    pub opacity: f64,
    pub blend_mode: BlendMode,
    pub fills: Vec<Paint>,
    pub strokes: Vec<Paint>,
    pub stroke_weight: Mixed<f64>,
    pub stroke_align: StrokeAlign,
    pub corner_radii: CornerRadii,
    pub effects: Vec<Effect>,
    /// Main-axis grow factor inside a flow parent
    pub layout_grow: f64,
    /// Cross-axis participation inside a flow parent
    pub layout_align: LayoutAlign,
    /// Host properties carried through without interpretation
    pub properties: IndexMap<String, serde_json::Value>,
}

impl NodeProps {
    /// Move the node by `(dx, dy)` in its parent's space.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.geometry.x += dx;
        self.geometry.y += dy;
        self.bounds = self.bounds.translate(dx, dy);
    }
}

/// A detached snapshot of one design element.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedNode {
    pub kind: NodeKind,
    pub props: NodeProps,
    /// Parent node (lookup only)
    pub parent: Option<NodeIndex>,
    /// Children in paint order, or flow order for inferred rows/columns
    pub children: Vec<NodeIndex>,
}

impl NormalizedNode {
    fn with_kind(kind: NodeKind, props: NodeProps) -> Self {
        Self {
            kind,
            props,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn rectangle(props: NodeProps) -> Self {
        Self::with_kind(NodeKind::Rectangle, props)
    }

    pub fn ellipse(props: NodeProps) -> Self {
        Self::with_kind(NodeKind::Ellipse, props)
    }

    pub fn line(props: NodeProps) -> Self {
        Self::with_kind(NodeKind::Line, props)
    }

    pub fn shape(shape: ShapeKind, props: NodeProps) -> Self {
        Self::with_kind(NodeKind::Shape(shape), props)
    }

    pub fn group(props: NodeProps) -> Self {
        Self::with_kind(NodeKind::Group, props)
    }

    pub fn container(props: NodeProps, layout: ContainerLayout) -> Self {
        Self::with_kind(NodeKind::Container(layout), props)
    }

    pub fn text(props: NodeProps, content: TextContent) -> Self {
        Self::with_kind(NodeKind::Text(content), props)
    }

    /// Boolean-operation stand-in: the fills are replaced with one opaque image placeholder.
    pub fn boolean_placeholder(mut props: NodeProps) -> Self {
        props.fills = vec![Paint::placeholder_image()];
        Self::with_kind(NodeKind::BooleanPlaceholder, props)
    }

    pub fn id(&self) -> &NodeId {
        &self.props.id
    }

    pub fn name(&self) -> &str {
        &self.props.name
    }

    pub fn geometry(&self) -> &Geometry {
        &self.props.geometry
    }

    pub fn bounds(&self) -> Bounds {
        self.props.bounds
    }

    /// Container layout, if this node is a container.
    pub fn layout(&self) -> Option<&ContainerLayout> {
        match &self.kind {
            NodeKind::Container(layout) => Some(layout),
            _ => None,
        }
    }

    /// Flow this node imposes on its children.
    pub fn flow(&self) -> Flow {
        self.layout().map(|l| l.flow).unwrap_or(Flow::None)
    }

    pub fn text_content(&self) -> Option<&TextContent> {
        match &self.kind {
            NodeKind::Text(content) => Some(content),
            _ => None,
        }
    }

    /// Measured length along an axis.
    pub fn length(&self, axis: Axis) -> f64 {
        match axis {
            Axis::Horizontal => self.props.geometry.width,
            Axis::Vertical => self.props.geometry.height,
        }
    }
}

/// The complete normalized snapshot of a selection.
#[derive(Debug, Clone, Default)]
pub struct NormalizedTree {
    /// All nodes, indexed by [`NodeIndex`]
    nodes: Vec<NormalizedNode>,
    /// Top-level nodes in selection order
    roots: Vec<NodeIndex>,
}

impl NormalizedTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a detached node and return its index.
    pub fn insert(&mut self, node: NormalizedNode) -> NodeIndex {
        let index = NodeIndex(self.nodes.len());
        self.nodes.push(node);
        index
    }

    /// Mark a stored node as a top-level node.
    pub fn add_root(&mut self, index: NodeIndex) {
        if let Some(node) = self.nodes.get_mut(index.0) {
            node.parent = None;
            self.roots.push(index);
        }
    }

    /// Append `child` to `parent`'s children and point the child back at it.
    pub fn attach(&mut self, parent: NodeIndex, child: NodeIndex) -> Result<(), LayoutError> {
        self.node(parent)?;
        self.node_mut(child)?.parent = Some(parent);
        self.node_mut(parent)?.children.push(child);
        Ok(())
    }

    /// Get a node by index.
    pub fn get(&self, index: NodeIndex) -> Option<&NormalizedNode> {
        self.nodes.get(index.0)
    }

    /// Get a mutable node by index.
    pub fn get_mut(&mut self, index: NodeIndex) -> Option<&mut NormalizedNode> {
        self.nodes.get_mut(index.0)
    }

    /// Get a node by index, failing for unknown indices.
    pub fn node(&self, index: NodeIndex) -> Result<&NormalizedNode, LayoutError> {
        self.get(index)
            .ok_or(LayoutError::UnknownNode { index: index.0 })
    }

    /// Get a mutable node by index, failing for unknown indices.
    pub fn node_mut(&mut self, index: NodeIndex) -> Result<&mut NormalizedNode, LayoutError> {
        self.get_mut(index)
            .ok_or(LayoutError::UnknownNode { index: index.0 })
    }

    /// Get the root nodes.
    pub fn roots(&self) -> &[NodeIndex] {
        &self.roots
    }

    /// Get children of a node.
    pub fn children(&self, index: NodeIndex) -> impl Iterator<Item = (NodeIndex, &NormalizedNode)> {
        self.get(index)
            .into_iter()
            .flat_map(|n| n.children.iter())
            .filter_map(move |&child| self.get(child).map(|node| (child, node)))
    }

    /// Get the parent of a node.
    pub fn parent(&self, index: NodeIndex) -> Option<&NormalizedNode> {
        self.get(index)
            .and_then(|n| n.parent)
            .and_then(|p| self.get(p))
    }

    /// All nodes reachable from the roots, depth-first in child order.
    pub fn walk(&self) -> Vec<NodeIndex> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeIndex> = self.roots.iter().rev().copied().collect();
        while let Some(index) = stack.pop() {
            out.push(index);
            if let Some(node) = self.get(index) {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        out
    }

    /// Number of nodes reachable from the roots.
    pub fn len(&self) -> usize {
        self.walk().len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Find a reachable node by its host id.
    pub fn find_by_id(&self, id: &str) -> Option<NodeIndex> {
        self.walk()
            .into_iter()
            .find(|&index| self.get(index).is_some_and(|n| n.props.id.as_str() == id))
    }

    /// Absolute position of a node's layout box, summing parent offsets.
    pub fn absolute_bounds(&self, index: NodeIndex) -> Result<Bounds, LayoutError> {
        let node = self.node(index)?;
        let mut bounds = node.props.bounds;
        let mut current = node.parent;
        while let Some(parent) = current {
            let parent_node = self.node(parent)?;
            let origin = parent_node.props.geometry;
            bounds = bounds.translate(origin.x, origin.y);
            current = parent_node.parent;
        }
        Ok(bounds)
    }

    /// Structural equality of two subtrees, ignoring arena positions.
    pub fn subtree_eq(
        &self,
        index: NodeIndex,
        other: &NormalizedTree,
        other_index: NodeIndex,
    ) -> bool {
        let (Some(a), Some(b)) = (self.get(index), other.get(other_index)) else {
            return false;
        };
        a.kind == b.kind
            && a.props == b.props
            && a.children.len() == b.children.len()
            && a.children
                .iter()
                .zip(&b.children)
                .all(|(&x, &y)| self.subtree_eq(x, other, y))
    }

    /// Structural equality of two whole trees.
    pub fn structurally_eq(&self, other: &NormalizedTree) -> bool {
        self.roots.len() == other.roots.len()
            && self
                .roots
                .iter()
                .zip(&other.roots)
                .all(|(&a, &b)| self.subtree_eq(a, other, b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(id: &str, x: f64, y: f64, w: f64, h: f64) -> NodeProps {
        NodeProps {
            id: NodeId::from(id),
            name: id.to_string(),
            geometry: Geometry::new(x, y, w, h),
            bounds: Bounds::new(x, y, w, h),
            visible: true,
            opacity: 1.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_bounds_containment() {
        let outer = Bounds::new(0.0, 0.0, 100.0, 100.0);
        assert!(outer.contains_bounds(&Bounds::new(10.0, 10.0, 50.0, 50.0), 0.0));
        assert!(!outer.contains_bounds(&Bounds::new(60.0, 10.0, 50.0, 50.0), 0.0));
        assert!(outer.contains_bounds(&Bounds::new(-0.4, 0.0, 100.4, 100.0), 0.5));
    }

    #[test]
    fn test_bounds_union() {
        let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
        let b = Bounds::new(20.0, 5.0, 10.0, 10.0);
        let u = a.union(&b);
        assert!((u.width - 30.0).abs() < 0.001);
        assert!((u.height - 15.0).abs() < 0.001);
    }

    #[test]
    fn test_attach_links_both_directions() {
        let mut tree = NormalizedTree::new();
        let root = tree.insert(NormalizedNode::container(
            props("root", 0.0, 0.0, 100.0, 100.0),
            ContainerLayout::default(),
        ));
        let child = tree.insert(NormalizedNode::rectangle(props("child", 10.0, 20.0, 5.0, 5.0)));
        tree.attach(root, child).unwrap();
        tree.add_root(root);

        assert_eq!(tree.get(child).unwrap().parent, Some(root));
        assert_eq!(tree.children(root).count(), 1);
        assert_eq!(tree.parent(child).unwrap().name(), "root");
        assert_eq!(tree.walk(), vec![root, child]);
        assert_eq!(tree.find_by_id("child"), Some(child));
    }

    #[test]
    fn test_absolute_bounds() {
        let mut tree = NormalizedTree::new();
        let root = tree.insert(NormalizedNode::container(
            props("root", 100.0, 50.0, 300.0, 300.0),
            ContainerLayout::default(),
        ));
        let child = tree.insert(NormalizedNode::rectangle(props("child", 10.0, 20.0, 5.0, 5.0)));
        tree.attach(root, child).unwrap();
        tree.add_root(root);

        let abs = tree.absolute_bounds(child).unwrap();
        assert!((abs.x - 110.0).abs() < 0.001);
        assert!((abs.y - 70.0).abs() < 0.001);
    }

    #[test]
    fn test_unknown_index_is_an_error() {
        let tree = NormalizedTree::new();
        assert_eq!(
            tree.node(NodeIndex(3)).unwrap_err(),
            LayoutError::UnknownNode { index: 3 }
        );
    }

    #[test]
    fn test_boolean_placeholder_replaces_fills() {
        let mut p = props("bool", 0.0, 0.0, 10.0, 10.0);
        p.fills = vec![Paint::solid(sprout_core::Color::BLACK)];
        let node = NormalizedNode::boolean_placeholder(p);
        assert_eq!(node.props.fills, vec![Paint::placeholder_image()]);
        assert!(node.children.is_empty());
    }
}
