//! Structural normalization of a selection into a [`NormalizedTree`].

use serde::{Deserialize, Serialize};
use sprout_core::{Axis, HostNode, LayoutError, NormalizeError};
use sprout_layout::{
    claims_fill, infer_layout, ContainerLayout, FlowOrigin, InferredLayout, LayoutItem,
    LayoutTolerances, NodeIndex, NodeKind, NormalizedNode, NormalizedTree, SizingMode,
};

use crate::cloner::clone_node;
use crate::context::ConversionContext;
use crate::source::{SourceKind, SourceNode, TreeNode};

/// Options for normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeOptions {
    /// Pixel tolerances for layout inference
    pub tolerances: LayoutTolerances,
    /// Reconstruct flows for containers that declare none
    pub infer_layout: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            tolerances: LayoutTolerances::default(),
            infer_layout: true,
        }
    }
}

impl NormalizeOptions {
    pub fn with_tolerances(mut self, tolerances: LayoutTolerances) -> Self {
        self.tolerances = tolerances;
        self
    }

    /// Keep free-form containers free-form.
    pub fn without_inference(mut self) -> Self {
        self.infer_layout = false;
        self
    }
}

/// Context for one normalization pass.
struct Normalizer<'a> {
    options: &'a NormalizeOptions,
    ctx: &'a mut ConversionContext,
    tree: NormalizedTree,
}

/// Normalize a selection of source nodes.
///
/// The context is reset first; afterwards it holds this run's warnings and
/// text runs.
pub fn normalize<S: SourceNode>(
    roots: &[S],
    options: &NormalizeOptions,
    ctx: &mut ConversionContext,
) -> Result<NormalizedTree, NormalizeError> {
    ctx.reset();
    let mut normalizer = Normalizer {
        options,
        ctx,
        tree: NormalizedTree::new(),
    };

    let mut top_level = Vec::new();
    for root in roots {
        if let Some(index) = normalizer.normalize_node(root, None)? {
            top_level.push(index);
        }
    }

    let mut tree = normalizer.tree;
    for index in top_level {
        tree.add_root(index);
    }

    tracing::debug!(
        "Normalized {} roots into {} nodes with {} warnings",
        roots.len(),
        tree.len(),
        normalizer.ctx.warnings().len()
    );
    Ok(tree)
}

/// Normalize the host's top-level nodes.
pub fn normalize_selection(
    selection: &[HostNode],
    options: &NormalizeOptions,
    ctx: &mut ConversionContext,
) -> Result<NormalizedTree, NormalizeError> {
    let roots: Vec<&HostNode> = selection.iter().collect();
    normalize(&roots, options, ctx)
}

/// Parse and normalize a selection exported as JSON.
pub fn normalize_json(
    json: &str,
    options: &NormalizeOptions,
    ctx: &mut ConversionContext,
) -> Result<NormalizedTree, NormalizeError> {
    let selection = HostNode::selection_from_json(json)?;
    normalize_selection(&selection, options, ctx)
}

/// Run normalization again over an already normalized tree.
pub fn renormalize(
    tree: &NormalizedTree,
    options: &NormalizeOptions,
    ctx: &mut ConversionContext,
) -> Result<NormalizedTree, NormalizeError> {
    normalize(&TreeNode::roots(tree), options, ctx)
}

impl<'a> Normalizer<'a> {
    fn normalize_node<S: SourceNode>(
        &mut self,
        source: &S,
        parent: Option<NodeIndex>,
    ) -> Result<Option<NodeIndex>, NormalizeError> {
        if !source.is_visible() {
            tracing::debug!("Skipping hidden node '{}'", source.name());
            return Ok(None);
        }

        let kind = source.kind();
        if let SourceKind::Unsupported(name) = &kind {
            self.ctx
                .warnings_mut()
                .warn(format!("Unsupported node kind '{}' omitted", name));
            return Ok(None);
        }

        let geometry = source.geometry();
        if geometry.is_degenerate() {
            self.ctx.warnings_mut().warn(format!(
                "{} '{}' at ({}, {}) has degenerate size {}x{}; dropped",
                kind.label(),
                source.name(),
                geometry.x,
                geometry.y,
                geometry.width,
                geometry.height
            ));
            return Ok(None);
        }

        match kind {
            SourceKind::Container | SourceKind::Group if source.id().is_empty() => {
                Err(NormalizeError::MissingId {
                    kind: kind.label().to_string(),
                    name: source.name().to_string(),
                    x: geometry.x,
                    y: geometry.y,
                })
            }
            SourceKind::Container => self.normalize_container(source, parent),
            SourceKind::Group => self.normalize_group(source, parent),
            SourceKind::Text => self.normalize_text(source, parent),
            _ => self.normalize_leaf(source, parent),
        }
    }

    fn normalize_leaf<S: SourceNode>(
        &mut self,
        source: &S,
        parent: Option<NodeIndex>,
    ) -> Result<Option<NodeIndex>, NormalizeError> {
        Ok(clone_node(source, parent, self.ctx.warnings_mut()).map(|node| self.tree.insert(node)))
    }

    fn normalize_text<S: SourceNode>(
        &mut self,
        source: &S,
        parent: Option<NodeIndex>,
    ) -> Result<Option<NodeIndex>, NormalizeError> {
        let Some(node) = clone_node(source, parent, self.ctx.warnings_mut()) else {
            return Ok(None);
        };
        if let Some(content) = node.text_content() {
            self.ctx
                .text_runs_mut()
                .insert(node.id().clone(), content.runs.clone());
        }
        Ok(Some(self.tree.insert(node)))
    }

    fn normalize_container<S: SourceNode>(
        &mut self,
        source: &S,
        parent: Option<NodeIndex>,
    ) -> Result<Option<NodeIndex>, NormalizeError> {
        let Some(node) = clone_node(source, parent, self.ctx.warnings_mut()) else {
            return Ok(None);
        };
        let index = self.tree.insert(node);
        let children = self.normalize_children(source, index)?;

        if children.is_empty() {
            let container = self.tree.node(index)?;
            tracing::debug!(
                "Container '{}' has no children; emitting a rectangle",
                container.name()
            );
            let mut rectangle = NormalizedNode::rectangle(container.props.clone());
            rectangle.parent = parent;
            *self.tree.node_mut(index)? = rectangle;
            return Ok(Some(index));
        }

        self.tree.node_mut(index)?.children = children;
        if source.declared_layout().is_none() && self.options.infer_layout {
            self.infer_container_layout(index)?;
        }
        self.settle_child_sizing(index)?;
        Ok(Some(index))
    }

    fn normalize_group<S: SourceNode>(
        &mut self,
        source: &S,
        parent: Option<NodeIndex>,
    ) -> Result<Option<NodeIndex>, NormalizeError> {
        let Some(node) = clone_node(source, parent, self.ctx.warnings_mut()) else {
            return Ok(None);
        };
        let index = self.tree.insert(node);
        let children = self.normalize_children(source, index)?;

        match children.as_slice() {
            [] => {
                tracing::debug!("Dropping group '{}' with no visible children", source.name());
                return Ok(None);
            }
            [only] => return self.unwrap_group(index, *only, parent).map(Some),
            _ => {}
        }

        self.tree.node_mut(index)?.children = children;
        if self.options.infer_layout {
            let inferred = self.infer_children(index)?;
            if inferred.promoted.is_some() {
                let children = self.tree.node(index)?.children.clone();
                let promoted = self.promote_background(index, &children, &inferred)?;
                return self.unwrap_group(index, promoted, parent).map(Some);
            }
        }
        Ok(Some(index))
    }

    fn normalize_children<S: SourceNode>(
        &mut self,
        source: &S,
        parent: NodeIndex,
    ) -> Result<Vec<NodeIndex>, NormalizeError> {
        let mut children = Vec::new();
        for child in source.child_nodes() {
            if let Some(index) = self.normalize_node(&child, Some(parent))? {
                children.push(index);
            }
        }
        Ok(children)
    }

    /// Replace a group by its only child, rebased into the group's parent space.
    fn unwrap_group(
        &mut self,
        group: NodeIndex,
        child: NodeIndex,
        parent: Option<NodeIndex>,
    ) -> Result<NodeIndex, NormalizeError> {
        let origin = *self.tree.node(group)?.geometry();
        let node = self.tree.node_mut(child)?;
        node.props.translate(origin.x, origin.y);
        node.parent = parent;
        tracing::debug!("Unwrapped single-child group into '{}'", node.name());
        Ok(child)
    }

    fn infer_children(&self, index: NodeIndex) -> Result<InferredLayout, LayoutError> {
        let node = self.tree.node(index)?;
        let items = node
            .children
            .iter()
            .map(|&child| {
                let child = self.tree.node(child)?;
                Ok(LayoutItem::new(child.bounds(), is_promotable(child)))
            })
            .collect::<Result<Vec<_>, LayoutError>>()?;
        Ok(infer_layout(&items, &self.options.tolerances))
    }

    fn infer_container_layout(&mut self, index: NodeIndex) -> Result<(), NormalizeError> {
        let inferred = self.infer_children(index)?;
        let children = self.tree.node(index)?.children.clone();

        if inferred.promoted.is_some() {
            self.promote_background(index, &children, &inferred)?;
            if let NodeKind::Container(layout) = &mut self.tree.node_mut(index)?.kind {
                layout.origin = FlowOrigin::Inferred;
            }
        } else if inferred.flow.is_flow() {
            let node = self.tree.node_mut(index)?;
            node.children = inferred.order.iter().map(|&k| children[k]).collect();
            if let NodeKind::Container(layout) = &mut node.kind {
                layout.flow = inferred.flow;
                layout.origin = FlowOrigin::Inferred;
                layout.item_spacing = inferred.spacing;
                layout.alignment = inferred.alignment;
            }
            tracing::debug!("Inferred {:?} flow for '{}'", inferred.flow, node.name());
        }
        Ok(())
    }

    /// Turn the promoted child into a container holding its former siblings.
    ///
    /// The new container takes the background's place under `parent`; the old
    /// background slot is left unreachable.
    fn promote_background(
        &mut self,
        parent: NodeIndex,
        children: &[NodeIndex],
        inferred: &InferredLayout,
    ) -> Result<NodeIndex, NormalizeError> {
        let Some(background) = inferred.promoted.and_then(|k| children.get(k).copied()) else {
            return Err(LayoutError::UnknownNode { index: parent.0 }.into());
        };
        let props = self.tree.node(background)?.props.clone();
        let origin = props.geometry;
        tracing::debug!("Promoting '{}' to background of its siblings", props.name);

        let layout = ContainerLayout {
            flow: inferred.flow,
            origin: FlowOrigin::Inferred,
            padding: inferred.padding,
            item_spacing: inferred.spacing,
            alignment: inferred.alignment,
            ..Default::default()
        };
        let mut container = NormalizedNode::container(props, layout);
        container.parent = Some(parent);
        let promoted = self.tree.insert(container);

        for &k in &inferred.order {
            let child = children[k];
            self.tree.node_mut(child)?.props.translate(-origin.x, -origin.y);
            self.tree.attach(promoted, child)?;
        }

        self.settle_child_sizing(promoted)?;
        self.tree.node_mut(parent)?.children = vec![promoted];
        Ok(promoted)
    }

    /// A child filling its parent on an axis cannot also hug on that axis.
    fn settle_child_sizing(&mut self, index: NodeIndex) -> Result<(), NormalizeError> {
        let node = self.tree.node(index)?;
        let flow = node.flow();
        if !flow.is_flow() {
            return Ok(());
        }

        for child in node.children.clone() {
            let child = self.tree.node_mut(child)?;
            let filled: Vec<Axis> = [Axis::Horizontal, Axis::Vertical]
                .into_iter()
                .filter(|&axis| claims_fill(flow, child, axis))
                .collect();
            if let NodeKind::Container(layout) = &mut child.kind {
                for axis in filled {
                    if layout.sizing(axis) == SizingMode::Hug {
                        layout.set_sizing(axis, SizingMode::Fixed);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Kinds that may host their siblings after promotion.
fn is_promotable(node: &NormalizedNode) -> bool {
    match node.kind {
        NodeKind::Rectangle => true,
        NodeKind::Container(_) => node.children.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::{json, Value};
    use sprout_core::Paint;
    use sprout_layout::{resolve_sizing, AxisSizing, Flow};

    fn run(selection: Value) -> (NormalizedTree, ConversionContext) {
        let mut ctx = ConversionContext::new();
        let options = NormalizeOptions::default();
        let tree = normalize_json(&selection.to_string(), &options, &mut ctx).unwrap();
        (tree, ctx)
    }

    fn rect(id: &str, x: f64, y: f64, w: f64, h: f64) -> Value {
        json!({
            "id": id,
            "name": id,
            "type": "RECTANGLE",
            "x": x,
            "y": y,
            "width": w,
            "height": h
        })
    }

    fn assert_idempotent(tree: &NormalizedTree) {
        let mut ctx = ConversionContext::new();
        let again = renormalize(tree, &NormalizeOptions::default(), &mut ctx).unwrap();
        assert!(tree.structurally_eq(&again), "re-normalizing changed the tree");
    }

    #[test]
    fn test_two_rectangles_become_a_row() {
        let (tree, _) = run(json!({
            "id": "1:1",
            "name": "Container",
            "type": "FRAME",
            "width": 100.0,
            "height": 100.0,
            "children": [rect("a", 0.0, 0.0, 40.0, 100.0), rect("b", 60.0, 0.0, 40.0, 100.0)]
        }));

        let root = tree.roots()[0];
        let layout = tree.node(root).unwrap().layout().unwrap();
        assert_eq!(layout.flow, Flow::Row);
        assert_eq!(layout.origin, FlowOrigin::Inferred);
        assert!((layout.item_spacing - 20.0).abs() < 0.001);

        for (index, _) in tree.children(root) {
            let (w, h) = resolve_sizing(&tree, index).unwrap();
            assert_eq!(w, AxisSizing::Fixed(40.0));
            assert_eq!(h, AxisSizing::Fixed(100.0));
        }
        assert_idempotent(&tree);
    }

    #[test]
    fn test_inferred_row_orders_children_left_to_right() {
        let (tree, _) = run(json!({
            "id": "1:1",
            "type": "FRAME",
            "width": 100.0,
            "height": 20.0,
            "children": [rect("right", 60.0, 0.0, 20.0, 20.0), rect("left", 0.0, 0.0, 20.0, 20.0)]
        }));

        let root = tree.roots()[0];
        let names: Vec<&str> = tree.children(root).map(|(_, n)| n.name()).collect();
        assert_eq!(names, vec!["left", "right"]);
    }

    #[test]
    fn test_empty_container_becomes_rectangle() {
        let (tree, _) = run(json!({
            "id": "1:1",
            "name": "Card",
            "type": "FRAME",
            "x": 5.0,
            "width": 80.0,
            "height": 40.0,
            "fills": [{ "type": "SOLID", "color": { "r": 1.0, "g": 1.0, "b": 1.0 } }],
            "children": [{
                "id": "1:2",
                "type": "RECTANGLE",
                "width": 10.0,
                "height": 10.0,
                "visible": false
            }]
        }));

        let node = tree.node(tree.roots()[0]).unwrap();
        assert_eq!(node.kind, NodeKind::Rectangle);
        assert_eq!(node.id().as_str(), "1:1");
        assert_eq!(node.geometry().x, 5.0);
        assert_eq!(node.props.fills, vec![Paint::solid(sprout_core::Color::WHITE)]);
        assert!(node.children.is_empty());
        assert_idempotent(&tree);
    }

    #[test]
    fn test_single_child_group_is_unwrapped() {
        let (tree, _) = run(json!({
            "id": "1:1",
            "type": "FRAME",
            "width": 200.0,
            "height": 200.0,
            "layoutMode": "VERTICAL",
            "children": [{
                "id": "2:1",
                "type": "GROUP",
                "x": 10.0,
                "y": 20.0,
                "width": 50.0,
                "height": 50.0,
                "children": [
                    rect("inner", 5.0, 5.0, 20.0, 20.0),
                    {
                        "id": "hidden",
                        "type": "ELLIPSE",
                        "width": 5.0,
                        "height": 5.0,
                        "visible": false
                    }
                ]
            }]
        }));

        let root = tree.roots()[0];
        assert!(tree.walk().iter().all(|&i| tree.node(i).unwrap().kind != NodeKind::Group));

        let (index, child) = tree.children(root).next().unwrap();
        assert_eq!(child.name(), "inner");
        assert_eq!(tree.node(index).unwrap().parent, Some(root));
        assert!((child.geometry().x - 15.0).abs() < 0.001);
        assert!((child.geometry().y - 25.0).abs() < 0.001);
        assert_idempotent(&tree);
    }

    #[test]
    fn test_group_with_two_children_survives() {
        let (tree, _) = run(json!([{
            "id": "2:1",
            "type": "GROUP",
            "width": 50.0,
            "height": 50.0,
            "children": [rect("a", 0.0, 0.0, 20.0, 20.0), rect("b", 30.0, 30.0, 20.0, 20.0)]
        }]));

        let root = tree.node(tree.roots()[0]).unwrap();
        assert_eq!(root.kind, NodeKind::Group);
        assert_eq!(root.children.len(), 2);
        assert_idempotent(&tree);
    }

    #[test]
    fn test_background_promotion_in_free_form_frame() {
        let (tree, _) = run(json!({
            "id": "1:1",
            "type": "FRAME",
            "width": 300.0,
            "height": 200.0,
            "children": [
                rect("bg", 10.0, 10.0, 200.0, 100.0),
                rect("a", 26.0, 22.0, 40.0, 40.0),
                rect("b", 74.0, 22.0, 40.0, 40.0)
            ]
        }));

        let root = tree.roots()[0];
        let (promoted, bg) = tree.children(root).next().unwrap();
        assert_eq!(tree.node(root).unwrap().children.len(), 1);
        assert_eq!(bg.id().as_str(), "bg");

        let layout = bg.layout().unwrap();
        assert_eq!(layout.flow, Flow::Row);
        assert!((layout.item_spacing - 8.0).abs() < 0.001);
        assert!((layout.padding.left - 16.0).abs() < 0.001);
        assert!((layout.padding.top - 12.0).abs() < 0.001);

        let (_, first) = tree.children(promoted).next().unwrap();
        assert!((first.geometry().x - 16.0).abs() < 0.001);
        assert_eq!(tree.node(promoted).unwrap().parent, Some(root));
        assert_idempotent(&tree);
    }

    #[test]
    fn test_covering_sibling_above_is_not_promoted() {
        let mut cover = rect("cover", 0.0, 0.0, 100.0, 100.0);
        cover["fills"] = json!([{ "type": "SOLID", "color": { "r": 1.0, "g": 0.0, "b": 0.0 } }]);
        let (tree, _) = run(json!({
            "id": "1:1",
            "type": "FRAME",
            "width": 120.0,
            "height": 120.0,
            "children": [rect("below", 10.0, 10.0, 20.0, 20.0), cover]
        }));

        let root = tree.roots()[0];
        let names: Vec<&str> = tree.children(root).map(|(_, n)| n.name()).collect();
        assert_eq!(names, vec!["below", "cover"]);
        assert!(tree.children(root).all(|(_, n)| n.children.is_empty()));
        assert_eq!(tree.node(root).unwrap().flow(), Flow::None);
        assert_idempotent(&tree);
    }

    #[test]
    fn test_group_promotion_unwraps_group() {
        let (tree, _) = run(json!([{
            "id": "2:1",
            "type": "GROUP",
            "x": 100.0,
            "y": 100.0,
            "width": 60.0,
            "height": 30.0,
            "children": [
                rect("pill", 0.0, 0.0, 60.0, 30.0),
                {
                    "id": "label",
                    "type": "TEXT",
                    "x": 10.0,
                    "y": 8.0,
                    "width": 40.0,
                    "height": 14.0,
                    "characters": "Buy"
                }
            ]
        }]));

        let root = tree.node(tree.roots()[0]).unwrap();
        assert_eq!(root.id().as_str(), "pill");
        assert!(root.layout().is_some());
        assert!((root.geometry().x - 100.0).abs() < 0.001);
        assert_eq!(root.children.len(), 1);
        assert_idempotent(&tree);
    }

    #[test]
    fn test_boolean_operation_is_placeholder() {
        let (tree, _) = run(json!([{
            "id": "3:1",
            "type": "BOOLEAN_OPERATION",
            "width": 24.0,
            "height": 24.0,
            "children": [rect("a", 0.0, 0.0, 24.0, 24.0)]
        }]));

        let node = tree.node(tree.roots()[0]).unwrap();
        assert_eq!(node.kind, NodeKind::BooleanPlaceholder);
        assert_eq!(node.props.fills, vec![Paint::placeholder_image()]);
        assert!(node.children.is_empty());
    }

    #[test]
    fn test_unsupported_kinds_warn_once() {
        let (tree, ctx) = run(json!({
            "id": "1:1",
            "type": "FRAME",
            "width": 100.0,
            "height": 100.0,
            "layoutMode": "HORIZONTAL",
            "children": [
                { "id": "s1", "type": "STICKY", "width": 10.0, "height": 10.0 },
                { "id": "s2", "type": "STICKY", "width": 10.0, "height": 10.0 },
                rect("kept", 0.0, 0.0, 10.0, 10.0)
            ]
        }));

        assert_eq!(tree.len(), 2);
        assert_eq!(ctx.warnings().len(), 1);
        assert!(ctx.warnings().messages().next().unwrap().contains("STICKY"));
    }

    #[test]
    fn test_degenerate_nodes_are_dropped() {
        let (tree, ctx) = run(json!([
            rect("zero", 0.0, 0.0, 0.0, 0.0),
            rect("negative", 0.0, 0.0, -5.0, 10.0),
            { "id": "line", "type": "LINE", "width": 40.0, "height": 0.0 }
        ]));

        assert_eq!(tree.roots().len(), 1);
        assert_eq!(tree.node(tree.roots()[0]).unwrap().kind, NodeKind::Line);
        assert_eq!(ctx.warnings().len(), 2);
    }

    #[test]
    fn test_missing_container_id_fails() {
        let mut ctx = ConversionContext::new();
        let selection = json!({
            "id": "1:1",
            "type": "FRAME",
            "width": 100.0,
            "height": 100.0,
            "children": [{
                "name": "Anonymous",
                "type": "FRAME",
                "x": 3.0,
                "y": 4.0,
                "width": 10.0,
                "height": 10.0
            }]
        });
        let options = NormalizeOptions::default();
        let err = normalize_json(&selection.to_string(), &options, &mut ctx).unwrap_err();

        match err {
            NormalizeError::MissingId { name, x, y, .. } => {
                assert_eq!(name, "Anonymous");
                assert_eq!((x, y), (3.0, 4.0));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_group_id_fails() {
        let mut ctx = ConversionContext::new();
        let selection = json!({
            "id": "1:1",
            "type": "FRAME",
            "width": 100.0,
            "height": 100.0,
            "children": [{
                "name": "Loose",
                "type": "GROUP",
                "x": 7.0,
                "y": 9.0,
                "width": 30.0,
                "height": 30.0,
                "children": [rect("a", 0.0, 0.0, 10.0, 10.0), rect("b", 20.0, 20.0, 10.0, 10.0)]
            }]
        });
        let options = NormalizeOptions::default();
        let err = normalize_json(&selection.to_string(), &options, &mut ctx).unwrap_err();

        match err {
            NormalizeError::MissingId { kind, name, x, y } => {
                assert_eq!(kind, "group");
                assert_eq!(name, "Loose");
                assert_eq!((x, y), (7.0, 9.0));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let mut ctx = ConversionContext::new();
        let err = normalize_json("{ not json", &NormalizeOptions::default(), &mut ctx).unwrap_err();
        assert!(matches!(err, NormalizeError::InvalidInput(_)));
    }

    #[test]
    fn test_text_runs_are_cached() {
        let (tree, ctx) = run(json!([{
            "id": "4:1",
            "type": "TEXT",
            "width": 80.0,
            "height": 20.0,
            "characters": "Hello world",
            "fontSize": "mixed",
            "fills": "mixed",
            "styledSegments": [
                { "characters": "Hello ", "fontSize": 14.0 },
                { "characters": "world", "fontSize": 20.0 }
            ]
        }]));

        let node = tree.node(tree.roots()[0]).unwrap();
        let runs = ctx.text_runs().get(node.id()).unwrap();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[1].characters, "world");
        assert_eq!(node.text_content().unwrap().runs.as_slice(), runs);
    }

    #[test]
    fn test_fill_child_does_not_hug() {
        let (tree, _) = run(json!({
            "id": "1:1",
            "type": "FRAME",
            "width": 300.0,
            "height": 100.0,
            "layoutMode": "HORIZONTAL",
            "children": [{
                "id": "1:2",
                "type": "FRAME",
                "width": 100.0,
                "height": 40.0,
                "layoutMode": "HORIZONTAL",
                "primaryAxisSizingMode": "AUTO",
                "layoutGrow": 1.0,
                "children": [rect("a", 0.0, 0.0, 10.0, 10.0)]
            }]
        }));

        let root = tree.roots()[0];
        let (child, node) = tree.children(root).next().unwrap();
        assert_eq!(node.layout().unwrap().horizontal_sizing, SizingMode::Fixed);
        assert_eq!(resolve_sizing(&tree, child).unwrap().0, AxisSizing::Fill);
    }

    #[test]
    fn test_declared_layout_is_not_inferred() {
        let (tree, _) = run(json!({
            "id": "1:1",
            "type": "FRAME",
            "width": 100.0,
            "height": 100.0,
            "layoutMode": "VERTICAL",
            "itemSpacing": 4.0,
            "children": [rect("b", 60.0, 0.0, 40.0, 100.0), rect("a", 0.0, 0.0, 40.0, 100.0)]
        }));

        let root = tree.node(tree.roots()[0]).unwrap();
        let layout = root.layout().unwrap();
        assert_eq!(layout.flow, Flow::Column);
        assert_eq!(layout.origin, FlowOrigin::Explicit);
        assert_eq!(layout.item_spacing, 4.0);
        assert_eq!(tree.node(root.children[0]).unwrap().name(), "b");
    }

    #[test]
    fn test_inference_can_be_disabled() {
        let mut ctx = ConversionContext::new();
        let selection = json!({
            "id": "1:1",
            "type": "FRAME",
            "width": 100.0,
            "height": 100.0,
            "children": [rect("a", 0.0, 0.0, 40.0, 100.0), rect("b", 60.0, 0.0, 40.0, 100.0)]
        });
        let options = NormalizeOptions::default().without_inference();
        let tree = normalize_json(&selection.to_string(), &options, &mut ctx).unwrap();

        assert_eq!(tree.node(tree.roots()[0]).unwrap().flow(), Flow::None);
    }

    #[test]
    fn test_wider_gap_tolerance_accepts_overlap() {
        let selection = json!({
            "id": "1:1",
            "type": "FRAME",
            "width": 100.0,
            "height": 100.0,
            "children": [rect("a", 0.0, 0.0, 40.0, 100.0), rect("b", 37.0, 0.0, 40.0, 100.0)]
        });

        let (strict, _) = run(selection.clone());
        assert_eq!(strict.node(strict.roots()[0]).unwrap().flow(), Flow::None);

        let mut ctx = ConversionContext::new();
        let tolerances = LayoutTolerances {
            gap: 5.0,
            ..LayoutTolerances::default()
        };
        let options = NormalizeOptions::default().with_tolerances(tolerances);
        let tree = normalize_json(&selection.to_string(), &options, &mut ctx).unwrap();

        let layout = tree.node(tree.roots()[0]).unwrap().layout().unwrap();
        assert_eq!(layout.flow, Flow::Row);
        assert_eq!(layout.item_spacing, 0.0);
    }

    proptest! {
        #[test]
        fn renormalizing_is_a_no_op(
            boxes in prop::collection::vec(
                (0.0f64..200.0, 0.0f64..200.0, 1.0f64..100.0, 1.0f64..100.0),
                0..6
            )
        ) {
            let children: Vec<Value> = boxes
                .iter()
                .enumerate()
                .map(|(i, &(x, y, w, h))| rect(&format!("r{i}"), x, y, w, h))
                .collect();
            let (tree, _) = run(json!({
                "id": "root",
                "type": "FRAME",
                "width": 300.0,
                "height": 300.0,
                "children": children
            }));

            let mut ctx = ConversionContext::new();
            let again = renormalize(&tree, &NormalizeOptions::default(), &mut ctx).unwrap();
            prop_assert!(tree.structurally_eq(&again));
        }
    }
}
