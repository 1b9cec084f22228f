//! Detached snapshots of single source nodes.

use sprout_layout::{node_bounding_box, ContainerLayout, NodeIndex, NormalizedNode};

use crate::context::WarningSink;
use crate::source::{SourceKind, SourceNode};

/// Host properties that are computed, positional bookkeeping, or links back
/// into the host document. None of them survive a snapshot.
pub const BLOCKED_PROPERTIES: &[&str] = &[
    "parent",
    "children",
    "absoluteTransform",
    "absoluteBoundingBox",
    "absoluteRenderBounds",
    "relativeTransform",
    "mainComponent",
    "masterComponent",
    "instances",
    "exposedInstances",
    "componentPropertyDefinitions",
    "componentPropertyReferences",
    "componentProperties",
    "variantProperties",
    "horizontalPadding",
    "verticalPadding",
    "constrainProportions",
];

pub fn is_blocked(property: &str) -> bool {
    BLOCKED_PROPERTIES.contains(&property)
}

/// Snapshot one node without its children.
///
/// Returns `None` for kinds the converter does not handle. The node's kind is
/// fixed here; callers that rewrite it build a new node from the props.
pub fn clone_node<S: SourceNode>(
    source: &S,
    parent: Option<NodeIndex>,
    warnings: &mut WarningSink,
) -> Option<NormalizedNode> {
    let mut props = source.properties(warnings);
    props.properties.retain(|key, _| !is_blocked(key));
    props.bounds = node_bounding_box(&props.geometry);

    let mut node = match source.kind() {
        SourceKind::Rectangle => NormalizedNode::rectangle(props),
        SourceKind::Ellipse => NormalizedNode::ellipse(props),
        SourceKind::Line => NormalizedNode::line(props),
        SourceKind::Shape(shape) => NormalizedNode::shape(shape, props),
        SourceKind::Group => NormalizedNode::group(props),
        SourceKind::Container => {
            let layout = source
                .declared_layout()
                .unwrap_or_else(|| ContainerLayout::free_form(source.clips_content()));
            NormalizedNode::container(props, layout)
        }
        SourceKind::Text => {
            let content = source.text(warnings).unwrap_or_default();
            NormalizedNode::text(props, content)
        }
        SourceKind::BooleanOperation => NormalizedNode::boolean_placeholder(props),
        SourceKind::Unsupported(_) => return None,
    };

    node.parent = parent;
    Some(node)
}
