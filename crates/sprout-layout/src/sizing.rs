//! Per-axis sizing intent.
//!
//! Every generator asks the resolver instead of reading sizing fields itself,
//! so a node renders as fixed, hugging, or filling consistently across targets.

use sprout_core::{Axis, LayoutAlign, LayoutError};

use crate::inference::Flow;
use crate::tree::{NodeIndex, NormalizedNode, NormalizedTree, SizingMode};

/// Resolved sizing of a node along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisSizing {
    /// Exactly this many pixels
    Fixed(f64),
    /// Shrink to the content
    Hug,
    /// Take the space the parent offers
    Fill,
}

/// Whether `node` asks its flow parent to stretch it along `axis`.
///
/// Grow applies on the parent's main axis, stretch on its cross axis.
pub fn claims_fill(parent_flow: Flow, node: &NormalizedNode, axis: Axis) -> bool {
    let Some(main) = parent_flow.main_axis() else {
        return false;
    };
    if axis == main {
        node.props.layout_grow > 0.0
    } else {
        node.props.layout_align == LayoutAlign::Stretch
    }
}

/// Classify a node's sizing along `axis`.
///
/// Priority: fill claimed inside a flow parent, then hug on the node's own
/// flow, then the measured length.
pub fn resolve_axis_sizing(
    tree: &NormalizedTree,
    index: NodeIndex,
    axis: Axis,
) -> Result<AxisSizing, LayoutError> {
    let node = tree.node(index)?;

    if let Some(parent) = node.parent {
        let parent_flow = tree.node(parent)?.flow();
        if claims_fill(parent_flow, node, axis) {
            return Ok(AxisSizing::Fill);
        }
    }

    if let Some(layout) = node.layout() {
        if layout.flow.is_flow() && layout.sizing(axis) == SizingMode::Hug {
            return Ok(AxisSizing::Hug);
        }
    }

    Ok(AxisSizing::Fixed(node.length(axis)))
}

/// Horizontal and vertical sizing of a node.
pub fn resolve_sizing(
    tree: &NormalizedTree,
    index: NodeIndex,
) -> Result<(AxisSizing, AxisSizing), LayoutError> {
    Ok((
        resolve_axis_sizing(tree, index, Axis::Horizontal)?,
        resolve_axis_sizing(tree, index, Axis::Vertical)?,
    ))
}
