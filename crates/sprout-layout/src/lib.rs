//! Normalized tree, geometry and layout inference for Sprout.
//!
//! This crate holds everything that reasons about where nodes sit:
//!
//! # Architecture
//!
//! 1. **Tree**: arena of detached node snapshots with parent/child indices
//! 2. **Geometry**: affine helpers, rotated bounding boxes, gradient direction
//! 3. **Inference**: row/column detection and background promotion for free-form children
//! 4. **Sizing**: per-axis fixed/hug/fill classification shared by every generator
//!
//! # Example
//!
//! ```ignore
//! use sprout_layout::{resolve_sizing, NormalizedTree};
//!
//! for index in tree.walk() {
//!     let (horizontal, vertical) = resolve_sizing(&tree, index)?;
//!     println!("{:?} x {:?}", horizontal, vertical);
//! }
//! ```

mod geometry;
mod inference;
mod sizing;
mod tree;

pub use geometry::{
    apply_affine, classify_direction, css_gradient_degrees, from_affine, gradient_angle,
    gradient_transform_from_angle, node_bounding_box, node_transform, rotated_bounding_box,
    to_affine, GradientDirection,
};
pub use inference::{
    compute_padding, detect_flow, find_background, infer_alignment, infer_layout, Alignment,
    Distribution, Flow, FlowDetection, InferredLayout, LayoutItem, LayoutTolerances, Padding,
};
pub use sizing::{claims_fill, resolve_axis_sizing, resolve_sizing, AxisSizing};
pub use tree::{
    Bounds, ContainerLayout, FlowOrigin, NodeIndex, NodeKind, NodeProps, NormalizedNode,
    NormalizedTree, ShapeKind, SizingMode,
};
