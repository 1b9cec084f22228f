//! Auto-layout inference for free-form children.
//!
//! Reconstructs *a* plausible row/column flow from absolute child positions.
//! The result is a rendering hint; it is lossy and never written back to the host.
//!
//! Known misclassifications with the default tolerances:
//! - A staircase (every child below and to the right of the previous one)
//!   passes both axis tests and stays free-form.
//! - Children touching within the gap tolerance but visually overlapping by
//!   less than a pixel are still treated as a flow.
//! - A full-bleed image that happens to contain every other child is promoted
//!   to a background even if the author meant it as content.

use serde::{Deserialize, Serialize};
use sprout_core::Axis;

use crate::tree::Bounds;

/// Arrangement of a container's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Flow {
    /// Children keep absolute offsets
    #[default]
    None,
    /// Left to right
    Row,
    /// Top to bottom
    Column,
}

impl Flow {
    /// The axis children advance along, if any.
    pub fn main_axis(&self) -> Option<Axis> {
        match self {
            Flow::None => None,
            Flow::Row => Some(Axis::Horizontal),
            Flow::Column => Some(Axis::Vertical),
        }
    }

    pub fn is_flow(&self) -> bool {
        !matches!(self, Flow::None)
    }
}

/// Alignment of items on the cross axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    /// Align to start (top for rows, left for columns)
    #[default]
    Start,
    /// Center on the cross axis
    Center,
    /// Align to end (bottom for rows, right for columns)
    End,
    /// Share a text baseline
    Baseline,
}

/// Distribution of items on the main axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Distribution {
    /// Pack items at the start
    #[default]
    Start,
    /// Center items
    Center,
    /// Pack items at the end
    End,
    /// Distribute items with equal space between
    SpaceBetween,
}

/// Padding on all sides.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Padding {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Padding {
    /// Create uniform padding.
    pub fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// Total horizontal padding.
    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    /// Total vertical padding.
    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }

    pub fn is_zero(&self) -> bool {
        self.top == 0.0 && self.right == 0.0 && self.bottom == 0.0 && self.left == 0.0
    }

    pub fn is_uniform(&self) -> bool {
        self.top == self.right && self.right == self.bottom && self.bottom == self.left
    }
}

/// Pixel tolerances used by the heuristics.
///
/// These are tuned against real designs rather than derived; callers can
/// loosen or tighten them per run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutTolerances {
    /// How far consecutive children may overlap and still count as a flow
    pub gap: f64,
    /// How far a child may poke out of a background and still be contained
    pub containment: f64,
    /// How far cross-axis edges may differ and still count as aligned
    pub alignment: f64,
}

impl Default for LayoutTolerances {
    fn default() -> Self {
        Self {
            gap: 1.0,
            containment: 0.5,
            alignment: 0.5,
        }
    }
}

/// One child as seen by inference.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutItem {
    /// Layout box relative to the container
    pub bounds: Bounds,
    /// Whether this child may become the structural parent of its siblings
    pub promotable: bool,
}

impl LayoutItem {
    pub fn new(bounds: Bounds, promotable: bool) -> Self {
        Self { bounds, promotable }
    }
}

/// Result of inference over one container's children.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InferredLayout {
    /// Child promoted to background, as an index into the input items
    pub promoted: Option<usize>,
    /// Flow of the (possibly reduced) child set
    pub flow: Flow,
    /// Indices of the flowing children in flow order (paint order when free-form)
    pub order: Vec<usize>,
    /// Mean gap between consecutive children along the flow axis
    pub spacing: f64,
    /// Cross-axis alignment shared by the children
    pub alignment: Alignment,
    /// Inset of the children from the promoted background
    pub padding: Padding,
}

/// Infer flow, spacing, alignment, and background promotion for `items`.
pub fn infer_layout(items: &[LayoutItem], tolerances: &LayoutTolerances) -> InferredLayout {
    let promoted = find_background(items, tolerances);

    // Children that take part in the flow, rebased onto the background if one was promoted
    let (origin_x, origin_y) = promoted
        .map(|i| (items[i].bounds.x, items[i].bounds.y))
        .unwrap_or((0.0, 0.0));
    let members: Vec<usize> = (0..items.len()).filter(|&i| Some(i) != promoted).collect();
    let boxes: Vec<Bounds> = members
        .iter()
        .map(|&i| items[i].bounds.translate(-origin_x, -origin_y))
        .collect();

    let detection = detect_flow(&boxes, tolerances);
    let order = detection.order.iter().map(|&k| members[k]).collect();
    let alignment = infer_alignment(detection.flow, &boxes, tolerances);

    let padding = match (promoted, detection.flow.is_flow()) {
        (Some(i), true) => compute_padding(&items[i].bounds, &boxes),
        _ => Padding::default(),
    };

    InferredLayout {
        promoted,
        flow: detection.flow,
        order,
        spacing: detection.spacing,
        alignment,
        padding,
    }
}

/// Find a child that can act as the background of all its siblings.
///
/// The candidate must have both the largest width and the largest height
/// (first in paint order on ties), be promotable, contain every sibling, and
/// be painted below all of them.
pub fn find_background(items: &[LayoutItem], tolerances: &LayoutTolerances) -> Option<usize> {
    if items.len() < 2 {
        return None;
    }

    let widest = first_max_by(items, |item| item.bounds.width)?;
    let tallest = first_max_by(items, |item| item.bounds.height)?;
    if widest != tallest || widest != 0 || !items[widest].promotable {
        return None;
    }

    let background = items[widest].bounds;
    let contains_all = items
        .iter()
        .enumerate()
        .filter(|&(i, _)| i != widest)
        .all(|(_, item)| background.contains_bounds(&item.bounds, tolerances.containment));

    contains_all.then_some(widest)
}

fn first_max_by(items: &[LayoutItem], key: impl Fn(&LayoutItem) -> f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, item) in items.iter().enumerate() {
        let value = key(item);
        match best {
            Some((_, current)) if value <= current => {}
            _ => best = Some((i, value)),
        }
    }
    best.map(|(i, _)| i)
}

/// Outcome of axis detection.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlowDetection {
    pub flow: Flow,
    /// Indices into the input boxes, in flow order
    pub order: Vec<usize>,
    pub spacing: f64,
}

/// Classify boxes as a row, a column, or free-form.
pub fn detect_flow(boxes: &[Bounds], tolerances: &LayoutTolerances) -> FlowDetection {
    let paint_order: Vec<usize> = (0..boxes.len()).collect();
    if boxes.len() < 2 {
        return FlowDetection {
            flow: Flow::None,
            order: paint_order,
            spacing: 0.0,
        };
    }

    let (by_y, y_gaps) = gaps_along(boxes, Axis::Vertical);
    let (by_x, x_gaps) = gaps_along(boxes, Axis::Horizontal);
    let stacks_vertically = y_gaps.iter().all(|&gap| gap >= -tolerances.gap);
    let stacks_horizontally = x_gaps.iter().all(|&gap| gap >= -tolerances.gap);

    match (stacks_horizontally, stacks_vertically) {
        (false, true) => FlowDetection {
            flow: Flow::Column,
            order: by_y,
            spacing: mean_gap(&y_gaps),
        },
        (true, false) => FlowDetection {
            flow: Flow::Row,
            order: by_x,
            spacing: mean_gap(&x_gaps),
        },
        _ => FlowDetection {
            flow: Flow::None,
            order: paint_order,
            spacing: 0.0,
        },
    }
}

/// Sort boxes along an axis and measure the gap between each consecutive pair.
fn gaps_along(boxes: &[Bounds], axis: Axis) -> (Vec<usize>, Vec<f64>) {
    let cross = axis.cross();
    let mut order: Vec<usize> = (0..boxes.len()).collect();
    order.sort_by(|&a, &b| {
        let (ba, bb) = (&boxes[a], &boxes[b]);
        ba.start(axis)
            .total_cmp(&bb.start(axis))
            .then(ba.start(cross).total_cmp(&bb.start(cross)))
    });

    let gaps = order
        .windows(2)
        .map(|pair| boxes[pair[1]].start(axis) - boxes[pair[0]].end(axis))
        .collect();

    (order, gaps)
}

fn mean_gap(gaps: &[f64]) -> f64 {
    if gaps.is_empty() {
        return 0.0;
    }
    (gaps.iter().sum::<f64>() / gaps.len() as f64).max(0.0)
}

/// Cross-axis alignment shared by all boxes; `Start` when nothing lines up.
pub fn infer_alignment(flow: Flow, boxes: &[Bounds], tolerances: &LayoutTolerances) -> Alignment {
    let Some(main) = flow.main_axis() else {
        return Alignment::Start;
    };
    let cross = main.cross();
    let lines_up = |edge: &dyn Fn(&Bounds) -> f64| {
        let Some(first) = boxes.first().map(edge) else {
            return true;
        };
        boxes.iter().all(|b| (edge(b) - first).abs() <= tolerances.alignment)
    };

    if lines_up(&|b: &Bounds| b.start(cross)) {
        Alignment::Start
    } else if lines_up(&|b: &Bounds| b.start(cross) + b.extent(cross) / 2.0) {
        Alignment::Center
    } else if lines_up(&|b: &Bounds| b.end(cross)) {
        Alignment::End
    } else {
        Alignment::Start
    }
}

/// Smallest inset of the children from each edge of a promoted background.
///
/// `children` must already be relative to the background's origin.
pub fn compute_padding(background: &Bounds, children: &[Bounds]) -> Padding {
    if children.is_empty() {
        return Padding::default();
    }

    let min_of = |f: &dyn Fn(&Bounds) -> f64| {
        children
            .iter()
            .map(f)
            .fold(f64::INFINITY, f64::min)
            .max(0.0)
    };

    Padding {
        top: min_of(&|c: &Bounds| c.y),
        right: min_of(&|c: &Bounds| background.width - c.right()),
        bottom: min_of(&|c: &Bounds| background.height - c.bottom()),
        left: min_of(&|c: &Bounds| c.x),
    }
}
