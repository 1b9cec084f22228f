//! Affine transforms, rotated bounds, and gradient direction.

use glam::{DAffine2, DVec2};
use sprout_core::{Geometry, Transform2D};

use crate::tree::Bounds;

/// Determinant below which a transform is treated as singular.
const SINGULAR_EPSILON: f64 = 1e-12;

/// Convert a host row-major matrix into a glam affine.
pub fn to_affine(matrix: &Transform2D) -> DAffine2 {
    let [[a, c, tx], [b, d, ty]] = *matrix;
    DAffine2::from_cols(DVec2::new(a, b), DVec2::new(c, d), DVec2::new(tx, ty))
}

/// Convert a glam affine back into the host's row-major layout.
pub fn from_affine(affine: &DAffine2) -> Transform2D {
    let x = affine.matrix2.x_axis;
    let y = affine.matrix2.y_axis;
    let t = affine.translation;
    [[x.x, y.x, t.x], [x.y, y.y, t.y]]
}

/// Apply a 2×3 affine matrix to a point.
pub fn apply_affine(matrix: &Transform2D, point: DVec2) -> DVec2 {
    to_affine(matrix).transform_point2(point)
}

/// Transform from a node's local space into its parent's space.
///
/// Host rotation is counter-clockwise on a y-down screen, which is a negative
/// angle in glam's convention.
pub fn node_transform(geometry: &Geometry) -> DAffine2 {
    DAffine2::from_translation(DVec2::new(geometry.x, geometry.y))
        * DAffine2::from_angle(-geometry.rotation.to_radians())
}

/// Axis-aligned box enclosing a `width` × `height` rectangle under `transform`.
///
/// The box's `x`/`y` is the componentwise minimum of the transformed corners.
pub fn rotated_bounding_box(transform: &DAffine2, width: f64, height: f64) -> Bounds {
    let corners = [
        DVec2::new(0.0, 0.0),
        DVec2::new(width, 0.0),
        DVec2::new(width, height),
        DVec2::new(0.0, height),
    ]
    .map(|corner| transform.transform_point2(corner));

    let min = corners.iter().fold(DVec2::splat(f64::INFINITY), |acc, p| acc.min(*p));
    let max = corners.iter().fold(DVec2::splat(f64::NEG_INFINITY), |acc, p| acc.max(*p));
    Bounds::new(min.x, min.y, max.x - min.x, max.y - min.y)
}

/// Layout box of a node in its parent's space.
///
/// Unrotated nodes take the fast path so their boxes stay bit-exact.
pub fn node_bounding_box(geometry: &Geometry) -> Bounds {
    if !geometry.is_rotated() {
        return Bounds::new(geometry.x, geometry.y, geometry.width, geometry.height);
    }
    rotated_bounding_box(&node_transform(geometry), geometry.width, geometry.height)
}

/// Direction of a gradient in degrees, in `[-180, 180]`.
///
/// The gradient runs from `(0, 0.5)` to `(1, 0.5)` in gradient space; the
/// transform maps node space into gradient space, so its inverse places the
/// handles. 0° points right and 90° points down. Singular transforms give 0.
pub fn gradient_angle(transform: &Transform2D) -> f64 {
    let affine = to_affine(transform);
    if affine.matrix2.determinant().abs() < SINGULAR_EPSILON {
        return 0.0;
    }

    let inverse = affine.inverse();
    let start = inverse.transform_point2(DVec2::new(0.0, 0.5));
    let end = inverse.transform_point2(DVec2::new(1.0, 0.5));
    let delta = end - start;
    if !delta.is_finite() || delta.length_squared() < SINGULAR_EPSILON {
        return 0.0;
    }
    delta.y.atan2(delta.x).to_degrees()
}

/// Gradient transform whose direction is `angle` degrees, rotating about the node center.
pub fn gradient_transform_from_angle(angle: f64) -> Transform2D {
    let center = DVec2::splat(0.5);
    let handles = DAffine2::from_translation(center)
        * DAffine2::from_angle(angle.to_radians())
        * DAffine2::from_translation(-center);
    from_affine(&handles.inverse())
}

/// The eight compass directions a gradient can be snapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GradientDirection {
    LeftToRight,
    TopLeftToBottomRight,
    TopToBottom,
    TopRightToBottomLeft,
    RightToLeft,
    BottomRightToTopLeft,
    BottomToTop,
    BottomLeftToTopRight,
}

impl GradientDirection {
    /// Candidates in the order used to break ties.
    pub const ALL: [GradientDirection; 8] = [
        GradientDirection::LeftToRight,
        GradientDirection::TopLeftToBottomRight,
        GradientDirection::TopToBottom,
        GradientDirection::TopRightToBottomLeft,
        GradientDirection::RightToLeft,
        GradientDirection::BottomRightToTopLeft,
        GradientDirection::BottomToTop,
        GradientDirection::BottomLeftToTopRight,
    ];

    /// Canonical angle in degrees (0° right, 90° down).
    pub fn angle(&self) -> f64 {
        match self {
            GradientDirection::LeftToRight => 0.0,
            GradientDirection::TopLeftToBottomRight => 45.0,
            GradientDirection::TopToBottom => 90.0,
            GradientDirection::TopRightToBottomLeft => 135.0,
            GradientDirection::RightToLeft => 180.0,
            GradientDirection::BottomRightToTopLeft => -135.0,
            GradientDirection::BottomToTop => -90.0,
            GradientDirection::BottomLeftToTopRight => -45.0,
        }
    }

    /// Suffix of Tailwind's `bg-gradient-to-*` utilities.
    pub fn tailwind_suffix(&self) -> &'static str {
        match self {
            GradientDirection::LeftToRight => "r",
            GradientDirection::TopLeftToBottomRight => "br",
            GradientDirection::TopToBottom => "b",
            GradientDirection::TopRightToBottomLeft => "bl",
            GradientDirection::RightToLeft => "l",
            GradientDirection::BottomRightToTopLeft => "tl",
            GradientDirection::BottomToTop => "t",
            GradientDirection::BottomLeftToTopRight => "tr",
        }
    }

    /// SwiftUI `UnitPoint` start and end.
    pub fn swiftui_points(&self) -> (&'static str, &'static str) {
        match self {
            GradientDirection::LeftToRight => (".leading", ".trailing"),
            GradientDirection::TopLeftToBottomRight => (".topLeading", ".bottomTrailing"),
            GradientDirection::TopToBottom => (".top", ".bottom"),
            GradientDirection::TopRightToBottomLeft => (".topTrailing", ".bottomLeading"),
            GradientDirection::RightToLeft => (".trailing", ".leading"),
            GradientDirection::BottomRightToTopLeft => (".bottomTrailing", ".topLeading"),
            GradientDirection::BottomToTop => (".bottom", ".top"),
            GradientDirection::BottomLeftToTopRight => (".bottomLeading", ".topTrailing"),
        }
    }

    /// Flutter `Alignment` begin and end.
    pub fn flutter_alignments(&self) -> (&'static str, &'static str) {
        match self {
            GradientDirection::LeftToRight => ("Alignment.centerLeft", "Alignment.centerRight"),
            GradientDirection::TopLeftToBottomRight => {
                ("Alignment.topLeft", "Alignment.bottomRight")
            }
            GradientDirection::TopToBottom => ("Alignment.topCenter", "Alignment.bottomCenter"),
            GradientDirection::TopRightToBottomLeft => {
                ("Alignment.topRight", "Alignment.bottomLeft")
            }
            GradientDirection::RightToLeft => ("Alignment.centerRight", "Alignment.centerLeft"),
            GradientDirection::BottomRightToTopLeft => {
                ("Alignment.bottomRight", "Alignment.topLeft")
            }
            GradientDirection::BottomToTop => ("Alignment.bottomCenter", "Alignment.topCenter"),
            GradientDirection::BottomLeftToTopRight => {
                ("Alignment.bottomLeft", "Alignment.topRight")
            }
        }
    }
}

/// Smallest absolute difference between two angles, in `[0, 180]`.
fn angular_distance(a: f64, b: f64) -> f64 {
    let diff = (a - b).rem_euclid(360.0);
    diff.min(360.0 - diff)
}

/// Snap an angle to the nearest of the eight compass directions.
///
/// Exact ties go to the earlier candidate in [`GradientDirection::ALL`].
pub fn classify_direction(angle: f64) -> GradientDirection {
    if !angle.is_finite() {
        return GradientDirection::LeftToRight;
    }

    let mut best = GradientDirection::LeftToRight;
    let mut best_distance = f64::INFINITY;
    for candidate in GradientDirection::ALL {
        let distance = angular_distance(angle, candidate.angle());
        if distance < best_distance {
            best = candidate;
            best_distance = distance;
        }
    }
    best
}

/// CSS `linear-gradient` angle (0deg points up, clockwise) for a gradient angle.
pub fn css_gradient_degrees(angle: f64) -> f64 {
    (angle + 90.0).rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_apply_affine() {
        let matrix: Transform2D = [[2.0, 0.0, 5.0], [0.0, 3.0, -1.0]];
        let p = apply_affine(&matrix, DVec2::new(1.0, 1.0));
        assert!((p.x - 7.0).abs() < EPS);
        assert!((p.y - 2.0).abs() < EPS);
    }

    #[test]
    fn test_affine_round_trip() {
        let matrix: Transform2D = [[0.5, -0.2, 3.0], [0.1, 0.9, 4.0]];
        assert_eq!(from_affine(&to_affine(&matrix)), matrix);
    }

    #[test]
    fn test_rotation_about_center_keeps_top_left() {
        let center = DVec2::new(5.0, 5.0);
        let transform = DAffine2::from_translation(center)
            * DAffine2::from_angle(90f64.to_radians())
            * DAffine2::from_translation(-center);
        let rotated = rotated_bounding_box(&transform, 10.0, 10.0);
        let plain = rotated_bounding_box(&DAffine2::IDENTITY, 10.0, 10.0);

        assert!((rotated.x - plain.x).abs() < EPS);
        assert!((rotated.y - plain.y).abs() < EPS);
        assert!((rotated.width - 10.0).abs() < EPS);
    }

    #[test]
    fn test_node_rotated_about_its_center() {
        // Host rotation turns about the origin; a 90° turn about the center
        // moves the origin to (0, 10).
        let geometry = Geometry::new(0.0, 10.0, 10.0, 10.0).with_rotation(90.0);
        let bounds = node_bounding_box(&geometry);

        assert!(bounds.x.abs() < EPS);
        assert!(bounds.y.abs() < EPS);
        assert!((bounds.height - 10.0).abs() < EPS);
    }

    #[test]
    fn test_rotated_rectangle_envelope() {
        let geometry = Geometry::new(0.0, 0.0, 20.0, 10.0).with_rotation(90.0);
        let bounds = node_bounding_box(&geometry);
        assert!((bounds.width - 10.0).abs() < EPS);
        assert!((bounds.height - 20.0).abs() < EPS);
        assert!((bounds.y + 20.0).abs() < EPS);
    }

    #[test]
    fn test_gradient_angle_from_transform() {
        for angle in [0.0, 45.0, 90.0, -90.0, 135.0, -30.0] {
            let transform = gradient_transform_from_angle(angle);
            assert!((gradient_angle(&transform) - angle).abs() < 1e-6, "angle {}", angle);
        }
    }

    #[test]
    fn test_degenerate_gradient_is_zero() {
        let singular: Transform2D = [[0.0, 0.0, 0.5], [0.0, 0.0, 0.5]];
        assert_eq!(gradient_angle(&singular), 0.0);
    }

    #[test]
    fn test_classify_cardinal_and_diagonal() {
        let classify =
            |angle: f64| classify_direction(gradient_angle(&gradient_transform_from_angle(angle)));
        assert_eq!(classify(0.0), GradientDirection::LeftToRight);
        assert_eq!(classify(90.0), GradientDirection::TopToBottom);
        assert_eq!(classify(45.0), GradientDirection::TopLeftToBottomRight);
        assert_eq!(classify(180.0), GradientDirection::RightToLeft);
        assert_eq!(classify(-90.0), GradientDirection::BottomToTop);
    }

    #[test]
    fn test_classification_is_within_half_sector() {
        let mut angle = -180.0;
        while angle <= 180.0 {
            let direction = classify_direction(angle);
            assert!(angular_distance(angle, direction.angle()) <= 22.5 + EPS, "angle {}", angle);
            angle += 0.75;
        }
    }

    #[test]
    fn test_classification_ties_prefer_first_candidate() {
        assert_eq!(classify_direction(22.5), GradientDirection::LeftToRight);
        assert_eq!(classify_direction(f64::NAN), GradientDirection::LeftToRight);
    }

    #[test]
    fn test_css_degrees() {
        assert!((css_gradient_degrees(0.0) - 90.0).abs() < EPS);
        assert!((css_gradient_degrees(90.0) - 180.0).abs() < EPS);
        assert!((css_gradient_degrees(-90.0) - 0.0).abs() < EPS);
    }
}
