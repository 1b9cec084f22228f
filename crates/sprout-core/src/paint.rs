//! Self-contained paint descriptors.

use smallvec::SmallVec;

use crate::types::Color;

/// A 2×3 affine matrix in the host's row-major layout: `[[a, c, tx], [b, d, ty]]`.
pub type Transform2D = [[f64; 3]; 2];

/// The identity transform.
pub const IDENTITY_TRANSFORM: Transform2D = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];

/// A color stop in a gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient (0.0 to 1.0)
    pub position: f64,
    pub color: Color,
}

/// Color stops, inline for the common two-to-four stop case.
pub type GradientStops = SmallVec<[GradientStop; 4]>;

/// A gradient paint: ordered stops plus the transform mapping node space to
/// gradient space.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientPaint {
    pub stops: GradientStops,
    pub transform: Transform2D,
    pub opacity: f64,
}

/// Stand-in for raster content that is not embedded in the snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImagePlaceholder {
    /// Host reference to the original image, if any
    pub image_ref: Option<String>,
    pub scale_mode: ScaleMode,
    pub opacity: f64,
}

/// How an image fills its node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScaleMode {
    #[default]
    Fill,
    Fit,
    Crop,
    Tile,
}

/// A fill or stroke paint that needs no further host access.
#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid { color: Color, opacity: f64 },
    LinearGradient(GradientPaint),
    RadialGradient(GradientPaint),
    AngularGradient(GradientPaint),
    Image(ImagePlaceholder),
}

impl Paint {
    pub fn solid(color: Color) -> Self {
        Paint::Solid { color, opacity: 1.0 }
    }

    /// A fully opaque image placeholder with no source reference.
    pub fn placeholder_image() -> Self {
        Paint::Image(ImagePlaceholder {
            image_ref: None,
            scale_mode: ScaleMode::Fill,
            opacity: 1.0,
        })
    }

    pub fn opacity(&self) -> f64 {
        match self {
            Paint::Solid { opacity, .. } => *opacity,
            Paint::LinearGradient(g) | Paint::RadialGradient(g) | Paint::AngularGradient(g) => {
                g.opacity
            }
            Paint::Image(img) => img.opacity,
        }
    }

    /// The color of a solid paint with paint opacity folded into alpha.
    pub fn solid_color(&self) -> Option<Color> {
        match self {
            Paint::Solid { color, opacity } => Some(color.with_opacity(*opacity)),
            _ => None,
        }
    }

    pub fn gradient(&self) -> Option<&GradientPaint> {
        match self {
            Paint::LinearGradient(g) | Paint::RadialGradient(g) | Paint::AngularGradient(g) => {
                Some(g)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_color_folds_opacity() {
        let paint = Paint::Solid { color: Color::rgb(1.0, 0.0, 0.0), opacity: 0.5 };
        let color = paint.solid_color().unwrap();
        assert!((color.a - 0.5).abs() < 1e-6);
        assert!(Paint::placeholder_image().solid_color().is_none());
    }
}
