//! Core value types shared by the host model and the normalized tree.

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// Opaque node identifier assigned by the host.
///
/// Not guaranteed to be stable across runs; only used for lookups within one conversion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        NodeId(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        NodeId(s)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A property value that may be non-uniform across the sub-elements of a node.
///
/// Hosts report such values with a "mixed" sentinel. Every reader has to decide
/// what an indeterminate value means for it; there is no implicit fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mixed<T> {
    /// A single value applies to the whole node.
    Known(T),
    /// The value differs across sub-elements (text ranges, corners, sides).
    Indeterminate,
}

impl<T> Mixed<T> {
    /// The value, if uniform.
    pub fn known(&self) -> Option<&T> {
        match self {
            Mixed::Known(v) => Some(v),
            Mixed::Indeterminate => None,
        }
    }

    pub fn is_indeterminate(&self) -> bool {
        matches!(self, Mixed::Indeterminate)
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Mixed<U> {
        match self {
            Mixed::Known(v) => Mixed::Known(f(v)),
            Mixed::Indeterminate => Mixed::Indeterminate,
        }
    }

    /// Collapse to a concrete value, using `fallback` for the indeterminate case.
    pub fn unwrap_or(self, fallback: T) -> T {
        match self {
            Mixed::Known(v) => v,
            Mixed::Indeterminate => fallback,
        }
    }
}

impl<T: Default> Default for Mixed<T> {
    fn default() -> Self {
        Mixed::Known(T::default())
    }
}

impl<T> From<T> for Mixed<T> {
    fn from(value: T) -> Self {
        Mixed::Known(value)
    }
}

/// The host's textual sentinel for indeterminate values.
pub const MIXED_SENTINEL: &str = "mixed";

impl<T: Serialize> Serialize for Mixed<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Mixed::Known(v) => v.serialize(serializer),
            Mixed::Indeterminate => serializer.serialize_str(MIXED_SENTINEL),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Mixed<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        enum Sentinel {
            #[serde(rename = "mixed")]
            Mixed,
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr<T> {
            Sentinel(Sentinel),
            Value(T),
        }

        Ok(match Repr::<T>::deserialize(deserializer)? {
            Repr::Sentinel(Sentinel::Mixed) => Mixed::Indeterminate,
            Repr::Value(v) => Mixed::Known(v),
        })
    }
}

/// An RGBA color with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Color {
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create from 8-bit RGB values.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
        }
    }

    /// Convert to 8-bit RGBA tuple.
    pub fn to_rgba8(&self) -> (u8, u8, u8, u8) {
        (
            channel_to_u8(self.r),
            channel_to_u8(self.g),
            channel_to_u8(self.b),
            channel_to_u8(self.a),
        )
    }

    /// `#RRGGBB`, ignoring alpha.
    pub fn to_hex(&self) -> String {
        let (r, g, b, _) = self.to_rgba8();
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    }

    /// Same color with its alpha multiplied by `opacity`.
    pub fn with_opacity(&self, opacity: f64) -> Self {
        Self {
            a: (self.a as f64 * opacity).clamp(0.0, 1.0) as f32,
            ..*self
        }
    }

    // Common colors
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
}

fn channel_to_u8(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Position, size, and rotation of a node relative to its parent.
///
/// `x`/`y` locate the node's origin (its unrotated top-left corner).
/// `rotation` is in degrees; positive values turn counter-clockwise on screen
/// around the origin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Geometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
}

impl Geometry {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height, rotation: 0.0 }
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// Finite, non-negative size with at least one non-zero extent.
    ///
    /// Lines have zero height and are still laid out; a zero-by-zero node is not.
    pub fn is_degenerate(&self) -> bool {
        !(self.width.is_finite()
            && self.height.is_finite()
            && self.x.is_finite()
            && self.y.is_finite())
            || self.width < 0.0
            || self.height < 0.0
            || (self.width == 0.0 && self.height == 0.0)
    }

    pub fn is_rotated(&self) -> bool {
        self.rotation.abs() > f64::EPSILON
    }
}

/// Layer blend mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlendMode {
    #[default]
    PassThrough,
    Normal,
    Darken,
    Multiply,
    ColorBurn,
    Lighten,
    Screen,
    ColorDodge,
    Overlay,
    SoftLight,
    HardLight,
    Difference,
    Exclusion,
    Hue,
    Saturation,
    Color,
    Luminosity,
}

impl BlendMode {
    /// CSS `mix-blend-mode` keyword, or `None` when the mode composes normally.
    pub fn css_keyword(&self) -> Option<&'static str> {
        Some(match self {
            BlendMode::PassThrough | BlendMode::Normal => return None,
            BlendMode::Darken => "darken",
            BlendMode::Multiply => "multiply",
            BlendMode::ColorBurn => "color-burn",
            BlendMode::Lighten => "lighten",
            BlendMode::Screen => "screen",
            BlendMode::ColorDodge => "color-dodge",
            BlendMode::Overlay => "overlay",
            BlendMode::SoftLight => "soft-light",
            BlendMode::HardLight => "hard-light",
            BlendMode::Difference => "difference",
            BlendMode::Exclusion => "exclusion",
            BlendMode::Hue => "hue",
            BlendMode::Saturation => "saturation",
            BlendMode::Color => "color",
            BlendMode::Luminosity => "luminosity",
        })
    }
}

/// Where a stroke sits relative to the node outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StrokeAlign {
    #[default]
    Inside,
    Center,
    Outside,
}

/// Corner rounding, either uniform or per corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CornerRadii {
    Uniform(f64),
    PerCorner {
        top_left: f64,
        top_right: f64,
        bottom_right: f64,
        bottom_left: f64,
    },
}

impl CornerRadii {
    /// Build from four corners, collapsing to `Uniform` when they agree.
    pub fn from_corners(
        top_left: f64,
        top_right: f64,
        bottom_right: f64,
        bottom_left: f64,
    ) -> Self {
        if top_left == top_right && top_right == bottom_right && bottom_right == bottom_left {
            CornerRadii::Uniform(top_left)
        } else {
            CornerRadii::PerCorner {
                top_left,
                top_right,
                bottom_right,
                bottom_left,
            }
        }
    }

    pub fn is_zero(&self) -> bool {
        match *self {
            CornerRadii::Uniform(r) => r == 0.0,
            CornerRadii::PerCorner { top_left, top_right, bottom_right, bottom_left } => {
                top_left == 0.0 && top_right == 0.0 && bottom_right == 0.0 && bottom_left == 0.0
            }
        }
    }
}

impl Default for CornerRadii {
    fn default() -> Self {
        CornerRadii::Uniform(0.0)
    }
}

/// A 2D offset.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

/// Drop or inner shadow parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub color: Color,
    #[serde(default)]
    pub offset: Offset,
    #[serde(default)]
    pub radius: f64,
    #[serde(default)]
    pub spread: f64,
    #[serde(default = "visible_by_default")]
    pub visible: bool,
}

/// Layer or background blur parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Blur {
    pub radius: f64,
    #[serde(default = "visible_by_default")]
    pub visible: bool,
}

pub(crate) fn visible_by_default() -> bool {
    true
}

/// Visual effect applied to a node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Effect {
    DropShadow(Shadow),
    InnerShadow(Shadow),
    LayerBlur(Blur),
    BackgroundBlur(Blur),
}

impl Effect {
    pub fn is_visible(&self) -> bool {
        match self {
            Effect::DropShadow(s) | Effect::InnerShadow(s) => s.visible,
            Effect::LayerBlur(b) | Effect::BackgroundBlur(b) => b.visible,
        }
    }
}

/// How a child participates on its parent's cross axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LayoutAlign {
    #[default]
    Inherit,
    Stretch,
    Min,
    Center,
    Max,
}

/// One of the two layout axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn cross(self) -> Axis {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}
