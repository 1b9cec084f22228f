//! Text content and styled runs.

use serde::{Deserialize, Serialize};

use crate::paint::Paint;
use crate::types::Mixed;

/// Font family and style name pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontName {
    pub family: String,
    pub style: String,
}

impl Default for FontName {
    fn default() -> Self {
        Self {
            family: "Inter".to_string(),
            style: "Regular".to_string(),
        }
    }
}

impl FontName {
    pub fn is_italic(&self) -> bool {
        self.style.to_ascii_lowercase().contains("italic")
    }
}

/// Line height of a run.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "unit", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineHeight {
    #[default]
    Auto,
    Pixels { value: f64 },
    Percent { value: f64 },
}

impl LineHeight {
    /// Resolve to pixels for a given font size; `None` for `Auto`.
    pub fn to_px(&self, font_size: f64) -> Option<f64> {
        match *self {
            LineHeight::Auto => None,
            LineHeight::Pixels { value } => Some(value),
            LineHeight::Percent { value } => Some(font_size * value / 100.0),
        }
    }
}

/// Letter spacing of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "unit", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LetterSpacing {
    Pixels { value: f64 },
    Percent { value: f64 },
}

impl Default for LetterSpacing {
    fn default() -> Self {
        LetterSpacing::Pixels { value: 0.0 }
    }
}

impl LetterSpacing {
    pub fn to_px(&self, font_size: f64) -> f64 {
        match *self {
            LetterSpacing::Pixels { value } => value,
            LetterSpacing::Percent { value } => font_size * value / 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    Strikethrough,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextCase {
    #[default]
    Original,
    Upper,
    Lower,
    Title,
    SmallCaps,
    SmallCapsForced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextAlignHorizontal {
    #[default]
    Left,
    Center,
    Right,
    Justified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextAlignVertical {
    #[default]
    Top,
    Center,
    Bottom,
}

/// How a text box grows with its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TextAutoResize {
    #[default]
    None,
    WidthAndHeight,
    Height,
    Truncate,
}

/// A contiguous range of characters sharing one style.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub characters: String,
    pub font: FontName,
    pub font_weight: u16,
    pub font_size: f64,
    pub line_height: LineHeight,
    pub letter_spacing: LetterSpacing,
    pub decoration: TextDecoration,
    pub case: TextCase,
    pub fills: Vec<Paint>,
}

/// Text-specific snapshot data.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextContent {
    pub characters: String,
    /// Node-level size; indeterminate when runs differ
    pub font_size: Mixed<f64>,
    /// Node-level font; indeterminate when runs differ
    pub font: Mixed<FontName>,
    pub align_horizontal: TextAlignHorizontal,
    pub align_vertical: TextAlignVertical,
    pub auto_resize: TextAutoResize,
    /// Styled runs in reading order
    pub runs: Vec<TextRun>,
}
